//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization. They are converted
//! to [`super::CheckConfig`] by the loader.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw TOML representation of a full configuration file.
///
/// The file body is the implicit `Checker` root; `[[module]]` tables are its
/// children (typically a single `TreeWalker`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootDto {
    /// Root-level properties (e.g. charset, severity).
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Child modules of the root.
    #[serde(rename = "module", default)]
    pub modules: Vec<ModuleDto>,
}

/// Raw TOML representation of one configured module.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDto {
    /// Module name, resolved through the registry prefixes.
    pub name: String,

    /// Property name to raw value.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Nested child modules.
    #[serde(rename = "module", default)]
    pub modules: Vec<ModuleDto>,
}
