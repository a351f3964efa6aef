//! Lists the registered checks.

use jstyle_checks::default_registry;

/// Prints every registered check with its description.
pub fn run() {
    let registry = default_registry();
    println!("Available checks:\n");
    for name in registry.registered_names() {
        match registry.create(name) {
            Ok(check) => println!("  {name}\n      {}", check.description()),
            Err(_) => println!("  {name}"),
        }
    }
}
