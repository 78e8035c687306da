use std::process::ExitCode;

/// Command-line entry point for the inventory manager
///
/// This is a thin wrapper that delegates to the library crate.
/// All application code, modules, and CLI setup lives in lib.rs.
fn main() -> ExitCode {
    inventory_lib::run()
}
