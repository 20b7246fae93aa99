pub mod config;
pub mod ledger;
pub mod profile;
pub mod summary;
pub mod system;
pub mod transaction;

use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(summary::definitions());
    commands.extend(ledger::definitions());
    commands.extend(profile::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
    registry.alias("rm", "remove");
    registry.alias("ls", "list");
    registry.alias("quit", "exit");
}

/// Splits `--flag value` pairs out of free-form arguments.
pub(crate) fn take_flag<'a>(args: &[&'a str], flag: &str) -> (Vec<&'a str>, Option<&'a str>) {
    let mut rest = Vec::with_capacity(args.len());
    let mut value = None;
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if arg == flag {
            value = iter.next();
        } else if let Some(inline) = arg.strip_prefix(flag).and_then(|tail| tail.strip_prefix('=')) {
            value = Some(inline);
        } else {
            rest.push(arg);
        }
    }
    (rest, value)
}
