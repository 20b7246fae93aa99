//! Named ledger persistence commands.

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("save", "Save the ledger under a name", "save [name]", cmd_save),
        CommandEntry::new(
            "load",
            "Open a saved ledger, or start a new one with that name",
            "load <name>",
            cmd_load,
        ),
        CommandEntry::new("ledgers", "List saved ledgers", "ledgers", cmd_ledgers),
    ]
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args {
        [] => context
            .manager()
            .current_name()
            .unwrap_or(context.config.ledger_name.as_str())
            .to_string(),
        [name] => name.to_string(),
        _ => return Err(CommandError::InvalidArguments("usage: save [name]".into())),
    };
    let path = context.manager_mut().save(&name)?;
    output::success(format!("Saved `{name}` to {}.", path.display()));
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(CommandError::InvalidArguments("usage: load <name>".into()));
    };
    let existed = context.manager_mut().open_or_create(name)?;
    if existed {
        let count = context.manager().store().len();
        output::success(format!("Loaded `{name}` ({count} transaction(s))."));
    } else {
        output::info(format!("Started new ledger `{name}`."));
    }
    Ok(())
}

fn cmd_ledgers(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.manager().saved_ledgers()?;
    if names.is_empty() {
        output::info("No saved ledgers.");
    }
    for name in names {
        output::info(format!("  {name}"));
    }
    Ok(())
}
