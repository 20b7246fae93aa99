//! Transaction entry, removal, listing, and backend import commands.

use std::fs;

use crate::cli::commands::take_flag;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{Transaction, TransactionFields, TransactionId};
use crate::sync;

const FIELD_LABELS: [&str; 5] = [
    "Description",
    "Amount",
    "Type (income/expense)",
    "Category",
    "Date (YYYY-MM-DD)",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an income or expense",
            "add <description> <amount> <income|expense> <category> <YYYY-MM-DD|today>",
            cmd_add,
        ),
        CommandEntry::new("remove", "Delete a transaction by id", "remove <id>", cmd_remove),
        CommandEntry::new(
            "list",
            "List transactions, optionally filtered",
            "list [search text] [--kind all|income|expense]",
            cmd_list,
        ),
        CommandEntry::new(
            "import",
            "Replace the ledger with a backend transactions payload",
            "import <file.json>",
            cmd_import,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > FIELD_LABELS.len() {
        return Err(CommandError::InvalidArguments(
            "usage: add <description> <amount> <income|expense> <category> <YYYY-MM-DD|today>"
                .into(),
        ));
    }
    let mut values = Vec::with_capacity(FIELD_LABELS.len());
    for (idx, label) in FIELD_LABELS.iter().enumerate() {
        let value = match args.get(idx) {
            Some(value) => value.to_string(),
            None => context.ask(label)?,
        };
        values.push(value);
    }
    if values[4].trim().eq_ignore_ascii_case("today") {
        values[4] = context.today().format("%Y-%m-%d").to_string();
    }

    let fields = TransactionFields::new(&values[0], &values[1], &values[2], &values[3], &values[4]);
    let txn = context.manager_mut().add(&fields)?;
    context.autosave()?;
    output::success(format!(
        "Added {} {} ({}).",
        txn.id,
        txn.description,
        context.format_amount(txn.signed_amount())
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = match args {
        [id] => TransactionId::from(id.trim()),
        _ => return Err(CommandError::InvalidArguments("usage: remove <id>".into())),
    };
    if context.manager_mut().remove(&id) {
        context.autosave()?;
        output::success(format!("Removed {id}."));
    } else {
        output::warning(format!("No transaction with id `{id}`."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (terms, kind) = take_flag(args, "--kind");
    let term = terms.join(" ");
    let context: &ShellContext = context;
    let manager = context.manager();
    let rows: Vec<Vec<String>> = manager
        .search(&term, kind.unwrap_or("all"))?
        .into_iter()
        .map(|txn| row(context, txn))
        .collect();
    drop(manager);

    if rows.is_empty() {
        output::info("No transactions.");
        return Ok(());
    }
    let count = rows.len();
    for line in output::render_table(
        &["ID", "DATE", "TYPE", "AMOUNT", "CATEGORY", "DESCRIPTION"],
        &rows,
    ) {
        output::info(line);
    }
    output::hint(format!("{count} transaction(s)."));
    Ok(())
}

fn row(context: &ShellContext, txn: &Transaction) -> Vec<String> {
    vec![
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d").to_string(),
        txn.kind.as_str().to_string(),
        context.format_amount(txn.amount),
        txn.category.clone(),
        txn.description.clone(),
    ]
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args {
        [path] => path,
        _ => return Err(CommandError::InvalidArguments("usage: import <file.json>".into())),
    };
    let body = fs::read_to_string(path).map_err(|err| {
        CommandError::InvalidArguments(format!("could not read `{path}`: {err}"))
    })?;
    let records = sync::decode_transactions(&body)
        .map_err(|err| CommandError::InvalidArguments(format!("invalid payload: {err}")))?;
    let count = records.len();
    context.manager_mut().replace_from_remote(records)?;
    context.autosave()?;
    output::success(format!("Imported {count} transaction(s)."));
    Ok(())
}
