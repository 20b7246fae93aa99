use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::SummaryPeriod;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("balance", "Show the net balance", "balance", cmd_balance),
        CommandEntry::new(
            "summary",
            "Income, expense, and category totals for a period",
            "summary [weekly|monthly|all] [YYYY-MM-DD]",
            cmd_summary,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let balance = context.manager().balance();
    output::info(format!("Balance: {}", context.format_amount(balance)));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = args
        .first()
        .map(|tag| SummaryPeriod::from_tag(tag))
        .unwrap_or_else(|| context.config.default_period.clone());
    let now = match args.get(1) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date"))
        })?,
        None => context.today(),
    };
    let summary = context.manager_mut().summary(&period, now).clone();
    output::section(format!("{} (as of {now})", period.label()));
    output::info(format!("  Income : {}", context.format_amount(summary.income)));
    output::info(format!("  Expense: {}", context.format_amount(summary.expense)));
    output::info(format!("  Net    : {}", context.format_amount(summary.net())));
    if !summary.categories.is_empty() {
        output::info("  By category:");
        for (category, total) in &summary.categories {
            output::info(format!("    {category:<16} {}", context.format_amount(*total)));
        }
    }
    Ok(())
}
