use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

const SCRIPT_ENV: &str = "FINANCE_CORE_CLI_SCRIPT";
const COMMENT_PREFIX: char = '#';

/// Runs the shell, reading commands from stdin when `FINANCE_CORE_CLI_SCRIPT` is set.
pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(?mode, "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandCompleter::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("Finance Core");
    output::hint("Type `help` to list commands.");

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if context.confirm_exit()? => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.trim()).ok();
        }
        if execute(context, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        let line = line?;
        if line.trim_start().starts_with(COMMENT_PREFIX) {
            continue;
        }
        if !context.running || execute(context, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Runs one input line, reporting command failures without stopping the shell.
fn execute(context: &mut ShellContext, line: &str) -> LoopControl {
    let line = line.trim();
    if line.is_empty() {
        return LoopControl::Continue;
    }
    context.last_command = Some(line.to_string());

    let outcome = tokenize(line).and_then(|tokens| match tokens.split_first() {
        Some((name, rest)) => {
            let args: Vec<&str> = rest.iter().map(String::as_str).collect();
            context.dispatch(&name.to_lowercase(), name, &args)
        }
        None => Ok(LoopControl::Continue),
    });

    match outcome {
        Ok(LoopControl::Exit) => {
            context.running = false;
            LoopControl::Exit
        }
        Ok(LoopControl::Continue) => LoopControl::Continue,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(line)
        .map_err(|err| CommandError::InvalidArguments(format!("could not parse command: {err}")))
}

/// Completes the command word; arguments are free text.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let word = typed.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = typed.len() - word.len();
        Ok((start, self.candidates(&word.to_ascii_lowercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = tokenize(r#"add "Weekly groceries" 42.5 expense food 2024-01-02"#).unwrap();
        assert_eq!(tokens[1], "Weekly groceries");
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = tokenize(r#"add "Coffee 3"#).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(ref msg)
            if msg.starts_with("could not parse command")));
    }

    #[test]
    fn completer_offers_sorted_unique_matches() {
        let completer = CommandCompleter::new(vec!["summary", "save", "balance", "save"]);
        let names: Vec<_> = completer
            .candidates("s")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, ["save", "summary"]);
    }
}
