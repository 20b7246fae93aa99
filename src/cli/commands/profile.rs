//! Profile and session commands backed by the key-value state file.

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::profile::{Profile, ProfileStore, Session};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "profile",
            "Show or edit the stored user profile",
            "profile [show|set <field> <value>|clear]",
            cmd_profile,
        ),
        CommandEntry::new(
            "session",
            "Inspect or change the stored auth token",
            "session [status|login <token>|logout]",
            cmd_session,
        ),
    ]
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let store = ProfileStore::new(&context.state);
    match args.split_first() {
        None => show_profile(&store.load()?),
        Some((action, rest)) => match action.to_ascii_lowercase().as_str() {
            "show" => show_profile(&store.load()?),
            "set" => {
                let Some((field, value)) = rest.split_first() else {
                    return Err(CommandError::InvalidArguments(
                        "usage: profile set <field> <value>".into(),
                    ));
                };
                let mut profile = store.load()?;
                if !profile.set_field(field, &value.join(" ")) {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown profile field `{field}`; expected one of {}",
                        Profile::FIELDS.join(", ")
                    )));
                }
                store.save(&profile)?;
                output::success(format!("Profile {field} updated."));
            }
            "clear" => {
                if store.clear()? {
                    output::success("Profile cleared.");
                } else {
                    output::info("No profile stored.");
                }
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown profile action `{other}`"
                )))
            }
        },
    }
    Ok(())
}

fn show_profile(profile: &Profile) {
    output::section("Profile");
    let rows = [
        ("Name", profile.name.as_str()),
        ("Email", profile.email.as_str()),
        ("Phone", profile.phone.as_str()),
        ("Address", profile.address.as_str()),
        ("Birthday", profile.birthday.as_str()),
        ("Image", profile.profile_image_uri.as_deref().unwrap_or("")),
    ];
    for (label, value) in rows {
        let value = if value.is_empty() { "-" } else { value };
        output::info(format!("  {label:<9}: {value}"));
    }
}

fn cmd_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let session = Session::new(&context.state);
    match args {
        [] | ["status"] => {
            if session.is_authenticated()? {
                output::info("Signed in.");
            } else {
                output::info("Signed out.");
            }
        }
        ["login", token] => {
            session.store_token(token)?;
            output::success("Token stored.");
        }
        ["logout"] => {
            if session.logout()? {
                output::success("Signed out.");
            } else {
                output::info("No session to clear.");
            }
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: session [status|login <token>|logout]".into(),
            ))
        }
    }
    Ok(())
}
