use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use docent_application::StudySession;
use docent_core::{MessageRole, Transcript, TranscriptEntry};
use docent_infrastructure::{DocentPaths, load_document};

mod bootstrap;
mod commands;
mod logging;

use commands::{HELP_TEXT, ReplCommand, SLASH_COMMANDS, parse_line};

#[derive(Parser)]
#[command(name = "docent", version)]
#[command(about = "Docent - ask questions answered only from your study documents", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and logs
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Model identifier, overriding config.toml
    #[arg(long)]
    model: Option<String>,

    /// Mirror logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: SLASH_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_entry(entry: &TranscriptEntry) {
    match entry.role {
        MessageRole::User => println!("{}", format!("> {}", entry.text).green()),
        MessageRole::Assistant => {
            for line in entry.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        MessageRole::SystemError => println!("{}", entry.text.red()),
    }
}

fn print_info(text: impl AsRef<str>) {
    println!("{}", text.as_ref().bright_black());
}

fn print_error(text: impl AsRef<str>) {
    eprintln!("{}", text.as_ref().red());
}

/// Prints the entries added since `seen`, returning the new length.
fn print_new_entries(transcript: &Transcript, seen: usize) -> usize {
    for entry in transcript.entries().iter().skip(seen) {
        print_entry(entry);
    }
    transcript.len()
}

async fn group_id_at(session: &StudySession, index: usize) -> Option<String> {
    session
        .groups()
        .await
        .get(index)
        .map(|g| g.id().to_string())
}

/// Handles one command. Returns `false` when the REPL should stop.
async fn dispatch(session: &StudySession, command: ReplCommand, seen: &mut usize) -> bool {
    match command {
        ReplCommand::CreateGroup(name) => match session.create_group(&name).await {
            Ok(_) => print_info(format!(
                "Created group #{} \"{}\"",
                session.groups().await.len(),
                name
            )),
            Err(e) => print_error(e.to_string()),
        },
        ReplCommand::AddFiles { group, paths } => {
            let Some(group_id) = group_id_at(session, group).await else {
                print_error(format!("No group #{}", group + 1));
                return true;
            };
            let mut documents = Vec::new();
            for path in &paths {
                match load_document(path).await {
                    Ok(doc) => documents.push(doc),
                    Err(e) => print_error(e.to_string()),
                }
            }
            let offered = documents.len();
            match session.add_documents(&group_id, documents).await {
                Ok(added) => print_info(format!(
                    "Added {} file(s), skipped {} duplicate(s)",
                    added,
                    offered - added
                )),
                Err(e) => print_error(e.to_string()),
            }
        }
        ReplCommand::ListGroups => {
            let groups = session.groups().await;
            if groups.is_empty() {
                print_info("No groups yet. Create one with /group <name>");
            }
            for (i, group) in groups.iter().enumerate() {
                println!("#{} {} ({} files)", i + 1, group.name().bold(), group.document_count());
                for doc in group.documents() {
                    print_info(format!("    {} [{}]", doc.name(), doc.media_type()));
                }
            }
        }
        ReplCommand::Open(index) => {
            let Some(group_id) = group_id_at(session, index).await else {
                print_error(format!("No group #{}", index + 1));
                return true;
            };
            match session.start_session(&group_id).await {
                Ok(transcript) => {
                    *seen = print_new_entries(&transcript, 0);
                    if !session.has_credential() {
                        print_info("No API key on file yet. Set one with /key <api key>");
                    }
                }
                Err(e) => print_error(e.to_string()),
            }
        }
        ReplCommand::Scope(selection) => match session.set_scope(selection.clone()).await {
            Ok(()) => print_info(format!("Scope: {}", selection)),
            Err(e) => print_error(e.to_string()),
        },
        ReplCommand::Key(value) => match session.submit_credential(&value) {
            Ok(()) => print_info("API key saved"),
            Err(e) => print_error(e.to_string()),
        },
        ReplCommand::Back => {
            session.exit_session().await;
            *seen = 0;
            print_info("Left the chat");
        }
        ReplCommand::Help => print_info(HELP_TEXT),
        ReplCommand::Quit => return false,
        ReplCommand::Ask(question) => {
            if session.active_group().await.is_none() {
                print_error("Open a group first with /open <group#>");
                return true;
            }
            print_info("...");
            match session.send_question(&question).await {
                Ok(transcript) => *seen = print_new_entries(&transcript, *seen),
                Err(e) => print_error(e.to_string()),
            }
        }
        ReplCommand::Usage(usage) => print_error(format!("Usage: {}", usage)),
        ReplCommand::Unknown(command) => {
            print_error(format!("Unknown command {}. Type /help", command))
        }
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DocentPaths::new(cli.config_dir.as_deref());
    let logs_dir = paths.logs_dir().map_err(|e| anyhow!("{}", e))?;
    let _log_guard = logging::init(&logs_dir, cli.verbose)?;

    let session = bootstrap::bootstrap(&paths, cli.model)?;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Docent ===".bright_magenta().bold());
    print_info("Type /help for commands.");
    println!();

    let mut seen = 0usize;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let Some(command) = parse_line(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.as_str());

                if !dispatch(&session, command, &mut seen).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                print_error(format!("Error: {:?}", err));
                break;
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
