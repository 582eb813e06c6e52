//! Parsing of REPL input lines.

use docent_core::ScopeSelection;
use std::path::PathBuf;

pub const SLASH_COMMANDS: &[&str] = &[
    "/group", "/add", "/groups", "/open", "/scope", "/key", "/back", "/help", "/quit",
];

pub const HELP_TEXT: &str = "\
/group <name>              create a group
/add <group#> <path>...    add files to a group
/groups                    list groups
/open <group#>             start chatting with a group
/scope all|<file name>     answer from all files or one file
/key <api key>             store the API key
/back                      leave the current chat
/help                      show this help
/quit                      exit
anything else              ask a question in the current chat";

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    CreateGroup(String),
    AddFiles { group: usize, paths: Vec<PathBuf> },
    ListGroups,
    Open(usize),
    Scope(ScopeSelection),
    Key(String),
    Back,
    Help,
    Quit,
    Ask(String),
    /// Recognised command with bad arguments; carries a usage hint.
    Usage(&'static str),
    Unknown(String),
}

/// Parses a line. Returns `None` for blank input.
///
/// Group numbers are 1-based as shown by `/groups`.
pub fn parse_line(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(ReplCommand::Ask(line.to_string()));
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    let parsed = match command {
        "/group" if !rest.is_empty() => ReplCommand::CreateGroup(rest.to_string()),
        "/group" => ReplCommand::Usage("/group <name>"),
        "/add" => {
            let mut words = rest.split_whitespace();
            match (words.next().and_then(parse_index), words.clone().next()) {
                (Some(group), Some(_)) => ReplCommand::AddFiles {
                    group,
                    paths: words.map(PathBuf::from).collect(),
                },
                _ => ReplCommand::Usage("/add <group#> <path>..."),
            }
        }
        "/groups" => ReplCommand::ListGroups,
        "/open" => match parse_index(rest) {
            Some(index) => ReplCommand::Open(index),
            None => ReplCommand::Usage("/open <group#>"),
        },
        "/scope" if rest.is_empty() => ReplCommand::Usage("/scope all|<file name>"),
        "/scope" if rest.eq_ignore_ascii_case("all") => ReplCommand::Scope(ScopeSelection::All),
        "/scope" => ReplCommand::Scope(ScopeSelection::document(rest)),
        "/key" if !rest.is_empty() => ReplCommand::Key(rest.to_string()),
        "/key" => ReplCommand::Usage("/key <api key>"),
        "/back" => ReplCommand::Back,
        "/help" => ReplCommand::Help,
        "/quit" | "/exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    };
    Some(parsed)
}

/// Parses a 1-based group number into a 0-based index.
fn parse_index(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()?.checked_sub(1)
}
