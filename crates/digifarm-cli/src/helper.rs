use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

const COMMANDS: &[&str] = &[
    "login", "logout", "whoami", "go", "upload", "analyze", "cancel", "clear", "status",
    "market", "product", "qty", "help", "quit",
];

const ROUTES: &[&str] = &[
    "/login",
    "/admin",
    "/dashboard",
    "/disease-detection",
    "/marketplace",
    "/marketplace/1",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
pub struct CliHelper {
    files: FilenameCompleter,
    masking: bool,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
            masking: false,
        }
    }

    /// While masking, the line is drawn as `*` and no hints are shown.
    pub fn set_masking(&mut self, masking: bool) {
        self.masking = masking;
    }
}

impl Default for CliHelper {
    fn default() -> Self {
        Self::new()
    }
}

fn candidates(options: &[&str], prefix: &str) -> Vec<Pair> {
    options
        .iter()
        .filter(|option| option.starts_with(prefix))
        .map(|option| Pair {
            display: option.to_string(),
            replacement: option.to_string(),
        })
        .collect()
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];

        match head.split_once(' ') {
            None => Ok((0, candidates(COMMANDS, head))),
            Some(("upload", _)) => self.files.complete(line, pos, ctx),
            Some(("go", arg)) => Ok((pos - arg.len(), candidates(ROUTES, arg))),
            Some(_) => Ok((pos, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            return Owned("*".repeat(line.chars().count()));
        }
        match line.split_whitespace().next() {
            Some(word) if COMMANDS.contains(&word) => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
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

        if self.masking || line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}
