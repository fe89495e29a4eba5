//! The interactive expansion REPL.
//!
//! Each complete declaration typed at the prompt is expanded and the
//! rewritten source is printed, followed by any diagnostics.

use std::io::{self, Write};

use copywith_foundation::{Error, ErrorKind, Result};
use copywith_syntax::{Lexer, TokenKind};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::session::{Expansion, ExpansionSession};

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Expansion state (registry and configuration).
    session: ExpansionSession,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: ExpansionSession::new(),
            show_banner: true,
            prompt: "swift> ".to_string(),
            continuation_prompt: "  ...> ".to_string(),
        }
    }

    /// Sets the expansion session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: ExpansionSession) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &ExpansionSession {
        &self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        let mut keywords: Vec<String> = self
            .session
            .registry()
            .macro_names()
            .into_iter()
            .map(String::from)
            .collect();
        keywords.extend(COMMANDS.iter().map(|(name, _)| (*name).to_string()));
        keywords.extend(DECLARATION_KEYWORDS.iter().map(|kw| (*kw).to_string()));
        self.editor.set_keywords(keywords);

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        if input.trim().is_empty() {
            return Ok(true);
        }

        self.editor.add_history(&input);

        match self.eval(&input)? {
            Outcome::Quit => Ok(false),
            Outcome::Output(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
                Ok(true)
            }
        }
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if first_line {
                        input = line;
                    } else {
                        input.push('\n');
                        input.push_str(&line);
                    }

                    if is_complete(&input) {
                        return Ok(Some(input));
                    }

                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Evaluates one complete input: a `:command` or Swift source.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the source cannot be parsed.
    pub fn eval(&mut self, input: &str) -> Result<Outcome> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return Ok(self.run_command(command));
        }

        let expansion = self.session.expand_source(input)?;
        Ok(Outcome::Output(format_expansion(&expansion)))
    }

    /// Handles a `:command`.
    fn run_command(&mut self, command: &str) -> Outcome {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let text = match (name, arg) {
            ("quit" | "q", _) => return Outcome::Quit,
            ("help" | "h", _) => help_text(),
            ("macros", _) => self
                .session
                .registry()
                .macro_names()
                .iter()
                .map(|name| format!("@{name}"))
                .collect::<Vec<_>>()
                .join("\n"),
            ("strict", None) => format!(
                "strict inference is {}",
                on_off(self.session.config().strict_inference)
            ),
            ("strict", Some(value @ ("on" | "off"))) => {
                self.session.config_mut().strict_inference = value == "on";
                format!("strict inference is {value}")
            }
            ("strict", Some(other)) => format!("expected `on` or `off`, got `{other}`"),
            (other, _) => format!("unknown command `:{other}`; try :help"),
        };
        Outcome::Output(text)
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mcopywith\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type an annotated declaration to expand it. :help for commands, Ctrl+D to exit.\n");

        let _ = io::stdout().flush();
    }
}

/// What evaluating one input produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the user.
    Output(String),
    /// The user asked to leave.
    Quit,
}

const COMMANDS: &[(&str, &str)] = &[
    (":help", "show this message"),
    (":macros", "list the available attributes"),
    (":strict [on|off]", "show or set strict type inference"),
    (":quit", "exit the REPL"),
];

const DECLARATION_KEYWORDS: &[&str] = &[
    "struct",
    "class",
    "actor",
    "protocol",
    "public",
    "internal",
    "fileprivate",
    "private",
    "open",
    "let",
    "var",
    "AnyObject",
];

fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(name, about)| format!("  {name:<18} {about}"))
        .collect::<Vec<_>>()
        .join("\n")
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Renders the rewritten source followed by one line per diagnostic.
fn format_expansion(expansion: &Expansion) -> String {
    let mut out = expansion.source.trim_end().to_string();
    for diagnostic in &expansion.diagnostics {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("\x1b[31m{diagnostic}\x1b[0m"));
    }
    out
}

/// Prints an error to stderr.
fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}

/// Checks whether `input` is ready to expand.
///
/// Input is incomplete while a bracket is open, a string or block comment is
/// unterminated, or it ends in an attribute with nothing to attach to.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    if input.trim_start().starts_with(':') {
        return true;
    }

    let tokens = Lexer::tokenize_all(input);
    let mut depth = 0i32;
    for token in &tokens {
        if let TokenKind::Error(message) = &token.kind {
            if message.starts_with("unterminated") {
                return false;
            }
        } else if token.is_open_delimiter() {
            depth += 1;
        } else if token.is_close_delimiter() {
            depth -= 1;
        }
    }
    if depth > 0 {
        return false;
    }

    let significant: Vec<&TokenKind> = tokens
        .iter()
        .map(|token| &token.kind)
        .filter(|kind| !kind.is_trivia() && **kind != TokenKind::Eof)
        .collect();
    !matches!(
        significant.as_slice(),
        [.., TokenKind::At] | [.., TokenKind::At, TokenKind::Identifier(_)]
    )
}
