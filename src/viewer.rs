//! The terminal companion: tag search and the interactive read/edit/delete
//! loop. Everything human-facing goes to the diagnostic stream; only the
//! `ACTION:` line goes to `out`, so a wrapping shell can capture it.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::formatting::FormatContext;
use crate::note::Note;
use crate::render::TerminalRenderer;
use crate::tags::{filter_by_tag, normalize_query};

/// Handed back to the driving shell, which performs the change itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit(usize),
    Delete(usize),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Edit(i) => write!(f, "ACTION:EDIT:{i}"),
            Action::Delete(i) => write!(f, "ACTION:DELETE:{i}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Action(Action),
}

/// One line typed at the prompt. Numbers are 1-based as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Read(usize),
    Edit(usize),
    Delete(usize),
    /// Looked like a command but the number did not parse.
    BadFormat,
    Unknown,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let choice = line.trim().to_lowercase();
        if choice == "q" || choice == "/quit" {
            return Command::Quit;
        }
        let (ctor, digits): (fn(usize) -> Command, &str) =
            if let Some(rest) = choice.strip_prefix('d') {
                (Command::Delete as fn(usize) -> Command, rest)
            } else if let Some(rest) = choice.strip_prefix('r') {
                (Command::Read as fn(usize) -> Command, rest)
            } else {
                (Command::Edit as fn(usize) -> Command, choice.as_str())
            };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Command::Unknown;
        }
        match digits.parse() {
            Ok(n) => ctor(n),
            Err(_) => Command::BadFormat,
        }
    }
}

pub struct Viewer<'a> {
    notes: &'a [Note],
    ctx: &'a FormatContext,
    renderer: TerminalRenderer,
}

impl<'a> Viewer<'a> {
    /// `notes` must already be in display order (newest first).
    pub fn new(notes: &'a [Note], ctx: &'a FormatContext) -> Self {
        Self { notes, ctx, renderer: TerminalRenderer::new(ctx.use_color) }
    }

    /// Print every note tagged `term`. Returns how many matched.
    pub fn search(&self, term: &str, diag: &mut impl Write) -> io::Result<usize> {
        let query = normalize_query(term);
        let matches = filter_by_tag(self.notes, &query);
        if matches.is_empty() {
            writeln!(
                diag,
                "{}",
                self.ctx.format_warning(&format!("No notes found with the tag '{query}'."))
            )?;
            return Ok(0);
        }

        writeln!(
            diag,
            "{}\n",
            self.ctx.format_header(&format!("--- Search Results for tag: '{query}' ---"))
        )?;
        for idx in &matches {
            let note = &self.notes[*idx];
            let parsed = note.parsed();
            writeln!(diag, "{}", self.ctx.note_heading(&note.display_date(), &parsed.title))?;
            writeln!(diag, "{}\n---", self.renderer.render(&parsed.body))?;
        }
        Ok(matches.len())
    }

    pub fn list(&self, diag: &mut impl Write) -> io::Result<()> {
        writeln!(diag, "{}\n", self.ctx.format_header("--- Your Annotations ---"))?;
        for (i, note) in self.notes.iter().enumerate() {
            writeln!(
                diag,
                "{} {} - {}",
                self.ctx.format_index(i + 1),
                self.ctx.format_date(&note.display_date()),
                note.title()
            )?;
        }
        Ok(())
    }

    /// Print the note at zero-based `index`; `false` if there is none.
    pub fn read(&self, index: usize, diag: &mut impl Write) -> io::Result<bool> {
        let Some(note) = self.notes.get(index) else {
            writeln!(diag, "{}", self.ctx.format_error("Invalid note number."))?;
            return Ok(false);
        };
        let parsed = note.parsed();
        writeln!(diag, "\n{}", self.ctx.format_header("--- Viewing Note ---"))?;
        writeln!(diag, "{}", self.ctx.note_heading(&note.display_date(), &parsed.title))?;
        writeln!(diag, "---")?;
        writeln!(diag, "{}", self.renderer.render(&parsed.body))?;
        writeln!(diag, "{}", self.ctx.format_header("--- End of Note ---"))?;
        Ok(true)
    }

    /// List the notes, then read commands until quit, EOF, or an edit/delete
    /// choice. The chosen action is written to `out` as `ACTION:<KIND>:<i>`
    /// with a zero-based index.
    pub fn interactive(
        &self,
        input: &mut impl BufRead,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> io::Result<Outcome> {
        if self.notes.is_empty() {
            writeln!(
                diag,
                "{}",
                self.ctx.format_warning("No annotations yet. Use 'anno add' to create one.")
            )?;
            return Ok(Outcome::Quit);
        }
        self.list(diag)?;

        let mut line = String::new();
        loop {
            writeln!(
                diag,
                "\n{}",
                self.ctx.format_title("Actions: (r)ead, (e)dit, (d)elete, (q)uit")
            )?;
            write!(diag, "Enter command: ")?;
            diag.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(diag, "\nExiting.")?;
                return Ok(Outcome::Quit);
            }

            let (number, action) = match Command::parse(&line) {
                Command::Quit => return Ok(Outcome::Quit),
                Command::Read(n) => (n, None),
                Command::Edit(n) => (n, Some(Action::Edit(n.saturating_sub(1)))),
                Command::Delete(n) => (n, Some(Action::Delete(n.saturating_sub(1)))),
                Command::BadFormat => {
                    writeln!(diag, "{}", self.ctx.format_error("Invalid command format."))?;
                    continue;
                }
                Command::Unknown => {
                    writeln!(
                        diag,
                        "{}",
                        self.ctx.format_error("Invalid command. Please try again.")
                    )?;
                    continue;
                }
            };

            if number == 0 || number > self.notes.len() {
                writeln!(
                    diag,
                    "{}",
                    self.ctx.format_error(&format!("Invalid note number: {number}"))
                )?;
                continue;
            }

            match action {
                None => {
                    self.read(number - 1, diag)?;
                }
                Some(action) => {
                    writeln!(out, "{action}")?;
                    out.flush()?;
                    return Ok(Outcome::Action(action));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn notes() -> Vec<Note> {
        vec![
            Note {
                timestamp: "2024-05-02T08:00:00".into(),
                content: "Sprint\n[work, #Plan]\n[x] ship <c>v2</c>\n* retro".into(),
            },
            Note { timestamp: "2024-05-01T08:00:00".into(), content: "Groceries\nmilk".into() },
        ]
    }

    fn run(input: &str) -> (Outcome, String, String) {
        let notes = notes();
        let ctx = FormatContext::new(false);
        let viewer = Viewer::new(&notes, &ctx);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let outcome = viewer
            .interactive(&mut Cursor::new(input.as_bytes()), &mut out, &mut diag)
            .unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse(" /QUIT "), Command::Quit);
        assert_eq!(Command::parse("3"), Command::Edit(3));
        assert_eq!(Command::parse("d2"), Command::Delete(2));
        assert_eq!(Command::parse("R1"), Command::Read(1));
        assert_eq!(Command::parse("x1"), Command::Unknown);
        assert_eq!(Command::parse("d"), Command::Unknown);
        assert_eq!(Command::parse("99999999999999999999999"), Command::BadFormat);
    }

    #[test]
    fn edit_emits_zero_based_action() {
        let (outcome, out, diag) = run("2\n");
        assert_eq!(outcome, Outcome::Action(Action::Edit(1)));
        assert_eq!(out, "ACTION:EDIT:1\n");
        assert!(diag.contains("1: 2024-05-02 08:00 AM - Sprint"));
    }

    #[test]
    fn delete_emits_action() {
        let (outcome, out, _) = run("d1\n");
        assert_eq!(outcome, Outcome::Action(Action::Delete(0)));
        assert_eq!(out, "ACTION:DELETE:0\n");
    }

    #[test]
    fn read_continues_the_loop() {
        let (outcome, out, diag) = run("r1\nq\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(out.is_empty());
        assert!(diag.contains("--- Viewing Note ---"));
        assert!(diag.contains("✔ ship v2"));
        assert!(diag.contains("• retro"));
    }

    #[test]
    fn bad_numbers_are_reported_not_fatal() {
        let (outcome, out, diag) = run("7\nd0\nhello\n1\n");
        assert_eq!(outcome, Outcome::Action(Action::Edit(0)));
        assert_eq!(out, "ACTION:EDIT:0\n");
        assert!(diag.contains("Invalid note number: 7"));
        assert!(diag.contains("Invalid note number: 0"));
        assert!(diag.contains("Invalid command. Please try again."));
    }

    #[test]
    fn eof_exits_quietly() {
        let (outcome, out, diag) = run("");
        assert_eq!(outcome, Outcome::Quit);
        assert!(out.is_empty());
        assert!(diag.contains("Exiting."));
    }

    #[test]
    fn search_prints_matches() {
        let notes = notes();
        let ctx = FormatContext::new(false);
        let viewer = Viewer::new(&notes, &ctx);
        let mut diag = Vec::new();
        assert_eq!(viewer.search("#PLAN", &mut diag).unwrap(), 1);
        let text = String::from_utf8(diag).unwrap();
        assert!(text.contains("--- Search Results for tag: 'plan' ---"));
        assert!(text.contains("2024-05-02 08:00 AM - Sprint"));
        assert!(text.contains("✔ ship v2"));
        assert!(!text.contains("Groceries"));

        let mut diag = Vec::new();
        assert_eq!(viewer.search("nothing", &mut diag).unwrap(), 0);
        assert!(String::from_utf8(diag).unwrap().contains("No notes found with the tag 'nothing'."));
    }
}
