use std::error::Error;
use std::io::{self, BufRead, Read};

use crate::note::Note;

/// Turn a 1-based list number into an index into `notes`.
pub fn parse_number(notes: &[Note], number: &str) -> Result<usize, Box<dyn Error>> {
    match number.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= notes.len() => Ok(n - 1),
        _ => Err(format!("Invalid note number: {}", number.trim()).into()),
    }
}

/// Index of the note a command should act on: the given number, or else the
/// note last viewed.
pub fn resolve_target(
    notes: &[Note],
    number: Option<&str>,
    last_note: Option<&str>,
) -> Result<usize, Box<dyn Error>> {
    if notes.is_empty() {
        return Err("No annotations yet. Use 'anno add' to create one.".into());
    }
    if let Some(number) = number {
        return parse_number(notes, number);
    }
    let ts = last_note.ok_or("Provide a note number (see `anno list`)")?;
    notes
        .iter()
        .position(|n| n.timestamp == ts)
        .ok_or_else(|| "The last viewed note no longer exists; provide a note number".into())
}

/// Note text from the command line, one argument per line, or from `input`
/// when no arguments were given. Surrounding whitespace is dropped.
pub fn content_from_args(lines: &[String], input: &mut impl Read) -> Result<String, Box<dyn Error>> {
    let content = if lines.is_empty() {
        let mut buf = String::new();
        input.read_to_string(&mut buf)?;
        buf
    } else {
        lines.join("\n")
    };
    let content = content.trim();
    if content.is_empty() {
        return Err("Nothing to add; provide the note text as arguments or on stdin".into());
    }
    Ok(content.to_string())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(input: &mut impl BufRead) -> io::Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
