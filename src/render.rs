use std::collections::HashMap;

use yansi::{Attribute, Color, Style};

use crate::markup::{InlineKind, LineKind, Markup};

pub const RESET: &str = "\x1b[0m";

/// What to emit when the walk reaches the start of a marker range.
enum Marker {
    Line(LineKind),
    Open(InlineKind),
    Close,
}

/// Projects a [`Markup`] span list onto a flat string for terminal output.
///
/// Delimiters are removed, inline content is wrapped in its style escape and
/// a reset, and classified lines become `<glyph><reset> <text><reset>`. With
/// color off the same substitution happens without escape sequences, so the
/// glyphs still show up in plain output.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    use_color: bool,
}

impl TerminalRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn render(&self, text: &str) -> String {
        self.apply(text, &Markup::extract(text))
    }

    /// `markup` must have been extracted from `text`.
    pub fn apply(&self, text: &str, markup: &Markup) -> String {
        let mut markers: HashMap<usize, (usize, Marker)> = HashMap::new();
        for span in &markup.inline {
            markers.insert(span.open.start, (span.open.end, Marker::Open(span.kind)));
            markers.insert(span.close.start, (span.close.end, Marker::Close));
        }
        for line in &markup.lines {
            markers.insert(line.marker.start, (line.marker.end, Marker::Line(line.kind)));
        }
        let mut line_ends: Vec<usize> =
            markup.lines.iter().map(|l| l.range.end).collect();
        line_ends.sort_unstable();

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut idx = 0;
        let mut next_end = 0;
        loop {
            if let Some((end, marker)) = markers.get(&idx) {
                self.push_marker(&mut out, marker);
                idx = *end;
                continue;
            }
            if next_end < line_ends.len() && line_ends[next_end] == idx {
                if self.use_color {
                    out.push_str(RESET);
                }
                next_end += 1;
            }
            let Some(ch) = chars.get(idx) else { break };
            out.push(*ch);
            idx += 1;
        }
        out
    }

    fn push_marker(&self, out: &mut String, marker: &Marker) {
        match marker {
            Marker::Line(kind) => {
                if self.use_color {
                    out.push_str(&glyph_style(*kind).prefix());
                    out.push_str(kind.glyph());
                    out.push_str(RESET);
                } else {
                    out.push_str(kind.glyph());
                }
                out.push(' ');
            }
            Marker::Open(kind) => {
                if self.use_color {
                    out.push_str(&inline_style(*kind).prefix());
                }
            }
            Marker::Close => {
                if self.use_color {
                    out.push_str(RESET);
                }
            }
        }
    }
}

pub fn inline_style(kind: InlineKind) -> Style {
    match kind {
        InlineKind::Highlight => Style::new().fg(Color::Black).bg(Color::Yellow),
        InlineKind::Important => {
            Style::new().fg(Color::Red).attr(Attribute::Bold)
        }
        InlineKind::Code => Style::new().fg(Color::Cyan).attr(Attribute::Bold),
    }
}

pub fn glyph_style(kind: LineKind) -> Style {
    match kind {
        LineKind::ChecklistDone => Style::new().fg(Color::Green),
        LineKind::ChecklistPending => Style::new().fg(Color::Red),
        LineKind::ListItem => Style::new().fg(Color::Yellow),
    }
}
