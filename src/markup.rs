//! Markup scanning shared by the terminal and rich-text renderers.
//!
//! [`Markup::extract`] is the only place that runs the patterns. It produces
//! a span list in character offsets; renderers consume that list and never
//! look at the raw delimiters themselves.
//!
//! Two independent passes run over the same text:
//! - inline spans `<h>..</h>`, `<i>..</i>`, `<c>..</c>`, scanned per kind in
//!   that fixed order with a lazy, dot-matches-newline pattern;
//! - line classification (`[x]`, `[ ]`, `*`/`-`, `1.`), first match wins.
//!
//! Delimiters never contain a newline and line markers never contain `<`, so
//! the marker ranges of the two passes are always disjoint and a checklist
//! line can carry inline spans.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Every kind of region the parser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Highlight,
    Important,
    Code,
    ChecklistDone,
    ChecklistPending,
    ListItem,
}

impl SpanKind {
    pub fn is_inline(self) -> bool {
        matches!(self, SpanKind::Highlight | SpanKind::Important | SpanKind::Code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Highlight,
    Important,
    Code,
}

impl InlineKind {
    /// Scan order. Kinds are matched independently; no nesting is inferred.
    pub const ALL: [InlineKind; 3] =
        [InlineKind::Highlight, InlineKind::Important, InlineKind::Code];

    pub fn tag(self) -> &'static str {
        match self {
            InlineKind::Highlight => "h",
            InlineKind::Important => "i",
            InlineKind::Code => "c",
        }
    }

    pub fn span_kind(self) -> SpanKind {
        match self {
            InlineKind::Highlight => SpanKind::Highlight,
            InlineKind::Important => SpanKind::Important,
            InlineKind::Code => SpanKind::Code,
        }
    }

    fn pattern(self) -> &'static Regex {
        static H: OnceLock<Regex> = OnceLock::new();
        static I: OnceLock<Regex> = OnceLock::new();
        static C: OnceLock<Regex> = OnceLock::new();
        let cell = match self {
            InlineKind::Highlight => &H,
            InlineKind::Important => &I,
            InlineKind::Code => &C,
        };
        cell.get_or_init(|| {
            let tag = self.tag();
            Regex::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>")).expect("valid regex")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    ChecklistDone,
    ChecklistPending,
    ListItem,
}

impl LineKind {
    pub fn glyph(self) -> &'static str {
        match self {
            LineKind::ChecklistDone => "✔",
            LineKind::ChecklistPending => "☐",
            LineKind::ListItem => "•",
        }
    }

    pub fn span_kind(self) -> SpanKind {
        match self {
            LineKind::ChecklistDone => SpanKind::ChecklistDone,
            LineKind::ChecklistPending => SpanKind::ChecklistPending,
            LineKind::ListItem => SpanKind::ListItem,
        }
    }
}

/// One `<tag>content</tag>` occurrence. All ranges are character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub kind: InlineKind,
    pub content: Range<usize>,
    pub open: Range<usize>,
    pub close: Range<usize>,
}

impl InlineSpan {
    pub fn outer(&self) -> Range<usize> {
        self.open.start..self.close.end
    }
}

/// A classified physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    pub kind: LineKind,
    /// Zero-based line number within the scanned text.
    pub line: usize,
    /// Whole line, excluding its newline.
    pub range: Range<usize>,
    /// Leading whitespace, the marker itself and whitespace after it.
    pub marker: Range<usize>,
    /// Remainder after the marker with leading whitespace trimmed.
    pub text: String,
}

/// Flat view of a span: what a consumer needs when it only styles ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub kind: SpanKind,
    pub range: Range<usize>,
    /// Marker text that stays in the buffer but is never shown.
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub inline: Vec<InlineSpan>,
    pub lines: Vec<LineSpan>,
}

impl Markup {
    pub fn extract(text: &str) -> Self {
        let offsets = CharOffsets::new(text);
        Self {
            inline: scan_inline(text, &offsets),
            lines: scan_lines(text, &offsets),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.lines.is_empty()
    }

    /// Styled content of inline spans followed by classified lines.
    pub fn visible(&self) -> Vec<MarkupSpan> {
        let inline = self.inline.iter().map(|s| MarkupSpan {
            kind: s.kind.span_kind(),
            range: s.content.clone(),
            hidden: false,
        });
        let lines = self.lines.iter().map(|l| MarkupSpan {
            kind: l.kind.span_kind(),
            range: l.range.clone(),
            hidden: false,
        });
        inline.chain(lines).collect()
    }

    /// Opening and closing delimiters of every inline span.
    pub fn hidden(&self) -> Vec<MarkupSpan> {
        self.inline
            .iter()
            .flat_map(|s| {
                let kind = s.kind.span_kind();
                [
                    MarkupSpan { kind, range: s.open.clone(), hidden: true },
                    MarkupSpan { kind, range: s.close.clone(), hidden: true },
                ]
            })
            .collect()
    }

    pub fn spans(&self) -> Vec<MarkupSpan> {
        let mut all = self.visible();
        all.extend(self.hidden());
        all
    }

    pub fn line(&self, line: usize) -> Option<&LineSpan> {
        self.lines.iter().find(|l| l.line == line)
    }
}

/// Classify a single line. Returns the kind and the byte offset where the
/// displayed text starts (marker and surrounding whitespace skipped).
pub fn classify_line(line: &str) -> Option<(LineKind, usize)> {
    fn done() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*\[x\](.*)$").expect("valid regex"))
    }
    fn pending() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*\[ \](.*)$").expect("valid regex"))
    }
    fn bullet() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*[*-](.*)$").expect("valid regex"))
    }
    fn numbered() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*\d+\.(.*)$").expect("valid regex"))
    }

    let rules: [(&Regex, LineKind); 4] = [
        (done(), LineKind::ChecklistDone),
        (pending(), LineKind::ChecklistPending),
        (bullet(), LineKind::ListItem),
        (numbered(), LineKind::ListItem),
    ];
    rules.into_iter().find_map(|(re, kind)| {
        let rest = re.captures(line)?.get(1)?;
        let trimmed = rest.as_str().trim_start();
        Some((kind, rest.start() + (rest.as_str().len() - trimmed.len())))
    })
}

fn scan_inline(text: &str, offsets: &CharOffsets) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for kind in InlineKind::ALL {
        for caps in kind.pattern().captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let content = offsets.range(inner.start()..inner.end());
            spans.push(InlineSpan {
                kind,
                open: offsets.range(whole.start()..inner.start()),
                close: offsets.range(inner.end()..whole.end()),
                content,
            });
        }
    }
    spans
}

fn scan_lines(text: &str, offsets: &CharOffsets) -> Vec<LineSpan> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, line) in text.split('\n').enumerate() {
        if let Some((kind, text_start)) = classify_line(line) {
            lines.push(LineSpan {
                kind,
                line: idx,
                range: offsets.range(start..start + line.len()),
                marker: offsets.range(start..start + text_start),
                text: line[text_start..].to_string(),
            });
        }
        start += line.len() + 1;
    }
    lines
}

/// Byte to character offset conversion for one text.
struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self { starts: text.char_indices().map(|(b, _)| b).collect() }
    }

    fn char_at(&self, byte: usize) -> usize {
        self.starts.partition_point(|&b| b < byte)
    }

    fn range(&self, bytes: Range<usize>) -> Range<usize> {
        self.char_at(bytes.start)..self.char_at(bytes.end)
    }
}
