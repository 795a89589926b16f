//! Style ranges for an editable text surface.
//!
//! The surface keeps the raw markup. Inline delimiters get a `Hidden` range
//! instead of being removed, so saving what the user edited loses nothing.

use serde::Serialize;

use crate::markup::{InlineKind, LineKind, Markup};
use crate::theme::{Appearance, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Highlight,
    Important,
    Code,
    Hidden,
    ChecklistDone,
    ChecklistPending,
    ListBullet,
}

impl From<InlineKind> for TextStyle {
    fn from(kind: InlineKind) -> Self {
        match kind {
            InlineKind::Highlight => TextStyle::Highlight,
            InlineKind::Important => TextStyle::Important,
            InlineKind::Code => TextStyle::Code,
        }
    }
}

impl From<LineKind> for TextStyle {
    fn from(kind: LineKind) -> Self {
        match kind {
            LineKind::ChecklistDone => TextStyle::ChecklistDone,
            LineKind::ChecklistPending => TextStyle::ChecklistPending,
            LineKind::ListItem => TextStyle::ListBullet,
        }
    }
}

/// `start..end` in characters of the buffer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
}

impl StyleRange {
    fn new(range: std::ops::Range<usize>, style: TextStyle) -> Self {
        Self { start: range.start, end: range.end, style }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

pub fn style_ranges(text: &str) -> Vec<StyleRange> {
    style_ranges_from(&Markup::extract(text))
}

/// Inline spans first (content, then both markers), then whole lines.
pub fn style_ranges_from(markup: &Markup) -> Vec<StyleRange> {
    let mut ranges = Vec::with_capacity(markup.inline.len() * 3 + markup.lines.len());
    for span in &markup.inline {
        ranges.push(StyleRange::new(span.content.clone(), span.kind.into()));
        ranges.push(StyleRange::new(span.open.clone(), TextStyle::Hidden));
        ranges.push(StyleRange::new(span.close.clone(), TextStyle::Hidden));
    }
    for line in &markup.lines {
        ranges.push(StyleRange::new(line.range.clone(), line.kind.into()));
    }
    ranges
}

/// Text plus the style ranges currently applied to it.
#[derive(Debug, Clone, Default)]
pub struct StyledBuffer {
    text: String,
    ranges: Vec<StyleRange>,
    editable: bool,
}

impl StyledBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Replace the whole text. Existing ranges point into the old text, so
    /// they are dropped; call [`StyledBuffer::apply_styling`] afterwards.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.ranges.clear();
    }

    pub fn clear_styles(&mut self) {
        self.ranges.clear();
    }

    /// Clear, then recompute every range from the current text.
    pub fn apply_styling(&mut self) {
        self.clear_styles();
        self.ranges = style_ranges(&self.text);
    }

    pub fn styles_at(&self, offset: usize) -> Vec<TextStyle> {
        self.ranges
            .iter()
            .filter(|r| r.contains(offset))
            .map(|r| r.style)
            .collect()
    }

    /// What a reader sees: the text with hidden ranges elided.
    pub fn visible_text(&self) -> String {
        self.text
            .chars()
            .enumerate()
            .filter(|(i, _)| {
                !self
                    .ranges
                    .iter()
                    .any(|r| r.style == TextStyle::Hidden && r.contains(*i))
            })
            .map(|(_, ch)| ch)
            .collect()
    }

    pub fn themed_ranges(&self, theme: &Theme) -> Vec<ThemedRange> {
        self.ranges
            .iter()
            .map(|r| ThemedRange {
                start: r.start,
                end: r.end,
                style: r.style,
                appearance: theme.appearance(r.style),
            })
            .collect()
    }
}

/// A range resolved against a theme, as handed to a front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemedRange {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
    pub appearance: Appearance,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn of(ranges: &[StyleRange], style: TextStyle) -> Vec<(usize, usize)> {
        ranges
            .iter()
            .filter(|r| r.style == style)
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn inline_spans_get_visible_and_hidden_ranges() {
        let ranges = style_ranges("a <h>B</h> c <i>D</i>");
        assert_eq!(of(&ranges, TextStyle::Highlight), vec![(5, 6)]);
        assert_eq!(of(&ranges, TextStyle::Important), vec![(16, 17)]);
        assert_eq!(
            of(&ranges, TextStyle::Hidden),
            vec![(2, 5), (6, 10), (13, 16), (17, 21)]
        );
    }

    #[test]
    fn classified_lines_cover_the_whole_line() {
        let ranges = style_ranges("Title\n[x] done\n[ ] todo\n1. one");
        assert_eq!(of(&ranges, TextStyle::ChecklistDone), vec![(6, 14)]);
        assert_eq!(of(&ranges, TextStyle::ChecklistPending), vec![(15, 23)]);
        assert_eq!(of(&ranges, TextStyle::ListBullet), vec![(24, 30)]);
        assert!(of(&ranges, TextStyle::Hidden).is_empty());
    }

    #[test]
    fn buffer_keeps_raw_text_and_elides_markers() {
        let mut buf = StyledBuffer::new();
        buf.set_text("see <c>ls -la</c> [ ] no");
        buf.apply_styling();
        assert_eq!(buf.text(), "see <c>ls -la</c> [ ] no");
        assert_eq!(buf.visible_text(), "see ls -la [ ] no");
        assert_eq!(buf.styles_at(7), vec![TextStyle::Code]);
        assert_eq!(buf.styles_at(4), vec![TextStyle::Hidden]);
    }

    #[test]
    fn restyling_does_not_accumulate() {
        let mut buf = StyledBuffer::new();
        buf.set_text("* <h>x</h>");
        buf.apply_styling();
        let first = buf.ranges().to_vec();
        buf.apply_styling();
        assert_eq!(buf.ranges(), first.as_slice());
    }

    #[test]
    fn replacing_text_drops_stale_ranges() {
        let mut buf = StyledBuffer::new();
        buf.set_text("<h>old</h>");
        buf.apply_styling();
        buf.set_text("new");
        assert!(buf.ranges().is_empty());
    }

    #[test]
    fn checklist_markers_stay_visible() {
        let mut buf = StyledBuffer::new();
        buf.set_text("[x] done");
        buf.apply_styling();
        assert_eq!(buf.visible_text(), "[x] done");
        assert_eq!(buf.styles_at(0), vec![TextStyle::ChecklistDone]);
    }

    #[test]
    fn themed_ranges_carry_appearance() {
        let mut buf = StyledBuffer::new();
        buf.set_text("<i>!</i>");
        buf.apply_styling();
        let themed = buf.themed_ranges(Theme::resolve("Light"));
        let important = themed
            .iter()
            .find(|r| r.style == TextStyle::Important)
            .unwrap();
        assert_eq!(important.appearance.foreground, Some("#D93025"));
        assert!(important.appearance.bold);
    }
}
