use yansi::{Color, Paint};

/// ANSI colours used for everything around the note bodies.
pub struct ColorPalette {
    pub index: Color,     // list numbers
    pub date: Color,      // timestamps
    pub header: Color,    // section banners
    pub warning: Color,   // empty results
    pub error: Color,     // bad input
}

impl ColorPalette {
    pub const ANSI: Self = Self {
        index: Color::Yellow,
        date: Color::Cyan,
        header: Color::Green,
        warning: Color::Yellow,
        error: Color::Red,
    };
}

/// Formatting context passed through the output paths.
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::ANSI }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var_os("NO_COLOR").is_none();
        Self::new(use_color)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let painted = text.fg(color);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn format_index(&self, n: usize) -> String {
        self.paint(&format!("{n}:"), self.palette.index, false)
    }

    pub fn format_date(&self, date: &str) -> String {
        self.paint(date, self.palette.date, false)
    }

    pub fn format_title(&self, title: &str) -> String {
        if self.use_color { title.bold().to_string() } else { title.to_string() }
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.header, true)
    }

    pub fn format_warning(&self, text: &str) -> String {
        self.paint(text, self.palette.warning, false)
    }

    pub fn format_error(&self, text: &str) -> String {
        self.paint(text, self.palette.error, false)
    }

    pub fn format_tag(&self, tag: &str) -> String {
        let text = format!("#{tag}");
        if self.use_color {
            let (r, g, b) = crate::tags::color_for_tag(tag);
            text.rgb(r, g, b).bold().to_string()
        } else {
            text
        }
    }

    pub fn format_tags(&self, tags: &[String]) -> String {
        tags.iter().map(|t| self.format_tag(t)).collect::<Vec<_>>().join(" ")
    }

    /// `<date> - <title>` line used by listings and note headers.
    pub fn note_heading(&self, date: &str, title: &str) -> String {
        format!("{} - {}", self.format_date(date), self.format_title(title))
    }
}
