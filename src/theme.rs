use serde::Serialize;

use crate::richtext::TextStyle;

pub const DEFAULT_THEME: &str = "Pastel";

/// Colour table for a styled text surface. Values are `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub bg: &'static str,
    pub card: &'static str,
    pub text_fg: &'static str,
    pub select_bg: &'static str,
    pub select_fg: &'static str,
    pub highlight: &'static str,
    pub important: &'static str,
    pub code_bg: &'static str,
    pub checklist_done: &'static str,
    pub checklist_pending: &'static str,
}

/// How one [`TextStyle`] looks under a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Appearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
    pub bold: bool,
    pub monospace: bool,
    /// Present in the buffer, zero width on screen.
    pub elide: bool,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "Pastel",
        bg: "#B2D8B2",
        card: "#F5F5DC",
        text_fg: "#3D2B1F",
        select_bg: "#A0522D",
        select_fg: "#FFFFFF",
        highlight: "#FFFACD",
        important: "#FF4500",
        code_bg: "#D3D3D3",
        checklist_done: "#228B22",
        checklist_pending: "#DC143C",
    },
    Theme {
        name: "Dark",
        bg: "#2E2E2E",
        card: "#3C3C3C",
        text_fg: "#E0E0E0",
        select_bg: "#BB86FC",
        select_fg: "#000000",
        highlight: "#4A4A4A",
        important: "#CF6679",
        code_bg: "#555555",
        checklist_done: "#03DAC6",
        checklist_pending: "#CF6679",
    },
    Theme {
        name: "Light",
        bg: "#F0F0F0",
        card: "#FFFFFF",
        text_fg: "#000000",
        select_bg: "#0078D7",
        select_fg: "#FFFFFF",
        highlight: "#FFFF00",
        important: "#D93025",
        code_bg: "#E8EAED",
        checklist_done: "#137333",
        checklist_pending: "#A50E0E",
    },
    Theme {
        name: "Nord",
        bg: "#2E3440",
        card: "#3B4252",
        text_fg: "#D8DEE9",
        select_bg: "#88C0D0",
        select_fg: "#2E3440",
        highlight: "#5E81AC",
        important: "#BF616A",
        code_bg: "#4C566A",
        checklist_done: "#A3BE8C",
        checklist_pending: "#BF616A",
    },
    Theme {
        name: "Solarized Light",
        bg: "#fdf6e3",
        card: "#eee8d5",
        text_fg: "#657b83",
        select_bg: "#268bd2",
        select_fg: "#ffffff",
        highlight: "#b58900",
        important: "#dc322f",
        code_bg: "#f5f5f5",
        checklist_done: "#859900",
        checklist_pending: "#dc322f",
    },
    Theme {
        name: "Gruvbox",
        bg: "#282828",
        card: "#3c3836",
        text_fg: "#ebdbb2",
        select_bg: "#fe8019",
        select_fg: "#282828",
        highlight: "#fabd2f",
        important: "#fb4934",
        code_bg: "#504945",
        checklist_done: "#b8bb26",
        checklist_pending: "#fb4934",
    },
];

impl Theme {
    /// Case-insensitive lookup.
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Lookup that falls back to the default theme.
    pub fn resolve(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or(&THEMES[0])
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.name)
    }

    pub fn appearance(&self, style: TextStyle) -> Appearance {
        match style {
            TextStyle::Highlight => {
                Appearance { background: Some(self.highlight), ..Default::default() }
            }
            TextStyle::Important => Appearance {
                foreground: Some(self.important),
                bold: true,
                ..Default::default()
            },
            TextStyle::Code => Appearance {
                background: Some(self.code_bg),
                monospace: true,
                ..Default::default()
            },
            TextStyle::Hidden => Appearance { elide: true, ..Default::default() },
            TextStyle::ChecklistDone => Appearance {
                foreground: Some(self.checklist_done),
                bold: true,
                ..Default::default()
            },
            TextStyle::ChecklistPending => Appearance {
                foreground: Some(self.checklist_pending),
                bold: true,
                ..Default::default()
            },
            TextStyle::ListBullet => Appearance {
                foreground: Some(self.text_fg),
                bold: true,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Theme::by_name("nord").map(|t| t.name), Some("Nord"));
        assert_eq!(
            Theme::by_name("solarized light").map(|t| t.name),
            Some("Solarized Light")
        );
        assert!(Theme::by_name("neon").is_none());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::resolve("neon").name, DEFAULT_THEME);
    }

    #[test]
    fn hidden_style_elides_only() {
        let a = Theme::resolve("Dark").appearance(TextStyle::Hidden);
        assert!(a.elide);
        assert!(a.foreground.is_none() && a.background.is_none());
    }

    #[test]
    fn checklist_colours_follow_theme() {
        let t = Theme::resolve("Gruvbox");
        assert_eq!(
            t.appearance(TextStyle::ChecklistDone).foreground,
            Some("#b8bb26")
        );
        assert!(t.appearance(TextStyle::Code).monospace);
    }
}
