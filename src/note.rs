use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Layout written for new notes; matches `datetime.isoformat()` output so
/// stores shared with older tooling keep sorting correctly.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
pub const DISPLAY_FMT: &str = "%Y-%m-%d %I:%M %p";
pub const DEFAULT_TITLE: &str = "Untitled";

/// A persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
}

/// Title, tags and body derived from a note's raw content. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub title: String,
    pub tags: Vec<String>,
    pub body: String,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self { timestamp: timestamp_string(), content: content.into() }
    }

    pub fn parsed(&self) -> ParsedNote {
        parse_content(&self.content)
    }

    pub fn title(&self) -> String {
        self.parsed().title
    }

    /// Display form of the timestamp, falling back to the raw string.
    pub fn display_date(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

fn tag_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[(.*)\]\s*$").expect("valid regex"))
}

/// Split raw content into title, optional tag line and body.
///
/// Line 2 is only consumed as tags when the whole line is bracketed;
/// otherwise it stays the first line of the body.
pub fn parse_content(content: &str) -> ParsedNote {
    let mut parts = content.splitn(3, '\n');
    let title = match parts.next() {
        Some(first) if !content.is_empty() => first.to_string(),
        _ => DEFAULT_TITLE.to_string(),
    };
    let second = parts.next();
    let rest = parts.next();

    let Some(second) = second else {
        return ParsedNote { title, tags: Vec::new(), body: String::new() };
    };

    if let Some(caps) = tag_line_re().captures(second) {
        let tags = parse_tag_list(caps.get(1).map_or("", |m| m.as_str()));
        return ParsedNote {
            title,
            tags,
            body: rest.unwrap_or_default().to_string(),
        };
    }

    let body = match rest {
        Some(rest) => format!("{second}\n{rest}"),
        None => second.to_string(),
    };
    ParsedNote { title, tags: Vec::new(), body }
}

fn parse_tag_list(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.strip_prefix('#').unwrap_or(t).to_string())
        .collect()
}

/// Rebuild raw content from its parsed pieces. Tags are written back as a
/// bracketed line only when there are any.
pub fn compose_content(title: &str, tags: &[String], body: &str) -> String {
    if tags.is_empty() {
        if body.is_empty() {
            title.to_string()
        } else {
            format!("{title}\n{body}")
        }
    } else {
        format!("{title}\n[{}]\n{body}", tags.join(", "))
    }
}

pub fn timestamp_string() -> String {
    Local::now().naive_local().format(TIMESTAMP_FMT).to_string()
}

pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(ts).ok().map(|dt| dt.naive_local())
        })
}

pub fn format_timestamp(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|dt| dt.format(DISPLAY_FMT).to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Year and month name a note is filed under in listings, e.g.
/// `("2024", "May")`. `None` when the timestamp does not parse.
pub fn period(ts: &str) -> Option<(String, String)> {
    let dt = parse_timestamp(ts)?;
    Some((dt.format("%Y").to_string(), dt.format("%B").to_string()))
}

/// Plain string comparison; zero-padded ISO timestamps sort correctly this way.
pub fn cmp_timestamp(a: &Note, b: &Note) -> Ordering {
    a.timestamp.cmp(&b.timestamp)
}

/// Newest first. `sort_by` is stable so equal timestamps keep store order.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| cmp_timestamp(b, a));
}
