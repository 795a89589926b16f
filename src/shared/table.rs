//! Column layout for `anno list`. Widths are measured on visible characters
//! so colored cells line up with plain ones.

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: &'static str,
    pub align: Align,
    /// Hard cap for the column; cells past it are cut with an ellipsis.
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, align: Align::Left, max_width: None }
    }

    pub fn right(header: &'static str) -> Self {
        Self { header, align: Align::Right, max_width: None }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Render rows under a header line and an underline. Cells are expected to
/// be plain text when a column has a `max_width`, since truncation counts
/// characters and would cut escape sequences.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    match col.max_width {
                        Some(w) => truncate_with_ellipsis(cell, w),
                        None => cell.to_string(),
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|r| visible_len(&r[i]))
                .chain(std::iter::once(col.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<String> =
        columns.iter().map(|c| c.header.to_string()).collect();
    let header_line = format_row(columns, &headers, &widths);
    let mut out = vec![header_line.trim_end().to_string()];
    out.push("-".repeat(visible_len(header_line.trim_end())));
    for row in &rows {
        out.push(format_row(columns, row, &widths).trim_end().to_string());
    }
    out
}

fn format_row(columns: &[Column], row: &[String], widths: &[usize]) -> String {
    columns
        .iter()
        .zip(row.iter())
        .zip(widths.iter())
        .map(|((col, cell), width)| pad_field(cell, *width, col.align))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Pad a cell to `target` visible characters.
pub fn pad_field(cell: &str, target: usize, align: Align) -> String {
    let padding = " ".repeat(target.saturating_sub(visible_len(cell)));
    match align {
        Align::Left => format!("{cell}{padding}"),
        Align::Right => format!("{padding}{cell}"),
    }
}

pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width - 1).collect();
    out.push('…');
    out
}

/// Drop `ESC [ ... m` sequences.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}

pub fn visible_len(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_line_up() {
        let cols = [Column::right("#"), Column::left("Title")];
        let rows = vec![
            vec!["1".to_string(), "short".to_string()],
            vec!["10".to_string(), "a longer title".to_string()],
        ];
        let out = render_table(&cols, &rows);
        assert_eq!(out[0], " #  Title");
        assert_eq!(out[1], "---------");
        assert_eq!(out[2], " 1  short");
        assert_eq!(out[3], "10  a longer title");
    }

    #[test]
    fn max_width_truncates_cells() {
        let cols = [Column::left("T").max_width(4)];
        let rows = vec![vec!["abcdefgh".to_string()]];
        let out = render_table(&cols, &rows);
        assert_eq!(out[2], "abc…");
    }

    #[test]
    fn ansi_is_ignored_for_width() {
        assert_eq!(visible_len("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(strip_ansi("\x1b[1;36mx\x1b[0m y"), "x y");
    }

    #[test]
    fn truncate_edge_cases() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
        assert_eq!(truncate_with_ellipsis("abc", 1), "…");
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
    }
}
