use crate::{paginate_and_print, terminal_columns};
use std::error::Error;

mod content;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Command,
    Environment,
    Guide,
}

impl Section {
    const ORDER: [Section; 3] = [Section::Command, Section::Environment, Section::Guide];

    fn label(self) -> &'static str {
        match self {
            Section::Command => "Commands",
            Section::Environment => "Environment",
            Section::Guide => "Guides",
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct HelpFlag<'a> {
    pub name: &'a str,
    pub desc: &'a str,
}

#[derive(Clone, Copy)]
pub(crate) struct HelpTopic<'a> {
    pub name: &'a str,
    pub summary: &'a str,
    pub usage: &'a str,
    pub details: &'a [&'a str],
    pub flags: &'a [HelpFlag<'a>],
    pub aliases: &'a [&'a str],
    pub section: Section,
    pub examples: &'a [&'a str],
}

impl HelpTopic<'_> {
    /// Left column of the overview: commands show their usage line, guides
    /// and variables just their name.
    fn overview_label(&self) -> &str {
        match self.section {
            Section::Command => self.usage,
            Section::Environment | Section::Guide => self.name,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct HelpBook<'a> {
    pub title: &'a str,
    pub usage: &'a str,
    pub topics: &'a [HelpTopic<'a>],
    pub footer: &'a [&'a str],
}

impl<'a> HelpBook<'a> {
    fn find(&self, name: &str) -> Option<&HelpTopic<'a>> {
        self.topics.iter().find(|topic| {
            topic.name.eq_ignore_ascii_case(name)
                || topic.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }
}

fn printer() -> HelpPrinter {
    HelpPrinter::new(terminal_columns().unwrap_or(96).clamp(64, 120))
}

pub(crate) fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let book = content::book();
    let printer = printer();
    let lines = match args.first().map(|name| (name, book.find(name))) {
        None => printer.render_overview(&book),
        Some((_, Some(topic))) => printer.render_topic(&book, topic),
        Some((name, None)) => {
            eprintln!("Unknown help topic: {name}");
            printer.render_overview(&book)
        }
    };
    paginate_and_print(&lines)?;
    Ok(())
}

/// The overview, for printing after an unknown command.
pub(crate) fn overview() -> Vec<String> {
    printer().render_overview(&content::book())
}

struct HelpPrinter {
    width: usize,
}

impl HelpPrinter {
    fn new(width: usize) -> Self {
        Self { width }
    }

    fn render_overview(&self, book: &HelpBook<'_>) -> Vec<String> {
        let mut out = vec![book.title.to_string(), format!("usage: {}", book.usage), String::new()];
        for section in Section::ORDER {
            let rows: Vec<(&str, &str)> = book
                .topics
                .iter()
                .filter(|t| t.section == section)
                .map(|t| (t.overview_label(), t.summary))
                .collect();
            out.extend(self.render_block(section.label(), &rows));
        }
        self.push_footer(book, &mut out);
        out
    }

    fn render_topic(&self, book: &HelpBook<'_>, topic: &HelpTopic<'_>) -> Vec<String> {
        let mut out = vec![
            format!("{}: {}", topic.name, topic.summary),
            format!("usage: {}", topic.usage),
        ];
        if !topic.aliases.is_empty() {
            out.push(format!("aliases: {}", topic.aliases.join(", ")));
        }
        out.push(String::new());

        if !topic.details.is_empty() {
            out.extend(topic.details.iter().flat_map(|d| self.wrap(d, self.width)));
            out.push(String::new());
        }

        let flags: Vec<(&str, &str)> = topic.flags.iter().map(|f| (f.name, f.desc)).collect();
        out.extend(self.render_block("Options", &flags));

        if !topic.examples.is_empty() {
            out.push("Examples:".to_string());
            for ex in topic.examples {
                out.extend(self.wrap(ex, self.width - 2).into_iter().map(|l| format!("  {l}")));
            }
            out.push(String::new());
        }
        self.push_footer(book, &mut out);
        out
    }

    fn push_footer(&self, book: &HelpBook<'_>, out: &mut Vec<String>) {
        out.extend(book.footer.iter().flat_map(|line| self.wrap(line, self.width)));
    }

    /// Two-column block; labels wider than a third of the screen wrap.
    fn render_block(&self, title: &str, rows: &[(&str, &str)]) -> Vec<String> {
        if rows.is_empty() {
            return Vec::new();
        }
        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
            .min(self.width / 3);
        let desc_width = self.width - label_width - 4;

        let mut out = vec![format!("{title}:")];
        for (label, desc) in rows {
            let labels = self.wrap(label, label_width);
            let descs = self.wrap(desc, desc_width);
            for i in 0..labels.len().max(descs.len()) {
                let l = labels.get(i).map(String::as_str).unwrap_or("");
                let d = descs.get(i).map(String::as_str).unwrap_or("");
                out.push(format!("  {l:label_width$}  {d}").trim_end().to_string());
            }
        }
        out.push(String::new());
        out
    }

    /// Greedy word wrap counted in characters. A word longer than `width`
    /// gets a line of its own.
    fn wrap(&self, text: &str, width: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut line = String::new();
        let mut len = 0;
        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            if len > 0 && len + 1 + word_len > width {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.push_str(word);
            len += word_len;
        }
        if !line.is_empty() || out.is_empty() {
            out.push(line);
        }
        out
    }
}
