pub mod args;
pub mod backup;
pub mod config;
pub mod formatting;
mod help;
pub mod markup;
pub mod note;
pub mod operations;
pub mod render;
pub mod richtext;
pub mod settings;
pub mod shared;
pub mod store;
pub mod tags;
pub mod theme;
pub mod view;
pub mod viewer;

use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::args::{ArgParser, CommandFlags};
use crate::config::Paths;
use crate::formatting::FormatContext;
use crate::note::{Note, period};
use crate::operations::{confirm, content_from_args, parse_number, resolve_target};
use crate::render::TerminalRenderer;
use crate::richtext::{StyledBuffer, ThemedRange};
use crate::settings::Settings;
use crate::shared::table::{Column, render_table};
use crate::tags::filter_by_tag;
use crate::theme::Theme;
use crate::view::NoteView;
use crate::viewer::Viewer;

pub const LOG_ENV: &str = "ANNO_LOG";

/// Diagnostics go to stderr so stdout stays usable for `ACTION:` lines and
/// JSON.
fn init_logging() {
    let env = env_logger::Env::default().filter_or(LOG_ENV, "warn");
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

pub fn entry() -> Result<(), Box<dyn Error>> {
    init_logging();
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        help::run(&[])?;
        return Ok(());
    }

    let cmd = args.remove(0);
    let paths = Paths::from_env()?;
    let ctx = FormatContext::from_env();
    let mut settings = Settings::load(&paths.settings_file());
    let before = settings.clone();

    match cmd.as_str() {
        "list" | "ls" => list_notes(args, &paths, &ctx)?,
        "add" | "new" => add_note(args, &paths)?,
        "view" | "show" => view_note(args, &paths, &ctx, &mut settings)?,
        "search" => search_notes(args, &paths, &ctx)?,
        "browse" | "term" => browse(args, &paths, &ctx)?,
        "edit" => edit_note(args, &paths, &mut settings)?,
        "delete" | "rm" => delete_note(args, &paths, &mut settings)?,
        "spans" => print_spans(args, &paths, &settings)?,
        "theme" | "themes" => choose_theme(args, &mut settings)?,
        "export" => export(args, &paths)?,
        "backup" => {
            let archive = backup::backup_notes(&paths)?;
            println!("Backup created: {}", archive.display());
        }
        "backups" => list_backups(&paths)?,
        "restore" => restore(args, &paths)?,
        "path" => {
            println!("{}", paths.annotations_file.display());
            println!("{}", paths.config_dir.display());
        }
        "help" | "-h" | "--help" => help::run(&args)?,
        other => {
            eprintln!("{}", help::overview().join("\n"));
            return Err(format!("Unknown command: {other}").into());
        }
    }

    if settings != before {
        settings.save(&paths.settings_file())?;
    }
    Ok(())
}

/// `anno-term`: `-s/--search <tag>` prints matches, otherwise the interactive
/// picker runs.
pub fn terminal_entry() -> Result<(), Box<dyn Error>> {
    init_logging();
    let mut parser = ArgParser::new(env::args().skip(1).collect(), "anno-term");
    let mut search: Option<String> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-s" | "--search" => search = Some(parser.extract_value("-s/--search")?),
            "-h" | "--help" => return help::run(&["browse".to_string()]),
            other => return Err(format!("Unknown argument for anno-term: {other}").into()),
        }
    }

    let paths = Paths::from_env()?;
    let ctx = FormatContext::from_env();
    let notes = paths.store().load_sorted()?;
    let viewer = Viewer::new(&notes, &ctx);
    match search {
        Some(term) => {
            viewer.search(&term, &mut io::stderr())?;
        }
        None => {
            viewer.interactive(&mut io::stdin().lock(), &mut io::stdout(), &mut io::stderr())?;
        }
    }
    Ok(())
}

pub(crate) fn terminal_columns() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

fn terminal_rows() -> Option<usize> {
    terminal_size::terminal_size().map(|(_, h)| h.0 as usize)
}

/// Print `lines`, through `$PAGER` (default `less -R`) when stdout is a
/// terminal and the text would not fit on one screen.
pub(crate) fn paginate_and_print(lines: &[String]) -> io::Result<()> {
    let fits = terminal_rows().is_none_or(|rows| lines.len() < rows);
    if !io::stdout().is_terminal() || fits {
        return print_lines(lines);
    }

    let pager = env::var("PAGER").unwrap_or_else(|_| "less -R".to_string());
    let mut parts = pager.split_whitespace();
    let Some(program) = parts.next() else {
        return print_lines(lines);
    };
    let child = Command::new(program).args(parts).stdin(Stdio::piped()).spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            log::debug!("pager {pager} unavailable: {e}");
            return print_lines(lines);
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        for line in lines {
            if writeln!(stdin, "{line}").is_err() {
                // Pager quit early.
                break;
            }
        }
    }
    child.wait()?;
    Ok(())
}

fn print_lines(lines: &[String]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn list_notes(args: Vec<String>, paths: &Paths, ctx: &FormatContext) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "list")?;
    flags.expect_only(&["--tag"], "list")?;
    if let Some(extra) = flags.positional.first() {
        return Err(format!("Unexpected argument for list: {extra}").into());
    }

    let notes = paths.store().load_sorted()?;
    if notes.is_empty() {
        println!("{}", ctx.format_warning("No annotations yet. Use 'anno add' to create one."));
        return Ok(());
    }
    let shown: Vec<usize> = match &flags.tag {
        Some(tag) => filter_by_tag(&notes, tag),
        None => (0..notes.len()).collect(),
    };
    if shown.is_empty() {
        let tag = flags.tag.as_deref().unwrap_or_default();
        println!("{}", ctx.format_warning(&format!("No notes found with the tag '{tag}'.")));
        return Ok(());
    }

    let title_width = terminal_columns().unwrap_or(100).saturating_sub(48).clamp(16, 60);
    let columns = [
        Column::right("#"),
        Column::left("Date"),
        Column::left("Title").max_width(title_width),
        Column::left("Tags"),
    ];
    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|&i| {
            let note = &notes[i];
            let parsed = note.parsed();
            vec![
                (i + 1).to_string(),
                ctx.format_date(&note.display_date()),
                parsed.title,
                ctx.format_tags(&parsed.tags),
            ]
        })
        .collect();
    let periods: Vec<Option<(String, String)>> =
        shown.iter().map(|&i| period(&notes[i].timestamp)).collect();
    let table = render_table(&columns, &rows);
    paginate_and_print(&with_period_headings(table, &periods, ctx))?;
    Ok(())
}

/// Put a year heading, then an indented month heading, above each run of
/// rows from the same month. `periods[i]` belongs to the i-th data row.
fn with_period_headings(
    table: Vec<String>,
    periods: &[Option<(String, String)>],
    ctx: &FormatContext,
) -> Vec<String> {
    let mut lines = table.into_iter();
    let mut out: Vec<String> = lines.by_ref().take(2).collect();
    let mut year: Option<&str> = None;
    let mut month: Option<&str> = None;
    for (row, period) in lines.zip(periods) {
        let (y, m) = match period {
            Some((y, m)) => (y.as_str(), m.as_str()),
            None => ("Undated", ""),
        };
        if year != Some(y) {
            out.push(ctx.format_header(y));
            year = Some(y);
            month = None;
        }
        if !m.is_empty() && month != Some(m) {
            out.push(format!("  {}", ctx.format_title(m)));
            month = Some(m);
        }
        out.push(row);
    }
    out
}

fn add_note(args: Vec<String>, paths: &Paths) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "add")?;
    flags.expect_only(&[], "add")?;
    let content = content_from_args(&flags.positional, &mut io::stdin().lock())?;
    let note = paths.store().add(&content)?;
    println!("Added: {}", note.title());
    Ok(())
}

fn view_note(
    args: Vec<String>,
    paths: &Paths,
    ctx: &FormatContext,
    settings: &mut Settings,
) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "view")?;
    flags.expect_only(&["--plain"], "view")?;
    let notes = paths.store().load_sorted()?;
    let index = resolve_target(&notes, flags.single("view")?, settings.last_note.as_deref())?;
    let note = &notes[index];

    let plain_ctx;
    let ctx = if flags.plain {
        plain_ctx = FormatContext::new(false);
        &plain_ctx
    } else {
        ctx
    };
    print_note(note, ctx);
    settings.last_note = Some(note.timestamp.clone());
    Ok(())
}

fn print_note(note: &Note, ctx: &FormatContext) {
    let parsed = note.parsed();
    println!("{}", ctx.note_heading(&note.display_date(), &parsed.title));
    if !parsed.tags.is_empty() {
        println!("{}", ctx.format_tags(&parsed.tags));
    }
    println!("---");
    println!("{}", TerminalRenderer::new(ctx.use_color).render(&parsed.body));
}

fn search_notes(args: Vec<String>, paths: &Paths, ctx: &FormatContext) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "search")?;
    flags.expect_only(&[], "search")?;
    let term = flags.single("search")?.ok_or("Usage: anno search <tag>")?;
    let notes = paths.store().load_sorted()?;
    Viewer::new(&notes, ctx).search(term, &mut io::stderr())?;
    Ok(())
}

fn browse(args: Vec<String>, paths: &Paths, ctx: &FormatContext) -> Result<(), Box<dyn Error>> {
    if let Some(extra) = args.first() {
        return Err(format!("Unexpected argument for browse: {extra}").into());
    }
    let notes = paths.store().load_sorted()?;
    Viewer::new(&notes, ctx).interactive(
        &mut io::stdin().lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )?;
    Ok(())
}

fn edit_note(args: Vec<String>, paths: &Paths, settings: &mut Settings) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "edit")?;
    flags.expect_only(&[], "edit")?;
    let store = paths.store();
    let notes = store.load_sorted()?;
    let index = resolve_target(&notes, flags.single("edit")?, settings.last_note.as_deref())?;

    let mut view = NoteView::new(notes);
    view.select_index(index);
    view.begin_edit()?;

    // Created exclusively with a random name; removed when dropped.
    let mut draft = tempfile::Builder::new().prefix("anno-edit-").suffix(".txt").tempfile()?;
    draft.write_all(view.buffer().text().as_bytes())?;
    draft.flush()?;
    let edited = run_editor(draft.path()).and_then(|ok| {
        if ok { Ok(Some(fs::read_to_string(draft.path())?)) } else { Ok(None) }
    });
    drop(draft);

    match edited {
        Ok(Some(text)) => {
            view.replace_text(text)?;
            view.save(&store)?;
            let note = view.selected().ok_or("Note disappeared while editing")?;
            settings.last_note = Some(note.timestamp.clone());
            println!("Updated: {}", note.title());
        }
        Ok(None) => {
            view.cancel();
            println!("Edit canceled.");
        }
        Err(e) => {
            view.cancel();
            return Err(e);
        }
    }
    Ok(())
}

/// Run `$EDITOR` (default `vi`) on `path`; `false` when it exits unsuccessfully.
fn run_editor(path: &Path) -> Result<bool, Box<dyn Error>> {
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or("EDITOR is empty")?;
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| format!("Could not start editor {program}: {e}"))?;
    Ok(status.success())
}

fn delete_note(args: Vec<String>, paths: &Paths, settings: &mut Settings) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "delete")?;
    flags.expect_only(&["--yes"], "delete")?;
    let number = flags.single("delete")?.ok_or("Usage: anno delete <n> [--yes]")?;
    let store = paths.store();
    let notes = store.load_sorted()?;
    let note = &notes[parse_number(&notes, number)?];

    if !flags.yes {
        eprint!("Delete '{}'? [y/N] ", note.title());
        io::stderr().flush()?;
        if !confirm(&mut io::stdin().lock())? {
            println!("Delete canceled.");
            return Ok(());
        }
    }

    let removed = store.delete(&note.timestamp)?;
    if settings.last_note.as_deref() == Some(note.timestamp.as_str()) {
        settings.last_note = None;
    }
    if removed > 1 {
        log::warn!("removed {removed} notes sharing timestamp {}", note.timestamp);
    }
    println!("Deleted: {}", note.title());
    Ok(())
}

#[derive(Serialize)]
struct SpanReport<'a> {
    timestamp: &'a str,
    theme: &'static str,
    text: &'a str,
    ranges: Vec<ThemedRange>,
}

fn print_spans(args: Vec<String>, paths: &Paths, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "spans")?;
    flags.expect_only(&["--theme"], "spans")?;
    let notes = paths.store().load_sorted()?;
    let index = resolve_target(&notes, flags.single("spans")?, settings.last_note.as_deref())?;
    let note = &notes[index];

    let theme = match &flags.theme {
        Some(name) => Theme::by_name(name).ok_or_else(|| format!("Unknown theme: {name}"))?,
        None => Theme::resolve(&settings.theme),
    };
    let mut buffer = StyledBuffer::new();
    buffer.set_text(note.content.clone());
    buffer.apply_styling();

    let report = SpanReport {
        timestamp: &note.timestamp,
        theme: theme.name,
        text: buffer.text(),
        ranges: buffer.themed_ranges(theme),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn choose_theme(args: Vec<String>, settings: &mut Settings) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "theme")?;
    flags.expect_only(&[], "theme")?;
    match flags.single("theme")? {
        None => {
            let current = Theme::resolve(&settings.theme).name;
            for name in Theme::names() {
                let marker = if name == current { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
        Some(name) => {
            let theme = Theme::by_name(name).ok_or_else(|| format!("Unknown theme: {name}"))?;
            settings.theme = theme.name.to_string();
            println!("Theme set to {}", theme.name);
        }
    }
    Ok(())
}

fn export(args: Vec<String>, paths: &Paths) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "export")?;
    flags.expect_only(&[], "export")?;
    let dir = PathBuf::from(flags.single("export")?.ok_or("Usage: anno export <dir>")?);
    let count = backup::export_notes(paths, &dir)?;
    println!("Exported {count} notes to {}", dir.display());
    Ok(())
}

fn list_backups(paths: &Paths) -> Result<(), Box<dyn Error>> {
    let names = backup::list_backups(paths)?;
    if names.is_empty() {
        println!("No backups found.");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn restore(args: Vec<String>, paths: &Paths) -> Result<(), Box<dyn Error>> {
    let flags = CommandFlags::parse(args, "restore")?;
    flags.expect_only(&[], "restore")?;
    let name = flags.single("restore")?.ok_or("Usage: anno restore <backup-name>")?;
    let restored = backup::restore_notes(paths, name)?;
    if let Some(snapshot) = restored.safety_backup {
        println!("Previous notes saved to {}", snapshot.display());
    }
    println!("Restored from {name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period_of(y: &str, m: &str) -> Option<(String, String)> {
        Some((y.to_string(), m.to_string()))
    }

    #[test]
    fn rows_are_grouped_by_year_then_month() {
        let table = vec!["head".to_string(), "----".to_string(), "a".into(), "b".into(), "c".into(), "d".into(), "e".into()];
        let periods = [
            period_of("2025", "January"),
            period_of("2024", "May"),
            period_of("2024", "May"),
            period_of("2024", "March"),
            None,
        ];
        let out = with_period_headings(table, &periods, &FormatContext::new(false));
        assert_eq!(
            out,
            vec![
                "head", "----", "2025", "  January", "a", "2024", "  May", "b", "c", "  March",
                "d", "Undated", "e",
            ]
        );
    }

    #[test]
    fn same_month_name_in_another_year_gets_a_heading() {
        let table = vec!["h".to_string(), "-".to_string(), "a".into(), "b".into()];
        let periods = [period_of("2025", "May"), period_of("2024", "May")];
        let out = with_period_headings(table, &periods, &FormatContext::new(false));
        assert_eq!(out, vec!["h", "-", "2025", "  May", "a", "2024", "  May", "b"]);
    }
}
