use super::{HelpBook, HelpFlag, HelpTopic, Section};

pub(crate) fn book() -> HelpBook<'static> {
    HelpBook {
        title: "anno: annotations with lightweight markup",
        usage: "anno <command> [options]",
        topics: ALL_TOPICS,
        footer: &[
            "Use `anno help <topic>` for focused docs, e.g. `anno help markup` or `anno help browse`.",
            "Note numbers are the positions shown by `anno list`, newest first.",
        ],
    }
}

const PLAIN_FLAG: HelpFlag<'static> = HelpFlag {
    name: "--plain",
    desc: "No escape sequences; glyphs are kept and markup delimiters removed.",
};

const ALL_TOPICS: &[HelpTopic<'static>] = &[
    HelpTopic {
        name: "list",
        summary: "Table of notes, newest first, with date, title and tags.",
        usage: "anno list [-t tag]",
        details: &[
            "Numbers in the first column are what every other command takes.",
            "Rows sit under year and month headings; notes whose date does not parse go under Undated.",
            "Filtering by tag keeps the original numbers so they stay valid for view/edit/delete.",
        ],
        flags: &[HelpFlag {
            name: "-t, --tag <tag>",
            desc: "Only notes carrying this tag (case-insensitive, leading # optional).",
        }],
        aliases: &["ls"],
        section: Section::Command,
        examples: &["anno list", "anno list -t #work"],
    },
    HelpTopic {
        name: "add",
        summary: "Store a new note from arguments (one per line) or stdin.",
        usage: "anno add [line...]",
        details: &[
            "The first line is the title; a second line like `[work, #urgent]` becomes the tags.",
            "With no arguments the note text is read from stdin until EOF.",
        ],
        flags: &[],
        aliases: &["new"],
        section: Section::Command,
        examples: &[
            "anno add \"Release prep\" \"[work]\" \"[ ] tag the build\"",
            "printf 'Groceries\\n* milk\\n' | anno add",
        ],
    },
    HelpTopic {
        name: "view",
        summary: "Render a note in the terminal.",
        usage: "anno view [n] [--plain]",
        details: &[
            "Without a number, shows the note viewed or edited last.",
            "Inline markup is colored and its delimiters stripped; checklist and list lines get glyphs.",
        ],
        flags: &[PLAIN_FLAG],
        aliases: &["show"],
        section: Section::Command,
        examples: &["anno view 2", "anno view --plain"],
    },
    HelpTopic {
        name: "search",
        summary: "Print every note carrying a tag (to stderr).",
        usage: "anno search <tag>",
        details: &[
            "Matching compares whole tags, ignores case and tolerates a leading #.",
        ],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["anno search work", "anno-term -s #Work"],
    },
    HelpTopic {
        name: "browse",
        summary: "Interactive list: read, or pick a note to edit or delete.",
        usage: "anno browse",
        details: &[
            "The list and prompts go to stderr. Commands: r<n> reads a note, <n> picks it for editing, d<n> picks it for deletion, q or /quit exits.",
            "Picking prints ACTION:EDIT:<i> or ACTION:DELETE:<i> to stdout with a zero-based index, for a wrapping shell to act on.",
        ],
        flags: &[],
        aliases: &["term"],
        section: Section::Command,
        examples: &["action=$(anno browse)"],
    },
    HelpTopic {
        name: "edit",
        summary: "Edit a note's raw text in $EDITOR.",
        usage: "anno edit [n]",
        details: &[
            "The saved text is trimmed and written back under the same timestamp.",
            "If the editor exits with a failure status, the edit is discarded.",
        ],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["EDITOR=nano anno edit 1"],
    },
    HelpTopic {
        name: "delete",
        summary: "Remove a note after confirmation.",
        usage: "anno delete <n> [--yes]",
        details: &["Every stored record with the same timestamp is removed."],
        flags: &[HelpFlag { name: "-y, --yes", desc: "Skip the confirmation prompt." }],
        aliases: &["rm"],
        section: Section::Command,
        examples: &["anno delete 3 --yes"],
    },
    HelpTopic {
        name: "spans",
        summary: "Style ranges of a note as JSON, resolved against a theme.",
        usage: "anno spans [n] [--theme name]",
        details: &[
            "Offsets are character positions in the raw note text. Delimiters appear as hidden ranges.",
            "Line ranges cover the whole checklist or list line.",
        ],
        flags: &[HelpFlag {
            name: "--theme <name>",
            desc: "Theme to resolve colors against (default: the saved theme).",
        }],
        aliases: &[],
        section: Section::Command,
        examples: &["anno spans 1 --theme Nord"],
    },
    HelpTopic {
        name: "theme",
        summary: "Show the available themes or save a new choice.",
        usage: "anno theme [name]",
        details: &["Names match case-insensitively: Pastel, Dark, Light, Nord, Solarized Light, Gruvbox."],
        flags: &[],
        aliases: &["themes"],
        section: Section::Command,
        examples: &["anno theme", "anno theme gruvbox"],
    },
    HelpTopic {
        name: "export",
        summary: "Write each note to its own .txt file.",
        usage: "anno export <dir>",
        details: &[
            "Files are named <date>_<time>_<title>.txt with characters unsafe in file names removed.",
        ],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["anno export ~/notes-export"],
    },
    HelpTopic {
        name: "backup",
        summary: "Zip the note store into the backup directory.",
        usage: "anno backup",
        details: &["Archives are named anno_backup_<date>_<time>.zip under <config>/backups."],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["anno backup"],
    },
    HelpTopic {
        name: "backups",
        summary: "List backup archives, newest first.",
        usage: "anno backups",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &[],
    },
    HelpTopic {
        name: "restore",
        summary: "Replace the note store with a backup.",
        usage: "anno restore <backup-name>",
        details: &[
            "The current store is backed up first; if that fails nothing is changed.",
        ],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["anno restore anno_backup_2024-05-01_09-30-00.zip"],
    },
    HelpTopic {
        name: "path",
        summary: "Show the note store and config locations.",
        usage: "anno path",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &[],
    },
    HelpTopic {
        name: "help",
        summary: "Show this overview or a topic.",
        usage: "anno help [topic]",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["anno help markup"],
    },
    HelpTopic {
        name: "markup",
        summary: "Title, tag line, inline spans and line markers.",
        usage: "anno help markup",
        details: &[
            "Line 1 is the title. Line 2 is the tag list when it is entirely `[a, #b, c]`; otherwise it starts the body.",
            "Inline: <h>highlight</h>, <i>important</i>, <c>code</c>. Spans may cross lines.",
            "Lines: `[x] done` and `[ ] todo` are checklist items; `* item`, `- item` and `1. item` are list items.",
        ],
        flags: &[],
        aliases: &["syntax"],
        section: Section::Guide,
        examples: &["anno add \"Launch\" \"[work]\" \"[x] <c>v2</c> tagged\" \"- <h>tell support</h>\""],
    },
    HelpTopic {
        name: "ANNO_FILE",
        summary: "Note store location (default ~/.local/share/annotations.json).",
        usage: "ANNO_FILE=/path/notes.json anno list",
        details: &["The file and its directory are created on the first write."],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "ANNO_CONFIG_DIR",
        summary: "Settings and backups directory (default ~/.config/anno).",
        usage: "ANNO_CONFIG_DIR=/path anno backup",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "ANNO_LOG",
        summary: "Log filter for stderr diagnostics (default warn).",
        usage: "ANNO_LOG=debug anno list",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "NO_COLOR",
        summary: "Disable colored output everywhere.",
        usage: "NO_COLOR=1 anno view",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
];
