//! Terminal companion binary: tag search (`-s <tag>`) or the interactive
//! picker that prints `ACTION:` lines for a wrapping shell.

fn main() {
    if let Err(err) = anno::terminal_entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
