fn main() {
    if let Err(err) = anno::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
