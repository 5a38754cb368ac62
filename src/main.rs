fn main() {
    if let Err(err) = quick_tabs::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
