//! Alternate binary name (`qt`) that forwards to the `quick_tabs` library.
//! Keeping the alias as a real binary avoids shell alias requirements.

fn main() {
    if let Err(err) = quick_tabs::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
