use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

pub mod args;
pub mod codec;
pub mod error;
pub mod formatting;
pub mod icon;
pub mod pager;
pub mod render;
pub mod resolve;
pub mod store;
pub mod website;

use args::ArgParser;
use formatting::FormatContext;
use pager::Pager;
use store::{WebsiteStore, WebsiteUpdate};
use website::{ensure_dir, store_path, tabs_dir};

pub fn entry() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let cmd = args.remove(0);
    let dir = tabs_dir()?;
    ensure_dir(&dir)?;
    let store_file = store_path(&dir);

    match cmd.as_str() {
        "add" => add_website(args, &store_file)?,
        "new" => new_website(args, &store_file)?,
        "list" => list_websites(&store_file),
        "show" => show_page(args, &store_file)?,
        "browse" => browse(&store_file)?,
        "edit" => edit_website(args, &store_file)?,
        "delete" => delete_websites(args, &store_file)?,
        "move" => move_website(args, &store_file)?,
        "icon" => set_icon(args, &store_file)?,
        "resolve" => resolve_url(args)?,
        "export" => export_websites(args, &store_file)?,
        "import" => import_websites(args, &store_file)?,
        "seed" => seed_websites(args, &store_file)?,
        "path" => println!("{}", store_file.display()),
        "help" => print_help(),
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
Quick Tabs CLI
Usage:
  quick_tabs add <url> [-n <name>] [--embed]
                                  Add a website; name and icon are guessed
                                  from the URL (--embed inlines the icon)
  quick_tabs new <name> <url> [--icon <icon>]
                                  Add a website with explicit fields
  quick_tabs list                 List all websites (id, name, url)
  quick_tabs show [--page <n>]    Render one grid page (36 tiles per page)
  quick_tabs browse               Interactive grid: s next, w prev, q quit
  quick_tabs edit <id> [--name v] [--url v] [--icon v] [--resolve]
                                  Update fields (--resolve re-guesses
                                  name/icon from the URL)
  quick_tabs delete <id>...       Delete one or more websites
  quick_tabs move <from> <to>     Move a tile between 1-based positions
  quick_tabs icon <id> <file>     Compress a local image and embed it
  quick_tabs resolve <url> [--embed]
                                  Show the metadata guess for a URL
  quick_tabs export [path]        Write the collection as pretty JSON
                                  (default: websites.json)
  quick_tabs import <path>        Append websites from a JSON export;
                                  rejected whole on any invalid entry
  quick_tabs seed <count>         Append generated placeholder websites
  quick_tabs path                 Show the store file path
  quick_tabs help                 Show this message

Environment:
  QUICK_TABS_DIR                  Override data directory (default: ~/.quick_tabs)
"
    );
}

fn add_website(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "add");
    let mut input: Option<String> = None;
    let mut name_override: Option<String> = None;
    let mut embed = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-n" | "--name" => {
                name_override = Some(parser.extract_value("-n/--name")?);
            }
            "--embed" => embed = true,
            other => {
                if other.starts_with('-') {
                    return Err(format!("Unknown flag for add: {other}").into());
                }
                if input.is_none() {
                    input = Some(other.to_string());
                }
            }
        }
    }
    let input = input
        .ok_or("Usage: quick_tabs add <url> [-n <name>] [--embed]")?;
    if input.is_empty() {
        return Err("Provide a non-empty URL for add".into());
    }

    // The raw typed value stays the URL when it does not parse; no error.
    let (guess_name, url, icon) = match resolve::resolve(&input, embed) {
        Some(guess) => (guess.name, guess.url, guess.icon),
        None => (String::new(), input.clone(), String::new()),
    };
    let name = name_override.unwrap_or_else(|| {
        if guess_name.is_empty() { input.clone() } else { guess_name }
    });
    if name.is_empty() {
        return Err("Provide a non-empty name after -n/--name".into());
    }

    let mut store = WebsiteStore::load(store_file);
    let id = store.add(name.clone(), url, icon)?;
    println!("Added website {id} ({name})");
    Ok(())
}

fn new_website(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "new");
    let mut positional: Vec<String> = Vec::new();
    let mut icon_override: Option<String> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--icon" => icon_override = Some(parser.extract_value("--icon")?),
            other => {
                if other.starts_with('-') {
                    return Err(format!("Unknown flag for new: {other}").into());
                }
                positional.push(other.to_string());
            }
        }
    }
    if positional.len() != 2 {
        return Err("Usage: quick_tabs new <name> <url> [--icon <icon>]".into());
    }
    let name = positional.remove(0);
    let url = positional.remove(0);
    // Records are persisted only with a name and a url, like the dialog
    // that refuses to submit without one.
    if name.is_empty() || url.is_empty() {
        return Err("Both <name> and <url> must be non-empty".into());
    }
    let icon = icon_override.unwrap_or_else(|| {
        resolve::parse_site(&url).map(|g| g.icon).unwrap_or_default()
    });

    let mut store = WebsiteStore::load(store_file);
    let id = store.add(name.clone(), url, icon)?;
    println!("Added website {id} ({name})");
    Ok(())
}

fn list_websites(store_file: &Path) {
    let store = WebsiteStore::load(store_file);
    let ctx = FormatContext::from_env();
    println!("{}", render::render_list(store.websites(), &ctx));
}

fn show_page(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "show");
    let mut page: usize = 1;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--page" | "-p" => {
                let raw = parser.extract_value("--page")?;
                page = raw
                    .parse()
                    .map_err(|_| format!("--page expects a number, got `{raw}`"))?;
            }
            other => {
                return Err(format!("Unknown flag for show: {other}").into());
            }
        }
    }
    let store = WebsiteStore::load(store_file);
    let mut pager = Pager::default();
    // 1-based on the command line; out-of-range clamps silently.
    pager.set_page(page.saturating_sub(1), store.len());
    let ctx = FormatContext::from_env();
    println!("{}", render::render_page(store.websites(), &pager, &ctx));
    Ok(())
}

fn browse(store_file: &Path) -> Result<(), Box<dyn Error>> {
    let store = WebsiteStore::load(store_file);
    let ctx = FormatContext::from_env();
    let mut pager = Pager::default();
    println!("{}", render::render_page(store.websites(), &pager, &ctx));
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line?.trim() {
            "s" | "S" => {
                pager.next(store.len());
            }
            "w" | "W" => {
                pager.prev();
            }
            "q" | "Q" => break,
            "" => {}
            _ => println!("keys: s (next), w (prev), q (quit)"),
        }
        println!("{}", render::render_page(store.websites(), &pager, &ctx));
    }
    Ok(())
}

fn edit_website(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "edit");
    let mut id: Option<u32> = None;
    let mut update = WebsiteUpdate::default();
    let mut re_resolve = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--name" => update.name = Some(parser.extract_value("--name")?),
            "--url" => update.url = Some(parser.extract_value("--url")?),
            "--icon" => update.icon = Some(parser.extract_value("--icon")?),
            "--resolve" => re_resolve = true,
            other => {
                if other.starts_with('-') {
                    return Err(
                        format!("Unknown flag for edit: {other}").into()
                    );
                }
                if id.is_none() {
                    id = Some(args::parse_id(other, "edit")?);
                }
            }
        }
    }
    let id = id.ok_or(
        "Usage: quick_tabs edit <id> [--name v] [--url v] [--icon v] [--resolve]",
    )?;
    if update.is_empty() && !re_resolve {
        return Err("Nothing to change; pass --name, --url, --icon or --resolve".into());
    }
    // Edits may not blank out the fields every record must keep.
    if update.name.as_deref() == Some("") {
        return Err("--name must not be empty".into());
    }
    if update.url.as_deref() == Some("") {
        return Err("--url must not be empty".into());
    }

    let mut store = WebsiteStore::load(store_file);
    let Some(existing) = store.get(id) else {
        println!("Website {id} not found");
        return Ok(());
    };
    if re_resolve {
        let target = update.url.clone().unwrap_or_else(|| existing.url.clone());
        if let Some(guess) = resolve::parse_site(&target) {
            update.url = Some(guess.url);
            // Explicit --name/--icon win over the guess.
            update.name.get_or_insert(guess.name);
            update.icon.get_or_insert(guess.icon);
        }
    }
    store.update(id, update)?;
    println!("Updated {id}");
    Ok(())
}

fn delete_websites(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        return Err("Usage: quick_tabs delete <id>...".into());
    }
    // Parse every id up front; a bad argument must not leave the command
    // half-applied.
    let ids = args
        .iter()
        .map(|raw| args::parse_id(raw, "delete"))
        .collect::<Result<Vec<u32>, _>>()?;
    let mut store = WebsiteStore::load(store_file);
    let mut deleted = 0;
    for id in ids {
        if store.delete(id)? {
            println!("Deleted {id}");
            deleted += 1;
        } else {
            println!("Website {id} not found");
        }
    }
    if deleted == 0 {
        println!("No websites deleted.");
    }
    Ok(())
}

fn move_website(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    if args.len() != 2 {
        return Err("Usage: quick_tabs move <from> <to> (1-based positions)".into());
    }
    let parse = |raw: &String| -> Result<usize, Box<dyn Error>> {
        raw.parse()
            .map_err(|_| format!("move expects a position, got `{raw}`").into())
    };
    let from = parse(&args[0])?;
    let to = parse(&args[1])?;

    let mut store = WebsiteStore::load(store_file);
    let count = store.len();
    // The store's reorder is index-based and unguarded; validate here.
    if from == 0 || to == 0 || from > count || to > count {
        return Err(format!(
            "Positions must be between 1 and {count} (got {from} -> {to})"
        )
        .into());
    }
    let name = store.websites()[from - 1].name.clone();
    store.reorder(from - 1, to - 1)?;
    println!("Moved {name} from position {from} to {to}");
    Ok(())
}

fn set_icon(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    if args.len() != 2 {
        return Err("Usage: quick_tabs icon <id> <image-file>".into());
    }
    let id = args::parse_id(&args[0], "icon")?;
    let bytes = fs::read(&args[1])
        .map_err(|err| format!("Could not read {}: {err}", args[1]))?;
    let data_uri = icon::compress_to_data_uri(&bytes)?;

    let mut store = WebsiteStore::load(store_file);
    let update = WebsiteUpdate { icon: Some(data_uri), ..Default::default() };
    if store.update(id, update)? {
        println!("Updated icon for {id}");
    } else {
        println!("Website {id} not found");
    }
    Ok(())
}

fn resolve_url(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "resolve");
    let mut input: Option<String> = None;
    let mut embed = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--embed" => embed = true,
            other => {
                if other.starts_with('-') {
                    return Err(
                        format!("Unknown flag for resolve: {other}").into()
                    );
                }
                if input.is_none() {
                    input = Some(other.to_string());
                }
            }
        }
    }
    let input = input.ok_or("Usage: quick_tabs resolve <url> [--embed]")?;
    let Some(guess) = resolve::resolve(&input, embed) else {
        return Err(format!("Could not parse `{input}` as a URL").into());
    };
    println!("Name: {}", guess.name);
    println!("Url:  {}", guess.url);
    println!("Icon: {}", guess.icon);
    Ok(())
}

fn export_websites(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let path = args
        .into_iter()
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(codec::EXPORT_FILE));
    let store = WebsiteStore::load(store_file);
    codec::export_to_file(store.websites(), &path)?;
    println!("Exported {} websites to {}", store.len(), path.display());
    Ok(())
}

fn import_websites(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let path = args
        .into_iter()
        .next()
        .ok_or("Usage: quick_tabs import <path>")?;
    let incoming = codec::parse_import_file(Path::new(&path))?;
    let mut store = WebsiteStore::load(store_file);
    let assigned = store.import(incoming)?;
    match (assigned.first(), assigned.last()) {
        (Some(first), Some(last)) => println!(
            "Imported {} websites (ids {first}..{last})",
            assigned.len()
        ),
        _ => println!("Imported 0 websites"),
    }
    Ok(())
}

fn seed_websites(
    args: Vec<String>,
    store_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let count: usize = args
        .first()
        .ok_or("Usage: quick_tabs seed <count>")?
        .parse()
        .map_err(|_| "Count must be a number")?;
    let mut store = WebsiteStore::load(store_file);
    for i in 0..count {
        let host = format!("seed-{i}.example.com");
        let id = store.add(
            format!("Seed{i}"),
            format!("https://{host}"),
            resolve::favicon_url(&host),
        )?;
        if (i + 1) % 50 == 0 || i + 1 == count {
            println!("Generated {}/{} (last id {id})", i + 1, count);
        }
    }
    Ok(())
}
