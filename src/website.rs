use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the persisted collection inside the data directory.
pub const STORE_FILE: &str = "my-websites.json";

/// One bookmark tile: name, url and an icon that is either an external URL
/// or an embedded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub icon: String,
}

pub fn tabs_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = env::var("QUICK_TABS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME").map_err(|_| {
        io::Error::other("HOME not set; set QUICK_TABS_DIR explicitly")
    })?;
    Ok(PathBuf::from(home).join(".quick_tabs"))
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn store_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}

/// Built-in first-run collection. Replaced wholesale by persisted data when
/// the store file parses to an array.
pub fn default_websites() -> Vec<Website> {
    let seed: &[(&str, &str)] = &[
        ("Github", "https://github.com"),
        ("Mail", "https://mail.google.com/mail"),
        ("Youtube", "https://www.youtube.com"),
        ("Rust", "https://www.rust-lang.org"),
        ("MDN", "https://developer.mozilla.org"),
        ("Wikipedia", "https://www.wikipedia.org"),
        ("Maps", "https://www.openstreetmap.org"),
        ("News", "https://news.ycombinator.com"),
    ];
    seed.iter()
        .enumerate()
        .map(|(i, (name, url))| {
            let host = url.trim_start_matches("https://");
            let host = host.split('/').next().unwrap_or(host);
            Website {
                id: (i + 1) as u32,
                name: (*name).to_string(),
                url: (*url).to_string(),
                icon: crate::resolve::favicon_url(host),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_unique_positive_ids() {
        let defaults = default_websites();
        let mut ids: Vec<u32> = defaults.iter().map(|w| w.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), defaults.len());
        assert!(ids.iter().all(|&id| id > 0));
    }

    #[test]
    fn defaults_carry_icon_guesses() {
        for site in default_websites() {
            assert!(!site.name.is_empty());
            assert!(site.url.starts_with("https://"));
            assert!(site.icon.contains("favicons?domain="));
        }
    }
}
