use crate::website::{Website, default_websites};
use log::warn;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fields of [`Website`] that an edit may touch. `None` leaves the stored
/// value alone.
#[derive(Debug, Default, Clone)]
pub struct WebsiteUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl WebsiteUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.icon.is_none()
    }
}

/// Owner of the ordered bookmark collection. The single writer: every
/// mutation re-serializes the whole list to the store file, so the file is a
/// mirror of memory, never a second source of truth.
pub struct WebsiteStore {
    websites: Vec<Website>,
    path: PathBuf,
}

impl WebsiteStore {
    /// Load the collection from `path`. Never fails: a missing file yields
    /// the built-in defaults, and unreadable or non-array content is logged
    /// and ignored, keeping the defaults.
    pub fn load(path: &Path) -> Self {
        let websites = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<Website>>(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(
                        "ignoring unreadable store file {}: {err}",
                        path.display()
                    );
                    default_websites()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                default_websites()
            }
            Err(err) => {
                warn!("ignoring store file {}: {err}", path.display());
                default_websites()
            }
        };
        Self { websites, path: path.to_path_buf() }
    }

    /// In-memory store used by unit tests; persists to the given path like
    /// any other store, but starts from an explicit record list.
    pub fn with_websites(path: &Path, websites: Vec<Website>) -> Self {
        Self { websites, path: path.to_path_buf() }
    }

    pub fn websites(&self) -> &[Website] {
        &self.websites
    }

    pub fn len(&self) -> usize {
        self.websites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.websites.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Website> {
        self.websites.iter().find(|w| w.id == id)
    }

    /// Next fresh id: one past the current maximum, never less than 1.
    pub fn next_id(&self) -> u32 {
        self.websites.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    /// Append a new record with a freshly minted id. Always succeeds apart
    /// from the persistence write.
    pub fn add(
        &mut self,
        name: String,
        url: String,
        icon: String,
    ) -> io::Result<u32> {
        let id = self.next_id();
        self.websites.push(Website { id, name, url, icon });
        self.persist()?;
        Ok(id)
    }

    /// Merge `update` into the record with `id`. Returns false (and writes
    /// nothing) when the id is absent; an unknown id is not an error.
    pub fn update(
        &mut self,
        id: u32,
        update: WebsiteUpdate,
    ) -> io::Result<bool> {
        let Some(site) = self.websites.iter_mut().find(|w| w.id == id) else {
            return Ok(false);
        };
        if let Some(name) = update.name {
            site.name = name;
        }
        if let Some(url) = update.url {
            site.url = url;
        }
        if let Some(icon) = update.icon {
            site.icon = icon;
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove the record with `id`; absent ids are a no-op.
    pub fn delete(&mut self, id: u32) -> io::Result<bool> {
        let before = self.websites.len();
        self.websites.retain(|w| w.id != id);
        if self.websites.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Move the element at `old_index` to `new_index`. Indices come from the
    /// rendered view, so callers validate them against the current list
    /// before calling; both must be in range.
    pub fn reorder(
        &mut self,
        old_index: usize,
        new_index: usize,
    ) -> io::Result<()> {
        let moved = self.websites.remove(old_index);
        self.websites.insert(new_index, moved);
        self.persist()
    }

    /// Replace the whole collection. No validation beyond "is a list".
    pub fn replace_all(&mut self, websites: Vec<Website>) -> io::Result<()> {
        self.websites = websites;
        self.persist()
    }

    /// Append imported records, remapping each to a fresh id. Candidates
    /// start one past the current maximum and skip any id already present.
    /// Returns the ids that were assigned.
    pub fn import(
        &mut self,
        incoming: Vec<(String, String, String)>,
    ) -> io::Result<Vec<u32>> {
        let mut taken: HashSet<u32> =
            self.websites.iter().map(|w| w.id).collect();
        let mut next = self.next_id();
        let mut assigned = Vec::with_capacity(incoming.len());
        for (name, url, icon) in incoming {
            while taken.contains(&next) {
                next += 1;
            }
            taken.insert(next);
            assigned.push(next);
            self.websites.push(Website { id: next, name, url, icon });
            next += 1;
        }
        self.persist()?;
        Ok(assigned)
    }

    // Mirror memory to disk, compact JSON in one file.
    fn persist(&self) -> io::Result<()> {
        let raw = serde_json::to_string(&self.websites)
            .map_err(io::Error::other)?;
        fs::write(&self.path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site(id: u32, name: &str) -> Website {
        Website {
            id,
            name: name.to_string(),
            url: format!("https://{}.example", name.to_lowercase()),
            icon: "https://icons.example/i.png".to_string(),
        }
    }

    fn store(temp: &TempDir, websites: Vec<Website>) -> WebsiteStore {
        WebsiteStore::with_websites(&temp.path().join("s.json"), websites)
    }

    #[test]
    fn add_mints_one_past_max_even_after_deletes() {
        let temp = TempDir::new().unwrap();
        let mut s = store(&temp, vec![site(1, "A"), site(5, "B")]);
        let id = s.add("C".into(), "https://c.example".into(), "i".into())
            .unwrap();
        assert_eq!(id, 6);
        assert!(s.delete(5).unwrap());
        let id = s.add("D".into(), "https://d.example".into(), "i".into())
            .unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn ids_stay_unique_across_add_delete_sequences() {
        let temp = TempDir::new().unwrap();
        let mut s = store(&temp, Vec::new());
        for i in 0..10 {
            s.add(format!("S{i}"), "https://s.example".into(), "i".into())
                .unwrap();
        }
        s.delete(3).unwrap();
        s.delete(7).unwrap();
        s.add("again".into(), "https://s.example".into(), "i".into())
            .unwrap();
        let mut ids: Vec<u32> = s.websites().iter().map(|w| w.id).collect();
        ids.sort_unstable();
        let deduped = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), deduped);
    }

    #[test]
    fn update_merges_partial_fields_and_ignores_unknown_id() {
        let temp = TempDir::new().unwrap();
        let mut s = store(&temp, vec![site(1, "A")]);
        let touched = s
            .update(1, WebsiteUpdate {
                name: Some("Renamed".into()),
                url: None,
                icon: None,
            })
            .unwrap();
        assert!(touched);
        assert_eq!(s.get(1).unwrap().name, "Renamed");
        assert_eq!(s.get(1).unwrap().url, "https://a.example");
        assert!(!s.update(99, WebsiteUpdate::default()).unwrap());
    }

    #[test]
    fn reorder_is_a_pure_permutation() {
        let temp = TempDir::new().unwrap();
        let mut s =
            store(&temp, vec![site(1, "A"), site(2, "B"), site(3, "C")]);
        s.reorder(0, 2).unwrap();
        let names: Vec<&str> =
            s.websites().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
        s.reorder(2, 0).unwrap();
        let names: Vec<&str> =
            s.websites().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn import_remaps_ids_above_max_skipping_collisions() {
        let temp = TempDir::new().unwrap();
        let mut s = store(&temp, vec![site(7, "A"), site(8, "B")]);
        let assigned = s
            .import(vec![
                ("C".into(), "https://c.example".into(), "i".into()),
                ("D".into(), "https://d.example".into(), "i".into()),
            ])
            .unwrap();
        assert_eq!(assigned, [9, 10]);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn replace_all_swaps_the_collection_wholesale() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let mut s =
            WebsiteStore::with_websites(&path, vec![site(1, "Old")]);
        s.replace_all(vec![site(9, "New"), site(2, "Other")]).unwrap();
        let names: Vec<&str> =
            s.websites().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["New", "Other"]);
        assert_eq!(WebsiteStore::load(&path).len(), 2);
    }

    #[test]
    fn load_falls_back_to_defaults_on_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        let s = WebsiteStore::load(&path);
        assert_eq!(s.websites(), default_websites().as_slice());
        std::fs::write(&path, "not json at all").unwrap();
        let s = WebsiteStore::load(&path);
        assert_eq!(s.websites(), default_websites().as_slice());
    }

    #[test]
    fn load_prefers_persisted_array_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let only = vec![site(42, "Solo")];
        std::fs::write(&path, serde_json::to_string(&only).unwrap()).unwrap();
        let s = WebsiteStore::load(&path);
        assert_eq!(s.websites(), only.as_slice());
    }

    #[test]
    fn mutations_mirror_to_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let mut s = WebsiteStore::with_websites(&path, Vec::new());
        s.add("A".into(), "https://a.example".into(), "i".into()).unwrap();
        let reloaded = WebsiteStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.websites()[0].name, "A");
    }
}
