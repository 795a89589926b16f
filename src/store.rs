use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::note::{Note, sort_newest_first};

/// The JSON file holding every note, read and rewritten wholesale.
///
/// There is no locking: two processes saving at once means the last writer
/// wins.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Notes in file order. A missing file is an empty store; so is one that
    /// does not parse, since there is nothing sensible to recover from it.
    pub fn load(&self) -> io::Result<Vec<Note>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no note store at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                log::debug!("loaded {} notes from {}", notes.len(), self.path.display());
                Ok(notes)
            }
            Err(e) => {
                log::warn!(
                    "could not parse {}: {e}; treating as empty",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn load_sorted(&self) -> io::Result<Vec<Note>> {
        let mut notes = self.load()?;
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    pub fn save(&self, notes: &[Note]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(notes).map_err(io::Error::other)?;
        fs::write(&self.path, json)?;
        log::debug!("saved {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }

    pub fn add(&self, content: &str) -> io::Result<Note> {
        let mut notes = self.load()?;
        let note = Note::new(content);
        notes.push(note.clone());
        self.save(&notes)?;
        Ok(note)
    }

    /// Replace the content of the first note with `timestamp`. Returns
    /// `false` (and writes nothing) when no note matches.
    pub fn update_content(&self, timestamp: &str, content: &str) -> io::Result<bool> {
        let mut notes = self.load()?;
        let Some(note) = notes.iter_mut().find(|n| n.timestamp == timestamp) else {
            log::warn!("no note with timestamp {timestamp} to update");
            return Ok(false);
        };
        note.content = content.to_string();
        self.save(&notes)?;
        Ok(true)
    }

    /// Remove every note carrying `timestamp`; returns how many went.
    pub fn delete(&self, timestamp: &str) -> io::Result<usize> {
        let mut notes = self.load()?;
        let before = notes.len();
        notes.retain(|n| n.timestamp != timestamp);
        let removed = before - notes.len();
        if removed > 0 {
            self.save(&notes)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn note(ts: &str, content: &str) -> Note {
        Note { timestamp: ts.to_string(), content: content.to_string() }
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("annotations.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.exists());
    }

    #[test]
    fn malformed_file_is_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("annotations.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(NoteStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_sorted() {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("nested/annotations.json"));
        store
            .save(&[
                note("2024-01-01T00:00:00", "old"),
                note("2024-06-01T00:00:00", "new"),
            ])
            .unwrap();
        let notes = store.load_sorted().unwrap();
        assert_eq!(notes[0].content, "new");
        assert_eq!(notes[1].content, "old");

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  {"));
    }

    #[test]
    fn update_matches_by_timestamp() {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("a.json"));
        store.save(&[note("t1", "one"), note("t2", "two")]).unwrap();
        assert!(store.update_content("t2", "TWO").unwrap());
        assert!(!store.update_content("t3", "x").unwrap());
        let notes = store.load().unwrap();
        assert_eq!(notes[1].content, "TWO");
        assert_eq!(notes[0].content, "one");
    }

    #[test]
    fn delete_removes_all_matches() {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("a.json"));
        store
            .save(&[note("t1", "a"), note("t1", "b"), note("t2", "c")])
            .unwrap();
        assert_eq!(store.delete("t1").unwrap(), 2);
        assert_eq!(store.delete("missing").unwrap(), 0);
        assert_eq!(store.load().unwrap(), vec![note("t2", "c")]);
    }

    #[test]
    fn add_appends_with_fresh_timestamp() {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("a.json"));
        let added = store.add("Hello\n[x]\nbody").unwrap();
        let notes = store.load().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0], added);
        assert!(crate::note::parse_timestamp(&added.timestamp).is_some());
    }

    #[test]
    fn reads_records_written_by_other_tools() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("a.json");
        fs::write(
            &path,
            r#"[{"timestamp": "2024-02-03T04:05:06.000007", "content": "Hi"}]"#,
        )
        .unwrap();
        let notes = NoteStore::new(&path).load().unwrap();
        assert_eq!(notes[0].title(), "Hi");
        assert_eq!(notes[0].display_date(), "2024-02-03 04:05 AM");
    }
}
