//! Export to plain text, zip backups of the store, and restore.

use chrono::Local;
use regex::Regex;
use std::error::Error;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::Paths;
use crate::note::parse_timestamp;

pub const BACKUP_PREFIX: &str = "anno_backup_";
const STAMP_FMT: &str = "%Y-%m-%d_%H-%M-%S";
const STAMP_LEN: usize = "YYYY-mm-dd_HH-MM-SS".len();
const MAX_NAME_LEN: usize = 100;

/// Strip characters most filesystems reject, collapse whitespace to `_`,
/// and cap the length.
pub fn sanitize_filename(name: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| Regex::new(r#"[\\/*?"<>|]"#).expect("valid regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let cleaned = invalid.replace_all(name, "");
    let cleaned = spaces.replace_all(&cleaned, "_");
    cleaned.chars().take(MAX_NAME_LEN).collect()
}

/// `dir/stem.ext`, or `dir/stem-N.ext` for the first free `N`.
fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.{ext}"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{stem}-{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Write each note's raw content to its own `.txt` file. Returns the count.
pub fn export_notes(paths: &Paths, target_dir: &Path) -> Result<usize, Box<dyn Error>> {
    let store = paths.store();
    if !store.exists() {
        return Err("Annotations file not found".into());
    }
    let notes = store.load()?;
    fs::create_dir_all(target_dir)?;

    let mut count = 0;
    for note in &notes {
        let stamp = parse_timestamp(&note.timestamp)
            .map(|dt| dt.format(STAMP_FMT).to_string())
            .unwrap_or_else(|| sanitize_filename(&note.timestamp));
        let stem = format!("{stamp}_{}", sanitize_filename(&note.title()));
        let path = unique_path(target_dir, &stem, "txt");
        fs::write(&path, &note.content)?;
        count += 1;
    }
    log::info!("exported {count} notes to {}", target_dir.display());
    Ok(count)
}

/// Zip the store file into the backup directory and return the archive path.
pub fn backup_notes(paths: &Paths) -> Result<PathBuf, Box<dyn Error>> {
    let source = &paths.annotations_file;
    if !source.exists() {
        return Err("Annotations file not found; nothing to back up".into());
    }
    let dir = paths.backup_dir();
    fs::create_dir_all(&dir)?;

    let stem = format!("{BACKUP_PREFIX}{}", Local::now().format(STAMP_FMT));
    let target = unique_path(&dir, &stem, "zip");
    let data = fs::read(source)?;

    let mut zip = ZipWriter::new(File::create(&target)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(paths.store_file_name(), options)?;
    zip.write_all(&data)?;
    zip.finish()?;

    log::info!("created backup {}", target.display());
    Ok(target)
}

/// Backup archive names, newest first.
pub fn list_backups(paths: &Paths) -> Result<Vec<String>, Box<dyn Error>> {
    let dir = paths.backup_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(BACKUP_PREFIX) && name.ends_with(".zip") {
                names.push(name.to_string());
            }
        }
    }
    names.sort_unstable_by(|a, b| backup_order(b).cmp(&backup_order(a)).then_with(|| b.cmp(a)));
    Ok(names)
}

/// `(stamp, N)` for `anno_backup_<stamp>[-N].zip`; no suffix is `N = 0`.
/// Plain name order would put `<stamp>.zip` after `<stamp>-1.zip`.
fn backup_order(name: &str) -> (&str, u32) {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)
        .and_then(|n| n.strip_suffix(".zip"))
        .unwrap_or(name);
    match (stem.get(..STAMP_LEN), stem.get(STAMP_LEN..)) {
        (Some(stamp), Some(rest)) => {
            let suffix = rest.strip_prefix('-').and_then(|n| n.parse().ok()).unwrap_or(0);
            (stamp, suffix)
        }
        _ => (stem, 0),
    }
}

pub struct Restored {
    /// Snapshot of the store taken just before it was replaced.
    pub safety_backup: Option<PathBuf>,
}

/// Replace the live store with the copy inside `backup_name`.
///
/// The current store is snapshotted first; if that fails nothing is touched.
/// The extracted file is written next to the store and renamed over it.
pub fn restore_notes(paths: &Paths, backup_name: &str) -> Result<Restored, Box<dyn Error>> {
    if backup_name.contains('/') || backup_name.contains('\\') {
        return Err(format!("Invalid backup name: {backup_name}").into());
    }
    let archive_path = paths.backup_dir().join(backup_name);
    if !archive_path.exists() {
        return Err(format!("Backup file not found: {backup_name}").into());
    }

    let safety_backup = if paths.annotations_file.exists() {
        let snapshot = backup_notes(paths)
            .map_err(|e| format!("Pre-restore backup failed, restore aborted: {e}"))?;
        Some(snapshot)
    } else {
        None
    };

    let mut archive = ZipArchive::new(File::open(&archive_path)?)?;
    let mut data = Vec::new();
    archive
        .by_name(&paths.store_file_name())
        .map_err(|e| format!("{backup_name} has no {}: {e}", paths.store_file_name()))?
        .read_to_end(&mut data)?;

    let live = &paths.annotations_file;
    if let Some(parent) = live.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let staging = live.with_extension("json.restore");
    fs::write(&staging, &data)?;
    fs::rename(&staging, live)?;

    log::info!("restored {} from {backup_name}", live.display());
    Ok(Restored { safety_backup })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use tempfile::{TempDir, tempdir};

    fn paths() -> (TempDir, Paths) {
        let tmp = tempdir().unwrap();
        let paths = Paths::new(tmp.path().join("data/annotations.json"), tmp.path().join("cfg"));
        (tmp, paths)
    }

    fn note(ts: &str, content: &str) -> Note {
        Note { timestamp: ts.into(), content: content.into() }
    }

    #[test]
    fn sanitize_rules() {
        assert_eq!(sanitize_filename("a/b\\c*d?e\"f<g>h|i"), "abcdefghi");
        assert_eq!(sanitize_filename("two  words\there"), "two_words_here");
        assert_eq!(sanitize_filename(&"x".repeat(300)).len(), 100);
    }

    #[test]
    fn export_writes_one_file_per_note() {
        let (tmp, paths) = paths();
        paths
            .store()
            .save(&[
                note("2024-03-04T05:06:07.000001", "Shopping list\nmilk"),
                note("2024-03-04T05:06:07.5", "Shopping list\neggs"),
            ])
            .unwrap();
        let out = tmp.path().join("export");
        assert_eq!(export_notes(&paths, &out).unwrap(), 2);

        let first = out.join("2024-03-04_05-06-07_Shopping_list.txt");
        let second = out.join("2024-03-04_05-06-07_Shopping_list-1.txt");
        assert_eq!(fs::read_to_string(first).unwrap(), "Shopping list\nmilk");
        assert_eq!(fs::read_to_string(second).unwrap(), "Shopping list\neggs");
    }

    #[test]
    fn export_without_store_fails() {
        let (tmp, paths) = paths();
        assert!(export_notes(&paths, &tmp.path().join("out")).is_err());
    }

    #[test]
    fn backup_requires_store() {
        let (_tmp, paths) = paths();
        assert!(backup_notes(&paths).is_err());
        assert!(list_backups(&paths).unwrap().is_empty());
    }

    #[test]
    fn backup_then_restore_round_trip() {
        let (_tmp, paths) = paths();
        let store = paths.store();
        store.save(&[note("t1", "original")]).unwrap();

        let archive = backup_notes(&paths).unwrap();
        let name = archive.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with(BACKUP_PREFIX) && name.ends_with(".zip"));

        store.save(&[note("t2", "changed")]).unwrap();
        let restored = restore_notes(&paths, &name).unwrap();

        assert_eq!(store.load().unwrap(), vec![note("t1", "original")]);
        let safety = restored.safety_backup.unwrap();
        assert!(safety.exists());
        assert_ne!(safety, archive);
        assert_eq!(list_backups(&paths).unwrap().len(), 2);
    }

    #[test]
    fn same_second_backups_list_newest_first() {
        let (_tmp, paths) = paths();
        paths.store().save(&[note("t1", "a")]).unwrap();
        let first = backup_notes(&paths).unwrap();
        let second = backup_notes(&paths).unwrap();
        let third = backup_notes(&paths).unwrap();
        let name = |p: &PathBuf| p.file_name().unwrap().to_str().unwrap().to_string();

        assert_eq!(
            list_backups(&paths).unwrap(),
            vec![name(&third), name(&second), name(&first)]
        );
    }

    #[test]
    fn suffixed_names_sort_above_their_base() {
        let (_tmp, paths) = paths();
        let dir = paths.backup_dir();
        fs::create_dir_all(&dir).unwrap();
        for n in [
            "anno_backup_2024-01-02_03-04-05.zip",
            "anno_backup_2024-01-02_03-04-05-1.zip",
            "anno_backup_2024-01-02_03-04-05-10.zip",
            "anno_backup_2024-01-02_03-04-05-2.zip",
            "anno_backup_2024-01-01_00-00-00.zip",
            "notes.zip",
        ] {
            fs::write(dir.join(n), b"").unwrap();
        }
        assert_eq!(
            list_backups(&paths).unwrap(),
            vec![
                "anno_backup_2024-01-02_03-04-05-10.zip",
                "anno_backup_2024-01-02_03-04-05-2.zip",
                "anno_backup_2024-01-02_03-04-05-1.zip",
                "anno_backup_2024-01-02_03-04-05.zip",
                "anno_backup_2024-01-01_00-00-00.zip",
            ]
        );
    }

    #[test]
    fn backup_order_reads_suffix() {
        assert_eq!(
            backup_order("anno_backup_2024-01-02_03-04-05.zip"),
            ("2024-01-02_03-04-05", 0)
        );
        assert_eq!(
            backup_order("anno_backup_2024-01-02_03-04-05-12.zip"),
            ("2024-01-02_03-04-05", 12)
        );
        assert!(
            backup_order("anno_backup_2024-01-02_03-04-05-2.zip")
                > backup_order("anno_backup_2024-01-02_03-04-05-1.zip")
        );
        assert!(
            backup_order("anno_backup_2024-01-02_03-04-06.zip")
                > backup_order("anno_backup_2024-01-02_03-04-05-9.zip")
        );
    }

    #[test]
    fn failed_snapshot_aborts_restore() {
        let (_tmp, paths) = paths();
        paths.store().save(&[note("t1", "original")]).unwrap();
        let archive = backup_notes(&paths).unwrap();
        let name = archive.file_name().unwrap().to_str().unwrap().to_string();

        // A directory where the store should be makes the snapshot read fail.
        let live = &paths.annotations_file;
        fs::remove_file(live).unwrap();
        fs::create_dir(live).unwrap();

        let err = restore_notes(&paths, &name).err().unwrap();
        assert!(err.to_string().contains("restore aborted"), "{err}");
        assert!(live.is_dir());
        assert!(!live.with_extension("json.restore").exists());
        assert_eq!(list_backups(&paths).unwrap(), vec![name]);
    }

    #[test]
    fn restore_unknown_backup_keeps_store() {
        let (_tmp, paths) = paths();
        let store = paths.store();
        store.save(&[note("t1", "keep")]).unwrap();
        assert!(restore_notes(&paths, "anno_backup_nope.zip").is_err());
        assert!(restore_notes(&paths, "../escape.zip").is_err());
        assert_eq!(store.load().unwrap(), vec![note("t1", "keep")]);
        assert!(list_backups(&paths).unwrap().is_empty());
    }
}
