/// Daily zip archives
///
/// Bundles every file under one day's folder into an in-memory zip.
/// Nothing is written to disk; the caller decides where the bytes go.
use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::store::CaptureStore;
use crate::error::Result;
use crate::state::data::date_label;

/// A finished archive for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyArchive {
    date: NaiveDate,
    entry_count: usize,
    bytes: Vec<u8>,
}

impl DailyArchive {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of files bundled in the archive
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Suggested download name (e.g. "mice_2024-01-01.zip")
    pub fn file_name(&self) -> String {
        format!("mice_{}.zip", date_label(self.date))
    }
}

/// Builds daily archives from the capture store's folders
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    store: CaptureStore,
}

impl ArchiveBuilder {
    pub fn new(store: CaptureStore) -> Self {
        Self { store }
    }

    /// Zip every file captured on `date`.
    ///
    /// Returns `Ok(None)` when there is nothing to archive: the day's folder
    /// is missing or holds no files. Entries are named relative to the day's
    /// folder (`<mouse>/<mouse>_<side>.jpg`), added in file-name order with
    /// fixed timestamps, so unchanged folders give identical archives.
    pub fn build_archive(&self, date: NaiveDate) -> Result<Option<DailyArchive>> {
        let date_dir = self.store.date_dir(date);
        if !date_dir.is_dir() {
            debug!("No folder for {}, nothing to archive", date_label(date));
            return Ok(None);
        }

        let files = collect_files(&date_dir)?;
        if files.is_empty() {
            debug!("Folder for {} holds no files, nothing to archive", date_label(date));
            return Ok(None);
        }

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (entry_name, path) in &files {
            writer.start_file(entry_name.as_str(), options)?;
            let mut file = File::open(path)?;
            io::copy(&mut file, &mut writer)?;
        }
        let bytes = writer.finish()?.into_inner();

        info!(
            "📦 Built archive for {}: {} files, {}KB",
            date_label(date),
            files.len(),
            bytes.len() / 1024
        );

        Ok(Some(DailyArchive {
            date,
            entry_count: files.len(),
            bytes,
        }))
    }
}

/// Every regular file below `root` as (entry name, absolute path), sorted.
/// Symlinks are followed, so a linked photo is archived under the link's name.
fn collect_files(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        files.push((entry_name(relative), entry.path().to_path_buf()));
    }

    Ok(files)
}

/// Zip entry names always use `/`, whatever the platform separator is
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Identifier, Side};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn jpeg_bytes(shade: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, Rgb([shade, shade, shade]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        out
    }

    fn setup() -> (TempDir, CaptureStore, ArchiveBuilder) {
        let dir = TempDir::new().unwrap();
        let store = CaptureStore::new(dir.path());
        let builder = ArchiveBuilder::new(store.clone());
        (dir, store, builder)
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_missing_day_is_empty() {
        let (_dir, _store, builder) = setup();
        assert!(builder.build_archive(day()).unwrap().is_none());
    }

    #[test]
    fn test_day_without_files_is_empty() {
        let (_dir, store, builder) = setup();

        // Folders exist but nothing was saved into them
        store
            .resolve_path(day(), &Identifier::new("001").unwrap(), Side::Left)
            .unwrap();

        assert!(store.date_dir(day()).is_dir());
        assert!(builder.build_archive(day()).unwrap().is_none());
    }

    #[test]
    fn test_archive_contains_every_photo() {
        let (_dir, store, builder) = setup();
        let a = Identifier::new("001").unwrap();
        let b = Identifier::new("002").unwrap();

        store.save_photograph(day(), &a, Side::Left, &jpeg_bytes(10)).unwrap();
        store.save_photograph(day(), &a, Side::Right, &jpeg_bytes(20)).unwrap();
        store.save_photograph(day(), &b, Side::Left, &jpeg_bytes(30)).unwrap();

        // A different day must not leak into the archive
        let other_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        store.save_photograph(other_day, &b, Side::Right, &jpeg_bytes(40)).unwrap();

        let archive = builder.build_archive(day()).unwrap().unwrap();

        assert_eq!(archive.entry_count(), 3);
        assert_eq!(archive.date(), day());
        assert_eq!(archive.file_name(), "mice_2024-01-01.zip");
        assert_eq!(
            entry_names(archive.bytes()),
            vec!["001/001_left.jpg", "001/001_right.jpg", "002/002_left.jpg"]
        );
    }

    #[test]
    fn test_entries_match_files_on_disk() {
        let (_dir, store, builder) = setup();
        let id = Identifier::new("001").unwrap();
        let path = store.save_photograph(day(), &id, Side::Left, &jpeg_bytes(99)).unwrap();

        let bytes = builder.build_archive(day()).unwrap().unwrap().into_bytes();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name("001/001_left.jpg").unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();

        assert_eq!(contents, fs::read(path).unwrap());
    }

    #[test]
    fn test_stray_files_are_included() {
        let (_dir, store, builder) = setup();
        let date_dir = store.date_dir(day());
        fs::create_dir_all(date_dir.join("003").join("extra")).unwrap();
        fs::write(date_dir.join("notes.txt"), "weighed").unwrap();
        fs::write(date_dir.join("003").join("extra").join("raw.bin"), [1, 2, 3]).unwrap();

        let archive = builder.build_archive(day()).unwrap().unwrap();

        assert_eq!(
            entry_names(archive.bytes()),
            vec!["003/extra/raw.bin", "notes.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_photo_is_included() {
        let (dir, store, builder) = setup();
        let original = dir.path().join("elsewhere.jpg");
        fs::write(&original, jpeg_bytes(50)).unwrap();

        let session = store.date_dir(day()).join("004");
        fs::create_dir_all(&session).unwrap();
        std::os::unix::fs::symlink(&original, session.join("004_left.jpg")).unwrap();

        let archive = builder.build_archive(day()).unwrap().unwrap();

        assert_eq!(archive.entry_count(), 1);
        let mut zip = ZipArchive::new(Cursor::new(archive.into_bytes())).unwrap();
        let mut entry = zip.by_name("004/004_left.jpg").unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, fs::read(&original).unwrap());
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let (_dir, store, builder) = setup();
        let id = Identifier::new("001").unwrap();
        store.save_photograph(day(), &id, Side::Left, &jpeg_bytes(1)).unwrap();
        store.save_photograph(day(), &id, Side::Right, &jpeg_bytes(2)).unwrap();

        let first = builder.build_archive(day()).unwrap().unwrap();
        let second = builder.build_archive(day()).unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_build_does_not_touch_disk() {
        let (dir, store, builder) = setup();
        let id = Identifier::new("001").unwrap();
        store.save_photograph(day(), &id, Side::Left, &jpeg_bytes(5)).unwrap();

        let before: Vec<_> = WalkDir::new(dir.path())
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap().into_path())
            .collect();
        builder.build_archive(day()).unwrap();
        let after: Vec<_> = WalkDir::new(dir.path())
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap().into_path())
            .collect();

        assert_eq!(before, after);
    }
}
