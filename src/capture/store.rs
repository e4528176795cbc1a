/// Photo storage on disk
///
/// Layout: `<base>/<YYYY-MM-DD>/<mouse>/<mouse>_<side>.jpg`
/// Every upload is decoded and re-encoded as JPEG, replacing any
/// earlier photo for the same day, mouse and side.
use chrono::NaiveDate;
use image::DynamicImage;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CaptureError, Result};
use crate::state::data::{date_label, CaptureSession, Identifier, Side};

/// Default JPEG quality for saved photos
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone)]
pub struct CaptureStore {
    base_dir: PathBuf,
    jpeg_quality: u8,
}

impl CaptureStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Use a different JPEG quality (clamped to 1..=100)
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Folder holding every session of one day
    pub fn date_dir(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(date_label(date))
    }

    /// Folder of one mouse on one day
    pub fn session_dir(&self, session: &CaptureSession) -> Result<PathBuf> {
        check_path_component(&session.identifier)?;
        Ok(self.date_dir(session.date).join(session.identifier.as_str()))
    }

    /// Where the photo for (date, mouse, side) lives. Touches nothing on disk.
    pub fn photo_path(&self, date: NaiveDate, identifier: &Identifier, side: Side) -> Result<PathBuf> {
        let session = CaptureSession::new(date, identifier.clone());
        Ok(self.session_dir(&session)?.join(session.file_name(side)))
    }

    /// Same location as `photo_path`, but the day and mouse folders
    /// are created if they don't exist yet.
    pub fn resolve_path(&self, date: NaiveDate, identifier: &Identifier, side: Side) -> Result<PathBuf> {
        let path = self.photo_path(date, identifier, side)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Decode an uploaded photo and store it as JPEG.
    ///
    /// Returns the path written. Undecodable bytes fail with `Decode`
    /// before anything is created on disk.
    pub fn save_photograph(
        &self,
        date: NaiveDate,
        identifier: &Identifier,
        side: Side,
        image_bytes: &[u8],
    ) -> Result<PathBuf> {
        let img = image::load_from_memory(image_bytes).map_err(CaptureError::Decode)?;

        // JPEG has no alpha channel, flatten everything to 8-bit RGB first
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut jpeg = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            Cursor::new(&mut jpeg),
            self.jpeg_quality,
        );
        DynamicImage::ImageRgb8(rgb)
            .write_with_encoder(encoder)
            .map_err(CaptureError::Encode)?;

        let path = self.resolve_path(date, identifier, side)?;
        fs::write(&path, &jpeg)?;

        info!(
            "📸 Saved {} photo of mouse {} ({}x{}, {}KB): {}",
            side.label(),
            identifier,
            width,
            height,
            jpeg.len() / 1024,
            path.display()
        );

        Ok(path)
    }

    /// Read back a stored photo, if there is one
    pub fn load_photograph(
        &self,
        date: NaiveDate,
        identifier: &Identifier,
        side: Side,
    ) -> Result<Option<Vec<u8>>> {
        let path = self.photo_path(date, identifier, side)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// True once both ears have been photographed for this day
    pub fn both_sides_present(&self, date: NaiveDate, identifier: &Identifier) -> bool {
        Side::ALL.iter().all(|&side| match self.photo_path(date, identifier, side) {
            Ok(path) => path.is_file(),
            Err(e) => {
                debug!("No photo location for mouse {}: {}", identifier, e);
                false
            }
        })
    }
}

/// Reject identifiers that would escape or break the folder layout
fn check_path_component(identifier: &Identifier) -> Result<()> {
    let token = identifier.as_str();
    let mut components = Path::new(token).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if !single_normal || token.contains(['/', '\\', '\0']) {
        return Err(CaptureError::InvalidIdentifier(token.to_string()));
    }
    Ok(())
}
