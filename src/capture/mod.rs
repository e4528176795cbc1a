/// Photo capture module
///
/// This module handles:
/// - Saving uploaded ear photos into the daily folder layout (store.rs)
/// - Bundling a day's photos into a zip archive (archive.rs)

pub mod archive;
pub mod store;

pub use archive::{ArchiveBuilder, DailyArchive};
pub use store::CaptureStore;
