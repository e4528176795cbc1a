/// View helpers for the capture window
///
/// - `panels.rs` - registration, upload and download sections
/// - `status.rs` - status messages shown after each action

pub mod panels;
pub mod status;

pub use status::Status;
