use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::data::Identifier;
use crate::error::{CaptureError, Result};

/// File name of the registry inside the storage root
pub const REGISTRY_FILE: &str = "mice_list.txt";

/// The Registry keeps the list of known mouse numbers.
/// It is backed by a plain text file with one number per line,
/// and the file is kept in sync with memory after every change.
pub struct Registry {
    identifiers: Vec<Identifier>,
    path: PathBuf,
}

impl Registry {
    /// Open the registry stored at `path`.
    ///
    /// A missing file is an empty registry; the file is only created
    /// by the first `add`. A file that was edited by hand (missing final
    /// newline, blank or repeated lines, stray whitespace) is rewritten
    /// in one-identifier-per-line form so later appends stay in sync.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let identifiers = Self::load(&path)?;

        let registry = Registry { identifiers, path };
        match fs::read(&registry.path) {
            Ok(raw) if raw != registry.contents().as_bytes() => {
                warn!("✏️  Normalizing hand-edited registry {}", registry.path.display());
                fs::write(&registry.path, registry.contents())?;
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!(
            "📋 Registry loaded from {} ({} mice)",
            registry.path.display(),
            registry.identifiers.len()
        );

        Ok(registry)
    }

    /// Read the identifiers stored in `path`, in insertion order.
    ///
    /// Lines are trimmed; blank lines and repeats are skipped so the
    /// result is always a list of unique identifiers.
    pub fn load(path: &Path) -> Result<Vec<Identifier>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // A stray non-UTF-8 byte must not lock the operator out of the list
        let contents = String::from_utf8_lossy(&raw);
        if let Cow::Owned(_) = contents {
            warn!("Registry {} is not valid UTF-8, replacing bad bytes", path.display());
        }

        let mut identifiers: Vec<Identifier> = Vec::new();
        for line in contents.lines() {
            // Blank lines are not identifiers
            let Ok(id) = Identifier::new(line) else {
                continue;
            };
            if identifiers.contains(&id) {
                debug!("Skipping repeated entry '{}' in {}", id, path.display());
                continue;
            }
            identifiers.push(id);
        }

        Ok(identifiers)
    }

    /// Get the path to the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered identifiers, oldest first
    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    pub fn contains(&self, id: &str) -> bool {
        self.identifiers.iter().any(|known| known.as_str() == id.trim())
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Register a new mouse number.
    /// Appends it to memory and to the end of the file.
    pub fn add(&mut self, raw: &str) -> Result<Identifier> {
        let id = Identifier::new(raw)?;
        if self.identifiers.contains(&id) {
            return Err(CaptureError::Duplicate(id.to_string()));
        }

        // Ensure the storage root exists before the first write
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", id)?;

        self.identifiers.push(id.clone());
        info!("🐭 Registered mouse {}", id);

        Ok(id)
    }

    /// Remove a mouse number.
    /// The whole file is rewritten from the updated list.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let position = self
            .identifiers
            .iter()
            .position(|known| known.as_str() == id.trim())
            .ok_or_else(|| CaptureError::NotFound(id.trim().to_string()))?;

        let mut remaining = self.identifiers.clone();
        let removed = remaining.remove(position);

        // Memory only changes once the rewrite succeeded
        let previous = std::mem::replace(&mut self.identifiers, remaining);
        if let Err(e) = fs::write(&self.path, self.contents()) {
            self.identifiers = previous;
            return Err(e.into());
        }

        info!("🗑️  Removed mouse {}", removed);

        Ok(())
    }

    /// The file contents matching the in-memory list
    fn contents(&self) -> String {
        self.identifiers
            .iter()
            .map(|known| format!("{}\n", known))
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("path", &self.path)
            .field("len", &self.identifiers.len())
            .finish()
    }
}
