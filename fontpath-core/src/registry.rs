//! Memoized descriptor → path registry (made by FontLab https://www.fontlab.com/)
//!
//! A registry starts empty, scans its directories on the first query and
//! answers every later query from that one map. New fonts installed after
//! the build stay invisible until [`FontRegistry::rebuild`] or
//! [`FontRegistry::reset`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::discovery::{scan_roots, FontEntry, ScanOptions};
use crate::error::{FontError, Result};
use crate::font::FontDescriptor;
use crate::platform::{FontDirectories, SystemFontDirectories};

pub type FontMap = HashMap<FontDescriptor, PathBuf>;

pub struct FontRegistry {
    directories: Box<dyn FontDirectories>,
    options: ScanOptions,
    fonts: Mutex<Option<Arc<FontMap>>>,
}

impl FontRegistry {
    pub fn new(directories: impl FontDirectories + 'static) -> Self {
        Self {
            directories: Box::new(directories),
            options: ScanOptions::default(),
            fonts: Mutex::new(None),
        }
    }

    /// A registry over the host's conventional font directories.
    pub fn system() -> Self {
        Self::new(SystemFontDirectories)
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Path of the installed font matching the family name and both style flags exactly.
    pub fn find(&self, family_name: &str, is_bold: bool, is_italic: bool) -> Result<PathBuf> {
        let fonts = self.fonts()?;
        let key = FontDescriptor::new(family_name, is_bold, is_italic);
        fonts.get(&key).cloned().ok_or_else(|| FontError::NotFound {
            family: family_name.to_string(),
            bold: is_bold,
            italic: is_italic,
        })
    }

    /// The full map, building it first if this is the first query.
    ///
    /// Concurrent first callers wait on the one build in progress. A failed
    /// build leaves the registry empty, so the next query tries again.
    pub fn fonts(&self) -> Result<Arc<FontMap>> {
        let mut slot = self.lock();
        if let Some(fonts) = slot.as_ref() {
            return Ok(Arc::clone(fonts));
        }

        let fonts = Arc::new(self.build()?);
        *slot = Some(Arc::clone(&fonts));
        Ok(fonts)
    }

    /// Every entry, ordered by path.
    pub fn entries(&self) -> Result<Vec<FontEntry>> {
        let fonts = self.fonts()?;
        let mut entries: Vec<FontEntry> = fonts
            .iter()
            .map(|(descriptor, path)| FontEntry {
                descriptor: descriptor.clone(),
                path: path.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.descriptor.cmp(&b.descriptor))
        });
        Ok(entries)
    }

    pub fn is_built(&self) -> bool {
        self.lock().is_some()
    }

    /// Forget the current map; the next query scans again.
    pub fn reset(&self) {
        *self.lock() = None;
    }

    /// Scan again now and replace the current map.
    pub fn rebuild(&self) -> Result<Arc<FontMap>> {
        let mut slot = self.lock();
        *slot = None;
        let fonts = Arc::new(self.build()?);
        *slot = Some(Arc::clone(&fonts));
        Ok(fonts)
    }

    fn build(&self) -> Result<FontMap> {
        let roots = self.directories.font_directories()?;
        let entries = scan_roots(&roots, &self.options)?;

        let mut fonts = FontMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(previous) = fonts.insert(entry.descriptor, entry.path) {
                log::debug!("replacing earlier font {}", previous.display());
            }
        }

        log::info!(
            "indexed {} fonts from {} directories",
            fonts.len(),
            roots.len()
        );
        Ok(fonts)
    }

    // The map is only ever swapped whole, so a poisoned lock still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<FontMap>>> {
        self.fonts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LazyLock<FontRegistry> = LazyLock::new(FontRegistry::system);

/// The process-wide registry over the host's font directories.
pub fn global() -> &'static FontRegistry {
    &GLOBAL
}

/// Resolve a font request against the process-wide registry.
pub fn find(family_name: &str, is_bold: bool, is_italic: bool) -> Result<PathBuf> {
    GLOBAL.find(family_name, is_bold, is_italic)
}

/// Drop the process-wide map so the next [`find`] rescans.
pub fn reset() {
    GLOBAL.reset()
}
