//! Font directory scanning (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::{self, Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::Result;
use crate::font::{Font, FontDescriptor};

/// One installed font: its identity and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    #[serde(flatten)]
    pub descriptor: FontDescriptor,
    pub path: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct ScanOptions {
    pub follow_symlinks: bool,
    /// Worker threads for parsing; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
}

/// Recursive walker over one root directory that yields parsed `.otf`/`.ttf` files.
///
/// Sibling entries are visited in file-name order, so two walks over an
/// unchanged tree yield the same sequence.
#[derive(Debug, Clone)]
pub struct FontScanner {
    root: PathBuf,
    follow_symlinks: bool,
}

impl FontScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of font-like files under the root. A missing root yields nothing.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let root = path::absolute(&self.root).unwrap_or_else(|_| self.root.clone());

        WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("skipping entry under {}: {err}", self.root.display());
                    None
                }
            })
            .filter(|entry| is_regular_file(entry) && is_font(entry.path()))
            .map(walkdir::DirEntry::into_path)
    }

    /// Lazily parse every candidate, silently dropping files that fail.
    pub fn scan(&self) -> impl Iterator<Item = FontEntry> + '_ {
        self.candidates().filter_map(load_or_skip)
    }
}

/// Open `path`, read its descriptor and close it again.
pub fn load_entry(path: &Path) -> Result<FontEntry> {
    let font = Font::open(path)?;
    let descriptor = font.descriptor()?;
    Ok(FontEntry {
        descriptor,
        path: path.to_path_buf(),
    })
}

/// Scan every root on a worker pool.
///
/// Each file is opened by the task that parses it. The result is ordered by
/// root, then by walk order within the root, regardless of which worker
/// finished first.
pub fn scan_roots(roots: &[PathBuf], opts: &ScanOptions) -> Result<Vec<FontEntry>> {
    let candidates: Vec<PathBuf> = roots
        .iter()
        .flat_map(|root| {
            FontScanner::new(root)
                .follow_symlinks(opts.follow_symlinks)
                .candidates()
                .collect::<Vec<_>>()
        })
        .collect();

    let run = || -> Vec<FontEntry> {
        candidates
            .par_iter()
            .filter_map(|path| load_or_skip(path.clone()))
            .collect()
    };

    if let Some(jobs) = opts.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        Ok(pool.install(run))
    } else {
        Ok(run())
    }
}

fn load_or_skip(path: PathBuf) -> Option<FontEntry> {
    match load_entry(&path) {
        Ok(entry) => Some(entry),
        Err(err) if err.is_per_file() => {
            log::debug!("skipping {}: {err}", path.display());
            None
        }
        Err(err) => {
            log::warn!("skipping {} after unexpected error: {err}", path.display());
            None
        }
    }
}

// Unfollowed symlinks report their own type; a link to a file still counts.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_symlink() {
        return fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file());
    }
    file_type.is_file()
}

fn is_font(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    matches!(ext.as_str(), "ttf" | "otf")
}
