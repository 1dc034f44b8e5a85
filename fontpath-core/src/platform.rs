//! Where installed fonts live on each host (made by FontLab https://www.fontlab.com/)

use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{FontError, Result};

/// Environment variable that replaces the platform directory list.
///
/// Uses the host's path-list syntax (`:` on Unix, `;` on Windows).
pub const FONT_DIRS_ENV: &str = "FONTPATH_FONT_DIRS";

/// Source of the ordered root directories a registry build scans.
pub trait FontDirectories: Send + Sync {
    fn font_directories(&self) -> Result<Vec<PathBuf>>;
}

/// The conventional font directories of the running operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontDirectories;

impl FontDirectories for SystemFontDirectories {
    fn font_directories(&self) -> Result<Vec<PathBuf>> {
        directories_for(env::consts::OS, |key| env::var_os(key))
    }
}

/// A fixed list of roots, e.g. from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDirectories(pub Vec<PathBuf>);

impl FontDirectories for FixedDirectories {
    fn font_directories(&self) -> Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Font directories for `os` (as spelled by `std::env::consts::OS`), reading
/// environment variables through `var`.
///
/// Directories are not checked for existence. An OS without a known
/// convention is an error rather than an empty list.
pub fn directories_for(
    os: &str,
    var: impl Fn(&str) -> Option<OsString>,
) -> Result<Vec<PathBuf>> {
    if let Some(raw) = var(FONT_DIRS_ENV) {
        let overrides: Vec<PathBuf> = env::split_paths(&raw)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if !overrides.is_empty() {
            return Ok(dedup_in_order(overrides));
        }
    }

    let home = var("HOME").map(PathBuf::from);
    let mut dirs = Vec::new();

    match os {
        "macos" => {
            dirs.push(PathBuf::from("/Library/Fonts"));
            dirs.push(PathBuf::from("/Network/Library/Fonts"));
            dirs.push(PathBuf::from("/System/Library/Fonts"));
            if let Some(home) = home {
                dirs.push(home.join("Library/Fonts"));
                dirs.push(home.join(".fonts"));
            }
        }
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            dirs.push(PathBuf::from("/usr/share/fonts"));
            dirs.push(PathBuf::from("/usr/local/share/fonts"));
            match var("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
                Some(data_home) => dirs.push(PathBuf::from(data_home).join("fonts")),
                None => {
                    if let Some(home) = &home {
                        dirs.push(home.join(".local/share/fonts"));
                    }
                }
            }
            if let Some(home) = home {
                dirs.push(home.join(".fonts"));
            }
        }
        "windows" => {
            let system_root = var("SYSTEMROOT")
                .or_else(|| var("WINDIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
            dirs.push(system_root.join("Fonts"));
            if let Some(local_appdata) = var("LOCALAPPDATA") {
                dirs.push(
                    PathBuf::from(local_appdata)
                        .join("Microsoft")
                        .join("Windows")
                        .join("Fonts"),
                );
            }
        }
        other => return Err(FontError::UnsupportedPlatform(other.to_string())),
    }

    Ok(dedup_in_order(dirs))
}

fn dedup_in_order(mut dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    dirs.retain(|dir| seen.insert(dir.clone()));
    dirs
}
