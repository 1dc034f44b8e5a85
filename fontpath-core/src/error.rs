//! Error kinds for font parsing and lookup (made by FontLab https://www.fontlab.com/)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a font request and a resolved path.
///
/// Per-file kinds (see [`FontError::is_per_file`]) are swallowed by the
/// directory scanner; only [`FontError::NotFound`] and
/// [`FontError::UnsupportedPlatform`] reach callers of the registry.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("cannot open font file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {length} bytes at offset {offset}: {reason}")]
    Read {
        offset: u64,
        length: u64,
        reason: String,
    },

    #[error("not an sfnt font (version tag {version:?})")]
    UnsupportedFormat { version: [u8; 4] },

    #[error("font is missing required table {0}")]
    MissingTable(String),

    #[error("name table has no family name record")]
    NameNotFound,

    #[error("no installed font for family '{family}' (bold: {bold}, italic: {italic})")]
    NotFound {
        family: String,
        bold: bool,
        italic: bool,
    },

    #[error("no known font directories for operating system '{0}'")]
    UnsupportedPlatform(String),

    #[error("cannot start scan workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl FontError {
    /// True for failures that concern a single font file and never abort a scan.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            FontError::Open { .. }
                | FontError::Read { .. }
                | FontError::UnsupportedFormat { .. }
                | FontError::MissingTable(_)
                | FontError::NameNotFound
        )
    }
}

pub type Result<T, E = FontError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_file_errors_exclude_request_and_host_failures() {
        assert!(FontError::NameNotFound.is_per_file());
        assert!(FontError::MissingTable("name".into()).is_per_file());
        assert!(!FontError::UnsupportedPlatform("plan9".into()).is_per_file());
        assert!(!FontError::NotFound {
            family: "Arial".into(),
            bold: false,
            italic: false,
        }
        .is_per_file());
    }

    #[test]
    fn not_found_message_names_the_request() {
        let err = FontError::NotFound {
            family: "Arial".into(),
            bold: true,
            italic: false,
        };
        assert_eq!(
            err.to_string(),
            "no installed font for family 'Arial' (bold: true, italic: false)"
        );
    }
}
