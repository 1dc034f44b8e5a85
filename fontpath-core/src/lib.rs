//! fontpath-core: from "Arial, bold" to the file that actually draws it
//!
//! Text layout code that wants real glyph metrics first has to know which
//! file on disk holds the requested face. This library answers that one
//! question: given a family name and the bold/italic flags, where is the
//! installed font?
//!
//! ## How an answer is found
//!
//! **Scanning**: the platform's font directories are walked once, and every
//! `.ttf`/`.otf` file met along the way is opened and read.
//! - Only the sfnt header, the table directory and three small tables
//!   (`name`, `head`, `OS/2`) are ever touched
//! - A file that cannot be parsed is skipped and never stops the walk
//! - Files are parsed in parallel, but the result is ordered by path so
//!   duplicates resolve the same way on every run
//!
//! **Remembering**: the descriptor → path map is built on the first query
//! and served from memory afterwards.
//!
//! ## A Sample Conversation
//!
//! ```rust,no_run
//! use fontpath_core::registry;
//!
//! let path = registry::find("Arial", true, false)?;
//! println!("Arial Bold lives at {}", path.display());
//! #
//! # Ok::<(), fontpath_core::FontError>(())
//! ```
//!
//! Reading one file directly works too:
//!
//! ```rust,no_run
//! use fontpath_core::font::Font;
//!
//! let font = Font::open("/Library/Fonts/Georgia.ttf")?;
//! println!("{} bold={}", font.family_name()?, font.is_bold()?);
//! #
//! # Ok::<(), fontpath_core::FontError>(())
//! ```
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod discovery;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod font;
pub mod output;
pub mod platform;
pub mod reader;
pub mod registry;
pub mod tables;
pub mod tags;

pub use discovery::{FontEntry, ScanOptions};
pub use error::{FontError, Result};
pub use font::{Font, FontDescriptor};
pub use registry::{find, FontRegistry};
