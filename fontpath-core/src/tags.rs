//! The handful of four-byte tags this crate cares about
//!
//! A font file labels every table and its own container flavour with a
//! four-byte tag. Most of them are of no interest to a lookup that only
//! wants "which family, bold, italic"; the few that matter live here.
//!
//! Made with curiosity at FontLab https://www.fontlab.com/

use read_fonts::types::Tag;

/// Naming table: family, subfamily and friends.
pub const NAME: Tag = Tag::new(b"name");

/// Font header: carries `macStyle`.
pub const HEAD: Tag = Tag::new(b"head");

/// OS/2 and Windows metrics: carries `fsSelection`.
pub const OS2: Tag = Tag::new(b"OS/2");

/// sfnt version tags accepted for single-font `.ttf`/`.otf` files.
pub const SFNT_VERSIONS: [[u8; 4]; 3] = [[0x00, 0x01, 0x00, 0x00], *b"OTTO", *b"true"];

/// Renders a tag as the four characters fonts spell it with, e.g. `OS/2`.
///
/// Non-printable bytes come back as replacement characters rather than
/// failing, since tags straight out of a corrupt file can hold anything.
pub fn tag_to_string(tag: Tag) -> String {
    String::from_utf8_lossy(&tag.to_be_bytes()).to_string()
}
