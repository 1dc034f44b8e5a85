//! Synthetic sfnt files for tests and benchmarks (made by FontLab https://www.fontlab.com/)
//!
//! The output is a structurally valid font: offset table with computed
//! binary-search fields, a tag-sorted directory with checksums, and 4-byte
//! aligned table data. It carries no glyphs.

use read_fonts::tables::name::{Encoding, MacRomanMapping};
use read_fonts::types::Tag;

/// Assembles an sfnt container from raw table bytes.
#[derive(Debug, Clone)]
pub struct SfntBuilder {
    sfnt_version: [u8; 4],
    tables: Vec<(Tag, Vec<u8>)>,
}

impl Default for SfntBuilder {
    fn default() -> Self {
        Self {
            sfnt_version: [0x00, 0x01, 0x00, 0x00],
            tables: Vec::new(),
        }
    }
}

impl SfntBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sfnt_version(mut self, version: [u8; 4]) -> Self {
        self.sfnt_version = version;
        self
    }

    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.push((Tag::new(tag), data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut tables: Vec<&(Tag, Vec<u8>)> = self.tables.iter().collect();
        tables.sort_by_key(|(tag, _)| *tag);

        let count = tables.len() as u16;
        let entry_selector = if count == 0 {
            0
        } else {
            15 - count.leading_zeros() as u16
        };
        let search_range = (1u16 << entry_selector) * 16;
        let range_shift = (count * 16).saturating_sub(search_range);

        let mut out = Vec::new();
        out.extend_from_slice(&self.sfnt_version);
        for field in [count, search_range, entry_selector, range_shift] {
            out.extend_from_slice(&field.to_be_bytes());
        }

        let mut offset = 12 + 16 * tables.len() as u32;
        for (tag, data) in &tables {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&checksum(data).to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len()) as u32;
        }

        for (_, data) in &tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }
        out
    }
}

/// A format 0 `name` table from `(platform_id, encoding_id, name_id, text)` entries.
pub fn name_table(entries: &[(u16, u16, u16, &str)]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = entries
        .iter()
        .map(|(platform, encoding, _, text)| encode_name_string(*platform, *encoding, text))
        .collect();

    let count = entries.len() as u16;
    let storage_offset = 6 + 12 * count;

    let mut out = Vec::new();
    for field in [0, count, storage_offset] {
        out.extend_from_slice(&field.to_be_bytes());
    }

    let mut string_offset = 0u16;
    for ((platform, encoding, name_id, _), bytes) in entries.iter().zip(&encoded) {
        let language = if *platform == 3 { 0x0409 } else { 0 };
        let length = bytes.len() as u16;
        for field in [*platform, *encoding, language, *name_id, length, string_offset] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        string_offset += length;
    }

    for bytes in &encoded {
        out.extend_from_slice(bytes);
    }
    out
}

/// A 54-byte `head` table (version 1.0, 1000 units per em) with the given `macStyle`.
pub fn head_table(mac_style: u16) -> Vec<u8> {
    let mut out = vec![0; 54];
    out[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    out[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    out[18..20].copy_from_slice(&1000u16.to_be_bytes());
    out[44..46].copy_from_slice(&mac_style.to_be_bytes());
    out
}

/// A 78-byte version 0 `OS/2` table with the given `fsSelection`.
pub fn os2_table(fs_selection: u16) -> Vec<u8> {
    let weight: u16 = if fs_selection & 0x0020 != 0 { 700 } else { 400 };
    let mut out = vec![0; 78];
    out[4..6].copy_from_slice(&weight.to_be_bytes());
    out[6..8].copy_from_slice(&5u16.to_be_bytes());
    out[62..64].copy_from_slice(&fs_selection.to_be_bytes());
    out
}

/// A minimal TrueType font naming `family` on both Windows and Mac platforms.
pub fn simple_font(family: &str, is_bold: bool, is_italic: bool) -> Vec<u8> {
    let mac_style = u16::from(is_bold) | (u16::from(is_italic) << 1);
    SfntBuilder::new()
        .table(b"name", name_table(&[(3, 1, 1, family), (1, 0, 1, family)]))
        .table(b"head", head_table(mac_style))
        .build()
}

fn encode_name_string(platform_id: u16, encoding_id: u16, text: &str) -> Vec<u8> {
    match Encoding::new(platform_id, encoding_id) {
        Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        _ => text
            .chars()
            .map(|c| MacRomanMapping.encode(c).unwrap_or(b'?'))
            .collect(),
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_follow_table_count() {
        let bytes = SfntBuilder::new()
            .table(b"name", vec![1])
            .table(b"head", vec![2])
            .table(b"OS/2", vec![3])
            .build();

        // count 3: searchRange 32, entrySelector 1, rangeShift 16
        assert_eq!(&bytes[4..12], &[0, 3, 0, 32, 0, 1, 0, 16]);
        assert_eq!(bytes.len(), 12 + 3 * 16 + 3 * 4);
    }

    #[test]
    fn directory_is_sorted_by_tag() {
        let bytes = SfntBuilder::new()
            .table(b"name", vec![0; 6])
            .table(b"OS/2", vec![0; 2])
            .build();
        assert_eq!(&bytes[12..16], b"OS/2");
        assert_eq!(&bytes[28..32], b"name");
    }

    #[test]
    fn name_strings_use_platform_encoding() {
        let table = name_table(&[(3, 1, 1, "Ab"), (1, 0, 1, "Ab")]);
        let storage = &table[6 + 24..];
        assert_eq!(storage, &[0, b'A', 0, b'b', b'A', b'b']);
    }
}
