//! Single-file sfnt parser (made by FontLab https://www.fontlab.com/)
//!
//! [`Font`] owns the open file. Dropping it closes the handle, on success
//! and failure paths alike, so callers read what they need and let it go.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use read_fonts::types::Tag;
use serde::{Deserialize, Serialize};

use crate::error::{FontError, Result};
use crate::reader::{decode_array, BeStruct, FontReader};
use crate::tables::{FontTable, TableKind};
use crate::tags::{tag_to_string, SFNT_VERSIONS};

/// The lookup key: family name plus the two style flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family_name: String,
    pub is_bold: bool,
    pub is_italic: bool,
}

impl FontDescriptor {
    pub fn new(family_name: impl Into<String>, is_bold: bool, is_italic: bool) -> Self {
        Self {
            family_name: family_name.into(),
            is_bold,
            is_italic,
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match (self.is_bold, self.is_italic) {
            (false, false) => "Regular",
            (true, false) => "Bold",
            (false, true) => "Italic",
            (true, true) => "Bold Italic",
        };
        write!(f, "{} {style}", self.family_name)
    }
}

/// The 12-byte header at the start of every sfnt file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    pub sfnt_version: [u8; 4],
    pub table_count: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl BeStruct for OffsetTable {
    const SIZE: usize = 12;

    fn decode(buf: &[u8]) -> Self {
        OffsetTable {
            sfnt_version: [buf[0], buf[1], buf[2], buf[3]],
            table_count: BigEndian::read_u16(&buf[4..6]),
            search_range: BigEndian::read_u16(&buf[6..8]),
            entry_selector: BigEndian::read_u16(&buf[8..10]),
            range_shift: BigEndian::read_u16(&buf[10..12]),
        }
    }
}

/// One 16-byte table directory entry. The checksum is kept but never verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl BeStruct for TableRecord {
    const SIZE: usize = 16;

    fn decode(buf: &[u8]) -> Self {
        TableRecord {
            tag: Tag::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            checksum: BigEndian::read_u32(&buf[4..8]),
            offset: BigEndian::read_u32(&buf[8..12]),
            length: BigEndian::read_u32(&buf[12..16]),
        }
    }
}

#[derive(Debug)]
struct TableSlot {
    record: TableRecord,
    decoded: OnceCell<FontTable>,
}

/// An open font file with its table directory already read.
///
/// Table contents are decoded on first request and memoized for the
/// lifetime of this value.
#[derive(Debug)]
pub struct Font<R = File> {
    reader: FontReader<R>,
    header: OffsetTable,
    records: Vec<TableRecord>,
    slots: HashMap<TableKind, TableSlot>,
}

impl Font<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(FontReader::open(path.as_ref())?)
    }
}

impl<R: Read + Seek> Font<R> {
    pub fn from_reader(reader: FontReader<R>) -> Result<Self> {
        let header: OffsetTable = reader.read_struct(0)?;
        if !SFNT_VERSIONS.contains(&header.sfnt_version) {
            return Err(FontError::UnsupportedFormat {
                version: header.sfnt_version,
            });
        }

        let directory = reader.read(
            OffsetTable::SIZE as u64,
            usize::from(header.table_count) * TableRecord::SIZE,
        )?;
        let records: Vec<TableRecord> = decode_array(&directory);

        let mut slots = HashMap::new();
        for record in &records {
            if let Some(kind) = TableKind::from_tag(record.tag) {
                slots.entry(kind).or_insert_with(|| TableSlot {
                    record: *record,
                    decoded: OnceCell::new(),
                });
            }
        }

        Ok(Font {
            reader,
            header,
            records,
            slots,
        })
    }

    pub fn offset_table(&self) -> &OffsetTable {
        &self.header
    }

    /// Every directory record, including tables this crate never decodes.
    pub fn table_records(&self) -> &[TableRecord] {
        &self.records
    }

    pub fn has_table(&self, kind: TableKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// The decoded table of `kind`, or `None` if the font does not carry it.
    pub fn table(&self, kind: TableKind) -> Result<Option<&FontTable>> {
        let Some(slot) = self.slots.get(&kind) else {
            return Ok(None);
        };
        if let Some(table) = slot.decoded.get() {
            return Ok(Some(table));
        }

        match FontTable::decode(&slot.record, &self.reader)? {
            Some(table) => Ok(Some(slot.decoded.get_or_init(|| table))),
            None => Ok(None),
        }
    }

    /// The family name shared by all styles of this typeface, e.g. `Arial`.
    pub fn family_name(&self) -> Result<&str> {
        match self.table(TableKind::Name)?.and_then(FontTable::as_name) {
            Some(name) => name.family_name(),
            None => Err(FontError::MissingTable(tag_to_string(TableKind::Name.tag()))),
        }
    }

    pub fn is_bold(&self) -> Result<bool> {
        self.style_flags().map(|(bold, _)| bold)
    }

    pub fn is_italic(&self) -> Result<bool> {
        self.style_flags().map(|(_, italic)| italic)
    }

    /// Read all three identity facts at once.
    pub fn descriptor(&self) -> Result<FontDescriptor> {
        let (is_bold, is_italic) = self.style_flags()?;
        Ok(FontDescriptor {
            family_name: self.family_name()?.to_string(),
            is_bold,
            is_italic,
        })
    }

    /// `(bold, italic)` from `head.macStyle`, or `OS/2.fsSelection` when `head` is absent.
    fn style_flags(&self) -> Result<(bool, bool)> {
        if let Some(head) = self.table(TableKind::Head)?.and_then(FontTable::as_head) {
            return Ok((head.is_bold(), head.is_italic()));
        }
        if let Some(os2) = self.table(TableKind::Os2)?.and_then(FontTable::as_os2) {
            return Ok((os2.is_bold(), os2.is_italic()));
        }
        Err(FontError::MissingTable(format!(
            "{} or {}",
            tag_to_string(TableKind::Head.tag()),
            tag_to_string(TableKind::Os2.tag())
        )))
    }
}
