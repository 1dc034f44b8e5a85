//! Decoders for the `name`, `head` and `OS/2` tables (made by FontLab https://www.fontlab.com/)
//!
//! Only the bytes needed to answer "which family, bold, italic" are read.
//! Every other table tag maps to no decoder at all.

use std::io::{Read, Seek};

use byteorder::{BigEndian, ByteOrder};
use read_fonts::tables::name::{Encoding, MacRomanMapping};
use read_fonts::types::Tag;

use crate::error::{FontError, Result};
use crate::font::TableRecord;
use crate::reader::{decode_array, BeStruct, FontReader};
use crate::tags;

/// Name ID of the font family name.
pub const FAMILY_NAME_ID: u16 = 1;

const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_MAC_ROMAN: u16 = 0;
const ENCODING_WINDOWS_UNICODE_BMP: u16 = 1;

/// Byte offset of `macStyle` within `head`.
const MAC_STYLE_OFFSET: u32 = 44;
/// Byte offset of `fsSelection` within `OS/2`.
const FS_SELECTION_OFFSET: u32 = 62;

/// The tables this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Name,
    Head,
    Os2,
}

impl TableKind {
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            tags::NAME => Some(TableKind::Name),
            tags::HEAD => Some(TableKind::Head),
            tags::OS2 => Some(TableKind::Os2),
            _ => None,
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            TableKind::Name => tags::NAME,
            TableKind::Head => tags::HEAD,
            TableKind::Os2 => tags::OS2,
        }
    }
}

/// A decoded table, one variant per [`TableKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontTable {
    Name(NameTable),
    Head(HeadTable),
    Os2(Os2Table),
}

impl FontTable {
    /// Decode the table described by `record`, or `None` for a tag without a decoder.
    pub fn decode<R: Read + Seek>(
        record: &TableRecord,
        reader: &FontReader<R>,
    ) -> Result<Option<Self>> {
        let Some(kind) = TableKind::from_tag(record.tag) else {
            return Ok(None);
        };
        log::trace!(
            "decoding '{}' table at {} ({} bytes)",
            tags::tag_to_string(record.tag),
            record.offset,
            record.length
        );

        let table = match kind {
            TableKind::Name => FontTable::Name(NameTable::read(reader, record)?),
            TableKind::Head => FontTable::Head(HeadTable::read(reader, record)?),
            TableKind::Os2 => FontTable::Os2(Os2Table::read(reader, record)?),
        };
        Ok(Some(table))
    }

    pub fn kind(&self) -> TableKind {
        match self {
            FontTable::Name(_) => TableKind::Name,
            FontTable::Head(_) => TableKind::Head,
            FontTable::Os2(_) => TableKind::Os2,
        }
    }

    pub fn as_name(&self) -> Option<&NameTable> {
        match self {
            FontTable::Name(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_head(&self) -> Option<&HeadTable> {
        match self {
            FontTable::Head(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_os2(&self) -> Option<&Os2Table> {
        match self {
            FontTable::Os2(table) => Some(table),
            _ => None,
        }
    }
}

/// Format, record count and string storage offset at the start of `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameHeader {
    pub format: u16,
    pub count: u16,
    pub storage_offset: u16,
}

impl BeStruct for NameHeader {
    const SIZE: usize = 6;

    fn decode(buf: &[u8]) -> Self {
        NameHeader {
            format: BigEndian::read_u16(&buf[0..2]),
            count: BigEndian::read_u16(&buf[2..4]),
            storage_offset: BigEndian::read_u16(&buf[4..6]),
        }
    }
}

/// One candidate string in the `name` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub length: u16,
    /// Offset of the string from the start of string storage.
    pub offset: u16,
}

impl BeStruct for NameRecord {
    const SIZE: usize = 12;

    fn decode(buf: &[u8]) -> Self {
        NameRecord {
            platform_id: BigEndian::read_u16(&buf[0..2]),
            encoding_id: BigEndian::read_u16(&buf[2..4]),
            language_id: BigEndian::read_u16(&buf[4..6]),
            name_id: BigEndian::read_u16(&buf[6..8]),
            length: BigEndian::read_u16(&buf[8..10]),
            offset: BigEndian::read_u16(&buf[10..12]),
        }
    }
}

impl NameRecord {
    fn is_windows_unicode(&self) -> bool {
        self.platform_id == PLATFORM_WINDOWS && self.encoding_id == ENCODING_WINDOWS_UNICODE_BMP
    }

    fn is_mac_roman(&self) -> bool {
        self.platform_id == PLATFORM_MACINTOSH && self.encoding_id == ENCODING_MAC_ROMAN
    }
}

/// The naming table, reduced to its records and the resolved family name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    pub format: u16,
    pub records: Vec<NameRecord>,
    family_name: Option<String>,
}

impl NameTable {
    fn read<R: Read + Seek>(reader: &FontReader<R>, record: &TableRecord) -> Result<Self> {
        let start = u64::from(record.offset);
        check_within(record, 0, NameHeader::SIZE as u64)?;
        let header: NameHeader = reader.read_struct(start)?;

        let records_len = usize::from(header.count) * NameRecord::SIZE;
        check_within(record, NameHeader::SIZE as u64, records_len as u64)?;
        let records: Vec<NameRecord> =
            decode_array(&reader.read(start + NameHeader::SIZE as u64, records_len)?);

        let family_name = match select_family_record(&records) {
            Some(found) => {
                let relative = u64::from(header.storage_offset) + u64::from(found.offset);
                check_within(record, relative, u64::from(found.length))?;
                let bytes = reader.read(start + relative, usize::from(found.length))?;
                Some(decode_name_string(&bytes, found.platform_id, found.encoding_id))
                    .filter(|name| !name.is_empty())
            }
            None => None,
        };

        Ok(NameTable {
            format: header.format,
            records,
            family_name,
        })
    }

    /// The family name (name ID 1), preferring Windows/Unicode over Mac/Roman.
    ///
    /// An empty string counts as no family name.
    pub fn family_name(&self) -> Result<&str> {
        self.family_name.as_deref().ok_or(FontError::NameNotFound)
    }
}

/// Pick the family-name record: Windows/Unicode BMP first, then
/// Macintosh/Roman, then whichever family record came first.
pub fn select_family_record(records: &[NameRecord]) -> Option<&NameRecord> {
    let mut family = records.iter().filter(|r| r.name_id == FAMILY_NAME_ID);
    let first = family.clone().next()?;

    family
        .clone()
        .find(|r| r.is_windows_unicode())
        .or_else(|| family.find(|r| r.is_mac_roman()))
        .or(Some(first))
}

/// Decode raw name-string bytes by the encoding its platform/encoding pair implies.
///
/// Anything that is not a UTF-16BE pair is read as single-byte Mac Roman.
pub fn decode_name_string(bytes: &[u8], platform_id: u16, encoding_id: u16) -> String {
    match Encoding::new(platform_id, encoding_id) {
        Encoding::Utf16Be => {
            let units = bytes.chunks_exact(2).map(BigEndian::read_u16);
            char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        _ => bytes.iter().map(|&b| MacRomanMapping.decode(b)).collect(),
    }
}

/// `macStyle` from the font header: bit 0 bold, bit 1 italic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadTable {
    pub mac_style: u16,
}

impl HeadTable {
    fn read<R: Read + Seek>(reader: &FontReader<R>, record: &TableRecord) -> Result<Self> {
        let mac_style = read_field_u16(reader, record, MAC_STYLE_OFFSET)?;
        Ok(HeadTable { mac_style })
    }

    pub fn is_bold(&self) -> bool {
        self.mac_style & 0x0001 != 0
    }

    pub fn is_italic(&self) -> bool {
        self.mac_style & 0x0002 != 0
    }
}

/// `fsSelection` from OS/2: bit 0 italic, bit 5 bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Table {
    pub fs_selection: u16,
}

impl Os2Table {
    fn read<R: Read + Seek>(reader: &FontReader<R>, record: &TableRecord) -> Result<Self> {
        let fs_selection = read_field_u16(reader, record, FS_SELECTION_OFFSET)?;
        Ok(Os2Table { fs_selection })
    }

    pub fn is_bold(&self) -> bool {
        self.fs_selection & 0x0020 != 0
    }

    pub fn is_italic(&self) -> bool {
        self.fs_selection & 0x0001 != 0
    }
}

/// Read a `u16` at a fixed offset inside a table, refusing to look past its declared length.
fn read_field_u16<R: Read + Seek>(
    reader: &FontReader<R>,
    record: &TableRecord,
    field_offset: u32,
) -> Result<u16> {
    check_within(record, u64::from(field_offset), 2)?;
    reader.read_u16(u64::from(record.offset) + u64::from(field_offset))
}

/// Fail unless `[relative, relative + length)` lies inside the table.
fn check_within(record: &TableRecord, relative: u64, length: u64) -> Result<()> {
    if relative + length <= u64::from(record.length) {
        return Ok(());
    }
    Err(FontError::Read {
        offset: u64::from(record.offset) + relative,
        length,
        reason: format!(
            "'{}' table is only {} bytes",
            tags::tag_to_string(record.tag),
            record.length
        ),
    })
}
