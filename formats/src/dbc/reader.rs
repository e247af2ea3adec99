use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::ParserError;

const MAGIC: u32 = u32::from_le_bytes(*b"WDBC");
const HEADER_LEN: usize = 20;

/// A parsed tabular record file: a
/// header, `record_count` fixed-width records of `field_count` little-endian u32
/// words each, and a trailing inline string pool addressed by byte offset.
#[derive(Debug)]
pub struct DbcFile {
    pub field_count: u32,
    pub records: Vec<Vec<u32>>,
    string_pool: Vec<u8>,
}

impl DbcFile {
    pub fn parse(bytes: &[u8]) -> Result<DbcFile, ParserError> {
        if bytes.len() < HEADER_LEN {
            return Err(ParserError::FormatError {
                reason: "DBC file shorter than its fixed header",
            });
        }

        let mut rdr = Cursor::new(bytes);
        let magic = rdr.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(ParserError::InvalidMagicValue { magic });
        }

        let record_count = rdr.read_u32::<LittleEndian>()?;
        let field_count = rdr.read_u32::<LittleEndian>()?;
        let record_size = rdr.read_u32::<LittleEndian>()?;
        let string_block_size = rdr.read_u32::<LittleEndian>()?;

        let records_start = HEADER_LEN;
        let strings_start = records_start + record_count as usize * record_size as usize;

        let record_words = bytes
            .get(records_start..strings_start)
            .ok_or(ParserError::FormatError {
                reason: "DBC record block exceeds file length",
            })?;

        let mut records = Vec::with_capacity(record_count as usize);
        let mut record_rdr = Cursor::new(record_words);
        for _ in 0..record_count {
            let mut fields = Vec::with_capacity(field_count as usize);
            for _ in 0..field_count {
                fields.push(record_rdr.read_u32::<LittleEndian>()?);
            }
            records.push(fields);
        }

        let string_pool = bytes
            .get(strings_start..strings_start + string_block_size as usize)
            .ok_or(ParserError::FormatError {
                reason: "DBC string pool exceeds file length",
            })?
            .to_vec();

        Ok(DbcFile { field_count, records, string_pool })
    }

    /// Resolves a string-pool field value. Offset 0 is the empty string; an
    /// out-of-range offset also yields the empty string; otherwise the bytes from
    /// `offset` up to (not including) the next NUL are decoded as UTF-8 (lossily).
    pub fn lookup_string(&self, offset: u32) -> String {
        if offset == 0 {
            return String::new();
        }

        let start = offset as usize;
        let Some(tail) = self.string_pool.get(start..) else {
            return String::new();
        };

        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        String::from_utf8_lossy(&tail[..end]).into_owned()
    }
}
