// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading keypad capabilities from compiled terminfo entries
//!
//! Only the predefined string section is decoded. Booleans and numbers are
//! skipped, extended capabilities are ignored.

use std::io::{Cursor, Read, Seek, SeekFrom};

/// Index of `rmkx` (keypad_local) in the predefined string capabilities
const KEYPAD_LOCAL: usize = 88;
/// Index of `smkx` (keypad_xmit) in the predefined string capabilities
const KEYPAD_XMIT: usize = 89;

const ABSENT_ENTRY: u16 = 0xffff;
const CANCELED_ENTRY: u16 = 0xfffe;

#[repr(u16)]
enum TerminfoMagic {
    /// Original format, 16-bit numbers
    Magic1 = 0x011a,
    /// 32-bit numbers
    Magic2 = 0x021e,
}

/// Errors reported when parsing a terminfo database
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The magic number is invalid or unsupported
    #[error("Unknown magic number")]
    BadMagic,
    /// A string is not terminated by the NUL byte
    #[error("String without final NUL")]
    UnterminatedString,
    /// Unexpected condition, probably invalid terminfo database
    #[error("Unsupported terminfo format")]
    UnsupportedFormat,
    /// Input/output error, probably truncated terminfo database
    #[error("I/O error")]
    IO(#[from] std::io::Error),
}

fn read_le16(reader: &mut impl Read) -> Result<u16, Error> {
    let mut buffer = [0u8; 2];
    reader.read_exact(&mut buffer)?;
    Ok(u16::from_le_bytes(buffer))
}

fn read_slice<'a>(reader: &mut Cursor<&'a [u8]>, size: usize) -> Result<&'a [u8], Error> {
    let start = reader.position() as usize;
    let end = reader.seek(SeekFrom::Current(size as i64))? as usize;
    reader
        .get_ref()
        .get(start..end)
        .ok_or(Error::UnsupportedFormat)
}

fn get_string(string_table: &[u8], offset: usize) -> Result<&[u8], Error> {
    let Some(string_slice) = string_table.get(offset..) else {
        return Err(Error::UnsupportedFormat);
    };
    match string_slice.iter().position(|c| *c == b'\0') {
        Some(length) => Ok(&string_slice[..length]),
        None => Err(Error::UnterminatedString),
    }
}

/// Control sequences switching the numeric keypad between modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadMode {
    /// `smkx`, enter keypad transmit (application) mode
    pub enter: Vec<u8>,
    /// `rmkx`, leave keypad transmit mode
    pub exit: Vec<u8>,
}

impl KeypadMode {
    /// Extract `smkx` and `rmkx` from a compiled terminfo entry
    ///
    /// Returns `None` if the entry lacks either capability.
    pub fn parse(buffer: &[u8]) -> Result<Option<Self>, Error> {
        let enter = string_capability(buffer, KEYPAD_XMIT)?;
        let exit = string_capability(buffer, KEYPAD_LOCAL)?;
        Ok(enter.zip(exit).map(|(enter, exit)| Self {
            enter: enter.to_vec(),
            exit: exit.to_vec(),
        }))
    }
}

/// Look up a predefined string capability by its index
pub fn string_capability(buffer: &[u8], index: usize) -> Result<Option<&[u8]>, Error> {
    let mut reader = Cursor::new(buffer);
    let magic = read_le16(&mut reader)?;
    let name_size = read_le16(&mut reader)?;
    let bool_count = read_le16(&mut reader)?;
    let num_count = read_le16(&mut reader)?;
    let str_count = usize::from(read_le16(&mut reader)?);
    let str_size = usize::from(read_le16(&mut reader)?);

    let number_size: u64 = match magic {
        val if val == TerminfoMagic::Magic1 as u16 => 2,
        val if val == TerminfoMagic::Magic2 as u16 => 4,
        _ => return Err(Error::BadMagic),
    };

    // Names and booleans, then padding to an even offset before the numbers
    let mut position = reader.position() + u64::from(name_size) + u64::from(bool_count);
    position += position & 1;
    position += number_size * u64::from(num_count);
    reader.set_position(position);

    let str_offsets = read_slice(&mut reader, 2 * str_count)?;
    let str_table = read_slice(&mut reader, str_size)?;

    if index >= str_count {
        return Ok(None);
    }
    let mut offset_reader = Cursor::new(&str_offsets[2 * index..]);
    match read_le16(&mut offset_reader)? {
        ABSENT_ENTRY | CANCELED_ENTRY => Ok(None),
        offset => get_string(str_table, usize::from(offset)).map(Some),
    }
}
