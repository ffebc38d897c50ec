//! Cursor over a metadata blob.
//!
//! [`Parser`] tracks a position inside a borrowed byte slice and offers the encodings used by
//! signature and attribute blobs: ECMA-335 II.23.2 compressed integers, compressed
//! `TypeDefOrRefOrSpec` tokens and length-prefixed UTF-8 strings.

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::token::Token,
    Result,
};

/// A position-tracking reader over a byte slice
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying data
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` while unread bytes remain
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Skip one byte
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn advance(&mut self) -> Result<()> {
        if self.position >= self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position += 1;
        Ok(())
    }

    /// Look at the next byte without consuming it
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(out_of_bounds_error!()),
        }
    }

    /// Read a little-endian value and advance past it
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read an ECMA-335 compressed unsigned integer (1, 2 or 4 bytes).
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an invalid lead byte and
    /// [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let rest = self.read_bytes(3)?;
            return Ok(((u32::from(first_byte) & 0x1F) << 24)
                | (u32::from(rest[0]) << 16)
                | (u32::from(rest[1]) << 8)
                | u32::from(rest[2]));
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read an ECMA-335 compressed signed integer (sign bit rotated into bit 0).
    ///
    /// # Errors
    /// See [`Parser::read_compressed_uint`].
    pub fn read_compressed_int(&mut self) -> Result<i32> {
        let lead = self.peek_byte()?;
        let unsigned = self.read_compressed_uint()?;

        // The value width depends on the encoding that was used
        let bits = match lead {
            b if b & 0x80 == 0 => 7,
            b if b & 0xC0 == 0x80 => 14,
            _ => 29,
        };

        let magnitude = (unsigned >> 1) as i32;
        if unsigned & 1 == 0 {
            Ok(magnitude)
        } else {
            Ok(magnitude - (1 << (bits - 1)))
        }
    }

    /// Read a compressed `TypeDefOrRefOrSpec` token (II.23.2.8)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the tag selects no table.
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let compressed_token = self.read_compressed_uint()?;

        let table: u32 = match compressed_token & 0x3 {
            0x0 => 0x0200_0000, // TypeDef
            0x1 => 0x0100_0000, // TypeRef
            0x2 => 0x1B00_0000, // TypeSpec
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok(Token::new(table | (compressed_token >> 2)))
    }

    /// Borrow the next `length` bytes and advance past them
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(length) else {
            return Err(out_of_bounds_error!());
        };
        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a `SerString` as used by custom attribute blobs.
    ///
    /// A single `0xFF` byte encodes a null string, anything else is a compressed length followed
    /// by UTF-8 bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for invalid UTF-8.
    pub fn read_ser_string(&mut self) -> Result<Option<String>> {
        if self.peek_byte()? == 0xFF {
            self.advance()?;
            return Ok(None);
        }

        let length = self.read_compressed_uint()? as usize;
        let start = self.position;
        let bytes = self.read_bytes(length)?;

        match std::str::from_utf8(bytes) {
            Ok(string) => Ok(Some(string.to_string())),
            Err(error) => Err(malformed_error!(
                "Invalid UTF-8 string at offset {} - {}",
                start,
                error
            )),
        }
    }
}
