use std::ffi::CStr;

use crate::Result;

/// The `#Strings` heap: NUL-terminated UTF-8 identifiers addressed by byte offset
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wrap the heap bytes; the first byte must be the empty string
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is empty or does not start with `0`.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// The string starting at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `index` is outside the heap and
    /// [`crate::Error::Malformed`] for unterminated or non UTF-8 strings.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        let Some(tail) = self.data.get(index..) else {
            return Err(out_of_bounds_error!());
        };

        CStr::from_bytes_until_nul(tail)
            .ok()
            .and_then(|string| string.to_str().ok())
            .ok_or_else(|| malformed_error!("Invalid string at index - {}", index))
    }
}
