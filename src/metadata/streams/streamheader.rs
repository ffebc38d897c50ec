use crate::{file::io::read_le_at, Result};

/// Maximum length of a stream name including its terminator
const MAX_NAME_LEN: usize = 32;

/// One entry of the stream directory following the metadata root (ECMA-335 II.24.2.2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream, e.g. `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Read a stream header from the start of `data`.
    ///
    /// Names outside of the well-known set (`#Pdb`, `#JTD`, ...) are accepted here and ignored
    /// by the reader.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for truncated data and [`crate::Error::Malformed`] if
    /// the name is not terminated within 32 bytes.
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(out_of_bounds_error!());
        }

        let mut offset = 0;
        let stream_offset = read_le_at::<u32>(data, &mut offset)?;
        let size = read_le_at::<u32>(data, &mut offset)?;

        let name_area = &data[8..data.len().min(8 + MAX_NAME_LEN)];
        let Some(name_len) = name_area.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let name = String::from_utf8_lossy(&name_area[..name_len]).into_owned();

        Ok(StreamHeader {
            offset: stream_offset,
            size,
            name,
        })
    }

    /// Bytes occupied by this header, including the padded name
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}
