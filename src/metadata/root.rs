//! The metadata root (ECMA-335 II.24.2.1) and its stream directory.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Result,
};

/// The `BSJB` signature that starts every metadata root
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Upper bound for the number of streams a root may declare
const MAX_STREAMS: u16 = 6;

/// The metadata root
#[derive(Debug, Clone)]
pub struct Root {
    /// Magic signature, always `BSJB`
    pub signature: u32,
    /// Major version, always 1
    pub major_version: u16,
    /// Minor version, always 1
    pub minor_version: u16,
    /// Runtime version string, e.g. `v4.0.30319` or `WindowsRuntime 1.4`
    pub version: String,
    /// Reserved flags
    pub flags: u16,
    /// The stream directory
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parse the root at the start of `data`, validating every stream range against `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a bad signature, stream count or stream range, and
    /// [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(out_of_bounds_error!());
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let version_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_length
            ));
        };
        if version_end + 4 > data.len() {
            return Err(out_of_bounds_error!());
        }

        let version_bytes = &data[16..version_end];
        let version_len = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || stream_count > MAX_STREAMS {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            let Some(header_data) = data.get(offset..) else {
                return Err(out_of_bounds_error!());
            };

            let header = StreamHeader::from(header_data)?;
            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(out_of_bounds_error!()),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        header.offset,
                        header.size
                    ))
                }
            }

            offset += header.encoded_len();
            stream_headers.push(header);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            version,
            flags,
            stream_headers,
        })
    }

    /// Find a stream header by name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}
