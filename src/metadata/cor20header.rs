//! The CLI header (`IMAGE_COR20_HEADER`, ECMA-335 II.25.3.3).
//!
//! Only the fields needed to find the metadata root are kept. The remaining directories
//! (resources, strong name, vtable fixups) have no bearing on the type graph.

use crate::{file::parser::Parser, Result};

/// Size of the CLI header, also the required value of its `cb` field
pub const COR20_HEADER_SIZE: usize = 72;

/// The parts of the CLI header that locate the metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Minimum runtime major version
    pub major_runtime_version: u16,
    /// Minimum runtime minor version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*`
    pub flags: u32,
    /// Token of the entry point method, or of the file holding it
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Parse and validate a CLI header from the start of `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too short and
    /// [`crate::Error::Malformed`] if the header fails validation.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < COR20_HEADER_SIZE {
            return Err(out_of_bounds_error!());
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != COR20_HEADER_SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = parser.read_le::<u32>()?;
        let entry_point_token = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const HEADER: [u8; 72] = [
        0x48, 0x00, 0x00, 0x00, // cb
        0x02, 0x00,             // major_runtime_version
        0x05, 0x00,             // minor_runtime_version
        0x00, 0x20, 0x00, 0x00, // meta_data_rva
        0x00, 0x04, 0x00, 0x00, // meta_data_size
        0x01, 0x00, 0x00, 0x00, // flags
        0x00, 0x00, 0x00, 0x00, // entry_point_token
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn crafted() {
        let header = Cor20Header::read(&HEADER).unwrap();

        assert_eq!(header.cb, 72);
        assert_eq!(header.major_runtime_version, 2);
        assert_eq!(header.minor_runtime_version, 5);
        assert_eq!(header.meta_data_rva, 0x2000);
        assert_eq!(header.meta_data_size, 0x400);
        assert_eq!(header.flags, 1);
    }

    #[test]
    fn invalid() {
        assert!(Cor20Header::read(&HEADER[..40]).is_err());

        let mut bad_cb = HEADER;
        bad_cb[0] = 0x40;
        assert!(Cor20Header::read(&bad_cb).is_err());

        let mut no_metadata = HEADER;
        no_metadata[12..16].copy_from_slice(&[0, 0, 0, 0]);
        assert!(Cor20Header::read(&no_metadata).is_err());
    }
}
