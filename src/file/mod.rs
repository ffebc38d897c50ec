//! Access to the bytes of a metadata image.
//!
//! A [`File`] owns the raw bytes of one module, either memory-mapped from disk
//! ([`physical::Physical`]) or held in memory ([`memory::Memory`]), and knows where the ECMA-335
//! metadata root lives inside them.
//!
//! Two layouts are accepted:
//!
//! - **PE images** (`.dll`, `.exe`, `.winmd`). The PE headers are parsed with `goblin`, the CLR
//!   runtime header data directory is followed to the COR20 header, and the metadata RVA is
//!   translated into a file offset through the section table.
//! - **Bare metadata** that starts directly with the `BSJB` signature, as produced by tools that
//!   strip the PE wrapper.
//!
//! The PE structure itself is not kept: once the metadata range is known, only that range is
//! handed to [`crate::metadata::reader::MetadataReader`].

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    metadata::{cor20header::Cor20Header, root::CIL_HEADER_MAGIC},
    Error::{Empty, GoblinErr},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use physical::Physical;

/// Source of the image bytes.
///
/// All implementations must be thread-safe, a [`File`] is shared between every type node of its
/// module.
pub trait Backend: Send + Sync {
    /// Returns a slice of `len` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range leaves the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns all bytes of the image
    fn data(&self) -> &[u8];

    /// Returns the length of the image
    fn len(&self) -> usize;
}

/// How the metadata was found inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// A PE image with a CLR runtime header
    Pe,
    /// Metadata without any PE wrapper
    BareMetadata,
}

/// One loaded image and the location of its metadata
pub struct File {
    data: Box<dyn Backend>,
    kind: ImageKind,
    metadata_offset: usize,
    metadata_len: usize,
}

impl File {
    /// Map the file at `path` and locate its metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be read, and the errors of
    /// [`File::from_mem`] for invalid content.
    pub fn from_file(path: &Path) -> Result<File> {
        let input = Physical::new(path)?;
        Self::load(input)
    }

    /// Take ownership of `data` and locate its metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, [`crate::Error::GoblinErr`] if a PE
    /// image can not be parsed and [`crate::Error::Malformed`] if the CLR header is missing or
    /// invalid.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);
        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let bytes = data.data();
        if bytes.len() >= 4 && bytes[..4] == CIL_HEADER_MAGIC.to_le_bytes() {
            let metadata_len = bytes.len();
            return Ok(File {
                data: Box::new(data),
                kind: ImageKind::BareMetadata,
                metadata_offset: 0,
                metadata_len,
            });
        }

        let (metadata_offset, metadata_len) = Self::locate_metadata(bytes)?;
        data.data_slice(metadata_offset, metadata_len)?;

        Ok(File {
            data: Box::new(data),
            kind: ImageKind::Pe,
            metadata_offset,
            metadata_len,
        })
    }

    /// Walk PE → CLR runtime header → COR20 → metadata, returning the metadata file range
    fn locate_metadata(bytes: &[u8]) -> Result<(usize, usize)> {
        let pe = PE::parse(bytes).map_err(GoblinErr)?;

        let Some(optional_header) = pe.header.optional_header else {
            return Err(malformed_error!("File does not have an OptionalHeader"));
        };

        let Some(clr_dir) = optional_header.data_directories.get_clr_runtime_header() else {
            return Err(malformed_error!(
                "File does not have a CLR runtime header directory"
            ));
        };

        let clr_offset = Self::rva_to_offset(&pe, clr_dir.virtual_address as usize)?;
        let Some(clr_data) = bytes.get(clr_offset..) else {
            return Err(out_of_bounds_error!());
        };

        let cor20 = Cor20Header::read(clr_data)?;
        let metadata_offset = Self::rva_to_offset(&pe, cor20.meta_data_rva as usize)?;

        Ok((metadata_offset, cor20.meta_data_size as usize))
    }

    fn rva_to_offset(pe: &PE, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        for section in &pe.sections {
            let size = section.virtual_size.max(section.size_of_raw_data);
            let Some(section_max) = section.virtual_address.checked_add(size) else {
                return Err(malformed_error!(
                    "Section malformed, causing integer overflow - {} + {}",
                    section.virtual_address,
                    size
                ));
            };

            if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                return Ok((rva - section.virtual_address as usize)
                    + section.pointer_to_raw_data as usize);
            }
        }

        Err(malformed_error!(
            "RVA could not be converted to offset - {}",
            rva
        ))
    }

    /// Total size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the image has no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// How the metadata was located
    #[must_use]
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// All bytes of the image
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// The bytes of the metadata root and its streams
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the recorded range leaves the image.
    pub fn metadata(&self) -> Result<&[u8]> {
        self.data.data_slice(self.metadata_offset, self.metadata_len)
    }
}
