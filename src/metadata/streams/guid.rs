use crate::Result;

/// The `#GUID` heap: 16-byte GUIDs addressed by 1-based index
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Wrap the heap bytes
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap can not hold a single GUID.
    pub fn from(data: &'a [u8]) -> Result<Guid<'a>> {
        if data.len() < 16 {
            return Err(malformed_error!("Data for #GUID heap is too small"));
        }

        Ok(Guid { data })
    }

    /// The GUID at 1-based `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for index `0` or an index past the heap.
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index == 0 {
            return Err(out_of_bounds_error!());
        }

        let start = (index - 1).saturating_mul(16);
        let Some(bytes) = self.data.get(start..start.saturating_add(16)) else {
            return Err(out_of_bounds_error!());
        };

        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(bytes);
        Ok(uguid::Guid::from_bytes(buffer))
    }
}
