use crate::{file::parser::Parser, Result};

/// The `#Blob` heap: length-prefixed byte arrays addressed by byte offset
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Wrap the heap bytes; the first byte must be the empty blob
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is empty or does not start with `0`.
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// The blob starting at `index`, without its length prefix
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the prefix or the payload leave the heap.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        let Some(tail) = self.data.get(index..) else {
            return Err(out_of_bounds_error!());
        };

        let mut parser = Parser::new(tail);
        let len = parser.read_compressed_uint()? as usize;
        parser.read_bytes(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0x00,
            0x03, 0x20, 0x00, 0x01,
            0x80, 0x02, 0xAA, 0xBB,
            0x00,
        ];
        let blob = Blob::from(&data).unwrap();

        assert_eq!(blob.get(0).unwrap(), &[] as &[u8]);
        assert_eq!(blob.get(1).unwrap(), &[0x20, 0x00, 0x01]);
        assert_eq!(blob.get(5).unwrap(), &[0xAA, 0xBB]);
        assert_eq!(blob.get(9).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn invalid() {
        assert!(Blob::from(&[0x01]).is_err());

        let blob = Blob::from(&[0x00, 0x05, 0x01]).unwrap();
        assert!(blob.get(1).is_err());
        assert!(blob.get(3).is_err());
        assert!(blob.get(usize::MAX).is_err());
    }
}
