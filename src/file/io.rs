//! Little-endian primitive reads over metadata byte slices.
//!
//! Every multi-byte value inside ECMA-335 metadata is stored little-endian. The helpers here are
//! the only place where raw slices are turned into integers, and all of them are bounds-checked:
//! a short buffer yields [`crate::Error::OutOfBounds`] instead of a panic.

use crate::{Error::OutOfBounds, Result};

/// Integer and float types that can be decoded from a little-endian byte slice.
pub trait CilIO: Sized {
    /// Fixed-size byte representation of `Self`
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Build `Self` from its little-endian byte representation
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; $n];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
    f32 => 4, f64 => 8,
);

/// Read a value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would leave `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(bytes) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_le_bytes(bytes))
}

/// Read a 2- or 4-byte index at `offset`, depending on `is_large`, widened to `u32`.
///
/// Heap and table indexes change width with the size of the heap or table they point into.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would leave `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    if is_large {
        read_le_at::<u32>(data, offset)
    } else {
        Ok(u32::from(read_le_at::<u16>(data, offset)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_unsigned() {
        assert_eq!(read_le::<u8>(&TEST_BUFFER).unwrap(), 0x01);
        assert_eq!(read_le::<u16>(&TEST_BUFFER).unwrap(), 0x0201);
        assert_eq!(read_le::<u32>(&TEST_BUFFER).unwrap(), 0x0403_0201);
        assert_eq!(read_le::<u64>(&TEST_BUFFER).unwrap(), 0x0807_0605_0403_0201);
    }

    #[test]
    fn read_signed() {
        assert_eq!(read_le::<i8>(&[0xFF]).unwrap(), -1);
        assert_eq!(read_le::<i16>(&[0xFE, 0xFF]).unwrap(), -2);
        assert_eq!(read_le::<i32>(&[0xFD, 0xFF, 0xFF, 0xFF]).unwrap(), -3);
    }

    #[test]
    fn read_float() {
        let bytes = 1.5_f64.to_le_bytes();
        assert_eq!(read_le::<f64>(&bytes).unwrap(), 1.5);
        let bytes = (-0.25_f32).to_le_bytes();
        assert_eq!(read_le::<f32>(&bytes).unwrap(), -0.25);
    }

    #[test]
    fn read_advances_offset() {
        let mut offset = 2;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0403);
        assert_eq!(offset, 4);
        assert_eq!(read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap(), 0x0807_0605);
        assert_eq!(offset, 8);
    }

    #[test]
    fn read_dyn() {
        let mut offset = 0;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(offset, 2);
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(), 0x0605_0403);
        assert_eq!(offset, 6);
    }

    #[test]
    fn out_of_bounds() {
        let mut offset = 6;
        assert!(matches!(
            read_le_at::<u32>(&TEST_BUFFER, &mut offset),
            Err(OutOfBounds)
        ));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_le_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
        assert!(read_le::<u64>(&TEST_BUFFER[1..]).is_err());
    }
}
