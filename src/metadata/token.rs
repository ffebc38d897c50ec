//! Metadata tokens.
//!
//! A token names one row of one metadata table: the top byte is the table id, the lower 24 bits
//! are the 1-based row index. Row `0` is the null reference.

use std::fmt;

/// A 32-bit metadata token, `table << 24 | row`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// Create a token from its raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Create a token from a table id and row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// The raw value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The table id (top byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The 1-based row index
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// `true` if the token points to no row
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts() {
        let token = Token::new(0x0600_0012);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 0x12);
        assert!(!token.is_null());
        assert_eq!(Token::from_parts(0x06, 0x12), token);
        assert!(Token::from_parts(0x02, 0).is_null());
    }

    #[test]
    fn formatting() {
        let token = Token::new(0x0200_0001);
        assert_eq!(format!("{token}"), "0x02000001");
        assert_eq!(
            format!("{token:?}"),
            "Token(0x02000001, table: 0x02, row: 1)"
        );
    }
}
