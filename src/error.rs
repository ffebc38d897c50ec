use thiserror::Error;

/// Build a [`crate::Error::Malformed`] carrying the source location of the failed check.
macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Build a [`crate::Error::OutOfBounds`], logging where the read went past the data.
macro_rules! out_of_bounds_error {
    () => {{
        log::trace!("out of bounds read at {}:{}", file!(), line!());
        crate::Error::OutOfBounds
    }};
}

/// The generic Error type, which covers every failure this crate can surface.
///
/// The variants fall into three groups:
///
/// - **Protocol and lookup errors** raised by the load context and surfaced to the caller
///   ([`Error::NotAnAssembly`], [`Error::TypeNotFound`], [`Error::AssemblyNotFound`],
///   [`Error::AlreadyFinalized`], [`Error::NotYetLoading`]).
/// - **Data errors** that describe a single uninterpretable datum. The type graph absorbs these at
///   the smallest boundary (one member, one attribute argument list) so one bad row never stops the
///   enumeration of a whole module.
/// - **Substrate errors** produced while parsing the binary layout.
#[derive(Error, Debug)]
pub enum Error {
    /// The provided bytes are neither a PE image with a CLR header nor a bare metadata root.
    ///
    /// This is recoverable and is meant to be used for probing arbitrary files.
    #[error("Input is not a valid .NET metadata image - {0}")]
    NotAnAssembly(String),

    /// A type name could not be found in any module of the load context.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// A module name is not registered in the load context.
    #[error("Failed to find assembly - {0}")]
    AssemblyNotFound(String),

    /// `request_load` was called after `finalize`.
    #[error("The load context has already been finalized, no more modules can be loaded")]
    AlreadyFinalized,

    /// `finalize` was called on a context that is no longer loading.
    #[error("The load context is not loading, finalize can only run once")]
    NotYetLoading,

    /// A constant blob uses a type code that the integer view can not represent.
    #[error("Unsupported constant type - 0x{0:02x}")]
    UnsupportedConstant(u8),

    /// The underlying integer type of an enum could not be determined.
    ///
    /// Happens for placeholder enums that are not in the table of well-known names.
    #[error("Can not determine the underlying type of enum - {0}")]
    UnknownUnderlyingType(String),

    /// Decoding a member's signature failed, the member is treated as absent.
    #[error("Failed to construct member - {0}")]
    MemberConstructionFailed(String),

    /// A generic parameter index was decoded without a generic context to resolve it against.
    #[error("Generic parameter {index} can not be resolved without a generic context")]
    NoGenericContext {
        /// Index of the parameter inside its list
        index: u32,
        /// `true` for a method-level parameter (`!!n`), `false` for a type-level one (`!n`)
        method: bool,
    },

    /// The load context or module that owned a type node has been dropped.
    #[error("The owning load context has been dropped")]
    ContextDropped,

    /// The binary data is damaged or violates ECMA-335.
    ///
    /// Carries the source location that detected the problem to ease debugging of new samples.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Errors from the PE parser
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Recursion limit reached while decoding a nested signature.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

impl Error {
    /// Returns `true` for errors describing uninterpretable data rather than API misuse.
    ///
    /// These are the errors the type graph absorbs at member and attribute boundaries.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedConstant(_)
                | Error::UnknownUnderlyingType(_)
                | Error::MemberConstructionFailed(_)
                | Error::NoGenericContext { .. }
                | Error::Malformed { .. }
                | Error::OutOfBounds
                | Error::RecursionLimit(_)
                | Error::TypeNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_carries_location() {
        let error = malformed_error!("bad row {}", 5);
        match error {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "bad row 5");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn data_errors() {
        assert!(Error::UnsupportedConstant(0x0E).is_data_error());
        assert!(Error::UnknownUnderlyingType("X".into()).is_data_error());
        assert!(Error::NoGenericContext {
            index: 0,
            method: true
        }
        .is_data_error());
        assert!(!Error::AlreadyFinalized.is_data_error());
        assert!(!Error::NotAnAssembly("x".into()).is_data_error());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::UnsupportedConstant(0x0E).to_string(),
            "Unsupported constant type - 0x0e"
        );
        assert_eq!(
            Error::TypeNotFound("System.Foo".into()).to_string(),
            "Failed to find type - System.Foo"
        );
    }
}
