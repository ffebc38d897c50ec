//! Metadata streams.
//!
//! The streams named in the stream directory of the metadata root:
//!
//! - **`#Strings`** ([`Strings`]) - UTF-8 identifiers: type, namespace and member names.
//! - **`#Blob`** ([`Blob`]) - signatures, constant values and custom attribute arguments.
//! - **`#GUID`** ([`Guid`]) - the module version id.
//! - **`#~`** / **`#-`** ([`TablesHeader`]) - the metadata tables.
//!
//! `#US` holds string literals of method bodies and is never read.

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
