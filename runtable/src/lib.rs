#![deny(missing_docs)]

//! # Run-length property tables
//!
//! Compact tables mapping every code point in `[0, domain_max]` to the index
//! of a property value. The assignment is stored as runs of equal indices,
//! each packed into a single big-endian base-128 field, and queried by
//! walking the runs.
//!
//! ```
//! use runtable::codec::Encodable;
//! use runtable::CodecConfig;
//! use runtable::RunBuilder;
//! use runtable::RunLengthCodec;
//! use runtable::ValueTable;
//!
//! let mut values = ValueTable::new();
//! let runs = RunBuilder::from_values(["XX", "XX", "XX", "AL", "AL", "XX"], &mut values)?;
//! let config = CodecConfig::try_new(4, 32, 5)?;
//!
//! let bytes = runs.encode(&config)?;
//! assert_eq!(bytes, [0x20, 0x11, 0x00]);
//!
//! let codec = RunLengthCodec::parse_with(&bytes, config, values)?;
//! assert_eq!(codec.decode(3)?, "AL");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod lazy;
mod run;
mod runs;
mod table;

pub mod codec;
pub mod config;
pub mod embed;
pub mod error;
pub mod values;
pub mod varint;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use builder::RunBuilder;
pub use codec::Decodable;
pub use codec::DecodeError;
pub use codec::Encodable;
pub use codec::EncodeError;
pub use config::CodecConfig;
pub use config::ConfigError;
pub use embed::EncodedTable;
pub use error::Error;
pub use lazy::LazyRunTable;
pub use run::Run;
pub use run::RunError;
pub use runs::Runs;
pub use table::LookupError;
pub use table::RunLengthCodec;
pub use table::RunTable;
pub use values::IndexResolver;
pub use values::ValueResolver;
pub use values::ValueTable;
