#![deny(missing_docs)]

//! # Table generator
//!
//! Reads Unicode Character Database style range files, assigns a value to
//! every code point, and writes the encoded table as a JSON artifact that
//! [`runtable::EncodedTable`] can load back.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod ucd;
