//! cibctl store - CIB XML persistence
//!
//! Provides:
//! - XML reading and writing of the whole CIB document
//! - Conversion between the XML tree and the in-memory `Cib`
//! - `CibStore` implementations backed by a file or by memory
//! - Atomic whole-document writes
//! - Store configuration (`cibctl.toml`, environment, flags)

pub mod atomic;
pub mod config;
pub mod convert;
pub mod errors;
pub mod store;
pub mod xml;

// Re-export key types
pub use config::StoreConfig;
pub use errors::Result;
pub use store::{CibStore, FileCibStore, MemoryCibStore};
