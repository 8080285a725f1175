//! # Application Layer
//!
//! The three storage layers, each owning the one below it:
//!
//! ```text
//! DictionaryMirror ──→ FileStore ──→ BlockStore ──→ TagDevice
//! ```

pub mod block_store;
pub mod dictionary;
pub mod file_store;

pub use block_store::BlockStore;
pub use dictionary::DictionaryMirror;
pub use file_store::FileStore;
