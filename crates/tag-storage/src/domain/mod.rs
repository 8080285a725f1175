//! # Domain Layer
//!
//! Pure domain logic for tag storage: geometry, on-tag formats, value types
//! and errors. Nothing here talks to a device.
//!
//! ## Modules
//!
//! - `geometry` - Block/sector layout and capacity classes
//! - `header` - File header block codec
//! - `dictionary` - Dictionary snapshot and its text format
//! - `value_objects` - UID, sector key, file label
//! - `events` - Diagnostic events
//! - `errors` - Domain error types

pub mod dictionary;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod header;
pub mod value_objects;

pub use dictionary::*;
pub use errors::*;
pub use events::*;
pub use geometry::*;
pub use header::*;
pub use value_objects::*;
