//! # Adapters Module
//!
//! ## Modules
//!
//! - `memory`: simulated tag and reader (`InMemoryTag`)
//! - `sinks`: event sinks (`TracingSink`, `RecordingSink`, `NullSink`)

pub mod memory;
pub mod sinks;

pub use memory::{DeviceStats, FaultPlan, InMemoryTag};
pub use sinks::{NullSink, RecordingSink, TracingSink};
