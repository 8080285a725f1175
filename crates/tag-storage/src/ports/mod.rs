//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (APIs exposed to host programs)
//! - `outbound.rs` - Driven ports (tag reader driver, event sink)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
