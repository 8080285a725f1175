//! # Tag Storage Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── file_flows.rs        # Files over extents on every tag class
//! │   ├── dictionary_flows.rs  # Dictionary laws, cache invalidation, capacity
//! │   └── fault_tolerance.rs   # Injected device faults and recovery
//! │
//! └── benches/
//!     └── storage_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tag-storage-tests
//!
//! # By category
//! cargo test -p tag-storage-tests integration::dictionary_flows::
//!
//! # Benchmarks
//! cargo bench -p tag-storage-tests
//! ```

pub mod integration;
