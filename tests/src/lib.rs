//! # NeoNet PoI Simulation Test Suite
//!
//! Unified test crate containing cross-component integration flows that
//! exercise the engine through its public API, the way a node binary or
//! gateway would.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-component flows
//!     ├── ledger_flows.rs
//!     └── scheduler.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p poi-tests
//!
//! # By category
//! cargo test -p poi-tests integration::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
