//! # Shared Types Crate
//!
//! This crate contains all domain entities of the NeoNet PoI simulation.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Immutable chain data**: `Block` and `Transaction` are never mutated
//!   after commit, with one exception: a transaction's verification flag is
//!   set exactly once by the structural signature check.
//! - **No real cryptography**: signature fields are hash-derived pseudo
//!   signatures; verification is a length/presence predicate.

pub mod entities;

pub use entities::*;
