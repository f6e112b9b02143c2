//! Infrastructure layer
//!
//! Concrete implementations of the domain traits.

pub mod peer;
pub mod registry;
