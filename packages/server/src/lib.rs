//! TCP broadcast relay library.
//!
//! Every chunk a client sends is relayed verbatim to all other connected
//! clients, and the remaining clients are told when someone joins or leaves.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
