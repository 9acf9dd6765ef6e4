//! Shelf application library
//!
//! Book catalogue modules and the bootstrap that wires them into the HTTP server.

pub mod bootstrap;
pub mod modules;

pub use modules::*;
