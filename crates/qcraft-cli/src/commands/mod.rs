//! CLI command implementations.

pub mod common;
pub mod convert;
pub mod draw;
pub mod layout;
pub mod operators;
pub mod version;
