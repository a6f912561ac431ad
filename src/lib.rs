//! fwcopy library exports for integration testing.

pub mod config;
pub mod copy;
pub mod error;
pub mod lipo;
pub mod pipeline;
pub mod process;
pub mod sign;
