//! Errors, configuration and the small math vocabulary shared by every stage.

pub mod config;
pub mod error;
pub mod math;
