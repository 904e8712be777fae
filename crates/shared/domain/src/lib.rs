//! # Domain Models
//!
//! Plain data shared across the workspace: configuration structures and a few
//! constants. Depends on `serde` only; no I/O and no behavior beyond defaults.

pub mod config;
pub mod constants;
