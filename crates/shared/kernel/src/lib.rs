//! Kernel utilities shared across the workspace.
//! Keep this crate lightweight; today it owns layered configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use rulekit_kernel::config::load_config;
//! use rulekit_kernel::domain::config::RulekitConfig;
//!
//! let cfg: RulekitConfig = load_config(Some("config/rulekit.toml")).unwrap_or_default();
//! println!("pretty output: {}", cfg.codec.pretty);
//! ```

pub mod config;

pub use rulekit_domain as domain;
