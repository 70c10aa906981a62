//! Well Test Configuration Module
//!
//! Per-test well and fluid properties loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. Explicit path (`--config`)
//! 2. `WELLTEST_CONFIG` environment variable (path to TOML file)
//! 3. `well_test.toml` in the current working directory
//!
//! There are no built-in defaults for physical quantities.
//!
//! ## Usage
//!
//! ```ignore
//! let config = WellTestConfig::load(args.config.as_deref())?;
//! let properties = config.properties();
//! ```

mod well_config;
pub mod validation;

pub use well_config::*;
