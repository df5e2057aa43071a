//! Build-time configuration helpers.
//!
//! Node parameters that differ between deployments (bus base identifier, task periods, divider
//! resistances, ...) are read from `CONFIG_*` environment variables at compile time, falling back
//! to the given default when the variable is unset.
//!
//! ```
//! const SPACING_MS: u64 =
//!     telenode_utils::u64_from_env_or!("CONFIG_DOC_EXAMPLE_SPACING_MS", 10, "frame spacing");
//! assert_eq!(SPACING_MS, 10);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod env;
