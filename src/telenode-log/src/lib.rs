//! Provides logging facilities.
//!
//! The macros of this crate forward to [`defmt`](https://docs.rs/defmt) when the `defmt` feature
//! is enabled, to the [`log`](https://docs.rs/log) facade when the `log` feature is enabled, and
//! compile to nothing otherwise.
//! The format string syntax accepted by all backends is the common subset of both (`{}`,
//! `{:?}`, `{=u8}` is `defmt`-only and must not be used).

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("feature \"defmt\" and feature \"log\" cannot be enabled at the same time");

#[cfg(feature = "defmt")]
pub mod defmt {
    //! Selected [`defmt`] items.

    // Hidden in the docs, still picked up by a wildcard import of this crate's items.
    #[doc(hidden)]
    pub mod hidden {
        #[doc(hidden)]
        pub use defmt;
    }

    pub use defmt::{Debug2Format, Display2Format, Format};

    // Required "internally" by `defmt`.
    pub use defmt::{export, Formatter, Str};
}

#[cfg(feature = "log")]
#[doc(hidden)]
pub mod log {
    pub use log::{debug, error, info, trace, warn};
}

// Generates one level macro per backend.
//
// The `$d` parameter carries a literal `$` into the generated macro, as nested macro
// definitions cannot spell it directly.
macro_rules! define_level {
    ($d:tt $name:ident, $doc:literal) => {
        #[doc = $doc]
        #[cfg(feature = "defmt")]
        #[macro_export]
        macro_rules! $name {
            ($d($d arg:tt)*) => {{
                use $d crate::defmt::hidden::defmt;
                defmt::$name!($d($d arg)*);
            }};
        }

        #[doc = $doc]
        #[cfg(feature = "log")]
        #[macro_export]
        macro_rules! $name {
            ($d($d arg:tt)*) => {{
                $d crate::log::$name!(target: "telenode", $d($d arg)*);
            }};
        }

        #[doc = $doc]
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        #[macro_export]
        macro_rules! $name {
            ($d($d arg:tt)*) => {{
                // Type-checks the arguments without evaluating nor moving them.
                if false {
                    let _ = ::core::format_args!($d($d arg)*);
                }
            }};
        }
    };
}

define_level!($ trace, "Logs a message at the trace level.");
define_level!($ debug, "Logs a message at the debug level.");
define_level!($ info, "Logs a message at the info level.");
define_level!($ warn, "Logs a message at the warn level.");
define_level!($ error, "Logs a message at the error level.");
