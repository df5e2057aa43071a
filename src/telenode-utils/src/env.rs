//! `const`-evaluable parsing of environment variables.

pub use {const_panic, konst};

macro_rules! define_env_with_default_macro {
    ($macro_name:ident, $parse_fn_name:ident, $output_type_name:literal) => {
        /// Reads an environment variable at compile time and parses it, or returns the default.
        ///
        /// The third argument describes the parameter and is only used in the error message.
        ///
        /// # Panics
        ///
        /// Fails the build if the variable is set but cannot be parsed.
        #[macro_export]
        macro_rules! $macro_name {
            ($env_var:literal, $default:expr, $description:literal) => {
                const {
                    if let Some(str_value) = option_env!($env_var) {
                        if let Ok(value) = $crate::env::konst::primitive::$parse_fn_name(str_value)
                        {
                            value
                        } else {
                            $crate::env::const_panic::concat_panic!(
                                "Could not parse environment variable `",
                                $env_var,
                                "=",
                                str_value,
                                "` (",
                                $description,
                                ") as ",
                                $output_type_name,
                            );
                        }
                    } else {
                        $default
                    }
                }
            };
        }
    };
}

define_env_with_default_macro!(u8_from_env_or, parse_u8, "a u8");
define_env_with_default_macro!(u16_from_env_or, parse_u16, "a u16");
define_env_with_default_macro!(u32_from_env_or, parse_u32, "a u32");
define_env_with_default_macro!(u64_from_env_or, parse_u64, "a u64");
define_env_with_default_macro!(usize_from_env_or, parse_usize, "a usize");
define_env_with_default_macro!(i32_from_env_or, parse_i32, "an i32");
