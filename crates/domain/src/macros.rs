//! Macro for implementing Display and FromStr for fieldless domain enums
//!
//! Status-like enums (event status, pipeline stage, error kind) share one
//! lowercase wire representation. The macro generates both directions so the
//! two never drift apart.
//!
//! # Example
//!
//! ```rust
//! use invitekit_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ExportMode {
//!     Remote,
//!     File,
//! }
//!
//! impl_domain_status_conversions!(ExportMode {
//!     Remote => "remote",
//!     File => "file",
//! });
//!
//! assert_eq!(ExportMode::File.to_string(), "file");
//! assert_eq!("REMOTE".parse::<ExportMode>(), Ok(ExportMode::Remote));
//! ```

/// Implements Display and FromStr traits for fieldless enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
