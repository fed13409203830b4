//! Modular common utilities shared across InviteKit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: field validators (email, string)
//! - `observability`: tracing subscriber initialisation

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod validation;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

#[cfg(feature = "observability")]
pub use observability::{init_tracing, LogFormat};
#[cfg(feature = "foundation")]
pub use validation::{EmailValidator, FieldValidator, StringValidator};
