// Validation Module - reusable field validation
mod validators;

pub use validators::{EmailValidator, FieldValidator, StringValidator};
