// Field Validators - Reusable validation components
use once_cell::sync::Lazy;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// String validator; values are trimmed before checking
#[derive(Debug, Clone)]
pub struct StringValidator {
    max_length: Option<usize>,
    not_empty: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self { max_length: None, not_empty: false }
    }

    /// Require non-empty string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set maximum length (in characters)
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = value.trim();

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }

        if let Some(max) = self.max_length {
            if val.chars().count() > max {
                return Err(format!("Length must not exceed {} characters", max));
            }
        }

        Ok(())
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<&str> for StringValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value)
    }
}

/// Static email regex pattern compiled once at first use
static EMAIL_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("EMAIL_REGEX pattern is valid and well-formed")
});

/// Maximum length of the local part (RFC 5321 §4.5.3.1.1)
const MAX_LOCAL_PART: usize = 64;
/// Maximum length of a forward path (RFC 5321 §4.5.3.1.3)
const MAX_ADDRESS: usize = 254;

/// Syntactic email validator.
///
/// Accepts the common `local@domain.tld` shape and additionally rejects
/// leading, trailing or doubled dots and over-long addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator;

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailValidator {
    /// Create a new email validator
    pub fn new() -> Self {
        Self
    }

    /// Convenience predicate
    pub fn is_valid(&self, value: &str) -> bool {
        FieldValidator::<str>::validate(self, value).is_ok()
    }
}

impl FieldValidator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.len() > MAX_ADDRESS {
            return Err(format!("Email must not exceed {} characters", MAX_ADDRESS));
        }

        if !EMAIL_REGEX.is_match(value) {
            return Err("Invalid email format".to_string());
        }

        let (local, domain) = value.split_once('@').ok_or("Invalid email format")?;

        if local.len() > MAX_LOCAL_PART {
            return Err(format!("Email local part must not exceed {} characters", MAX_LOCAL_PART));
        }

        let dotted_badly =
            |part: &str| part.starts_with('.') || part.ends_with('.') || part.contains("..");
        if dotted_badly(local) || dotted_badly(domain) {
            return Err("Email contains misplaced dots".to_string());
        }

        if domain.split('.').any(|label| label.starts_with('-') || label.ends_with('-')) {
            return Err("Email domain label cannot start or end with '-'".to_string());
        }

        Ok(())
    }
}

impl FieldValidator<String> for EmailValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<&str> for EmailValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value)
    }
}
