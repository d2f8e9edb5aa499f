use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A field as it arrived in a request body:
/// `None` => not provided; `Some(None)` => explicit null; `Some(Some(v))` => value.
pub type Submitted<T> = Option<Option<T>>;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const USERNAME_TAKEN: &str = "Username already taken.";
pub const EMAIL_TAKEN: &str = "Email already exists.";

pub const USERNAME_MAX: usize = 150;
pub const NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const TITLE_MAX: usize = 255;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("valid regex")
});

/// Per-field validation messages, rendered as `{"field": ["msg", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub const NON_FIELD: &'static str = "non_field_errors";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self::single(Self::NON_FIELD, message)
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn finish(self) -> Result<(), UseCaseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(UseCaseError::Validation(self))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A text field as it arrived: strings as-is, numbers in their JSON spelling.
/// Booleans, arrays and objects are kept as `WrongType` and reported per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Text(String),
    WrongType,
}

impl From<String> for TextInput {
    fn from(v: String) -> Self {
        TextInput::Text(v)
    }
}

impl From<&str> for TextInput {
    fn from(v: &str) -> Self {
        TextInput::Text(v.to_string())
    }
}

impl<'de> Deserialize<'de> for TextInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => TextInput::Text(s),
            Value::Number(n) => TextInput::Text(n.to_string()),
            _ => TextInput::WrongType,
        })
    }
}

/// A primary key as submitted by a client: JSON number or numeric string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkInput {
    Int(i64),
    Text(String),
    /// Anything else, with the JSON type name used in the error message.
    Other(&'static str),
}

impl<'de> Deserialize<'de> for PkInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => match n.as_i64() {
                Some(v) => PkInput::Int(v),
                // 1.0 names the same row as 1
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                        PkInput::Int(f as i64)
                    }
                    _ => PkInput::Other("float"),
                },
            },
            Value::String(s) => PkInput::Text(s),
            Value::Bool(_) => PkInput::Other("bool"),
            Value::Array(_) => PkInput::Other("list"),
            Value::Object(_) => PkInput::Other("dict"),
            Value::Null => PkInput::Other("null"),
        })
    }
}

impl PkInput {
    pub fn as_pk(&self) -> Option<i64> {
        match self {
            PkInput::Int(v) => Some(*v),
            PkInput::Text(s) => s.trim().parse().ok(),
            PkInput::Other(_) => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            PkInput::Int(_) => "int",
            PkInput::Text(_) => "str",
            PkInput::Other(name) => name,
        }
    }
}

pub fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

pub fn does_not_exist_message(pk: i64) -> String {
    format!("Invalid pk \"{pk}\" - object does not exist.")
}

fn check_text(errors: &mut FieldErrors, field: &str, value: String, max: Option<usize>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }
    if let Some(max) = max {
        if trimmed.chars().count() > max {
            errors.add(field, max_length_message(max));
            return None;
        }
    }
    Some(trimmed.to_string())
}

/// Narrows a submitted value to text, recording null and wrong-type errors.
fn submitted_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Submitted<TextInput>,
    required: bool,
) -> Option<String> {
    match value {
        None => {
            if required {
                errors.add(field, REQUIRED);
            }
            None
        }
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(TextInput::WrongType)) => {
            errors.add(field, NOT_A_STRING);
            None
        }
        Some(Some(TextInput::Text(v))) => Some(v),
    }
}

/// A required, non-blank text field. Leading and trailing whitespace is dropped.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Submitted<TextInput>,
    max: Option<usize>,
) -> Option<String> {
    let v = submitted_text(errors, field, value, true)?;
    check_text(errors, field, v, max)
}

/// Same rules as [`required_text`] but absence is fine (partial updates).
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Submitted<TextInput>,
    max: Option<usize>,
) -> Option<String> {
    let v = submitted_text(errors, field, value, false)?;
    check_text(errors, field, v, max)
}

/// Passwords are kept verbatim; only presence is checked.
pub fn required_password(
    errors: &mut FieldErrors,
    field: &str,
    value: Submitted<TextInput>,
) -> Option<String> {
    let v = submitted_text(errors, field, value, true)?;
    if v.trim().is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }
    Some(v)
}

pub fn required_email(errors: &mut FieldErrors, field: &str, value: Submitted<TextInput>) -> Option<String> {
    let email = required_text(errors, field, value, Some(EMAIL_MAX))?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.add(field, INVALID_EMAIL);
        None
    }
}

pub fn optional_pk(errors: &mut FieldErrors, field: &str, value: Submitted<PkInput>) -> Option<i64> {
    match value {
        None => None,
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(raw)) => match raw.as_pk() {
            Some(pk) => Some(pk),
            None => {
                errors.add(
                    field,
                    format!("Incorrect type. Expected pk value, received {}.", raw.type_name()),
                );
                None
            }
        },
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
