//! Field validation for user mutation requests.
//!
//! Request bodies arrive as untyped JSON objects. Each text field is pulled
//! out with [`get_string_field`], judged by [`validate_field`] under a
//! [`FieldMode`], and the per-field outcomes are folded into a
//! [`ValidationState`]. The fold visits every field so clients get one error
//! per failing field, in field order.

use serde_json::{Map, Value};

/// Untyped request body as parsed from JSON.
pub type FieldMap = Map<String, Value>;

/// Field names of a user, in the order they are checked.
pub const USER_FIELDS: [&str; 3] = ["first_name", "last_name", "email"];

/// What an input mapping holds under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Key missing or explicitly `null`.
    Absent,
    /// Present, but not a JSON string.
    NotText,
    /// Present string, surrounding whitespace removed.
    Text(String),
}

impl FieldValue {
    /// Collapse to the trimmed text, if any.
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Absent | Self::NotText => None,
        }
    }
}

/// Read `key` from `input` as trimmed text.
///
/// # Examples
/// ```
/// use contacts_backend::domain::validation::{get_string_field, FieldValue};
/// use serde_json::json;
///
/// let input = json!({ "email": "  ada@example.com ", "first_name": 7 });
/// let input = input.as_object().expect("object");
///
/// assert_eq!(
///     get_string_field(input, "email"),
///     FieldValue::Text("ada@example.com".to_owned())
/// );
/// assert_eq!(get_string_field(input, "first_name"), FieldValue::NotText);
/// assert_eq!(get_string_field(input, "last_name"), FieldValue::Absent);
/// ```
pub fn get_string_field(input: &FieldMap, key: &str) -> FieldValue {
    match input.get(key) {
        None | Some(Value::Null) => FieldValue::Absent,
        Some(Value::String(text)) => FieldValue::Text(text.trim().to_owned()),
        Some(_) => FieldValue::NotText,
    }
}

/// Whether a field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Absent, blank, or non-string values are errors (create).
    Required,
    /// Absence is fine; only non-string values are errors (update).
    Optional,
}

/// Result of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    field: &'static str,
    value: Option<String>,
    error: Option<String>,
}

impl FieldOutcome {
    fn accepted(field: &'static str, value: Option<String>) -> Self {
        Self {
            field,
            value,
            error: None,
        }
    }

    fn rejected(field: &'static str, error: String) -> Self {
        Self {
            field,
            value: None,
            error: Some(error),
        }
    }

    /// Name of the checked field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Trimmed value when the field was accepted and supplied.
    ///
    /// In optional mode a supplied blank string yields `Some("")`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// True when the field met its mode's requirements.
    pub fn is_satisfied(&self) -> bool {
        self.error.is_none()
    }

    /// Client-facing message for a rejected field.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn into_value(self) -> Option<String> {
        self.value
    }
}

/// Check a single field of `input` under `mode`.
pub fn validate_field(input: &FieldMap, field: &'static str, mode: FieldMode) -> FieldOutcome {
    match (get_string_field(input, field), mode) {
        (FieldValue::Text(text), FieldMode::Required) if text.is_empty() => {
            FieldOutcome::rejected(field, format!("{field} is required"))
        }
        (FieldValue::Text(text), _) => FieldOutcome::accepted(field, Some(text)),
        (FieldValue::Absent, FieldMode::Optional) => FieldOutcome::accepted(field, None),
        // A non-string value counts as missing in either mode.
        (FieldValue::Absent, FieldMode::Required) | (FieldValue::NotText, _) => {
            FieldOutcome::rejected(field, format!("{field} is required"))
        }
    }
}

/// Accumulated verdict over a sequence of field checks.
///
/// `ok` starts true and latches false on the first rejected field; it never
/// returns to true within one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationState {
    ok: bool,
    errors: Vec<String>,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }
}

impl ValidationState {
    /// Fold step: record `outcome` into the running state.
    #[must_use]
    pub fn absorb(mut self, outcome: &FieldOutcome) -> Self {
        if let Some(error) = outcome.error() {
            self.ok = false;
            self.errors.push(error.to_owned());
        }
        self
    }

    /// True when every absorbed field was satisfied.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Messages for every rejected field, in check order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Take ownership of the collected messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Values extracted for the three user fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    /// Trimmed `first_name`, when supplied.
    pub first_name: Option<String>,
    /// Trimmed `last_name`, when supplied.
    pub last_name: Option<String>,
    /// Trimmed `email`, when supplied.
    pub email: Option<String>,
}

/// Validate [`USER_FIELDS`] of `input` under `mode`.
///
/// # Examples
/// ```
/// use contacts_backend::domain::validation::{validate_user_fields, FieldMode};
/// use serde_json::json;
///
/// let input = json!({ "first_name": "Ada", "email": "   " });
/// let (state, _) = validate_user_fields(input.as_object().expect("object"), FieldMode::Required);
///
/// assert!(!state.is_ok());
/// assert_eq!(state.errors(), ["last_name is required", "email is required"]);
/// ```
pub fn validate_user_fields(input: &FieldMap, mode: FieldMode) -> (ValidationState, UserFields) {
    let [first_name, last_name, email] = USER_FIELDS.map(|field| validate_field(input, field, mode));
    let state = [&first_name, &last_name, &email]
        .into_iter()
        .fold(ValidationState::default(), ValidationState::absorb);
    let fields = UserFields {
        first_name: first_name.into_value(),
        last_name: last_name.into_value(),
        email: email.into_value(),
    };
    (state, fields)
}
