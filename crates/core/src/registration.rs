//! Validation of visitor registration input.
//!
//! All six text fields are required and must be non-empty. The first
//! missing field (in form order) is named in the error message.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Required registration fields, in the order the form presents them.
pub const REQUIRED_FIELDS: &[&str] = &[
    "name",
    "phone",
    "company",
    "host_name",
    "host_company",
    "host_phone",
];

/// Raw registration body as submitted by a visitor.
///
/// Every field is optional at the serde level so that a missing key is
/// reported as a validation error rather than a deserialization failure.
/// Bare numbers and flags are accepted and stored as text.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterVisitor {
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub host_name: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub host_company: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    #[validate(required, length(min = 1))]
    pub host_phone: Option<String>,
}

/// A form value as it may arrive in JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl FormValue {
    /// Zero and `false` read as empty, so they fail the required check.
    fn into_text(self) -> String {
        match self {
            FormValue::Text(text) => text,
            FormValue::Integer(0) | FormValue::Flag(false) => String::new(),
            FormValue::Float(f) if f == 0.0 => String::new(),
            FormValue::Integer(n) => n.to_string(),
            FormValue::Float(f) => f.to_string(),
            FormValue::Flag(true) => "true".to_string(),
        }
    }
}

fn form_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FormValue>::deserialize(deserializer)?.map(FormValue::into_text))
}

/// Validated, write-once visitor and host details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorDetails {
    pub name: String,
    pub phone: String,
    pub company: String,
    pub host_name: String,
    pub host_company: String,
    pub host_phone: String,
}

impl RegisterVisitor {
    /// Validate the submission and convert it into [`VisitorDetails`].
    pub fn into_details(self) -> Result<VisitorDetails, CoreError> {
        if let Err(errors) = self.validate() {
            let field = REQUIRED_FIELDS
                .iter()
                .find(|field| errors.errors().contains_key(**field))
                .copied()
                .unwrap_or("registration");
            return Err(CoreError::Validation(format!("{field} is required")));
        }

        let missing = || CoreError::Internal("validated field was absent".to_string());
        Ok(VisitorDetails {
            name: self.name.ok_or_else(missing)?,
            phone: self.phone.ok_or_else(missing)?,
            company: self.company.ok_or_else(missing)?,
            host_name: self.host_name.ok_or_else(missing)?,
            host_company: self.host_company.ok_or_else(missing)?,
            host_phone: self.host_phone.ok_or_else(missing)?,
        })
    }
}
