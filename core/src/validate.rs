//! Local business rules checked before any request is made.
//!
//! Rules run in a fixed order and the first one that fails is reported;
//! violations are never aggregated.

use validator::ValidateEmail;

use crate::error::AssertError;
use crate::params::{EmailParams, SmsParams};

/// Email address syntax check shared by the validator and `Recipient::new`.
pub fn is_valid_email(candidate: &str) -> bool {
    candidate.validate_email()
}

pub fn validate_email_params(params: &EmailParams) -> Result<(), AssertError> {
    ensure(
        params.html().is_some() || params.text().is_some(),
        "One of html or text must be supplied",
    )?;
    ensure(
        params.recipients().len() == 1,
        "Exactly one primary recipient is required",
    )?;
    email(params.from())?;
    min_length(params.from_name(), 1)?;
    min_length(params.subject(), 1)?;
    Ok(())
}

pub fn validate_sms_params(params: &SmsParams) -> Result<(), AssertError> {
    let from = params.from().unwrap_or_default();
    ensure(!from.is_empty(), "From phone number is required")?;
    ensure(from.starts_with('+'), "From phone number must start with +")?;
    ensure(!params.to().is_empty(), "At least one recipient is required")?;
    for recipient in params.to() {
        ensure(recipient.starts_with('+'), "Recipient phone number must start with +")?;
    }
    ensure(
        params.text().is_some_and(|text| !text.is_empty()),
        "Text cannot be empty",
    )?;
    Ok(())
}

fn ensure(condition: bool, message: &str) -> Result<(), AssertError> {
    if condition {
        Ok(())
    } else {
        Err(AssertError::new(message))
    }
}

/// A missing value fails the type check before any content rule runs.
fn string(value: Option<&str>) -> Result<&str, AssertError> {
    value.ok_or_else(|| AssertError::new("Value \"<NULL>\" expected to be string, type NULL given."))
}

fn email(value: Option<&str>) -> Result<(), AssertError> {
    let address = string(value)?;
    if is_valid_email(address) {
        return Ok(());
    }
    Err(AssertError::new(format!(
        "Value \"{address}\" was expected to be a valid e-mail address."
    )))
}

fn min_length(value: Option<&str>, min: usize) -> Result<(), AssertError> {
    let value = string(value)?;
    let length = value.chars().count();
    if length >= min {
        return Ok(());
    }
    Err(AssertError::new(format!(
        "Value \"{value}\" is too short, it should have at least {min} characters, but only has {length} characters."
    )))
}
