//! Input rules applied before anything reaches a repository.

use lazy_static::lazy_static;
use regex::Regex;

use super::domain::{ListingDraft, ProfileUpdate, PropertyDetails, SignUpForm};

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex");
    static ref MOBILE_NUMBER: Regex = Regex::new(r"^[6-9]\d{9}$").expect("mobile regex");
    static ref SPECIAL_CHARACTER: Regex =
        Regex::new(r#"[!@#$%^&*()_+\-=\[\];:'",.<>?/|\\]"#).expect("special character regex");
}

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 125;
pub const MAX_HOUSE_ROOMS: u8 = 11;
pub const MAX_FLAT_BHK: u8 = 6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("username must be a single word")]
    InvalidUsername,
    #[error("password must be longer than 8 characters and mix upper-case, lower-case, digits and special characters")]
    WeakPassword,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a 10-digit mobile number starting with 6, 7, 8 or 9")]
    InvalidMobileNumber(String),
    #[error("you must be at least 18 to create an account")]
    Underage(u8),
    #[error("age {0} is out of range")]
    AgeOutOfRange(u8),
    #[error("pincode {0} must have six digits")]
    InvalidPincode(u32),
    #[error("listing title must not be empty")]
    EmptyTitle,
    #[error("rent amount must be a non-negative number")]
    InvalidRent,
    #[error("number of rooms must be between 1 and 11 (got {0})")]
    RoomsOutOfRange(u8),
    #[error("BHK must be between 1 and 6 (got {0})")]
    BhkOutOfRange(u8),
    #[error("unknown property type {0}")]
    UnknownPropertyType(i32),
}

pub fn is_single_word(input: &str) -> bool {
    !input.is_empty() && !input.chars().any(char::is_whitespace)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() > 8
        && !password.chars().any(char::is_whitespace)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && SPECIAL_CHARACTER.is_match(password)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_mobile_number(number: &str) -> bool {
    MOBILE_NUMBER.is_match(number)
}

pub fn validate_age(age: u8) -> Result<(), ValidationError> {
    match age {
        MIN_AGE..=MAX_AGE => Ok(()),
        1..=17 => Err(ValidationError::Underage(age)),
        _ => Err(ValidationError::AgeOutOfRange(age)),
    }
}

/// Pincodes typed at the console are six digits.
pub fn validate_pincode(pincode: u32) -> Result<(), ValidationError> {
    if (100_000..=999_999).contains(&pincode) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPincode(pincode))
    }
}

fn validate_contact(email: &str, phone_number: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    if !is_valid_mobile_number(phone_number) {
        return Err(ValidationError::InvalidMobileNumber(phone_number.to_string()));
    }
    Ok(())
}

pub fn validate_sign_up(form: &SignUpForm) -> Result<(), ValidationError> {
    if !is_single_word(&form.username) {
        return Err(ValidationError::InvalidUsername);
    }
    if !is_valid_password(&form.password) {
        return Err(ValidationError::WeakPassword);
    }
    validate_age(form.age)?;
    validate_contact(&form.email, &form.phone_number)
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
    validate_age(update.age)?;
    validate_contact(&update.email, &update.phone_number)
}

pub fn validate_listing(draft: &ListingDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !draft.rent_amount.is_finite() || draft.rent_amount < 0.0 {
        return Err(ValidationError::InvalidRent);
    }
    match &draft.details {
        PropertyDetails::House(house) if !(1..=MAX_HOUSE_ROOMS).contains(&house.rooms) => {
            Err(ValidationError::RoomsOutOfRange(house.rooms))
        }
        PropertyDetails::Flat(flat) if !(1..=MAX_FLAT_BHK).contains(&flat.bhk) => {
            Err(ValidationError::BhkOutOfRange(flat.bhk))
        }
        _ => Ok(()),
    }
}
