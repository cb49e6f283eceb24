//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{NewUser, ProductInput};

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().len() < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a registration payload, collecting every violated field
pub fn validate_registration(new_user: &NewUser) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_name(&new_user.name) {
        errors.push(e);
    }
    if let Err(e) = validate_email(&new_user.email) {
        errors.push(e);
    }
    if let Err(e) = validate_password(&new_user.password) {
        errors.push(e);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a product payload, collecting every violated field
pub fn validate_product(input: &ProductInput) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push("Product name is required".to_string());
    }
    if input.description.trim().is_empty() {
        errors.push("Product description is required".to_string());
    }
    if input.price.is_nan() || input.price < 0.0 {
        errors.push("Price must be zero or greater".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
