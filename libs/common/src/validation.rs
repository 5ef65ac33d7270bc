//! Input validation utilities
//!
//! Forms are checked locally before anything is sent to the backend.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate the sign-in form
pub fn validate_sign_in(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::new("username", "Введите логин"));
    }

    if password.is_empty() {
        return Err(ValidationError::new("password", "Введите пароль"));
    }

    Ok(())
}

/// Validate the sign-up form
pub fn validate_sign_up(username: &str, password: &str) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_password(password)
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();

    if length < 4 {
        return Err(ValidationError::new("username", "Минимум 4 символа"));
    }

    if length > 20 {
        return Err(ValidationError::new("username", "Максимум 20 символов"));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(ValidationError::new(
            "username",
            "Можно только латиницу, цифры и подчёркивание",
        ));
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();

    if length < 8 {
        return Err(ValidationError::new("password", "Минимум 8 символов"));
    }

    if length > 16 {
        return Err(ValidationError::new("password", "Максимум 16 символов"));
    }

    Ok(())
}

/// Validate a review title or movie title
pub fn validate_title(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let length = value.chars().count();

    if length < 5 {
        return Err(ValidationError::new(field, "Минимум 5 символов"));
    }

    if length > 100 {
        return Err(ValidationError::new(field, "Максимум 100 символов"));
    }

    static TITLE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TITLE_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}\p{P}\p{Z}]+$").expect("Failed to compile title regex")
    });

    if !regex.is_match(value) {
        return Err(ValidationError::new(
            field,
            "Только буквы, цифры, пробелы и знаки препинания",
        ));
    }

    Ok(())
}

/// Validate review body
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    let length = content.chars().count();

    if length < 100 {
        return Err(ValidationError::new("content", "Минимум 100 символов"));
    }

    if length > 5000 {
        return Err(ValidationError::new("content", "Максимум 5000 символов"));
    }

    Ok(())
}

/// Validate a complete review form
pub fn validate_review(title: &str, movie_title: &str, content: &str) -> Result<(), ValidationError> {
    validate_title("title", title)?;
    validate_title("movie_title", movie_title)?;
    validate_content(content)
}
