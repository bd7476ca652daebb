use common::errors::AppError;
use std::fmt;

const POSTAL_CODE_LEN: usize = 5;

/// A location that passed validation: a place name made of ASCII letters
/// and spaces, or a 5-digit postal code. Leading and trailing whitespace is
/// stripped; the result doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim_ascii();
        if is_place_name(trimmed) || is_postal_code(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(AppError::InvalidLocation)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_location(input: &str) -> bool {
    Location::parse(input).is_ok()
}

fn is_place_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace())
}

fn is_postal_code(s: &str) -> bool {
    s.len() == POSTAL_CODE_LEN && s.bytes().all(|b| b.is_ascii_digit())
}
