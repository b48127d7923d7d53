// handlers/validate.rs - Field checks shared by request handlers
//
// Collects every failing field before answering, so clients get the whole
// list in one 400 response.

use chrono::{DateTime, NaiveDate};

use crate::error::{ApiError, FieldError};

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed value when present and non-blank
    pub fn required(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<String> {
        match non_blank(value) {
            Some(v) => Some(v),
            None => {
                self.fail(param, msg);
                None
            }
        }
    }

    pub fn email(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<String> {
        match non_blank(value) {
            Some(v) if is_valid_email(&v) => Some(v),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Value of at least `min` characters, untrimmed (passwords keep their spaces)
    pub fn min_length(
        &mut self,
        param: &str,
        value: Option<&str>,
        min: usize,
        msg: &str,
    ) -> Option<String> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v.to_string()),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    pub fn required_date(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<NaiveDate> {
        let raw = self.required(param, value, msg)?;
        self.parse_date(param, &raw)
    }

    pub fn optional_date(&mut self, param: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = non_blank(value)?;
        self.parse_date(param, &raw)
    }

    fn parse_date(&mut self, param: &str, raw: &str) -> Option<NaiveDate> {
        match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                self.fail(param, &format!("{} must be a date (YYYY-MM-DD)", param));
                None
            }
        }
    }

    pub fn fail(&mut self, param: &str, msg: &str) {
        self.errors.push(FieldError::new(param, msg));
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}

pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Basic email format check
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Comma-separated list, trimmed, blanks dropped
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
