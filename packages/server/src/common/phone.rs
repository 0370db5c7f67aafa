//! Ghana phone number normalization.
//!
//! A subscriber can be written three ways and all of them have been stored
//! at some point:
//!
//! - `0542709440`   leading-zero local (canonical)
//! - `233542709440` international without `+`
//! - `542709440`    bare 9-digit body
//!
//! Anything else is passed through as its digits and gets no aliases.

use std::fmt;

const COUNTRY_CODE: &str = "233";
const BODY_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    digits: String,
    body: Option<String>,
}

impl PhoneNumber {
    /// Normalize user input. Never fails; see [`PhoneNumber::is_recognized`].
    pub fn parse(input: &str) -> Self {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        let body = match digits.len() {
            10 if digits.starts_with('0') => Some(digits[1..].to_string()),
            12 if digits.starts_with(COUNTRY_CODE) => Some(digits[3..].to_string()),
            BODY_LEN if !digits.starts_with('0') => Some(digits.clone()),
            _ => None,
        };

        Self { digits, body }
    }

    /// Input with every non-digit removed
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Whether the input matched one of the three known shapes
    pub fn is_recognized(&self) -> bool {
        self.body.is_some()
    }

    /// Lookup key: `0XXXXXXXXX`, or the bare digits when unrecognized.
    pub fn canonical(&self) -> String {
        match &self.body {
            Some(body) => format!("0{body}"),
            None => self.digits.clone(),
        }
    }

    pub fn international(&self) -> Option<String> {
        self.body.as_ref().map(|body| format!("{COUNTRY_CODE}{body}"))
    }

    pub fn local_body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Every alias under which this subscriber may have been stored,
    /// canonical form first.
    pub fn search_set(&self) -> Vec<String> {
        match &self.body {
            Some(body) => vec![
                self.canonical(),
                format!("{COUNTRY_CODE}{body}"),
                body.clone(),
            ],
            None => vec![self.digits.clone()],
        }
    }

    /// Whether `other` (in any format) refers to the same subscriber
    pub fn matches(&self, other: &str) -> bool {
        self.canonical() == PhoneNumber::parse(other).canonical()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
