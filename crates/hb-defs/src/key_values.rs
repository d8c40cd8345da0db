//! Parser for line-oriented `key: value` resources.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::{DefsError, DefsResult};

/// The parsed contents of one definitions resource.
///
/// Parsing validates the line structure only; values stay as text until a
/// typed [`get`][Self::get] converts them with `FromStr`.
#[derive(Debug, Clone)]
pub struct KeyValues {
    option:  String,
    entries: HashMap<String, String>,
}

impl KeyValues {
    /// Parse `text` as the resource of `option`.
    ///
    /// Blank lines are skipped.  Keys and values are trimmed.
    pub fn parse(option: &str, text: &str) -> DefsResult<Self> {
        let mut entries = HashMap::new();
        let mut rest = text;
        let mut line_no = 0;

        while !rest.is_empty() {
            line_no += 1;
            let Some(end) = rest.find('\n') else {
                return Err(DefsError::MissingNewline { option: option.to_owned(), line: line_no });
            };
            let line = rest[..end].trim_end_matches('\r');
            rest = &rest[end + 1..];

            if line.trim().is_empty() {
                continue;
            }

            let malformed = || DefsError::MalformedLine {
                option: option.to_owned(),
                line:   line_no,
                text:   line.to_owned(),
            };
            let (key, value) = line.split_once(':').ok_or_else(malformed)?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(malformed());
            }

            if entries.insert(key.to_owned(), value.to_owned()).is_some() {
                return Err(DefsError::DuplicateKey {
                    option: option.to_owned(),
                    line:   line_no,
                    key:    key.to_owned(),
                });
            }
        }

        Ok(Self { option: option.to_owned(), entries })
    }

    /// Name of the option this resource belongs to.
    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw text of `key`.
    pub fn raw(&self, key: &str) -> DefsResult<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DefsError::MissingKey {
                option: self.option.clone(),
                key:    key.to_owned(),
            })
    }

    /// Parse `key` as `T`.
    pub fn get<T>(&self, key: &str) -> DefsResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.raw(key)?;
        value.parse::<T>().map_err(|e| DefsError::InvalidValue {
            option: self.option.clone(),
            key:    key.to_owned(),
            value:  value.to_owned(),
            reason: e.to_string(),
        })
    }
}
