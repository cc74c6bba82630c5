//! Tenant identifiers
//!
//! A UID is 8 to 14 ASCII letters or digits. The [`Uid`] newtype can only be
//! built through [`Uid::parse`], so a value of that type always has the right
//! shape by the time it reaches the ingest path.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::StoreError;

pub const MIN_UID_LEN: usize = 8;
pub const MAX_UID_LEN: usize = 14;

/// Shape check for caller-supplied UIDs
pub fn is_valid_uid(s: &str) -> bool {
    (MIN_UID_LEN..=MAX_UID_LEN).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// A UID that has passed [`is_valid_uid`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn parse(s: impl Into<String>) -> Result<Self, StoreError> {
        let s = s.into();
        if is_valid_uid(&s) {
            Ok(Uid(s))
        } else {
            Err(StoreError::InvalidUid(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Uid {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
