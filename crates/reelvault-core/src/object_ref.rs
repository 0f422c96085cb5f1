//! Persisted object reference encoding.
//!
//! A stored object is identified by its (bucket, key) pair. The pair is
//! persisted as a single opaque string so the record store never learns
//! about storage layout. Encoding must round-trip losslessly: a reference
//! that does not decode into exactly two non-empty components is malformed
//! and the record pointing at it is unusable.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AppError;

/// Separator between bucket and key in the encoded form. Keys produced by
/// the key builder never contain it; `ObjectRef::new` rejects components
/// that do.
const SEPARATOR: char = ',';

/// The (bucket, key) pair identifying one stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    bucket: String,
    key: String,
}

impl ObjectRef {
    /// Build a reference from its components. Both must be non-empty and
    /// free of the separator character.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, AppError> {
        let bucket = bucket.into();
        let key = key.into();

        if bucket.is_empty() || key.is_empty() {
            return Err(AppError::MalformedObjectRef(
                "bucket and key must be non-empty".to_string(),
            ));
        }
        if bucket.contains(SEPARATOR) || key.contains(SEPARATOR) {
            return Err(AppError::MalformedObjectRef(format!(
                "bucket and key must not contain '{}'",
                SEPARATOR
            )));
        }

        Ok(ObjectRef { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The single-string persisted form.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, SEPARATOR, self.key)
    }

    /// Parse the persisted form back into its two components.
    pub fn decode(encoded: &str) -> Result<Self, AppError> {
        let mut parts = encoded.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(bucket), Some(key), None) if !bucket.is_empty() && !key.is_empty() => {
                Ok(ObjectRef {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
            _ => Err(AppError::MalformedObjectRef(format!(
                "could not split object reference: {}",
                encoded
            ))),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectRef::decode(s)
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.encode())
    }
}
