//! Object-created notifications that trigger a run.
//!
//! Only the fields needed to locate the object are modelled; everything else
//! in the notification is ignored during deserialization.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A bucket notification carrying one or more records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// URL-encoded object key, as delivered.
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A decoded reference to one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

impl S3Event {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::decode(format!("invalid event: {}", e)))
    }

    /// Decodes the first record. Later records are left to the caller.
    pub fn first_object(&self) -> Result<ObjectRef> {
        self.records
            .first()
            .ok_or_else(|| Error::decode("event contains no records"))?
            .object_ref()
    }
}

impl S3EventRecord {
    pub fn object_ref(&self) -> Result<ObjectRef> {
        Ok(ObjectRef {
            bucket: self.s3.bucket.name.clone(),
            key: decode_object_key(&self.s3.object.key)?,
        })
    }
}

/// Decodes a query-escaped object key: `+` is a space and `%XX` a byte.
///
/// A `%` not followed by two hex digits, or bytes that are not UTF-8, fail.
pub fn decode_object_key(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::decode(format!(
                    "invalid escape at offset {} in object key {:?}",
                    i, raw
                )));
            }
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| Error::decode(format!("object key {:?} is not UTF-8: {}", raw, e)))
}
