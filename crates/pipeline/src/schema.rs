//! The schema seam: turns an untyped JSON value into a typed one, or reports
//! a mismatch.
//!
//! [`Shape`] covers every `serde`-deserialisable type. Unknown object keys are
//! ignored rather than rejected, so the remote side may add fields without
//! breaking decoding; types that want the opposite can opt in with
//! `#[serde(deny_unknown_fields)]`.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A decoded value did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value does not match schema '{schema}': {detail}")]
pub struct SchemaMismatch {
    schema: String,
    detail: String,
}

impl SchemaMismatch {
    pub fn new(schema: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            detail: detail.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The validator's diagnostic, e.g. `missing field `data``.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Validates decoded JSON against an expected structure.
pub trait Schema {
    /// The typed value produced on success.
    type Output;

    /// Short name used in logs.
    fn name(&self) -> &str;

    fn decode(&self, value: Value) -> Result<Self::Output, SchemaMismatch>;
}

/// A [`Schema`] backed by `T`'s `Deserialize` impl.
pub struct Shape<T> {
    name: &'static str,
    _output: PhantomData<fn() -> T>,
}

impl<T> Shape<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _output: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shape").field(&self.name).finish()
    }
}

impl<T: DeserializeOwned> Schema for Shape<T> {
    type Output = T;

    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, value: Value) -> Result<T, SchemaMismatch> {
        serde_json::from_value(value).map_err(|err| SchemaMismatch::new(self.name, err.to_string()))
    }
}
