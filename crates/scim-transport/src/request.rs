//! Transport-level request description.

use reqwest::Method;
use scim_core::{DirectoryError, DirectoryResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A single SCIM call as seen by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ScimRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured host, e.g. `/preview/scim/v2/Users`.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ScimRequest {
    /// Creates a request without query parameters or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Builds a request from an optional serializable value.
    ///
    /// For `GET` and `DELETE` the value must serialize to a flat JSON object;
    /// its entries become query parameters (nulls are skipped). For every
    /// other method the value becomes the JSON body.
    pub fn encode<T>(method: Method, path: impl Into<String>, request: Option<&T>) -> DirectoryResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let mut encoded = Self::new(method, path);
        let Some(request) = request else {
            return Ok(encoded);
        };

        let value = serde_json::to_value(request)?;
        if encoded.method == Method::GET || encoded.method == Method::DELETE {
            encoded.query = query_pairs(value)?;
        } else {
            encoded.body = Some(value);
        }
        Ok(encoded)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Decodes a response body into `T`. A missing body decodes as JSON `null`.
pub fn decode_body<T: DeserializeOwned>(body: Option<Value>) -> DirectoryResult<T> {
    Ok(serde_json::from_value(body.unwrap_or(Value::Null))?)
}

fn query_pairs(value: Value) -> DirectoryResult<Vec<(String, String)>> {
    let object = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(object) => object,
        other => {
            return Err(DirectoryError::internal(format!(
                "query parameters must serialize to an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (key, value) in object {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(DirectoryError::internal(format!(
                    "query parameter '{}' must be a scalar",
                    key
                )))
            }
        };
        pairs.push((key, rendered));
    }
    Ok(pairs)
}
