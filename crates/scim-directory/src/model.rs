//! Domain entity and SCIM wire types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Schema URN of the SCIM core user resource.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Schema URN of a SCIM PATCH request.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// Resource-manager view of a directory user.
///
/// Carries no identifier of its own; the directory-assigned id travels
/// separately as an operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserEntity {
    /// Unique user name, usually an e-mail address.
    pub user_name: String,

    /// Display name; the directory computes one when left empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,

    /// Whether the user may sign in.
    #[serde(default)]
    pub active: bool,

    /// Grants `allow-cluster-create`.
    #[serde(default)]
    pub allow_cluster_create: bool,

    /// Grants `sql-analytics-access`. Written, never read back.
    #[serde(default)]
    pub allow_sql_analytics_access: bool,

    /// Grants `allow-instance-pool-create`.
    #[serde(default)]
    pub allow_instance_pool_create: bool,
}

impl UserEntity {
    /// Creates an active user with no capability grants.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            active: true,
            ..Self::default()
        }
    }
}

/// Capability grant token attached to a remote user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Entitlement {
    /// `allow-cluster-create`
    AllowClusterCreate,
    /// `sql-analytics-access`
    SqlAnalyticsAccess,
    /// `allow-instance-pool-create`
    AllowInstancePoolCreate,
    /// Any token outside the known vocabulary, kept as received.
    Other(String),
}

impl Entitlement {
    /// Returns the wire token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AllowClusterCreate => "allow-cluster-create",
            Self::SqlAnalyticsAccess => "sql-analytics-access",
            Self::AllowInstancePoolCreate => "allow-instance-pool-create",
            Self::Other(token) => token,
        }
    }
}

impl From<String> for Entitlement {
    fn from(token: String) -> Self {
        match token.as_str() {
            "allow-cluster-create" => Self::AllowClusterCreate,
            "sql-analytics-access" => Self::SqlAnalyticsAccess,
            "allow-instance-pool-create" => Self::AllowInstancePoolCreate,
            _ => Self::Other(token),
        }
    }
}

impl From<Entitlement> for String {
    fn from(entitlement: Entitlement) -> Self {
        match entitlement {
            Entitlement::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Entitlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a user's `entitlements` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementItem {
    pub value: Entitlement,
}

impl From<Entitlement> for EntitlementItem {
    fn from(value: Entitlement) -> Self {
        Self { value }
    }
}

/// Group or role reference, kept exactly as the directory sent it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexValue(Map<String, Value>);

impl ComplexValue {
    /// Wraps a raw JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The referenced id (`value`), if present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.0.get("value").and_then(Value::as_str)
    }

    /// The human-readable name (`display`), if present.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.0.get("display").and_then(Value::as_str)
    }

    /// All fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// SCIM wire representation of a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScimUser {
    /// Directory-assigned id; empty on requests.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Schema URNs; requests carry [`USER_SCHEMA`].
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Unique user name.
    #[serde(rename = "userName", default)]
    pub user_name: String,

    /// Whether the user may sign in.
    #[serde(default)]
    pub active: bool,

    /// Display name; omitted when empty.
    #[serde(rename = "displayName", default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,

    /// Always serialized, so a full replace with no grants clears them.
    #[serde(default)]
    pub entitlements: Vec<EntitlementItem>,

    /// Group memberships, passed through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ComplexValue>,

    /// Role assignments, passed through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<ComplexValue>,
}

impl ScimUser {
    /// Returns true if the user holds `entitlement`.
    #[must_use]
    pub fn has_entitlement(&self, entitlement: &Entitlement) -> bool {
        self.entitlements.iter().any(|item| &item.value == entitlement)
    }
}

/// List envelope returned by the users collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserList {
    /// Total number of matches on the server.
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,

    #[serde(rename = "startIndex", default)]
    pub start_index: u64,

    #[serde(rename = "itemsPerPage", default)]
    pub items_per_page: u64,

    /// Users on this page, in server order.
    #[serde(rename = "Resources", default)]
    pub resources: Vec<ScimUser>,
}

/// SCIM PATCH operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// A single PATCH operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: Some(path.into()),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: Some(path.into()),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: Some(path.into()),
            value: None,
        }
    }
}

/// Partial-update payload.
///
/// Its shape belongs to the remote API; the client forwards it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchRequest(Value);

impl PatchRequest {
    /// Builds a standard SCIM PatchOp document.
    #[must_use]
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(json!({
            "schemas": [PATCH_OP_SCHEMA],
            "Operations": operations,
        }))
    }

    /// Wraps an arbitrary, caller-built payload.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Vec<PatchOperation>> for PatchRequest {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self::new(operations)
    }
}
