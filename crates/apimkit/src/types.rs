//! Desired-state model and typed search results.
//!
//! The free-form parts of the management API (the API entity itself, plan
//! and page bodies) stay [`serde_json::Value`]: the server accepts arbitrary
//! entity documents and the client forwards them untouched. Everything the
//! reconciliation logic branches on is typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target lifecycle state declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    /// Ensure the API exists; do not change its running state.
    #[default]
    Present,
    /// Remove the API (plans first, then stop, then delete).
    Absent,
    /// Ensure the API exists, is deployed and started.
    Started,
    /// Ensure the API is stopped.
    Stopped,
}

/// Visibility of an API on the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Visible to everyone.
    Public,
    /// Visible to members only.
    #[default]
    Private,
}

impl Visibility {
    /// Wire representation of the visibility.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

/// Request to hand the primary-owner role to another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransfer {
    /// Free-text search filter for the new primary owner.
    ///
    /// Must match exactly one remote user; zero or several matches abort
    /// the invocation.
    pub user: String,
    /// Role granted to the outgoing primary owner.
    pub owner_role: String,
}

/// Desired state of one API, as declared by the caller.
///
/// Presence of [`api_id`](Self::api_id) selects the update/remove paths;
/// its absence (with a `present`/`started` target) selects creation, in
/// which case [`config`](Self::config) is required and must carry a
/// `contextPath` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesiredApi {
    /// Id of the remote API, when already known.
    #[serde(default)]
    pub api_id: Option<String>,
    /// Full API entity body (creation payload or update payload).
    #[serde(default)]
    pub config: Option<Value>,
    /// Portal visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional primary-owner transfer, applied after content changes.
    #[serde(default)]
    pub transfer_ownership: Option<OwnershipTransfer>,
    /// Target lifecycle state.
    #[serde(default)]
    pub state: TargetState,
    /// Plans to create or update, in declared order.
    #[serde(default)]
    pub plans: Vec<Value>,
    /// Documentation pages to create or update, in declared order.
    ///
    /// Each page's `order` is assigned from its 1-based position in this
    /// list before dispatch, overwriting any declared value.
    #[serde(default)]
    pub pages: Vec<Value>,
}

/// Non-empty string `id` of a free-form entity, when it has one.
///
/// Presence of an id selects update over create for plans and pages.
pub(crate) fn entity_id(entity: &Value) -> Option<&str> {
    entity
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// One user returned by the user search endpoint.
///
/// The search result carries more fields (names, avatar, ...); only what
/// the ownership transfer needs is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    /// Opaque reference used in the transfer payload.
    pub reference: String,
    /// User id, when the search record supplies one.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name, for diagnostics.
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

/// One group returned by the configuration groups endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupRecord {
    /// Group id, substituted for names in page payloads.
    pub id: String,
    /// Group name, matched against name filters.
    pub name: String,
}
