//! Audit record model and description rendering.
//!
//! One immutable record exists per dispatch that reached a handler. Records
//! reference the ability only by id: an ability may later be unregistered
//! while its historical records remain readable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storemind_core::{Actor, ActorId, ActorType, AuditRecordId};
use thiserror::Error;

use crate::abilities::{Ability, ArgMap};

/// Terminal (or transitional) state of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Dispatch accepted but not yet resolved.
    Pending,
    /// Handler returned a payload (including application-level error data).
    Success,
    /// Handler raised an unexpected fault.
    Failed,
    /// Dispatch was abandoned by the caller before execution.
    Cancelled,
}

impl AuditStatus {
    /// Stable string form, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Error)]
#[error("unknown audit status: {0}")]
pub struct ParseAuditStatusError(pub String);

impl FromStr for AuditStatus {
    type Err = ParseAuditStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseAuditStatusError(other.to_string())),
        }
    }
}

/// One persisted audit entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditRecord {
    /// Store-assigned, monotonically increasing identifier.
    pub id: AuditRecordId,
    /// Invoking principal (0 for unauthenticated/system activity).
    pub actor_id: ActorId,
    /// Principal classification.
    pub actor_type: ActorType,
    /// Id of the dispatched ability.
    pub ability_id: String,
    /// Namespace segment grouping the action (e.g. `orders`).
    pub action_category: String,
    /// Final namespace segment (e.g. `get`).
    pub action_type: String,
    /// Human-readable rendering of the dispatch.
    pub description: String,
    /// Supplied arguments, serialized as JSON text.
    pub parameters: Option<String>,
    /// Handler output or fault message, serialized as text.
    pub result: Option<String>,
    /// Outcome of the dispatch.
    pub status: AuditStatus,
    /// Denormalized primary-object reference for fast filtering.
    pub object_type: Option<String>,
    /// Denormalized primary-object id.
    pub object_id: Option<String>,
    /// Origin address of the request, if known.
    pub ip_address: Option<String>,
    /// Insert timestamp, set by the writer.
    pub created_at: DateTime<Utc>,
}

/// Fields of a record about to be written; the store assigns `id` and the
/// writer stamps `created_at`.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    /// Invoking principal.
    pub actor_id: ActorId,
    /// Principal classification.
    pub actor_type: ActorType,
    /// Id of the dispatched ability.
    pub ability_id: String,
    /// Namespace segment grouping the action.
    pub action_category: String,
    /// Final namespace segment.
    pub action_type: String,
    /// Human-readable rendering of the dispatch.
    pub description: String,
    /// Supplied arguments, serialized as JSON text.
    pub parameters: Option<String>,
    /// Handler output or fault message.
    pub result: Option<String>,
    /// Outcome of the dispatch.
    pub status: AuditStatus,
    /// Denormalized primary-object reference.
    pub object_type: Option<String>,
    /// Denormalized primary-object id.
    pub object_id: Option<String>,
    /// Origin address of the request.
    pub ip_address: Option<String>,
}

impl NewAuditRecord {
    /// Build the audit entry for one dispatch outcome.
    ///
    /// Derives the category/action split from the ability id, renders the
    /// description from the lookup table, and extracts the primary object
    /// reference from known id-like argument keys.
    #[must_use]
    pub fn from_dispatch(
        ability: &Ability,
        actor: &Actor,
        args: &ArgMap,
        status: AuditStatus,
        result: Option<String>,
    ) -> Self {
        let category = ability.action_category().to_string();
        let action = ability.action_type().to_string();
        let object = extract_object(&category, args);
        let description = render_description(&ability.id, &category, &action, object.as_ref());

        Self {
            actor_id: actor.id,
            actor_type: actor.actor_type,
            ability_id: ability.id.clone(),
            action_category: category,
            action_type: action,
            description,
            parameters: serde_json::to_string(args).ok(),
            result,
            status,
            object_type: object.as_ref().map(|o| o.kind.clone()),
            object_id: object.map(|o| o.id),
            ip_address: actor.ip_address.clone(),
        }
    }
}

/// Primary object reference pulled out of the argument map.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectRef {
    kind: String,
    id: String,
}

/// Argument keys that name the dispatch's primary object.
const OBJECT_ID_KEYS: &[(&str, &str)] = &[
    ("order_id", "order"),
    ("product_id", "product"),
    ("customer_id", "customer"),
    ("coupon_id", "coupon"),
    ("booking_id", "booking"),
    ("subscription_id", "subscription"),
    ("membership_id", "membership"),
];

/// Extract the primary object reference from known id-like keys.
///
/// A bare `id` key types the object after the ability's category.
fn extract_object(category: &str, args: &ArgMap) -> Option<ObjectRef> {
    for &(key, kind) in OBJECT_ID_KEYS {
        if let Some(id) = args.get(key).and_then(stringify_id) {
            return Some(ObjectRef {
                kind: kind.to_string(),
                id,
            });
        }
    }
    args.get("id").and_then(stringify_id).map(|id| ObjectRef {
        kind: category.trim_end_matches('s').to_string(),
        id,
    })
}

/// Render a number or string argument as an object id.
fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Lookup table rendering common commerce actions as readable phrases.
fn describe_action(category: &str, action: &str) -> Option<&'static str> {
    match (category, action) {
        ("orders", "get") => Some("viewed order"),
        ("orders", "list") => Some("listed orders"),
        ("orders", "update") => Some("updated order"),
        ("orders", "cancel") => Some("cancelled order"),
        ("orders", "refund") => Some("refunded order"),
        ("products", "get") => Some("viewed product"),
        ("products", "list") => Some("listed products"),
        ("products", "create") => Some("created product"),
        ("products", "update") => Some("updated product"),
        ("products", "delete") => Some("deleted product"),
        ("customers", "get") => Some("viewed customer"),
        ("customers", "list") => Some("listed customers"),
        ("customers", "create") => Some("created customer"),
        ("customers", "update") => Some("updated customer"),
        ("coupons", "get") => Some("viewed coupon"),
        ("coupons", "list") => Some("listed coupons"),
        ("coupons", "create") => Some("created coupon"),
        ("coupons", "delete") => Some("deleted coupon"),
        ("analytics", "report") => Some("ran analytics report"),
        _ => None,
    }
}

/// Render the record description, appending the primary object id when known.
fn render_description(
    ability_id: &str,
    category: &str,
    action: &str,
    object: Option<&ObjectRef>,
) -> String {
    let base = describe_action(category, action)
        .map_or_else(|| format!("executed ability: {ability_id}"), String::from);
    match object {
        Some(obj) => format!("{base} #{}", obj.id),
        None => base,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::abilities::FnHandler;

    use super::*;

    fn ability(id: &str) -> Ability {
        Ability::new(
            id,
            "Test",
            "test ability",
            "orders",
            Arc::new(FnHandler::new(|_args| Ok(json!(null)))),
        )
    }

    fn args(pairs: &[(&str, Value)]) -> ArgMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_from_dispatch_splits_namespace() {
        let record = NewAuditRecord::from_dispatch(
            &ability("storemind/orders/get"),
            &Actor::admin(ActorId::new(3)),
            &ArgMap::new(),
            AuditStatus::Success,
            None,
        );
        assert_eq!(record.action_category, "orders");
        assert_eq!(record.action_type, "get");
        assert_eq!(record.ability_id, "storemind/orders/get");
    }

    #[test]
    fn test_known_action_description_with_object() {
        let record = NewAuditRecord::from_dispatch(
            &ability("storemind/orders/get"),
            &Actor::admin(ActorId::new(3)),
            &args(&[("order_id", json!(1042))]),
            AuditStatus::Success,
            None,
        );
        assert_eq!(record.description, "viewed order #1042");
        assert_eq!(record.object_type.as_deref(), Some("order"));
        assert_eq!(record.object_id.as_deref(), Some("1042"));
    }

    #[test]
    fn test_fallback_description() {
        let record = NewAuditRecord::from_dispatch(
            &ability("demo/echo"),
            &Actor::system(),
            &ArgMap::new(),
            AuditStatus::Success,
            None,
        );
        assert_eq!(record.description, "executed ability: demo/echo");
        assert!(record.object_type.is_none());
    }

    #[test]
    fn test_bare_id_key_uses_category_singular() {
        let record = NewAuditRecord::from_dispatch(
            &ability("storemind/products/update"),
            &Actor::admin(ActorId::new(1)),
            &args(&[("id", json!("gid-77"))]),
            AuditStatus::Success,
            None,
        );
        assert_eq!(record.object_type.as_deref(), Some("product"));
        assert_eq!(record.object_id.as_deref(), Some("gid-77"));
        assert_eq!(record.description, "updated product #gid-77");
    }

    #[test]
    fn test_parameters_serialized() {
        let record = NewAuditRecord::from_dispatch(
            &ability("demo/echo"),
            &Actor::guest(),
            &args(&[("msg", json!("hi"))]),
            AuditStatus::Success,
            Some("{}".to_string()),
        );
        assert_eq!(record.parameters.as_deref(), Some(r#"{"msg":"hi"}"#));
    }

    #[test]
    fn test_actor_ip_carried_onto_record() {
        let actor = Actor::admin(ActorId::new(2)).with_ip("198.51.100.7");
        let record = NewAuditRecord::from_dispatch(
            &ability("demo/echo"),
            &actor,
            &ArgMap::new(),
            AuditStatus::Success,
            None,
        );
        assert_eq!(record.ip_address.as_deref(), Some("198.51.100.7"));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AuditStatus::Pending,
            AuditStatus::Success,
            AuditStatus::Failed,
            AuditStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<AuditStatus>().unwrap(), status);
        }
    }
}
