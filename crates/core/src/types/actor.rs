//! Actors: the principals that invoke abilities.
//!
//! Every dispatch is attributed to an [`Actor`]. The actor's type determines
//! which capabilities the default role model grants, and its ID and origin
//! address end up on the audit trail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ActorId;

/// Classification of the invoking principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    /// Store staff with management access.
    Admin,
    /// Authenticated shopper.
    Customer,
    /// Unauthenticated visitor.
    Guest,
    /// Internal automation (cron jobs, migrations, seeded tasks).
    System,
}

impl ActorType {
    /// Stable string form, as persisted in the audit log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Guest => "guest",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown actor type string.
#[derive(Debug, Error)]
#[error("unknown actor type: {0}")]
pub struct ParseActorTypeError(pub String);

impl FromStr for ActorType {
    type Err = ParseActorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            "guest" => Ok(Self::Guest),
            "system" => Ok(Self::System),
            other => Err(ParseActorTypeError(other.to_string())),
        }
    }
}

/// The principal behind one or more dispatches.
///
/// Carries identity and request origin only; what the actor may do is decided
/// by the capability check injected into the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Principal identifier (`ActorId::ANONYMOUS` for guests and system jobs).
    pub id: ActorId,
    /// Principal classification.
    #[serde(rename = "type")]
    pub actor_type: ActorType,
    /// Origin address of the request, if known (recorded on audit entries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl Actor {
    /// Create an actor with an explicit type and ID.
    #[must_use]
    pub const fn new(id: ActorId, actor_type: ActorType) -> Self {
        Self {
            id,
            actor_type,
            ip_address: None,
        }
    }

    /// Store staff actor.
    #[must_use]
    pub const fn admin(id: ActorId) -> Self {
        Self::new(id, ActorType::Admin)
    }

    /// Authenticated shopper actor.
    #[must_use]
    pub const fn customer(id: ActorId) -> Self {
        Self::new(id, ActorType::Customer)
    }

    /// Unauthenticated visitor.
    #[must_use]
    pub const fn guest() -> Self {
        Self::new(ActorId::ANONYMOUS, ActorType::Guest)
    }

    /// Internal automation principal.
    #[must_use]
    pub const fn system() -> Self {
        Self::new(ActorId::ANONYMOUS, ActorType::System)
    }

    /// Attach the request origin address.
    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_type_roundtrip() {
        for t in [
            ActorType::Admin,
            ActorType::Customer,
            ActorType::Guest,
            ActorType::System,
        ] {
            assert_eq!(t.as_str().parse::<ActorType>().unwrap(), t);
        }
    }

    #[test]
    fn test_actor_type_parse_unknown() {
        let err = "robot".parse::<ActorType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown actor type: robot");
    }

    #[test]
    fn test_actor_serde_shape() {
        let actor = Actor::admin(ActorId::new(3)).with_ip("203.0.113.9");
        let json = serde_json::to_value(&actor).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["type"], "admin");
        assert_eq!(json["ip_address"], "203.0.113.9");
    }

    #[test]
    fn test_guest_is_anonymous() {
        let actor = Actor::guest();
        assert_eq!(actor.id, ActorId::ANONYMOUS);
        assert!(actor.ip_address.is_none());
    }
}
