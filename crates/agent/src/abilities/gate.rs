//! Authorization gate mapping abilities to required capabilities.
//!
//! The gate itself holds no policy: it asks an injected [`CapabilityCheck`]
//! whether the actor holds the ability's declared permission. The platform
//! supplies the real capability resolution; [`RoleCapabilities`] is the
//! default role model used when nothing richer is wired in.

use std::sync::Arc;

use storemind_core::{Actor, ActorType, Permission};

use super::error::DispatchError;
use super::types::Ability;

/// Platform collaborator resolving whether an actor holds a capability.
pub trait CapabilityCheck: Send + Sync {
    /// Whether `actor` holds `permission`.
    fn has_permission(&self, actor: &Actor, permission: Permission) -> bool;
}

/// Default role model.
///
/// Staff and internal automation hold every capability; shoppers hold
/// read-only access; unauthenticated visitors hold nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCapabilities;

impl CapabilityCheck for RoleCapabilities {
    fn has_permission(&self, actor: &Actor, permission: Permission) -> bool {
        match actor.actor_type {
            ActorType::Admin | ActorType::System => true,
            ActorType::Customer => permission == Permission::Read,
            ActorType::Guest => false,
        }
    }
}

/// Checks the invoking actor against an ability's required permission.
pub struct AuthorizationGate {
    check: Arc<dyn CapabilityCheck>,
}

impl AuthorizationGate {
    /// Build a gate around an injected capability resolver.
    #[must_use]
    pub fn new(check: Arc<dyn CapabilityCheck>) -> Self {
        Self { check }
    }

    /// Gate backed by the default role model.
    #[must_use]
    pub fn with_default_roles() -> Self {
        Self::new(Arc::new(RoleCapabilities))
    }

    /// Whether the actor may invoke (or see) the ability.
    #[must_use]
    pub fn allows(&self, actor: &Actor, ability: &Ability) -> bool {
        self.check.has_permission(actor, ability.permission)
    }

    /// Authorize one dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Forbidden`] when the actor does not hold the
    /// ability's required capability.
    pub fn authorize(&self, actor: &Actor, ability: &Ability) -> Result<(), DispatchError> {
        if self.allows(actor, ability) {
            Ok(())
        } else {
            Err(DispatchError::Forbidden(ability.id.clone()))
        }
    }
}
