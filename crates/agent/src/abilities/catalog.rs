//! The process-wide ability catalog.
//!
//! The catalog is an explicitly constructed service: built once at startup,
//! handed by reference to every consumer, and populated by integration
//! modules through [`AbilityCatalog::register`] during the registration
//! phase. It is read-mostly afterwards, but registration is allowed to trail
//! the startup phase, so all state sits behind a read-write lock.
//!
//! Iteration order is insertion order: re-registering an id overwrites the
//! entry in place, keeping listings and schema exports stable.

use std::sync::PoisonError;
use std::sync::RwLock;

use super::types::Ability;

/// A category label grouping abilities in listings.
///
/// Integration modules (bookings, subscriptions, memberships) extend the set
/// at runtime so their abilities display under a named grouping without
/// modifying core code.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Category {
    /// Stable key referenced by `Ability::category`.
    pub key: String,
    /// Display label.
    pub label: String,
}

/// Built-in commerce category set seeded into every catalog.
const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    ("orders", "Orders"),
    ("products", "Products"),
    ("customers", "Customers"),
    ("coupons", "Coupons"),
    ("analytics", "Analytics"),
    ("store", "Store"),
];

#[derive(Default)]
struct CatalogInner {
    abilities: Vec<Ability>,
    categories: Vec<Category>,
}

/// In-memory registry mapping ability identifiers to their metadata.
///
/// No persistence: the catalog is rebuilt from scratch on every process
/// start via the registration hook.
pub struct AbilityCatalog {
    inner: RwLock<CatalogInner>,
}

impl AbilityCatalog {
    /// Create an empty catalog seeded with the built-in category labels.
    #[must_use]
    pub fn new() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|&(key, label)| Category {
                key: key.to_string(),
                label: label.to_string(),
            })
            .collect();
        Self {
            inner: RwLock::new(CatalogInner {
                abilities: Vec::new(),
                categories,
            }),
        }
    }

    /// Register an ability, overwriting any prior entry with the same id.
    ///
    /// Returns `false` without mutating the catalog when the ability has an
    /// empty id or name. An overwrite keeps the original insertion position.
    pub fn register(&self, ability: Ability) -> bool {
        if ability.id.is_empty() || ability.name.is_empty() {
            return false;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = inner.abilities.iter_mut().find(|a| a.id == ability.id) {
            *existing = ability;
        } else {
            inner.abilities.push(ability);
        }
        true
    }

    /// Remove an ability; returns whether a removal occurred.
    pub fn unregister(&self, id: &str) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.abilities.len();
        inner.abilities.retain(|a| a.id != id);
        inner.abilities.len() != before
    }

    /// Look up an ability by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Ability> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.abilities.iter().find(|a| a.id == id).cloned()
    }

    /// List registered abilities in insertion order, optionally filtered to
    /// one category.
    #[must_use]
    pub fn list(&self, category: Option<&str>) -> Vec<Ability> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .abilities
            .iter()
            .filter(|a| category.is_none_or(|c| a.category == c))
            .cloned()
            .collect()
    }

    /// Idempotently extend the category label set.
    ///
    /// Re-adding an existing key updates its label in place.
    pub fn add_category(&self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = inner.categories.iter_mut().find(|c| c.key == key) {
            existing.label = label;
        } else {
            inner.categories.push(Category { key, label });
        }
    }

    /// Snapshot of the category label set.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.categories.clone()
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.abilities.len()
    }

    /// Whether the catalog has no registered abilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AbilityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::abilities::types::FnHandler;

    use super::*;

    fn ability(id: &str, name: &str) -> Ability {
        Ability::new(
            id,
            name,
            "test ability",
            "store",
            Arc::new(FnHandler::new(|_args| Ok(json!(null)))),
        )
    }

    #[test]
    fn test_register_and_get() {
        let catalog = AbilityCatalog::new();
        assert!(catalog.register(ability("demo/echo", "Echo")));
        let found = catalog.get("demo/echo").expect("registered ability");
        assert_eq!(found.name, "Echo");
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let catalog = AbilityCatalog::new();
        assert!(!catalog.register(ability("demo/echo", "")));
        assert!(catalog.get("demo/echo").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_register_rejects_empty_id() {
        let catalog = AbilityCatalog::new();
        assert!(!catalog.register(ability("", "Echo")));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_last_registration_wins_keeps_position() {
        let catalog = AbilityCatalog::new();
        catalog.register(ability("demo/first", "First"));
        catalog.register(ability("demo/second", "Second"));
        catalog.register(ability("demo/first", "First v2"));

        let ids: Vec<String> = catalog.list(None).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["demo/first", "demo/second"]);
        assert_eq!(catalog.get("demo/first").unwrap().name, "First v2");
    }

    #[test]
    fn test_unregister() {
        let catalog = AbilityCatalog::new();
        catalog.register(ability("demo/echo", "Echo"));
        assert!(catalog.unregister("demo/echo"));
        assert!(!catalog.unregister("demo/echo"));
        assert!(catalog.get("demo/echo").is_none());
    }

    #[test]
    fn test_list_filters_by_category() {
        let catalog = AbilityCatalog::new();
        let mut orders = ability("storemind/orders/get", "Get order");
        orders.category = "orders".to_string();
        catalog.register(orders);
        catalog.register(ability("demo/echo", "Echo"));

        let filtered = catalog.list(Some("orders"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id, "storemind/orders/get");
        assert_eq!(catalog.list(None).len(), 2);
    }

    #[test]
    fn test_add_category_idempotent() {
        let catalog = AbilityCatalog::new();
        let before = catalog.categories().len();
        catalog.add_category("bookings", "Bookings");
        catalog.add_category("bookings", "Bookings & Appointments");

        let categories = catalog.categories();
        assert_eq!(categories.len(), before + 1);
        let bookings = categories.iter().find(|c| c.key == "bookings").unwrap();
        assert_eq!(bookings.label, "Bookings & Appointments");
    }

    #[test]
    fn test_builtin_categories_seeded() {
        let catalog = AbilityCatalog::new();
        let keys: Vec<String> = catalog.categories().into_iter().map(|c| c.key).collect();
        assert!(keys.contains(&"orders".to_string()));
        assert!(keys.contains(&"analytics".to_string()));
    }
}
