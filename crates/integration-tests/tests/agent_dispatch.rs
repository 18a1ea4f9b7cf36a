//! End-to-end dispatch scenarios: catalog lookup, authorization, validation,
//! handler invocation, and audit recording.

use std::sync::Arc;

use serde_json::json;
use storemind_agent::abilities::{
    Ability, AbilityDispatcher, ArgMap, AuthorizationGate, DispatchError, FnHandler, ParamType,
    Parameter, SchemaExporter,
};
use storemind_agent::audit::{AuditFilter, AuditStatus, store};
use storemind_core::{Actor, ActorId, Permission};
use storemind_integration_tests::{args, echo_ability, memory_pool, test_catalog};

#[tokio::test]
async fn test_echo_dispatch_success_with_audit_record() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let actor = Actor::admin(ActorId::new(7)).with_ip("203.0.113.4");
    let result = dispatcher
        .execute("demo/echo", &args(&[("msg", json!("hi"))]), &actor)
        .await
        .expect("dispatch succeeds");
    assert_eq!(result, json!({"echo": "hi"}));

    let records = store::query(
        &pool,
        &AuditFilter::default(),
        storemind_agent::audit::SortKey::CreatedAt,
        storemind_agent::audit::SortDir::Desc,
        10,
        0,
    )
    .await
    .expect("audit query");
    assert_eq!(records.len(), 1, "exactly one terminal audit record");

    let record = records.first().expect("record");
    assert_eq!(record.ability_id, "demo/echo");
    assert_eq!(record.status, AuditStatus::Success);
    assert_eq!(record.actor_id, ActorId::new(7));
    assert_eq!(record.ip_address.as_deref(), Some("203.0.113.4"));
    assert_eq!(record.action_category, "demo");
    assert_eq!(record.action_type, "echo");
    let parameters = record.parameters.as_deref().expect("parameters stored");
    assert!(parameters.contains("\"msg\""));
}

#[tokio::test]
async fn test_missing_required_parameter_writes_no_audit() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let err = dispatcher
        .execute("demo/echo", &ArgMap::new(), &Actor::admin(ActorId::new(1)))
        .await
        .expect_err("missing msg must fail");
    assert!(matches!(err, DispatchError::InvalidArguments(_)));

    let total = store::count(&pool, &AuditFilter::default())
        .await
        .expect("count");
    assert_eq!(total, 0, "validation failures are not audited");
}

#[tokio::test]
async fn test_unknown_ability_writes_no_audit() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let err = dispatcher
        .execute(
            "demo/missing",
            &ArgMap::new(),
            &Actor::admin(ActorId::new(1)),
        )
        .await
        .expect_err("unregistered id must fail");
    assert!(matches!(err, DispatchError::AbilityNotFound(id) if id == "demo/missing"));

    let total = store::count(&pool, &AuditFilter::default())
        .await
        .expect("count");
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_forbidden_writes_no_audit_and_hides_from_export() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    // Customers hold read only; the cancel ability requires manage.
    let customer = Actor::customer(ActorId::new(9));
    let err = dispatcher
        .execute(
            "storemind/orders/cancel",
            &args(&[("order_id", json!(12))]),
            &customer,
        )
        .await
        .expect_err("customer may not cancel orders");
    assert!(matches!(err, DispatchError::Forbidden(_)));

    let total = store::count(&pool, &AuditFilter::default())
        .await
        .expect("count");
    assert_eq!(total, 0, "denied dispatches are not audited");

    // The same actor must not see the ability in the schema export.
    let exporter = SchemaExporter::new(&catalog, &gate);
    let names: Vec<String> = exporter
        .export(&customer)
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert!(!names.contains(&"storemind/orders/cancel".to_string()));
    assert!(names.contains(&"demo/echo".to_string()));
}

#[tokio::test]
async fn test_handler_fault_audits_failed_and_returns_generic_error() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    catalog.register(Ability::new(
        "storemind/orders/sync",
        "Sync orders",
        "Sync orders from the platform.",
        "orders",
        Arc::new(FnHandler::new(|_args: &ArgMap| {
            Err("downstream timeout".into())
        })),
    ));
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let err = dispatcher
        .execute(
            "storemind/orders/sync",
            &ArgMap::new(),
            &Actor::system(),
        )
        .await
        .expect_err("fault must surface");
    assert!(matches!(err, DispatchError::ExecutionFault(_)));
    assert_eq!(err.to_string(), "ability execution failed");

    let filter = AuditFilter {
        status: Some(AuditStatus::Failed),
        ..AuditFilter::default()
    };
    let records = store::query(
        &pool,
        &filter,
        storemind_agent::audit::SortKey::CreatedAt,
        storemind_agent::audit::SortDir::Desc,
        10,
        0,
    )
    .await
    .expect("audit query");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records.first().expect("record").result.as_deref(),
        Some("downstream timeout"),
        "fault message is captured as the audit result"
    );
}

#[tokio::test]
async fn test_application_error_payload_still_audits_success() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    catalog.register(
        Ability::new(
            "storemind/orders/get",
            "Get order",
            "Look up one order by id.",
            "orders",
            Arc::new(FnHandler::new(|_args: &ArgMap| {
                // The order does not exist: that is data, not a crash.
                Ok(json!({"error": "order not found"}))
            })),
        )
        .with_permission(Permission::Read)
        .with_parameters(vec![Parameter::required(
            "order_id",
            ParamType::Integer,
            "The order ID",
        )]),
    );
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let result = dispatcher
        .execute(
            "storemind/orders/get",
            &args(&[("order_id", json!(404))]),
            &Actor::admin(ActorId::new(1)),
        )
        .await
        .expect("dispatch itself succeeds");
    assert_eq!(result["error"], "order not found");

    let filter = AuditFilter {
        status: Some(AuditStatus::Success),
        ..AuditFilter::default()
    };
    assert_eq!(store::count(&pool, &filter).await.expect("count"), 1);
}

#[tokio::test]
async fn test_declared_defaults_are_merged_before_invocation() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    catalog.register(
        Ability::new(
            "storemind/orders/list",
            "List orders",
            "List recent orders.",
            "orders",
            Arc::new(FnHandler::new(|invoked: &ArgMap| {
                Ok(json!({"limit": invoked.get("limit").cloned().unwrap_or(json!(null))}))
            })),
        )
        .with_permission(Permission::Read)
        .with_parameters(vec![
            Parameter::optional("limit", ParamType::Integer, "Max orders to return")
                .with_default(json!(10)),
        ]),
    );
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let result = dispatcher
        .execute(
            "storemind/orders/list",
            &ArgMap::new(),
            &Actor::admin(ActorId::new(1)),
        )
        .await
        .expect("dispatch succeeds");
    assert_eq!(result["limit"], 10, "default value reached the handler");
}

#[tokio::test]
async fn test_undeclared_argument_keys_are_ignored() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();
    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);

    let supplied = args(&[("msg", json!("hi")), ("utterly_unknown", json!([1, 2, 3]))]);
    let result = dispatcher
        .execute("demo/echo", &supplied, &Actor::admin(ActorId::new(1)))
        .await
        .expect("open-world contract tolerates extra keys");
    assert_eq!(result["echo"], "hi");
}

#[tokio::test]
async fn test_reregistered_ability_uses_new_handler() {
    let pool = memory_pool().await;
    let catalog = test_catalog();
    let gate = AuthorizationGate::with_default_roles();

    let mut replacement = echo_ability();
    replacement.handler = Arc::new(FnHandler::new(|_args: &ArgMap| Ok(json!({"echo": "v2"}))));
    assert!(catalog.register(replacement));

    let dispatcher = AbilityDispatcher::new(&catalog, &gate, &pool);
    let result = dispatcher
        .execute(
            "demo/echo",
            &args(&[("msg", json!("ignored"))]),
            &Actor::admin(ActorId::new(1)),
        )
        .await
        .expect("dispatch succeeds");
    assert_eq!(result["echo"], "v2", "last registration wins");
}
