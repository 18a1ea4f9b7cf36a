//! Append-only audit trail for ability dispatches.
//!
//! Every dispatch that reaches a handler produces exactly one immutable
//! record describing who invoked what, with which arguments, and how it
//! ended. Records are retrieved through a filter/sort/paginate query surface
//! whose sort identifiers go through a closed whitelist - the filter values
//! may come straight from HTTP input, so they are only ever bound as SQL
//! parameters.
//!
//! Records are deleted exclusively by the retention pass.

pub mod query;
pub mod record;
pub mod retention;
pub mod store;

pub use query::{AuditFilter, SortDir, SortKey};
pub use record::{AuditRecord, AuditStatus, NewAuditRecord};
pub use retention::spawn_retention_task;
