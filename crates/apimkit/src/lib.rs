//! # apimkit
//!
//! Pure Rust client library for Gravitee.io API Management.
//!
//! This crate is a declarative reconciliation client: given the desired
//! state of an API (its entity, plans, documentation pages, visibility,
//! ownership and lifecycle state), it drives the management REST API so the
//! remote resource converges to that state. It decides which subset of
//! create/update/deploy/start/stop/delete calls to issue, in what order,
//! and records every call into a per-invocation report.
//!
//! ## Example
//!
//! ```no_run
//! use apimkit::{reconcile, Credentials, DesiredApi, Gateway, RunReport, TargetState};
//! use serde_json::json;
//!
//! let gateway = Gateway::new(
//!     "https://manage-api.mycompany.com",
//!     Credentials::basic("admin", "admin"),
//! );
//!
//! let desired = DesiredApi {
//!     state: TargetState::Started,
//!     config: Some(json!({ "contextPath": "/test/api", "name": "test" })),
//!     plans: vec![json!({ "name": "keyless", "security": "KEY_LESS" })],
//!     ..DesiredApi::default()
//! };
//!
//! let mut report = RunReport::new();
//! reconcile(&gateway, desired, &mut report).expect("reconciliation failed");
//!
//! println!("changed: {}, api: {}", report.changed, report.api_id);
//! ```
//!
//! ## Execution model
//!
//! Strictly sequential and synchronous: one invocation issues its calls one
//! at a time in fixed orders, because later steps (deploys, page order
//! numbering) depend on earlier ones completing. Nothing is retried
//! internally — any non-success status aborts the invocation — but every
//! operation is safe to re-drive, so a caller wanting resilience re-invokes
//! the whole reconciliation.
//!
//! The [`RunReport`] accumulator is the only shared mutable state of an
//! invocation. It is owned by that invocation; construct a fresh one per
//! run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod error;
pub mod groups;
pub mod pages;
pub mod plans;
pub mod reconcile;
pub mod report;
pub mod transport;
pub mod types;
pub mod users;

pub use client::{API_PATH, Credentials, Gateway};
pub use error::{Error, Result};
pub use reconcile::{Reconciler, reconcile};
pub use report::{CallRecord, RunReport};
pub use transport::{AgentTransport, HttpTransport, Method, MockTransport};
pub use types::{DesiredApi, GroupRecord, OwnershipTransfer, TargetState, UserRecord, Visibility};
