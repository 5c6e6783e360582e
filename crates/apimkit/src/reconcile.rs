//! Reconciliation orchestrator.
//!
//! Drives the management API so that one remote API converges to a declared
//! [`DesiredApi`]: decides between the create, update and remove call
//! sequences, keeps their fixed orders, and re-drives safely — operations
//! that find the remote side already in the target shape issue no mutating
//! calls.
//!
//! Any error aborts the remaining steps of the invocation. There is no
//! compensating rollback; partial application is surfaced to the caller
//! through the aborted report, which still carries every call made.

use serde_json::{Map, Value};

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::pages::PageClient;
use crate::plans::PlanClient;
use crate::report::RunReport;
use crate::transport::Method;
use crate::types::{DesiredApi, TargetState, Visibility};
use crate::users;

/// Fields managed by the server, stripped before re-submitting a creation
/// response as an update payload.
const SERVER_MANAGED_FIELDS: [&str; 6] = [
    "created_at",
    "updated_at",
    "state",
    "owner",
    "id",
    "workflow_state",
];

/// Lifecycle transition of a deployed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleAction {
    Start,
    Stop,
}

impl LifecycleAction {
    /// Action token carried in the query string.
    fn token(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
        }
    }

    /// Lifecycle state this action converges to.
    fn target(self) -> &'static str {
        match self {
            Self::Start => "STARTED",
            Self::Stop => "STOPPED",
        }
    }
}

/// Run one reconciliation invocation.
///
/// Convenience wrapper around [`Reconciler`].
pub fn reconcile(gateway: &Gateway, desired: DesiredApi, report: &mut RunReport) -> Result<()> {
    Reconciler::new(gateway, desired).run(report)
}

/// Orchestrator for one reconciliation invocation.
///
/// Owns the desired state for the duration of the run; sub-resource clients
/// borrow into it (a plan/page creation writes the server-assigned id back).
pub struct Reconciler<'a> {
    gateway: &'a Gateway,
    desired: DesiredApi,
    api_id: Option<String>,
}

impl<'a> Reconciler<'a> {
    /// Create an orchestrator for the given desired state.
    #[must_use]
    pub fn new(gateway: &'a Gateway, desired: DesiredApi) -> Self {
        let api_id = desired.api_id.clone();
        Self {
            gateway,
            desired,
            api_id,
        }
    }

    /// Drive the remote API to the desired state.
    ///
    /// No declared id with a `present`/`started` target selects creation; an
    /// `absent` target selects removal; everything else is an update of the
    /// declared API.
    pub fn run(mut self, report: &mut RunReport) -> Result<()> {
        match (self.desired.state, self.api_id.is_some()) {
            (TargetState::Present | TargetState::Started, false) => self.create(report),
            (TargetState::Absent, _) => self.remove(report),
            _ => self.update(report),
        }
    }

    // =========================================================================
    // Top-level sequences
    // =========================================================================

    fn create(&mut self, report: &mut RunReport) -> Result<()> {
        let config = self
            .desired
            .config
            .clone()
            .ok_or_else(|| Error::precondition("api creation requires a config entity"))?;

        // No mutating call before the context path is known to be free.
        self.verify(report, &config)?;

        log::info!("creating api");
        let record = self
            .gateway
            .request(report, Method::Post, &format!("{API_PATH}/apis"), Some(&config))?;
        let created = record.response_body.unwrap_or(Value::Null);
        let api_id = created
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_response("api creation response carries no id"))?
            .to_string();
        self.api_id = Some(api_id.clone());
        report.changed = true;
        report.api_id = api_id;

        if self.desired.transfer_ownership.is_some() {
            self.transfer_owner(report)?;
        }

        if self.desired.visibility != Visibility::Private {
            // The creation endpoint ignores visibility; a second write with
            // the server-managed fields stripped sets it.
            let mut entity = match created {
                Value::Object(fields) => fields,
                _ => Map::new(),
            };
            entity.insert(
                "visibility".to_string(),
                Value::String(self.desired.visibility.as_str().to_string()),
            );
            for field in SERVER_MANAGED_FIELDS {
                entity.remove(field);
            }
            self.update_entity(report, &Value::Object(entity))?;
        }

        if !self.desired.plans.is_empty() {
            self.apply_plans(report)?;
        }
        if !self.desired.pages.is_empty() {
            self.apply_pages(report)?;
        }

        if self.desired.state == TargetState::Started {
            self.deploy(report)?;
            self.transition(report, LifecycleAction::Start)?;
        }
        Ok(())
    }

    /// Fixed order: entity + deploy, plans + deploy, pages, ownership,
    /// lifecycle last — so a `start` activates the configuration written by
    /// the same invocation.
    fn update(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("api update")?;
        log::info!("updating api {api_id}");
        report.api_id = api_id;

        if let Some(config) = self.desired.config.clone() {
            self.update_entity(report, &config)?;
        }
        if !self.desired.plans.is_empty() {
            self.apply_plans(report)?;
        }
        if !self.desired.pages.is_empty() {
            self.apply_pages(report)?;
        }
        if self.desired.transfer_ownership.is_some() {
            self.transfer_owner(report)?;
        }
        match self.desired.state {
            TargetState::Started => self.transition(report, LifecycleAction::Start)?,
            TargetState::Stopped => self.transition(report, LifecycleAction::Stop)?,
            TargetState::Present | TargetState::Absent => {}
        }
        Ok(())
    }

    /// Plans must go before the API itself; the server rejects deleting an
    /// API with live plans.
    fn remove(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("api removal")?;
        log::info!("removing api {api_id}");

        let mut plans = self.fetch_plans(report)?;
        for plan in &mut plans {
            PlanClient::new(self.gateway, &api_id, plan).remove(report)?;
        }
        self.transition(report, LifecycleAction::Stop)?;
        self.gateway.request(
            report,
            Method::Delete,
            &format!("{API_PATH}/apis/{api_id}"),
            None,
        )?;
        report.state = "absent".to_string();
        report.changed = true;
        Ok(())
    }

    // =========================================================================
    // Steps
    // =========================================================================

    /// Check context-path availability before any mutating call.
    fn verify(&self, report: &mut RunReport, config: &Value) -> Result<()> {
        let context_path = config
            .get("contextPath")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::precondition("api creation requires a contextPath in the config entity")
            })?;
        let body = serde_json::json!({ "context_path": context_path });
        self.gateway.request(
            report,
            Method::Post,
            &format!("{API_PATH}/apis/verify"),
            Some(&body),
        )?;
        Ok(())
    }

    /// Replace the API entity and deploy the new configuration.
    fn update_entity(&mut self, report: &mut RunReport, entity: &Value) -> Result<()> {
        let api_id = self.require_api_id("api entity update")?;
        self.gateway.request(
            report,
            Method::Put,
            &format!("{API_PATH}/apis/{api_id}"),
            Some(entity),
        )?;
        self.deploy(report)?;
        report.changed = true;
        Ok(())
    }

    /// Create or update every declared plan, then deploy once.
    ///
    /// The deploy is per-API, not per-plan; batching all plan changes under
    /// one deploy avoids redundant deploys.
    fn apply_plans(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("plan reconciliation")?;
        for plan in &mut self.desired.plans {
            PlanClient::new(self.gateway, &api_id, plan).create_or_update(report)?;
        }
        self.deploy(report)
    }

    /// Create or update every declared page.
    ///
    /// `order` is assigned from the 1-based list position, overwriting any
    /// declared value. All page clients are constructed first (group-name
    /// resolution happens there), then applied in order. Pages are not part
    /// of the deployed gateway configuration, so no deploy follows.
    fn apply_pages(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("page reconciliation")?;
        for (index, page) in self.desired.pages.iter_mut().enumerate() {
            if let Some(entity) = page.as_object_mut() {
                entity.insert("order".to_string(), Value::from(index as u64 + 1));
            }
        }
        let mut clients = Vec::with_capacity(self.desired.pages.len());
        for page in &mut self.desired.pages {
            clients.push(PageClient::new(self.gateway, &api_id, page, report)?);
        }
        for client in &mut clients {
            client.create_or_update(report)?;
        }
        Ok(())
    }

    /// Promote the staged configuration into the gateway runtime.
    fn deploy(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("api deploy")?;
        self.gateway.request(
            report,
            Method::Post,
            &format!("{API_PATH}/apis/{api_id}/deploy"),
            None,
        )?;
        report.changed = true;
        Ok(())
    }

    /// Hand the primary-owner role to the declared user.
    ///
    /// The free-text filter must match exactly one remote user; anything
    /// else aborts before the transfer call.
    fn transfer_owner(&mut self, report: &mut RunReport) -> Result<()> {
        let api_id = self.require_api_id("ownership transfer")?;
        let transfer = self
            .desired
            .transfer_ownership
            .clone()
            .ok_or_else(|| Error::precondition("ownership transfer requires transfer data"))?;

        let matches = users::search(self.gateway, report, &transfer.user)?;
        if matches.len() != 1 {
            return Err(Error::AmbiguousOwner {
                matches: matches.len(),
            });
        }
        let user = &matches[0];

        let mut body = serde_json::json!({
            "role": transfer.owner_role,
            "reference": user.reference,
        });
        if let Some(id) = &user.id {
            body["id"] = Value::String(id.clone());
        }
        self.gateway.request(
            report,
            Method::Post,
            &format!("{API_PATH}/apis/{api_id}/members/transfer_ownership"),
            Some(&body),
        )?;
        report.changed = true;
        Ok(())
    }

    /// Converge the lifecycle state, idempotently.
    ///
    /// The remote state is re-fetched at the decision point; the action call
    /// is only issued (and `changed` only set) when the remote state differs
    /// case-insensitively from the target. The final observed target state
    /// is always recorded.
    fn transition(&mut self, report: &mut RunReport, action: LifecycleAction) -> Result<()> {
        let api_id = self.require_api_id("lifecycle transition")?;
        let api = self.fetch_api(report)?;
        let current = api.get("state").and_then(Value::as_str).unwrap_or_default();

        if !current.eq_ignore_ascii_case(action.target()) {
            self.gateway.request(
                report,
                Method::Post,
                &format!("{API_PATH}/apis/{api_id}?action={}", action.token()),
                None,
            )?;
            report.changed = true;
        }
        report.state = action.target().to_string();
        Ok(())
    }

    // =========================================================================
    // Remote state
    // =========================================================================

    fn fetch_api(&self, report: &mut RunReport) -> Result<Value> {
        let api_id = self.require_api_id("api fetch")?;
        let record = self.gateway.request(
            report,
            Method::Get,
            &format!("{API_PATH}/apis/{api_id}"),
            None,
        )?;
        record
            .response_body
            .ok_or_else(|| Error::invalid_response("api fetch returned no body"))
    }

    fn fetch_plans(&self, report: &mut RunReport) -> Result<Vec<Value>> {
        let api_id = self.require_api_id("plan fetch")?;
        let record = self.gateway.request(
            report,
            Method::Get,
            &format!("{API_PATH}/apis/{api_id}/plans"),
            None,
        )?;
        match record.response_body {
            Some(Value::Array(plans)) => Ok(plans),
            _ => Err(Error::invalid_response("plan fetch returned no plan list")),
        }
    }

    fn require_api_id(&self, operation: &str) -> Result<String> {
        self.api_id
            .clone()
            .ok_or_else(|| Error::precondition(format!("{operation} requires an api id")))
    }
}
