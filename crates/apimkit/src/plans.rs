//! Plan CRUD against one API.

use serde_json::Value;

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::report::RunReport;
use crate::transport::Method;
use crate::types::entity_id;

/// Client for the plans of one API.
///
/// Stateless apart from the identifiers it targets; borrows the plan entity
/// so a creation can write the server-assigned id back into the desired
/// state.
pub struct PlanClient<'a> {
    gateway: &'a Gateway,
    api_id: &'a str,
    plan: &'a mut Value,
}

impl<'a> PlanClient<'a> {
    /// Create a client for one plan of the given API.
    pub fn new(gateway: &'a Gateway, api_id: &'a str, plan: &'a mut Value) -> Self {
        Self {
            gateway,
            api_id,
            plan,
        }
    }

    /// Create the plan, or update it when it already carries an id.
    ///
    /// Issues exactly one call either way.
    pub fn create_or_update(&mut self, report: &mut RunReport) -> Result<()> {
        if entity_id(self.plan).is_some() {
            self.update(report)
        } else {
            self.create(report)
        }
    }

    /// Delete the plan by id.
    ///
    /// A plan without an id is a precondition violation, raised before any
    /// call.
    pub fn remove(&mut self, report: &mut RunReport) -> Result<()> {
        let Some(id) = entity_id(self.plan) else {
            return Err(Error::precondition("plan removal requires an id"));
        };
        let endpoint = format!("{API_PATH}/apis/{}/plans/{id}", self.api_id);
        self.gateway
            .request(report, Method::Delete, &endpoint, None)?;
        Ok(())
    }

    fn create(&mut self, report: &mut RunReport) -> Result<()> {
        let endpoint = format!("{API_PATH}/apis/{}/plans", self.api_id);
        let record = self
            .gateway
            .request(report, Method::Post, &endpoint, Some(self.plan))?;

        let id = record
            .response_body
            .as_ref()
            .and_then(|body| body.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_response("plan creation response carries no id"))?
            .to_string();
        if let Some(entity) = self.plan.as_object_mut() {
            entity.insert("id".to_string(), Value::String(id));
        }
        Ok(())
    }

    fn update(&mut self, report: &mut RunReport) -> Result<()> {
        // entity_id() checked by the caller; full entity goes on the wire.
        let id = entity_id(self.plan).unwrap_or_default();
        let endpoint = format!("{API_PATH}/apis/{}/plans/{id}", self.api_id);
        self.gateway
            .request(report, Method::Put, &endpoint, Some(self.plan))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Credentials;
    use crate::transport::MockTransport;
    use serde_json::json;

    fn mock_gateway() -> (Gateway, MockTransport) {
        let mock = MockTransport::new();
        let gateway = Gateway::with_transport(
            "https://manage.example.com",
            Credentials::basic("admin", "admin"),
            Box::new(mock.clone()),
        );
        (gateway, mock)
    }

    #[test]
    fn test_create_posts_once_and_writes_id_back() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut plan = json!({ "name": "keyless" });
        mock.enqueue_json(201, &json!({ "id": "456" }));

        PlanClient::new(&gateway, "1234", &mut plan)
            .create_or_update(&mut report)
            .unwrap();

        assert_eq!(
            mock.calls(),
            vec![(
                Method::Post,
                "https://manage.example.com/management/apis/1234/plans".to_string()
            )]
        );
        assert_eq!(plan["id"], json!("456"));
    }

    #[test]
    fn test_update_puts_once_with_full_entity() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut plan = json!({ "id": "456", "name": "keyless" });

        PlanClient::new(&gateway, "1234", &mut plan)
            .create_or_update(&mut report)
            .unwrap();

        assert_eq!(
            mock.calls(),
            vec![(
                Method::Put,
                "https://manage.example.com/management/apis/1234/plans/456".to_string()
            )]
        );
        // Nothing stripped from the update payload.
        assert_eq!(
            mock.requests()[0].body.as_deref(),
            Some(r#"{"id":"456","name":"keyless"}"#)
        );
    }

    #[test]
    fn test_remove_deletes_by_id() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut plan = json!({ "id": "456" });

        PlanClient::new(&gateway, "1234", &mut plan)
            .remove(&mut report)
            .unwrap();

        assert_eq!(
            mock.calls(),
            vec![(
                Method::Delete,
                "https://manage.example.com/management/apis/1234/plans/456".to_string()
            )]
        );
    }

    #[test]
    fn test_remove_without_id_is_a_precondition_violation() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut plan = json!({ "name": "keyless" });

        let err = PlanClient::new(&gateway, "1234", &mut plan)
            .remove(&mut report)
            .unwrap_err();

        assert!(matches!(err, Error::Precondition(_)));
        assert!(mock.requests().is_empty());
    }
}
