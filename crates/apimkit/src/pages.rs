//! Documentation page CRUD against one API.

use serde_json::Value;

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::groups;
use crate::report::RunReport;
use crate::transport::Method;
use crate::types::entity_id;

/// Fields the server refuses on a page update.
const UPDATE_STRIPPED_FIELDS: [&str; 2] = ["id", "type"];

/// Client for the documentation pages of one API.
///
/// Construction enforces that `order` is already assigned and, when the
/// page declares `excluded_groups` by name, resolves the names to group
/// ids right away — one group-list call, never repeated per operation. The
/// wire payload only ever carries ids.
pub struct PageClient<'a> {
    gateway: &'a Gateway,
    api_id: &'a str,
    page: &'a mut Value,
}

impl std::fmt::Debug for PageClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageClient")
            .field("api_id", &self.api_id)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

impl<'a> PageClient<'a> {
    /// Create a client for one page of the given API.
    ///
    /// A page without an `order` is a precondition violation.
    pub fn new(
        gateway: &'a Gateway,
        api_id: &'a str,
        page: &'a mut Value,
        report: &mut RunReport,
    ) -> Result<Self> {
        if page.get("order").and_then(Value::as_u64).is_none() {
            return Err(Error::precondition("page dispatch requires an order"));
        }
        let mut client = Self {
            gateway,
            api_id,
            page,
        };
        client.resolve_excluded_groups(report)?;
        Ok(client)
    }

    /// Create the page, or update it when it already carries an id.
    pub fn create_or_update(&mut self, report: &mut RunReport) -> Result<()> {
        if entity_id(self.page).is_some() {
            self.update(report)
        } else {
            self.create(report)
        }
    }

    /// Delete the page by id.
    pub fn remove(&mut self, report: &mut RunReport) -> Result<()> {
        let Some(id) = entity_id(self.page) else {
            return Err(Error::precondition("page removal requires an id"));
        };
        let endpoint = format!("{API_PATH}/apis/{}/pages/{id}", self.api_id);
        self.gateway
            .request(report, Method::Delete, &endpoint, None)?;
        Ok(())
    }

    fn create(&mut self, report: &mut RunReport) -> Result<()> {
        let endpoint = format!("{API_PATH}/apis/{}/pages", self.api_id);
        let record = self
            .gateway
            .request(report, Method::Post, &endpoint, Some(self.page))?;

        let id = record
            .response_body
            .as_ref()
            .and_then(|body| body.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_response("page creation response carries no id"))?
            .to_string();
        if let Some(entity) = self.page.as_object_mut() {
            entity.insert("id".to_string(), Value::String(id));
        }
        Ok(())
    }

    fn update(&mut self, report: &mut RunReport) -> Result<()> {
        let id = entity_id(self.page).unwrap_or_default().to_string();
        let mut payload = self.page.clone();
        if let Some(entity) = payload.as_object_mut() {
            for field in UPDATE_STRIPPED_FIELDS {
                entity.remove(field);
            }
        }
        let endpoint = format!("{API_PATH}/apis/{}/pages/{id}", self.api_id);
        self.gateway
            .request(report, Method::Put, &endpoint, Some(&payload))?;
        Ok(())
    }

    /// Replace declared group names with resolved group ids.
    fn resolve_excluded_groups(&mut self, report: &mut RunReport) -> Result<()> {
        let names: Vec<String> = match self.page.get("excluded_groups").and_then(Value::as_array) {
            Some(names) if !names.is_empty() => names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => return Ok(()),
        };

        let groups = groups::search(self.gateway, report, Some(&names))?;
        let ids: Vec<Value> = groups
            .into_iter()
            .map(|group| Value::String(group.id))
            .collect();
        if let Some(entity) = self.page.as_object_mut() {
            entity.insert("excluded_groups".to_string(), Value::Array(ids));
        }
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
    fn test_constructor_requires_order() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut page = json!({ "type": "SWAGGER" });

        let err = PageClient::new(&gateway, "1234", &mut page, &mut report).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_group_names_resolved_once_to_ids() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut page = json!({
            "order": 1,
            "type": "SWAGGER",
            "excluded_groups": ["mygroup"]
        });
        mock.enqueue_json(
            200,
            &json!([{ "id": "87b2858d-5466-4a4a-b285-8d54667a4a8a", "name": "mygroup" }]),
        );
        mock.enqueue_json(201, &json!({ "id": "a986531f-7930-4a1e-8653-1f79305a1e69" }));

        let mut client = PageClient::new(&gateway, "1234", &mut page, &mut report).unwrap();
        client.create_or_update(&mut report).unwrap();

        let calls = mock.calls();
        assert_eq!(
            calls,
            vec![
                (
                    Method::Get,
                    "https://manage.example.com/management/configuration/groups".to_string()
                ),
                (
                    Method::Post,
                    "https://manage.example.com/management/apis/1234/pages".to_string()
                ),
            ]
        );
        // The outgoing payload carries resolved ids, never the names.
        let sent: serde_json::Value =
            serde_json::from_str(mock.requests()[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent["excluded_groups"],
            json!(["87b2858d-5466-4a4a-b285-8d54667a4a8a"])
        );
    }

    #[test]
    fn test_create_writes_assigned_id_back() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut page = json!({ "order": 1, "type": "SWAGGER" });
        mock.enqueue_json(201, &json!({ "id": "page-1" }));

        PageClient::new(&gateway, "1234", &mut page, &mut report)
            .unwrap()
            .create_or_update(&mut report)
            .unwrap();

        assert_eq!(page["id"], json!("page-1"));
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_update_strips_id_and_type() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut page = json!({
            "order": 1,
            "id": "page-1",
            "type": "SWAGGER",
            "name": "spec"
        });

        PageClient::new(&gateway, "1234", &mut page, &mut report)
            .unwrap()
            .create_or_update(&mut report)
            .unwrap();

        assert_eq!(
            mock.calls(),
            vec![(
                Method::Put,
                "https://manage.example.com/management/apis/1234/pages/page-1".to_string()
            )]
        );
        let sent: serde_json::Value =
            serde_json::from_str(mock.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({ "order": 1, "name": "spec" }));
        // The in-memory page keeps its id for later invocations.
        assert_eq!(page["id"], json!("page-1"));
    }

    #[test]
    fn test_remove_without_id_is_a_precondition_violation() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        let mut page = json!({ "order": 1 });

        let err = PageClient::new(&gateway, "1234", &mut page, &mut report)
            .unwrap()
            .remove(&mut report)
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(mock.requests().is_empty());
    }
}
