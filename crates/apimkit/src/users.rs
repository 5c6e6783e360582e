//! User search.

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::report::RunReport;
use crate::transport::Method;
use crate::types::UserRecord;

/// Search users matching a free-text filter. Pure query.
pub fn search(
    gateway: &Gateway,
    report: &mut RunReport,
    filter: &str,
) -> Result<Vec<UserRecord>> {
    let endpoint = format!("{API_PATH}/search/users/?q={filter}");
    let record = gateway.request(report, Method::Get, &endpoint, None)?;

    let body = record
        .response_body
        .ok_or_else(|| Error::invalid_response("user search returned no body"))?;
    serde_json::from_value(body)
        .map_err(|e| Error::invalid_response(format!("user search: {e}")))
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
    fn test_search_url_and_decoding() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        mock.enqueue_json(
            200,
            &json!([{
                "reference": "ZXlKamRIa2lPaUpLVjFRaUxDSmxibU",
                "firstname": "admin",
                "lastname": "admin",
                "displayName": "admin"
            }]),
        );

        let users = search(&gateway, &mut report, "ad").unwrap();

        assert_eq!(
            mock.calls(),
            vec![(
                Method::Get,
                "https://manage.example.com/management/search/users/?q=ad".to_string()
            )]
        );
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].reference, "ZXlKamRIa2lPaUpLVjFRaUxDSmxibU");
    }

    #[test]
    fn test_search_empty_result() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        mock.enqueue_json(200, &json!([]));
        let users = search(&gateway, &mut report, "nobody").unwrap();
        assert!(users.is_empty());
    }
}
