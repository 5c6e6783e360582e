//! OAuth2 token exchange.
//!
//! An access token delivered by an external auth server can be exchanged
//! for a gateway-issued token; the exchanged token is recorded into the
//! invocation report and reused for every subsequent call of the same
//! invocation.

use serde_json::Value;

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::report::RunReport;
use crate::transport::Method;

/// Exchange an external access token for a gateway token.
///
/// POSTs to the exchange endpoint of the given auth resource, extracts the
/// `token` field from the response, records it into the report and returns
/// it. A response without a `token` field is an invalid response.
pub fn exchange_token(
    gateway: &Gateway,
    report: &mut RunReport,
    access_token: &str,
    auth_resource_id: &str,
) -> Result<String> {
    let endpoint =
        format!("{API_PATH}/auth/oauth2/{auth_resource_id}/exchange?token={access_token}");
    let record = gateway.request(report, Method::Post, &endpoint, None)?;

    let token = record
        .response_body
        .as_ref()
        .and_then(|body| body.get("token"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_response("token exchange response carries no token field"))?
        .to_string();

    report.token = token.clone();
    Ok(token)
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
    fn test_exchange_records_token() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        mock.enqueue_json(200, &json!({ "token": "gateway-jwt" }));

        let token =
            exchange_token(&gateway, &mut report, "external-access", "resource-1").unwrap();

        assert_eq!(token, "gateway-jwt");
        assert_eq!(report.token, "gateway-jwt");
        assert_eq!(
            mock.calls(),
            vec![(
                Method::Post,
                "https://manage.example.com/management/auth/oauth2/resource-1/exchange?token=external-access"
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_exchange_without_token_field_fails() {
        let (gateway, mock) = mock_gateway();
        let mut report = RunReport::new();
        mock.enqueue_json(200, &json!({ "unexpected": true }));

        let err =
            exchange_token(&gateway, &mut report, "external-access", "resource-1").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
        assert!(report.token.is_empty());
    }
}
