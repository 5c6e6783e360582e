//! Group search with name filtering.

use crate::client::{API_PATH, Gateway};
use crate::error::{Error, Result};
use crate::report::RunReport;
use crate::transport::Method;
use crate::types::GroupRecord;

/// Fetch the configured groups, optionally filtered by name.
///
/// The filter keeps groups whose name contains (case-sensitive substring)
/// any of the filter terms; with no filter the full list is returned
/// unmodified. Substring any-of matching is the contract, not exact
/// equality.
pub fn search(
    gateway: &Gateway,
    report: &mut RunReport,
    name_filter: Option<&[String]>,
) -> Result<Vec<GroupRecord>> {
    let endpoint = format!("{API_PATH}/configuration/groups");
    let record = gateway.request(report, Method::Get, &endpoint, None)?;

    let body = record
        .response_body
        .ok_or_else(|| Error::invalid_response("group search returned no body"))?;
    let mut groups: Vec<GroupRecord> = serde_json::from_value(body)
        .map_err(|e| Error::invalid_response(format!("group search: {e}")))?;

    if let Some(terms) = name_filter {
        groups.retain(|group| terms.iter().any(|term| group.name.contains(term.as_str())));
    }
    Ok(groups)
}
