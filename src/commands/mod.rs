pub mod apply;
pub mod token;

use anyhow::Result;
use apimkit::Credentials;

use crate::cli::ConnectionArgs;

/// Build the credential strategy from connection flags.
///
/// A gateway token wins over basic-auth flags; exactly one strategy is ever
/// in play.
pub fn credentials_from(connection: &ConnectionArgs) -> Result<Credentials> {
    if let Some(token) = &connection.token {
        return Ok(Credentials::bearer(token.clone()));
    }
    match (&connection.username, &connection.password) {
        (Some(username), Some(password)) => {
            Ok(Credentials::basic(username.clone(), password.clone()))
        }
        _ => anyhow::bail!("supply --token or both --username and --password"),
    }
}
