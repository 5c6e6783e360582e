//! `token` - exchange-only invocation.
//!
//! Exchanges an external OAuth2 access token for a gateway token and prints
//! it, for reuse by later `apply` runs (`--token` / `GRAVITEE_TOKEN`).

use anyhow::{Context as AnyhowContext, Result};
use apimkit::{Gateway, RunReport};

use crate::Context;
use crate::cli::TokenArgs;
use crate::commands::credentials_from;

pub fn run(_ctx: &Context, args: TokenArgs) -> Result<()> {
    let credentials = credentials_from(&args.connection)?;
    let gateway = Gateway::new(args.connection.url.clone(), credentials);
    let mut report = RunReport::new();

    let token = apimkit::auth::exchange_token(
        &gateway,
        &mut report,
        &args.access_token,
        &args.auth_resource_id,
    )
    .context("token exchange failed")?;

    println!("{token}");
    Ok(())
}
