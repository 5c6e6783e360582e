//! `apply` - reconcile an API against a desired-state document.
//!
//! Loads the declared desired state, runs one reconciliation invocation and
//! prints the result document (changed flag, api id, final state, exchanged
//! token, full call log) as JSON on stdout. When an access token is
//! supplied it is exchanged first and the gateway-issued token authenticates
//! every subsequent call of the same invocation.

use std::fs;

use anyhow::{Context as AnyhowContext, Result};
use apimkit::{Credentials, DesiredApi, Gateway, RunReport};
use colored::Colorize;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::commands::credentials_from;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let credentials = credentials_from(&args.connection)?;
    let mut gateway = Gateway::new(args.connection.url.clone(), credentials);
    let mut report = RunReport::new();

    if let Some(access_token) = args.access_token.as_deref() {
        let resource_id = args
            .auth_resource_id
            .as_deref()
            .context("--auth-resource-id is required when exchanging an access token")?;
        let token = apimkit::auth::exchange_token(&gateway, &mut report, access_token, resource_id)
            .context("token exchange failed")?;
        log::info!("access token exchanged, continuing with gateway token");
        gateway = gateway.with_credentials(Credentials::bearer(token));
    }

    let outcome = match &args.file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading desired state from {}", path.display()))?;
            let desired: DesiredApi = serde_json::from_str(&raw)
                .with_context(|| format!("parsing desired state from {}", path.display()))?;
            apimkit::reconcile(&gateway, desired, &mut report)
        }
        // Exchange-only invocation: the report already carries the token.
        None if args.access_token.is_some() => Ok(()),
        None => anyhow::bail!(
            "nothing to do: supply a desired-state file or an access token to exchange"
        ),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    match outcome {
        Ok(()) => {
            if !ctx.quiet {
                let verdict = if report.changed {
                    "changed".yellow()
                } else {
                    "unchanged".green()
                };
                eprintln!("{} {}", "reconciled:".bold(), verdict);
                if ctx.verbose > 0 {
                    eprintln!("{} calls issued", report.call_count());
                }
            }
            Ok(())
        }
        Err(err) => Err(err).context("reconciliation aborted"),
    }
}
