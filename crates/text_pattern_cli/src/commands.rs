//! Command handlers for the text-pattern CLI.
//!
//! Handlers return their output instead of printing it so `main` decides how
//! results reach the terminal.

use std::collections::HashMap;

use clap::Args;
use reserved_values::ReservedValueStore;
use text_pattern::{parse, OwnerId, TextPatternService};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Arguments for `text-pattern resolve`
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// The template, e.g. "ORG_UNIT_CODE(...)-SEQUENTIAL(####)"
    pub template: String,

    /// Owner the generated values are reserved for
    #[arg(long)]
    pub owner: String,

    /// Supplied segment values as RAW_SEGMENT=VALUE
    #[arg(short = 'v', long = "value", value_parser = parse_key_val)]
    pub values: Vec<(String, String)>,
}

/// Arguments for `text-pattern validate`
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// The template to validate against
    pub template: String,

    /// The text to check
    pub text: String,
}

/// Arguments for `text-pattern inspect`
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// The template to inspect
    pub template: String,
}

/// Splits `RAW_SEGMENT=VALUE`, preferring the `=` that closes a method segment.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find(")=")
        .map(|p| p + 1)
        .or_else(|| s.find('='))
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Resolves a template, reserving generated values in the configured store.
pub async fn resolve(args: &ResolveArgs, config: &AppConfig) -> Result<String, Error> {
    let owner = OwnerId::new(args.owner.as_str())
        .map_err(|e| Error::InvalidArguments(e.to_string()))?;
    let pattern = parse(&args.template)?.with_owner(owner);
    let values: HashMap<String, String> = args.values.iter().cloned().collect();

    let (store, task) = ReservedValueStore::spawn(config.reservation.clone()).await?;
    let service = TextPatternService::new(store);

    let resolved = service.resolve_pattern(&pattern, &values).await;

    // Let the store task drain before the runtime shuts down.
    drop(service);
    if let Err(e) = task.await {
        warn!(error = %e, "Reserved value store task did not finish cleanly");
    }

    let resolved = resolved?;
    info!(template = %pattern, "Resolved text pattern");
    Ok(resolved)
}

/// Checks whether `text` could have been produced by the template.
pub fn validate(args: &ValidateArgs) -> Result<bool, Error> {
    let pattern = parse(&args.template)?;
    Ok(text_pattern::validate_text_pattern_value(&pattern, &args.text))
}

/// Lists the required and optional segments of a template as JSON.
pub fn inspect(args: &InspectArgs) -> Result<String, Error> {
    let pattern = parse(&args.template)?;
    serde_json::to_string_pretty(&pattern.required_values())
        .map_err(|e| Error::Output(e.to_string()))
}
