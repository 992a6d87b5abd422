use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::{
    analysis::resolver,
    core::{
        config::ResolverConfig,
        errors::{AppError, AppResult},
        types::ProcessedDocument,
    },
};

/// Reads a saved analysis result from `path`, or from stdin when no path is
/// given.
pub fn load_analysis(path: Option<&Path>) -> AppResult<Value> {
    let raw = match path {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::Io(format!("file {} not found", path.display())));
            }
            std::fs::read_to_string(path)
                .map_err(|err| AppError::Io(format!("cannot read {}: {err}", path.display())))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn resolve_document(input: &Value, config: &ResolverConfig) -> AppResult<ProcessedDocument> {
    let processed = resolver::resolve(input, config)?;
    info!(
        records = processed.record_count(),
        tables_enabled = config.tables_enabled,
        "analysis result resolved"
    );
    Ok(processed)
}

pub fn render(processed: &ProcessedDocument, pretty: bool) -> AppResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(processed)
    } else {
        serde_json::to_string(processed)
    };
    rendered.map_err(|err| AppError::Serialization(format!("cannot render output: {err}")))
}

/// Load, resolve and render in one step.
pub fn run(path: Option<&Path>, config: &ResolverConfig, pretty: bool) -> AppResult<String> {
    let input = load_analysis(path)?;
    let processed = resolve_document(&input, config)?;
    render(&processed, pretty)
}
