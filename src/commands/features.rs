use std::io::Write;

use anyhow::Result;
use serde_json::Value;

use crate::config::{Config, Feature};

/// List the capability flags this installation supports.
pub fn features(config: &Config, verbose: bool, out: &mut impl Write) -> Result<()> {
    for feature in config.features() {
        writeln!(out, "{}", format_feature(&feature, verbose))?;
    }
    Ok(())
}

fn format_feature(feature: &Feature, verbose: bool) -> String {
    if !verbose {
        return feature.name.clone();
    }
    let value = match &feature.value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let description = feature.description.as_deref().unwrap_or("");
    format!("{}: {description}: {value}", feature.name)
}
