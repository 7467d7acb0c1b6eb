//! config command - Show the effective configuration

use anyhow::Result;
use serde_json::json;

use super::Context;

/// Print effective configuration values, defaults included.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let source = config
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let format = if ctx.json { "json" } else { "text" };

    if ctx.json {
        let values = json!({
            "source": source,
            "query.order": config.order().as_str(),
            "query.topology": config.topology().as_str(),
            "output.format": format,
        });
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        println!("# Configuration from {source}");
        println!("query.order = {}", config.order());
        println!("query.topology = {}", config.topology());
        println!("output.format = {format}");
    }
    Ok(())
}
