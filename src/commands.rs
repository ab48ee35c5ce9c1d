//! CLI command implementations

use crate::OutputFormat;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use trellis_core::DiscoveryReport;
use trellis_discovery::{DiscoveryConfig, ExclusionRules, TypeCatalog, TypeMetadataProvider};

pub fn discover(
    catalog_path: &Path,
    config_path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let config = DiscoveryConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let catalog = TypeCatalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    tracing::info!(
        "Discovering components of {} in namespace {} ({} types in catalog)",
        config.container,
        config.namespace,
        catalog.len()
    );

    let (mut model, container) = config.build_model()?;
    let mut finder = config.build_finder(Arc::new(catalog), container)?;
    let outcome = finder.find_components(&mut model)?;

    let diagnostics = outcome.diagnostics.iter().map(ToString::to_string).collect();
    let report = DiscoveryReport::from_model(&model, container, &config.namespace, diagnostics);
    let rendered = match format {
        OutputFormat::Text => report.to_text(),
        OutputFormat::Json => report.to_json()?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

pub fn types(catalog_path: &Path, namespace: Option<&str>) -> anyhow::Result<()> {
    let catalog = TypeCatalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let index = catalog.index(namespace.unwrap_or_default(), &ExclusionRules::default());

    for definition in index.all_types() {
        let visibility = definition.visibility.map(|v| v.as_str()).unwrap_or("?");
        let category = definition.category.map(|c| c.as_str()).unwrap_or("class");
        println!("{} ({} {})", definition.name, visibility, category);
    }
    Ok(())
}
