pub mod command;
pub mod directory;

use crate::{config::Config, pages::PageInventory, target::EvaluationTarget};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::info;

pub use command::CommandSource;
pub use directory::DirectorySource;

/// Supplies one screenshot per route.
pub trait ImageSource {
    fn capture(&self, route: &str) -> Result<EvaluationTarget>;
}

pub fn from_config(cfg: &Config, pages: &PageInventory) -> Result<Box<dyn ImageSource>> {
    match cfg.capture.mode.as_str() {
        "command" => Ok(Box::new(CommandSource::new(cfg, pages.clone())?)),
        "directory" => Ok(Box::new(DirectorySource::new(PathBuf::from(
            &cfg.capture.screenshot_dir,
        )))),
        other => Err(anyhow!("unknown capture.mode: {other}")),
    }
}

/// Captures every route before any evaluation starts. The first failure aborts.
pub fn capture_all(source: &dyn ImageSource, routes: &[String]) -> Result<Vec<EvaluationTarget>> {
    let mut targets = Vec::with_capacity(routes.len());
    for route in routes {
        info!("capturing {route}");
        let target = source
            .capture(route)
            .with_context(|| format!("could not capture {route}"))?;
        if target.image.is_empty() {
            return Err(anyhow!("empty screenshot for {route}"));
        }
        targets.push(target);
    }
    info!("captured {} page(s)", targets.len());
    Ok(targets)
}
