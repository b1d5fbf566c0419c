use super::ImageSource;
use crate::{target::EvaluationTarget, util::route_slug};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Reads screenshots captured earlier, named `<slug>.png`.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, route: &str) -> PathBuf {
        self.dir.join(format!("{}.png", route_slug(route)))
    }
}

impl ImageSource for DirectorySource {
    fn capture(&self, route: &str) -> Result<EvaluationTarget> {
        let path = self.path_for(route);
        let image = std::fs::read(&path)
            .with_context(|| format!("reading screenshot: {}", path.display()))?;
        Ok(EvaluationTarget::new(route, image))
    }
}
