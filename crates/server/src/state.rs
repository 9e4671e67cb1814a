use std::sync::Arc;
use pixup_core::{Config, ImageFormat, Rasterizer};

/// Shared application state
pub struct AppState {
    config: Config,
    rasterizer: Arc<dyn Rasterizer>,
}

impl AppState {
    pub fn new(config: Config, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rasterizer(&self) -> &dyn Rasterizer {
        self.rasterizer.as_ref()
    }

    /// Formats `/convert` can produce.
    pub fn supported_formats(&self) -> Vec<ImageFormat> {
        self.rasterizer.encodable_formats()
    }
}
