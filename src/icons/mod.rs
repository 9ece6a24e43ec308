//! Icon rendering
//!
//! Decodes a square source image once and renders resized PNG copies of it,
//! one per configured [`SizeSpec`].

pub mod generator;
pub mod mock;

pub use generator::{generate_icons, IconGenerator};
pub use mock::MockIconGenerator;

use crate::models::{GeneratedIcon, SizeSpec};
use crate::Result;
use async_trait::async_trait;
use image::{ColorType, DynamicImage};
use std::path::Path;
use std::sync::Arc;

/// A decoded source raster, shared read-only across render calls.
#[derive(Clone, Debug)]
pub struct SourceImage {
    image: Arc<DynamicImage>,
}

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    fn shared(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.image)
    }
}

#[async_trait]
pub trait IconService: Send + Sync {
    async fn load_source(&self, path: &Path) -> Result<SourceImage>;
    async fn render_icon(
        &self,
        source: &SourceImage,
        size: &SizeSpec,
        output_dir: &Path,
    ) -> Result<GeneratedIcon>;
}
