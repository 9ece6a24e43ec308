use super::{IconService, SourceImage};
use crate::models::{GeneratedIcon, SizeSpec};
use crate::{Error, Result};
use async_trait::async_trait;
use image::DynamicImage;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Shares its call log across clones, so a test can keep a handle after
/// boxing a copy into an [`App`](crate::app::App).
#[derive(Clone)]
pub struct MockIconGenerator {
    rendered: Arc<Mutex<Vec<String>>>,
    source_edge: u32,
    fail_load: Arc<Mutex<bool>>,
    fail_on: Arc<Mutex<Option<String>>>,
}

impl MockIconGenerator {
    pub fn new() -> Self {
        Self {
            rendered: Arc::new(Mutex::new(Vec::new())),
            source_edge: 1024,
            fail_load: Arc::new(Mutex::new(false)),
            fail_on: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_source_edge(mut self, edge: u32) -> Self {
        self.source_edge = edge;
        self
    }

    pub fn with_load_failure(self, should_fail: bool) -> Self {
        *self.fail_load.lock().unwrap() = should_fail;
        self
    }

    /// Fail with a write error when asked to render `filename`.
    pub fn with_write_failure(self, filename: &str) -> Self {
        *self.fail_on.lock().unwrap() = Some(filename.to_string());
        self
    }

    pub fn get_rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl Default for MockIconGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IconService for MockIconGenerator {
    async fn load_source(&self, path: &Path) -> Result<SourceImage> {
        if *self.fail_load.lock().unwrap() {
            return Err(Error::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::other("Mock failure")),
            });
        }

        Ok(SourceImage::new(DynamicImage::new_rgba8(
            self.source_edge,
            self.source_edge,
        )))
    }

    async fn render_icon(
        &self,
        _source: &SourceImage,
        size: &SizeSpec,
        output_dir: &Path,
    ) -> Result<GeneratedIcon> {
        let path = output_dir.join(&size.filename);

        let fail_on = self.fail_on.lock().unwrap().clone();
        if fail_on.as_deref() == Some(size.filename.as_str()) {
            return Err(Error::Write {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "Mock failure",
                ),
            });
        }

        self.rendered.lock().unwrap().push(size.filename.clone());

        Ok(GeneratedIcon {
            filename: size.filename.clone(),
            edge: size.edge,
            path,
            bytes: u64::from(size.edge) * 10,
        })
    }
}
