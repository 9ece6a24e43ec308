use super::{IconService, SourceImage};
use crate::models::{Config, GeneratedIcon, SizeSpec};
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageError, ImageReader};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Renders icons with Lanczos3 resampling and best-compression PNG output.
#[derive(Debug, Default, Clone, Copy)]
pub struct IconGenerator;

impl IconGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Decode the source image, guessing the format from its contents.
    ///
    /// Only square sources are accepted; every output is square and the
    /// generator never crops or letterboxes.
    pub fn decode_source(path: &Path) -> Result<SourceImage> {
        let decode_err = |source: ImageError| Error::Decode {
            path: path.to_path_buf(),
            source,
        };

        let image = ImageReader::open(path)
            .map_err(|e| decode_err(ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;

        if image.width() != image.height() {
            return Err(Error::NonSquareSource {
                width: image.width(),
                height: image.height(),
            });
        }

        debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );

        Ok(SourceImage::new(image))
    }

    /// Resize, encode and write a single icon, overwriting any existing file.
    pub fn render_icon_sync(
        source: &DynamicImage,
        size: &SizeSpec,
        output_dir: &Path,
    ) -> Result<GeneratedIcon> {
        let resized = source.resize_exact(size.edge, size.edge, FilterType::Lanczos3);
        let png = Self::encode_png(&png_compatible(resized), &size.filename)?;

        let path = output_dir.join(&size.filename);
        fs::write(&path, &png).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} ({} bytes)", path.display(), png.len());

        Ok(GeneratedIcon {
            filename: size.filename.clone(),
            edge: size.edge,
            path,
            bytes: png.len() as u64,
        })
    }

    fn encode_png(image: &DynamicImage, filename: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, PngFilter::Adaptive);
        image
            .write_with_encoder(encoder)
            .map_err(|source| Error::Encode {
                filename: filename.to_string(),
                source,
            })?;
        Ok(bytes)
    }
}

// PNG has no floating point sample format.
fn png_compatible(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image,
    }
}

/// Run the whole decode-and-render sequence on the current thread.
///
/// Stops at the first failure; icons written before it are left on disk.
pub fn generate_icons(config: &Config) -> Result<Vec<GeneratedIcon>> {
    config.validate()?;
    let source = IconGenerator::decode_source(&config.source_path)?;

    config
        .sizes
        .iter()
        .map(|size| IconGenerator::render_icon_sync(source.image(), size, &config.output_dir))
        .collect()
}

#[async_trait]
impl IconService for IconGenerator {
    async fn load_source(&self, path: &Path) -> Result<SourceImage> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::decode_source(&path))
            .await
            .map_err(|e| Error::Task(format!("Source decode task join error: {}", e)))?
    }

    async fn render_icon(
        &self,
        source: &SourceImage,
        size: &SizeSpec,
        output_dir: &Path,
    ) -> Result<GeneratedIcon> {
        tokio::task::spawn_blocking({
            let image = source.shared();
            let size = size.clone();
            let output_dir = output_dir.to_path_buf();
            move || Self::render_icon_sync(&image, &size, &output_dir)
        })
        .await
        .map_err(|e| Error::Task(format!("Icon render task join error: {}", e)))?
    }
}
