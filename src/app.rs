//! Application orchestration for generating a configured set of icons.

use crate::icons::{IconGenerator, IconService};
use crate::models::{Config, GeneratedIcon, RunReport};
use crate::{Error, Result};
use std::fs;
use std::io::Write;
use tracing::info;

/// Runs the icon service over every configured size, in order.
pub struct App {
    icons: Box<dyn IconService>,
    config: Config,
}

impl App {
    /// Build an app backed by the real [`IconGenerator`].
    pub fn new(config: Config) -> Self {
        Self::with_service(Box::new(IconGenerator::new()), config)
    }

    /// Build an app from a concrete service, e.g. a mock in tests.
    pub fn with_service(icons: Box<dyn IconService>, config: Config) -> Self {
        Self { icons, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate all icons, printing progress to stdout.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_with_output(&mut std::io::stdout()).await
    }

    /// Generate all icons, printing progress to `out`.
    ///
    /// The first failure aborts the run. Icons written before it stay on disk.
    pub async fn run_with_output<W: Write + Send>(&self, out: &mut W) -> Result<RunReport> {
        let config = &self.config;
        config.validate()?;

        if config.create_output_dir {
            fs::create_dir_all(&config.output_dir).map_err(|source| Error::Write {
                path: config.output_dir.clone(),
                source,
            })?;
            info!("Ensured output directory: {}", config.output_dir.display());
        }

        info!("Loading source image: {}", config.source_path.display());
        let source = self.icons.load_source(&config.source_path).await?;
        writeln!(
            out,
            "Source image size: {}x{}",
            source.width(),
            source.height()
        )?;

        let mut icons = Vec::with_capacity(config.sizes.len());
        for size in &config.sizes {
            info!("Rendering {} at {}px", size.filename, size.edge);
            let icon = self
                .icons
                .render_icon(&source, size, &config.output_dir)
                .await?;
            writeln!(out, "{}", progress_line(&icon))?;
            icons.push(icon);
        }

        writeln!(
            out,
            "\nDone! Icons generated in {}",
            config.output_dir.display()
        )?;
        info!("Generated {} icons", icons.len());

        Ok(RunReport {
            source_width: source.width(),
            source_height: source.height(),
            icons,
        })
    }
}

pub fn progress_line(icon: &GeneratedIcon) -> String {
    format!(
        "✓ Created {}: {}x{} ({:.1} KB)",
        icon.filename,
        icon.edge,
        icon.edge,
        icon.size_kb()
    )
}
