use anyhow::Result;
use clap::Parser;
use icon_generator::app::App;
use icon_generator::models::{Config, SizeSpec};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "icon-generator")]
#[command(about = "Generate square PNG web app icons from a single logo")]
struct CliArgs {
    /// Source image (defaults to ICONGEN_SOURCE or logo.png).
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Directory the icons are written to (defaults to ICONGEN_OUTPUT_DIR or public).
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Icon to generate, repeatable. Replaces the default set.
    #[arg(short, long = "size", value_name = "EDGE=FILENAME", value_parser = parse_size_arg)]
    sizes: Vec<SizeSpec>,

    /// Create the output directory if it does not exist.
    #[arg(long)]
    create_dir: bool,

    /// Print a JSON report on stdout; progress goes to stderr.
    #[arg(long)]
    json: bool,
}

impl CliArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(source) = &self.source {
            config.source_path = source.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if !self.sizes.is_empty() {
            config.sizes = self.sizes.clone();
        }
        if self.create_dir {
            config.create_output_dir = true;
        }
        config
    }
}

fn parse_size_arg(input: &str) -> std::result::Result<SizeSpec, String> {
    input.parse::<SizeSpec>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "icon_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting icon-generator");
    let app = App::new(config);
    info!(
        "Resizing {} into {}",
        app.config().source_path.display(),
        app.config().output_dir.display()
    );

    let result = if args.json {
        app.run_with_output(&mut std::io::stderr()).await
    } else {
        app.run().await
    };

    match result {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            info!("Icon generation completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Icon generation failed: {}", e);
            std::process::exit(1);
        }
    }
}
