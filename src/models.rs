//! Data models and structures
//!
//! Defines the size specifications, generated icon records, and runtime
//! configuration for the icon generator.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SOURCE: &str = "logo.png";
pub const DEFAULT_OUTPUT_DIR: &str = "public";

/// Largest accepted icon edge, in pixels.
pub const MAX_EDGE: u32 = 16_384;

/// One requested output: a square edge length and the file name to write it to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeSpec {
    pub edge: u32,
    pub filename: String,
}

impl SizeSpec {
    pub fn new(edge: u32, filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();

        check_edge(edge, &filename)?;

        let path = Path::new(&filename);
        let bare_name = path.file_name().and_then(|name| name.to_str());
        if filename.is_empty() || bare_name != Some(filename.as_str()) {
            return Err(Error::InvalidSizeSpec(format!(
                "'{}' must be a plain file name without directories",
                filename
            )));
        }

        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(Error::InvalidSizeSpec(format!(
                "'{}' must have a .png extension",
                filename
            )));
        }

        Ok(Self { edge, filename })
    }

    /// The icons a PWA needs: two manifest sizes and a favicon.
    pub fn defaults() -> Vec<SizeSpec> {
        vec![
            SizeSpec {
                edge: 192,
                filename: "icon-192.png".to_string(),
            },
            SizeSpec {
                edge: 512,
                filename: "icon-512.png".to_string(),
            },
            SizeSpec {
                edge: 48,
                filename: "favicon.png".to_string(),
            },
        ]
    }
}

impl FromStr for SizeSpec {
    type Err = Error;

    /// Parses `EDGE=FILENAME`, e.g. `192=icon-192.png`.
    fn from_str(input: &str) -> Result<Self> {
        let (edge, filename) = input.split_once('=').ok_or_else(|| {
            Error::InvalidSizeSpec(format!(
                "'{}' is not in EDGE=FILENAME form",
                input.trim()
            ))
        })?;

        let edge = edge.trim().parse::<u32>().map_err(|_| {
            Error::InvalidSizeSpec(format!("'{}' is not a valid edge length", edge.trim()))
        })?;

        Self::new(edge, filename.trim())
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.edge, self.filename)
    }
}

/// Parses a comma separated list of `EDGE=FILENAME` entries.
pub fn parse_size_list(input: &str) -> Result<Vec<SizeSpec>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(SizeSpec::from_str)
        .collect()
}

/// A PNG written to disk by the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedIcon {
    pub filename: String,
    pub edge: u32,
    pub path: PathBuf,
    pub bytes: u64,
}

impl GeneratedIcon {
    pub fn size_kb(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Summary of a completed run, printed with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source_width: u32,
    pub source_height: u32,
    pub icons: Vec<GeneratedIcon>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub sizes: Vec<SizeSpec>,
    pub create_output_dir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: SizeSpec::defaults(),
            create_output_dir: false,
        }
    }
}

impl Config {
    pub fn new(source_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_sizes(mut self, sizes: Vec<SizeSpec>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }

    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sizes = match lookup("ICONGEN_SIZES") {
            Some(raw) => parse_size_list(&raw)?,
            None => defaults.sizes,
        };

        let create_output_dir = match lookup("ICONGEN_CREATE_DIR") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("ICONGEN_CREATE_DIR has invalid value '{}'", raw))
            })?,
            None => defaults.create_output_dir,
        };

        Ok(Self {
            source_path: lookup("ICONGEN_SOURCE")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_path),
            output_dir: lookup("ICONGEN_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            sizes,
            create_output_dir,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(Error::Config("at least one icon size is required".to_string()));
        }

        let mut seen = HashSet::new();
        for size in &self.sizes {
            check_edge(size.edge, &size.filename)?;
            // Output names collide on case-insensitive filesystems.
            if !seen.insert(size.filename.to_ascii_lowercase()) {
                return Err(Error::Config(format!(
                    "duplicate output filename '{}'",
                    size.filename
                )));
            }
        }

        Ok(())
    }
}

fn check_edge(edge: u32, filename: &str) -> Result<()> {
    if edge == 0 {
        return Err(Error::InvalidSizeSpec(format!(
            "edge length for '{}' must be positive",
            filename
        )));
    }
    if edge > MAX_EDGE {
        return Err(Error::InvalidSizeSpec(format!(
            "edge length {} for '{}' exceeds the maximum of {}",
            edge, filename, MAX_EDGE
        )));
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_sizes_order() {
        let sizes = SizeSpec::defaults();
        let pairs: Vec<(u32, &str)> = sizes
            .iter()
            .map(|s| (s.edge, s.filename.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![(192, "icon-192.png"), (512, "icon-512.png"), (48, "favicon.png")]
        );
    }

    #[test]
    fn test_parse_size_spec() {
        let spec: SizeSpec = " 256 = icon-256.png ".parse().unwrap();
        assert_eq!(spec, SizeSpec::new(256, "icon-256.png").unwrap());
        assert_eq!(spec.to_string(), "256=icon-256.png");
    }

    #[test]
    fn test_parse_size_spec_rejects_bad_input() {
        assert!("icon.png".parse::<SizeSpec>().is_err());
        assert!("0=icon.png".parse::<SizeSpec>().is_err());
        assert!("-4=icon.png".parse::<SizeSpec>().is_err());
        assert!("abc=icon.png".parse::<SizeSpec>().is_err());
        assert!("48=".parse::<SizeSpec>().is_err());
        assert!("48=icons/favicon.png".parse::<SizeSpec>().is_err());
        assert!("48=../favicon.png".parse::<SizeSpec>().is_err());
        assert!("48=favicon.ico".parse::<SizeSpec>().is_err());
    }

    #[test]
    fn test_size_spec_rejects_oversized_edge() {
        assert!(SizeSpec::new(MAX_EDGE, "huge.png").is_ok());

        let err = "4000000000=x.png".parse::<SizeSpec>().unwrap_err();
        assert!(matches!(err, Error::InvalidSizeSpec(_)));
        assert!(err.to_string().contains("exceeds the maximum"));

        let direct = Config::default().with_sizes(vec![SizeSpec {
            edge: MAX_EDGE + 1,
            filename: "big.png".to_string(),
        }]);
        assert!(matches!(direct.validate(), Err(Error::InvalidSizeSpec(_))));
    }

    #[test]
    fn test_png_extension_is_case_insensitive() {
        assert!(SizeSpec::new(48, "FAVICON.PNG").is_ok());
    }

    #[test]
    fn test_parse_size_list() {
        let sizes = parse_size_list("16=a.png, 32=b.png,,").unwrap();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0].edge, 16);
        assert_eq!(sizes[1].filename, "b.png");

        assert!(parse_size_list("16=a.png,bad").is_err());
    }

    #[test]
    fn test_config_from_vars_defaults() {
        let config = Config::from_vars(lookup_from(&[])).unwrap();

        assert_eq!(config.source_path, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.sizes, SizeSpec::defaults());
        assert!(!config.create_output_dir);
    }

    #[test]
    fn test_config_from_vars_overrides() {
        let config = Config::from_vars(lookup_from(&[
            ("ICONGEN_SOURCE", "brand/logo.png"),
            ("ICONGEN_OUTPUT_DIR", "dist"),
            ("ICONGEN_SIZES", "64=icon-64.png"),
            ("ICONGEN_CREATE_DIR", "true"),
        ]))
        .unwrap();

        assert_eq!(config.source_path, PathBuf::from("brand/logo.png"));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert_eq!(config.sizes, vec![SizeSpec::new(64, "icon-64.png").unwrap()]);
        assert!(config.create_output_dir);
    }

    #[test]
    fn test_config_from_vars_invalid_flag() {
        let result = Config::from_vars(lookup_from(&[("ICONGEN_CREATE_DIR", "maybe")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicates() {
        let empty = Config::new("logo.png", "out").with_sizes(Vec::new());
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let dupes = Config::new("logo.png", "out").with_sizes(vec![
            SizeSpec::new(48, "icon.png").unwrap(),
            SizeSpec::new(96, "icon.png").unwrap(),
        ]);
        assert!(matches!(dupes.validate(), Err(Error::Config(_))));

        let case_dupes = Config::new("logo.png", "out").with_sizes(vec![
            SizeSpec::new(48, "favicon.png").unwrap(),
            SizeSpec::new(96, "FAVICON.PNG").unwrap(),
        ]);
        assert!(matches!(case_dupes.validate(), Err(Error::Config(_))));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_edge_built_directly() {
        let config = Config::default().with_sizes(vec![SizeSpec {
            edge: 0,
            filename: "zero.png".to_string(),
        }]);
        assert!(matches!(config.validate(), Err(Error::InvalidSizeSpec(_))));
    }

    #[test]
    fn test_generated_icon_size_kb() {
        let icon = GeneratedIcon {
            filename: "favicon.png".to_string(),
            edge: 48,
            path: PathBuf::from("out/favicon.png"),
            bytes: 2048,
        };
        assert!((icon.size_kb() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_serialization() {
        let report = RunReport {
            source_width: 1024,
            source_height: 1024,
            icons: vec![GeneratedIcon {
                filename: "favicon.png".to_string(),
                edge: 48,
                path: PathBuf::from("out/favicon.png"),
                bytes: 1500,
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"filename\":\"favicon.png\""));

        let deserialized: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.icons, report.icons);
    }
}
