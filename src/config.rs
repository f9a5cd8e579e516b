//! Configuration file support for ferro-proteoform.
//!
//! This module loads `.ferro.toml` files that tune the browser layout and
//! the grouping of PSM evidence.
//!
//! # Example Configuration
//!
//! ```toml
//! [layout]
//! exon_screen_fraction = 0.75
//! intron_skip_gap = 8
//! peptide_margin = 2
//! exon_colour = "#e0e0e0"
//!
//! [psm]
//! categories = ["liver", "brain"]
//! colours = ["#1b9e77", "#d95f02"]
//! other_colour = "#bdbdbd"
//! highlight = "tissue"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro.toml` in current directory
//! 2. `~/.config/ferro/config.toml`
//!
//! CLI flags take precedence over config file settings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::psm::{Category, CategoryConfig, HighlightVariable};
use crate::splicing::{TrackStyle, DEFAULT_EXON_FRACTION};

/// Residues kept free after a peptide before the next one in its row.
pub const DEFAULT_PEPTIDE_MARGIN: i64 = 2;

/// Parsed configuration from a .ferro.toml file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteoviewConfig {
    pub layout: LayoutConfig,
    pub psm: PsmConfig,
}

/// `[layout]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfig {
    pub exon_screen_fraction: Option<f64>,
    pub intron_skip_gap: Option<f64>,
    pub peptide_margin: Option<i64>,
    pub exon_colour: Option<String>,
    pub coding_colour: Option<String>,
    pub peptide_colour: Option<String>,
}

/// `[psm]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsmConfig {
    pub categories: Vec<String>,
    /// Parallel to `categories`.
    pub colours: Vec<String>,
    pub other_colour: Option<String>,
    pub highlight: Option<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Layout,
    Psm,
    Other,
}

impl ProteoviewConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro.toml` in current directory
    /// 2. `~/.config/ferro/config.toml`
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro.toml");
        let home_config =
            dirs_home().map(|home| home.join(".config").join("ferro").join("config.toml"));

        for path in std::iter::once(cwd_config).chain(home_config) {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Ignoring config file {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Only the flat key/value subset of TOML used by this file is
    /// understood. Unknown sections and keys are ignored.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = ProteoviewConfig::default();
        let mut section = Section::Other;

        for (lineno, line) in content.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match &line[1..line.len() - 1] {
                    "layout" => Section::Layout,
                    "psm" => Section::Psm,
                    _ => Section::Other,
                };
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: expected `key = value`",
                    lineno + 1
                )));
            };
            let (key, value) = (key.trim(), value.trim());
            let at = |msg: String| ConfigError::Parse(format!("line {}: {}", lineno + 1, msg));

            match (section, key) {
                (Section::Layout, "exon_screen_fraction") => {
                    let fraction = parse_number(key, value).map_err(at)?;
                    if !(fraction > 0.0 && fraction <= 1.0) {
                        return Err(at(format!(
                            "exon_screen_fraction must be in (0, 1], got {}",
                            fraction
                        )));
                    }
                    config.layout.exon_screen_fraction = Some(fraction);
                }
                (Section::Layout, "intron_skip_gap") => {
                    config.layout.intron_skip_gap = Some(parse_number(key, value).map_err(at)?);
                }
                (Section::Layout, "peptide_margin") => {
                    let margin = value
                        .parse::<i64>()
                        .map_err(|_| at(format!("peptide_margin must be an integer, got {}", value)))?;
                    config.layout.peptide_margin = Some(margin);
                }
                (Section::Layout, "exon_colour") => {
                    config.layout.exon_colour = Some(unquote(value));
                }
                (Section::Layout, "coding_colour") => {
                    config.layout.coding_colour = Some(unquote(value));
                }
                (Section::Layout, "peptide_colour") => {
                    config.layout.peptide_colour = Some(unquote(value));
                }
                (Section::Psm, "categories") => {
                    config.psm.categories = parse_string_array(value).map_err(at)?;
                }
                (Section::Psm, "colours") => {
                    config.psm.colours = parse_string_array(value).map_err(at)?;
                }
                (Section::Psm, "other_colour") => {
                    config.psm.other_colour = Some(unquote(value));
                }
                (Section::Psm, "highlight") => {
                    let name = unquote(value);
                    if HighlightVariable::from_name(&name).is_none() {
                        return Err(at(format!("unknown highlight variable '{}'", name)));
                    }
                    config.psm.highlight = Some(name);
                }
                _ => log::debug!("Ignoring config key {}", key),
            }
        }

        if !config.psm.colours.is_empty() && config.psm.colours.len() != config.psm.categories.len()
        {
            return Err(ConfigError::Parse(format!(
                "{} PSM categories but {} colours",
                config.psm.categories.len(),
                config.psm.colours.len()
            )));
        }

        Ok(config)
    }

    /// Screen fraction given to exons.
    pub fn exon_fraction(&self) -> f64 {
        self.layout
            .exon_screen_fraction
            .unwrap_or(DEFAULT_EXON_FRACTION)
    }

    pub fn peptide_margin(&self) -> i64 {
        self.layout.peptide_margin.unwrap_or(DEFAULT_PEPTIDE_MARGIN)
    }

    /// Track colours with any configured overrides applied.
    pub fn track_style(&self) -> TrackStyle {
        let mut style = TrackStyle::default();
        let layout = &self.layout;
        if let Some(colour) = &layout.exon_colour {
            style.exon_colour = colour.clone();
        }
        if let Some(colour) = &layout.coding_colour {
            style.coding_colour = colour.clone();
        }
        if let Some(colour) = &layout.peptide_colour {
            style.peptide_colour = colour.clone();
        }
        if let Some(gap) = layout.intron_skip_gap {
            style.skip_gap = gap;
        }
        style
    }

    /// PSM grouping with any configured overrides applied.
    ///
    /// Configured categories without colours keep the default colour of a
    /// default category of the same name, or the "other" colour.
    pub fn category_config(&self) -> CategoryConfig {
        let defaults = CategoryConfig::default();
        let mut config = CategoryConfig::default();
        if let Some(colour) = &self.psm.other_colour {
            config.other_colour = colour.clone();
        }
        if let Some(highlight) = self.psm.highlight.as_deref().and_then(HighlightVariable::from_name)
        {
            config.highlight = highlight;
        }
        if !self.psm.categories.is_empty() {
            config.categories = self
                .psm
                .categories
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let colour = self.psm.colours.get(i).map_or_else(
                        || {
                            defaults
                                .category_index(name)
                                .map_or(config.other_colour.clone(), |idx| {
                                    defaults.categories[idx].colour.clone()
                                })
                        },
                        Clone::clone,
                    );
                    Category::new(name.clone(), colour)
                })
                .collect();
        }
        config
    }

    /// Merge this config with CLI arguments.
    /// CLI arguments take precedence.
    pub fn merge_with_cli(&self, highlight: Option<&str>, fraction: Option<f64>) -> Self {
        let mut merged = self.clone();
        if let Some(name) = highlight {
            merged.psm.highlight = Some(name.to_string());
        }
        if let Some(fraction) = fraction {
            merged.layout.exon_screen_fraction = Some(fraction);
        }
        merged
    }
}

/// Configuration loading error.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String),
    /// Parse error in config file.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Drop a trailing `#` comment that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' | '\'' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').trim_matches('\'').to_string()
}

fn parse_number(key: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("{} must be a number, got {}", key, value))
}

/// Parse a TOML array of strings like `["liver", "brain"]`.
fn parse_string_array(value: &str) -> Result<Vec<String>, String> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(format!("expected an array, got {}", value));
    }

    let inner = &value[1..value.len() - 1];
    Ok(inner
        .split(',')
        .map(unquote)
        .filter(|s| !s.is_empty())
        .collect())
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
