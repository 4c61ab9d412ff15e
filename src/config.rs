//! Project configuration module.
//!
//! Handles loading, validating, and merging `blogskin.toml`. The file is
//! optional: stock defaults reproduce the conventional project layout, and a
//! user file only needs the keys it wants to change.
//!
//! ## Project Layout
//!
//! ```text
//! my-theme/
//! ├── blogskin.toml            # Optional config (this module)
//! ├── src/
//! │   ├── html/main.html       # Structural skeleton with markers
//! │   └── css/style.css        # Style sheet with @variable annotations
//! └── dist/
//!     └── theme.xml            # Generated theme
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! html = "src/html/main.html"
//! css = "src/css/style.css"
//! output = "dist/theme.xml"
//!
//! [annotations]
//! strict = false            # Fail when an @variable comment is malformed
//!
//! [layout]
//! admin_skin = true         # Emit the <b:template-skin> block
//!
//! [fragments]
//! # posts_loop = "src/widgets/posts.xml"
//! # header = "src/widgets/header.xml"
//! # sidebar = "src/widgets/sidebar.xml"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = "blogskin.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `blogskin.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Input and output locations, relative to the project root.
    pub paths: PathsConfig,
    /// Annotation parsing behaviour.
    pub annotations: AnnotationsConfig,
    /// Output document layout switches.
    pub layout: LayoutConfig,
    /// Replacement files for the built-in widget fragments.
    pub fragments: FragmentsConfig,
}

impl ThemeConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = &self.paths;
        for (key, value) in [
            ("paths.html", &paths.html),
            ("paths.css", &paths.css),
            ("paths.output", &paths.output),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if paths.output == paths.html || paths.output == paths.css {
            return Err(ConfigError::Validation(
                "paths.output must not overwrite an input file".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Structural skeleton document.
    pub html: String,
    /// Style sheet with `@variable` annotations.
    pub css: String,
    /// Generated theme document.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            html: "src/html/main.html".to_string(),
            css: "src/css/style.css".to_string(),
            output: "dist/theme.xml".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn html_path(&self, root: &Path) -> PathBuf {
        root.join(&self.html)
    }

    pub fn css_path(&self, root: &Path) -> PathBuf {
        root.join(&self.css)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationsConfig {
    /// Treat any malformed `@variable` comment as a build error.
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Emit the administrative `<b:template-skin>` block used by the layout editor.
    pub admin_skin: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { admin_skin: true }
    }
}

/// Optional fragment overrides. `None` keeps the built-in fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_loop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ThemeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `blogskin.toml` from the project root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ThemeConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ThemeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the project config from `root`, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<ThemeConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `blogskin.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blogskin configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the project
# root (the directory holding this file).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Inputs and output
# ---------------------------------------------------------------------------
[paths]
# Structural skeleton. Only the content of <body> is used; marker comments
# (POSTS_LOOP_START/END, HEADER_SECTION, SIDEBAR_SECTION) are replaced by
# Blogger widget sections.
html = "src/html/main.html"

# Style sheet. Embedded verbatim as the theme skin; comments like
#   /* @variable name="bgColor" group="colors" type="color" default="#fff" */
# become <b:variable> declarations.
css = "src/css/style.css"

# Generated theme. Parent directories are created as needed.
output = "dist/theme.xml"

# ---------------------------------------------------------------------------
# Annotations
# ---------------------------------------------------------------------------
[annotations]
# Fail the build when an @variable comment cannot be parsed, instead of
# warning and skipping it.
strict = false

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Emit the <b:template-skin> block styling the Blogger layout editor.
admin_skin = true

# ---------------------------------------------------------------------------
# Fragments
# ---------------------------------------------------------------------------
[fragments]
# Replace a built-in widget section with the contents of a file.
# posts_loop = "src/widgets/posts.xml"
# header = "src/widgets/header.xml"
# sidebar = "src/widgets/sidebar.xml"
"##
}
