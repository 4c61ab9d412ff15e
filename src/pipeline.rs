//! Build orchestration.
//!
//! Reads the two inputs, runs the four stages, and writes the theme:
//!
//! ```text
//! style.css ──► annotations::extract ──► tags::render_variable_tags ──┐
//!     │                                                               ├─► assemble ──► theme.xml
//!     └──────────────────────── (verbatim live skin) ─────────────────┤
//! main.html ──► fragments::extract_body ──► fragments::substitute ────┘
//! ```
//!
//! [`render_theme`] is the pure core over in-memory strings. [`build`] and
//! [`check`] add the file I/O; nothing is written until the whole document
//! has been assembled, so a failed build leaves the output untouched.

use crate::annotations::{self, AnnotationError, Extraction};
use crate::assemble::{self, ADMIN_SKIN, Assembly};
use crate::config::ThemeConfig;
use crate::fragments::{self, FragmentError, Fragments, MarkerReport};
use crate::tags;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Missing input file {}: {source}", .path.display())]
    MissingInput { path: PathBuf, source: io::Error },
    #[error("{0}")]
    Annotation(#[from] AnnotationError),
    #[error("{0}")]
    Fragment(#[from] FragmentError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// An assembled theme, before it is written anywhere.
#[derive(Debug)]
pub struct Theme {
    pub document: String,
    pub extraction: Extraction,
    pub markers: Vec<MarkerReport>,
}

/// What a build or check produced.
#[derive(Debug)]
pub struct BuildReport {
    pub output: PathBuf,
    pub extraction: Extraction,
    pub markers: Vec<MarkerReport>,
    pub bytes: usize,
    /// `false` for [`check`], which never touches the output.
    pub written: bool,
}

/// Run all four stages over in-memory inputs.
pub fn render_theme(
    html: &str,
    css: &str,
    widgets: &Fragments,
    config: &ThemeConfig,
) -> Result<Theme, BuildError> {
    let extraction = annotations::extract(css);
    if config.annotations.strict {
        extraction.ensure_none_skipped()?;
    }
    extraction.ensure_unique_names()?;
    let variable_tags = tags::render_variable_tags(&extraction.variables);

    let body = fragments::extract_body(html)?;
    let substitution = fragments::substitute(body, widgets);

    let document = assemble::assemble(&Assembly {
        variable_tags: &variable_tags,
        style: css,
        admin_skin: config.layout.admin_skin.then_some(ADMIN_SKIN),
        body: &substitution.body,
    });

    Ok(Theme {
        document,
        extraction,
        markers: substitution.markers,
    })
}

/// Build the theme under `root` and write it to the configured output path.
pub fn build(root: &Path, config: &ThemeConfig) -> Result<BuildReport, BuildError> {
    run(root, config, true)
}

/// Run the full pipeline without writing the output.
pub fn check(root: &Path, config: &ThemeConfig) -> Result<BuildReport, BuildError> {
    run(root, config, false)
}

/// Extract the variable declarations from the configured style sheet.
pub fn scan_variables(root: &Path, config: &ThemeConfig) -> Result<Extraction, BuildError> {
    let css = read_input(&config.paths.css_path(root))?;
    Ok(annotations::extract(&css))
}

fn run(root: &Path, config: &ThemeConfig, write: bool) -> Result<BuildReport, BuildError> {
    let html = read_input(&config.paths.html_path(root))?;
    let css = read_input(&config.paths.css_path(root))?;
    let widgets = Fragments::load(&config.fragments, root)?;

    let theme = render_theme(&html, &css, &widgets, config)?;

    let output = config.paths.output_path(root);
    if write {
        assemble::write_document(&output, &theme.document)?;
    }

    Ok(BuildReport {
        output,
        bytes: theme.document.len(),
        extraction: theme.extraction,
        markers: theme.markers,
        written: write,
    })
}

fn read_input(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::MissingInput {
        path: path.to_path_buf(),
        source,
    })
}
