//! Body extraction and marker substitution.
//!
//! Stage 3 of the theme build. The structural document is plain HTML; only
//! the content between its `<body>` tags is kept. Marker comments inside it
//! are swapped for Blogger widget sections:
//!
//! | Marker | Replaced by |
//! |--------|-------------|
//! | `<!-- POSTS_LOOP_START -->` ... `<!-- POSTS_LOOP_END -->` | Blog widget: post loop, pagination, comments |
//! | `<!-- HEADER_SECTION -->` | Header widget |
//! | `<!-- SIDEBAR_SECTION -->` | Popular posts, labels, archive widgets |
//!
//! The posts marker is a pair: everything between start and end (the static
//! mock-up posts) is dropped. Replacement is done in one left-to-right pass,
//! so inserted fragments are never searched for markers, and a marker missing
//! from the document is simply reported as not found.

use crate::config::FragmentsConfig;
use regex::{Captures, Regex};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

const STOCK_POSTS_LOOP: &str = include_str!("../static/posts_loop.xml");
const STOCK_HEADER: &str = include_str!("../static/header.xml");
const STOCK_SIDEBAR: &str = include_str!("../static/sidebar.xml");

static BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body(?:\s[^>]*)?>").expect("body pattern must compile"));

static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("body pattern must compile"));

static MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)(?P<posts><!--\s*POSTS_LOOP_START\s*-->.*?<!--\s*POSTS_LOOP_END\s*-->)",
        r"|(?P<header><!--\s*HEADER_SECTION\s*-->)",
        r"|(?P<sidebar><!--\s*SIDEBAR_SECTION\s*-->)",
    ))
    .expect("marker pattern must compile")
});

static POSTS_LOOP_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*POSTS_LOOP_START\s*-->").expect("marker pattern must compile")
});

#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("Could not find <body> content in the structural document")]
    MissingBody,
    #[error("Cannot read {marker} fragment {}: {source}", .path.display())]
    Read {
        marker: Marker,
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    PostsLoop,
    Header,
    Sidebar,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Marker::PostsLoop, Marker::Header, Marker::Sidebar];
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Marker::PostsLoop => "posts loop",
            Marker::Header => "header",
            Marker::Sidebar => "sidebar",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Replaced(usize),
    NotFound,
    /// `POSTS_LOOP_START` without a matching `POSTS_LOOP_END`; left untouched.
    Unterminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerReport {
    pub marker: Marker,
    pub status: MarkerStatus,
}

#[derive(Debug, Clone)]
pub struct Substitution {
    pub body: String,
    pub markers: Vec<MarkerReport>,
}

/// Widget markup inserted in place of each marker.
#[derive(Debug, Clone)]
pub struct Fragments {
    pub posts_loop: String,
    pub header: String,
    pub sidebar: String,
}

impl Fragments {
    /// The fragments compiled into the binary.
    pub fn stock() -> Self {
        Self {
            posts_loop: STOCK_POSTS_LOOP.to_string(),
            header: STOCK_HEADER.to_string(),
            sidebar: STOCK_SIDEBAR.to_string(),
        }
    }

    /// Stock fragments, with any configured override read from `root`.
    pub fn load(config: &FragmentsConfig, root: &Path) -> Result<Self, FragmentError> {
        let mut fragments = Self::stock();
        let overrides = [
            (Marker::PostsLoop, &config.posts_loop),
            (Marker::Header, &config.header),
            (Marker::Sidebar, &config.sidebar),
        ];
        for (marker, path) in overrides {
            let Some(path) = path else { continue };
            let path = root.join(path);
            let text = fs::read_to_string(&path).map_err(|source| FragmentError::Read {
                marker,
                path: path.clone(),
                source,
            })?;
            *fragments.get_mut(marker) = text;
        }
        Ok(fragments)
    }

    pub fn get(&self, marker: Marker) -> &str {
        match marker {
            Marker::PostsLoop => &self.posts_loop,
            Marker::Header => &self.header,
            Marker::Sidebar => &self.sidebar,
        }
    }

    fn get_mut(&mut self, marker: Marker) -> &mut String {
        match marker {
            Marker::PostsLoop => &mut self.posts_loop,
            Marker::Header => &mut self.header,
            Marker::Sidebar => &mut self.sidebar,
        }
    }
}

/// Return the trimmed text between the first `<body>` tag and the first
/// `</body>` after it. Tag names match case-insensitively and the opening tag
/// may carry attributes. Nested body tags are not supported.
pub fn extract_body(document: &str) -> Result<&str, FragmentError> {
    let open = BODY_OPEN.find(document).ok_or(FragmentError::MissingBody)?;
    let rest = &document[open.end()..];
    let close = BODY_CLOSE.find(rest).ok_or(FragmentError::MissingBody)?;
    Ok(rest[..close.start()].trim())
}

/// Replace every marker in `body` with its fragment.
pub fn substitute(body: &str, fragments: &Fragments) -> Substitution {
    let replacements = Marker::ALL.map(|marker| {
        format!("\n{}\n", fragments.get(marker).trim_matches(['\n', '\r']))
    });
    let mut counts = [0usize; 3];

    let replaced = MARKERS.replace_all(body, |caps: &Captures<'_>| {
        let marker = if caps.name("posts").is_some() {
            Marker::PostsLoop
        } else if caps.name("header").is_some() {
            Marker::Header
        } else {
            Marker::Sidebar
        };
        counts[marker as usize] += 1;
        replacements[marker as usize].clone()
    });

    let markers = Marker::ALL
        .into_iter()
        .map(|marker| {
            let status = match counts[marker as usize] {
                0 if marker == Marker::PostsLoop && POSTS_LOOP_START.is_match(body) => {
                    MarkerStatus::Unterminated
                }
                0 => MarkerStatus::NotFound,
                n => MarkerStatus::Replaced(n),
            };
            MarkerReport { marker, status }
        })
        .collect();

    Substitution {
        body: replaced.into_owned(),
        markers,
    }
}
