//! # blogskin
//!
//! Builds a Blogger theme (`theme.xml`) from two hand-editable sources: a
//! plain HTML skeleton you can open in a browser, and a style sheet whose
//! comments declare the theme's editable variables.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Extract    style.css  →  variable declarations   (annotations)
//! 2. Tag        declarations →  <b:variable/> tags     (tags)
//! 3. Substitute main.html  →  body with widgets        (fragments)
//! 4. Assemble   all of the above →  theme.xml          (assemble)
//! ```
//!
//! Data flows strictly forward. Stages 1-4 are pure functions over strings;
//! [`pipeline`] adds the two reads and the single write, and only writes once
//! the full document exists.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`annotations`] | Stage 1: parses `/* @variable ... */` comments, with diagnostics for malformed ones |
//! | [`tags`] | Stage 2: renders escaped `<b:variable/>` declaration tags |
//! | [`fragments`] | Stage 3: extracts `<body>` and swaps marker comments for widget sections |
//! | [`assemble`] | Stage 4: fixed theme skeleton, live and administrative skins, output writing |
//! | [`pipeline`] | Orchestration: `build`, `check`, `scan_variables` |
//! | [`config`] | Optional `blogskin.toml` loading, merging, and validation |
//! | [`types`] | Shared [`types::VariableDeclaration`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Markers Over a Template Language
//!
//! The skeleton stays valid, previewable HTML: mock posts sit between
//! `POSTS_LOOP_START`/`POSTS_LOOP_END` comments and get replaced by the real
//! Blog widget at build time. There is no expression syntax to learn and no
//! template engine in the loop.
//!
//! ## Diagnostics Instead of Silence
//!
//! A malformed `@variable` comment never becomes a tag, but it is reported
//! with its line number. `annotations.strict = true` turns those reports into
//! a failed build. Duplicate variable names always fail, since Blogger
//! rejects a theme that declares the same variable twice.
//!
//! ## Verbatim Skin
//!
//! The style sheet is embedded byte for byte inside CDATA. Blogger expands
//! `$(variable)` references itself, so any rewriting here would only get in
//! the way.

pub mod annotations;
pub mod assemble;
pub mod config;
pub mod fragments;
pub mod output;
pub mod pipeline;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
