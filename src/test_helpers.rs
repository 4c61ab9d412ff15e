//! Shared test utilities for the blogskin test suite.
//!
//! Provides the fixture project, small in-memory inputs, and extractors for
//! pulling pieces back out of an assembled theme document.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = build(tmp.path(), &ThemeConfig::default()).unwrap();
//! let written = std::fs::read_to_string(&report.output).unwrap();
//! assert_eq!(variable_tags(&written).len(), 5);
//! ```

use std::path::Path;
use tempfile::TempDir;

/// Structural document with all three markers and mock posts.
pub const FULL_HTML: &str = "<!DOCTYPE html>
<html>
<head><title>preview</title></head>
<body>
  <header><!-- HEADER_SECTION --></header>
  <main>
    <!-- POSTS_LOOP_START -->
    <article>mock post</article>
    <!-- POSTS_LOOP_END -->
  </main>
  <aside><!-- SIDEBAR_SECTION --></aside>
</body>
</html>
";

/// Style sheet with three valid annotations.
pub const FULL_CSS: &str = r##"/* @variable name="bgColor" group="colors" type="color" default="#fff" */
/* @variable name="textColor" group="colors" type="color" default="#222" */
/* @variable name="bodyFont" group="fonts" type="font" default="normal 16px sans-serif" */
body { background: $(bgColor); color: $(textColor); font: $(bodyFont); }
"##;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/theme/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/theme");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Document extractors: panic with a clear message on miss
// =========================================================================

/// All `<b:variable/>` tags in document order, trimmed.
pub fn variable_tags(document: &str) -> Vec<&str> {
    document
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("<b:variable "))
        .collect()
}

/// Content of the `<body>` element of an assembled theme.
pub fn body_of(document: &str) -> &str {
    let open = "\n<body>\n";
    let start = document
        .find(open)
        .map(|i| i + open.len())
        .unwrap_or_else(|| panic!("no <body> in document:\n{document}"));
    let end = document
        .rfind("\n</body>")
        .unwrap_or_else(|| panic!("no </body> in document:\n{document}"));
    &document[start..end]
}
