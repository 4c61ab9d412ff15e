//! Variable annotation extraction.
//!
//! Stage 1 of the theme build. Scans the style sheet for comments of the form
//!
//! ```css
//! /* @variable name="bgColor" group="colors" type="color" default="#fff" */
//! ```
//!
//! and turns each into a [`VariableDeclaration`]. Declarations keep their
//! source order, which is the order the theme designer groups them in.
//!
//! ## Grammar
//!
//! - An annotation opens with `/*`, optional whitespace, and the `@variable`
//!   token followed by whitespace. The scan looks for that opener directly,
//!   so `/*` inside a string or `url()` elsewhere in the sheet is irrelevant.
//! - Exactly four attributes follow, in this order: `name`, `group`, `type`,
//!   `default`. Attributes are separated by whitespace.
//! - Values are double-quoted, non-empty, and cannot contain `"`. Anything
//!   else is kept verbatim, `*/` included.
//! - The annotation closes at the first `*/` after the last attribute.
//!
//! ## Diagnostics
//!
//! An `@variable` comment that does not follow the grammar produces no
//! declaration. It is recorded as a [`SkippedAnnotation`] with its line and a
//! [`SkipReason`], so the CLI can warn about it (or fail, in strict mode).

use crate::types::VariableDeclaration;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

const CLOSE: &str = "*/";

/// Attribute names in the only accepted order.
pub const ATTRIBUTES: [&str; 4] = ["name", "group", "type", "default"];

static OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\s*@variable").expect("opener pattern must compile"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z_][A-Za-z0-9_-]*)="([^"]*)""#).expect("attribute pattern must compile")
});

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error(
        "Duplicate variable '{name}' on line {line} (first declared on line {first_line})"
    )]
    DuplicateName {
        name: String,
        first_line: usize,
        line: usize,
    },
    #[error("{count} malformed @variable annotation(s); strict mode is enabled")]
    Strict { count: usize },
}

/// Why an `@variable` comment produced no declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingAttribute(&'static str),
    UnknownAttribute(String),
    /// All four attributes are present but not in `name group type default` order.
    OutOfOrder(Vec<String>),
    EmptyValue(&'static str),
    /// Unquoted value, unterminated quote, or stray text. Holds the offending text.
    Malformed(String),
    /// No `*/` before the end of the style sheet.
    Unterminated,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingAttribute(attr) => write!(f, "missing attribute `{attr}`"),
            SkipReason::UnknownAttribute(attr) => write!(f, "unknown attribute `{attr}`"),
            SkipReason::OutOfOrder(found) => write!(
                f,
                "attributes out of order: found {}, expected {}",
                found.join(" "),
                ATTRIBUTES.join(" ")
            ),
            SkipReason::EmptyValue(attr) => write!(f, "attribute `{attr}` is empty"),
            SkipReason::Malformed(near) => write!(f, "malformed attribute near `{near}`"),
            SkipReason::Unterminated => write!(f, "annotation is never closed with `*/`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAnnotation {
    pub line: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of scanning a style sheet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub variables: Vec<VariableDeclaration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedAnnotation>,
}

impl Extraction {
    /// Fail on the first variable name declared twice.
    pub fn ensure_unique_names(&self) -> Result<(), AnnotationError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for var in &self.variables {
            if let Some(&first_line) = seen.get(var.name.as_str()) {
                return Err(AnnotationError::DuplicateName {
                    name: var.name.clone(),
                    first_line,
                    line: var.line,
                });
            }
            seen.insert(&var.name, var.line);
        }
        Ok(())
    }

    /// Fail if any annotation was skipped. Used in strict mode.
    pub fn ensure_none_skipped(&self) -> Result<(), AnnotationError> {
        if self.skipped.is_empty() {
            Ok(())
        } else {
            Err(AnnotationError::Strict {
                count: self.skipped.len(),
            })
        }
    }
}

/// Extract all variable annotations from style-sheet text.
pub fn extract(css: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let mut line = 1;
    let mut counted_to = 0;
    let mut pos = 0;

    while let Some(opener) = OPENER.find_at(css, pos) {
        let body = &css[opener.end()..];
        if !opens_annotation(body) {
            // `@variables`, `@variable-x`: an ordinary comment.
            pos = opener.end();
            continue;
        }

        line += css[counted_to..opener.start()]
            .bytes()
            .filter(|b| *b == b'\n')
            .count();
        counted_to = opener.start();

        let consumed = match parse_attributes(body) {
            Ok((attrs, end)) => {
                match declaration(&attrs) {
                    Ok(mut var) => {
                        var.line = line;
                        extraction.variables.push(var);
                    }
                    Err(reason) => extraction.skipped.push(SkippedAnnotation { line, reason }),
                }
                end
            }
            Err((reason, resume)) => {
                extraction.skipped.push(SkippedAnnotation { line, reason });
                resume
            }
        };
        pos = opener.end() + consumed;
    }

    extraction
}

/// The `@variable` token must end at whitespace, `*/`, or the end of input.
fn opens_annotation(rest: &str) -> bool {
    rest.is_empty()
        || rest.starts_with(CLOSE)
        || rest.chars().next().is_some_and(char::is_whitespace)
}

fn declaration(attrs: &[(&str, &str)]) -> Result<VariableDeclaration, SkipReason> {
    for expected in ATTRIBUTES {
        if !attrs.iter().any(|(key, _)| *key == expected) {
            return Err(SkipReason::MissingAttribute(expected));
        }
    }
    if let Some((key, _)) = attrs.iter().find(|(key, _)| !ATTRIBUTES.contains(key)) {
        return Err(SkipReason::UnknownAttribute(key.to_string()));
    }
    let keys: Vec<&str> = attrs.iter().map(|(key, _)| *key).collect();
    if keys != ATTRIBUTES {
        return Err(SkipReason::OutOfOrder(
            keys.into_iter().map(String::from).collect(),
        ));
    }
    for (attr, (_, value)) in ATTRIBUTES.iter().zip(attrs) {
        if value.is_empty() {
            return Err(SkipReason::EmptyValue(*attr));
        }
    }

    let [name, group, kind, default] = [attrs[0].1, attrs[1].1, attrs[2].1, attrs[3].1];
    Ok(VariableDeclaration::new(name, group, kind, default))
}

/// Read whitespace-separated `key="value"` pairs up to the closing `*/`.
///
/// On success returns the pairs and the offset just past `*/`. On failure
/// returns the reason and the offset to resume scanning from.
fn parse_attributes(body: &str) -> Result<(Vec<(&str, &str)>, usize), (SkipReason, usize)> {
    let mut attrs = Vec::new();
    let mut offset = 0;
    loop {
        let rest = &body[offset..];
        let trimmed = rest.trim_start();
        let at = offset + (rest.len() - trimmed.len());

        if trimmed.starts_with(CLOSE) {
            return Ok((attrs, at + CLOSE.len()));
        }
        let Some(caps) = ATTRIBUTE
            .captures(trimmed)
            .filter(|_| attrs.is_empty() || at > offset)
        else {
            return Err(match trimmed.find(CLOSE) {
                Some(idx) => (
                    SkipReason::Malformed(snippet(trimmed)),
                    at + idx + CLOSE.len(),
                ),
                None => (SkipReason::Unterminated, body.len()),
            });
        };
        let (matched, [key, value]) = caps.extract();
        attrs.push((key, value));
        offset = at + matched.len();
    }
}

fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim_end();
    match line.char_indices().nth(24) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(extraction: &Extraction) -> Vec<&str> {
        extraction
            .variables
            .iter()
            .map(|v| v.name.as_str())
            .collect()
    }

    #[test]
    fn extracts_single_annotation() {
        let css = r##"/* @variable name="bgColor" group="colors" type="color" default="#fff" */"##;
        let extraction = extract(css);
        assert_eq!(extraction.variables.len(), 1);
        let var = &extraction.variables[0];
        assert_eq!(var.name, "bgColor");
        assert_eq!(var.group, "colors");
        assert_eq!(var.kind, "color");
        assert_eq!(var.default, "#fff");
        assert_eq!(var.line, 1);
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn keeps_source_order() {
        let css = r##"
/* @variable name="zeta" group="g" type="color" default="#000" */
body { color: red; }
/* @variable name="alpha" group="g" type="color" default="#111" */
/* @variable name="mid" group="g" type="font" default="normal 16px Arial" */
"##;
        let extraction = extract(css);
        assert_eq!(names(&extraction), vec!["zeta", "alpha", "mid"]);
        let lines: Vec<usize> = extraction.variables.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn values_are_preserved_verbatim() {
        let css = r#"/* @variable name="títle.font" group="Typo · graphy" type="font" default="normal 400 1rem 'Noto Sans', sans-serif; /* x" */"#;
        let extraction = extract(css);
        assert_eq!(extraction.variables.len(), 1);
        let var = &extraction.variables[0];
        assert_eq!(var.name, "títle.font");
        assert_eq!(var.group, "Typo · graphy");
        assert_eq!(var.default, "normal 400 1rem 'Noto Sans', sans-serif; /* x");
    }

    #[test]
    fn comment_opener_inside_string_does_not_hide_annotation() {
        let css = "a::before { content: \"/*\"; }\n\
                   b { background: url(/*.png); }\n\
                   /* @variable name=\"bg\" group=\"g\" type=\"color\" default=\"#fff\" */\n";
        let extraction = extract(css);
        assert_eq!(names(&extraction), vec!["bg"]);
        assert_eq!(extraction.variables[0].line, 3);
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn value_may_contain_comment_close() {
        let css = r#"/* @variable name="x" group="g" type="t" default="a*/b" */
/* @variable name="y" group="g" type="t" default="c" */"#;
        let extraction = extract(css);
        assert_eq!(names(&extraction), vec!["x", "y"]);
        assert_eq!(extraction.variables[0].default, "a*/b");
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn close_may_follow_last_value_directly() {
        let extraction = extract(r#"/*@variable name="x" group="g" type="t" default="d"*/"#);
        assert_eq!(names(&extraction), vec!["x"]);
    }

    #[test]
    fn unterminated_annotation_is_reported() {
        let css = "a {}\n/* @variable name=\"x\" group=\"g\" type=\"t\" default=\"d\"\nb {}";
        let extraction = extract(css);
        assert!(extraction.variables.is_empty());
        assert_eq!(
            extraction.skipped,
            vec![SkippedAnnotation {
                line: 2,
                reason: SkipReason::Unterminated,
            }]
        );
    }

    #[test]
    fn multiline_annotation_is_accepted() {
        let css = "/*\n  @variable\n  name=\"gap\"\n  group=\"layout\"\n  type=\"length\"\n  default=\"1rem\"\n*/";
        let extraction = extract(css);
        assert_eq!(names(&extraction), vec!["gap"]);
    }

    #[test]
    fn ordinary_comments_are_ignored() {
        let css = "/* layout */\n/* @variables are documented below */\n/*@variablex*/";
        let extraction = extract(css);
        assert!(extraction.variables.is_empty());
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn missing_attribute_is_skipped_with_reason() {
        let css = "a {}\n/* @variable name=\"x\" group=\"g\" type=\"color\" */";
        let extraction = extract(css);
        assert!(extraction.variables.is_empty());
        assert_eq!(
            extraction.skipped,
            vec![SkippedAnnotation {
                line: 2,
                reason: SkipReason::MissingAttribute("default"),
            }]
        );
    }

    #[test]
    fn out_of_order_attributes_are_skipped() {
        let css = r##"/* @variable group="g" name="x" type="color" default="#fff" */"##;
        let extraction = extract(css);
        assert!(extraction.variables.is_empty());
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::OutOfOrder(vec![
                "group".into(),
                "name".into(),
                "type".into(),
                "default".into()
            ])
        );
    }

    #[test]
    fn unknown_attribute_is_skipped() {
        let css = r##"/* @variable name="x" group="g" type="color" default="#fff" hint="y" */"##;
        let extraction = extract(css);
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::UnknownAttribute("hint".into())
        );
    }

    #[test]
    fn empty_value_is_skipped() {
        let css = r#"/* @variable name="x" group="" type="color" default="red" */"#;
        let extraction = extract(css);
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::EmptyValue("group")
        );
    }

    #[test]
    fn unquoted_or_unterminated_values_are_malformed() {
        let unquoted = extract(r#"/* @variable name=x group="g" type="t" default="d" */"#);
        assert!(matches!(
            unquoted.skipped[0].reason,
            SkipReason::Malformed(_)
        ));

        let embedded_quote =
            extract(r#"/* @variable name="a"b" group="g" type="t" default="d" */"#);
        assert!(embedded_quote.variables.is_empty());
        assert_eq!(embedded_quote.skipped.len(), 1);

        let glued = extract(r#"/* @variable name="a"group="g" type="t" default="d" */"#);
        assert!(matches!(glued.skipped[0].reason, SkipReason::Malformed(_)));
    }

    #[test]
    fn malformed_annotation_does_not_hide_its_neighbours() {
        let css = r##"
/* @variable name="a" group="g" type="color" default="#000" */
/* @variable name="b" group="g" type="color" */
/* @variable name="c" group="g" type="color" default="#222" */
"##;
        let extraction = extract(css);
        assert_eq!(names(&extraction), vec!["a", "c"]);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].line, 3);
    }

    #[test]
    fn empty_style_sheet_yields_nothing() {
        let extraction = extract("");
        assert!(extraction.variables.is_empty());
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn duplicate_names_are_reported() {
        let css = r##"/* @variable name="a" group="g" type="color" default="#000" */
/* @variable name="a" group="h" type="color" default="#fff" */"##;
        let extraction = extract(css);
        assert_eq!(extraction.variables.len(), 2);
        match extraction.ensure_unique_names() {
            Err(AnnotationError::DuplicateName {
                name,
                first_line,
                line,
            }) => {
                assert_eq!(name, "a");
                assert_eq!(first_line, 1);
                assert_eq!(line, 2);
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn strict_check_counts_skipped() {
        let extraction = extract("/* @variable */ /* @variable name=\"x\" */");
        assert_eq!(extraction.skipped.len(), 2);
        assert!(matches!(
            extraction.ensure_none_skipped(),
            Err(AnnotationError::Strict { count: 2 })
        ));
        assert!(extract("").ensure_none_skipped().is_ok());
    }

    #[test]
    fn skip_reason_messages() {
        assert_eq!(
            SkipReason::MissingAttribute("type").to_string(),
            "missing attribute `type`"
        );
        assert_eq!(
            SkipReason::Malformed("name=x".into()).to_string(),
            "malformed attribute near `name=x`"
        );
        assert_eq!(
            SkipReason::Unterminated.to_string(),
            "annotation is never closed with `*/`"
        );
    }
}
