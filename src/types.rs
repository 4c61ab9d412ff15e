//! Shared types passed between pipeline stages.
//!
//! A [`VariableDeclaration`] is produced by the annotation extractor, rendered
//! by the tag generator, and listed by the CLI output (and `variables --json`).

use serde::Serialize;

/// A themeable variable declared by a `/* @variable ... */` comment.
///
/// ```css
/// /* @variable name="bgColor" group="colors" type="color" default="#fff" */
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDeclaration {
    /// Identifier, also used as the human-readable label.
    pub name: String,
    /// Grouping key shown by the theme designer.
    pub group: String,
    /// Type tag (`color`, `font`, `length`, ...). Not validated.
    #[serde(rename = "type")]
    pub kind: String,
    /// Default value; the generated tag starts with `value` equal to this.
    pub default: String,
    /// 1-based line of the annotation in the style sheet.
    #[serde(skip_serializing_if = "is_zero")]
    pub line: usize,
}

fn is_zero(line: &usize) -> bool {
    *line == 0
}

impl VariableDeclaration {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        kind: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            kind: kind.into(),
            default: default.into(),
            line: 0,
        }
    }
}
