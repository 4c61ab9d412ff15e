//! Declaration tag generation.
//!
//! Stage 2 of the theme build. Each [`VariableDeclaration`] becomes one
//! self-closing `<b:variable/>` tag:
//!
//! ```xml
//! <b:variable name="bgColor" description="bgColor" group="colors" type="color" default="#fff" value="#fff"/>
//! ```
//!
//! The description repeats the name and `value` starts out equal to
//! `default`; the theme designer edits `value` afterwards. Attribute values
//! go through maud's escaping so a stray `<` or `&` in a default cannot break
//! the surrounding XML.

use crate::types::VariableDeclaration;
use maud::{Markup, PreEscaped, Render};

/// Separator between tags inside the `<b:if>` declarations block.
pub const TAG_SEPARATOR: &str = "\n  ";

impl Render for VariableDeclaration {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str("<b:variable");
        let attrs = [
            ("name", &self.name),
            ("description", &self.name),
            ("group", &self.group),
            ("type", &self.kind),
            ("default", &self.default),
            ("value", &self.default),
        ];
        for (key, value) in attrs {
            buffer.push(' ');
            buffer.push_str(key);
            buffer.push_str("=\"");
            value.render_to(buffer);
            buffer.push('"');
        }
        buffer.push_str("/>");
    }
}

/// Render one tag per declaration, in order, joined by [`TAG_SEPARATOR`].
///
/// An empty slice renders as an empty string.
pub fn render_variable_tags(variables: &[VariableDeclaration]) -> Markup {
    let mut buffer = String::new();
    for (i, var) in variables.iter().enumerate() {
        if i > 0 {
            buffer.push_str(TAG_SEPARATOR);
        }
        var.render_to(&mut buffer);
    }
    PreEscaped(buffer)
}
