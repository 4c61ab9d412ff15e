//! Theme document assembly.
//!
//! Stage 4 of the theme build. Interpolates the declaration tags, the style
//! sheet, the administrative skin and the substituted body into the fixed
//! Blogger theme skeleton:
//!
//! ```text
//! <?xml ...?>
//! <!DOCTYPE html>
//! <html b:version='2' ... four xmlns bindings ...>
//! <head>
//!   meta charset, meta viewport, <title><data:blog.pageTitle/></title>
//!   <b:if cond='true'>          declaration tags
//!   <b:skin>                    style sheet, verbatim, in CDATA
//!   <b:template-skin>           administrative skin (optional), in CDATA
//! </head>
//! <body>                        substituted body
//! </html>
//! ```
//!
//! The style sheet is embedded byte for byte: [`extract_live_skin`] recovers
//! it unchanged. Tag escaping happens upstream in [`crate::tags`]; body and
//! style text are trusted as written.

use maud::Markup;
use std::fs;
use std::path::Path;

/// Fixed style payload for the Blogger layout editor.
pub const ADMIN_SKIN: &str = include_str!("../static/admin.css");

const SKIN_OPEN: &str = "  <b:skin><![CDATA[\n";
const SKIN_CLOSE: &str = "\n  ]]></b:skin>";

/// Everything the skeleton needs.
pub struct Assembly<'a> {
    /// Rendered `<b:variable/>` tags, already joined.
    pub variable_tags: &'a Markup,
    /// Style sheet text, embedded verbatim as the live skin.
    pub style: &'a str,
    /// Administrative skin; `None` omits the `<b:template-skin>` block.
    pub admin_skin: Option<&'a str>,
    /// Body content after marker substitution.
    pub body: &'a str,
}

/// Build the final theme document.
pub fn assemble(parts: &Assembly<'_>) -> String {
    let admin_block = match parts.admin_skin {
        Some(admin) => format!(
            "\n  <b:template-skin><![CDATA[\n{}\n  ]]></b:template-skin>",
            admin.trim_end()
        ),
        None => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE html>
<html b:version='2' class='v2' expr:dir='data:blog.languageDirection' xmlns='http://www.w3.org/1999/xhtml' xmlns:b='http://www.google.com/2005/gml/b' xmlns:data='http://www.google.com/2005/gml/data' xmlns:expr='http://www.google.com/2005/gml/expr'>
<head>
  <meta charset='UTF-8'/>
  <meta content='width=device-width, initial-scale=1.0' name='viewport'/>
  <title><data:blog.pageTitle/></title>
  <b:if cond='true'>
    {tags}
  </b:if>
{skin_open}{style}{skin_close}{admin_block}
</head>
<body>
{body}
</body>
</html>
"#,
        tags = parts.variable_tags.0,
        skin_open = SKIN_OPEN,
        style = parts.style,
        skin_close = SKIN_CLOSE,
        admin_block = admin_block,
        body = parts.body,
    )
}

/// Recover the live skin (the embedded style sheet) from an assembled document.
///
/// Returns `None` if the document has no `<b:skin>` block.
pub fn extract_live_skin(document: &str) -> Option<&str> {
    let start = document.find(SKIN_OPEN)? + SKIN_OPEN.len();
    let len = document[start..].find(SKIN_CLOSE)?;
    Some(&document[start..start + len])
}

/// Write the assembled document, creating missing parent directories first.
pub fn write_document(path: &Path, document: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)
}
