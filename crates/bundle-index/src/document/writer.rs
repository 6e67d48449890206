//! Rendering the repository index document

use super::xml::escape;

/// Namespace of the repository document.
pub const REPOSITORY_XMLNS: &str = "http://www.osgi.org/xmlns/repository/v1.0.0";

/// Render a complete document around already-serialized resource blocks.
///
/// Blocks are emitted verbatim, one after another, each on its own line.
pub fn render_document<'a>(
    name: &str,
    increment: u64,
    blocks: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut out = String::from("<?xml version='1.0' encoding='UTF-8'?>\n");
    out.push_str(&format!(
        "<repository increment='{increment}' name='{}' xmlns='{REPOSITORY_XMLNS}'>\n",
        escape(name)
    ));
    for block in blocks {
        out.push_str(block);
        out.push('\n');
    }
    out.push_str("</repository>\n");
    out
}
