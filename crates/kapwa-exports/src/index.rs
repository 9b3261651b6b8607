//! Aggregated re-export index generation.

use crate::scan::Component;

const HEADER: &str = "// This file is auto-generated - do not edit directly\n";

/// Render the index source: the utilities re-export followed by one
/// re-export per component. Sub-entries are never re-exported here.
pub fn render_index(utils_module: &str, import_prefix: &str, components: &[Component]) -> String {
    let component_exports: Vec<String> = components
        .iter()
        .map(|c| format!("export * from '{}/{}';", import_prefix, c.name))
        .collect();

    format!(
        "{header}\n// Utilities\nexport * from '{utils}';\n\n// Components\n{components}\n",
        header = HEADER,
        utils = utils_module,
        components = component_exports.join("\n"),
    )
}
