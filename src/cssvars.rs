use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;

use crate::palette::{Palette, hex_to_rgb};

/// Id of the managed style element; its text content is the whole contract
/// surface with the host theme.
pub const STYLE_ELEMENT_ID: &str = "docsite-palette-style";

// Covers every selector combination mkdocs-material defines its own palette
// variables on, so the override wins regardless of the active scheme.
const ROOT_SELECTORS: &str = ":root, body, body[data-md-color-scheme], \
body[data-md-color-primary], body[data-md-color-accent]";

const TRANSLUCENT_ALPHA: &str = "0.12";

/// Pure mapping from a palette to ordered custom-property declarations.
/// An unset or invalid color contributes no entries for its family.
pub fn compute_declarations(palette: &Palette) -> Vec<(String, String)> {
    let mut decls = Vec::new();

    if let Some(p) = palette.valid_primary() {
        decls.push(("--md-primary-fg-color".to_string(), p.to_string()));
        decls.push(("--md-primary-fg-color--light".to_string(), p.to_string()));
        decls.push(("--md-primary-fg-color--dark".to_string(), p.to_string()));
        if let Some(rgb) = hex_to_rgb(p) {
            decls.push((
                "--md-primary-fg-color--rgb".to_string(),
                format!("{}, {}, {}", rgb.r, rgb.g, rgb.b),
            ));
            decls.push((
                "--md-primary-fg-color--transparent".to_string(),
                format!("rgba({}, {}, {}, {TRANSLUCENT_ALPHA})", rgb.r, rgb.g, rgb.b),
            ));
        }
    }

    if let Some(a) = palette.valid_accent() {
        decls.push(("--md-accent-fg-color".to_string(), a.to_string()));
        if let Some(rgb) = hex_to_rgb(a) {
            decls.push((
                "--md-accent-fg-color--rgb".to_string(),
                format!("{}, {}, {}", rgb.r, rgb.g, rgb.b),
            ));
            decls.push((
                "--md-accent-fg-color--transparent".to_string(),
                format!("rgba({}, {}, {}, {TRANSLUCENT_ALPHA})", rgb.r, rgb.g, rgb.b),
            ));
        }
        decls.push(("--md-typeset-a-color".to_string(), a.to_string()));
        decls.push(("--md-typeset-a-color--hover".to_string(), a.to_string()));
        decls.push(("--md-typeset-mark-color".to_string(), a.to_string()));
    }

    decls
}

/// One rule block scoped to the root selectors, every declaration marked
/// `!important`. An empty declaration list yields an empty body.
pub fn rule_block(declarations: &[(String, String)]) -> String {
    let mut out = String::new();
    out.push_str(ROOT_SELECTORS);
    out.push_str(" {\n");
    for (name, value) in declarations {
        out.push_str("  ");
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(" !important;\n");
    }
    out.push('}');
    out
}

/// Writes the override rule into the single well-known style element,
/// creating it on first use. Reapplication fully replaces prior content.
pub fn apply(document: &NodeRef, palette: &Palette) {
    let css = rule_block(&compute_declarations(palette));
    let style = ensure_style_element(document);
    for child in style.children() {
        child.detach();
    }
    style.append(NodeRef::new_text(css));
}

/// Removes the style element entirely, reverting to the host theme's own
/// variables. No-op when absent.
pub fn clear(document: &NodeRef) {
    if let Ok(style) = document.select_first(&format!("style#{STYLE_ELEMENT_ID}")) {
        style.as_node().detach();
    }
}

fn ensure_style_element(document: &NodeRef) -> NodeRef {
    if let Ok(existing) = document.select_first(&format!("style#{STYLE_ELEMENT_ID}")) {
        return existing.as_node().clone();
    }

    let fragment = kuchiki::parse_html().one(format!("<style id=\"{STYLE_ELEMENT_ID}\"></style>"));
    let style = fragment.select_first("style").unwrap().as_node().clone();

    match document.select_first("head") {
        Ok(head) => head.as_node().append(style.clone()),
        Err(()) => document.append(style.clone()),
    }
    style
}
