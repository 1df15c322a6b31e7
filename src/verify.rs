use kuchiki::traits::TendrilSink as _;

use crate::compile::{BUTTON_CLASS, CONTAINER_CLASS};
use crate::cssvars::STYLE_ELEMENT_ID;

/// Re-parses an enhanced page and checks the invariants the enhancement
/// relies on: one palette style element at most, one compile link per
/// container, and every link pointing at the clientstate endpoint.
pub fn assert_consistent(html: &str) -> anyhow::Result<()> {
    let doc = kuchiki::parse_html().one(html);

    let styles = doc
        .select(&format!("style#{STYLE_ELEMENT_ID}"))
        .map(|nodes| nodes.count())
        .unwrap_or(0);
    if styles > 1 {
        anyhow::bail!("consistency check failed: {styles} palette style elements (want at most 1)");
    }

    if let Ok(nodes) = doc.select(&format!(".{BUTTON_CLASS}")) {
        for node in nodes {
            let attrs = node.attributes.borrow();
            let href = attrs.get("href").unwrap_or("");
            if !href.contains("/clientstate/") {
                anyhow::bail!(
                    "consistency check failed: compile link href {:?} is not a clientstate url",
                    href
                );
            }
        }
    }

    if let Ok(nodes) = doc.select(&format!(".{CONTAINER_CLASS}")) {
        for node in nodes {
            let count = node
                .as_node()
                .select(&format!(".{BUTTON_CLASS}"))
                .map(|n| n.count())
                .unwrap_or(0);
            if count > 1 {
                anyhow::bail!("consistency check failed: container holds {count} compile links");
            }
        }
    }

    Ok(())
}
