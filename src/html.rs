use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;

use crate::compile::{self, CompileOptions};
use crate::cssvars;
use crate::palette::Palette;
use crate::verify;

/// What to do with a page's palette override element.
#[derive(Debug, Clone)]
pub enum PaletteAction {
    /// Write (or rewrite) the override block for this palette.
    Apply(Palette),
    /// Remove the override element, reverting to the host theme.
    Clear,
    /// Leave any existing element untouched.
    Keep,
}

pub struct EnhanceOutcome {
    pub html: String,
    pub compile_links: usize,
}

/// The whole per-page pipeline: parse, palette action, compile-link
/// injection, consistency check, serialize.
pub fn enhance_page(
    html: &str,
    action: &PaletteAction,
    compile_opts: Option<&CompileOptions>,
) -> anyhow::Result<EnhanceOutcome> {
    let document = kuchiki::parse_html().one(html);

    match action {
        PaletteAction::Apply(palette) => cssvars::apply(&document, palette),
        PaletteAction::Clear => cssvars::clear(&document),
        PaletteAction::Keep => {}
    }

    let compile_links = match compile_opts {
        Some(opts) => compile::inject_links(&document, opts)?,
        None => 0,
    };

    let mut out = Vec::new();
    document.serialize(&mut out).context("serialize page")?;
    let html = String::from_utf8(out).context("page not utf-8")?;

    verify::assert_consistent(&html)?;
    Ok(EnhanceOutcome { html, compile_links })
}

/// Compile URL for a page's first C++ snippet (or the fallback program).
pub fn first_snippet_url(html: &str, opts: &CompileOptions) -> anyhow::Result<String> {
    let document = kuchiki::parse_html().one(html);
    let source = compile::extract_snippet(&document);
    compile::build_url(opts, &source)
}
