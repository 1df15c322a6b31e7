mod cli;
mod compile;
mod cssvars;
mod html;
mod palette;
mod store;
mod verify;

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use compile::CompileOptions;
use html::PaletteAction;
use palette::Palette;
use store::PaletteStore;

pub use cli::{Args as CliArgs, Mode, Preset};

pub fn run(args: CliArgs) -> anyhow::Result<()> {
    let store = match &args.config {
        Some(path) => PaletteStore::new(path.clone()),
        None => PaletteStore::new(PaletteStore::default_path()?),
    };

    let compile_opts = (!args.no_compile_links).then(|| CompileOptions {
        service_url: args.service_url.clone(),
        compiler: args.compiler.clone(),
        options: args.options.clone(),
    });

    let pages = collect_pages(&args.input)?;
    if pages.is_empty() {
        anyhow::bail!("no html pages found under {}", args.input.display());
    }

    match args.mode {
        Mode::Enhance => {
            let action = resolve_palette_action(&args, &store)?;
            enhance_pages(&args, &pages, &action, compile_opts.as_ref())
        }
        Mode::Link => {
            let opts =
                compile_opts.context("--mode link cannot be combined with --no-compile-links")?;
            link_pages(&pages, &opts)
        }
    }
}

fn resolve_palette_action(args: &CliArgs, store: &PaletteStore) -> anyhow::Result<PaletteAction> {
    let chose_colors = args.preset.is_some() || args.primary.is_some() || args.accent.is_some();

    if args.reset {
        if chose_colors {
            anyhow::bail!("--reset cannot be combined with --preset/--primary/--accent");
        }
        store.reset()?;
        return Ok(PaletteAction::Clear);
    }

    if chose_colors {
        let (preset_primary, preset_accent) = match args.preset {
            Some(preset) => {
                let (p, a) = preset.colors();
                (Some(p.to_string()), Some(a.to_string()))
            }
            None => (None, None),
        };
        let palette = Palette {
            primary: args.primary.clone().or(preset_primary),
            accent: args.accent.clone().or(preset_accent),
        };
        warn_invalid_colors(&palette);
        store.save(&palette)?;
        return Ok(PaletteAction::Apply(palette));
    }

    Ok(match store.load() {
        Some(palette) => PaletteAction::Apply(palette),
        None => PaletteAction::Keep,
    })
}

fn warn_invalid_colors(palette: &Palette) {
    for (field, value) in [("primary", &palette.primary), ("accent", &palette.accent)] {
        if let Some(v) = value {
            if !palette::is_hex_color(v) {
                tracing::warn!(field, value = %v, "not a #RRGGBB color; it will produce no css overrides");
            }
        }
    }
}

fn enhance_pages(
    args: &CliArgs,
    pages: &[PathBuf],
    action: &PaletteAction,
    compile_opts: Option<&CompileOptions>,
) -> anyhow::Result<()> {
    let mut compile_links = 0usize;
    for page in pages {
        let html_in =
            std::fs::read_to_string(page).with_context(|| format!("read {}", page.display()))?;
        let outcome = html::enhance_page(&html_in, action, compile_opts)
            .with_context(|| format!("enhance {}", page.display()))?;

        let out_path = output_path(args, page)?;
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&out_path, &outcome.html)
            .with_context(|| format!("write {}", out_path.display()))?;
        compile_links += outcome.compile_links;
    }
    tracing::info!(pages = pages.len(), compile_links, "site enhanced");
    Ok(())
}

fn link_pages(pages: &[PathBuf], opts: &CompileOptions) -> anyhow::Result<()> {
    for page in pages {
        let html_in =
            std::fs::read_to_string(page).with_context(|| format!("read {}", page.display()))?;
        let url = html::first_snippet_url(&html_in, opts)
            .with_context(|| format!("build compile url for {}", page.display()))?;
        println!("{}\t{}", page.display(), url);
    }
    Ok(())
}

fn output_path(args: &CliArgs, page: &Path) -> anyhow::Result<PathBuf> {
    let Some(out) = &args.out else {
        return Ok(page.to_path_buf());
    };
    if args.input.is_dir() {
        let rel = page
            .strip_prefix(&args.input)
            .context("page outside input dir")?;
        Ok(out.join(rel))
    } else {
        Ok(out.clone())
    }
}

fn collect_pages(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut pages = Vec::new();
    collect_pages_rec(input, &mut pages)?;
    pages.sort();
    Ok(pages)
}

fn collect_pages_rec(dir: &Path, pages: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_pages_rec(&path, pages)?;
        } else if is_html_page(&path) {
            pages.push(path);
        }
    }
    Ok(())
}

fn is_html_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}
