use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::compile;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Rewrite pages with the palette override and compile links.
    Enhance,
    /// Print the compile URL for each page's first C++ snippet; pages are left untouched.
    Link,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    /// Material Design 3 defaults.
    Md3,
    TealPurple,
    BlueAmber,
}

impl Preset {
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Preset::Md3 => ("#6750A4", "#EFB8C8"),
            Preset::TealPurple => ("#009688", "#9C27B0"),
            Preset::BlueAmber => ("#1E88E5", "#FFB300"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// A rendered HTML page, or a site directory searched recursively for `*.html` / `*.htm`.
    #[arg(long)]
    pub input: PathBuf,

    /// Output file (single-page input) or directory (mirrors the input tree).
    ///
    /// When omitted, pages are rewritten in place.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Primary color as `#RRGGBB`.
    #[arg(long)]
    pub primary: Option<String>,

    /// Accent color as `#RRGGBB`.
    #[arg(long)]
    pub accent: Option<String>,

    /// Built-in palette preset. `--primary` / `--accent` override its colors.
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Delete the persisted palette and strip the override element from pages.
    #[arg(long)]
    pub reset: bool,

    /// Palette config file. Defaults to a file in the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// What to do with the collected pages.
    #[arg(long, value_enum, default_value = "enhance")]
    pub mode: Mode,

    /// Compiler id sent to the compiler-exploration service.
    #[arg(long, default_value = compile::DEFAULT_COMPILER)]
    pub compiler: String,

    /// Compiler flags sent alongside each snippet.
    #[arg(long, default_value = compile::DEFAULT_OPTIONS)]
    pub options: String,

    /// Base URL of the compiler-exploration service.
    #[arg(long, default_value = compile::DEFAULT_SERVICE_URL)]
    pub service_url: Url,

    /// Skip compile-link injection.
    #[arg(long)]
    pub no_compile_links: bool,
}
