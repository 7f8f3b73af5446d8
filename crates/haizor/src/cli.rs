use std::path::PathBuf;

use catalog::{ArtType, CategoryFilter};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "haizor",
    author,
    version,
    about = "Haizor studio gallery with an interactive watercolor grid",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Catalog TOML to show instead of the configured or bundled catalog.
    #[arg(long, value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Collection filter: `all`, `handmade`, or `digital`.
    #[arg(
        long,
        value_name = "FILTER",
        value_parser = parse_filter,
        default_value = "all",
        global = true
    )]
    pub filter: CategoryFilter,

    /// Initial window size in logical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Do not fetch artwork images; every cell keeps its placeholder.
    #[arg(long)]
    pub placeholder_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect the artwork catalog.
    Catalog(CatalogCommand),
    /// Send a custom art request to the studio.
    Commission(CommissionArgs),
}

#[derive(Parser, Debug)]
pub struct CommissionArgs {
    /// Your name.
    #[arg(long)]
    pub name: Option<String>,

    /// Description of the artwork you have in mind.
    #[arg(long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Address the studio replies to.
    #[arg(long)]
    pub email: Option<String>,

    /// Digital Illustration, Handmade Collage, Mixed Media, or Other.
    #[arg(
        long,
        value_name = "TYPE",
        value_parser = parse_art_type,
        default_value = "Digital Illustration"
    )]
    pub art_type: ArtType,

    /// Reference image to attach.
    #[arg(long, value_name = "FILE")]
    pub reference: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CatalogCommand {
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Print the artworks matching `--filter`.
    List {
        /// Emit JSON instead of a text listing.
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration directory and catalog path.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_filter(value: &str) -> Result<CategoryFilter, String> {
    value.parse()
}

pub fn parse_art_type(value: &str) -> Result<ArtType, String> {
    value.parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT, e.g. 1280x720".to_string())?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}' in window size", width.trim()))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}' in window size", height.trim()))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}
