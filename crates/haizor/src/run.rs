use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use catalog::Catalog;
use renderer::{RendererConfig, WindowOutcome};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::listing::{format_cart, format_listing};
use crate::paths::AppPaths;
use crate::session::GallerySession;

const WINDOW_TITLE: &str = "Haizor Collection";

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let catalog = load_catalog(args.catalog.as_deref(), &paths)?;
    let session = GallerySession::new(catalog, args.filter);
    let artworks = session.visible();
    tracing::info!(
        filter = %args.filter,
        artworks = artworks.len(),
        "opening Haizor gallery"
    );

    let mut config = RendererConfig {
        title: WINDOW_TITLE.to_string(),
        placeholder_only: args.placeholder_only,
        ..RendererConfig::default()
    };
    if let Some(size) = args.size {
        config.surface_size = size;
    }

    let session = Rc::new(RefCell::new(session));
    let outcome = renderer::run_gallery(config, artworks, Rc::clone(&session))?;

    let session = session.borrow();
    if outcome == WindowOutcome::Unavailable {
        println!("Haizor Collection ({})", session.filter());
        print!("{}", format_listing(&session.visible()));
    }
    if !session.cart().is_empty() {
        print!("{}", format_cart(session.cart()));
    }
    let saved = session.wishlist().ids().len();
    if saved > 0 {
        println!("{saved} artwork(s) saved to wishlist");
    }
    Ok(())
}

/// Explicit `--catalog`, then the user's config file, then the bundled copy.
pub fn load_catalog(explicit: Option<&Path>, paths: &AppPaths) -> Result<Catalog> {
    if let Some(path) = explicit {
        return Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()));
    }
    let configured = paths.catalog_file();
    if configured.is_file() {
        tracing::debug!(path = %configured.display(), "using configured catalog");
        return Catalog::load(&configured)
            .with_context(|| format!("failed to load catalog {}", configured.display()));
    }
    Catalog::bundled().context("bundled catalog is invalid")
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SINGLE: &str = r#"
[[artworks]]
id = 42
title = "Configured"
year = 2021
category = "digital"
medium = "Pigment print"
size = "30 x 30 cm"
image_url = "file:///tmp/configured.png"
"#;

    #[test]
    fn falls_back_to_bundled_catalog() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::from_raw(dir.path().to_path_buf());
        let catalog = load_catalog(None, &paths).unwrap();
        assert_eq!(catalog, Catalog::bundled().unwrap());
    }

    #[test]
    fn prefers_configured_then_explicit() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::from_raw(dir.path().to_path_buf());
        fs::write(paths.catalog_file(), SINGLE).unwrap();
        let catalog = load_catalog(None, &paths).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(42).is_some());

        let explicit = dir.path().join("broken.toml");
        fs::write(&explicit, "[[artworks]]\nid = \"nope\"\n").unwrap();
        let err = load_catalog(Some(&explicit), &paths).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
