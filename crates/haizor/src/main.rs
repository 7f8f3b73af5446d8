mod cli;
mod listing;
mod paths;
mod run;
mod session;

use anyhow::{Context, Result};
use catalog::{CategoryFilter, CommissionRequest};
use cli::{CatalogAction, Command, CommissionArgs, RunArgs};
use listing::{format_listing, CatalogListing};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Catalog(catalog_cmd)) => handle_catalog_command(catalog_cmd.action, &cli.run),
        Some(Command::Commission(args)) => run_commission(args),
        None => run::run(cli.run),
    }
}

fn handle_catalog_command(action: CatalogAction, args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;

    match action {
        CatalogAction::List { json } => run_catalog_list(&paths, args, json),
        CatalogAction::Where => run_catalog_where(&paths, args),
    }
}

fn run_catalog_list(paths: &AppPaths, args: &RunArgs, json: bool) -> Result<()> {
    let catalog = run::load_catalog(args.catalog.as_deref(), paths)?;
    let artworks = catalog.filtered(args.filter);
    if json {
        let listing = CatalogListing::new(args.filter, &artworks);
        let rendered =
            serde_json::to_string_pretty(&listing).context("failed to serialise catalog")?;
        println!("{rendered}");
        return Ok(());
    }

    if args.filter != CategoryFilter::All {
        println!("{} ({} of {})", args.filter, artworks.len(), catalog.len());
    }
    print!("{}", format_listing(&artworks));
    Ok(())
}

fn run_catalog_where(paths: &AppPaths, args: &RunArgs) -> Result<()> {
    let configured = paths.catalog_file();
    println!("Configuration directories:");
    println!("  config:   {}", paths.config_dir().display());
    println!("  catalog:  {}", configured.display());
    let source = match args.catalog.as_ref() {
        Some(path) => format!("--catalog {}", path.display()),
        None if configured.is_file() => configured.display().to_string(),
        None => "bundled".to_string(),
    };
    println!("Active catalog: {source}");
    Ok(())
}

fn run_commission(args: CommissionArgs) -> Result<()> {
    let mut request = CommissionRequest::new(
        args.name.unwrap_or_default(),
        args.message.unwrap_or_default(),
    )
    .with_art_type(args.art_type);
    if let Some(email) = args.email {
        request = request.with_email(email);
    }
    if let Some(reference) = args.reference {
        request = request.with_reference(reference);
    }

    let reply = request.submit()?;
    tracing::info!(
        art_type = %request.art_type,
        reference = request.reference_name().unwrap_or("none"),
        "commission request accepted"
    );
    println!("{reply}");
    Ok(())
}
