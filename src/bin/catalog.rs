use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront_catalog::config::{CatalogConfig, LOGGED_ENV_KEYS, REQUIRED_ENV_KEYS};
use storefront_catalog::service::CatalogService;
use storefront_catalog::tracing::init_tracing;
use storefront_catalog::util::env;

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Storefront catalog lookup CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Hybrid search by free text and/or vendor
    Search {
        /// Free-text query or part number (empty browses the catalog)
        #[arg(default_value = "")]
        query: String,
        /// Vendor filter ("Todas las marcas" or empty for every brand)
        #[arg(long, default_value = "")]
        vendor: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (0 uses CATALOG_PAGE_SIZE)
        #[arg(long, default_value_t = 0)]
        page_size: u32,
        /// Resolve images and display fields per item
        #[arg(long, default_value_t = false)]
        cards: bool,
    },
    /// Product detail view for one part number
    Detail { part_number: String },
    /// Resolved image for one part number
    Image { part_number: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn,storefront_catalog=info")?;
    let cli = Cli::parse();

    env::preflight_check("catalog", REQUIRED_ENV_KEYS, LOGGED_ENV_KEYS)?;
    let cfg = CatalogConfig::from_env().context("loading catalog configuration")?;
    let service = CatalogService::from_config(cfg)?;

    match cli.command {
        Commands::Search {
            query,
            vendor,
            page,
            page_size,
            cards,
        } => {
            if cards {
                let out = service
                    .search_cards(&query, &vendor, page, page_size)
                    .await
                    .context("search failed")?;
                print_json(&out)
            } else {
                let out = service
                    .search_products(&query, &vendor, page, page_size)
                    .await
                    .context("search failed")?;
                print_json(&out)
            }
        }
        Commands::Detail { part_number } => {
            let view = service
                .product_detail(&part_number)
                .await
                .with_context(|| format!("detail for {part_number}"))?;
            print_json(&view)
        }
        Commands::Image { part_number } => {
            let image = service
                .resolve_image_for(&part_number)
                .await
                .with_context(|| format!("image for {part_number}"))?;
            print_json(&image)
        }
    }
}
