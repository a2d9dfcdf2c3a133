//! `fmt-storefront` - headless catalog browser over the storefront core.
//!
//! Runs the same content queries, filters and sort orders as the marketplace
//! pages and prints the results, which makes it handy for checking content
//! and configuration without the web shell.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use fmt_storefront::Storefront;
use fmt_storefront::config;
use fmt_storefront::content::image_url;
use fmt_storefront::core::access::{AccessOptions, download_links};
use fmt_storefront::core::catalog::{FilterState, SortKey, effective_price};
use fmt_storefront::entities::Product;
use fmt_storefront::errors::{Error, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fmt-storefront", about = "Browse the FMT software marketplace", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List marketplace products
    Browse {
        /// Case-insensitive search over title and short description
        #[arg(long, default_value = "")]
        search: String,
        /// Sector slug
        #[arg(long)]
        sector: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        min_price: f64,
        /// Defaults to the highest price in the catalog
        #[arg(long)]
        max_price: Option<f64>,
        /// date-desc, date-asc, price-desc, price-asc, name-asc or name-desc
        #[arg(long, default_value = "date-desc", value_parser = parse_sort)]
        sort: SortKey,
    },
    /// Landing-page featured products
    Featured,
    /// Show one product by slug
    Show { slug: String },
    /// List sectors
    Sectors,
    /// List reviews of one app, or the featured reviews
    Reviews {
        #[arg(long)]
        app_id: Option<String>,
    },
}

fn parse_sort(value: &str) -> std::result::Result<SortKey, String> {
    value.parse().map_err(|e: Error| e.to_string())
}

fn print_product_line(product: &Product) {
    let price = effective_price(product);
    if price <= 0.0 {
        println!("{:<28} {:<24} Free", product.id, product.title);
    } else {
        println!("{:<28} {:<24} GHS {:.2}", product.id, product.title, price);
    }
}

fn print_product(product: &Product) {
    println!("{} ({})", product.title, product.slug);
    if let Some(description) = &product.short_description {
        println!("  {description}");
    }
    println!("  Price: GHS {:.2}", effective_price(product));
    let sectors: Vec<&str> = product.sectors.iter().map(|s| s.name.as_str()).collect();
    if !sectors.is_empty() {
        println!("  Sectors: {}", sectors.join(", "));
    }
    if let Some(image) = image_url(product.main_image.as_deref(), Some(800)) {
        println!("  Image: {image}");
    }

    let options = AccessOptions::for_product(product);
    if let Some(notice) = options.notice(product) {
        println!("  {notice}");
    }
    println!(
        "  Access: granted={} trial={} free={} buy={}",
        options.granted, options.trial, options.free_access, options.buy
    );
    if options.granted {
        for link in download_links(product) {
            println!("  {}: {}", link.platform.label(), link.url);
        }
    }
}

async fn run(storefront: &Storefront, command: Command) -> Result<()> {
    match command {
        Command::Browse {
            search,
            sector,
            min_price,
            max_price,
            sort,
        } => {
            let catalog_max = storefront.default_filter().await?.price_range.1;
            let filter = FilterState {
                search_query: search,
                sector_slug: sector,
                price_range: (min_price, max_price.unwrap_or(catalog_max)),
            };
            let products = storefront.marketplace(&filter, sort).await?;
            info!("{} products match ({})", products.len(), sort.label());
            products.iter().for_each(print_product_line);
        }
        Command::Featured => {
            storefront.featured().await?.iter().for_each(print_product_line);
        }
        Command::Show { slug } => {
            let product = storefront
                .product_by_slug(&slug)
                .await?
                .ok_or(Error::ProductNotFound { key: slug })?;
            print_product(&product);
            let related = storefront.related(&product).await?;
            if !related.is_empty() {
                println!("You may also like:");
                related.iter().for_each(print_product_line);
            }
        }
        Command::Sectors => {
            for sector in storefront.sectors().await? {
                println!("{:<20} {}", sector.slug, sector.name);
            }
        }
        Command::Reviews { app_id } => {
            let reviews = match app_id.as_deref() {
                Some(id) => storefront.app_reviews(id).await?,
                None => storefront.featured_reviews().await?,
            };
            for review in reviews {
                println!("{}/5  {}: {}", review.rating, review.name, review.content);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();
    let cli = Cli::parse();

    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Using backend at {}", app_config.api.base_url);

    let storefront = Storefront::from_config(app_config)?;
    run(&storefront, cli.command)
        .await
        .inspect_err(|e| error!("{}", e.user_message()))
}
