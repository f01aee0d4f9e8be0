use clap::{Parser, Subcommand, ValueEnum};
use rxnear_core::{SearchRequest, SortBy};
use rxnear_routing::ConfiguredRouting;
use rxnear_search::{SearchConfig, SearchService};
use rxnear_store::{InMemoryMedicineCatalog, InMemoryPharmacyStore};

#[derive(Debug, Parser)]
#[command(name = "rxnear")]
#[command(about = "Nearby pharmacy search against the seed dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for pharmacies around a coordinate.
    Search(SearchArgs),
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lon: f64,
    /// Search radius in kilometers (defaults to the configured radius).
    #[arg(long)]
    radius_km: Option<f64>,
    #[arg(long)]
    max_results: Option<usize>,
    /// Only pharmacies open right now.
    #[arg(long)]
    open_now: bool,
    /// Estimate availability of this medicine at each result.
    #[arg(long)]
    medicine: Option<String>,
    /// Case-insensitive chain-name filter.
    #[arg(long)]
    chain: Option<String>,
    #[arg(long, value_enum, default_value_t = SortArg::Distance)]
    sort: SortArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Distance,
    Rating,
    Name,
    OpenFirst,
}

impl From<SortArg> for SortBy {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Distance => SortBy::Distance,
            SortArg::Rating => SortBy::Rating,
            SortArg::Name => SortBy::Name,
            SortArg::OpenFirst => SortBy::OpenFirst,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => run_search(args).await,
    }
}

async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let config = rxnear_core::load_app_config_from_env()?;

    let store = InMemoryPharmacyStore::new(rxnear_store::load_pharmacies(&config.pharmacies_path)?);
    let catalog =
        InMemoryMedicineCatalog::new(rxnear_store::load_medicines(&config.medicines_path)?);
    let routing = ConfiguredRouting::from_options(
        config.routing_base_url.as_deref(),
        config.routing_timeout_secs,
        config.routing_max_retries,
        config.routing_backoff_base_secs,
    )?;
    let service = SearchService::new(
        store,
        catalog,
        routing,
        SearchConfig::from_app_config(&config),
    );

    let request = SearchRequest {
        radius_km: args.radius_km,
        max_results: args.max_results,
        open_now: args.open_now.then_some(true),
        chain_name: args.chain,
        medicine_name: args.medicine,
        sort_by: args.sort.into(),
        ..SearchRequest::at(args.lat, args.lon)
    };

    let results = service.search(&request).await?;

    if results.is_empty() {
        println!("no pharmacies found");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let open = if result.is_open_now { "open" } else { "closed" };
        let travel = result
            .travel_time_minutes
            .map_or(String::new(), |m| format!("  ~{m} min drive"));
        println!(
            "{:>2}. {}  {:.2} km  {open}{travel}",
            i + 1,
            result.name,
            result.distance_km
        );
        println!("      {}", result.address);
        if let Some(availability) = &result.availability {
            println!(
                "      {}: {:?} (confidence {:.2})",
                availability.medicine_name, availability.stock_level, availability.confidence
            );
        }
    }

    Ok(())
}
