mod csv_io;
mod report;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use walkshed_analyzer::{AmenityProfile, Analyzer, ScoringPolicy};
use walkshed_core::{AppConfig, Catalog};
use walkshed_geo::{
    AmenityProvider, GeocodeProvider, NominatimClient, OfflineProvider, OverpassClient, Pacer,
};

#[derive(Debug, Parser)]
#[command(name = "walkshed")]
#[command(about = "Amenity proximity analysis for real-estate listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a CSV of listings and write an enriched copy.
    Analyze(AnalyzeArgs),
    /// Print the active amenity category catalog.
    Categories,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Input CSV with one listing per row.
    input: PathBuf,

    /// Output CSV path. Defaults to the input path with `_with_amenities`
    /// inserted before the extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scoring policy applied to each category.
    #[arg(long, value_enum, default_value_t = PolicyArg::Detailed)]
    policy: PolicyArg,

    /// Analyze at most this many listings.
    #[arg(long)]
    limit: Option<usize>,

    /// Use the deterministic offline provider instead of live services.
    #[arg(long)]
    offline: bool,

    /// Name of the input column holding the street address.
    #[arg(long, default_value = "address")]
    address_column: String,

    /// Name of the input column holding the fallback location text.
    #[arg(long, default_value = "location_search")]
    location_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Per-category counts and closest distances.
    Detailed,
    /// Per-category count/rating composites plus an overall score.
    Rated,
}

impl From<PolicyArg> for ScoringPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Detailed => Self::Detailed,
            PolicyArg::Rated => Self::RatedComposite,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = walkshed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&config, args).await,
        Commands::Categories => run_categories(&config),
    }
}

async fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let catalog = load_active_catalog(config)?;
    let policy = ScoringPolicy::from(args.policy);

    let mut table =
        csv_io::read_listings(&args.input, &args.address_column, &args.location_column)?;
    if let Some(limit) = args.limit {
        table.rows.truncate(limit);
        table.listings.truncate(limit);
    }
    tracing::info!(
        listings = table.listings.len(),
        input = %args.input.display(),
        "loaded listings"
    );

    let (geocoder, amenities) = build_providers(config, args.offline)?;
    let analyzer = Analyzer::new(
        geocoder,
        amenities,
        catalog,
        policy,
        config.analysis_radius_meters,
    );

    let output_path = args
        .output
        .unwrap_or_else(|| csv_io::default_output_path(&args.input));
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating output file {}", output_path.display()))?;
    writer
        .write_record(csv_io::output_header(&table.headers, analyzer.catalog(), policy))
        .context("writing output header")?;
    writer.flush().context("flushing output header")?;

    // Ctrl-C requests a stop; the batch finishes the in-flight listing so the
    // output never ends on a half-written record.
    let stop = Arc::new(AtomicBool::new(false));
    let stop_on_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current listing");
            stop_on_signal.store(true, Ordering::SeqCst);
        }
    });

    let mut profiles: Vec<AmenityProfile> = Vec::with_capacity(table.listings.len());
    let batch = analyzer
        .run_batch(&table.listings, &stop, |index, profile| {
            let row = csv_io::output_row(&table.rows[index], &profile, policy);
            writer.write_record(&row).context("writing output record")?;
            writer.flush().context("flushing output record")?;
            profiles.push(profile);
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    report::print_summary(
        analyzer.catalog(),
        policy,
        &profiles,
        &batch.stats,
        batch.interrupted,
    );
    println!("\nResults saved to {}", output_path.display());
    tracing::info!(
        listings = batch.stats.listings,
        output = %output_path.display(),
        "analysis complete"
    );
    Ok(())
}

fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_active_catalog(config)?;
    println!(
        "{} categories, default radius {}m:",
        catalog.len(),
        config.analysis_radius_meters
    );
    for category in &catalog {
        println!(
            "  {:<20} radius {:>5}m  tags: {}",
            category.key,
            category.radius_meters,
            category.tags.join(", ")
        );
    }
    Ok(())
}

fn load_active_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    match &config.categories_path {
        Some(path) => walkshed_core::load_catalog(path, config.analysis_radius_meters)
            .with_context(|| format!("loading category catalog from {}", path.display())),
        None => Catalog::builtin(config.analysis_radius_meters)
            .context("building the built-in category catalog"),
    }
}

fn build_providers(
    config: &AppConfig,
    offline: bool,
) -> anyhow::Result<(Arc<dyn GeocodeProvider>, Arc<dyn AmenityProvider>)> {
    if offline {
        tracing::info!("using the deterministic offline provider");
        let provider = Arc::new(OfflineProvider::new());
        return Ok((provider.clone(), provider));
    }

    let geocoder = NominatimClient::with_base_url(
        &config.user_agent,
        config.request_timeout_secs,
        Pacer::from_millis(config.geocode_delay_ms),
        &config.geocoder_base_url,
    )
    .context("constructing geocoding client")?;
    let amenities = OverpassClient::with_base_url(
        &config.user_agent,
        config.request_timeout_secs,
        Pacer::from_millis(config.query_delay_ms),
        &config.overpass_base_url,
    )
    .context("constructing amenity query client")?;
    Ok((Arc::new(geocoder), Arc::new(amenities)))
}
