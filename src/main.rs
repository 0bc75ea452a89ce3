use chrono::Utc;
use clap::Parser;
use irradiance_grid::{
    ensure_cache_dir_exists, get_cache_dir, AreaSpec, AssemblySettings,
    DatasetAssembler, DatasetError, DatasetWriter, LocationSet, PowerClient, TimeRange,
    DEFAULT_COMMUNITY, DEFAULT_PARAMETER,
};
use log::{info, LevelFilter};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// Download NASA POWER irradiance around a set of locations and write training arrays.
#[derive(Parser, Debug)]
#[command(name = "irradiance-grid", version, about)]
struct Cli {
    /// First year to download.
    #[arg(long)]
    year_start: i32,

    /// Last year to download (inclusive). The current year is truncated to today.
    #[arg(long)]
    year_end: i32,

    /// Region size in degrees of latitude.
    #[arg(long)]
    area_width: f64,

    /// Region size in degrees of longitude.
    #[arg(long)]
    area_height: f64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Orbital period in days used for the year phase.
    #[arg(long, default_value_t = 365.242)]
    orbit: f64,

    /// YAML file with a `target_locations` mapping of name to [latitude, longitude].
    #[arg(long, default_value = "locations.yml")]
    locations: PathBuf,

    /// Output bundle path.
    #[arg(short, long, default_value = "dataset/dataset.bin.gz")]
    output: PathBuf,

    /// Directory for cached responses. Defaults to the system cache directory.
    #[arg(long, conflicts_with = "no_cache")]
    cache_dir: Option<PathBuf>,

    /// Always download, never read or write cached responses.
    #[arg(long)]
    no_cache: bool,

    /// Locations of one year fetched concurrently.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// POWER user community.
    #[arg(long, default_value = DEFAULT_COMMUNITY)]
    community: String,

    /// POWER parameter to download.
    #[arg(long, default_value = DEFAULT_PARAMETER)]
    parameter: String,

    /// Increase verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn run(cli: Cli) -> Result<(), DatasetError> {
    let today = Utc::now().date_naive();
    let settings = AssemblySettings::builder()
        .time_range(TimeRange::new(cli.year_start, cli.year_end, today)?)
        .area(AreaSpec::new(cli.area_width, cli.area_height))
        .orbit_period_days(cli.orbit)
        .max_concurrent_requests(cli.concurrency)
        .build()?;
    let locations = LocationSet::load(&cli.locations).await?;

    let cache_dir = if cli.no_cache {
        None
    } else {
        let dir = match cli.cache_dir {
            Some(dir) => dir,
            None => get_cache_dir()?,
        };
        ensure_cache_dir_exists(&dir).await?;
        Some(dir)
    };

    let client = PowerClient::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .community(cli.community)
        .parameter(cli.parameter)
        .maybe_cache_dir(cache_dir)
        .build()?;

    let assembler = DatasetAssembler::new(client, settings, locations);
    let arrays = assembler.run().await?;

    let writer = DatasetWriter::new(cli.output, settings.sentinel());
    writer.write(arrays).await?;
    info!("Done");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}
