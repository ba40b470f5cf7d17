use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mapview::{AnalysisKind, MapButton, SiteProfile};
use tools::{Availability, Scenario, simulate};
use tracing_subscriber::EnvFilter;

/// Replays the map section of a MapMitra site on virtual time.
#[derive(Debug, Parser)]
#[command(name = "mapmitra-sim", version)]
struct Args {
    /// Site profile JSON file; overrides --site.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Built-in site profile.
    #[arg(long, default_value = "mapmitra")]
    site: String,

    /// Primary map SDK on the page.
    #[arg(long, value_enum, default_value_t = Availability::Absent)]
    primary: Availability,

    /// Fallback tile library on the page.
    #[arg(long, value_enum, default_value_t = Availability::Ok)]
    fallback: Availability,

    /// Earth Engine SDK on the page.
    #[arg(long, value_enum, default_value_t = Availability::Absent)]
    earth_engine: Availability,

    /// Visible ratios of the map section, one per 100ms tick.
    #[arg(long, value_delimiter = ',', default_value = "1.0")]
    visibility: Vec<f64>,

    /// Buttons pressed once the map has settled (e.g. 3d,zoom-in,reset).
    #[arg(long, value_delimiter = ',')]
    press: Vec<String>,

    /// Run a mock analysis (ndvi, ndbi, ndwi, thermal, composite).
    #[arg(long)]
    analyze: Option<String>,

    /// Seed for mock analysis figures.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Print the resolved profile as JSON and exit.
    #[arg(long)]
    dump_profile: bool,
}

fn load_profile(args: &Args) -> Result<SiteProfile> {
    if let Some(path) = &args.profile {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile from {}", path.display()))?;
        return SiteProfile::from_json(&json)
            .with_context(|| format!("Failed to parse profile {}", path.display()));
    }
    match SiteProfile::builtin(&args.site) {
        Some(p) => Ok(p),
        None => bail!("unknown site: {} (expected mapmitra or legacy)", args.site),
    }
}

fn scenario(args: &Args) -> Result<Scenario> {
    let presses = args
        .press
        .iter()
        .map(|s| s.parse::<MapButton>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    let analyze = args
        .analyze
        .as_deref()
        .map(|s| s.parse::<AnalysisKind>().map_err(anyhow::Error::msg))
        .transpose()?;

    Ok(Scenario {
        profile: load_profile(args)?,
        primary: args.primary,
        fallback: args.fallback,
        earth_engine: args.earth_engine,
        visibility: args.visibility.clone(),
        presses,
        analyze,
        seed: args.seed,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.dump_profile {
        println!("{}", load_profile(&args)?.to_json_pretty()?);
        return Ok(());
    }

    let report = simulate(&scenario(&args)?);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
