use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

mod config;
mod dataset;
mod export;
mod filter;
mod models;
mod palette;
mod quadrant;
mod report;
mod scoring;
mod telemetry;
mod weights;

use config::AppConfig;
use dataset::DatasetCache;
use filter::{FilterSet, MarginThreshold};
use models::{
    CategoryColumn, ColorDiscriminator, HoverLabel, MarginDirection, ScoredRequest,
    CRITERIA_COUNT,
};
use palette::ColorMap;
use weights::{WeightVector, MARGIN_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};

#[derive(Parser)]
#[command(name = "backlog-prioritizer")]
#[command(about = "Weighted quadrant prioritization for the request backlog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank requests by combined score
    Score {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "backlog-report.md")]
        out: PathBuf,
    },
    /// Export the scored view with derived columns and colors
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, value_enum, default_value = "csv")]
        format: export::ExportFormat,
        #[arg(long)]
        out: PathBuf,
    },
    /// List the distinct route, flight class and travel type options
    Options {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long, value_enum)]
        column: Option<CategoryColumn>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Backlog CSV (defaults to BACKLOG_PATH)
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Eight comma-separated weights in [-100, 100]
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i64).range(MIN_WEIGHT..=MAX_WEIGHT)
    )]
    weights: Vec<i64>,
    #[arg(long = "route")]
    routes: Vec<String>,
    #[arg(long = "flight-class")]
    flight_classes: Vec<String>,
    #[arg(long = "travel-type")]
    travel_types: Vec<String>,
    /// Travel months by name or number
    #[arg(long = "month", value_parser = filter::parse_month)]
    months: Vec<u32>,
    #[arg(long, value_enum, default_value = "above")]
    margin_direction: MarginDirection,
    /// Margin bound in percent; 0 disables the margin filter
    #[arg(
        long,
        default_value_t = 0,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i64).range(-200..=200)
    )]
    margin_percent: i64,
    #[arg(long, value_enum, default_value = "quadrant")]
    color_by: ColorDiscriminator,
    #[arg(long, value_enum, default_value = "request-id")]
    hover: HoverLabel,
    /// Seed for palette sampling
    #[arg(long)]
    seed: Option<u64>,
}

impl ViewArgs {
    fn operator_weights(&self) -> anyhow::Result<[i64; CRITERIA_COUNT]> {
        if self.weights.is_empty() {
            return Ok([0; CRITERIA_COUNT]);
        }

        self.weights.as_slice().try_into().map_err(|_| {
            anyhow::anyhow!(
                "expected {} weights, got {}",
                CRITERIA_COUNT,
                self.weights.len()
            )
        })
    }

    fn filters(&self) -> FilterSet {
        FilterSet {
            routes: self.routes.iter().cloned().collect(),
            flight_classes: self.flight_classes.iter().cloned().collect(),
            travel_types: self.travel_types.iter().cloned().collect(),
            months: self.months.iter().copied().collect(),
            margin: MarginThreshold::from_operator(self.margin_direction, self.margin_percent),
        }
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::thread_rng()),
        }
    }
}

struct PreparedView {
    total_rows: usize,
    view: Vec<ScoredRequest>,
}

fn prepare(
    cache: &mut DatasetCache,
    config: &AppConfig,
    args: &ViewArgs,
) -> anyhow::Result<PreparedView> {
    let path = args.dataset.as_ref().unwrap_or(&config.backlog_path);
    let records = cache
        .get(path)
        .with_context(|| format!("failed to load backlog {}", path.display()))?;
    let weights = WeightVector::from_operator(args.operator_weights()?);
    let scored = scoring::score_backlog(records, &weights, MARGIN_WEIGHT)
        .context("failed to score backlog")?;
    let view = args.filters().apply(&scored);

    Ok(PreparedView {
        total_rows: scored.len(),
        view,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("invalid configuration")?;
    telemetry::init(&config.log_level)?;
    let mut cache = DatasetCache::new();

    match cli.command {
        Commands::Score { view, limit } => {
            let prepared = prepare(&mut cache, &config, &view)?;
            if prepared.view.is_empty() {
                println!("No requests match the current filters.");
                return Ok(());
            }

            let (discriminator, colors) =
                colors_or_quadrant(&prepared.view, view.color_by, &mut *view.rng());
            println!(
                "Top requests by combined score ({} of {} after filters):",
                prepared.view.len(),
                prepared.total_rows
            );
            for request in scoring::rank(&prepared.view)
                .iter()
                .take(limit.unwrap_or(config.top_limit))
            {
                println!(
                    "- {} [{}] x {:.2} y {:.3} score {:.2} color {}",
                    request.hover_label(view.hover),
                    request.quadrant,
                    request.xscore,
                    request.yscore,
                    request.score,
                    colors
                        .get(request.discriminator(discriminator))
                        .map(String::as_str)
                        .unwrap_or("-")
                );
            }
        }
        Commands::Report { view, limit, out } => {
            let prepared = prepare(&mut cache, &config, &view)?;
            let operator_weights = view.operator_weights()?;
            let colors = palette::color_map_for(&prepared.view, view.color_by, &mut *view.rng())
                .map_err(|err| err.to_string());
            let options = report::ReportOptions {
                generated_on: chrono::Utc::now().date_naive(),
                operator_weights: &operator_weights,
                discriminator: view.color_by,
                hover: view.hover,
                limit: limit.unwrap_or(config.top_limit),
            };
            let report = report::build_report(
                &options,
                prepared.total_rows,
                &prepared.view,
                colors.as_ref().map_err(String::clone),
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { view, format, out } => {
            let prepared = prepare(&mut cache, &config, &view)?;
            let (discriminator, colors) =
                colors_or_quadrant(&prepared.view, view.color_by, &mut *view.rng());
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            export::write_view(file, format, &prepared.view, discriminator, Some(&colors))?;
            info!(rows = prepared.view.len(), out = %out.display(), "exported view");
            println!(
                "Exported {} requests to {}.",
                prepared.view.len(),
                out.display()
            );
        }
        Commands::Options {
            dataset: dataset_path,
            column,
        } => {
            let path = dataset_path.unwrap_or_else(|| config.backlog_path.clone());
            let records = cache
                .get(&path)
                .with_context(|| format!("failed to load backlog {}", path.display()))?;
            let columns = match column {
                Some(column) => vec![column],
                None => vec![
                    CategoryColumn::Route,
                    CategoryColumn::FlightClass,
                    CategoryColumn::TravelType,
                ],
            };
            for column in columns {
                println!("{}:", column.title());
                for value in dataset::distinct_values(records, column) {
                    println!("- {value}");
                }
            }
        }
    }

    Ok(())
}

/// Falls back to quadrant colors when the palette cannot cover the categories.
fn colors_or_quadrant(
    view: &[ScoredRequest],
    discriminator: ColorDiscriminator,
    rng: &mut dyn RngCore,
) -> (ColorDiscriminator, ColorMap) {
    match palette::color_map_for(view, discriminator, rng) {
        Ok(colors) => (discriminator, colors),
        Err(err) => {
            eprintln!("{err}");
            (ColorDiscriminator::Quadrant, quadrant::color_map())
        }
    }
}
