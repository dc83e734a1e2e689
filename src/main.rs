use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use parcel_tracker::app::track_use_case::TrackUseCase;
use parcel_tracker::config::Config;
use parcel_tracker::infra::http_client::ReqwestHttp;
use parcel_tracker::infra::output::{encode, write_output, OutputTarget};
use parcel_tracker::logging;
use parcel_tracker::normalize::{DateNormalizer, Zone};
use parcel_tracker::types::OutputFormat;

#[derive(Parser)]
#[command(name = "parcel")]
#[command(about = "Look up USPS, UPS, FedEx and DHL tracking status")]
#[command(version)]
struct Cli {
    /// Tracking number; non-alphanumeric characters are ignored
    #[arg(short = 'n', long = "number")]
    number: String,

    /// Carrier: usps, ups, fedex or dhl
    #[arg(short = 'c', long = "carrier")]
    carrier: String,

    /// Path to output file; stdout when omitted or "-"
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// IANA time zone used for timestamps (default: system zone)
    #[arg(long = "tz")]
    tz: Option<String>,

    /// Output format: json or binary
    #[arg(long, conflicts_with = "binary")]
    format: Option<OutputFormat>,

    /// Shorthand for --format binary
    #[arg(long)]
    binary: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if cli.tz.is_some() {
        config.time_zone = cli.tz.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.binary {
        config.output.format = OutputFormat::Binary;
    }
    config.output.pretty |= cli.pretty;

    let zone: Zone = config.zone()?;
    let http = ReqwestHttp::new(config.timeout(), config.http.user_agent.clone())
        .context("building HTTP client")?;
    let use_case = TrackUseCase::new(
        Box::new(http),
        DateNormalizer::new(zone),
        config.http.endpoint.clone(),
    );

    let result = use_case.track(&cli.number, &cli.carrier).await?;
    info!(
        "Tracking result: delivered={}, updates={}",
        result.delivered,
        result.updates.len()
    );

    let bytes = encode(&result, config.output.format, config.output.pretty)?;
    let target = OutputTarget::from_arg(cli.output.as_deref());
    write_output(&target, &bytes).with_context(|| format!("writing {:?}", target))?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("parcel: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
