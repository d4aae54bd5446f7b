//! Horoscope CLI
//!
//! Usage:
//!   horoscope [OPTIONS] --ephemeris <FILE> --date <DATE> --time <TIME>
//!
//! Options:
//!   -e, --ephemeris <FILE>   Ephemeris table (TOML)
//!   -d, --date <DATE>        Birth date, YYYY-MM-DD
//!   -t, --time <TIME>        Birth time, HH:MM[:SS]
//!   -o, --offset <OFFSET>    UTC offset of the birth time [default: +09:00]
//!   -p, --place <NAME>       Birth place (prefecture name)
//!   --lat <DEG> --lon <DEG>  Birth coordinates instead of a place name
//!   --progressed <DATE>      Add a progressed ring for this date
//!   --transit <DATE|now>     Add a transit ring
//!   -c, --config <FILE>      Chart configuration (TOML)
//!   -s, --stylesheet <FILE>  Stylesheet file for color palette (TOML)
//!   -f, --format <FORMAT>    svg or report [default: svg]
//!   -v, --verbose            Debug logging

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};

use horoscope::{
    location, logging, parse_moment, render_wheel, wheel_report, ChartConfig, ChartError,
    ChartRequest, ChartService, GeoLocation, Stylesheet, TableEphemeris, TransitMoment,
    WheelOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Report,
}

#[derive(Parser)]
#[command(name = "horoscope")]
#[command(about = "Astrological chart wheels and tables from ephemeris data")]
struct Cli {
    /// Ephemeris table (TOML)
    #[arg(short, long)]
    ephemeris: PathBuf,

    /// Birth date, YYYY-MM-DD
    #[arg(short, long)]
    date: String,

    /// Birth time, HH:MM or HH:MM:SS
    #[arg(short, long)]
    time: String,

    /// UTC offset of the birth time
    #[arg(short, long, default_value = "+09:00", allow_hyphen_values = true)]
    offset: String,

    /// Birth place (prefecture name)
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,

    /// Birth latitude, degrees north
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Birth longitude, degrees east
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Add a progressed ring for this date (YYYY-MM-DD, at the birth time)
    #[arg(long)]
    progressed: Option<String>,

    /// Add a transit ring for this date (YYYY-MM-DD, at the birth time) or "now"
    #[arg(long)]
    transit: Option<String>,

    /// Chart configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for color palette (TOML)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, ChartError> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::from_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(path) = &cli.stylesheet {
        config = config.with_stylesheet(&Stylesheet::from_file(path)?);
    }

    let location = birth_location(cli)?;
    let moment = parse_moment(&cli.date, &cli.time, &cli.offset)?;
    let request = ChartRequest::new(moment, location);

    let options = WheelOptions {
        progressed_epoch: cli
            .progressed
            .as_deref()
            .map(|date| date_at_birth_time(date, cli))
            .transpose()?,
        transit: cli
            .transit
            .as_deref()
            .map(|date| match date {
                "now" => Ok(TransitMoment::Now),
                date => date_at_birth_time(date, cli).map(TransitMoment::At),
            })
            .transpose()?,
    };

    let ephemeris = TableEphemeris::from_file(&cli.ephemeris)?;
    let service = ChartService::with_engine(ephemeris, config.aspect_engine());
    let wheel = service.wheel(&request, options)?;

    Ok(match cli.format {
        OutputFormat::Svg => render_wheel(&wheel, &config),
        OutputFormat::Report => wheel_report(&wheel),
    })
}

fn birth_location(cli: &Cli) -> Result<GeoLocation, ChartError> {
    match (&cli.place, cli.lat, cli.lon) {
        (Some(name), _, _) => Ok(location::lookup(name)?.location()),
        (None, Some(lat), Some(lon)) => GeoLocation::new(lat, lon),
        _ => Err(ChartError::input_format(
            "location",
            "either --place or --lat/--lon is required",
        )),
    }
}

fn date_at_birth_time(date: &str, cli: &Cli) -> Result<DateTime<Utc>, ChartError> {
    parse_moment(date, &cli.time, &cli.offset)
}
