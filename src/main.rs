use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use osgb_gridref::{
    Crs, CsvGridConfig, CsvToGrid, GeometryFormat, GridRefError, LocationForm, OsgbCoordinate,
    Wgs84Coordinate, validate_form, validate_grid_refs,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Convert between OS National Grid references and WGS84 latitude/longitude"
)]
#[command(disable_help_subcommand = true)]
#[command(infer_subcommands = true)]
struct Cli {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbosity: u8,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
#[command(arg_required_else_help = true)]
enum Command {
    /// Convert grid references (e.g. "TQ 3003 8038") to WGS84.
    ToLatlon {
        #[arg(required = true)]
        grid_refs: Vec<String>,
    },

    /// Convert a WGS84 position to a grid reference.
    #[command(allow_negative_numbers = true)]
    ToGrid {
        latitude: f64,
        longitude: f64,

        /// Digits per axis in the grid reference (0-5).
        #[arg(short, long, default_value_t = 5)]
        precision: u8,
    },

    /// Validate single-field grid references.
    Validate {
        #[arg(required = true)]
        grid_refs: Vec<String>,
    },

    /// Validate a location form stored as JSON.
    ValidateForm { form: PathBuf },

    /// Add grid reference and WGS84 columns to a CSV file.
    Csv(CsvArgs),
}

#[derive(Debug, clap::Args)]
struct CsvArgs {
    input: PathBuf,
    output: PathBuf,

    /// Column holding grid references.
    #[arg(long, conflicts_with_all = ["x_column", "geometry_column"])]
    grid_ref_column: Option<String>,

    /// Column holding X (longitude or easting).
    #[arg(long, requires = "y_column")]
    x_column: Option<String>,

    /// Column holding Y (latitude or northing).
    #[arg(long, requires = "x_column")]
    y_column: Option<String>,

    /// Column holding a WKT or GeoJSON point.
    #[arg(long, conflicts_with = "x_column")]
    geometry_column: Option<String>,

    /// Coordinate system of X/Y or geometry input.
    #[arg(long, value_enum, default_value_t = CrsArg::Wgs84)]
    crs: CrsArg,

    #[arg(short, long, default_value_t = 5)]
    precision: u8,

    /// Input columns to leave out of the output.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Append the WGS84 point in this format.
    #[arg(long, value_enum)]
    geometry: Option<GeometryArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CrsArg {
    Wgs84,
    Bng,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeometryArg {
    Wkt,
    Geojson,
}

impl CsvArgs {
    fn config(&self) -> Result<CsvGridConfig, GridRefError> {
        let config = match (
            &self.grid_ref_column,
            &self.x_column,
            &self.y_column,
            &self.geometry_column,
        ) {
            (Some(col), _, _, _) => CsvGridConfig::new(col),
            (None, Some(x), Some(y), _) => CsvGridConfig::from_coords(x, y),
            (None, _, _, Some(col)) => CsvGridConfig::from_geometry(col),
            _ => {
                return Err(GridRefError::CsvError(
                    "One of --grid-ref-column, --x-column/--y-column or --geometry-column \
                     is required"
                        .to_string(),
                ));
            }
        };

        let crs = match self.crs {
            CrsArg::Wgs84 => Crs::Wgs84,
            CrsArg::Bng => Crs::Bng,
        };
        let mut config = config
            .crs(crs)
            .precision(self.precision)
            .exclude(self.exclude.clone());
        if let Some(format) = self.geometry {
            config = config.with_geometry(match format {
                GeometryArg::Wkt => GeometryFormat::Wkt,
                GeometryArg::Geojson => GeometryFormat::GeoJson,
            });
        }
        Ok(config)
    }
}

fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Warn),
        1 => builder.filter_level(log::LevelFilter::Info),
        2 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.try_init()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), GridRefError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| GridRefError::JsonError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

#[derive(Serialize)]
struct Converted {
    grid_ref: String,
    osgb: OsgbCoordinate,
    wgs84: Wgs84Coordinate,
}

fn run(cli: Cli) -> Result<ExitCode, GridRefError> {
    match cli.command {
        Command::ToLatlon { grid_refs } => {
            let mut results = Vec::with_capacity(grid_refs.len());
            for text in &grid_refs {
                let osgb = OsgbCoordinate::parse_grid_ref(text)?;
                let wgs84 = osgb.to_wgs84()?;
                debug!("{} -> ({}, {})", text, osgb.easting, osgb.northing);
                results.push(Converted {
                    grid_ref: text.clone(),
                    osgb,
                    wgs84,
                });
            }
            if cli.json {
                print_json(&results)?;
            } else {
                for r in &results {
                    println!(
                        "{}\t{:.6}\t{:.6}\t{}",
                        r.grid_ref, r.wgs84.latitude, r.wgs84.longitude, r.wgs84
                    );
                }
            }
        }

        Command::ToGrid {
            latitude,
            longitude,
            precision,
        } => {
            let wgs84 = Wgs84Coordinate::new(latitude, longitude);
            let osgb = wgs84.to_osgb()?;
            let converted = Converted {
                grid_ref: osgb.grid_ref(precision)?,
                osgb,
                wgs84,
            };
            if cli.json {
                print_json(&converted)?;
            } else {
                println!("{}\t{}\t{}", converted.grid_ref, osgb.easting, osgb.northing);
            }
        }

        Command::Validate { grid_refs } => {
            let results = validate_grid_refs(grid_refs.as_slice());
            let all_valid = results.iter().all(|v| v.valid);
            if cli.json {
                print_json(&results)?;
            } else {
                for (text, v) in grid_refs.iter().zip(&results) {
                    match (&v.position, v.first_error()) {
                        (Some(pos), _) => {
                            println!("{}\tOK\t{:.6}\t{:.6}", text, pos.latitude, pos.longitude)
                        }
                        (None, Some(msg)) => println!("{}\t{}", text, msg),
                        (None, None) => println!("{}\tOK", text),
                    }
                }
            }
            if !all_valid {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::ValidateForm { form } => {
            let text = std::fs::read_to_string(&form)
                .map_err(|e| GridRefError::IoError(e.to_string()))?;
            let form: LocationForm =
                serde_json::from_str(&text).map_err(|e| GridRefError::JsonError(e.to_string()))?;
            info!("Validating methods: {:?}", form.provided_methods());

            let result = validate_form(&form);
            if cli.json {
                print_json(&result)?;
            } else if result.valid {
                println!("OK");
            } else {
                for e in &result.errors {
                    match e.method {
                        Some(method) => println!("{:?}: {}", method, e.message),
                        None => println!("{}", e.message),
                    }
                }
            }
            if !result.valid {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Csv(args) => {
            let config = args.config()?;
            info!("Converting {} -> {}", args.input.display(), args.output.display());
            let summary = args.input.to_grid_csv(&args.output, &config)?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!(
                    "{} rows, {} converted, {} failed",
                    summary.rows, summary.converted, summary.failed
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode, GridRefError> {
    let cli = Cli::parse();
    if let Err(e) = setup_logging(cli.verbosity) {
        eprintln!("Failed to initialise logging: {}", e);
    }
    run(cli)
}
