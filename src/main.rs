use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use quietroute::osm;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct MapLoadError(PathBuf, #[source] osm::Error);

#[derive(Parser)]
#[command(about = "Quiet walking and driving routes over OpenStreetMap data")]
struct Cli {
    /// Print debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a route and print it as GeoJSON
    Route(RouteArgs),

    /// Print the Overpass QL query fetching map data around two points
    Query(Endpoints),
}

#[derive(Args)]
struct Endpoints {
    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,
}

#[derive(Args)]
struct RouteArgs {
    /// The path to the map data file (Overpass JSON or OSM XML)
    map_file: PathBuf,

    #[command(flatten)]
    endpoints: Endpoints,

    /// Format of the map data file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Prefer quiet roads by adding a noise penalty to every road segment
    #[arg(long)]
    avoid_noise: bool,

    /// Noise level assumed for every road segment
    #[arg(long, default_value_t = quietroute::DEFAULT_PENALTY_LEVEL)]
    penalty_level: f64,

    /// Multiplier of the noise level
    #[arg(long, default_value_t = quietroute::DEFAULT_PENALTY_WEIGHT)]
    penalty_weight: f64,

    /// Maximum number of nodes to expand before giving up
    #[arg(long, default_value_t = quietroute::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Route over all ways, not only those tagged with highway=*
    #[arg(long)]
    all_ways: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Auto,
    Json,
    JsonGz,
    JsonBz2,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for osm::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Auto => osm::FileFormat::Unknown,
            Format::Json => osm::FileFormat::Json,
            Format::JsonGz => osm::FileFormat::JsonGz,
            Format::JsonBz2 => osm::FileFormat::JsonBz2,
            Format::Xml => osm::FileFormat::Xml,
            Format::XmlGz => osm::FileFormat::XmlGz,
            Format::XmlBz2 => osm::FileFormat::XmlBz2,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    colog::default_builder().filter_level(level).init();

    match cli.command {
        Command::Route(args) => route(&args),
        Command::Query(e) => {
            let bbox = osm::bbox_around((e.start_lat, e.start_lon), (e.end_lat, e.end_lon));
            print!("{}", osm::overpass_query(bbox, osm::DEFAULT_WAY_TAGS));
            Ok(())
        }
    }
}

fn route(args: &RouteArgs) -> Result<(), Box<dyn Error>> {
    let options = osm::Options {
        file_format: args.format.into(),
        bbox: [0.0; 4],
        way_tags: if args.all_ways {
            &[]
        } else {
            osm::DEFAULT_WAY_TAGS
        },
    };
    let elements = load_elements(&args.map_file, &options)?;

    let start = (args.endpoints.start_lat, args.endpoints.start_lon);
    let end = (args.endpoints.end_lat, args.endpoints.end_lon);

    let route = if args.avoid_noise {
        let cost = quietroute::PenalizedDistance::new(
            args.penalty_weight,
            quietroute::ConstantPenalty(args.penalty_level),
        );
        quietroute::plan_route(&elements, start, end, &cost, args.step_limit)?
    } else {
        quietroute::plan_route(&elements, start, end, &quietroute::Distance, args.step_limit)?
    };

    if !route.is_found() {
        log::warn!("no route between the given points");
    }

    let geojson = to_geojson(start, end, &route);
    println!("{}", serde_json::to_string_pretty(&geojson)?);
    Ok(())
}

fn load_elements<P: AsRef<Path>>(
    path: P,
    options: &osm::Options<'_>,
) -> Result<Vec<osm::Element>, MapLoadError> {
    osm::read_elements_from_file(options, path.as_ref())
        .map_err(|e| MapLoadError(PathBuf::from(path.as_ref()), e))
}

/// Converts a route into a GeoJSON FeatureCollection with the start and end markers
/// and (if a route was found) the route line.
fn to_geojson(start: (f64, f64), end: (f64, f64), route: &quietroute::Route) -> serde_json::Value {
    let mut features = vec![
        json!({
            "type": "Feature",
            "properties": {"role": "start"},
            "geometry": {"type": "Point", "coordinates": [start.1, start.0]},
        }),
        json!({
            "type": "Feature",
            "properties": {"role": "end"},
            "geometry": {"type": "Point", "coordinates": [end.1, end.0]},
        }),
    ];

    if route.is_found() {
        let coordinates: Vec<[f64; 2]> = route.nodes.iter().map(|n| [n.lon, n.lat]).collect();
        features.push(json!({
            "type": "Feature",
            "properties": {
                "role": "route",
                "nodes": route.node_ids(),
                "distance_km": route.distance,
            },
            "geometry": {"type": "LineString", "coordinates": coordinates},
        }));
    }

    json!({"type": "FeatureCollection", "features": features})
}
