use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{json, Value};

use se4all_data::{
    config::Config,
    db::{clusters::DEFAULT_SAMPLE_LIMIT, Database, WEB_SCHEMA},
    models::{ClusterColumn, ClusterFilter, Gauge, Projection, ValueRange, ViewRow},
    QueryError,
};

fn range_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .long(name)
        .value_name("LOW,HIGH")
        .allow_hyphen_values(true)
        .value_parser(|s: &str| s.parse::<ValueRange>())
}

fn cluster_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("state")
                .help("Display name of the state, e.g. \"Lagos\"")
                .long("state")
                .short('s')
                .required(true),
        )
        .arg(range_arg("area", "Keep clusters with LOW < area_km2 < HIGH"))
        .arg(range_arg("distance-grid", "Keep clusters with LOW < grid_dist_km < HIGH"))
        .arg(
            Arg::new("limit")
                .help("Maximum number of rows")
                .long("limit")
                .short('l')
                .value_parser(clap::value_parser!(i64).range(0..)),
        )
        .arg(
            Arg::new("columns")
                .help("Comma separated columns to return")
                .long("columns")
                .value_delimiter(',')
                .value_parser(|s: &str| s.parse::<ClusterColumn>())
                .conflicts_with("count"),
        )
        .arg(
            Arg::new("count")
                .help("Return COUNT(COLUMN) over the filtered rows instead of the rows")
                .long("count")
                .value_name("COLUMN")
                .value_parser(|s: &str| s.parse::<ClusterColumn>()),
        )
}

fn build_cli() -> Command {
    Command::new("se4all-query")
        .about("Query the SE4ALL progress counters, boundaries and cluster views")
        .subcommand_required(true)
        .arg(
            Arg::new("pretty")
                .help("Pretty-print the JSON output")
                .long("pretty")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("progress").about("Current value and maximum of every progress gauge"))
        .subcommand(
            Command::new("gauge-max")
                .about("Maximum of the gauge whose description contains DESCRIPTION")
                .arg(Arg::new("description").required(true).index(1)),
        )
        .subcommand(Command::new("states").about("State name to state code mapping"))
        .subcommand(Command::new("regions").about("States with their boundaries as GeoJSON"))
        .subcommand(
            Command::new("available-og").about("Codes of the states with grid and off-grid cluster views"),
        )
        .subcommand(cluster_args(Command::new("clusters").about("Filter the clusters of a state")))
        .subcommand(
            cluster_args(Command::new("og-clusters").about("Filter the off-grid clusters of a state"))
                .arg(range_arg("building", "Keep clusters with LOW < building_count < HIGH"))
                .arg(range_arg(
                    "buildingfp",
                    "Keep clusters with LOW < percentage_building_area < HIGH",
                )),
        )
        .subcommand(
            Command::new("random-og")
                .about("One random off-grid cluster among the largest of a state")
                .arg(
                    Arg::new("state")
                        .help("Display name of the state")
                        .long("state")
                        .short('s')
                        .required(true),
                )
                .arg(
                    Arg::new("limit")
                        .help("Number of largest clusters to pick from")
                        .long("limit")
                        .short('l')
                        .value_parser(clap::value_parser!(i64).range(1..))
                        .default_value("5"),
                ),
        )
}

fn filter_from(matches: &ArgMatches) -> ClusterFilter {
    let range = |name: &str| {
        matches
            .try_get_one::<ValueRange>(name)
            .ok()
            .flatten()
            .copied()
    };
    ClusterFilter {
        area: range("area"),
        distance_grid: range("distance-grid"),
        building: range("building"),
        buildingfp: range("buildingfp"),
    }
}

fn projection_from(matches: &ArgMatches) -> Projection {
    if let Some(column) = matches.get_one::<ClusterColumn>("count") {
        return Projection::Count(*column);
    }
    match matches.get_many::<ClusterColumn>("columns") {
        Some(columns) => Projection::Columns(columns.copied().collect()),
        None => Projection::All,
    }
}

fn rows_to_json(rows: Vec<ViewRow>) -> Value {
    Value::Array(rows.into_iter().map(|row| Value::Object(row.into_map())).collect())
}

async fn run(db: &Database, matches: &ArgMatches) -> Result<Value> {
    let output = match matches.subcommand() {
        Some(("progress", _)) => {
            let mut gauges = serde_json::Map::new();
            for gauge in Gauge::ALL {
                let reading = db.query_gauge(gauge).await?;
                gauges.insert(
                    gauge.max_key().to_string(),
                    json!({
                        "description": gauge.max_description(),
                        "current": reading.current,
                        "maximum": reading.maximum,
                        "percentage": reading.percentage(),
                    }),
                );
            }
            Value::Object(gauges)
        }
        Some(("gauge-max", sub)) => {
            let description = sub.get_one::<String>("description").map(String::as_str).unwrap_or_default();
            Value::String(db.query_gauge_maximum(description).await?)
        }
        Some(("states", _)) => serde_json::to_value(db.get_state_codes().await?)?,
        Some(("regions", _)) => serde_json::to_value(db.get_regions().await?)?,
        Some(("available-og", _)) => serde_json::to_value(db.query_available_og_clusters().await?)?,
        Some((name @ ("clusters" | "og-clusters"), sub)) => {
            let state = sub.get_one::<String>("state").map(String::as_str).unwrap_or_default();
            let limit = sub.get_one::<i64>("limit").copied();
            let filter = filter_from(sub);
            let projection = projection_from(sub);
            let codes = db.get_state_codes().await?;

            let rows = if name == "clusters" {
                db.query_filtered_clusters(state, &codes, &filter, limit, &projection).await?
            } else {
                db.query_filtered_og_clusters(state, &codes, &filter, limit, &projection).await?
            };
            rows_to_json(rows)
        }
        Some(("random-og", sub)) => {
            let state = sub.get_one::<String>("state").map(String::as_str).unwrap_or_default();
            let limit = sub.get_one::<i64>("limit").copied().unwrap_or(DEFAULT_SAMPLE_LIMIT);
            let codes = db.get_state_codes().await?;
            let code = codes.get(state).ok_or_else(|| QueryError::unknown_state(state))?;
            serde_json::to_value(db.get_random_og_cluster(code, Some(WEB_SCHEMA), limit).await?)?
        }
        _ => unreachable!("subcommand_required"),
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let pretty = matches.get_flag("pretty");

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;

    let result = run(&db, &matches).await;
    db.close().await;

    let output = result?;
    if pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_og_cluster_arguments() {
        let matches = build_cli()
            .try_get_matches_from([
                "se4all-query",
                "og-clusters",
                "--state",
                "Lagos",
                "--area",
                "10,50",
                "--buildingfp",
                "-1,5",
                "--limit",
                "3",
                "--columns",
                "adm1_pcode,area_km2",
            ])
            .unwrap();

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "og-clusters");

        let filter = filter_from(sub);
        assert_eq!(filter.area, Some(ValueRange::new(10.0, 50.0)));
        assert_eq!(filter.buildingfp, Some(ValueRange::new(-1.0, 5.0)));
        assert_eq!(filter.distance_grid, None);
        assert_eq!(filter.building, None);
        assert_eq!(sub.get_one::<i64>("limit"), Some(&3));
        assert_eq!(
            projection_from(sub),
            Projection::Columns(vec![ClusterColumn::Adm1Pcode, ClusterColumn::AreaKm2])
        );
    }

    #[test]
    fn test_grid_clusters_have_no_building_filters() {
        let matches = build_cli()
            .try_get_matches_from(["se4all-query", "clusters", "--state", "Lagos", "--count", "area_km2"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        let filter = filter_from(sub);
        assert!(filter.is_empty());
        assert_eq!(projection_from(sub), Projection::Count(ClusterColumn::AreaKm2));

        let err = build_cli().try_get_matches_from([
            "se4all-query",
            "clusters",
            "--state",
            "Lagos",
            "--building",
            "1,2",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let result = build_cli().try_get_matches_from([
            "se4all-query",
            "clusters",
            "--state",
            "Lagos",
            "--area",
            "10",
        ]);
        assert!(result.is_err());
    }
}
