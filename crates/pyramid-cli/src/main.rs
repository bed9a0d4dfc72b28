//! pyramid: command-line interface for pyramid-core
//!
//! Prints database statistics, country and state indexes, text pyramids,
//! comparisons and demographic metrics, builds snapshots and serves the
//! JSON API.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ pyramid stats
//!
//! - Pyramid for a country, as shares of the total
//!   $ pyramid pyramid japan 2024 --percent
//!
//! - Bands where two regions differ by more than 20%
//!   $ pyramid compare japan nigeria 2024
//!
//! - Serve the API on another port
//!   $ pyramid serve --port 8080
//!
//! Data source
//! -----------
//!
//! `--data` wins over `[data]` in the config file, which wins over the
//! `data/` directory shipped with `pyramid-core`. A directory is loaded from
//! JSON (and cached as `popdb.bin` next to it); a file is read as a snapshot.
//! Set `RUST_LOG=debug` for loader details.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use pyramid_core::compare::{significant_differences, SIGNIFICANT_THRESHOLD_PCT};
use pyramid_core::format::{format_growth, format_optional_percent, format_population};
use pyramid_core::metrics::DemographicMetrics;
use pyramid_core::pyramid::difference_pyramid;
use pyramid_core::stage;
use pyramid_core::trend::rank_by_growth;
use pyramid_core::{PopDb, PopSearch, PopulationSource, PyramidBuilder, Scale};
use pyramid_cli::config::AppConfig;
use pyramid_cli::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = AppConfig::resolve(args.config.as_deref())?;
    if let Some(data) = args.data {
        config.data.snapshot = None;
        config.data.dir = Some(data);
    }
    let data_path = config.data_path();

    #[cfg(feature = "builder")]
    if let Commands::Build { out, no_compress } = &args.command {
        use pyramid_core::{build_snapshot, CompressionMode};
        let mode = if *no_compress {
            CompressionMode::None
        } else {
            CompressionMode::default()
        };
        let stats = build_snapshot(&data_path, out, mode)
            .with_context(|| format!("building snapshot from {}", data_path.display()))?;
        println!(
            "Wrote {} ({} countries, {} states)",
            out.display(),
            stats.country_datasets,
            stats.state_datasets
        );
        return Ok(());
    }

    let db = PopDb::load_from_path(&data_path)
        .with_context(|| format!("loading data from {}", data_path.display()))?;

    match args.command {
        Commands::Stats => {
            let stats = db.stats();
            println!("Database statistics:");
            println!("  Countries: {} ({} with data)", stats.countries, stats.country_datasets);
            println!("  States: {} ({} with data)", stats.states, stats.state_datasets);
            println!("  Fertility datasets: {}", stats.fertility_datasets);
        }

        Commands::Countries => {
            for c in db.countries() {
                println!("{} ({}) [{}]", c.name, c.code, c.slug);
            }
        }

        Commands::Country { query } => match db.find_country(&query) {
            Some(info) => {
                println!("{} ({})", info.name, info.code);
                println!("  Region: {}", info.region);
                if let Some(sub) = &info.subregion {
                    println!("  Subregion: {sub}");
                }
                match db.country_data(&info.slug) {
                    Ok(data) => {
                        let years: Vec<String> =
                            data.available_years().iter().map(u16::to_string).collect();
                        println!("  Years: {}", years.join(", "));
                    }
                    Err(_) => println!("  No population dataset"),
                }
            }
            None => println!("No country found for '{query}'"),
        },

        Commands::States => {
            for s in db.states() {
                println!("{} ({}) [{}]", s.state_name, s.state_code, s.slug);
            }
        }

        Commands::Search { query } => {
            let countries = db.find_countries_by_substring(&query);
            let states = db.find_states_by_substring(&query);
            if countries.is_empty() && states.is_empty() {
                println!("Nothing matches '{query}'");
            }
            for c in countries {
                println!("country  {} ({}) [{}]", c.name, c.code, c.slug);
            }
            for s in states {
                println!("state    {} ({}) [state:{}]", s.state_name, s.state_code, s.slug);
            }
        }

        Commands::Pyramid {
            slug,
            year,
            percent,
            json,
        } => {
            let source = db.source(&slug)?.as_dyn();
            let data = source.year(year)?;
            let scale = if percent { Scale::Percent } else { Scale::Absolute };
            let chart = PyramidBuilder::from_year(data)
                .title(format!("{} Population Pyramid {year}", source.name()))
                .scale(scale)
                .build();

            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                println!("{}", chart.title.as_deref().unwrap_or_default());
                let (male, female) = (&chart.series[0].values, &chart.series[1].values);
                for (i, label) in chart.labels.iter().enumerate() {
                    let (m, f) = (male[i].abs(), female[i]);
                    match scale {
                        Scale::Percent => println!("{label:>6}  {m:>7.2}%  {f:>7.2}%"),
                        Scale::Absolute => println!(
                            "{label:>6}  {:>8}  {:>8}",
                            format_population(m as u64),
                            format_population(f as u64)
                        ),
                    }
                }
            }
        }

        Commands::Compare { a, b, year } => {
            let first = db.source(&a)?.as_dyn();
            let second = db.source(&b)?.as_dyn();
            let (ya, yb) = (first.year(year)?, second.year(year)?);

            let chart =
                difference_pyramid(&ya.age_groups, &yb.age_groups, first.name(), second.name())?;
            println!("{}", chart.title.as_deref().unwrap_or_default());
            println!(
                "  Total: {} vs {}",
                format_population(ya.total_population),
                format_population(yb.total_population)
            );

            let diffs = significant_differences(
                &ya.age_groups,
                &yb.age_groups,
                first.name(),
                second.name(),
                SIGNIFICANT_THRESHOLD_PCT,
            )?;
            if diffs.is_empty() {
                println!("  No age group differs by more than {SIGNIFICANT_THRESHOLD_PCT}%");
            }
            for d in diffs {
                println!(
                    "  {:>6}  {:>8}  larger: {}",
                    d.age_range,
                    format_optional_percent(d.total_diff_pct),
                    d.larger_name.as_deref().unwrap_or("equal")
                );
            }
        }

        Commands::Metrics { slug, year } => {
            let source = db.source(&slug)?.as_dyn();
            let data = source.year(year)?;
            let m = DemographicMetrics::from_year(data);
            let st = stage::classify(data);

            println!("{} {year}", source.name());
            println!("  Population: {}", format_population(m.total_population));
            if let Some(age) = m.median_age {
                println!("  Median age: {age:.1}");
            }
            println!("  Youth (0-14): {}", format_optional_percent(m.youth_percentage));
            println!("  Working age: {}", format_optional_percent(m.working_age_percentage));
            println!("  Elderly (65+): {}", format_optional_percent(m.elderly_percentage));
            println!("  Dependency ratio: {}", format_optional_percent(m.dependency_ratio));
            println!("  Pyramid type: {:?}", m.pyramid_type);
            println!("  {}", st.explain(source.name()));
        }

        Commands::Growth { from, to, limit } => {
            for g in rank_by_growth(db.country_data.values(), from, to)
                .into_iter()
                .take(limit)
            {
                println!(
                    "{:<32} {:>10} -> {:>10}  {}",
                    g.name,
                    format_population(g.from_population),
                    format_population(g.to_population),
                    g.growth_pct.map(format_growth).unwrap_or_default()
                );
            }
        }

        // Handled before loading.
        #[cfg(feature = "builder")]
        Commands::Build { .. } => {}

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::start_server(&config, db).await?;
        }
    }

    Ok(())
}
