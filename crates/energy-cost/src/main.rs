use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use energy_cost_estimator::prelude::*;
use energy_cost_estimator::{EstimatorConfig, PlanCosts, PlanRecommendation, PricingProvider};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, Level};

const DEFAULT_CONFIG_PATH: &str = "~/.config/energy-cost/config.json";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short = 'v', global = true)]
    verbose: bool,

    /// JSON file with price plans and smart meter accounts.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<String>,

    /// Reading file (`.jsonl`) or a directory of them.
    #[arg(short = 'r', long = "readings", global = true)]
    readings: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimated cost of the meter's readings under every price plan.
    Compare { smart_meter_id: String },

    /// Price plans ordered from cheapest.
    Recommend {
        smart_meter_id: String,

        #[arg(short = 'l', long)]
        limit: Option<usize>,
    },

    /// Usage cost over the last seven days, for enrolled meters.
    Weekly { smart_meter_id: String },

    /// Meters with stored readings.
    Meters,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn load_config(path: Option<&str>) -> Result<EstimatorConfig> {
    let loader = DataLoader::new();

    match path {
        Some(path) => loader.load_config(expand(path)),
        None => {
            let default_path = expand(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                loader.load_config(default_path)
            } else {
                debug!("no config file, using the default price plans");
                Ok(EstimatorConfig::default())
            }
        }
    }
}

fn load_store(readings: Option<&str>) -> Result<MeterReadingStore> {
    let Some(readings) = readings else {
        bail!("No readings given, pass --readings <file or directory>");
    };

    let mut store = MeterReadingStore::new();
    let path = expand(readings);
    let count = DataLoader::new().load_into_store(&path, &mut store)?;
    info!(count, meters = store.meter_ids().len(), "loaded readings");

    Ok(store)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_cost_line(plan_name: &str, cost: &Decimal, energy_supplier: Option<&str>) -> String {
    format!(
        "{:<20} {:<24} {}",
        plan_name,
        energy_supplier.unwrap_or("-"),
        cost
    )
}

fn print_costs(costs: &PlanCosts, pricing: &PricingProvider) {
    let mut costs: Vec<_> = costs.iter().collect();
    costs.sort_by(|a, b| a.0.cmp(b.0));

    for (plan_name, cost) in costs {
        let energy_supplier = pricing
            .get_plan(plan_name)
            .and_then(PricePlan::energy_supplier);
        println!("{}", format_cost_line(plan_name, cost, energy_supplier));
    }
}

fn print_recommendations(recommendations: &[PlanRecommendation]) {
    for (rank, recommendation) in recommendations.iter().enumerate() {
        println!(
            "{}. {:<20} {}",
            rank + 1,
            recommendation.plan_name(),
            recommendation.cost()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = load_config(args.config.as_deref())?;
    let store = load_store(args.readings.as_deref())?;
    let estimator =
        CostEstimator::with_accounts(config.price_plans, store, config.smart_meter_accounts);

    match args.command {
        Command::Compare { smart_meter_id } => {
            let Some(comparison) = estimator.compare_price_plans(&smart_meter_id)? else {
                bail!("No readings for smart meter {}", smart_meter_id);
            };

            if args.json {
                print_json(&comparison)?;
            } else {
                if let Some(plan) = comparison.price_plan_id() {
                    println!("Current plan: {}", plan);
                }
                let pricing = PricingProvider::with_plans(estimator.price_plans().to_vec());
                print_costs(comparison.price_plan_comparisons(), &pricing);
            }
        }
        Command::Recommend {
            smart_meter_id,
            limit,
        } => {
            let Some(recommendations) =
                estimator.recommend_cheapest_plans(&smart_meter_id, limit)?
            else {
                bail!("No readings for smart meter {}", smart_meter_id);
            };

            if args.json {
                print_json(&recommendations)?;
            } else {
                print_recommendations(&recommendations);
            }
        }
        Command::Weekly { smart_meter_id } => {
            let Some(weekly) = estimator.weekly_usage_cost(&smart_meter_id)? else {
                bail!(
                    "Smart meter {} is not enrolled in a price plan",
                    smart_meter_id
                );
            };

            if args.json {
                print_json(&weekly)?;
            } else {
                println!("Cost: {}", weekly.cost());
            }
        }
        Command::Meters => {
            let meter_ids = estimator.reading_store().meter_ids();

            if args.json {
                print_json(&meter_ids)?;
            } else {
                for meter_id in meter_ids {
                    println!("{}", meter_id);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_recommend_with_limit() {
        let args = Args::parse_from([
            "energy-cost",
            "recommend",
            "smart-meter-0",
            "--limit",
            "2",
            "-r",
            "readings.jsonl",
        ]);

        assert_eq!(args.readings.as_deref(), Some("readings.jsonl"));
        match args.command {
            Command::Recommend {
                smart_meter_id,
                limit,
            } => {
                assert_eq!(smart_meter_id, "smart-meter-0");
                assert_eq!(limit, Some(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cost_line_shows_energy_supplier() {
        let cost = Decimal::from(30);

        let line = format_cost_line("price-plan-0", &cost, Some("Dr Evil's Dark Energy"));
        assert!(line.starts_with("price-plan-0"));
        assert!(line.contains("Dr Evil's Dark Energy"));
        assert!(line.ends_with("30"));

        let line = format_cost_line("flat", &cost, None);
        assert!(line.contains(" - "));
    }

    #[test]
    fn test_load_store_requires_readings() {
        assert!(load_store(None).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(load_config(Some("/nonexistent/config.json")).is_err());
    }
}
