use energy_cost_estimator::prelude::*;
use energy_cost_estimator::PricingProvider;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <readings.jsonl | readings-dir>", args[0]);
        std::process::exit(1);
    }

    let path = shellexpand::tilde(&args[1]);
    let path = Path::new(path.as_ref());
    println!("Loading readings from: {}", path.display());

    let mut store = MeterReadingStore::new();
    let count = DataLoader::new().load_into_store(path, &mut store)?;
    let meter_ids: Vec<String> = store.meter_ids().into_iter().map(String::from).collect();
    println!("Loaded {} readings for {} meters", count, meter_ids.len());

    let estimator = CostEstimator::new(PricingProvider::new().into_plans(), store);

    for meter_id in &meter_ids {
        println!("\n--- {} ---", meter_id);

        match estimator.recommend_cheapest_plans(meter_id, None) {
            Ok(Some(recommendations)) => {
                for recommendation in recommendations {
                    println!("{}: {}", recommendation.plan_name(), recommendation.cost());
                }
            }
            Ok(None) => println!("No readings"),
            Err(e) => println!("Cannot estimate: {}", e),
        }
    }

    Ok(())
}
