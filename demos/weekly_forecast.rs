//! Walks one session through sign-up, location selection and a weekly forecast,
//! using in-memory models so it runs without trained artifacts.

use chrono::NaiveDate;
use hyperlocal_weather::{
    report_to_frame, Catalog, DecisionTree, Forecaster, LinearModel, Location,
    MemoryIdentityProvider, MemoryStore, ModelArtifact, RandomForest, TreeNode, View,
    CSV_FILE_NAME,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    configure_polars_display();

    let catalog = Catalog::builtin();
    let mut store = MemoryStore::new();
    for profile in catalog.profiles() {
        for (i, target) in profile.targets().iter().enumerate() {
            // Toy models: a seasonal split for the first target, linear trends for the rest.
            let model = if i == 0 {
                ModelArtifact::RandomForest(RandomForest {
                    n_features: 6,
                    trees: vec![DecisionTree {
                        nodes: vec![
                            TreeNode::Split {
                                feature: 5,
                                threshold: 2.5,
                                left: 1,
                                right: 2,
                            },
                            TreeNode::Leaf { value: 31.2 },
                            TreeNode::Leaf { value: 27.4 },
                        ],
                    }],
                })
            } else {
                ModelArtifact::Linear(LinearModel {
                    intercept: 10.0 * i as f64,
                    coefficients: vec![0.0, 0.5, 0.1, 0.2, 0.0, 0.0],
                })
            };
            store.insert(profile.location(), target.artifact_key.clone(), Arc::new(model));
        }
    }

    let forecaster = Forecaster::builder()
        .identity(Arc::new(MemoryIdentityProvider::new()))
        .store(Arc::new(store))
        .catalog(catalog)
        .build()
        .await?;

    let mut state = forecaster.new_session();
    let mut session = forecaster.session(&mut state);
    session.sign_up("Demo", "demo@example.org", "demo-password")?;
    session.navigate(View::SelectingLocation)?;
    session.select_location("nsukka".parse()?).await?;
    session.navigate(View::Predicting)?;

    let date = NaiveDate::from_ymd_opt(2021, 1, 1).ok_or("invalid date")?;
    let daily = session.submit_date(date)?;
    println!("{}", serde_json::to_string_pretty(daily)?);

    if let Some(weekly) = state.current_weekly() {
        println!("{}", report_to_frame(weekly)?);
        let csv = weekly.to_csv()?;
        println!("{} ({} bytes):", CSV_FILE_NAME, csv.len());
        println!("{}", String::from_utf8_lossy(&csv));
    }

    let ayingba = forecaster.forecast_daily(Location::Ayingba, date).await?;
    println!("{}", report_to_frame(&ayingba)?);
    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show every row of a week
    env::set_var("POLARS_FMT_MAX_ROWS", "70");
}
