use std::sync::Arc;

use brent::{Dashboard, DashboardConfig, LoadOutcome, LoadState, MarkerPayload, NaiveDate};
use brent_mock::MockSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "brent=debug".into()))
        .init();

    // 1. Pick a source: the live backend when asked for, the fixture mock otherwise.
    let config = DashboardConfig::from_env()?;
    let builder = Dashboard::builder().config(config.clone());
    let mut dash = if std::env::var("BRENT_DEMO_USE_HTTP").is_ok() {
        println!("--- (Using backend at {}) ---", config.base_url);
        builder.build()?
    } else {
        println!("--- (Using mock source) ---");
        builder.with_source(Arc::new(MockSource::new())).build()?
    };

    // 2. Initial load over the full history.
    if let Some(handle) = dash.mount() {
        report("mount", handle.wait().await);
    }

    // 3. An invalid edit is rejected and never reaches the backend.
    dash.set_draft_end(NaiveDate::from_ymd_opt(2020, 3, 31))?;
    if let Err(e) = dash.set_draft_start(NaiveDate::from_ymd_opt(2020, 4, 15)) {
        println!("draft rejected: {e}");
    }

    // 4. Narrow to March 2020 and reload.
    dash.set_draft_start(NaiveDate::from_ymd_opt(2020, 3, 1))?;
    let handle = dash.apply()?;
    report("apply", handle.wait().await);

    if let Some(view) = dash.view() {
        println!("\n{} prices, {} markers", view.series.len(), view.markers.len());
        for m in &view.markers {
            let off = if view.is_within_series(m) { "" } else { " (off-series)" };
            match &m.payload {
                MarkerPayload::ChangePoint { probability } => {
                    println!("  {}  change point p={probability:.2}{off}", m.date);
                }
                MarkerPayload::Event { category, description } => {
                    println!(
                        "  {}  [{category}/{}] {description}{off}",
                        m.date,
                        category.display_color()
                    );
                }
            }
        }
    }
    Ok(())
}

fn report(step: &str, outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Applied(LoadState::Loaded(ds)) => println!(
            "{step}: loaded {} prices, {} change points, {} events for {}",
            ds.prices.len(),
            ds.change_points.len(),
            ds.events.len(),
            ds.range
        ),
        LoadOutcome::Applied(LoadState::Failed { error, .. }) => {
            println!("{step}: failed ({}): {error}", error.code());
        }
        LoadOutcome::Applied(other) => println!("{step}: {other:?}"),
        LoadOutcome::Superseded => println!("{step}: superseded"),
    }
}
