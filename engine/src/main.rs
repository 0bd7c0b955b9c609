// Chart engine CLI: lays out a CSV series (or the built-in one) and prints the result as JSON
use anyhow::{anyhow, Context, Result};
use chart_engine::{ChartSettings, LayoutController};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: chart-engine [CSV_PATH] [CONTENT_WIDTH]";

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = match std::env::var("CHART_CONFIG") {
        Ok(path) => ChartSettings::from_file(&path).with_context(|| format!("Failed to load settings from '{}'", path))?,
        Err(_) => ChartSettings::load_default()?,
    };

    let mut args = std::env::args().skip(1);
    let csv_path = args.next();
    let width = args
        .next()
        .map(|w| w.parse::<f64>().map_err(|e| anyhow!("Invalid CONTENT_WIDTH '{}': {}. {}", w, e, USAGE)))
        .transpose()?;

    let series = match &csv_path {
        Some(path) => Some(settings.csv_loader().load_file(path)?),
        None => {
            info!("no CSV path given, using the built-in series");
            None
        }
    };

    let mut controller = LayoutController::from_settings(&settings);
    controller.set_series(series);
    if let Some(width) = width {
        if !controller.set_viewport_width(width) {
            return Err(anyhow!("CONTENT_WIDTH must be positive, got {}. {}", width, USAGE));
        }
    }

    let layout = controller.layout().ok_or_else(|| anyhow!("layout was not produced"))?;
    println!("{}", serde_json::to_string_pretty(layout)?);
    info!(candles = layout.geometry.len(), "layout written");
    Ok(())
}
