//! Admitted patient care Sankey exporter binary.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use apc_loader::FlowGraphBuilder;
use apc_sankey::{run, SankeyFigure, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!("Loading admitted patient care data from: {}", settings.data_path.display());
    match settings.period {
        Some(period) => tracing::info!("Reporting period: {}", period),
        None => tracing::info!("Reporting period: all years"),
    }

    let builder = FlowGraphBuilder::admissions();
    let report = run(&settings, &builder)?;

    let figure = SankeyFigure::new(&report.graph, builder.palette(), settings.title.as_str());

    match &settings.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            figure.write_json(&mut writer)?;
            writer.flush()?;
            tracing::info!("Wrote Sankey figure to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            figure.write_json(&mut writer)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
