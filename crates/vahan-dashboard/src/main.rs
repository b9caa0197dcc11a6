mod bootstrap;
mod report;

use anyhow::Result;
use vahan_core::settings::Settings;
use vahan_data::analysis::analyze_registrations;
use vahan_data::filter::RegistrationFilter;
use vahan_data::ingestion::{get_data, DataSource, SourceOptions};

use crate::report::View;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .unwrap_or_else(|| bootstrap::default_log_file(&app_dir));
    bootstrap::setup_logging(&settings.log_level, Some(&log_file))?;

    tracing::info!("Vahan dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    if let Err(e) = settings.store_last_used() {
        tracing::warn!(error = %e, "could not save last-used parameters");
    }
    tracing::info!(
        "Source: {}, View: {}, Format: {}",
        settings.source,
        settings.view,
        settings.format
    );

    settings.validate()?;

    let source: DataSource = settings.source.parse()?;
    let options = SourceOptions {
        csv_path: settings.csv_path.clone(),
        headless: settings.headless,
    };
    let records = get_data(source, &options)?;

    let filter = filter_from_settings(&settings);
    let report = analyze_registrations(&records, &filter);

    let output = match settings.format.as_str() {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => report::render(
            &report,
            View::from_name(&settings.view),
            settings.recent_months as usize,
        ),
    };
    println!("{}", output);

    Ok(())
}

/// Build the row selection from the command-line filter flags.
fn filter_from_settings(settings: &Settings) -> RegistrationFilter {
    let mut filter = RegistrationFilter::new()
        .with_categories(settings.categories.iter().copied())
        .with_manufacturers(settings.manufacturers.iter().cloned());
    filter.start_date = settings.start_date;
    filter.end_date = settings.end_date;
    filter
}
