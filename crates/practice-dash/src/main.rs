mod bootstrap;

use anyhow::{Context, Result};
use practice_core::settings::Settings;
use practice_data::catalog::InstrumentFilter;
use practice_runtime::context::DashboardContext;
use practice_runtime::views::{self, ViewKind};
use practice_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Practice Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Timezone: {}",
        settings.view,
        settings.theme,
        settings.timezone
    );

    let paths = settings.data_paths();
    let ctx = DashboardContext::load(&paths).with_context(|| {
        format!(
            "cannot start: exports under {} could not be loaded",
            paths.data_root.display()
        )
    })?;

    let filter = InstrumentFilter::new(settings.instruments.iter().cloned());

    match settings.view.as_str() {
        "dashboard" => {
            let app = App::new(
                &settings.theme,
                &settings.timezone,
                filter,
                settings.exercise.as_deref(),
                settings.top as usize,
                &ctx,
            );

            // Ctrl+C is also caught at the OS level in case it arrives while
            // the terminal is not in raw mode.
            tokio::select! {
                result = app.run(ctx) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        view => {
            let kind: ViewKind = view.parse()?;
            tracing::info!("Exporting {} view as JSON", kind);
            let value = views::export_json(&ctx, kind, &filter, settings.exercise.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
