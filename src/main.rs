#![warn(clippy::all)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::process::ExitCode;
use superstore_view::{
    Arguments, DashboardSession, SalesViewApp, SalesViewResult, load_or_fallback, write_exports,
};
use tracing::error;

/*
cargo fmt
cargo test -- --nocapture
cargo test -- --show-output tests_filter_by_location
cargo run -- --help
cargo run -- Superstore.xlsx --start 2016-01-01 -r East,West
cargo run -- Superstore.csv -o exports
cargo doc --open
cargo b -r && cargo install --path=.
*/

/// Runs the pipeline once and writes the four CSV artifacts.
fn run_headless(args: &Arguments) -> SalesViewResult<()> {
    let Some(dir) = &args.export_dir else {
        return Ok(());
    };

    let table = load_or_fallback(args.path.as_deref(), &args.fallback)?;
    let selection = args.selection(&table);

    // RUST_LOG=debug cargo run -- data.csv -o out
    tracing::debug!("main()\nselection: {selection:#?}");

    // Command-line values are applied as given, never pruned by the cascade.
    let session = DashboardSession::with_selection(table, selection);
    let view = session.refresh_strict()?;
    let written = write_exports(&view, dir)?;

    tracing::info!(
        "Wrote {} files to {dir:?}: {} orders, total sales {:.2}",
        written.len(),
        view.filtered.height(),
        view.total_sales
    );

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    // Initialize the tracing subscriber for logging.
    // Use RUST_LOG environment variable to set logging level.  eg `export RUST_LOG=info`
    tracing_subscriber::fmt::init();

    // Parse command-line arguments.
    let args = Arguments::build();

    if args.is_headless() {
        return match run_headless(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    // Configure the native options for the eframe application.
    let native_options = eframe::NativeOptions {
        centered: true,
        persist_window: true,
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_drag_and_drop(true)
            .with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    // Run the eframe application.
    let result = eframe::run_native(
        "Superstore Analysis",
        native_options,
        Box::new(move |creation_context| {
            // Loads FILE_PATH, or the fallback dataset when none is given.
            let app = SalesViewApp::new(creation_context, &args)?;
            Ok(Box::new(app))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Failed to run SalesViewApp: {err}");
            ExitCode::FAILURE
        }
    }
}
