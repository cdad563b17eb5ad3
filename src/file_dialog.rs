use crate::{SalesViewError, SalesViewResult};

use egui::Context;
use rfd::AsyncFileDialog;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tokio::sync::oneshot;
use tracing::error;

/// Opens a file dialog asynchronously, allowing the user to choose a dataset.
///
/// This function uses the `rfd::AsyncFileDialog` to present a native file dialog
/// filtered to the supported formats. If the user cancels the dialog, the function
/// returns a `SalesViewError::FileNotFound` error with an empty path.
///
/// # Returns
///
/// - `Ok(PathBuf)`: The path to the selected file.
/// - `Err(SalesViewError::FileNotFound)`: If the user cancels the dialog.
pub async fn open_file() -> SalesViewResult<PathBuf> {
    let opt_file = AsyncFileDialog::new()
        .add_filter("Sales data", &["csv", "txt", "xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Tab-separated text", &["txt"])
        .add_filter("Excel", &["xlsx", "xls"])
        .pick_file()
        .await;

    opt_file
        .map(|file| file.path().to_path_buf()) // Extract PathBuf from FileHandle.
        .ok_or_else(|| SalesViewError::FileNotFound(PathBuf::new())) // Convert None to error.
}

/// Asks the user where to save `bytes`, pre-filling `file_name`, and writes them there.
///
/// ### Arguments
///
/// * `bytes`: The CSV artifact (or sample file) to save.
/// * `file_name`: Default name offered by the dialog (e.g. `Category.csv`).
/// * `ctx`: The `egui::Context`, repainted once the write completes.
///
/// ### Returns
///
/// `Ok(Some(path))` after a successful write, `Ok(None)` if the user cancelled.
pub async fn save_bytes(
    bytes: Vec<u8>,
    file_name: String,
    ctx: Context,
) -> SalesViewResult<Option<PathBuf>> {
    // 1. Open the save dialog with the default file name.
    let file = AsyncFileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(&file_name)
        .save_file()
        .await;

    // 2. Cancelled: nothing to write.
    let Some(file) = file else {
        return Ok(None);
    };

    // 3. Write off the UI thread.
    let path = file.path().to_path_buf();
    write_bytes(path.clone(), bytes).await?;

    tracing::info!("Saved {file_name} to {path:?}");
    ctx.request_repaint();

    Ok(Some(path))
}

/// Writes `bytes` to `path` on the blocking thread pool.
///
/// The result of the write travels back through a oneshot channel, so a panicking
/// writer surfaces as `ChannelReceive` instead of hanging the caller.
pub async fn write_bytes(path: PathBuf, bytes: Vec<u8>) -> SalesViewResult<()> {
    // 1. Create a channel for the write result *before* spawning the blocking task.
    let (tx, rx) = oneshot::channel::<SalesViewResult<()>>();

    // 2. Spawn a blocking task for file I/O.
    let handle = tokio::task::spawn_blocking(move || {
        let result = File::create(&path)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                writer.write_all(&bytes)?;
                writer.flush()
            })
            .map_err(SalesViewError::from);

        if tx.send(result).is_err() {
            error!("The receiver has been dropped.");
        }
    });

    // 3. Await the write result, then the task itself.
    let result = rx
        .await
        .map_err(|e| SalesViewError::ChannelReceive(e.to_string()))?;
    handle.await?;

    result
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
