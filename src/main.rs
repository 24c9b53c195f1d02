//! gallery-core - headless driver for the gallery engine
//!
//! Scans a directory the way a gallery tab would, loads thumbnails, selects
//! the first page, moves it into the selected gallery, and prints the
//! resulting paths.
//!
//! # Execution Flow
//!
//! 1. Load settings from `<config-dir>/gallery.yaml` plus `GALLERY__*` overrides
//! 2. Initialize logging (rotating file + optional console), then report where
//!    the settings came from
//! 3. Create a multi-thread tokio runtime
//! 4. Start the scan with a logging view attached through [`ViewBridge`]
//! 5. Run until the tab settles
//! 6. Select the first page, move it to the selected gallery, print the paths
//! 7. Shut down and log the metrics summary

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gallery_core::state::PageInfo;
use gallery_core::{
    APP_NAME, ConfigManager, GalleryRole, GalleryView, ImageThumbnailDecoder, TabController,
    TabStatus, VERSION, ViewBridge,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gallery-core", version, about = "Scan a directory into a gallery and select its first page")]
struct Args {
    /// Directory to scan
    dir: Utf8PathBuf,

    /// Directory holding gallery.yaml
    #[arg(long, default_value = "config")]
    config_dir: Utf8PathBuf,

    /// Override the found gallery's page size
    #[arg(long)]
    page_size: Option<usize>,

    /// Debug-level logging
    #[arg(long)]
    debug: bool,
}

/// Logs what a real view would render.
struct LoggingView;

impl GalleryView for LoggingView {
    fn items_replaced(&mut self, gallery: GalleryRole, total: usize, visible: usize) {
        tracing::info!("[{}] {} items ({} visible)", gallery, total, visible);
    }

    fn thumbnail_ready(&mut self, gallery: GalleryRole, path: &Utf8Path, loaded: bool) {
        if !loaded {
            tracing::warn!("[{}] no thumbnail for {}", gallery, path);
        }
    }

    fn page_changed(&mut self, gallery: GalleryRole, page: PageInfo) {
        tracing::debug!(
            "[{}] page {}/{} ({} per page)",
            gallery,
            page.page_index + 1,
            page.page_count.max(1),
            page.page_size
        );
    }

    fn status_changed(&mut self, status: TabStatus) {
        tracing::info!("Status: {}", status);
    }

    fn scan_failed(&mut self, root: &Utf8Path, message: &str) {
        tracing::error!("Scan of {} failed: {}", root, message);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    if args.debug {
        settings.logging.debug_mode = true;
    }
    if let Some(page_size) = args.page_size {
        settings.pagination.found_page_size = page_size;
    }

    let _guard = gallery_core::logging::init(&settings.logging)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    if config_manager.has_settings_file() {
        tracing::info!("Settings loaded from {}", config_manager.settings_path());
    } else {
        tracing::warn!(
            "No settings file at {}, using defaults and environment",
            config_manager.settings_path()
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gallery-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let result = runtime.block_on(run(args.dir, settings));

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Shutdown complete");
    result
}

async fn run(dir: Utf8PathBuf, settings: gallery_core::GallerySettings) -> Result<()> {
    let mut tab = TabController::new(settings, Arc::new(ImageThumbnailDecoder))
        .context("Failed to create tab controller")?;
    let bridge = ViewBridge::spawn(tab.attach_view(), LoggingView)
        .context("Failed to start view bridge")?;

    tab.start_scan(dir.clone()).await;
    tab.run_until_settled().await;

    let failed = tab.status() == TabStatus::Idle;
    if !failed {
        tab.select_all_on_current_page(GalleryRole::Found);
        tab.move_selected_to_target();

        for path in tab.selected_paths() {
            println!("{}", path);
        }
    }

    tab.shutdown().await;
    tab.metrics().log_summary();

    // Dropping the controller closes the view feed and ends the bridge
    drop(tab);
    if bridge.join().is_err() {
        tracing::warn!("View bridge thread panicked");
    }

    if failed {
        bail!("Scan of {} failed", dir);
    }
    Ok(())
}
