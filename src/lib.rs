// gallery-core - Scan, thumbnail, and marquee-select engine for paired galleries
//
// This is the library crate containing the engine. The binary crate (main.rs)
// is a headless driver that scans a directory and prints the selection.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use metrics::Metrics;
pub use models::{GalleryItem, GallerySettings, MediaKind, Point, Rect, ThumbnailState, Viewport};
pub use services::{DirectoryScanner, ImageThumbnailDecoder, ThumbnailDecoder, ThumbnailPipeline};
pub use state::{GalleryChange, GalleryRole, GalleryStore, PageInfo, SelectionMode};
pub use ui::{GalleryView, TabController, TabEvent, TabStatus, ViewBridge};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
