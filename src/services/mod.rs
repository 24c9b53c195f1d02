//! Services module - filesystem and decoding work that runs off the control thread.
//!
//! Both services are framework-agnostic: they know nothing about tabs, stores,
//! or rendering, and report cancellation cooperatively through a
//! `tokio::sync::watch::Receiver<bool>`.
//!
//! # Components
//!
//! - [`DirectoryScanner`]: enumerates media files under a root. Handles:
//!   - Case-insensitive extension allow-list
//!   - Optional recursion and hidden-entry skipping
//!   - Deterministic ordering (sorted by path string, deduplicated)
//!
//! - [`ThumbnailPipeline`]: decodes and downscales images on a dedicated rayon
//!   pool, reporting each result as a [`PipelineEvent`] tagged with the scan
//!   generation that requested it. Decoding is pluggable through
//!   [`ThumbnailDecoder`]; [`ImageThumbnailDecoder`] is the `image`-crate default.
//!
//! # Usage Example
//!
//! ```ignore
//! use gallery_core::services::DirectoryScanner;
//! use tokio::sync::watch;
//!
//! let (_cancel_tx, cancel_rx) = watch::channel(false);
//! let scanner = DirectoryScanner::new(["png", "jpg"]);
//! let paths = scanner.scan_async("/home/me/Pictures".into(), cancel_rx).await?;
//! ```

pub mod scanner;
pub mod thumbnail;

pub use scanner::{DirectoryScanner, ScanError};
pub use thumbnail::{
    ImageThumbnailDecoder, PipelineEvent, PipelineSummary, ThumbnailDecoder, ThumbnailError,
    ThumbnailPipeline, fit_within,
};
