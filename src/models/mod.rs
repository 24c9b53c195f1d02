//! Data models for the gallery engine.
//!
//! - [`GalleryItem`]: one tile of a gallery, keyed by path, with its [`ThumbnailState`]
//! - [`Thumbnail`]: shared RGBA8 bitmap produced by the thumbnail pipeline
//! - [`Point`], [`Rect`], [`Viewport`]: content-space geometry for marquee hit testing
//! - [`GallerySettings`]: tunables loaded from `gallery.yaml`
//!
//! Models carry no behaviour beyond small helpers; the state lives in
//! [`GalleryStore`](crate::state::GalleryStore) and is driven by
//! [`TabController`](crate::ui::TabController).

pub mod config;
pub mod geometry;
pub mod item;

pub use config::{
    GallerySettings, LayoutSettings, LoggingSettings, PaginationSettings, ScanSettings,
    ThumbnailSettings,
};
pub use geometry::{Point, Rect, Viewport};
pub use item::{GalleryItem, MediaKind, Thumbnail, ThumbnailState, DEFAULT_VIDEO_EXTENSIONS};
