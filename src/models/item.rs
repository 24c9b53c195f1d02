use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::sync::Arc;

/// Extensions treated as video when no settings override them.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] =
    &["mp4", "mkv", "avi", "mov", "webm", "wmv", "flv", "m4v"];

/// What kind of media a gallery tile represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a path by its extension against a list of video extensions
    /// (lowercase, no leading dot). Anything else is an image.
    pub fn classify(path: &Utf8Path, video_extensions: &[String]) -> Self {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                if video_extensions.iter().any(|v| *v == ext) {
                    MediaKind::Video
                } else {
                    MediaKind::Image
                }
            }
            None => MediaKind::Image,
        }
    }
}

/// Decoded RGBA8 thumbnail bitmap. The pixel buffer is shared, so cloning
/// a thumbnail between the found and selected galleries costs nothing.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Lifecycle of a tile's thumbnail. Starts `Pending` and is written once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThumbnailState {
    #[default]
    Pending,
    Loaded(Arc<Thumbnail>),
    Failed,
}

impl ThumbnailState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ThumbnailState::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ThumbnailState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ThumbnailState::Failed)
    }
}

/// One entry of a gallery, keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub path: Utf8PathBuf,
    pub kind: MediaKind,
    pub thumbnail: ThumbnailState,
}

impl GalleryItem {
    /// A freshly scanned item with a placeholder thumbnail.
    pub fn pending(path: impl Into<Utf8PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
            thumbnail: ThumbnailState::Pending,
        }
    }
}
