use serde::{Deserialize, Serialize};

use super::item::DEFAULT_VIDEO_EXTENSIONS;

/// All tunables of the gallery engine, loaded from `gallery.yaml`.
///
/// Every section carries serde defaults so a partial (or missing) file
/// still produces a usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GallerySettings {
    pub scan: ScanSettings,
    pub thumbnails: ThumbnailSettings,
    pub pagination: PaginationSettings,
    pub layout: LayoutSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Accepted image extensions, without leading dot.
    pub image_extensions: Vec<String>,

    /// Extensions classified as video.
    pub video_extensions: Vec<String>,

    /// Whether video files are part of the scan allow-list.
    pub include_videos: bool,

    pub recursive: bool,

    /// Skip dot-files and do not descend into dot-directories.
    pub skip_hidden: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            image_extensions: ["png", "jpg", "jpeg", "bmp", "webp", "gif", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_videos: false,
            recursive: true,
            skip_hidden: true,
        }
    }
}

impl ScanSettings {
    /// The effective extension allow-list for a scan.
    pub fn allowed_extensions(&self) -> Vec<String> {
        let mut all = self.image_extensions.clone();
        if self.include_videos {
            all.extend(self.video_extensions.iter().cloned());
        }
        all
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Edge of the square every thumbnail is fitted into, in pixels.
    pub size: u32,

    /// Decode threads; 0 lets rayon pick.
    pub workers: usize,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            size: 180,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub found_page_size: usize,
    pub selected_page_size: usize,

    /// Choices offered by page-size pickers ("All" is always implied).
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            found_page_size: 100,
            selected_page_size: 100,
            page_size_options: vec![20, 50, 100, 1000],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Space between a thumbnail and its tile border.
    pub padding: f32,

    /// Extra space between neighbouring tiles.
    pub spacing: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            padding: 10.0,
            spacing: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_dir: String,
    pub log_prefix: String,
    pub debug_mode: bool,
    pub console_output: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            log_prefix: "gallery-core".to_string(),
            debug_mode: false,
            console_output: true,
        }
    }
}
