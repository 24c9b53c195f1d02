use crate::metrics::Metrics;
use crate::models::{GalleryItem, MediaKind, Thumbnail, ThumbnailState};
use camino::{Utf8Path, Utf8PathBuf};
use image::ImageReader;
use image::imageops::FilterType;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Errors from producing a single thumbnail (or from setting up the pool).
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: Utf8PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image has no pixels: {0}")]
    Empty(Utf8PathBuf),

    #[error("No thumbnail decoder for {kind:?} file {path}")]
    Unsupported { path: Utf8PathBuf, kind: MediaKind },

    #[error("Failed to build decode thread pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Decode + resize primitive used by the pipeline.
///
/// Implementations must return a bitmap that fits inside a
/// `target_size` x `target_size` square with the source aspect ratio.
#[cfg_attr(test, mockall::automock)]
pub trait ThumbnailDecoder: Send + Sync {
    fn decode(
        &self,
        path: &Utf8Path,
        kind: MediaKind,
        target_size: u32,
    ) -> Result<Thumbnail, ThumbnailError>;
}

/// Default decoder backed by the `image` crate. Videos are not decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageThumbnailDecoder;

impl ThumbnailDecoder for ImageThumbnailDecoder {
    fn decode(
        &self,
        path: &Utf8Path,
        kind: MediaKind,
        target_size: u32,
    ) -> Result<Thumbnail, ThumbnailError> {
        if kind == MediaKind::Video {
            return Err(ThumbnailError::Unsupported {
                path: path.to_path_buf(),
                kind,
            });
        }

        let open_err = |source| ThumbnailError::Open {
            path: path.to_path_buf(),
            source,
        };

        // Sniff the format from content so mislabeled files still decode
        let image = ImageReader::open(path)
            .map_err(open_err)?
            .with_guessed_format()
            .map_err(open_err)?
            .decode()
            .map_err(|source| ThumbnailError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let (width, height) = fit_within(image.width(), image.height(), target_size);
        if width == 0 || height == 0 {
            return Err(ThumbnailError::Empty(path.to_path_buf()));
        }

        let rgba = image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();

        Ok(Thumbnail::new(rgba.width(), rgba.height(), rgba.into_raw()))
    }
}

/// Scale `width` x `height` so the longer side equals `target`, keeping the
/// aspect ratio. The shorter side never rounds down to zero.
pub fn fit_within(width: u32, height: u32, target: u32) -> (u32, u32) {
    if width == 0 || height == 0 || target == 0 {
        return (0, 0);
    }

    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as u64 * target as u64 + long as u64 / 2) / long as u64;
        scaled.max(1) as u32
    };

    if width >= height {
        (target, scale(height, width))
    } else {
        (scale(width, height), target)
    }
}

/// Output of a running pipeline, tagged with the job generation.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// One item finished decoding (successfully or not).
    Ready {
        generation: u64,
        path: Utf8PathBuf,
        state: ThumbnailState,
    },

    /// Every item of the snapshot was processed. Not sent when cancelled.
    Finished {
        generation: u64,
        loaded: usize,
        failed: usize,
    },
}

/// Totals of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub loaded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Turns an item snapshot into thumbnails, one event per item.
///
/// Decoding runs on a dedicated rayon pool so a large batch never competes
/// with tokio's workers. Cancellation is cooperative: the watch flag is
/// checked before and after every decode, and once it is set no further
/// events are emitted.
pub struct ThumbnailPipeline {
    decoder: Arc<dyn ThumbnailDecoder>,
    target_size: u32,
    pool: rayon::ThreadPool,
    metrics: Arc<Metrics>,
}

impl ThumbnailPipeline {
    /// # Arguments
    /// * `decoder` - Decode + resize primitive
    /// * `target_size` - Edge of the square thumbnails are fitted into
    /// * `workers` - Decode threads (0 = rayon default)
    /// * `metrics` - Shared counters
    pub fn new(
        decoder: Arc<dyn ThumbnailDecoder>,
        target_size: u32,
        workers: usize,
        metrics: Arc<Metrics>,
    ) -> Result<Self, ThumbnailError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("thumbnail-decode-{}", i));
        if workers > 0 {
            builder = builder.num_threads(workers);
        }

        Ok(Self {
            decoder,
            target_size,
            pool: builder.build()?,
            metrics,
        })
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Build the `Pending` placeholder items for a scan result, in order.
    pub fn placeholders(paths: Vec<Utf8PathBuf>, video_extensions: &[String]) -> Vec<GalleryItem> {
        paths
            .into_iter()
            .map(|path| {
                let kind = MediaKind::classify(&path, video_extensions);
                GalleryItem::pending(path, kind)
            })
            .collect()
    }

    /// Process `snapshot` on the calling thread, blocking until every item
    /// is done or `cancel` is raised.
    pub fn run<F>(
        &self,
        generation: u64,
        snapshot: &[GalleryItem],
        cancel: &watch::Receiver<bool>,
        emit: F,
    ) -> PipelineSummary
    where
        F: Fn(PipelineEvent) + Sync,
    {
        let loaded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        tracing::debug!(
            "Thumbnail job {} started: {} items at {}px",
            generation,
            snapshot.len(),
            self.target_size
        );

        self.pool.install(|| {
            snapshot.par_iter().for_each(|item| {
                if *cancel.borrow() {
                    return;
                }

                let started = Instant::now();
                let state = match self.decoder.decode(&item.path, item.kind, self.target_size) {
                    Ok(thumbnail) => {
                        loaded.fetch_add(1, Ordering::Relaxed);
                        self.metrics.record_thumbnail_loaded();
                        ThumbnailState::Loaded(Arc::new(thumbnail))
                    }
                    Err(e) => {
                        tracing::debug!("Thumbnail failed: {}", e);
                        failed.fetch_add(1, Ordering::Relaxed);
                        self.metrics.record_thumbnail_failed();
                        ThumbnailState::Failed
                    }
                };
                self.metrics.record_decode_time(started.elapsed());

                if *cancel.borrow() {
                    return;
                }

                tracing::trace!("Thumbnail ready: {}", item.path);
                emit(PipelineEvent::Ready {
                    generation,
                    path: item.path.clone(),
                    state,
                });
            });
        });

        let summary = PipelineSummary {
            loaded: loaded.into_inner(),
            failed: failed.into_inner(),
            cancelled: *cancel.borrow(),
        };

        if summary.cancelled {
            tracing::debug!("Thumbnail job {} cancelled", generation);
        } else {
            emit(PipelineEvent::Finished {
                generation,
                loaded: summary.loaded,
                failed: summary.failed,
            });
            tracing::info!(
                "Thumbnail job {} finished: {} loaded, {} failed",
                generation,
                summary.loaded,
                summary.failed
            );
        }

        summary
    }

    /// Run the pipeline on tokio's blocking pool.
    pub fn spawn<F>(
        self: &Arc<Self>,
        generation: u64,
        snapshot: Vec<GalleryItem>,
        cancel: watch::Receiver<bool>,
        emit: F,
    ) -> JoinHandle<PipelineSummary>
    where
        F: Fn(PipelineEvent) + Send + Sync + 'static,
    {
        let pipeline = Arc::clone(self);
        tokio::task::spawn_blocking(move || pipeline.run(generation, &snapshot, &cancel, emit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn solid(size: u32) -> Thumbnail {
        Thumbnail::new(size, size, vec![0u8; (size * size * 4) as usize])
    }

    fn items(names: &[&str]) -> Vec<GalleryItem> {
        names
            .iter()
            .map(|n| GalleryItem::pending(format!("/pics/{}", n), MediaKind::Image))
            .collect()
    }

    fn pipeline(decoder: MockThumbnailDecoder, workers: usize) -> ThumbnailPipeline {
        ThumbnailPipeline::new(Arc::new(decoder), 64, workers, Arc::new(Metrics::new())).unwrap()
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(400, 200, 100), (100, 50));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within(300, 900, 180), (60, 180));
    }

    #[test]
    fn test_fit_within_extreme_ratio() {
        assert_eq!(fit_within(10_000, 1, 100), (100, 1));
        assert_eq!(fit_within(0, 10, 100), (0, 0));
    }

    #[test]
    fn test_placeholders_are_pending() {
        let videos = vec!["mp4".to_string()];
        let placeholders = ThumbnailPipeline::placeholders(
            vec!["/a/x.png".into(), "/a/y.mp4".into()],
            &videos,
        );

        assert_eq!(placeholders.len(), 2);
        assert!(placeholders.iter().all(|i| i.thumbnail.is_pending()));
        assert_eq!(placeholders[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_corrupt_item_fails_alone() {
        let mut decoder = MockThumbnailDecoder::new();
        decoder.expect_decode().times(3).returning(|path, kind, size| {
            if path.as_str().contains("corrupt") {
                Err(ThumbnailError::Unsupported {
                    path: path.to_path_buf(),
                    kind,
                })
            } else {
                Ok(solid(size))
            }
        });

        let events = Mutex::new(Vec::new());
        let summary = pipeline(decoder, 2).run(
            7,
            &items(&["one.png", "corrupt.png", "three.png"]),
            &watch::channel(false).1,
            |event| events.lock().unwrap().push(event),
        );

        assert_eq!(
            summary,
            PipelineSummary {
                loaded: 2,
                failed: 1,
                cancelled: false
            }
        );

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 4);
        for event in &events[..3] {
            match event {
                PipelineEvent::Ready {
                    generation,
                    path,
                    state,
                } => {
                    assert_eq!(*generation, 7);
                    assert_eq!(path.as_str().contains("corrupt"), state.is_failed());
                }
                other => panic!("Unexpected event: {:?}", other),
            }
        }
        assert!(matches!(
            events[3],
            PipelineEvent::Finished {
                generation: 7,
                loaded: 2,
                failed: 1
            }
        ));
    }

    #[test]
    fn test_cancellation_stops_events() {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancel_tx = Arc::new(cancel_tx);

        let mut decoder = MockThumbnailDecoder::new();
        let trigger = cancel_tx.clone();
        decoder.expect_decode().times(1).returning(move |_, _, size| {
            let _ = trigger.send(true);
            Ok(solid(size))
        });

        let events = Mutex::new(Vec::new());
        let summary = pipeline(decoder, 1).run(
            1,
            &items(&["a.png", "b.png", "c.png"]),
            &cancel_rx,
            |event| events.lock().unwrap().push(event),
        );

        assert!(summary.cancelled);
        assert!(events.into_inner().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_off_thread() {
        let mut decoder = MockThumbnailDecoder::new();
        decoder
            .expect_decode()
            .times(2)
            .returning(|_, _, size| Ok(solid(size)));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let pipeline = Arc::new(pipeline(decoder, 1));
        let handle = pipeline.spawn(3, items(&["a.png", "b.png"]), watch::channel(false).1, move |e| {
            let _ = tx.send(e);
        });

        let summary = handle.await.unwrap();
        assert_eq!(summary.loaded, 2);

        let mut ready = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, PipelineEvent::Ready { .. }) {
                ready += 1;
            }
        }
        assert_eq!(ready, 2);
    }
}
