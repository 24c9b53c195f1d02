// ViewBridge - Forwards tab events to a rendering toolkit
//
// The controller only publishes TabEvents. A toolkit plugs in by implementing
// GalleryView; the bridge runs a thread that blocks on the view's own event
// channel and calls the view for each event, so the toolkit never touches the
// tokio runtime.

use crate::state::{GalleryChange, GalleryRole, PageInfo};
use crate::ui::controller::{TabEvent, TabStatus};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

/// Rendering-side callbacks. Every method defaults to doing nothing, so a
/// view only implements what it draws.
pub trait GalleryView: Send + 'static {
    fn items_replaced(&mut self, _gallery: GalleryRole, _total: usize, _visible: usize) {}

    fn thumbnail_ready(&mut self, _gallery: GalleryRole, _path: &Utf8Path, _loaded: bool) {}

    /// Restyle only the tiles named here.
    fn selection_changed(
        &mut self,
        _gallery: GalleryRole,
        _added: &[Utf8PathBuf],
        _removed: &[Utf8PathBuf],
    ) {
    }

    fn page_changed(&mut self, _gallery: GalleryRole, _page: PageInfo) {}

    fn status_changed(&mut self, _status: TabStatus) {}

    fn scan_failed(&mut self, _root: &Utf8Path, _message: &str) {}
}

/// Route one event to the matching view callback.
pub fn dispatch<V: GalleryView + ?Sized>(view: &mut V, event: &TabEvent) {
    match event {
        TabEvent::Gallery { gallery, change } => match change {
            GalleryChange::ItemsReplaced { total, visible } => {
                view.items_replaced(*gallery, *total, *visible)
            }
            GalleryChange::ThumbnailReady { path, loaded } => {
                view.thumbnail_ready(*gallery, path, *loaded)
            }
            GalleryChange::SelectionChanged { added, removed } => {
                view.selection_changed(*gallery, added, removed)
            }
            GalleryChange::PageChanged(page) => view.page_changed(*gallery, *page),
        },
        TabEvent::StatusChanged { status } => view.status_changed(*status),
        TabEvent::ScanFailed { root, message } => view.scan_failed(root, message),
    }
}

/// Thread feeding a [`GalleryView`] from
/// [`TabController::attach_view`](crate::ui::TabController::attach_view).
///
/// The feed is unbounded, so the view sees every event no matter how far it
/// falls behind. The thread exits when the controller (the sender side) is
/// dropped.
/// [`join`](Self::join) hands the view back.
pub struct ViewBridge<V: GalleryView> {
    handle: JoinHandle<V>,
}

impl<V: GalleryView> ViewBridge<V> {
    pub fn spawn(mut rx: mpsc::UnboundedReceiver<TabEvent>, mut view: V) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("gallery-view".to_string())
            .spawn(move || {
                tracing::debug!("View bridge thread started");

                let mut handled = 0usize;
                while let Some(event) = rx.blocking_recv() {
                    tracing::trace!("Tab event received: {:?}", event);
                    dispatch(&mut view, &event);
                    handled += 1;
                }

                tracing::debug!(
                    "Tab event channel closed after {} events - stopping view bridge",
                    handled
                );
                view
            })?;

        Ok(Self { handle })
    }

    /// Wait for the thread to finish and return the view.
    pub fn join(self) -> thread::Result<V> {
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingView {
        replaced: usize,
        thumbnails: usize,
        added: Vec<Utf8PathBuf>,
        statuses: Vec<TabStatus>,
        failures: Vec<String>,
    }

    impl GalleryView for RecordingView {
        fn items_replaced(&mut self, _gallery: GalleryRole, _total: usize, _visible: usize) {
            self.replaced += 1;
        }

        fn thumbnail_ready(&mut self, _gallery: GalleryRole, _path: &Utf8Path, _loaded: bool) {
            self.thumbnails += 1;
        }

        fn selection_changed(
            &mut self,
            _gallery: GalleryRole,
            added: &[Utf8PathBuf],
            _removed: &[Utf8PathBuf],
        ) {
            self.added.extend_from_slice(added);
        }

        fn status_changed(&mut self, status: TabStatus) {
            self.statuses.push(status);
        }

        fn scan_failed(&mut self, _root: &Utf8Path, message: &str) {
            self.failures.push(message.to_string());
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut view = RecordingView::default();

        dispatch(
            &mut view,
            &TabEvent::Gallery {
                gallery: GalleryRole::Found,
                change: GalleryChange::SelectionChanged {
                    added: vec!["/a.png".into()],
                    removed: vec![],
                },
            },
        );
        dispatch(
            &mut view,
            &TabEvent::StatusChanged {
                status: TabStatus::Ready,
            },
        );

        assert_eq!(view.added, vec![Utf8PathBuf::from("/a.png")]);
        assert_eq!(view.statuses, vec![TabStatus::Ready]);
    }

    #[test]
    fn test_bridge_stops_when_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let bridge = ViewBridge::spawn(rx, RecordingView::default()).unwrap();

        tx.send(TabEvent::Gallery {
            gallery: GalleryRole::Selected,
            change: GalleryChange::ItemsReplaced {
                total: 3,
                visible: 3,
            },
        })
        .unwrap();
        tx.send(TabEvent::ScanFailed {
            root: "/missing".into(),
            message: "Directory not found".to_string(),
        })
        .unwrap();
        drop(tx);

        let view = bridge.join().unwrap();
        assert_eq!(view.replaced, 1);
        assert_eq!(view.failures, vec!["Directory not found".to_string()]);
    }

    #[test]
    fn test_slow_view_misses_nothing() {
        let (tx, rx) = mpsc::unbounded_channel();

        // Queue far more events than a broadcast channel would hold before
        // the view starts reading
        for i in 0..5000 {
            tx.send(TabEvent::Gallery {
                gallery: GalleryRole::Found,
                change: GalleryChange::ThumbnailReady {
                    path: format!("/{}.png", i).into(),
                    loaded: true,
                },
            })
            .unwrap();
        }
        drop(tx);

        let view = ViewBridge::spawn(rx, RecordingView::default())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(view.thumbnails, 5000);
    }
}
