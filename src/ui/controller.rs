// Tab Controller - Drives one gallery tab
//
// This module contains the TabController which coordinates between:
// - DirectoryScanner (listing files off the control task)
// - ThumbnailPipeline (decoding on a rayon pool)
// - GalleryStore pair (found / selected)
// - SelectionEngine per gallery (marquee hit testing)
//
// It handles:
// - Starting and cancelling scan + thumbnail jobs
// - Loading thumbnails for selected items whose scan job was cancelled
// - Discarding results from superseded jobs by generation
// - Routing pointer input into selection changes
// - Broadcasting every store change as a TabEvent

use crate::metrics::Metrics;
use crate::models::{GalleryItem, GallerySettings, Point};
use crate::services::{
    DirectoryScanner, PipelineEvent, ScanError, ThumbnailDecoder, ThumbnailError,
    ThumbnailPipeline,
};
use crate::state::{GalleryChange, GalleryRole, GalleryStore, SelectionMode};
use crate::ui::layout::GridLayout;
use crate::ui::marquee::{PointerDown, SelectionEngine};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Capacity of the [`TabController::subscribe`] channel.
pub const EVENT_CAPACITY: usize = 1024;

/// Lifecycle of a tab.
///
/// ```text
/// Idle --start_scan--> Scanning --items--> ThumbnailLoading --all processed--> Ready
///                         |  \--no items--------------------------------------> Ready
///                         \--error--> Idle
/// any --start_scan / clear / shutdown--> Cancelling --> Scanning | Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabStatus {
    Idle,
    Scanning,
    ThumbnailLoading,
    Ready,
    Cancelling,
}

impl TabStatus {
    pub fn can_transition_to(self, to: TabStatus) -> bool {
        use TabStatus::*;
        matches!(
            (self, to),
            (Idle, Scanning)
                | (Scanning, ThumbnailLoading | Ready | Idle)
                | (ThumbnailLoading, Ready)
                | (_, Cancelling)
                | (Cancelling, Scanning | Idle)
        )
    }

    /// No job is running and none is expected to report back.
    pub fn is_settled(self) -> bool {
        matches!(self, TabStatus::Idle | TabStatus::Ready)
    }
}

impl fmt::Display for TabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TabStatus::Idle => "idle",
            TabStatus::Scanning => "scanning",
            TabStatus::ThumbnailLoading => "loading thumbnails",
            TabStatus::Ready => "ready",
            TabStatus::Cancelling => "cancelling",
        };
        f.write_str(name)
    }
}

/// Events broadcast to rendering code.
#[derive(Clone, Debug, PartialEq)]
pub enum TabEvent {
    /// A gallery changed
    Gallery {
        gallery: GalleryRole,
        change: GalleryChange,
    },

    /// The tab moved to a new status
    StatusChanged { status: TabStatus },

    /// A scan ended in an error; the found gallery has been emptied
    ScanFailed { root: Utf8PathBuf, message: String },
}

/// Messages from worker tasks back to the controller.
#[derive(Debug)]
enum WorkerMessage {
    Scan {
        generation: u64,
        root: Utf8PathBuf,
        result: Result<Vec<Utf8PathBuf>, ScanError>,
    },
    /// `role` is the gallery whose job produced the event
    Thumbnail {
        role: GalleryRole,
        event: PipelineEvent,
    },
    /// The thumbnail worker died before finishing
    ThumbnailsAborted { role: GalleryRole, generation: u64 },
}

impl WorkerMessage {
    fn generation(&self) -> u64 {
        match self {
            WorkerMessage::Scan { generation, .. }
            | WorkerMessage::ThumbnailsAborted { generation, .. }
            | WorkerMessage::Thumbnail {
                event: PipelineEvent::Ready { generation, .. },
                ..
            }
            | WorkerMessage::Thumbnail {
                event: PipelineEvent::Finished { generation, .. },
                ..
            } => *generation,
        }
    }

    fn role(&self) -> GalleryRole {
        match self {
            WorkerMessage::Scan { .. } => GalleryRole::Found,
            WorkerMessage::Thumbnail { role, .. } | WorkerMessage::ThumbnailsAborted { role, .. } => {
                *role
            }
        }
    }
}

/// A live background job and the means to stop it.
struct Job {
    generation: u64,
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Controller for one tab: a found gallery, a selected gallery, and the jobs
/// that fill them.
///
/// The controller is the only writer of both stores. Workers report through
/// an unbounded channel and their messages are applied by
/// [`process_pending`](Self::process_pending) or
/// [`run_until_settled`](Self::run_until_settled), after a generation check.
///
/// Must be created inside a tokio runtime.
///
/// # Example
/// ```ignore
/// let settings = ConfigManager::new("config")?.load_settings()?;
/// let mut tab = TabController::new(settings, Arc::new(ImageThumbnailDecoder))?;
/// let events = tab.subscribe();
///
/// tab.start_scan("/home/me/Pictures").await;
/// tab.run_until_settled().await;
///
/// tab.select_all_on_current_page(GalleryRole::Found);
/// tab.move_selected_to_target();
/// let paths = tab.selected_paths();
/// tab.shutdown().await;
/// ```
pub struct TabController {
    settings: GallerySettings,
    scanner: DirectoryScanner,
    pipeline: Arc<ThumbnailPipeline>,
    layout: GridLayout,

    found: GalleryStore,
    selected: GalleryStore,
    found_marquee: SelectionEngine<Utf8PathBuf>,
    selected_marquee: SelectionEngine<Utf8PathBuf>,

    status: TabStatus,
    /// Bumped whenever outstanding work is invalidated
    generation: u64,
    scan_job: Option<Job>,
    thumb_job: Option<Job>,

    /// Generation of the selected gallery's own thumbnail job
    target_generation: u64,
    target_job: Option<Job>,
    target_loading: bool,
    /// Replaced jobs that were signalled but not yet awaited
    retired: Vec<Job>,

    worker_tx: mpsc::UnboundedSender<WorkerMessage>,
    worker_rx: mpsc::UnboundedReceiver<WorkerMessage>,
    events: broadcast::Sender<TabEvent>,
    views: Vec<mpsc::UnboundedSender<TabEvent>>,
    metrics: Arc<Metrics>,
    shut_down: bool,
}

impl TabController {
    pub fn new(
        settings: GallerySettings,
        decoder: Arc<dyn ThumbnailDecoder>,
    ) -> Result<Self, ThumbnailError> {
        Self::with_metrics(settings, decoder, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(
        settings: GallerySettings,
        decoder: Arc<dyn ThumbnailDecoder>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, ThumbnailError> {
        let pipeline = ThumbnailPipeline::new(
            decoder,
            settings.thumbnails.size,
            settings.thumbnails.workers,
            Arc::clone(&metrics),
        )?;
        let (worker_tx, worker_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::info!(
            "Tab controller initialized (thumbnail size {}px)",
            settings.thumbnails.size
        );

        Ok(Self {
            scanner: DirectoryScanner::from_settings(&settings.scan),
            pipeline: Arc::new(pipeline),
            layout: GridLayout::from_settings(settings.thumbnails.size, &settings.layout),
            found: GalleryStore::new(GalleryRole::Found, settings.pagination.found_page_size),
            selected: GalleryStore::new(
                GalleryRole::Selected,
                settings.pagination.selected_page_size,
            ),
            found_marquee: SelectionEngine::new(),
            selected_marquee: SelectionEngine::new(),
            status: TabStatus::Idle,
            generation: 0,
            scan_job: None,
            thumb_job: None,
            target_generation: 0,
            target_job: None,
            target_loading: false,
            retired: Vec::new(),
            worker_tx,
            worker_rx,
            events,
            views: Vec::new(),
            metrics,
            shut_down: false,
            settings,
        })
    }

    pub fn status(&self) -> TabStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Broadcast receiver of every [`TabEvent`].
    ///
    /// A receiver more than [`EVENT_CAPACITY`] events behind loses the oldest
    /// ones. Views that must see every event use [`attach_view`](Self::attach_view).
    pub fn subscribe(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }

    /// Unbounded, lossless event feed for one view.
    ///
    /// The channel closes when the controller is dropped.
    pub fn attach_view(&mut self) -> mpsc::UnboundedReceiver<TabEvent> {
        self.views.retain(|tx| !tx.is_closed());
        let (tx, rx) = mpsc::unbounded_channel();
        self.views.push(tx);
        rx
    }

    /// No scan is running and no thumbnail job is expected to report back.
    pub fn is_settled(&self) -> bool {
        self.status.is_settled() && !self.target_loading
    }

    pub fn found(&self) -> &GalleryStore {
        &self.found
    }

    pub fn selected(&self) -> &GalleryStore {
        &self.selected
    }

    pub fn store(&self, role: GalleryRole) -> &GalleryStore {
        match role {
            GalleryRole::Found => &self.found,
            GalleryRole::Selected => &self.selected,
        }
    }

    fn store_mut(&mut self, role: GalleryRole) -> &mut GalleryStore {
        match role {
            GalleryRole::Found => &mut self.found,
            GalleryRole::Selected => &mut self.selected,
        }
    }

    /// Marquee engine of one gallery, for adapters that register their own
    /// item rectangles.
    pub fn marquee_mut(&mut self, role: GalleryRole) -> &mut SelectionEngine<Utf8PathBuf> {
        match role {
            GalleryRole::Found => &mut self.found_marquee,
            GalleryRole::Selected => &mut self.selected_marquee,
        }
    }

    /// Scan `root`, replacing whatever the found gallery holds.
    ///
    /// Any running scan or thumbnail job is cancelled and awaited first; its
    /// late results are discarded. Selected items still waiting for a
    /// thumbnail get a job of their own. Returns once the new scan is launched.
    pub async fn start_scan(&mut self, root: impl Into<Utf8PathBuf>) {
        let root = root.into();

        if self.status != TabStatus::Idle {
            self.transition(TabStatus::Cancelling);
        }
        self.cancel_jobs().await;

        self.generation += 1;
        let generation = self.generation;
        self.metrics.record_scan_started();

        let changes = self.found.clear();
        self.emit_changes(GalleryRole::Found, changes);
        self.found_marquee.clear_registry();
        self.reload_target_thumbnails();
        self.transition(TabStatus::Scanning);

        tracing::info!("Scan {} started: {}", generation, root);

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let scanner = self.scanner.clone();
        let tx = self.worker_tx.clone();
        let handle = tokio::spawn(async move {
            let result = scanner.scan_async(root.clone(), cancel_rx).await;
            let _ = tx.send(WorkerMessage::Scan {
                generation,
                root,
                result,
            });
        });

        self.scan_job = Some(Job {
            generation,
            cancel_tx,
            handle,
        });
    }

    /// Apply every worker message already queued, without waiting.
    ///
    /// Suitable for a UI frame tick. Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.worker_rx.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Apply worker messages until the tab is `Ready` or `Idle` and the
    /// selected gallery has no thumbnails loading.
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            match self.worker_rx.recv().await {
                Some(message) => self.handle_message(message),
                None => break,
            }
        }
    }

    /// Cancel all jobs and empty both galleries.
    pub async fn clear(&mut self) {
        if self.status != TabStatus::Idle {
            self.transition(TabStatus::Cancelling);
        }
        self.cancel_jobs().await;
        self.generation += 1;

        let changes = self.found.clear();
        self.emit_changes(GalleryRole::Found, changes);
        let changes = self.selected.clear();
        self.emit_changes(GalleryRole::Selected, changes);
        self.found_marquee.clear_registry();
        self.selected_marquee.clear_registry();

        self.transition(TabStatus::Idle);
    }

    /// Tear down: cancel, await workers, end in `Idle`.
    pub async fn shutdown(&mut self) {
        if self.status != TabStatus::Idle {
            self.transition(TabStatus::Cancelling);
        }
        self.cancel_jobs().await;
        self.generation += 1;
        self.transition(TabStatus::Idle);
        self.shut_down = true;
        tracing::info!("Tab controller shut down");
    }

    /// Item paths of the selected gallery, in order.
    pub fn selected_paths(&self) -> Vec<Utf8PathBuf> {
        self.selected.item_paths()
    }

    pub fn pointer_down(&mut self, role: GalleryRole, point: Point) -> PointerDown<Utf8PathBuf> {
        let outcome = self.marquee_mut(role).pointer_down(point);
        if let PointerDown::Item(path) = &outcome {
            let changes = self.store_mut(role).toggle_selection(path);
            self.emit_changes(role, changes);
        }
        outcome
    }

    /// Returns whether the selection changed.
    pub fn pointer_move(
        &mut self,
        role: GalleryRole,
        point: Point,
        mode: impl Into<SelectionMode>,
    ) -> bool {
        let Some(selection) = self.marquee_mut(role).pointer_move(point, mode) else {
            return false;
        };

        let changes = self
            .store_mut(role)
            .select_batch(selection.items, selection.mode);
        let changed = !changes.is_empty();
        self.emit_changes(role, changes);
        changed
    }

    pub fn pointer_up(&mut self, role: GalleryRole) {
        self.marquee_mut(role).pointer_up();
    }

    /// Register the current page of a gallery with its marquee engine, laid
    /// out for a viewport `viewport_width` wide.
    pub fn register_grid(&mut self, role: GalleryRole, viewport_width: f32) {
        let keys: Vec<Utf8PathBuf> = self
            .store(role)
            .current_page_items()
            .into_iter()
            .map(|item| item.path.clone())
            .collect();
        let tiles = self.layout.layout(keys, viewport_width);

        let engine = self.marquee_mut(role);
        engine.clear_registry();
        for (path, rect) in tiles {
            engine.register(path, rect);
        }
    }

    pub fn toggle_selection(&mut self, role: GalleryRole, path: &Utf8Path) {
        let changes = self.store_mut(role).toggle_selection(path);
        self.emit_changes(role, changes);
    }

    pub fn select_all_on_current_page(&mut self, role: GalleryRole) {
        let changes = self.store_mut(role).select_all_on_current_page();
        self.emit_changes(role, changes);
    }

    pub fn deselect_all(&mut self, role: GalleryRole) {
        let changes = self.store_mut(role).deselect_all();
        self.emit_changes(role, changes);
    }

    pub fn next_page(&mut self, role: GalleryRole) {
        let changes = self.store_mut(role).next_page();
        self.emit_changes(role, changes);
    }

    pub fn prev_page(&mut self, role: GalleryRole) {
        let changes = self.store_mut(role).prev_page();
        self.emit_changes(role, changes);
    }

    pub fn jump_to_page(&mut self, role: GalleryRole, page_index: usize) {
        let changes = self.store_mut(role).jump_to_page(page_index);
        self.emit_changes(role, changes);
    }

    pub fn set_items_per_page(&mut self, role: GalleryRole, page_size: usize) {
        let changes = self.store_mut(role).set_items_per_page(page_size);
        self.emit_changes(role, changes);
    }

    pub fn set_filter(&mut self, role: GalleryRole, query: &str) -> Result<(), regex::Error> {
        let changes = self.store_mut(role).set_filter(query)?;
        self.emit_changes(role, changes);
        Ok(())
    }

    /// Copy the found gallery's selection into the selected gallery.
    pub fn move_selected_to_target(&mut self) {
        let (source, target) = self.found.move_selected_to(&mut self.selected);
        self.emit_changes(GalleryRole::Found, source);
        self.emit_changes(GalleryRole::Selected, target);
    }

    /// Drop the selected gallery's selected items.
    pub fn remove_selected_from_target(&mut self) {
        let changes = self.selected.remove_selected();
        self.emit_changes(GalleryRole::Selected, changes);
    }

    fn handle_message(&mut self, message: WorkerMessage) {
        let generation = message.generation();
        let current = match message.role() {
            GalleryRole::Found => self.generation,
            GalleryRole::Selected => self.target_generation,
        };
        if generation != current {
            tracing::debug!(
                "Discarding stale {} result from job {} (current {})",
                message.role(),
                generation,
                current
            );
            self.metrics.record_stale_result();
            return;
        }

        match message {
            WorkerMessage::Scan {
                root,
                result: Ok(paths),
                ..
            } => self.on_scan_complete(generation, root, paths),
            WorkerMessage::Scan {
                result: Err(ScanError::Cancelled),
                ..
            } => {
                tracing::debug!("Scan {} reported cancellation", generation);
            }
            WorkerMessage::Scan {
                root,
                result: Err(e),
                ..
            } => self.on_scan_failed(root, e),
            WorkerMessage::Thumbnail {
                event: PipelineEvent::Ready { path, state, .. },
                ..
            } => {
                if let Some(change) = self.found.apply_thumbnail(&path, state.clone()) {
                    self.emit(TabEvent::Gallery {
                        gallery: GalleryRole::Found,
                        change,
                    });
                }
                // Items moved before their thumbnail arrived are still pending
                if let Some(change) = self.selected.apply_thumbnail(&path, state) {
                    self.emit(TabEvent::Gallery {
                        gallery: GalleryRole::Selected,
                        change,
                    });
                }
            }
            WorkerMessage::Thumbnail {
                role,
                event: PipelineEvent::Finished { loaded, failed, .. },
            } => {
                tracing::info!(
                    "Thumbnails for {} job {} done: {} loaded, {} failed",
                    role,
                    generation,
                    loaded,
                    failed
                );
                self.on_thumbnails_done(role);
            }
            WorkerMessage::ThumbnailsAborted { role, .. } => {
                self.on_thumbnails_done(role);
                if role == GalleryRole::Found {
                    // The found job will never deliver the rest
                    self.reload_target_thumbnails();
                }
            }
        }
    }

    fn on_thumbnails_done(&mut self, role: GalleryRole) {
        match role {
            GalleryRole::Found => {
                self.transition(TabStatus::Ready);
            }
            GalleryRole::Selected => self.target_loading = false,
        }
    }

    fn on_scan_complete(&mut self, generation: u64, root: Utf8PathBuf, paths: Vec<Utf8PathBuf>) {
        tracing::info!("Scan {} of {} complete: {} items", generation, root, paths.len());

        let items = ThumbnailPipeline::placeholders(paths, &self.settings.scan.video_extensions);
        let changes = self.found.set_items(items.clone());
        self.emit_changes(GalleryRole::Found, changes);

        if items.is_empty() {
            self.transition(TabStatus::Ready);
            return;
        }

        self.transition(TabStatus::ThumbnailLoading);
        self.thumb_job = Some(self.spawn_thumbnails(GalleryRole::Found, generation, items));
    }

    fn on_scan_failed(&mut self, root: Utf8PathBuf, error: ScanError) {
        tracing::error!("Scan of {} failed: {}", root, error);
        self.metrics.record_scan_failed();

        let changes = self.found.clear();
        self.emit_changes(GalleryRole::Found, changes);
        self.emit(TabEvent::ScanFailed {
            root,
            message: error.to_string(),
        });
        self.transition(TabStatus::Idle);
    }

    /// Start a thumbnail job for the selected gallery's pending items.
    ///
    /// Replaces any earlier such job. Needed whenever the found job that would
    /// have resolved them is cancelled or dies.
    fn reload_target_thumbnails(&mut self) {
        if let Some(job) = self.target_job.take() {
            let _ = job.cancel_tx.send(true);
            self.retired.push(job);
        }
        self.target_generation += 1;
        self.target_loading = false;

        let pending = self.selected.pending_items();
        if pending.is_empty() {
            return;
        }

        tracing::info!(
            "Loading {} thumbnails for the selected gallery (job {})",
            pending.len(),
            self.target_generation
        );
        let job = self.spawn_thumbnails(GalleryRole::Selected, self.target_generation, pending);
        self.target_job = Some(job);
        self.target_loading = true;
    }

    fn spawn_thumbnails(
        &self,
        role: GalleryRole,
        generation: u64,
        snapshot: Vec<GalleryItem>,
    ) -> Job {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let pipeline = Arc::clone(&self.pipeline);
        let event_tx = self.worker_tx.clone();
        let abort_tx = self.worker_tx.clone();

        let handle = tokio::spawn(async move {
            let job = pipeline.spawn(generation, snapshot, cancel_rx, move |event| {
                let _ = event_tx.send(WorkerMessage::Thumbnail { role, event });
            });
            if let Err(e) = job.await {
                tracing::error!("Thumbnail worker for {} job {} failed: {}", role, generation, e);
                let _ = abort_tx.send(WorkerMessage::ThumbnailsAborted { role, generation });
            }
        });

        Job {
            generation,
            cancel_tx,
            handle,
        }
    }

    /// Signal every live job and wait for it to stop.
    async fn cancel_jobs(&mut self) {
        let mut jobs: Vec<Job> = [
            self.scan_job.take(),
            self.thumb_job.take(),
            self.target_job.take(),
        ]
        .into_iter()
        .flatten()
        .collect();
        jobs.append(&mut self.retired);

        self.target_generation += 1;
        self.target_loading = false;

        for job in jobs {
            let _ = job.cancel_tx.send(true);
            if let Err(e) = job.handle.await {
                tracing::warn!("Job {} ended abnormally: {}", job.generation, e);
            } else {
                tracing::debug!("Job {} stopped", job.generation);
            }
        }
    }

    fn transition(&mut self, to: TabStatus) -> bool {
        if self.status == to {
            return true;
        }
        if !self.status.can_transition_to(to) {
            tracing::warn!("Ignoring invalid tab transition {} -> {}", self.status, to);
            return false;
        }

        tracing::info!("Tab status: {} -> {}", self.status, to);
        self.status = to;
        self.emit(TabEvent::StatusChanged { status: to });
        true
    }

    fn emit_changes(&self, role: GalleryRole, changes: Vec<GalleryChange>) {
        for change in changes {
            if matches!(change, GalleryChange::SelectionChanged { .. }) {
                self.metrics.record_selection_event();
            }
            self.emit(TabEvent::Gallery {
                gallery: role,
                change,
            });
        }
    }

    fn emit(&self, event: TabEvent) {
        for view in &self.views {
            let _ = view.send(event.clone());
        }
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Drop for TabController {
    fn drop(&mut self) {
        if self.shut_down {
            return;
        }

        let mut live = 0;
        let jobs = [
            self.scan_job.as_ref(),
            self.thumb_job.as_ref(),
            self.target_job.as_ref(),
        ];
        for job in jobs.into_iter().flatten().chain(&self.retired) {
            if !job.handle.is_finished() {
                let _ = job.cancel_tx.send(true);
                live += 1;
            }
        }
        if live > 0 {
            tracing::warn!(
                "Tab controller dropped without shutdown; cancelled {} running job(s)",
                live
            );
        }
    }
}
