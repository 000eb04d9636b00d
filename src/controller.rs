//! Lifecycle controller for the interactive layer.
//!
//! Owns the single [`EngineSession`] and the segment map, and is the only
//! writer of either. The enable flow is asynchronous (engine bundle fetch,
//! project load); every continuation re-validates its generation ticket at
//! resume time and discards itself when superseded. Cancellation is by
//! comparison, never by aborting the underlying operation.

use crate::config::{EndOfProjectPolicy, InteractiveConfig};
use crate::delegate::PlayerDelegate;
use crate::engine::{DecisionEngine, EngineEventKind, EngineLoader, PlaybackUpdate};
use crate::error::Error;
use crate::events::{EventBus, PlayerEvent};
use crate::host::{GuiScope, HostEvent, HostPlayer, HostSettings, TickInfo};
use crate::partner;
use crate::session::{EngineSession, SessionStatus};
use interstitch_common::{EntryId, ProjectId, Ticket};
use interstitch_timeline::{
    AssetDescriptor, FragmentTiming, Segment, SegmentMap, SegmentTracker,
};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};

/// A media change requested by the engine, waiting for its completion
/// notification.
pub(crate) struct PendingLoad {
    pub(crate) entry: EntryId,
    pub(crate) done: oneshot::Sender<()>,
}

/// State shared between the controller handle and the engine delegate.
///
/// Locks are never held across an await.
pub(crate) struct Shared {
    pub(crate) config: InteractiveConfig,
    pub(crate) host: Arc<dyn HostPlayer>,
    pub(crate) loader: Arc<dyn EngineLoader>,
    pub(crate) timing: Option<Arc<dyn FragmentTiming + Send + Sync>>,
    pub(crate) session: RwLock<EngineSession>,
    pub(crate) engine: RwLock<Option<Arc<dyn DecisionEngine>>>,
    pub(crate) map: RwLock<Option<Arc<SegmentMap>>>,
    pub(crate) tracker: Mutex<SegmentTracker>,
    pub(crate) snapshot: Mutex<Option<HostSettings>>,
    pub(crate) events: EventBus,
    pub(crate) load_queue: Mutex<VecDeque<PendingLoad>>,
}

impl Shared {
    /// Queue a media change, issuing it immediately when none is in flight.
    ///
    /// The returned receiver resolves when the host reports completion for
    /// this specific entry; queued changes are issued strictly in order.
    pub(crate) fn begin_change(&self, entry: EntryId) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let idle = {
            let mut queue = self.load_queue.lock();
            let idle = queue.is_empty();
            queue.push_back(PendingLoad {
                entry: entry.clone(),
                done: tx,
            });
            idle
        };

        if idle {
            tracing::debug!(entry = %entry, "Requesting media change");
            self.host.request_change_media(&entry);
        } else {
            tracing::debug!(entry = %entry, "Media change in progress; queueing");
        }

        rx
    }

    /// The single sink for fatal failures: terminal status, one blocking
    /// alert, overlay hidden, no retry. Stale results must never reach this.
    pub(crate) fn fatal(&self, error: Error) {
        tracing::error!(error = %error, "Fatal interactive-layer failure");
        self.session.write().mark_error();
        self.host.set_overlay_visible(false);
        self.events.emit(PlayerEvent::FatalAlert {
            title: error.alert_title().to_string(),
            message: error.to_string(),
        });
    }

    /// Handle an inbound engine event and re-broadcast it.
    pub(crate) fn handle_engine_event(&self, kind: EngineEventKind) {
        match &kind {
            EngineEventKind::ProjectStart => {
                let pending = {
                    let mut session = self.session.write();
                    session.project_started = true;
                    session.pending_target.take()
                };
                if let Some(entry) = pending {
                    tracing::debug!(entry = %entry, "Loading deferred entry");
                    let _ = self.begin_change(entry);
                }
                self.host.hide_poster();
                self.host.set_interactive_running(true);
            }
            EngineEventKind::ProjectEnded => match self.config.engine.end_of_project {
                EndOfProjectPolicy::Replay => {
                    if let Some(engine) = self.engine.read().clone() {
                        engine.replay();
                    }
                }
                EndOfProjectPolicy::Hold => self.host.request_pause(),
            },
            EngineEventKind::Other(_) => {}
        }

        self.events.emit(PlayerEvent::EngineEvent {
            kind: kind.to_string(),
        });
    }
}

/// Cloneable handle to the interactive layer.
#[derive(Clone)]
pub struct InteractiveController {
    shared: Arc<Shared>,
}

impl InteractiveController {
    /// Create a controller without an adaptive-streaming timing source.
    pub fn new(
        config: InteractiveConfig,
        host: Arc<dyn HostPlayer>,
        loader: Arc<dyn EngineLoader>,
    ) -> Self {
        Self::with_fragment_timing(config, host, loader, None)
    }

    /// Create a controller that queries an adaptive transport for observed
    /// fragment starts on each segment activation.
    pub fn with_fragment_timing(
        config: InteractiveConfig,
        host: Arc<dyn HostPlayer>,
        loader: Arc<dyn EngineLoader>,
        timing: Option<Arc<dyn FragmentTiming + Send + Sync>>,
    ) -> Self {
        let tracker = SegmentTracker::new(config.timing.translation(), config.timing.boundary());
        Self {
            shared: Arc::new(Shared {
                config,
                host,
                loader,
                timing,
                session: RwLock::new(EngineSession::new()),
                engine: RwLock::new(None),
                map: RwLock::new(None),
                tracker: Mutex::new(tracker),
                snapshot: Mutex::new(None),
                events: EventBus::new(),
                load_queue: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Subscribe to layer notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.shared.events.subscribe()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.shared.session.read().status
    }

    /// Project of the live session, if any.
    pub fn current_project(&self) -> Option<ProjectId> {
        self.shared.session.read().project.clone()
    }

    /// The currently active segment, if any.
    pub fn active_segment(&self) -> Option<Segment> {
        self.shared.tracker.lock().active().cloned()
    }

    /// Dispatch a host notification.
    pub fn handle_host_event(&self, event: HostEvent) {
        match event {
            HostEvent::Tick(tick) => self.on_tick(&tick),
            HostEvent::Seeked(tick) => self.on_seeked(&tick),
            HostEvent::EntryDataReady {
                assets,
                partner_data,
            } => self.on_entry_data_ready(&assets, partner_data.as_deref()),
            HostEvent::ChangeMediaDone { entry } => self.on_change_media_done(&entry),
            HostEvent::LayoutChanged => self.on_layout_changed(),
        }
    }

    /// Build and install the segment map for a new playlist.
    ///
    /// The previous map is replaced wholesale; it is never mutated.
    pub fn load_playlist(&self, assets: &[AssetDescriptor]) -> crate::error::Result<()> {
        let map = SegmentMap::from_assets(assets)?;
        tracing::debug!(
            segments = map.len(),
            total_ms = map.total_duration_ms(),
            "Built segment map"
        );
        *self.shared.map.write() = Some(Arc::new(map));
        Ok(())
    }

    /// Entry metadata arrived: decide whether this entry is interactive and
    /// start the enable flow if so.
    ///
    /// An invalid playlist disables interactivity and falls back to native
    /// playback without a user-visible alert.
    pub fn on_entry_data_ready(&self, assets: &[AssetDescriptor], partner_data: Option<&str>) {
        let marker = &self.shared.config.engine.partner_marker;
        let Some(project) = partner::parse_project_id(partner_data, marker) else {
            tracing::debug!("Entry is not interactive");
            if self.shared.session.read().is_active() {
                self.disable();
            }
            return;
        };

        if let Err(error) = self.load_playlist(assets) {
            tracing::debug!(error = %error, "Playlist rejected; keeping native playback");
            if self.shared.session.read().is_active() {
                self.disable();
            }
            return;
        }

        let this = self.clone();
        tokio::spawn(async move { this.enable(project).await });
    }

    /// Enable the interactive layer for a project.
    ///
    /// Re-entrant: enabling a different project while one is live transitions
    /// through disabled (full restore) first; two sessions never overlap.
    pub async fn enable(&self, project: ProjectId) {
        let shared = &self.shared;

        {
            let session = shared.session.read();
            if session.is_active() && session.project.as_ref() == Some(&project) {
                tracing::debug!(project = %project, "Layer already active for project");
                return;
            }
        }
        if shared.session.read().status != SessionStatus::Disabled {
            self.disable();
        }

        let ticket = shared.session.write().begin(project.clone());
        tracing::info!(project = %project, "Enabling interactive layer");

        // Snapshot host configuration, then suppress native end-of-clip
        // behavior for the lifetime of the session.
        let snapshot = shared.host.settings();
        shared.host.apply_settings(&snapshot.interactive_overrides());
        *shared.snapshot.lock() = Some(snapshot);

        let Some(engine) = self.acquire_engine(ticket).await else {
            return;
        };

        tracing::info!(project = %project, "Loading project data");
        if let Err(error) = engine.load_project(&project).await {
            if shared.session.read().is_current(ticket) {
                shared.fatal(error);
            } else {
                tracing::debug!(project = %project, "Discarding stale project load failure");
            }
            return;
        }
        if !shared.session.read().is_current(ticket) {
            tracing::debug!(project = %project, "Discarding stale project load");
            return;
        }

        let (width, height) = shared.host.viewport();
        engine.resize(width, height);

        let first = shared
            .map
            .read()
            .as_ref()
            .and_then(|map| map.get(0).cloned());
        if let Some(segment) = first {
            self.activate_segment(segment);
        }

        shared.session.write().mark_enabled();
        shared.host.set_overlay_visible(true);
        tracing::info!(project = %project, "Interactive layer ready");
        shared.events.emit(PlayerEvent::InteractiveReady { project });
    }

    /// Disable the interactive layer, restoring every host setting captured
    /// at enable time. Idempotent.
    pub fn disable(&self) {
        let shared = &self.shared;

        let project = {
            let mut session = shared.session.write();
            if session.status == SessionStatus::Disabled {
                tracing::debug!("Already disabled");
                return;
            }
            let project = session.project.clone();
            session.reset();
            project
        };

        tracing::info!(project = ?project, "Disabling interactive layer");

        if let Some(snapshot) = shared.snapshot.lock().take() {
            shared.host.apply_settings(&snapshot);
        }

        shared.tracker.lock().clear();
        shared.load_queue.lock().clear();
        shared.host.set_interactive_running(false);
        shared.host.set_overlay_visible(false);

        if let Some(project) = project {
            shared.events.emit(PlayerEvent::InteractiveCleanup { project });
        }
    }

    /// Periodic clock sample from the host.
    pub fn on_tick(&self, tick: &TickInfo) {
        let shared = &self.shared;

        if !shared.session.read().is_enabled() || tick.seeking {
            return;
        }

        let Some(sample) = shared
            .tracker
            .lock()
            .sample(tick.global_time_secs * 1000.0)
        else {
            return;
        };

        if let Some(target_ms) = sample.correction {
            shared.host.request_seek(target_ms / 1000.0);
            return;
        }

        let Some(engine) = shared.engine.read().clone() else {
            return;
        };
        let Some((entry, width, height)) = shared
            .tracker
            .lock()
            .active()
            .map(|s| (s.entry.clone(), s.width, s.height))
        else {
            return;
        };

        engine.update(&PlaybackUpdate {
            current_time: sample.local_secs,
            duration: sample.duration_secs,
            paused: !tick.is_playing,
            ended: sample.ended,
            video_width: width,
            video_height: height,
        });

        if sample.just_ended {
            tracing::debug!(entry = %entry, local_secs = sample.local_secs, "Decision point reached");
            shared.host.request_pause();
            shared.host.set_gui_enabled(GuiScope::Interactive, false);
            shared.events.emit(PlayerEvent::DecisionPointReached {
                entry,
                local_secs: sample.local_secs,
            });
        }
    }

    /// A seek completed; re-evaluate against the post-seek clock.
    pub fn on_seeked(&self, tick: &TickInfo) {
        self.on_tick(tick);
    }

    /// A media change finished; the given entry is now active.
    pub fn on_change_media_done(&self, entry: &EntryId) {
        let shared = &self.shared;

        if !shared.session.read().is_active() {
            return;
        }
        let Some(map) = shared.map.read().clone() else {
            return;
        };

        if !map.contains_entry(entry) {
            tracing::info!(entry = %entry, "Media changed outside the project; disabling");
            self.disable();
            return;
        }

        // Resolve the engine load this completion answers, then issue the
        // next queued change, preserving command order.
        let next = {
            let mut queue = shared.load_queue.lock();
            if queue.front().map(|p| &p.entry) == Some(entry) {
                if let Some(pending) = queue.pop_front() {
                    let _ = pending.done.send(());
                }
            }
            queue.front().map(|p| p.entry.clone())
        };
        if let Some(next) = next {
            tracing::debug!(entry = %next, "Issuing queued media change");
            shared.host.request_change_media(&next);
        }

        let Some(segment) = map.for_entry(entry).cloned() else {
            return;
        };
        self.activate_segment(segment);
        shared.host.set_gui_enabled(GuiScope::Interactive, true);
    }

    /// The player layout changed; forward the new viewport to the engine.
    pub fn on_layout_changed(&self) {
        let Some(engine) = self.shared.engine.read().clone() else {
            return;
        };
        let (width, height) = self.shared.host.viewport();
        engine.resize(width, height);
    }

    fn activate_segment(&self, segment: Segment) {
        let shared = &self.shared;
        let entry = segment.entry.clone();
        let order = segment.order;

        let timing = shared
            .timing
            .as_ref()
            .map(|t| &**t as &dyn FragmentTiming);
        shared.tracker.lock().activate(segment, timing);
        shared.session.write().current_order = Some(order);

        tracing::debug!(entry = %entry, order, "Segment activated");
        shared.events.emit(PlayerEvent::SegmentActivated { entry, order });
    }

    async fn acquire_engine(&self, ticket: Ticket) -> Option<Arc<dyn DecisionEngine>> {
        let shared = &self.shared;

        // The bundle is fetched at most once per controller; later sessions
        // reuse the loaded engine.
        if let Some(engine) = shared.engine.read().clone() {
            return Some(engine);
        }

        tracing::info!(url = %shared.config.engine.bundle_url, "Loading engine bundle");
        let delegate = Arc::new(PlayerDelegate::new(Arc::clone(&self.shared)));

        match shared.loader.load_engine(delegate).await {
            Ok(engine) => {
                if !shared.session.read().is_current(ticket) {
                    tracing::debug!("Discarding stale engine load");
                    return None;
                }
                *shared.engine.write() = Some(Arc::clone(&engine));
                Some(engine)
            }
            Err(error) => {
                if shared.session.read().is_current(ticket) {
                    shared.fatal(error);
                } else {
                    tracing::debug!("Discarding stale engine load failure");
                }
                None
            }
        }
    }
}
