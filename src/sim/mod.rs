//! Scripted host player and decision engine for the CLI.
//!
//! The simulator stands in for both external collaborators: a host player
//! with a virtual clock, and a decision engine whose branch choices come
//! from the plan file's script table. Everything runs in-process, so a full
//! session (enable, ticks, decision points, branch jumps, project end) can
//! be observed from the command line.

use anyhow::{Context, Result};
use async_trait::async_trait;
use interstitch::config::InteractiveConfig;
use interstitch::controller::InteractiveController;
use interstitch::delegate::PlayerDelegate;
use interstitch::engine::{
    DecisionEngine, EngineEventKind, EngineLoader, MediaRef, PlaybackUpdate,
};
use interstitch::events::PlayerEvent;
use interstitch::host::{GuiScope, HostEvent, HostPlayer, HostSettings, TickInfo};
use interstitch_common::EntryId;
use interstitch_timeline::{AssetDescriptor, SegmentMap};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const READY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_STEPS: usize = 10_000;

#[derive(Debug, serde::Deserialize)]
struct Plan {
    /// Partner-data string exactly as the host would report it.
    partner_data: String,
    assets: Vec<PlanAsset>,
    /// Branch decisions: current entry -> next entry. An entry with no
    /// mapping ends the project.
    #[serde(default)]
    script: HashMap<String, String>,
}

#[derive(Debug, serde::Deserialize)]
struct PlanAsset {
    id: String,
    duration_ms: u64,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Plan {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse plan file: {:?}", path))
    }

    fn descriptors(&self) -> Vec<AssetDescriptor> {
        self.assets
            .iter()
            .map(|a| AssetDescriptor {
                id: EntryId::from(a.id.as_str()),
                duration_ms: a.duration_ms,
                width: a.width,
                height: a.height,
            })
            .collect()
    }
}

#[derive(Debug)]
struct SimHostState {
    position_secs: f64,
    playing: bool,
    pending_change: Option<EntryId>,
    pending_seek: Option<f64>,
    settings: HostSettings,
}

/// Host player with a virtual clock; transport requests are applied by the
/// simulation loop one step after they are issued.
struct SimHost {
    state: Mutex<SimHostState>,
}

impl SimHost {
    fn new() -> Self {
        Self {
            state: Mutex::new(SimHostState {
                position_secs: 0.0,
                playing: false,
                pending_change: None,
                pending_seek: None,
                settings: HostSettings::default(),
            }),
        }
    }

    fn take_pending_change(&self) -> Option<EntryId> {
        self.state.lock().pending_change.take()
    }

    fn take_pending_seek(&self) -> Option<f64> {
        self.state.lock().pending_seek.take()
    }

    fn set_position_secs(&self, secs: f64) {
        self.state.lock().position_secs = secs;
    }

    fn set_playing(&self, playing: bool) {
        self.state.lock().playing = playing;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn advance(&self, ms: u64) {
        self.state.lock().position_secs += ms as f64 / 1000.0;
    }

    fn tick_info(&self, map: &SegmentMap) -> TickInfo {
        let state = self.state.lock();
        TickInfo {
            global_time_secs: state.position_secs,
            duration_secs: map.total_duration_ms() as f64 / 1000.0,
            is_playing: state.playing,
            seeking: false,
        }
    }
}

impl HostPlayer for SimHost {
    fn request_seek(&self, global_secs: f64) {
        self.state.lock().pending_seek = Some(global_secs);
    }

    fn request_play(&self) {
        self.state.lock().playing = true;
    }

    fn request_pause(&self) {
        self.state.lock().playing = false;
    }

    fn request_change_media(&self, entry: &EntryId) {
        self.state.lock().pending_change = Some(entry.clone());
    }

    fn set_gui_enabled(&self, scope: GuiScope, enabled: bool) {
        tracing::trace!(?scope, enabled, "GUI gate");
    }

    fn set_overlay_visible(&self, visible: bool) {
        tracing::trace!(visible, "Overlay");
    }

    fn set_interactive_running(&self, running: bool) {
        tracing::trace!(running, "Interactive chrome");
    }

    fn hide_poster(&self) {
        tracing::trace!("Poster hidden");
    }

    fn settings(&self) -> HostSettings {
        self.state.lock().settings.clone()
    }

    fn apply_settings(&self, settings: &HostSettings) {
        self.state.lock().settings = settings.clone();
    }

    fn viewport(&self) -> (u32, u32) {
        (1280, 720)
    }
}

#[derive(Debug)]
struct EngineState {
    current: EntryId,
    decided: bool,
}

/// Decision engine whose choices come from the plan's script table.
struct ScriptedEngine {
    delegate: Arc<PlayerDelegate>,
    script: HashMap<EntryId, EntryId>,
    first: EntryId,
    state: Arc<Mutex<EngineState>>,
}

impl ScriptedEngine {
    fn new(delegate: Arc<PlayerDelegate>, script: HashMap<EntryId, EntryId>, first: EntryId) -> Self {
        let state = Arc::new(Mutex::new(EngineState {
            current: first.clone(),
            decided: false,
        }));
        Self {
            delegate,
            script,
            first,
            state,
        }
    }

    fn jump(&self, next: EntryId) {
        let delegate = Arc::clone(&self.delegate);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            delegate.load(MediaRef::new(next.clone())).await;
            {
                let mut state = state.lock();
                state.current = next;
                state.decided = false;
            }
            delegate.play();
        });
    }
}

#[async_trait]
impl DecisionEngine for ScriptedEngine {
    async fn load_project(&self, project: &interstitch_common::ProjectId) -> interstitch::Result<()> {
        tracing::debug!(project = %project, "Scripted engine loaded project");
        tokio::task::yield_now().await;
        {
            let mut state = self.state.lock();
            state.current = self.first.clone();
            state.decided = false;
        }
        self.delegate.event(EngineEventKind::ProjectStart);
        Ok(())
    }

    fn update(&self, update: &PlaybackUpdate) {
        if !update.ended {
            return;
        }

        let current = {
            let mut state = self.state.lock();
            if state.decided {
                return;
            }
            state.decided = true;
            state.current.clone()
        };

        match self.script.get(&current) {
            Some(next) => self.jump(next.clone()),
            None => self.delegate.event(EngineEventKind::ProjectEnded),
        }
    }

    fn resize(&self, width: u32, height: u32) {
        tracing::trace!(width, height, "Engine resized");
    }

    fn replay(&self) {
        self.jump(self.first.clone());
    }
}

struct ScriptedLoader {
    script: HashMap<EntryId, EntryId>,
    first: EntryId,
}

#[async_trait]
impl EngineLoader for ScriptedLoader {
    async fn load_engine(
        &self,
        delegate: Arc<PlayerDelegate>,
    ) -> interstitch::Result<Arc<dyn DecisionEngine>> {
        tokio::task::yield_now().await;
        Ok(Arc::new(ScriptedEngine::new(
            delegate,
            self.script.clone(),
            self.first.clone(),
        )))
    }
}

fn print_event(event: &PlayerEvent) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Run a scripted session to completion, printing every layer event.
pub async fn simulate(plan_path: &Path, config: InteractiveConfig, tick_ms: u64) -> Result<()> {
    let plan = Plan::load(plan_path)?;
    let assets = plan.descriptors();
    let map = SegmentMap::from_assets(&assets)
        .map_err(|e| anyhow::anyhow!("Invalid plan playlist: {e}"))?;

    let first = assets[0].id.clone();
    let script: HashMap<EntryId, EntryId> = plan
        .script
        .iter()
        .map(|(k, v)| (EntryId::from(k.as_str()), EntryId::from(v.as_str())))
        .collect();

    let host = Arc::new(SimHost::new());
    let loader = Arc::new(ScriptedLoader { script, first });
    let controller = InteractiveController::new(config, host.clone(), loader);
    let mut events = controller.subscribe();

    controller.handle_host_event(HostEvent::EntryDataReady {
        assets: assets.clone(),
        partner_data: Some(plan.partner_data.clone()),
    });

    // Wait for the layer to come up before starting the virtual clock.
    loop {
        let event = match tokio::time::timeout(READY_TIMEOUT, events.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(err)) => anyhow::bail!("Event channel closed: {err}"),
            Err(_) => anyhow::bail!("Timed out waiting for the interactive layer"),
        };
        print_event(&event)?;
        match &event {
            PlayerEvent::InteractiveReady { .. } => break,
            PlayerEvent::FatalAlert { title, message } => {
                anyhow::bail!("Fatal: {title}: {message}")
            }
            _ => {}
        }
    }

    host.set_playing(true);
    controller.handle_host_event(HostEvent::LayoutChanged);

    let mut project_ended = false;
    for _ in 0..MAX_STEPS {
        while let Ok(event) = events.try_recv() {
            if matches!(&event, PlayerEvent::EngineEvent { kind } if kind == "project:ended") {
                project_ended = true;
            }
            print_event(&event)?;
        }
        if project_ended {
            break;
        }

        if let Some(entry) = host.take_pending_change() {
            if let Some(segment) = map.for_entry(&entry) {
                host.set_position_secs(segment.start_ms as f64 / 1000.0);
            }
            controller.handle_host_event(HostEvent::ChangeMediaDone { entry });
        } else if let Some(target) = host.take_pending_seek() {
            host.set_position_secs(target);
            controller.handle_host_event(HostEvent::Seeked(host.tick_info(&map)));
        } else {
            if host.is_playing() {
                host.advance(tick_ms);
            }
            controller.handle_host_event(HostEvent::Tick(host.tick_info(&map)));
        }

        // Let spawned engine tasks run before the next step.
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    while let Ok(event) = events.try_recv() {
        print_event(&event)?;
    }

    if !project_ended {
        anyhow::bail!("Simulation did not reach project end within {MAX_STEPS} steps");
    }

    println!("Simulation complete");
    Ok(())
}

/// Build and print the segment map for a plan file.
pub fn inspect(plan_path: &Path, json: bool) -> Result<()> {
    let plan = Plan::load(plan_path)?;
    let map = SegmentMap::from_assets(&plan.descriptors())
        .map_err(|e| anyhow::anyhow!("Invalid plan playlist: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(map.segments())?);
        return Ok(());
    }

    println!(
        "{:<6} {:<20} {:>10} {:>12} {:>10}",
        "order", "entry", "start_ms", "duration_ms", "size"
    );
    for segment in map.segments() {
        println!(
            "{:<6} {:<20} {:>10} {:>12} {:>10}",
            segment.order,
            segment.entry.to_string(),
            segment.start_ms,
            segment.duration_ms,
            format!("{}x{}", segment.width, segment.height)
        );
    }
    println!("total: {} ms", map.total_duration_ms());

    Ok(())
}
