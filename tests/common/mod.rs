//! Shared test doubles: a recording host player and a controllable
//! engine/loader pair.

#![allow(dead_code)]

use async_trait::async_trait;
use interstitch::config::InteractiveConfig;
use interstitch::controller::InteractiveController;
use interstitch::delegate::PlayerDelegate;
use interstitch::engine::{DecisionEngine, EngineLoader, PlaybackUpdate};
use interstitch::error::{Error, Result};
use interstitch::host::{GuiScope, HostPlayer, HostSettings, TickInfo};
use interstitch_common::{EntryId, ProjectId};
use interstitch_timeline::AssetDescriptor;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Transport command recorded by the mock host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Seek(f64),
    Play,
    Pause,
    ChangeMedia(EntryId),
}

#[derive(Debug)]
pub struct MockHostState {
    pub commands: Vec<HostCommand>,
    pub settings: HostSettings,
    pub overlay_visible: bool,
    pub gui_gates: Vec<(GuiScope, bool)>,
    pub interactive_running: bool,
    pub poster_hidden: bool,
}

/// Host player that records every request and mirrors applied settings.
pub struct MockHost {
    pub state: Mutex<MockHostState>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockHostState {
                commands: Vec::new(),
                settings: HostSettings::default(),
                overlay_visible: false,
                gui_gates: Vec::new(),
                interactive_running: false,
                poster_hidden: false,
            }),
        })
    }

    pub fn commands(&self) -> Vec<HostCommand> {
        self.state.lock().commands.clone()
    }

    pub fn current_settings(&self) -> HostSettings {
        self.state.lock().settings.clone()
    }

    pub fn overlay_visible(&self) -> bool {
        self.state.lock().overlay_visible
    }
}

impl HostPlayer for MockHost {
    fn request_seek(&self, global_secs: f64) {
        self.state.lock().commands.push(HostCommand::Seek(global_secs));
    }

    fn request_play(&self) {
        self.state.lock().commands.push(HostCommand::Play);
    }

    fn request_pause(&self) {
        self.state.lock().commands.push(HostCommand::Pause);
    }

    fn request_change_media(&self, entry: &EntryId) {
        self.state
            .lock()
            .commands
            .push(HostCommand::ChangeMedia(entry.clone()));
    }

    fn set_gui_enabled(&self, scope: GuiScope, enabled: bool) {
        self.state.lock().gui_gates.push((scope, enabled));
    }

    fn set_overlay_visible(&self, visible: bool) {
        self.state.lock().overlay_visible = visible;
    }

    fn set_interactive_running(&self, running: bool) {
        self.state.lock().interactive_running = running;
    }

    fn hide_poster(&self) {
        self.state.lock().poster_hidden = true;
    }

    fn settings(&self) -> HostSettings {
        self.state.lock().settings.clone()
    }

    fn apply_settings(&self, settings: &HostSettings) {
        self.state.lock().settings = settings.clone();
    }

    fn viewport(&self) -> (u32, u32) {
        (640, 360)
    }
}

/// Observation and control surface shared by [`TestEngine`] and the test.
#[derive(Default)]
pub struct TestEngineHandle {
    pub updates: Mutex<Vec<PlaybackUpdate>>,
    pub loaded_projects: Mutex<Vec<ProjectId>>,
    pub resizes: Mutex<Vec<(u32, u32)>>,
    pub replays: Mutex<u32>,
    /// When true, `load_project` parks until [`TestEngineHandle::release`].
    pub gate_loads: Mutex<bool>,
    /// When true, `load_project` fails.
    pub fail_loads: Mutex<bool>,
    gate: Notify,
}

impl TestEngineHandle {
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

pub struct TestEngine {
    handle: Arc<TestEngineHandle>,
}

#[async_trait]
impl DecisionEngine for TestEngine {
    async fn load_project(&self, project: &ProjectId) -> Result<()> {
        if *self.handle.gate_loads.lock() {
            self.handle.gate.notified().await;
        }
        if *self.handle.fail_loads.lock() {
            return Err(Error::project_load(project.clone(), "scripted failure"));
        }
        self.handle.loaded_projects.lock().push(project.clone());
        Ok(())
    }

    fn update(&self, update: &PlaybackUpdate) {
        self.handle.updates.lock().push(*update);
    }

    fn resize(&self, width: u32, height: u32) {
        self.handle.resizes.lock().push((width, height));
    }

    fn replay(&self) {
        *self.handle.replays.lock() += 1;
    }
}

/// Loader handing out [`TestEngine`]s and capturing the delegate.
#[derive(Default)]
pub struct TestLoader {
    pub handle: Arc<TestEngineHandle>,
    pub delegate: Mutex<Option<Arc<PlayerDelegate>>>,
    pub loads: Mutex<u32>,
    pub fail_bundle: Mutex<bool>,
}

impl TestLoader {
    pub fn new(handle: Arc<TestEngineHandle>) -> Arc<Self> {
        Arc::new(Self {
            handle,
            ..Default::default()
        })
    }

    pub fn delegate(&self) -> Arc<PlayerDelegate> {
        self.delegate.lock().clone().expect("engine not loaded yet")
    }
}

#[async_trait]
impl EngineLoader for TestLoader {
    async fn load_engine(&self, delegate: Arc<PlayerDelegate>) -> Result<Arc<dyn DecisionEngine>> {
        *self.loads.lock() += 1;
        if *self.fail_bundle.lock() {
            return Err(Error::bundle_load("scripted bundle failure"));
        }
        *self.delegate.lock() = Some(Arc::clone(&delegate));
        Ok(Arc::new(TestEngine {
            handle: Arc::clone(&self.handle),
        }))
    }
}

/// The three-asset playlist used throughout: 3000/4000/5000 ms.
pub fn assets() -> Vec<AssetDescriptor> {
    [("a", 3000), ("b", 4000), ("c", 5000)]
        .into_iter()
        .map(|(id, duration_ms)| AssetDescriptor {
            id: EntryId::from(id),
            duration_ms,
            width: 640,
            height: 360,
        })
        .collect()
}

pub fn tick(global_secs: f64, playing: bool) -> TickInfo {
    TickInfo {
        global_time_secs: global_secs,
        duration_secs: 12.0,
        is_playing: playing,
        seeking: false,
    }
}

pub struct Fixture {
    pub controller: InteractiveController,
    pub host: Arc<MockHost>,
    pub loader: Arc<TestLoader>,
    pub handle: Arc<TestEngineHandle>,
}

pub fn fixture() -> Fixture {
    fixture_with_config(InteractiveConfig::default())
}

pub fn fixture_with_config(config: InteractiveConfig) -> Fixture {
    let host = MockHost::new();
    let handle = Arc::new(TestEngineHandle::default());
    let loader = TestLoader::new(Arc::clone(&handle));
    let controller = InteractiveController::new(
        config,
        host.clone() as Arc<dyn HostPlayer>,
        loader.clone() as Arc<dyn EngineLoader>,
    );
    Fixture {
        controller,
        host,
        loader,
        handle,
    }
}

impl Fixture {
    /// Load the standard playlist and bring the layer up for `project`.
    pub async fn enable_ready(&self, project: &str) {
        self.controller.load_playlist(&assets()).unwrap();
        self.controller.enable(ProjectId::from(project)).await;
        assert!(
            self.controller.status() == interstitch::SessionStatus::Enabled,
            "layer failed to enable"
        );
    }

    /// Report `project:start` the way a live engine would.
    pub fn start_project(&self) {
        self.loader
            .delegate()
            .event(interstitch::engine::EngineEventKind::ProjectStart);
    }
}
