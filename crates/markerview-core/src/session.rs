//! Marker session controller
//!
//! Owns the AR session lifecycle and all per-session state: anchors, the
//! active object and the rotation applied to it. The tracking library is
//! reached through [`TrackerBackend`]; its found/lost callbacks come back as
//! [`AnchorEvent`]s dispatched through [`SessionController::handle_event`].
//!
//! Initialization is asynchronous. [`SessionController::start`] hands the
//! backend a generation number and the backend reports back through
//! [`SessionController::complete_start`]. Only the latest generation can
//! activate a session, so a restart never overlaps two sessions.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::geometry::{build_mesh, MeshSpec};

/// Manual rotation step (pi/8)
pub const ROTATE_STEP: f32 = std::f32::consts::FRAC_PI_8;

/// Per-frame yaw increment while animation is on
pub const ANIMATION_STEP: f32 = 0.02;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Camera access was denied
    #[error("Camera permission denied: {0}")]
    Permission(String),
    /// Tracker failed to load or start (missing dataset, unsupported browser, ...)
    #[error("Tracker initialization failed: {0}")]
    Init(String),
    /// The marker dataset has fewer targets than the catalog has entries
    #[error("Marker dataset has {targets} targets but the catalog has {catalog} models")]
    DatasetMismatch { catalog: usize, targets: usize },
}

impl SessionError {
    pub fn is_permission(&self) -> bool {
        matches!(self, SessionError::Permission(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Starting,
    Active,
    Error,
}

/// What to do with the active object when its marker is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostPolicy {
    /// Keep showing the last detected object until another marker is found
    #[default]
    KeepLast,
    /// Clear the active object when its own marker is lost
    Clear,
}

/// Found/lost callbacks from the tracking library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "lowercase")]
pub enum AnchorEvent {
    Found(usize),
    Lost(usize),
}

impl AnchorEvent {
    pub fn index(&self) -> usize {
        match self {
            AnchorEvent::Found(i) | AnchorEvent::Lost(i) => *i,
        }
    }
}

/// Parse a batch of events as emitted by the browser tracker bridge
pub fn parse_anchor_events(json: &str) -> Result<Vec<AnchorEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

/// World matrix of a visible anchor as reported by the tracker bridge
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnchorPose {
    pub index: usize,
    /// Column-major 4x4 transform, camera at the origin looking down -Z
    pub matrix: [f32; 16],
}

/// Parse the per-frame pose list emitted by the browser tracker bridge
pub fn parse_anchor_poses(json: &str) -> Result<Vec<AnchorPose>, serde_json::Error> {
    serde_json::from_str(json)
}

/// A tracked marker with its attached mesh
#[derive(Debug, Clone)]
pub struct Anchor {
    pub index: usize,
    pub visible: bool,
    pub mesh: MeshSpec,
}

/// The object currently considered "detected"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveObject {
    pub anchor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Left,
    Right,
}

/// Yaw applied to the active object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub angle: f32,
    pub animating: bool,
    pub step: f32,
    pub animation_step: f32,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            animating: false,
            step: ROTATE_STEP,
            animation_step: ANIMATION_STEP,
        }
    }
}

impl RotationState {
    pub fn rotate(&mut self, direction: RotateDirection) {
        match direction {
            RotateDirection::Left => self.angle -= self.step,
            RotateDirection::Right => self.angle += self.step,
        }
    }

    /// Flip the animation toggle, returning the new value
    pub fn toggle_animation(&mut self) -> bool {
        self.animating = !self.animating;
        self.animating
    }

    /// Advance one frame's worth of animation
    pub fn tick(&mut self) {
        if self.animating {
            self.angle += self.animation_step;
        }
    }
}

/// Tracker details reported once initialization succeeds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerReady {
    /// Number of targets in the compiled marker dataset
    pub targets: usize,
    /// Vertical field of view of the tracking camera, in radians
    #[serde(default = "default_fov")]
    pub fov_y: f32,
}

fn default_fov() -> f32 {
    std::f32::consts::FRAC_PI_4
}

/// Lifecycle notifications for the presenter
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    Starting,
    Started { anchors: usize },
    Failed(SessionError),
    Stopped,
    Detected { index: usize },
    Searching { index: usize },
    /// The active object was dropped after its marker was lost
    Cleared { index: usize },
    /// Dataset has more targets than the catalog; extra markers are ignored
    DatasetMismatch { catalog: usize, targets: usize },
}

/// The tracking library, as seen by the controller
pub trait TrackerBackend {
    /// Begin asynchronous initialization. The outcome must be reported
    /// through [`SessionController::complete_start`] with the same generation.
    fn begin(&mut self, generation: u64);
    /// Register anchor `index` with the tracker
    fn attach_anchor(&mut self, index: usize);
    /// Detach every anchor
    fn detach_all(&mut self);
    /// Stop tracking and release the camera
    fn shutdown(&mut self);
}

/// AR session state and lifecycle
pub struct SessionController<T: TrackerBackend> {
    catalog: Catalog,
    tracker: T,
    state: SessionState,
    generation: u64,
    anchors: Vec<Anchor>,
    active: Option<ActiveObject>,
    rotation: RotationState,
    lost_policy: LostPolicy,
    last_error: Option<SessionError>,
    tracker_info: Option<TrackerReady>,
    notices: VecDeque<SessionNotice>,
}

impl<T: TrackerBackend> SessionController<T> {
    pub fn new(catalog: Catalog, tracker: T) -> Self {
        Self {
            catalog,
            tracker,
            state: SessionState::Idle,
            generation: 0,
            anchors: Vec::new(),
            active: None,
            rotation: RotationState::default(),
            lost_policy: LostPolicy::default(),
            last_error: None,
            tracker_info: None,
            notices: VecDeque::new(),
        }
    }

    pub fn with_lost_policy(mut self, policy: LostPolicy) -> Self {
        self.lost_policy = policy;
        self
    }

    pub fn with_rotation_steps(mut self, step: f32, animation_step: f32) -> Self {
        self.rotation.step = step;
        self.rotation.animation_step = animation_step;
        self
    }

    /// Request a session. Any running or pending session is torn down first.
    pub fn start(&mut self) -> u64 {
        if matches!(self.state, SessionState::Starting | SessionState::Active) {
            tracing::info!(state = ?self.state, "Restarting session");
            self.teardown();
        }

        self.generation += 1;
        self.state = SessionState::Starting;
        self.last_error = None;
        self.notices.push_back(SessionNotice::Starting);
        tracing::info!(generation = self.generation, "Starting AR session");
        self.tracker.begin(self.generation);
        self.generation
    }

    /// Finish the initialization started by [`start`](Self::start)
    pub fn complete_start(
        &mut self,
        generation: u64,
        result: Result<TrackerReady, SessionError>,
    ) -> Result<(), SessionError> {
        if generation != self.generation || self.state != SessionState::Starting {
            tracing::debug!(
                generation,
                current = self.generation,
                state = ?self.state,
                "Discarding stale initialization result"
            );
            return Ok(());
        }

        let result = result.and_then(|ready| self.check_dataset(ready));
        match result {
            Ok(ready) => {
                self.attach_anchors();
                self.tracker_info = Some(ready);
                self.state = SessionState::Active;
                self.notices.push_back(SessionNotice::Started {
                    anchors: self.anchors.len(),
                });
                tracing::info!(anchors = self.anchors.len(), targets = ready.targets, "AR session active");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "AR session failed to start");
                self.tracker.shutdown();
                self.state = SessionState::Error;
                self.last_error = Some(e.clone());
                self.notices.push_back(SessionNotice::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Tear the session down. Calling this while idle does nothing.
    pub fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.teardown();
        self.state = SessionState::Idle;
        self.last_error = None;
        self.notices.push_back(SessionNotice::Stopped);
        tracing::info!("AR session stopped");
    }

    /// Dispatch a found/lost callback from the tracker
    pub fn handle_event(&mut self, event: AnchorEvent) {
        if self.state != SessionState::Active {
            tracing::warn!(?event, state = ?self.state, "Ignoring anchor event outside an active session");
            return;
        }
        let index = event.index();
        let Some(anchor) = self.anchors.get_mut(index) else {
            tracing::warn!(index, anchors = self.anchors.len(), "Anchor event for unknown index");
            return;
        };

        match event {
            AnchorEvent::Found(_) => {
                anchor.visible = true;
                self.active = Some(ActiveObject { anchor: index });
                self.notices.push_back(SessionNotice::Detected { index });
                tracing::debug!(index, "Target found");
            }
            AnchorEvent::Lost(_) => {
                anchor.visible = false;
                self.notices.push_back(SessionNotice::Searching { index });
                if self.lost_policy == LostPolicy::Clear
                    && self.active == Some(ActiveObject { anchor: index })
                {
                    self.active = None;
                    self.notices.push_back(SessionNotice::Cleared { index });
                }
                tracing::debug!(index, "Target lost");
            }
        }
    }

    /// Anchor index of the active object, if its marker is currently visible
    pub fn visible_active(&self) -> Option<usize> {
        let active = self.active?;
        self.anchors
            .get(active.anchor)
            .filter(|a| a.visible)
            .map(|a| a.index)
    }

    pub fn rotate(&mut self, direction: RotateDirection) {
        self.rotation.rotate(direction);
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.rotation.toggle_animation()
    }

    /// Take all pending notices
    pub fn drain_notices(&mut self) -> Vec<SessionNotice> {
        self.notices.drain(..).collect()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn active(&self) -> Option<ActiveObject> {
        self.active
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationState {
        &mut self.rotation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn tracker_info(&self) -> Option<TrackerReady> {
        self.tracker_info
    }

    pub fn lost_policy(&self) -> LostPolicy {
        self.lost_policy
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    fn check_dataset(&mut self, ready: TrackerReady) -> Result<TrackerReady, SessionError> {
        let catalog = self.catalog.len();
        if ready.targets < catalog {
            return Err(SessionError::DatasetMismatch {
                catalog,
                targets: ready.targets,
            });
        }
        if ready.targets > catalog {
            tracing::warn!(catalog, targets = ready.targets, "Marker dataset has targets without a catalog entry");
            self.notices.push_back(SessionNotice::DatasetMismatch {
                catalog,
                targets: ready.targets,
            });
        }
        Ok(ready)
    }

    fn attach_anchors(&mut self) {
        self.anchors = self
            .catalog
            .iter()
            .enumerate()
            .map(|(index, descriptor)| Anchor {
                index,
                visible: false,
                mesh: build_mesh(descriptor),
            })
            .collect();
        for anchor in &self.anchors {
            self.tracker.attach_anchor(anchor.index);
        }
    }

    fn teardown(&mut self) {
        self.tracker.detach_all();
        self.tracker.shutdown();
        self.anchors.clear();
        self.active = None;
        self.tracker_info = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Tracker that records every call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTracker {
        pub begun: Vec<u64>,
        pub attached: Vec<usize>,
        pub detach_calls: usize,
        pub shutdown_calls: usize,
    }

    impl TrackerBackend for RecordingTracker {
        fn begin(&mut self, generation: u64) {
            self.begun.push(generation);
        }

        fn attach_anchor(&mut self, index: usize) {
            self.attached.push(index);
        }

        fn detach_all(&mut self) {
            self.attached.clear();
            self.detach_calls += 1;
        }

        fn shutdown(&mut self) {
            self.shutdown_calls += 1;
        }
    }

    pub(crate) fn ready(targets: usize) -> Result<TrackerReady, SessionError> {
        Ok(TrackerReady {
            targets,
            fov_y: 0.8,
        })
    }

    pub(crate) fn active_session() -> SessionController<RecordingTracker> {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        let generation = session.start();
        session.complete_start(generation, ready(n)).unwrap();
        session.drain_notices();
        session
    }

    #[test]
    fn test_start_creates_one_anchor_per_model() {
        let session = active_session();
        let n = session.catalog().len();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.anchors().len(), n);
        for (i, anchor) in session.anchors().iter().enumerate() {
            assert_eq!(anchor.index, i);
            assert!(!anchor.visible);
        }
        assert_eq!(session.tracker().attached, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_restart_does_not_duplicate_anchors() {
        let mut session = active_session();
        let n = session.catalog().len();

        let generation = session.start();
        assert_eq!(session.state(), SessionState::Starting);
        assert!(session.anchors().is_empty());
        session.complete_start(generation, ready(n)).unwrap();

        assert_eq!(session.anchors().len(), n);
        assert_eq!(session.tracker().attached.len(), n);
        assert_eq!(session.tracker().detach_calls, 1);
    }

    #[test]
    fn test_superseded_start_is_discarded() {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default());

        let first = session.start();
        let second = session.start();
        assert_ne!(first, second);
        assert_eq!(session.tracker().begun, vec![first, second]);

        // The first initialization finishes late and must not activate anything
        session.complete_start(first, ready(n)).unwrap();
        assert_eq!(session.state(), SessionState::Starting);
        assert!(session.anchors().is_empty());

        session.complete_start(second, ready(n)).unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.anchors().len(), n);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut session = active_session();
        session.handle_event(AnchorEvent::Found(2));

        session.stop();
        let notices = session.drain_notices();
        let detach_calls = session.tracker().detach_calls;
        let shutdown_calls = session.tracker().shutdown_calls;

        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.anchors().is_empty());
        assert_eq!(session.active(), None);
        assert_eq!(notices, vec![SessionNotice::Stopped]);
        assert!(session.drain_notices().is_empty());
        assert_eq!(session.tracker().detach_calls, detach_calls);
        assert_eq!(session.tracker().shutdown_calls, shutdown_calls);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.drain_notices().is_empty());
        assert_eq!(session.tracker().shutdown_calls, 0);
    }

    #[test]
    fn test_permission_failure() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        let generation = session.start();
        let err = session
            .complete_start(generation, Err(SessionError::Permission("NotAllowedError".into())))
            .unwrap_err();

        assert!(err.is_permission());
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.anchors().is_empty());
        assert_eq!(session.last_error(), Some(&err));

        // Error -> Starting on retry
        session.start();
        assert_eq!(session.state(), SessionState::Starting);
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_dataset_with_too_few_targets_fails() {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        let generation = session.start();
        let err = session.complete_start(generation, ready(n - 2)).unwrap_err();

        assert_eq!(
            err,
            SessionError::DatasetMismatch {
                catalog: n,
                targets: n - 2
            }
        );
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.tracker().attached.is_empty());
    }

    #[test]
    fn test_dataset_with_extra_targets_warns() {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        let generation = session.start();
        session.complete_start(generation, ready(n + 1)).unwrap();

        assert_eq!(session.state(), SessionState::Active);
        let notices = session.drain_notices();
        assert!(notices.contains(&SessionNotice::DatasetMismatch {
            catalog: n,
            targets: n + 1
        }));
    }

    #[test]
    fn test_found_then_lost_keeps_active_object() {
        let mut session = active_session();
        session.handle_event(AnchorEvent::Found(3));
        assert_eq!(session.active(), Some(ActiveObject { anchor: 3 }));

        session.handle_event(AnchorEvent::Lost(3));
        // Last detected object stays active under the default policy
        assert_eq!(session.active(), Some(ActiveObject { anchor: 3 }));
        assert!(!session.anchors()[3].visible);

        assert_eq!(
            session.drain_notices(),
            vec![
                SessionNotice::Detected { index: 3 },
                SessionNotice::Searching { index: 3 }
            ]
        );
    }

    #[test]
    fn test_clear_policy_drops_active_object() {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default())
            .with_lost_policy(LostPolicy::Clear);
        let generation = session.start();
        session.complete_start(generation, ready(n)).unwrap();

        session.handle_event(AnchorEvent::Found(1));
        session.handle_event(AnchorEvent::Found(4));
        // Losing a marker that is not the active one leaves the slot alone
        session.handle_event(AnchorEvent::Lost(1));
        assert_eq!(session.active(), Some(ActiveObject { anchor: 4 }));
        session.handle_event(AnchorEvent::Lost(4));
        assert_eq!(session.active(), None);

        let notices = session.drain_notices();
        assert_eq!(
            notices.iter().filter(|n| matches!(n, SessionNotice::Cleared { .. })).count(),
            1
        );
        assert_eq!(notices.last(), Some(&SessionNotice::Cleared { index: 4 }));
    }

    #[test]
    fn test_stop_while_starting_discards_result() {
        let catalog = Catalog::builtin().unwrap();
        let n = catalog.len();
        let mut session = SessionController::new(catalog, RecordingTracker::default());

        let generation = session.start();
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.tracker().shutdown_calls, 1);

        // Initialization finishes after the stop
        session.complete_start(generation, ready(n)).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.anchors().is_empty());
        assert!(session.tracker().attached.is_empty());
        assert_eq!(session.tracker_info(), None);
        assert_eq!(session.drain_notices(), vec![SessionNotice::Starting, SessionNotice::Stopped]);
    }

    #[test]
    fn test_stop_after_error_returns_to_idle() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        let generation = session.start();
        let _ = session.complete_start(generation, Err(SessionError::Init("no dataset".into())));
        assert_eq!(session.state(), SessionState::Error);

        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_error(), None);
        assert_eq!(session.drain_notices().last(), Some(&SessionNotice::Stopped));
    }

    #[test]
    fn test_last_found_wins() {
        let mut session = active_session();
        session.handle_event(AnchorEvent::Found(0));
        session.handle_event(AnchorEvent::Found(5));
        assert_eq!(session.active(), Some(ActiveObject { anchor: 5 }));
        assert!(session.anchors()[0].visible);
    }

    #[test]
    fn test_events_ignored_outside_active_session() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = SessionController::new(catalog, RecordingTracker::default());
        session.handle_event(AnchorEvent::Found(0));
        assert_eq!(session.active(), None);

        let mut session = active_session();
        session.handle_event(AnchorEvent::Found(99));
        assert_eq!(session.active(), None);
        assert!(session.drain_notices().is_empty());
    }

    #[test]
    fn test_rotation_commands() {
        let mut session = active_session();
        for _ in 0..3 {
            session.rotate(RotateDirection::Right);
        }
        let expected = 3.0 * std::f32::consts::PI / 8.0;
        assert!((session.rotation().angle - expected).abs() < 1e-6);

        session.rotate(RotateDirection::Left);
        assert!((session.rotation().angle - (expected - ROTATE_STEP)).abs() < 1e-6);

        assert!(session.toggle_animation());
        assert!(!session.toggle_animation());
    }

    #[test]
    fn test_rotation_survives_lost_and_found() {
        let mut session = active_session();
        session.handle_event(AnchorEvent::Found(2));
        session.rotate(RotateDirection::Right);
        session.handle_event(AnchorEvent::Lost(2));
        session.handle_event(AnchorEvent::Found(2));
        assert!((session.rotation().angle - ROTATE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_visible_active() {
        let mut session = active_session();
        assert_eq!(session.visible_active(), None);
        session.handle_event(AnchorEvent::Found(6));
        assert_eq!(session.visible_active(), Some(6));
        session.handle_event(AnchorEvent::Lost(6));
        // Still active, but nothing to rotate while the marker is out of view
        assert_eq!(session.visible_active(), None);
    }

    #[test]
    fn test_parse_anchor_events() {
        let events = parse_anchor_events(r#"[{"type":"found","index":2},{"type":"lost","index":0}]"#).unwrap();
        assert_eq!(events, vec![AnchorEvent::Found(2), AnchorEvent::Lost(0)]);
        assert!(parse_anchor_events("[]").unwrap().is_empty());
        assert!(parse_anchor_events(r#"[{"type":"moved","index":1}]"#).is_err());
    }

    #[test]
    fn test_parse_anchor_poses() {
        let json = r#"[{"index":1,"matrix":[1,0,0,0,0,1,0,0,0,0,1,0,0.1,0.2,-3,1]}]"#;
        let poses = parse_anchor_poses(json).unwrap();
        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0].index, 1);
        assert_eq!(poses[0].matrix[14], -3.0);

        // Matrices must have exactly 16 entries
        assert!(parse_anchor_poses(r#"[{"index":0,"matrix":[1,0,0]}]"#).is_err());
    }

    #[test]
    fn test_tracker_ready_json() {
        let ready: TrackerReady = serde_json::from_str(r#"{"targets":9,"fovY":0.9}"#).unwrap();
        assert_eq!(ready.targets, 9);
        assert!((ready.fov_y - 0.9).abs() < 1e-6);

        let ready: TrackerReady = serde_json::from_str(r#"{"targets":3}"#).unwrap();
        assert_eq!(ready.fov_y, std::f32::consts::FRAC_PI_4);
    }
}
