//! Browser tracker backend
//!
//! Wraps the marker tracking library loaded by the page. Initialization runs
//! in a spawned future and reports back through [`PendingStarts`]; found/lost
//! callbacks and anchor poses are buffered by the JS bridge and polled once
//! per frame.

use bevy::prelude::*;
use markerview_core::{
    ArConfig, CameraConstraints, SessionError, SessionState, TrackerBackend, TrackerReady,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::ArSession;

pub struct TrackerPlugin;

/// Initialization outcomes waiting to be handed to the session
#[derive(Resource, Clone, Default)]
pub struct PendingStarts(pub Arc<Mutex<VecDeque<(u64, Result<TrackerReady, SessionError>)>>>);

/// Latest pose of each visible anchor
#[derive(Resource, Default)]
pub struct AnchorPoses {
    pub poses: HashMap<usize, Mat4>,
}

#[cfg(target_arch = "wasm32")]
mod bridge {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(module = "/js/tracker_bridge.js")]
    extern "C" {
        /// Resolves to `{ targets, fovY }`
        #[wasm_bindgen(catch, js_name = startTracker)]
        pub async fn start_tracker(
            generation: f64,
            video: &web_sys::HtmlVideoElement,
            dataset_url: &str,
            max_track: u32,
        ) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = stopTracker)]
        pub fn stop_tracker();

        #[wasm_bindgen(js_name = registerAnchor)]
        pub fn register_anchor(index: u32);

        #[wasm_bindgen(js_name = clearAnchors)]
        pub fn clear_anchors();

        /// JSON array of `{ "type": "found" | "lost", "index": n }`
        #[wasm_bindgen(js_name = drainTrackerEvents)]
        pub fn drain_tracker_events() -> String;

        /// JSON array of `{ "index": n, "matrix": [16 floats] }`
        #[wasm_bindgen(js_name = anchorPoses)]
        pub fn anchor_poses() -> String;
    }
}

/// Generation allowed to finish starting; 0 once the tracker shuts down.
/// Shared with the spawned start so it can bail out after each await.
#[derive(Clone, Default)]
pub struct StartGuard(Arc<AtomicU64>);

impl StartGuard {
    fn begin(&self, generation: u64) {
        self.0.store(generation, Ordering::SeqCst);
    }

    fn cancel(&self) {
        self.0.store(0, Ordering::SeqCst);
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation != 0 && self.0.load(Ordering::SeqCst) == generation
    }
}

/// [`TrackerBackend`] backed by the page's tracking library and camera
pub struct BrowserTracker {
    video_id: String,
    dataset_url: String,
    max_track: u32,
    camera: CameraConstraints,
    pending: PendingStarts,
    guard: StartGuard,
}

impl BrowserTracker {
    pub fn new(video_id: &str, config: &ArConfig, pending: PendingStarts) -> Self {
        Self {
            video_id: video_id.to_string(),
            dataset_url: config.dataset_url.clone(),
            max_track: config.max_track,
            camera: config.camera.clone(),
            pending,
            guard: StartGuard::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn report(&self, generation: u64, result: Result<TrackerReady, SessionError>) {
        if let Ok(mut queue) = self.pending.0.lock() {
            queue.push_back((generation, result));
        }
    }
}

impl TrackerBackend for BrowserTracker {
    fn begin(&mut self, generation: u64) {
        self.guard.begin(generation);

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen_futures::spawn_local;

            let pending = self.pending.0.clone();
            let guard = self.guard.clone();
            let video_id = self.video_id.clone();
            let dataset_url = self.dataset_url.clone();
            let camera = self.camera.clone();
            let max_track = self.max_track;
            spawn_local(async move {
                let result =
                    start_tracking(generation, &guard, &video_id, &camera, &dataset_url, max_track).await;
                if let Ok(mut queue) = pending.lock() {
                    queue.push_back((generation, result));
                }
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!(dataset = %self.dataset_url, max_track = self.max_track, "Marker tracking needs a browser");
            self.report(
                generation,
                Err(SessionError::Init("marker tracking is only available in the browser".to_string())),
            );
        }
    }

    fn attach_anchor(&mut self, index: usize) {
        #[cfg(target_arch = "wasm32")]
        bridge::register_anchor(index as u32);
        tracing::debug!(index, "Anchor registered");
    }

    fn detach_all(&mut self) {
        #[cfg(target_arch = "wasm32")]
        bridge::clear_anchors();
    }

    fn shutdown(&mut self) {
        self.guard.cancel();
        #[cfg(target_arch = "wasm32")]
        {
            bridge::stop_tracker();
            crate::camera::release(&self.video_id);
        }
        tracing::debug!(video = %self.video_id, facing_mode = %self.camera.facing_mode, "Tracker shut down");
    }
}

/// Open the camera, then load the marker dataset and start tracking. Bails
/// out if a newer start or a shutdown happened while waiting.
#[cfg(target_arch = "wasm32")]
async fn start_tracking(
    generation: u64,
    guard: &StartGuard,
    video_id: &str,
    camera: &CameraConstraints,
    dataset_url: &str,
    max_track: u32,
) -> Result<TrackerReady, SessionError> {
    use crate::camera;

    let superseded = || !guard.is_current(generation);

    let video = camera::video_element(video_id)?;
    let stream = camera::open(camera).await?;
    if superseded() {
        camera::stop_stream(&stream);
        return Err(SessionError::Init("superseded by a newer start".to_string()));
    }
    let attached = camera::attach(&video, &stream).await;
    if superseded() {
        camera::discard(&video, &stream);
        return Err(SessionError::Init("superseded by a newer start".to_string()));
    }
    if let Err(e) = attached {
        camera::discard(&video, &stream);
        return Err(e);
    }

    tracing::info!(dataset = %dataset_url, max_track, "Loading marker dataset");
    let info = bridge::start_tracker(generation as f64, &video, dataset_url, max_track)
        .await
        .map_err(|e| SessionError::Init(camera::js_error_message(&e)))?;
    let json = js_sys::JSON::stringify(&info)
        .map(String::from)
        .map_err(|e| SessionError::Init(camera::js_error_message(&e)))?;
    serde_json::from_str(&json).map_err(|e| SessionError::Init(format!("bad tracker info: {}", e)))
}

impl Plugin for TrackerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnchorPoses>()
            .add_systems(Update, (process_start_results, poll_tracker_events, poll_anchor_poses).chain());
    }
}

/// Hand finished initializations to the session
fn process_start_results(pending: Res<PendingStarts>, mut session: ResMut<ArSession>) {
    let results: Vec<_> = match pending.0.lock() {
        Ok(mut queue) => queue.drain(..).collect(),
        Err(_) => return,
    };
    for (generation, result) in results {
        // Failures are logged and surfaced as notices by the controller
        let _ = session.0.complete_start(generation, result);
    }
}

/// Dispatch buffered found/lost callbacks
fn poll_tracker_events(mut session: ResMut<ArSession>) {
    if session.0.state() != SessionState::Active {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    {
        use markerview_core::session::parse_anchor_events;

        let json = bridge::drain_tracker_events();
        match parse_anchor_events(&json) {
            Ok(events) => {
                for event in events {
                    session.0.handle_event(event);
                }
            }
            Err(e) => tracing::warn!("Failed to parse tracker events: {}", e),
        }
    }
}

pub(crate) fn poll_anchor_poses(session: Res<ArSession>, mut poses: ResMut<AnchorPoses>) {
    if session.0.state() != SessionState::Active {
        if !poses.poses.is_empty() {
            poses.poses.clear();
        }
        return;
    }
    #[cfg(target_arch = "wasm32")]
    {
        use markerview_core::session::parse_anchor_poses;

        let json = bridge::anchor_poses();
        match parse_anchor_poses(&json) {
            Ok(list) => {
                poses.poses = list
                    .into_iter()
                    .map(|pose| (pose.index, Mat4::from_cols_array(&pose.matrix)))
                    .collect();
            }
            Err(e) => tracing::warn!("Failed to parse anchor poses: {}", e),
        }
    }
}
