//! Camera capture through `getUserMedia`
//!
//! The stream lives on the `<video>` element behind the canvas, so releasing
//! the camera only needs the element id.

#![cfg(target_arch = "wasm32")]

use markerview_core::{CameraConstraints, SessionError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

/// Look up the video element by id
pub fn video_element(id: &str) -> Result<HtmlVideoElement, SessionError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        .ok_or_else(|| SessionError::Init(format!("video element #{} not found", id)))
}

/// Ask for the camera. A denied prompt maps to [`SessionError::Permission`].
pub async fn open(constraints: &CameraConstraints) -> Result<MediaStream, SessionError> {
    let window = web_sys::window().ok_or_else(|| SessionError::Init("no window".to_string()))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| SessionError::Init("camera API unavailable (page must be served over HTTPS)".to_string()))?;

    let video = js_sys::JSON::parse(&constraints.to_video_json().to_string())
        .map_err(|e| SessionError::Init(js_error_message(&e)))?;
    let request = MediaStreamConstraints::new();
    request.set_video(&video);
    request.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&request)
        .map_err(classify_error)?;
    let stream = JsFuture::from(promise).await.map_err(classify_error)?;
    tracing::info!(facing_mode = %constraints.facing_mode, "Camera stream opened");
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| SessionError::Init("getUserMedia did not return a MediaStream".to_string()))
}

/// Show `stream` in the video element and wait for playback to start
pub async fn attach(video: &HtmlVideoElement, stream: &MediaStream) -> Result<(), SessionError> {
    video.set_src_object(Some(stream));
    let playing = video.play().map_err(|e| SessionError::Init(js_error_message(&e)))?;
    JsFuture::from(playing)
        .await
        .map_err(|e| SessionError::Init(js_error_message(&e)))?;
    Ok(())
}

/// Stop every track of `stream`
pub fn stop_stream(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Stop `stream` and take it off `video` if it is still shown there
pub fn discard(video: &HtmlVideoElement, stream: &MediaStream) {
    stop_stream(stream);
    if video
        .src_object()
        .is_some_and(|shown| js_sys::Object::is(&shown, stream))
    {
        video.set_src_object(None);
    }
}

/// Stop the stream shown in video element `id` and detach it
pub fn release(id: &str) {
    let Ok(video) = video_element(id) else {
        return;
    };
    if let Some(stream) = video.src_object() {
        stop_stream(&stream);
        tracing::info!("Camera released");
    }
    video.set_src_object(None);
}

fn classify_error(error: JsValue) -> SessionError {
    match error.dyn_ref::<DomException>() {
        Some(e) if matches!(e.name().as_str(), "NotAllowedError" | "SecurityError") => {
            SessionError::Permission(format!("{}: {}", e.name(), e.message()))
        }
        Some(e) => SessionError::Init(format!("{}: {}", e.name(), e.message())),
        None => SessionError::Init(js_error_message(&error)),
    }
}

/// Best-effort text for a thrown JS value
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(e) = error.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}
