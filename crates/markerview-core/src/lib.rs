//! Markerview Core - catalog, geometry and state machines for the AR page
//!
//! This crate holds everything that does not touch the browser or the
//! rendering engine:
//! - Model catalog and the geometry factory that sizes each model's mesh
//! - AR session controller (lifecycle, anchors, active object, rotation)
//! - Per-frame render step
//! - Status/info presenter
//! - Gallery catalog browser and trivia quiz
//! - Page configuration

pub mod catalog;
pub mod config;
pub mod gallery;
pub mod geometry;
pub mod presenter;
pub mod quiz;
pub mod render;
pub mod session;

pub use catalog::{Catalog, CatalogError, GeometryKind, ModelDescriptor, Rgb};
pub use config::{ArConfig, CameraConstraints, ConfigError};
pub use gallery::CatalogBrowser;
pub use geometry::{build_mesh, MaterialSpec, MeshSpec, Polyhedron, PolyhedronKind, Shape};
pub use presenter::{DisplayState, ErrorPanel, InfoView, Presenter, StatusView};
pub use quiz::{AnswerOutcome, OptionState, Question, QuizController, QuizError};
pub use render::{FrameSink, RenderLoop};
pub use session::{
    ActiveObject, Anchor, AnchorEvent, AnchorPose, LostPolicy, RotateDirection, RotationState, SessionController,
    SessionError, SessionNotice, SessionState, TrackerBackend, TrackerReady,
};
