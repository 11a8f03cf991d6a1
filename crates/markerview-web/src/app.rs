//! Bevy application setup

use bevy::prelude::*;
use bevy::window::CompositeAlphaMode;
use bevy::winit::{UpdateMode, WinitSettings};
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use markerview_core::{
    ArConfig, Catalog, CatalogBrowser, Presenter, QuizController, RenderLoop, SessionController,
};
use std::time::Duration;

use crate::scene::ScenePlugin;
use crate::tracker::{BrowserTracker, PendingStarts, TrackerPlugin};
use crate::ui::UiPlugin;

/// Id of the `<video>` element that shows the camera feed
pub const VIDEO_ELEMENT_ID: &str = "markerview-video";

/// The AR session, driven by the tracker and UI systems
#[derive(Resource)]
pub struct ArSession(pub SessionController<BrowserTracker>);

/// Status indicator, info panel and error panel contents
#[derive(Resource, Default)]
pub struct PagePresenter(pub Presenter);

/// Frame counter for the AR render step
#[derive(Resource, Default)]
pub struct FrameCounter(pub RenderLoop);

/// Which page section is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Resource)]
pub enum ActivePage {
    #[default]
    Home,
    Gallery,
}

/// Request to switch page section
#[derive(Message, Debug, Clone, Copy)]
pub struct Navigate(pub ActivePage);

/// Gallery section state
#[derive(Resource)]
pub struct GalleryState {
    pub browser: CatalogBrowser,
    /// Missing when the quiz data failed to load
    pub quiz: Option<QuizController>,
    /// Question being left and the timer for the delayed advance
    pub advance: Option<(usize, Timer)>,
}

/// Read the configuration, applying `?dataset=`, `?lost=`, `?max_track=` and `?log=`
#[cfg(target_arch = "wasm32")]
pub fn config_from_browser() -> ArConfig {
    let mut config = ArConfig::default();
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    if let Err(e) = config.apply_query(&search) {
        // Logging is not up yet
        web_sys::console::warn_1(&format!("Ignoring URL parameters: {}", e).into());
        config = ArConfig::default();
    }
    config
}

#[cfg(not(target_arch = "wasm32"))]
pub fn config_from_browser() -> ArConfig {
    ArConfig::default()
}

/// Run the Bevy application
pub fn run(config: ArConfig) {
    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load model catalog: {}", e);
            return;
        }
    };
    tracing::info!(models = catalog.len(), dataset = %config.dataset_url, "Loaded model catalog");

    let quiz = match QuizController::builtin() {
        Ok(quiz) => Some(quiz.with_advance_delay(config.answer_advance_delay())),
        Err(e) => {
            tracing::warn!("Quiz disabled: {}", e);
            None
        }
    };

    let pending = PendingStarts::default();
    let tracker = BrowserTracker::new(VIDEO_ELEMENT_ID, &config, pending.clone());
    let session = SessionController::new(catalog, tracker)
        .with_lost_policy(config.lost_policy)
        .with_rotation_steps(config.rotation_step, config.animation_step);

    App::new()
        // Transparent so the camera video behind the canvas shows through
        .insert_resource(ClearColor(Color::NONE))
        // Idle pages sleep; the render step requests redraws while a session runs
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive_low_power(Duration::from_millis(100)),
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_millis(500)),
        })
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Markerview".to_string(),
                    canvas: Some("#markerview-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    transparent: true,
                    composite_alpha_mode: CompositeAlphaMode::PreMultiplied,
                    ..default()
                }),
                ..default()
            })
        )
        // Must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .insert_resource(ArSession(session))
        .insert_resource(pending)
        .insert_resource(GalleryState {
            browser: CatalogBrowser::new(),
            quiz,
            advance: None,
        })
        .init_resource::<PagePresenter>()
        .init_resource::<FrameCounter>()
        .init_resource::<ActivePage>()
        .add_message::<Navigate>()
        .add_plugins(TrackerPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, start_session)
        .add_systems(Update, (handle_navigation, update_presenter, advance_quiz))
        .run();
}

fn start_session(mut session: ResMut<ArSession>) {
    session.0.start();
}

/// Leaving Home stops the session and frees the camera; returning restarts it
fn handle_navigation(
    mut events: MessageReader<Navigate>,
    mut page: ResMut<ActivePage>,
    mut session: ResMut<ArSession>,
    mut gallery: ResMut<GalleryState>,
) {
    for Navigate(target) in events.read() {
        if *page == *target {
            continue;
        }
        tracing::info!(from = ?*page, to = ?target, "Switching page");
        match target {
            ActivePage::Home => {
                session.0.start();
            }
            ActivePage::Gallery => {
                let active = session.0.active();
                session.0.stop();
                // Open the gallery on the model that was last detected
                if let Some(active) = active {
                    gallery.browser.show(session.0.catalog(), active.anchor);
                }
            }
        }
        *page = *target;
    }
}

fn update_presenter(mut session: ResMut<ArSession>, mut presenter: ResMut<PagePresenter>) {
    let notices = session.0.drain_notices();
    if notices.is_empty() {
        return;
    }
    let catalog = session.0.catalog();
    for notice in &notices {
        presenter.0.apply(notice, catalog);
    }
}

/// Fire the delayed move to the next question
fn advance_quiz(time: Res<Time>, mut gallery: ResMut<GalleryState>) {
    let GalleryState { quiz, advance, .. } = &mut *gallery;
    let Some((from, timer)) = advance.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    let from = *from;
    *advance = None;
    if let Some(quiz) = quiz.as_mut() {
        quiz.complete_advance(from);
    }
}
