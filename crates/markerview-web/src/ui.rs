//! UI overlays using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use markerview_core::presenter::INFO_PLACEHOLDER;
use markerview_core::{
    ErrorPanel, InfoView, OptionState, QuizController, RotateDirection, Rgb, SessionState,
};

use crate::app::{ActivePage, ArSession, GalleryState, Navigate, PagePresenter};

/// Grouped system parameters for the UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub page: Res<'w, ActivePage>,
    pub session: ResMut<'w, ArSession>,
    pub presenter: Res<'w, PagePresenter>,
    pub gallery: ResMut<'w, GalleryState>,
    pub navigate: MessageWriter<'w, Navigate>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Main UI system runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn color32(color: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn ui_system(mut params: UiParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("⚽ Markerview");
            ui.separator();
            for (page, label) in [(ActivePage::Home, "Inicio"), (ActivePage::Gallery, "Galería")] {
                if ui.selectable_label(*params.page == page, label).clicked() {
                    params.navigate.write(Navigate(page));
                }
            }
        });
    });

    match *params.page {
        ActivePage::Home => home_page(ctx, &mut params.session, &params.presenter),
        ActivePage::Gallery => gallery_page(ctx, &params.session, &mut params.gallery),
    }
}

/// Camera view: status indicator, controls, info panel and error panel
fn home_page(ctx: &egui::Context, session: &mut ArSession, presenter: &PagePresenter) {
    let presenter = &presenter.0;
    let active = session.0.state() == SessionState::Active;

    egui::TopBottomPanel::bottom("ar_panel").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let status = presenter.status();
            ui.colored_label(color32(status.state.color()), "●");
            ui.label(status.label.as_str());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Laid out right to left
                if ui.add_enabled(active, egui::Button::new("⟳")).on_hover_text("Girar a la derecha").clicked() {
                    session.0.rotate(RotateDirection::Right);
                }
                let animating = session.0.rotation().animating;
                let play = if animating { "⏸" } else { "▶" };
                if ui.add_enabled(active, egui::Button::new(play)).on_hover_text("Animación").clicked() {
                    let on = session.0.toggle_animation();
                    tracing::debug!(animating = on, "Animation toggled");
                }
                if ui.add_enabled(active, egui::Button::new("⟲")).on_hover_text("Girar a la izquierda").clicked() {
                    session.0.rotate(RotateDirection::Left);
                }
            });
        });

        ui.separator();
        match presenter.info() {
            InfoView::Placeholder => {
                ui.label(egui::RichText::new(INFO_PLACEHOLDER).italics());
            }
            InfoView::Detected { name, description } => {
                ui.heading(name);
                ui.label(description);
            }
        }

        if let Some(warning) = presenter.warning() {
            ui.colored_label(egui::Color32::YELLOW, format!("⚠ {}", warning));
        }
        ui.add_space(4.0);
    });

    if let Some(panel) = presenter.error() {
        error_window(ctx, panel);
    }
}

fn error_window(ctx: &egui::Context, panel: &ErrorPanel) {
    egui::Window::new(panel.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(panel.message.as_str());
            ui.add_space(8.0);
            if ui.button(panel.retry_label).clicked() {
                reload_page();
            }
        });
}

#[cfg(target_arch = "wasm32")]
fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            tracing::error!("Failed to reload page: {:?}", e);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn reload_page() {
    tracing::warn!("Page reload is only available in the browser");
}

/// Catalog browser and trivia quiz
fn gallery_page(ctx: &egui::Context, session: &ArSession, gallery: &mut GalleryState) {
    let catalog = session.0.catalog();

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Galería de modelos");
            if let Some(model) = gallery.browser.current(catalog) {
                ui.horizontal(|ui| {
                    ui.colored_label(color32(model.color), "■");
                    ui.strong(&model.name);
                    ui.weak(format!("({})", model.geometry.name()));
                });
                ui.label(&model.description);
            }
            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    gallery.browser.prev(catalog);
                }
                ui.label(gallery.browser.position_text(catalog));
                if ui.button("▶").clicked() {
                    gallery.browser.next(catalog);
                }
            });

            ui.add_space(16.0);
            ui.separator();
            ui.heading("Trivia");
            let GalleryState { quiz, advance, .. } = &mut *gallery;
            match quiz {
                Some(quiz) => quiz_section(ui, quiz, advance),
                None => {
                    ui.weak("La trivia no está disponible.");
                }
            }
        });
    });
}

fn quiz_section(ui: &mut egui::Ui, quiz: &mut QuizController, advance: &mut Option<(usize, Timer)>) {
    let current = quiz.current_index();
    ui.horizontal(|ui| {
        ui.label(quiz.progress_text());
        ui.separator();
        ui.label(quiz.score_text());
    });
    ui.label(egui::RichText::new(quiz.current_question().text.as_str()).strong());

    let mut picked = None;
    for (i, option) in quiz.current_question().options.iter().enumerate() {
        let state = quiz.option_state(i);
        let button = match state {
            OptionState::Available => egui::Button::new(option.as_str()),
            OptionState::Correct => egui::Button::new(format!("✔ {}", option)).fill(egui::Color32::DARK_GREEN),
            OptionState::Incorrect => egui::Button::new(format!("✘ {}", option)).fill(egui::Color32::DARK_RED),
            OptionState::Disabled => egui::Button::new(option.as_str()),
        };
        let enabled = state == OptionState::Available;
        if ui.add_enabled(enabled, button).clicked() {
            picked = Some(i);
        }
    }

    if let Some(option) = picked {
        if let Some(outcome) = quiz.select_answer(option) {
            if let Some(delay) = outcome.advance_after {
                *advance = Some((current, Timer::new(delay, TimerMode::Once)));
            }
        }
    }

    ui.horizontal(|ui| {
        if ui.add_enabled(current > 0, egui::Button::new("Anterior")).clicked() {
            quiz.prev();
        }
        if ui.add_enabled(current + 1 < quiz.len(), egui::Button::new("Siguiente")).clicked() {
            quiz.next();
        }
    });
}
