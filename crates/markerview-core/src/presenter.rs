//! Status indicator and info panel state
//!
//! Pure presentation: session notices go in, display state comes out.
//! There is no retry logic here, an error only offers a manual reload.

use crate::catalog::{Catalog, Rgb};
use crate::session::{SessionError, SessionNotice};

pub const LABEL_LOADING: &str = "Iniciando cámara...";
pub const LABEL_CAMERA_ACTIVE: &str = "Cámara activa";
pub const LABEL_SEARCHING: &str = "Buscando marcador...";
pub const LABEL_STOPPED: &str = "Cámara en pausa";
pub const LABEL_CAMERA_ERROR: &str = "Error de cámara";
pub const LABEL_INIT_ERROR: &str = "Error de inicialización";
pub const INFO_PLACEHOLDER: &str = "Apunta la cámara a un marcador para ver la información del objeto.";
pub const RETRY_LABEL: &str = "Reintentar";

/// Indicator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Loading,
    Active,
    Searching,
    Error,
}

impl DisplayState {
    /// Indicator color for this state
    pub fn color(self) -> Rgb {
        match self {
            DisplayState::Loading => Rgb::new(0xff, 0xcc, 0x00),
            DisplayState::Active => Rgb::new(0x00, 0xff, 0x00),
            DisplayState::Searching => Rgb::new(0x00, 0xcc, 0xff),
            DisplayState::Error => Rgb::new(0xff, 0x00, 0x00),
        }
    }
}

/// Status indicator: a colored dot and a label
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub state: DisplayState,
    pub label: String,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            state: DisplayState::Loading,
            label: LABEL_LOADING.to_string(),
        }
    }
}

/// Info panel contents
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InfoView {
    #[default]
    Placeholder,
    Detected {
        name: String,
        description: String,
    },
}

/// Full-screen error panel with a reload action
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    pub title: String,
    pub message: String,
    pub retry_label: &'static str,
}

impl ErrorPanel {
    fn from_error(error: &SessionError) -> Self {
        let (title, message) = match error {
            SessionError::Permission(_) => (
                "No se pudo acceder a la cámara".to_string(),
                "Por favor, permite el acceso a la cámara en tu navegador.".to_string(),
            ),
            SessionError::Init(detail) => (
                "No se pudo iniciar la realidad aumentada".to_string(),
                format!("El rastreador de marcadores no pudo iniciarse: {}", detail),
            ),
            SessionError::DatasetMismatch { catalog, targets } => (
                "Configuración de marcadores incorrecta".to_string(),
                format!(
                    "El archivo de marcadores contiene {} imágenes pero hay {} modelos configurados.",
                    targets, catalog
                ),
            ),
        };
        Self {
            title,
            message,
            retry_label: RETRY_LABEL,
        }
    }
}

/// Translates session notices into what the page shows
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    status: StatusView,
    info: InfoView,
    error: Option<ErrorPanel>,
    warning: Option<String>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, notice: &SessionNotice, catalog: &Catalog) {
        match notice {
            SessionNotice::Starting => {
                self.set_status(DisplayState::Loading, LABEL_LOADING);
                self.info = InfoView::Placeholder;
                self.error = None;
                self.warning = None;
            }
            SessionNotice::Started { .. } => {
                self.set_status(DisplayState::Active, LABEL_CAMERA_ACTIVE);
            }
            SessionNotice::Failed(error) => {
                let label = if error.is_permission() {
                    LABEL_CAMERA_ERROR
                } else {
                    LABEL_INIT_ERROR
                };
                self.set_status(DisplayState::Error, label);
                self.error = Some(ErrorPanel::from_error(error));
            }
            SessionNotice::Stopped => {
                self.set_status(DisplayState::Loading, LABEL_STOPPED);
                self.info = InfoView::Placeholder;
                self.error = None;
            }
            SessionNotice::Detected { index } => match catalog.get(*index) {
                Some(model) => {
                    self.set_status(DisplayState::Active, &format!("Detectado: {}", model.name));
                    self.info = InfoView::Detected {
                        name: model.name.clone(),
                        description: model.description.clone(),
                    };
                }
                None => tracing::warn!(index, "Detected anchor has no catalog entry"),
            },
            SessionNotice::Searching { .. } => {
                self.set_status(DisplayState::Searching, LABEL_SEARCHING);
            }
            SessionNotice::Cleared { .. } => {
                self.info = InfoView::Placeholder;
            }
            SessionNotice::DatasetMismatch { catalog, targets } => {
                self.warning = Some(format!(
                    "{} marcadores del archivo no tienen modelo asignado",
                    targets.saturating_sub(*catalog)
                ));
            }
        }
    }

    fn set_status(&mut self, state: DisplayState, label: &str) {
        self.status = StatusView {
            state,
            label: label.to_string(),
        };
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn info(&self) -> &InfoView {
        &self.info
    }

    pub fn error(&self) -> Option<&ErrorPanel> {
        self.error.as_ref()
    }

    /// Non-fatal configuration diagnostic
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(presenter: &mut Presenter, notices: &[SessionNotice]) {
        let catalog = Catalog::builtin().unwrap();
        for notice in notices {
            presenter.apply(notice, &catalog);
        }
    }

    #[test]
    fn test_startup_sequence() {
        let mut presenter = Presenter::new();
        assert_eq!(presenter.status().state, DisplayState::Loading);

        apply_all(
            &mut presenter,
            &[SessionNotice::Starting, SessionNotice::Started { anchors: 9 }],
        );
        assert_eq!(presenter.status().state, DisplayState::Active);
        assert_eq!(presenter.status().label, LABEL_CAMERA_ACTIVE);
        assert_eq!(presenter.info(), &InfoView::Placeholder);
    }

    #[test]
    fn test_detection_updates_info() {
        let mut presenter = Presenter::new();
        apply_all(
            &mut presenter,
            &[
                SessionNotice::Started { anchors: 9 },
                SessionNotice::Detected { index: 0 },
            ],
        );
        assert_eq!(presenter.status().label, "Detectado: Balón Adidas Telstar");
        match presenter.info() {
            InfoView::Detected { name, description } => {
                assert_eq!(name, "Balón Adidas Telstar");
                assert!(description.starts_with("El Telstar"));
            }
            other => panic!("unexpected info view: {:?}", other),
        }

        // Losing the marker changes the indicator but keeps the info panel
        apply_all(&mut presenter, &[SessionNotice::Searching { index: 0 }]);
        assert_eq!(presenter.status().state, DisplayState::Searching);
        assert_eq!(presenter.status().label, LABEL_SEARCHING);
        assert!(matches!(presenter.info(), InfoView::Detected { .. }));
    }

    #[test]
    fn test_info_reset_on_restart_and_clear() {
        let mut presenter = Presenter::new();
        apply_all(
            &mut presenter,
            &[
                SessionNotice::Started { anchors: 9 },
                SessionNotice::Detected { index: 2 },
                SessionNotice::Starting,
            ],
        );
        assert_eq!(presenter.info(), &InfoView::Placeholder);

        apply_all(
            &mut presenter,
            &[
                SessionNotice::Started { anchors: 9 },
                SessionNotice::Detected { index: 2 },
                SessionNotice::Searching { index: 2 },
                SessionNotice::Cleared { index: 2 },
            ],
        );
        assert_eq!(presenter.status().state, DisplayState::Searching);
        assert_eq!(presenter.info(), &InfoView::Placeholder);
    }

    #[test]
    fn test_permission_error_panel() {
        let mut presenter = Presenter::new();
        apply_all(
            &mut presenter,
            &[
                SessionNotice::Starting,
                SessionNotice::Failed(SessionError::Permission("NotAllowedError".into())),
            ],
        );
        assert_eq!(presenter.status().state, DisplayState::Error);
        assert_eq!(presenter.status().label, LABEL_CAMERA_ERROR);
        assert_eq!(presenter.status().state.color(), Rgb::new(0xff, 0, 0));

        let panel = presenter.error().unwrap();
        assert_eq!(panel.title, "No se pudo acceder a la cámara");
        assert_eq!(panel.retry_label, "Reintentar");

        // A new attempt clears the panel
        apply_all(&mut presenter, &[SessionNotice::Starting]);
        assert!(presenter.error().is_none());
    }

    #[test]
    fn test_init_error_panel() {
        let mut presenter = Presenter::new();
        apply_all(
            &mut presenter,
            &[SessionNotice::Failed(SessionError::DatasetMismatch {
                catalog: 9,
                targets: 4,
            })],
        );
        assert_eq!(presenter.status().label, LABEL_INIT_ERROR);
        assert!(presenter.error().unwrap().message.contains("4 imágenes"));
    }

    #[test]
    fn test_dataset_warning_and_stop() {
        let mut presenter = Presenter::new();
        apply_all(
            &mut presenter,
            &[
                SessionNotice::Started { anchors: 9 },
                SessionNotice::DatasetMismatch {
                    catalog: 9,
                    targets: 11,
                },
                SessionNotice::Detected { index: 1 },
                SessionNotice::Stopped,
            ],
        );
        assert_eq!(
            presenter.warning(),
            Some("2 marcadores del archivo no tienen modelo asignado")
        );
        assert_eq!(presenter.status().label, LABEL_STOPPED);
        assert_eq!(presenter.info(), &InfoView::Placeholder);
    }

    #[test]
    fn test_state_colors_are_distinct() {
        let colors = [
            DisplayState::Loading,
            DisplayState::Active,
            DisplayState::Searching,
            DisplayState::Error,
        ]
        .map(DisplayState::color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
