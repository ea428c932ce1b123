//! Pure projection of [SessionState] into what a view has to show.

use derive_new::new;
use url::{ParseError, Url};

use crate::outcome::UploadOutcome;
use crate::print_warn;
use crate::state::SessionState;

pub const SUBMIT_LABEL: &str = "Upload Image";
pub const SUBMIT_BUSY_LABEL: &str = "Uploading...";

/// Resolve an image reference returned by the service.
///
/// Absolute URIs are kept as is, anything else (typically `/static/...`) is
/// joined onto `base`. This is the only place such references are rewritten.
pub fn resolve_image_ref(base: &Url, reference: &str) -> Result<Url, ParseError> {
    match Url::parse(reference) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => base.join(reference),
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct PredictionRow {
    pub label: String,
    /// Value as returned by the service.
    pub confidence: f64,
    /// Bar fill in `[0, 1]`, clamped for display only.
    pub fill: f64,
    /// First entry of the list.
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusPanel {
    AwaitingUpload,
    InProgress,
    Predictions(Vec<PredictionRow>),
    NoPredictions,
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub preview_uri: Option<String>,
    pub file_name: Option<String>,
    /// Absent while nothing is selected.
    pub submit: Option<SubmitButton>,
    pub status: StatusPanel,
    /// Informational message next to a result, e.g. a processing error.
    pub notice: Option<String>,
    /// Full service response, shown along with a processing error.
    pub raw_response: Option<serde_json::Value>,
    pub annotated_image: Option<Url>,
}

/// Result-specific parts of a [DisplayModel].
struct OutcomeView {
    status: StatusPanel,
    notice: Option<String>,
    raw_response: Option<serde_json::Value>,
    annotated_image: Option<Url>,
}

impl OutcomeView {
    fn status(status: StatusPanel) -> Self {
        Self {
            status,
            notice: None,
            raw_response: None,
            annotated_image: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    asset_base: Url,
}

impl Renderer {
    pub fn new(asset_base: Url) -> Self {
        Self { asset_base }
    }

    pub fn asset_base(&self) -> &Url {
        &self.asset_base
    }

    /// Resolve against the configured base; unresolvable references are dropped.
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        resolve_image_ref(&self.asset_base, reference)
            .map_err(|e| {
                print_warn!("Ignoring annotated image reference '{reference}': {e}");
            })
            .ok()
    }

    pub fn render(&self, state: &SessionState) -> DisplayModel {
        let submit = state.image().map(|_| {
            if state.is_uploading() {
                SubmitButton {
                    enabled: false,
                    label: SUBMIT_BUSY_LABEL,
                }
            } else {
                SubmitButton {
                    enabled: true,
                    label: SUBMIT_LABEL,
                }
            }
        });

        let view = match state {
            SessionState::Idle | SessionState::Selected { .. } => {
                OutcomeView::status(StatusPanel::AwaitingUpload)
            }
            SessionState::Uploading { .. } => OutcomeView::status(StatusPanel::InProgress),
            SessionState::Resolved { outcome, .. } => self.render_outcome(outcome),
        };

        DisplayModel {
            preview_uri: state.preview().map(|p| p.uri()),
            file_name: state.image().map(|i| i.name().to_string()),
            submit,
            status: view.status,
            notice: view.notice,
            raw_response: view.raw_response,
            annotated_image: view.annotated_image,
        }
    }

    fn render_outcome(&self, outcome: &UploadOutcome) -> OutcomeView {
        match outcome {
            UploadOutcome::Failure { message } => OutcomeView::status(StatusPanel::Error {
                message: message.clone(),
            }),
            UploadOutcome::Success {
                predictions,
                annotated_image_ref,
                processing_error,
                raw,
                ..
            } => {
                let status = if predictions.is_empty() {
                    StatusPanel::NoPredictions
                } else {
                    StatusPanel::Predictions(
                        predictions
                            .iter()
                            .enumerate()
                            .map(|(i, p)| {
                                PredictionRow::new(
                                    p.label.clone(),
                                    p.confidence,
                                    (p.confidence / 100.0).clamp(0.0, 1.0),
                                    i == 0,
                                )
                            })
                            .collect(),
                    )
                };
                let annotated_image = annotated_image_ref
                    .as_deref()
                    .and_then(|reference| self.resolve(reference));
                OutcomeView {
                    status,
                    notice: processing_error.clone(),
                    raw_response: processing_error.as_ref().map(|_| raw.clone()),
                    annotated_image,
                }
            }
        }
    }
}
