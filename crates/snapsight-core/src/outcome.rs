use derive_new::new;
use snapsight_api::ClientError;
use snapsight_api::schemas::AnalysisResponse;

use crate::file::SelectedImage;

/// One class prediction, in the order the service returned it.
#[derive(Debug, Clone, PartialEq, new)]
pub struct Prediction {
    #[new(into)]
    pub label: String,
    /// Percentage as sent by the service. Not clamped.
    pub confidence: f64,
}

/// Terminal result of one upload attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success {
        predictions: Vec<Prediction>,
        annotated_image_ref: Option<String>,
        filename: String,
        /// Set when the service answered but reported `processing_success: false`.
        processing_error: Option<String>,
        raw: serde_json::Value,
    },
    Failure {
        message: String,
    },
}

impl UploadOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        UploadOutcome::Failure {
            message: message.into(),
        }
    }

    /// Map the result of a transport call onto an outcome. Every error becomes a
    /// `Failure` carrying the error's message.
    pub fn from_response(
        result: Result<AnalysisResponse, ClientError>,
        image: &SelectedImage,
    ) -> Self {
        match result {
            Ok(response) => Self::from_analysis(response, image),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    fn from_analysis(response: AnalysisResponse, image: &SelectedImage) -> Self {
        let processing_error = response.processing_failed().then(|| {
            response
                .processing_error
                .clone()
                .unwrap_or_else(|| "processing failed".to_string())
        });

        let predictions = response
            .predictions
            .unwrap_or_default()
            .into_iter()
            .map(|p| Prediction::new(p.label, p.confidence))
            .collect();

        UploadOutcome::Success {
            predictions,
            annotated_image_ref: response.output_image_url.filter(|url| !url.is_empty()),
            filename: response
                .filename
                .unwrap_or_else(|| image.name().to_string()),
            processing_error,
            raw: response.raw,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn predictions(&self) -> &[Prediction] {
        match self {
            UploadOutcome::Success { predictions, .. } => predictions,
            UploadOutcome::Failure { .. } => &[],
        }
    }

    pub fn annotated_image_ref(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success {
                annotated_image_ref,
                ..
            } => annotated_image_ref.as_deref(),
            UploadOutcome::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileInput, FileValidator};
    use snapsight_api::StatusCode;

    fn photo() -> SelectedImage {
        FileValidator::validate(Some(FileInput::new(vec![1], "image/jpeg", "photo.jpg"))).unwrap()
    }

    fn parse(body: &str) -> Result<AnalysisResponse, ClientError> {
        AnalysisResponse::from_slice(body.as_bytes())
    }

    #[test]
    fn success_keeps_service_order_and_values() {
        let outcome = UploadOutcome::from_response(
            parse(
                r#"{"processing_success":true,"predictions":[{"class":"dog","confidence":12.5},{"class":"cat","confidence":140}],"filename":"photo.jpg"}"#,
            ),
            &photo(),
        );

        assert_eq!(
            outcome.predictions(),
            &[Prediction::new("dog", 12.5), Prediction::new("cat", 140.0)]
        );
        let UploadOutcome::Success {
            processing_error,
            filename,
            ..
        } = outcome
        else {
            panic!("expected success");
        };
        assert_eq!(filename, "photo.jpg");
        assert!(processing_error.is_none());
    }

    #[test]
    fn missing_fields_fall_back() {
        let outcome = UploadOutcome::from_response(parse("{}"), &photo());

        assert!(outcome.is_success());
        assert!(outcome.predictions().is_empty());
        assert!(outcome.annotated_image_ref().is_none());
        let UploadOutcome::Success { filename, .. } = outcome else {
            panic!("expected success");
        };
        assert_eq!(filename, "photo.jpg");
    }

    #[test]
    fn processing_failure_is_informational() {
        let outcome = UploadOutcome::from_response(
            parse(r#"{"processing_success":false,"processing_error":"model offline"}"#),
            &photo(),
        );

        let UploadOutcome::Success {
            processing_error,
            raw,
            ..
        } = outcome
        else {
            panic!("processing errors are not failures");
        };
        assert_eq!(processing_error.as_deref(), Some("model offline"));
        assert_eq!(raw["processing_error"], "model offline");
    }

    #[test]
    fn empty_output_url_is_absent() {
        let outcome =
            UploadOutcome::from_response(parse(r#"{"output_image_url":""}"#), &photo());
        assert!(outcome.annotated_image_ref().is_none());
    }

    #[test]
    fn status_error_becomes_failure_naming_the_status() {
        let outcome = UploadOutcome::from_response(
            Err(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            }),
            &photo(),
        );
        let UploadOutcome::Failure { message } = outcome else {
            panic!("expected failure");
        };
        assert!(message.contains("500"));
    }

    #[test]
    fn transport_error_keeps_its_description() {
        let outcome = UploadOutcome::from_response(
            Err(ClientError::Transport("connection refused".to_string())),
            &photo(),
        );
        assert_eq!(outcome, UploadOutcome::failure("connection refused"));
    }

    #[test]
    fn malformed_body_becomes_malformed_failure() {
        let outcome = UploadOutcome::from_response(parse("<html>"), &photo());
        assert_eq!(outcome, UploadOutcome::failure("malformed response"));
    }
}
