use serde::Deserialize;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionSchema {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

/// Body returned by the analysis endpoint.
///
/// Every field is optional on the wire; unknown fields are ignored. The full
/// document is kept in `raw` so callers can surface it next to a processing error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub predictions: Option<Vec<PredictionSchema>>,
    #[serde(default)]
    pub processing_success: Option<bool>,
    #[serde(default)]
    pub processing_error: Option<String>,
    #[serde(default)]
    pub output_image_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl AnalysisResponse {
    /// Parse a response body. Anything that is not JSON of the expected shape
    /// is a [`ClientError::MalformedResponse`].
    pub fn from_slice(body: &[u8]) -> Result<Self, ClientError> {
        let raw = serde_json::from_slice::<serde_json::Value>(body)
            .map_err(ClientError::MalformedResponse)?;
        let mut response = serde_json::from_value::<AnalysisResponse>(raw.clone())
            .map_err(ClientError::MalformedResponse)?;
        response.raw = raw;
        Ok(response)
    }

    /// The service answered but reported that it could not process the image.
    pub fn processing_failed(&self) -> bool {
        self.processing_success == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_full_response() {
        let body = br#"{
            "processing_success": true,
            "predictions": [{"class": "cat", "confidence": 97.2}, {"class": "dog", "confidence": 2.1}],
            "output_image_url": "/static/out.png",
            "filename": "photo.jpg"
        }"#;
        let response = AnalysisResponse::from_slice(body).unwrap();

        let predictions = response.predictions.as_ref().unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "cat");
        assert_eq!(predictions[0].confidence, 97.2);
        assert_eq!(response.output_image_url.as_deref(), Some("/static/out.png"));
        assert_eq!(response.filename.as_deref(), Some("photo.jpg"));
        assert!(!response.processing_failed());
        assert_eq!(response.raw["filename"], "photo.jpg");
    }

    #[test]
    fn absent_and_unknown_fields_are_tolerated() {
        let response = AnalysisResponse::from_slice(br#"{"model": "resnet", "extra": [1, 2]}"#)
            .unwrap();
        assert!(response.predictions.is_none());
        assert!(response.output_image_url.is_none());
        assert!(response.filename.is_none());
        assert!(response.processing_success.is_none());
    }

    #[test]
    fn null_predictions_are_absent() {
        let response = AnalysisResponse::from_slice(br#"{"predictions": null}"#).unwrap();
        assert!(response.predictions.is_none());
    }

    #[test]
    fn out_of_range_confidence_is_kept() {
        let response =
            AnalysisResponse::from_slice(br#"{"predictions": [{"class": "x", "confidence": 250}]}"#)
                .unwrap();
        assert_eq!(response.predictions.unwrap()[0].confidence, 250.0);
    }

    #[test]
    fn processing_failure_is_flagged() {
        let response = AnalysisResponse::from_slice(
            br#"{"processing_success": false, "processing_error": "model not loaded"}"#,
        )
        .unwrap();
        assert!(response.processing_failed());
        assert_eq!(response.processing_error.as_deref(), Some("model not loaded"));
    }

    #[rstest]
    #[case::html(b"<html>oops</html>")]
    #[case::wrong_shape(br#"{"predictions": "cat"}"#)]
    #[case::truncated(br#"{"predictions": [{"class""#)]
    #[case::empty(b"")]
    fn bad_body_is_malformed(#[case] body: &[u8]) {
        let err = AnalysisResponse::from_slice(body).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(err.to_string(), "malformed response");
    }
}
