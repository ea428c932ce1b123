use std::sync::Arc;

use derive_new::new;
use snapsight_api::schemas::ImageUpload;

use crate::error::ValidationError;
use crate::print_debug;

/// A raw file-like value as handed over by a picker, a drop or a paste.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileInput {
    #[new(into)]
    pub bytes: Vec<u8>,
    #[new(into)]
    pub mime_type: String,
    #[new(into)]
    pub name: String,
}

/// An input that passed [FileValidator::validate].
///
/// Only the validator can build one, so holding a `SelectedImage` is proof the
/// declared type was an image. The bytes are shared, cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    bytes: Arc<[u8]>,
    mime_type: String,
    name: String,
}

impl SelectedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn as_upload(&self) -> ImageUpload<'_> {
        ImageUpload::new(&self.bytes, &self.name, &self.mime_type)
    }
}

/// Syntactic gate on the declared MIME type. No content sniffing.
pub struct FileValidator;

impl FileValidator {
    pub fn validate(file: Option<FileInput>) -> Result<SelectedImage, ValidationError> {
        let Some(file) = file else {
            return Err(ValidationError::NotAnImage { mime_type: None });
        };

        if !Self::is_image_type(&file.mime_type) {
            print_debug!("Rejected '{}' ({})", file.name, file.mime_type);
            return Err(ValidationError::NotAnImage {
                mime_type: Some(file.mime_type),
            });
        }

        Ok(SelectedImage {
            bytes: file.bytes.into(),
            mime_type: file.mime_type.trim().to_string(),
            name: file.name,
        })
    }

    /// MIME types are case-insensitive; only the top-level type is checked.
    pub fn is_image_type(mime_type: &str) -> bool {
        mime_type
            .trim()
            .get(..6)
            .is_some_and(|top| top.eq_ignore_ascii_case("image/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/jpeg")]
    #[case("image/png")]
    #[case("image/heic")]
    #[case("IMAGE/PNG")]
    #[case(" image/webp")]
    fn accepts_image_types(#[case] mime: &str) {
        let image = FileValidator::validate(Some(FileInput::new(vec![1, 2, 3], mime, "a")))
            .unwrap();
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.mime_type(), mime.trim());
        assert_eq!(image.name(), "a");
    }

    #[rstest]
    #[case("text/plain")]
    #[case("application/pdf")]
    #[case("video/mp4")]
    #[case("")]
    #[case("image")]
    #[case("imagery/png")]
    #[case("application/octet-stream")]
    fn rejects_non_image_types(#[case] mime: &str) {
        let err = FileValidator::validate(Some(FileInput::new(vec![0], mime, "x"))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAnImage {
                mime_type: Some(mime.to_string())
            }
        );
        assert_eq!(err.to_string(), "not an image");
    }

    #[rstest]
    #[case(" image/webp")]
    #[case("image/png\t")]
    #[case("IMAGE/PNG")]
    fn accepted_image_reaches_the_network(#[case] mime: &str) {
        let endpoint = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            snapsight_api::Url::parse(&format!("http://{addr}/upload")).unwrap()
        };
        let client = snapsight_api::Client::new(endpoint).unwrap();
        let image =
            FileValidator::validate(Some(FileInput::new(vec![1], mime, "a.img"))).unwrap();

        // Nothing listens any more, so a well-formed request fails in transport.
        let err = client.upload_image(image.as_upload()).unwrap_err();
        assert!(err.is_transport(), "{err:?}");
    }

    #[test]
    fn rejects_missing_file() {
        let err = FileValidator::validate(None).unwrap_err();
        assert_eq!(err, ValidationError::NotAnImage { mime_type: None });
    }

    #[test]
    fn upload_view_borrows_the_image() {
        let image =
            FileValidator::validate(Some(FileInput::new(b"abc".to_vec(), "image/gif", "x.gif")))
                .unwrap();
        let upload = image.as_upload();
        assert_eq!(upload.bytes, b"abc");
        assert_eq!(upload.file_name, "x.gif");
        assert_eq!(upload.mime_type, "image/gif");
    }
}
