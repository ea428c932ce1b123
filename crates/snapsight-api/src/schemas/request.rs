use derive_new::new;

/// Borrowed view of the image that goes into the multipart body.
#[derive(Debug, Clone, Copy, new)]
pub struct ImageUpload<'a> {
    pub bytes: &'a [u8],
    pub file_name: &'a str,
    pub mime_type: &'a str,
}
