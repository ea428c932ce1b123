use super::{CaptureMode, CapturePicker, CaptureRequest, PathPicker};
use crate::file::FileInput;
use crate::print_warn;

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "avif",
];

/// Native file dialog. Desktop dialogs cannot open a camera, so the mode only
/// changes the dialog title.
#[derive(Debug, Default)]
pub struct DialogPicker;

impl CapturePicker for DialogPicker {
    fn request_capture(&mut self, request: CaptureRequest) -> Option<FileInput> {
        let title = match request.mode {
            CaptureMode::Camera => "Capture Image",
            CaptureMode::Library => "Upload from Gallery",
        };

        let path = rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()?;

        PathPicker::read(&path)
            .map_err(|e| {
                print_warn!("Could not read {}: {e}", path.display());
            })
            .ok()
    }
}
