use crate::error::ModalError;
use crate::print_debug;
use crate::render::Renderer;
use crate::state::SessionState;

/// Visibility of the enlarged annotated image.
#[derive(Debug, Default)]
pub struct ModalController {
    open: bool,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the overlay. Only possible when the current result has an
    /// annotated image that `renderer` can resolve, i.e. one the view can show.
    pub fn open(&mut self, state: &SessionState, renderer: &Renderer) -> Result<(), ModalError> {
        let resolved = state
            .annotated_image_ref()
            .and_then(|reference| renderer.resolve(reference));
        if resolved.is_none() {
            return Err(ModalError::NoAnnotatedImage);
        }
        print_debug!("Modal opened");
        self.open = true;
        Ok(())
    }

    /// Close the overlay. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
