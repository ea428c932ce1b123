//! Single-flight upload coordination.
//!
//! Every selection, reset and submit moves the session to a new [Generation].
//! An upload is tagged with the generation it was issued under; its completion
//! is applied only if that generation is still the one in flight.

use derive_more::{Display, From};
use derive_new::new;
use snapsight_api::Client;

use crate::file::SelectedImage;
use crate::outcome::UploadOutcome;

mod worker;
pub use worker::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display("gen#{_0}")]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Permission to perform exactly one network request for one image.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    generation: Generation,
    image: SelectedImage,
}

impl UploadTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    /// Run the request on `transport` and tag the result.
    pub fn perform<T: UploadTransport + ?Sized>(self, transport: &T) -> UploadCompletion {
        let outcome = transport.upload(&self.image);
        UploadCompletion::new(self.generation, outcome)
    }
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct UploadCompletion {
    pub generation: Generation,
    pub outcome: UploadOutcome,
}

/// Whether a completion was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    /// The completion belongs to a superseded generation and was dropped.
    Stale,
}

/// Something that can send one image and report the outcome. A single call is
/// a single attempt.
pub trait UploadTransport: Send + Sync + 'static {
    fn upload(&self, image: &SelectedImage) -> UploadOutcome;
}

impl UploadTransport for Client {
    fn upload(&self, image: &SelectedImage) -> UploadOutcome {
        UploadOutcome::from_response(self.upload_image(image.as_upload()), image)
    }
}

impl<T: UploadTransport + ?Sized> UploadTransport for Box<T> {
    fn upload(&self, image: &SelectedImage) -> UploadOutcome {
        (**self).upload(image)
    }
}

impl<T: UploadTransport + ?Sized> UploadTransport for std::sync::Arc<T> {
    fn upload(&self, image: &SelectedImage) -> UploadOutcome {
        (**self).upload(image)
    }
}

/// Generation bookkeeping. The session state decides whether a submit is
/// allowed; this only issues tickets and recognizes their completions.
#[derive(Debug, Default)]
pub struct UploadController {
    generation: Generation,
    in_flight: Option<Generation>,
    issued: usize,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    /// Number of tickets issued so far, i.e. network requests allowed.
    pub fn issued(&self) -> usize {
        self.issued
    }

    pub(crate) fn begin(&mut self, image: SelectedImage) -> UploadTicket {
        self.generation = self.generation.next();
        self.in_flight = Some(self.generation);
        self.issued += 1;
        UploadTicket {
            generation: self.generation,
            image,
        }
    }

    /// Forget any in-flight upload; its completion will be stale.
    pub(crate) fn invalidate(&mut self) {
        self.generation = self.generation.next();
        self.in_flight = None;
    }

    pub(crate) fn accept(&mut self, generation: Generation) -> Disposition {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
            Disposition::Applied
        } else {
            Disposition::Stale
        }
    }
}
