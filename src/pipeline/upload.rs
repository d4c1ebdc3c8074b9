use std::rc::Rc;

use tracing::debug;

use crate::model::{Palette, PaletteModel};
use crate::pipeline::extract::{ExtractionClient, ExtractionFailed};
use crate::pipeline::preview::{derive_preview, Preview};
use crate::pipeline::validate::{validate, ImageFile, ValidationError};

/// Monotonic id of an upload submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Handle for a request that has left validation. Pass it back to
/// [`UploadController::complete`] together with the service's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a submission must be completed for its palette to be shown"]
pub struct Submission {
    pub generation: Generation,
}

/// Why the current submission ended without a palette.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),
    #[error("Failed to extract colors. Please try again.")]
    ExtractionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating,
    Uploading(Generation),
    Ready(Rc<Palette>),
    Error(UploadError),
}

impl UploadState {
    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Validating => "validating",
            UploadState::Uploading(_) => "uploading",
            UploadState::Ready(_) => "ready",
            UploadState::Error(_) => "error",
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading(_))
    }
}

/// Whether a completed response was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Superseded,
}

/// Drives one image at a time from validation to a displayed palette.
///
/// Every submission that passes validation gets a fresh [`Generation`].
/// Answers carrying an older generation are ignored, so a slow response
/// can never overwrite the palette of a newer upload or a reset.
#[derive(Debug)]
pub struct UploadController {
    state: UploadState,
    model: PaletteModel,
    preview: Option<Preview>,
    generation: Generation,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
            model: PaletteModel::new(),
            preview: None,
            generation: Generation::default(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn palette(&self) -> Rc<Palette> {
        self.model.snapshot()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn error(&self) -> Option<&UploadError> {
        match &self.state {
            UploadState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Validate `file` and, if it passes, open a new generation.
    ///
    /// Any palette, preview or error from an earlier submission is cleared
    /// first. On rejection the controller ends in `Error(ValidationFailed)`
    /// and no request must be sent.
    pub fn begin(&mut self, file: &ImageFile) -> Result<Submission, UploadError> {
        self.model.clear();
        self.preview = None;
        self.transition(UploadState::Validating);

        if let Err(reason) = validate(&file.media_type, file.size()) {
            debug!(name = %file.name, %reason, "upload rejected");
            let err = UploadError::from(reason);
            self.transition(UploadState::Error(err.clone()));
            return Err(err);
        }

        self.preview = derive_preview(&file.bytes);
        self.generation = self.generation.next();
        self.transition(UploadState::Uploading(self.generation));
        Ok(Submission {
            generation: self.generation,
        })
    }

    /// Deliver the service's answer for `submission`.
    pub fn complete(
        &mut self,
        submission: Submission,
        result: Result<Palette, ExtractionFailed>,
    ) -> Completion {
        if submission.generation != self.generation || !self.state.is_uploading() {
            debug!(
                stale = submission.generation.0,
                current = self.generation.0,
                "discarding superseded extraction result"
            );
            return Completion::Superseded;
        }

        match result {
            Ok(palette) => {
                let palette = self.model.replace(palette);
                self.transition(UploadState::Ready(palette));
            }
            Err(failure) => {
                debug!(%failure, "extraction failed");
                self.transition(UploadState::Error(UploadError::ExtractionFailed));
            }
        }
        Completion::Applied
    }

    /// Validate, extract and apply in one call.
    pub fn submit(&mut self, file: &ImageFile, client: &dyn ExtractionClient) -> &UploadState {
        if let Ok(submission) = self.begin(file) {
            let result = client.extract(file);
            let _ = self.complete(submission, result);
        }
        &self.state
    }

    /// Record a file refused before it could become an [`ImageFile`].
    ///
    /// Clears the display and supersedes any request still in flight.
    pub fn reject(&mut self, reason: ValidationError) {
        self.model.clear();
        self.preview = None;
        self.generation = self.generation.next();
        self.transition(UploadState::Error(UploadError::from(reason)));
    }

    /// Drop everything shown and neutralize any request still in flight.
    pub fn reset(&mut self) {
        self.model.clear();
        self.preview = None;
        self.generation = self.generation.next();
        self.transition(UploadState::Idle);
    }

    fn transition(&mut self, next: UploadState) {
        debug!(from = self.state.name(), to = next.name(), "upload state");
        self.state = next;
    }
}
