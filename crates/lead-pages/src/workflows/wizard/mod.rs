//! Step-flow engine shared by every landing page wizard.
//!
//! Each wizard is a [`WizardSchema`] row in a declarative table; a
//! [`WizardSession`] drives any of them through the same draft, sequencer and
//! selectors without touching a view layer.

pub mod domain;
pub mod draft;
mod embed;
pub mod schema;
pub mod selector;
pub mod sequencer;
pub mod session;
pub mod submission;

pub use domain::{
    CatalogKind, CreatorIdentity, CreatorRole, FieldValue, PageType, PartnerRef, PartyProfile,
    ResourceRef,
};
pub use draft::{
    validate_all, validate_step, MissingRequirement, PageMode, StepValidationError, WizardDraft,
};
pub use embed::render_calculator_embed;
pub use schema::{fields, FieldKind, FieldSpec, StepTemplate, WizardSchema};
pub use selector::{CatalogSelector, SelectionError};
pub use sequencer::{SequencerPhase, StepSequencer};
pub use session::{CompletedOutput, SessionError, WizardContext, WizardSession};
pub use submission::{
    PageSubmitter, PublishedLink, SubmissionData, SubmissionError, SubmissionPayload,
    SubmissionResponse,
};
