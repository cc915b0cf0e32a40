use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::workflows::catalog::{CatalogEntry, CatalogError, CatalogSource};

use super::domain::{CreatorRole, FieldValue, PageType, PartyProfile};
use super::draft::{validate_all, validate_step, StepValidationError, WizardDraft};
use super::embed::render_calculator_embed;
use super::schema::{fields, StepTemplate, WizardSchema};
use super::selector::{CatalogSelector, SelectionError};
use super::sequencer::{SequencerPhase, StepSequencer};
use super::submission::{PageSubmitter, PublishedLink, SubmissionError, SubmissionPayload};

/// Everything the host hands a wizard when it mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardContext {
    pub creator_role: CreatorRole,
    pub creator: PartyProfile,
    #[serde(default)]
    pub preferred_partner: Option<String>,
    #[serde(default)]
    pub preferred_resource: Option<String>,
    pub embed_base_url: String,
}

/// What the terminal success step shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletedOutput {
    Published(PublishedLink),
    EmbedCode { code: String },
}

impl CompletedOutput {
    /// Text offered by the copy-to-clipboard action.
    pub fn clipboard_text(&self) -> &str {
        match self {
            CompletedOutput::Published(link) => &link.url,
            CompletedOutput::EmbedCode { code } => code,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] StepValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("this wizard has already been completed")]
    AlreadyCompleted,
}

/// One mounted wizard: schema, draft, step counter, and selectors.
#[derive(Debug, Clone)]
pub struct WizardSession {
    schema: WizardSchema,
    context: WizardContext,
    draft: WizardDraft,
    sequencer: StepSequencer,
    partners: CatalogSelector,
    resources: Option<CatalogSelector>,
    completed: Option<CompletedOutput>,
}

impl WizardSession {
    pub fn new(page_type: PageType, context: WizardContext) -> Self {
        let schema = WizardSchema::for_page(page_type);
        let sequencer = StepSequencer::new(schema.total_steps());
        let partners = CatalogSelector::new(
            context.creator_role.partner_kind(),
            context.preferred_partner.clone(),
        );
        let resources = schema
            .resource_kind()
            .map(|kind| CatalogSelector::new(kind, context.preferred_resource.clone()));

        Self {
            schema,
            context,
            draft: WizardDraft::new(page_type),
            sequencer,
            partners,
            resources,
            completed: None,
        }
    }

    pub fn schema(&self) -> &WizardSchema {
        &self.schema
    }

    pub fn context(&self) -> &WizardContext {
        &self.context
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn current_step(&self) -> usize {
        self.sequencer.current()
    }

    pub fn current_template(&self) -> Option<&StepTemplate> {
        self.schema.step(self.sequencer.current())
    }

    pub fn total_steps(&self) -> usize {
        self.sequencer.total()
    }

    pub fn phase(&self) -> SequencerPhase {
        self.sequencer.phase()
    }

    pub fn progress_percent(&self) -> u8 {
        self.sequencer.progress_percent()
    }

    pub fn completed(&self) -> Option<&CompletedOutput> {
        self.completed.as_ref()
    }

    pub fn partner_candidates(&self) -> &[CatalogEntry] {
        self.partners.candidates()
    }

    pub fn resource_candidates(&self) -> &[CatalogEntry] {
        self.resources
            .as_ref()
            .map(CatalogSelector::candidates)
            .unwrap_or(&[])
    }

    /// Records a field value. Ignored once the wizard has completed.
    ///
    /// Clearing a value an earlier step needs moves the wizard back to that step.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        if self.sequencer.is_completed() {
            return false;
        }
        self.draft.set(field, value);
        self.settle_step();
        true
    }

    pub fn validate_step(&self, step: usize) -> Result<(), StepValidationError> {
        validate_step(
            &self.schema,
            step,
            &self.draft,
            self.context.creator_role.partner_kind(),
        )
    }

    pub fn next(&mut self) -> Result<usize, StepValidationError> {
        let partner_kind = self.context.creator_role.partner_kind();
        let schema = &self.schema;
        let draft = &self.draft;
        self.sequencer
            .next(|step| validate_step(schema, step, draft, partner_kind))
    }

    pub fn back(&mut self) -> usize {
        self.sequencer.back()
    }

    /// Jumps to `step`. Forward jumps only land when every earlier step validates.
    pub fn go_to(&mut self, step: usize) -> bool {
        if step > self.sequencer.current()
            && (0..step).any(|earlier| self.validate_step(earlier).is_err())
        {
            return false;
        }
        self.sequencer.go_to(step)
    }

    pub fn load_partners(
        &mut self,
        source: &dyn CatalogSource,
        search: Option<&str>,
    ) -> Result<&[CatalogEntry], SessionError> {
        self.ensure_editing()?;
        Ok(self.partners.load(source, search, &mut self.draft)?)
    }

    pub fn select_partner(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.partners.select(id, &mut self.draft)?;
        Ok(())
    }

    pub fn clear_partner(&mut self) {
        if !self.sequencer.is_completed() {
            self.partners.clear(&mut self.draft);
            self.settle_step();
        }
    }

    /// Loads forms or calendars for wizards with an intake step; others get an empty list.
    pub fn load_resources(
        &mut self,
        source: &dyn CatalogSource,
        search: Option<&str>,
    ) -> Result<&[CatalogEntry], SessionError> {
        self.ensure_editing()?;
        match self.resources.as_mut() {
            Some(selector) => Ok(selector.load(source, search, &mut self.draft)?),
            None => Ok(&[][..]),
        }
    }

    pub fn select_resource(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_editing()?;
        match self.resources.as_ref() {
            Some(selector) => {
                selector.select(id, &mut self.draft)?;
                Ok(())
            }
            None => Err(SelectionError::NoIntakeStep(self.draft.page_type).into()),
        }
    }

    pub fn clear_resource(&mut self) {
        if self.sequencer.is_completed() {
            return;
        }
        if let Some(selector) = self.resources.as_ref() {
            selector.clear(&mut self.draft);
            self.settle_step();
        }
    }

    /// The draft as the publishing endpoint expects it.
    pub fn payload(&self) -> SubmissionPayload {
        let partner = if self.draft.is_co_branded() {
            self.draft.selected_partner.clone()
        } else {
            None
        };

        SubmissionPayload {
            page_type: self.draft.page_type,
            creator_role: self.context.creator_role,
            creator: self.context.creator.clone(),
            fields: self.draft.fields.clone(),
            partner,
            resource: self.draft.selected_resource.clone(),
        }
    }

    /// Whether finishing this draft produces an embed snippet instead of a page.
    pub fn wants_embed_code(&self) -> bool {
        self.draft.page_type == PageType::MortgageCalculator
            && self.draft.text(fields::OUTPUT_TYPE) == Some(fields::OUTPUT_EMBED_CODE)
    }

    /// Finishes the wizard.
    ///
    /// Every step is re-validated first. Embed-code calculators never reach the
    /// submitter. On failure the draft and current step are left untouched.
    pub fn submit(
        &mut self,
        submitter: &dyn PageSubmitter,
    ) -> Result<&CompletedOutput, SessionError> {
        self.ensure_editing()?;
        validate_all(
            &self.schema,
            &self.draft,
            self.context.creator_role.partner_kind(),
        )?;

        let output = if self.wants_embed_code() {
            CompletedOutput::EmbedCode {
                code: render_calculator_embed(
                    &self.draft,
                    &self.context.creator,
                    &self.context.embed_base_url,
                ),
            }
        } else {
            let payload = self.payload();
            match submitter.submit(&payload) {
                Ok(link) => {
                    info!(page_type = %payload.page_type, page_id = %link.id, "wizard submission accepted");
                    CompletedOutput::Published(link)
                }
                Err(err) => {
                    warn!(page_type = %payload.page_type, error = %err, "wizard submission failed");
                    return Err(err.into());
                }
            }
        };

        self.sequencer.complete();
        self.draft = WizardDraft::new(self.draft.page_type);
        Ok(self.completed.insert(output))
    }

    /// Pulls the index back to the first earlier step that no longer validates.
    fn settle_step(&mut self) {
        let current = self.sequencer.current();
        if let Some(step) = (0..current).find(|&step| self.validate_step(step).is_err()) {
            self.sequencer.go_to(step);
        }
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        if self.sequencer.is_completed() {
            Err(SessionError::AlreadyCompleted)
        } else {
            Ok(())
        }
    }
}
