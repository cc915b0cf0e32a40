use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{CatalogKind, FieldValue, PageType, PartnerRef, ResourceRef};
use super::schema::{fields, WizardSchema};

/// Whether the page carries one party's branding or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    Solo,
    CoBranded,
}

/// In-memory values collected across wizard steps. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardDraft {
    pub page_type: PageType,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub selected_partner: Option<PartnerRef>,
    #[serde(default)]
    pub selected_resource: Option<ResourceRef>,
}

impl WizardDraft {
    pub fn new(page_type: PageType) -> Self {
        Self {
            page_type,
            fields: BTreeMap::new(),
            selected_partner: None,
            selected_resource: None,
        }
    }

    /// Overwrites the field unconditionally.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn is_filled(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .map(|value| !value.is_blank())
            .unwrap_or(false)
    }

    /// Missing or unrecognized modes read as solo.
    pub fn page_mode(&self) -> PageMode {
        match self.text(fields::PAGE_MODE) {
            Some(fields::MODE_CO_BRANDED) => PageMode::CoBranded,
            _ => PageMode::Solo,
        }
    }

    pub fn is_co_branded(&self) -> bool {
        self.page_mode() == PageMode::CoBranded
    }
}

/// Something a step still needs before the wizard may leave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingRequirement {
    Field {
        key: &'static str,
        label: &'static str,
    },
    Partner(CatalogKind),
    Resource(CatalogKind),
}

impl fmt::Display for MissingRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRequirement::Field { label, .. } => f.write_str(label),
            MissingRequirement::Partner(CatalogKind::Realtor) => f.write_str("a realtor partner"),
            MissingRequirement::Partner(_) => f.write_str("a loan officer partner"),
            MissingRequirement::Resource(CatalogKind::Calendar) => {
                f.write_str("a booking calendar")
            }
            MissingRequirement::Resource(_) => f.write_str("a lead form"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepValidationError {
    #[error("step {step} does not exist")]
    UnknownStep { step: usize },
    #[error("please complete {step_title}: {}", join_missing(.missing))]
    Incomplete {
        step: usize,
        step_title: &'static str,
        missing: Vec<MissingRequirement>,
    },
}

impl StepValidationError {
    pub fn step(&self) -> usize {
        match self {
            StepValidationError::UnknownStep { step } => *step,
            StepValidationError::Incomplete { step, .. } => *step,
        }
    }

    pub fn missing(&self) -> &[MissingRequirement] {
        match self {
            StepValidationError::UnknownStep { .. } => &[],
            StepValidationError::Incomplete { missing, .. } => missing,
        }
    }
}

fn join_missing(missing: &[MissingRequirement]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pure check of one step against the schema table.
///
/// `partner_kind` is the catalog the creator draws partners from; it only
/// matters for co-branded pages on the partnership step.
pub fn validate_step(
    schema: &WizardSchema,
    step: usize,
    draft: &WizardDraft,
    partner_kind: CatalogKind,
) -> Result<(), StepValidationError> {
    let template = schema
        .step(step)
        .ok_or(StepValidationError::UnknownStep { step })?;

    let mut missing: Vec<MissingRequirement> = template
        .required_fields()
        .filter(|field| !draft.is_filled(field.key))
        .map(|field| MissingRequirement::Field {
            key: field.key,
            label: field.label,
        })
        .collect();

    if template.partner_step && draft.is_co_branded() && draft.selected_partner.is_none() {
        missing.push(MissingRequirement::Partner(partner_kind));
    }

    if let Some(kind) = template.resource {
        let attached = draft
            .selected_resource
            .as_ref()
            .map(|resource| resource.kind == kind)
            .unwrap_or(false);
        if !attached {
            missing.push(MissingRequirement::Resource(kind));
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StepValidationError::Incomplete {
            step,
            step_title: template.title,
            missing,
        })
    }
}

/// Validates every step in order, stopping at the first incomplete one.
pub fn validate_all(
    schema: &WizardSchema,
    draft: &WizardDraft,
    partner_kind: CatalogKind,
) -> Result<(), StepValidationError> {
    (0..schema.total_steps()).try_for_each(|step| validate_step(schema, step, draft, partner_kind))
}
