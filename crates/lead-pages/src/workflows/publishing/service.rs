use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{flatten_party, meta_keys, PageId, Party, PublishedPage};
use super::repository::{PageRepository, RepositoryError};
use crate::formats::{self, CalendarEvent, ContactCard, FormatError};
use crate::workflows::wizard::{
    fields, validate_all, CatalogKind, CreatorIdentity, CreatorRole, PageSubmitter, PageType,
    PublishedLink, StepValidationError, SubmissionError, SubmissionPayload, WizardDraft,
    WizardSchema,
};

/// Settings the service needs to mint URLs and authorize callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishingSettings {
    pub base_url: String,
    pub submit_token: Option<String>,
}

/// Creates page records from wizard submissions and serves their downloads.
pub struct PagePublishingService<R> {
    repository: Arc<R>,
    settings: PublishingSettings,
}

static PAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_page_id() -> PageId {
    let id = PAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PageId(format!("page-{id:06}"))
}

impl<R> PagePublishingService<R>
where
    R: PageRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: PublishingSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &PublishingSettings {
        &self.settings
    }

    /// Validates a submission and stores it as exactly one page record.
    pub fn publish(
        &self,
        identity: &CreatorIdentity,
        token: Option<&str>,
        payload: SubmissionPayload,
    ) -> Result<PublishedPage, PublishError> {
        self.authorize(identity, token, payload.creator_role)?;

        let schema = WizardSchema::for_page(payload.page_type);
        let partner_kind = payload.creator_role.partner_kind();

        if let Some(partner) = &payload.partner {
            if partner.kind != partner_kind {
                return Err(PublishError::WrongPartnerKind {
                    expected: partner_kind,
                });
            }
        }

        let draft = WizardDraft {
            page_type: payload.page_type,
            fields: payload.fields.clone(),
            selected_partner: payload.partner.clone(),
            selected_resource: payload.resource.clone(),
        };
        validate_all(&schema, &draft, partner_kind)?;

        if payload.page_type == PageType::MortgageCalculator
            && draft.text(fields::OUTPUT_TYPE) == Some(fields::OUTPUT_EMBED_CODE)
        {
            return Err(PublishError::EmbedOnly);
        }

        let id = next_page_id();
        let url = format!(
            "{}/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            payload.page_type.slug(),
            id
        );
        let title = page_title(&draft, &payload);
        let meta = flatten_submission(&schema, &draft, &payload);

        let page = PublishedPage {
            id,
            title,
            page_type: payload.page_type,
            creator_role: payload.creator_role,
            author_id: identity.user_id.clone(),
            url,
            created_at: Utc::now(),
            meta,
        };

        let stored = self.repository.insert(page)?;
        info!(
            page_id = %stored.id,
            page_type = %stored.page_type,
            author = %stored.author_id,
            co_branded = stored.is_co_branded(),
            "landing page published"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &PageId) -> Result<PublishedPage, PublishError> {
        let page = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(page)
    }

    pub fn pages_by(&self, author_id: &str) -> Result<Vec<PublishedPage>, PublishError> {
        Ok(self.repository.by_author(author_id)?)
    }

    /// ICS body for pages that describe a scheduled event.
    pub fn calendar(&self, id: &PageId, stamp: DateTime<Utc>) -> Result<String, PublishError> {
        let page = self.get(id)?;
        let event = calendar_event(&page, &self.host())?;
        Ok(formats::render_event(&event, stamp))
    }

    /// vCard for one party of the page, with the suggested download file name.
    pub fn contact_card(&self, id: &PageId, party: Party) -> Result<(String, String), PublishError> {
        let page = self.get(id)?;
        let card = contact_card(&page, party)?;
        let body = formats::render_card(&card)?;
        Ok((card.file_name(), body))
    }

    fn authorize(
        &self,
        identity: &CreatorIdentity,
        token: Option<&str>,
        role: CreatorRole,
    ) -> Result<(), PublishError> {
        if let Some(expected) = self.settings.submit_token.as_deref() {
            if token.map(str::trim) != Some(expected) {
                warn!(user = %identity.user_id, "submission rejected: invalid token");
                return Err(PublishError::InvalidToken);
            }
        }

        if identity.user_id.trim().is_empty() {
            return Err(PublishError::MissingIdentity);
        }

        if !identity.can_act_as(role) {
            warn!(user = %identity.user_id, role = role.role_key(), "submission rejected: role not granted");
            return Err(PublishError::RoleNotPermitted(role));
        }

        Ok(())
    }

    fn host(&self) -> String {
        let base = self.settings.base_url.as_str();
        let without_scheme = base.split_once("://").map(|(_, rest)| rest).unwrap_or(base);
        without_scheme
            .split(['/', ':'])
            .next()
            .filter(|host| !host.is_empty())
            .unwrap_or("localhost")
            .to_string()
    }
}

fn page_title(draft: &WizardDraft, payload: &SubmissionPayload) -> String {
    if let Some(headline) = draft.text(fields::HEADLINE) {
        return headline.to_string();
    }
    format!("{} by {}", payload.page_type.label(), payload.creator.name.trim())
}

/// Flattens schema fields, party branding, and resource references into string metadata.
///
/// Keys the schema does not know about are dropped.
fn flatten_submission(
    schema: &WizardSchema,
    draft: &WizardDraft,
    payload: &SubmissionPayload,
) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    meta.insert(
        meta_keys::PAGE_TYPE.to_string(),
        payload.page_type.slug().to_string(),
    );
    meta.insert(
        meta_keys::CREATOR_ROLE.to_string(),
        payload.creator_role.role_key().to_string(),
    );

    for (key, value) in &draft.fields {
        if schema.field(key).is_some() {
            meta.insert(key.clone(), value.to_meta());
        }
    }

    flatten_party(&mut meta, Party::Primary, &payload.creator);

    if draft.is_co_branded() {
        if let Some(partner) = &draft.selected_partner {
            meta.insert(meta_keys::PARTNER_ID.to_string(), partner.id.clone());
            meta.insert(
                meta_keys::PARTNER_ROLE.to_string(),
                partner.kind.slug().to_string(),
            );
            flatten_party(&mut meta, Party::Partner, &partner.profile);
        }
    }

    if let Some(resource) = &draft.selected_resource {
        meta.insert(
            meta_keys::RESOURCE_KIND.to_string(),
            resource.kind.slug().to_string(),
        );
        meta.insert(meta_keys::RESOURCE_ID.to_string(), resource.id.clone());
        meta.insert(meta_keys::RESOURCE_NAME.to_string(), resource.name.clone());
    }

    meta
}

pub(crate) fn calendar_event(page: &PublishedPage, host: &str) -> Result<CalendarEvent, PublishError> {
    if !page.page_type.has_schedule() {
        return Err(PublishError::NoSchedule(page.page_type));
    }

    let date = page
        .meta(fields::EVENT_DATE)
        .ok_or(FormatError::MissingField("event date"))?;
    let start = page
        .meta(fields::START_TIME)
        .ok_or(FormatError::MissingField("start time"))?;
    let (starts_at, ends_at) = CalendarEvent::schedule(date, start, page.meta(fields::END_TIME))?;

    let (summary, location) = match page.page_type {
        PageType::OpenHouse => {
            let address = page.meta(fields::PROPERTY_ADDRESS);
            let summary = match address {
                Some(address) => format!("Open House: {address}"),
                None => page.title.clone(),
            };
            (summary, address.map(str::to_string))
        }
        _ => {
            let summary = page
                .meta(fields::EVENT_TITLE)
                .map(str::to_string)
                .unwrap_or_else(|| page.title.clone());
            let location = match (page.meta(fields::VENUE_NAME), page.meta(fields::VENUE_ADDRESS)) {
                (Some(name), Some(address)) => Some(format!("{name}, {address}")),
                (Some(name), None) => Some(name.to_string()),
                (None, Some(address)) => Some(address.to_string()),
                (None, None) => None,
            };
            (summary, location)
        }
    };

    let description = page
        .meta(fields::DESCRIPTION)
        .or_else(|| page.meta(fields::SUBHEADLINE))
        .map(|text| format!("{text}\n\n{}", page.url))
        .or_else(|| Some(page.url.clone()));

    let organizer = page.party_profile(Party::Primary).and_then(|profile| {
        profile
            .email
            .map(|email| (profile.name.clone(), email))
    });

    Ok(CalendarEvent {
        uid: format!("{}@{host}", page.id),
        summary,
        description,
        location,
        url: Some(page.url.clone()),
        starts_at,
        ends_at,
        organizer,
    })
}

pub(crate) fn contact_card(page: &PublishedPage, party: Party) -> Result<ContactCard, PublishError> {
    let profile = page
        .party_profile(party)
        .ok_or(PublishError::NoSuchParty(party))?;
    let role = page.party_role(party);

    let title = match profile.license.as_deref() {
        Some(license) => format!("{}, {} #{license}", role.label(), role.license_label()),
        None => role.label().to_string(),
    };

    Ok(ContactCard {
        full_name: profile.name,
        organization: profile.company,
        title: Some(title),
        phone: profile.phone,
        email: profile.email,
        photo_url: profile.photo_url,
        url: Some(page.url.clone()),
        note: Some(format!("From {}", page.title)),
    })
}

/// Error raised by the publishing service.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("invalid or missing submission token")]
    InvalidToken,
    #[error("a signed-in user is required")]
    MissingIdentity,
    #[error("your account cannot create pages as a {}", .0.label())]
    RoleNotPermitted(CreatorRole),
    #[error("submission is for {found} but was sent to the {expected} wizard")]
    PageTypeMismatch { expected: PageType, found: PageType },
    #[error("partner must be a {expected:?} for this creator")]
    WrongPartnerKind { expected: CatalogKind },
    #[error(transparent)]
    Validation(#[from] StepValidationError),
    #[error("embed code output is generated in the wizard and is not published")]
    EmbedOnly,
    #[error("{} pages have no calendar download", .0.label())]
    NoSchedule(PageType),
    #[error("page has no {} party", .0.prefix())]
    NoSuchParty(Party),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// In-process submitter so a wizard session can publish without an HTTP hop.
pub struct ServiceSubmitter<'a, R> {
    service: &'a PagePublishingService<R>,
    identity: CreatorIdentity,
    token: Option<String>,
}

impl<'a, R> ServiceSubmitter<'a, R> {
    pub fn new(
        service: &'a PagePublishingService<R>,
        identity: CreatorIdentity,
        token: Option<String>,
    ) -> Self {
        Self {
            service,
            identity,
            token,
        }
    }
}

impl<R> PageSubmitter for ServiceSubmitter<'_, R>
where
    R: PageRepository + 'static,
{
    fn submit(&self, payload: &SubmissionPayload) -> Result<PublishedLink, SubmissionError> {
        let page = self
            .service
            .publish(&self.identity, self.token.as_deref(), payload.clone())
            .map_err(|err| SubmissionError::Rejected(err.to_string()))?;
        Ok(PublishedLink {
            id: page.id.0,
            url: page.url,
        })
    }
}
