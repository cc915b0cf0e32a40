use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::workflows::catalog::{CatalogSource, InMemoryCatalog};
use crate::workflows::publishing::domain::{PageId, PublishedPage};
use crate::workflows::publishing::repository::{PageRepository, RepositoryError};
use crate::workflows::publishing::{page_router, PagePublishingService, PublishingSettings};
use crate::workflows::wizard::{
    fields, CatalogKind, CreatorIdentity, CreatorRole, FieldValue, PageType, PartnerRef,
    PartyProfile, ResourceRef, SubmissionPayload,
};

pub(super) const TOKEN: &str = "nonce-7f3a";

pub(super) fn settings() -> PublishingSettings {
    PublishingSettings {
        base_url: "https://pages.example.com/p/".to_string(),
        submit_token: Some(TOKEN.to_string()),
    }
}

pub(super) fn loan_officer() -> CreatorIdentity {
    CreatorIdentity::new("user-42", ["loan_officer"])
}

pub(super) fn creator() -> PartyProfile {
    PartyProfile {
        name: "Morgan Ellis".to_string(),
        email: Some("morgan.ellis@example.com".to_string()),
        phone: Some("(515) 555-0142".to_string()),
        license: Some("1456789".to_string()),
        photo_url: Some("https://cdn.example.com/headshots/lo-101.png".to_string()),
        company: Some("Prairie Home Lending".to_string()),
    }
}

pub(super) fn realtor_partner() -> PartnerRef {
    PartnerRef {
        id: "re-201".to_string(),
        kind: CatalogKind::Realtor,
        profile: PartyProfile {
            name: "Dana Brooks".to_string(),
            email: Some("dana@brooksrealty.example.com".to_string()),
            phone: None,
            license: Some("S61234000".to_string()),
            photo_url: None,
            company: Some("Brooks Realty Group".to_string()),
        },
    }
}

fn text_fields(pairs: &[(&str, &str)]) -> BTreeMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), FieldValue::from(*value)))
        .collect()
}

/// Co-branded open house with a sign-in form attached.
pub(super) fn open_house_payload() -> SubmissionPayload {
    SubmissionPayload {
        page_type: PageType::OpenHouse,
        creator_role: CreatorRole::LoanOfficer,
        creator: creator(),
        fields: text_fields(&[
            (fields::PAGE_MODE, fields::MODE_CO_BRANDED),
            (fields::PROPERTY_ADDRESS, "1200 Grand Ave, Des Moines, IA"),
            (fields::EVENT_DATE, "2026-11-07"),
            (fields::START_TIME, "13:00"),
            (fields::END_TIME, "15:30"),
            (fields::HEADLINE, "Tour 1200 Grand this Saturday"),
            (fields::DESCRIPTION, "Snacks, rate sheets, and a walkthrough."),
        ]),
        partner: Some(realtor_partner()),
        resource: Some(ResourceRef {
            id: "form-11".to_string(),
            kind: CatalogKind::Form,
            name: "Open House Sign-In".to_string(),
        }),
    }
}

pub(super) fn calculator_payload(output: &str) -> SubmissionPayload {
    SubmissionPayload {
        page_type: PageType::MortgageCalculator,
        creator_role: CreatorRole::LoanOfficer,
        creator: creator(),
        fields: text_fields(&[
            (fields::PAGE_MODE, fields::MODE_SOLO),
            (fields::HEADLINE, "What will my payment be?"),
            (fields::BRAND_COLOR, "#2a9d8f"),
            (fields::OUTPUT_TYPE, output),
        ]),
        partner: None,
        resource: None,
    }
}

pub(super) fn build_service() -> (
    Arc<PagePublishingService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(PagePublishingService::new(repository.clone(), settings()));
    (service, repository)
}

pub(super) fn router_with_service(service: Arc<PagePublishingService<MemoryRepository>>) -> Router {
    let catalog: Arc<dyn CatalogSource> = Arc::new(InMemoryCatalog::demo());
    page_router(service, catalog)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) pages: Arc<Mutex<HashMap<PageId, PublishedPage>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.pages.lock().expect("repository mutex poisoned").len()
    }
}

impl PageRepository for MemoryRepository {
    fn insert(&self, page: PublishedPage) -> Result<PublishedPage, RepositoryError> {
        let mut guard = self.pages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&page.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(page.id.clone(), page.clone());
        Ok(page)
    }

    fn fetch(&self, id: &PageId) -> Result<Option<PublishedPage>, RepositoryError> {
        let guard = self.pages.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_author(&self, author_id: &str) -> Result<Vec<PublishedPage>, RepositoryError> {
        let guard = self.pages.lock().expect("repository mutex poisoned");
        let mut pages: Vec<_> = guard
            .values()
            .filter(|page| page.author_id == author_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pages)
    }
}

pub(super) struct UnavailableRepository;

impl PageRepository for UnavailableRepository {
    fn insert(&self, _page: PublishedPage) -> Result<PublishedPage, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PageId) -> Result<Option<PublishedPage>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_author(&self, _author_id: &str) -> Result<Vec<PublishedPage>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_str(&body).expect("json payload")
}
