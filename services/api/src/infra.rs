use lead_pages::config::PagesConfig;
use lead_pages::workflows::catalog::{CatalogError, InMemoryCatalog};
use lead_pages::workflows::publishing::{PageId, PageRepository, PublishedPage, RepositoryError};
use lead_pages::workflows::wizard::PageType;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPageRepository {
    pages: Arc<Mutex<HashMap<PageId, PublishedPage>>>,
}

impl PageRepository for InMemoryPageRepository {
    fn insert(&self, page: PublishedPage) -> Result<PublishedPage, RepositoryError> {
        let mut guard = self
            .pages
            .lock()
            .map_err(|_| RepositoryError::Unavailable("page store poisoned".to_string()))?;
        if guard.contains_key(&page.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(page.id.clone(), page.clone());
        Ok(page)
    }

    fn fetch(&self, id: &PageId) -> Result<Option<PublishedPage>, RepositoryError> {
        let guard = self
            .pages
            .lock()
            .map_err(|_| RepositoryError::Unavailable("page store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn by_author(&self, author_id: &str) -> Result<Vec<PublishedPage>, RepositoryError> {
        let guard = self
            .pages
            .lock()
            .map_err(|_| RepositoryError::Unavailable("page store poisoned".to_string()))?;
        let mut pages: Vec<_> = guard
            .values()
            .filter(|page| page.author_id == author_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }
}

/// Catalog from `PAGES_CATALOG_CSV` when configured, demo entries otherwise.
pub(crate) fn load_catalog(config: &PagesConfig) -> Result<InMemoryCatalog, CatalogError> {
    match &config.catalog_csv {
        Some(path) => {
            let catalog = InMemoryCatalog::from_path(path)?;
            info!(path = %path.display(), entries = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => Ok(InMemoryCatalog::demo()),
    }
}

pub(crate) fn parse_page_type(raw: &str) -> Result<PageType, String> {
    PageType::from_slug(raw).ok_or_else(|| {
        let known: Vec<_> = PageType::ordered()
            .iter()
            .map(|page_type| page_type.slug())
            .collect();
        format!("unknown page type '{raw}' (expected one of {})", known.join(", "))
    })
}
