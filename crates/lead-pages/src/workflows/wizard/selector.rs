use crate::workflows::catalog::{CatalogEntry, CatalogError, CatalogSource};

use super::domain::{CatalogKind, PageType, PartnerRef, ResourceRef};
use super::draft::WizardDraft;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no {kind:?} entry with id '{id}' is available")]
    UnknownEntry { kind: CatalogKind, id: String },
    #[error("{} pages do not attach a form or calendar", .0.label())]
    NoIntakeStep(PageType),
}

/// Searchable picker bound to one catalog kind, loaded at most once.
#[derive(Debug, Clone)]
pub struct CatalogSelector {
    kind: CatalogKind,
    preferred: Option<String>,
    candidates: Vec<CatalogEntry>,
    loaded: bool,
    last_error: Option<String>,
}

impl CatalogSelector {
    pub fn new(kind: CatalogKind, preferred: Option<String>) -> Self {
        Self {
            kind,
            preferred,
            candidates: Vec::new(),
            loaded: false,
            last_error: None,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn candidates(&self) -> &[CatalogEntry] {
        &self.candidates
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message from the last failed fetch, shown next to a retry control.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetches candidates once. A failed fetch leaves the list empty so the caller can retry.
    ///
    /// When a preferred id was supplied and appears in the list it is selected into `draft`.
    pub fn load(
        &mut self,
        source: &dyn CatalogSource,
        search: Option<&str>,
        draft: &mut WizardDraft,
    ) -> Result<&[CatalogEntry], CatalogError> {
        if self.loaded {
            return Ok(&self.candidates);
        }

        match source.list(self.kind, search) {
            Ok(candidates) => {
                self.candidates = candidates;
                self.loaded = true;
                self.last_error = None;
            }
            Err(err) => {
                self.candidates.clear();
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        }

        if let Some(preferred) = self.preferred.clone() {
            if self.candidates.iter().any(|entry| entry.id == preferred) {
                self.select(&preferred, draft)
                    .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
            }
        }

        Ok(&self.candidates)
    }

    /// Client-side filtering of the loaded candidates.
    pub fn filtered<'a>(&'a self, search: Option<&'a str>) -> impl Iterator<Item = &'a CatalogEntry> {
        self.candidates
            .iter()
            .filter(move |entry| entry.matches(search))
    }

    /// Copies the chosen entry's display fields into the draft.
    pub fn select(&self, id: &str, draft: &mut WizardDraft) -> Result<(), SelectionError> {
        let entry = self
            .candidates
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| SelectionError::UnknownEntry {
                kind: self.kind,
                id: id.to_string(),
            })?;

        if self.kind.is_partner() {
            draft.selected_partner = Some(PartnerRef {
                id: entry.id.clone(),
                kind: entry.kind,
                profile: entry.profile.clone(),
            });
        } else {
            draft.selected_resource = Some(ResourceRef {
                id: entry.id.clone(),
                kind: entry.kind,
                name: entry.profile.name.clone(),
            });
        }
        Ok(())
    }

    pub fn clear(&self, draft: &mut WizardDraft) {
        if self.kind.is_partner() {
            draft.selected_partner = None;
        } else {
            draft.selected_resource = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::catalog::InMemoryCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FlakySource {
        calls: AtomicUsize,
    }

    impl CatalogSource for FlakySource {
        fn list(
            &self,
            kind: CatalogKind,
            search: Option<&str>,
        ) -> Result<Vec<CatalogEntry>, CatalogError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(CatalogError::Unavailable("timeout".to_string()));
            }
            InMemoryCatalog::demo().list(kind, search)
        }
    }

    #[test]
    fn load_fetches_only_once() {
        let source = FlakySource::default();
        source.calls.store(1, Ordering::SeqCst);
        let mut draft = WizardDraft::new(PageType::OpenHouse);
        let mut selector = CatalogSelector::new(CatalogKind::Realtor, None);

        let first = selector
            .load(&source, None, &mut draft)
            .expect("loads")
            .len();
        let second = selector
            .load(&source, None, &mut draft)
            .expect("cached")
            .len();
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_load_leaves_list_empty_and_allows_retry() {
        let source = FlakySource::default();
        let mut draft = WizardDraft::new(PageType::OpenHouse);
        let mut selector = CatalogSelector::new(CatalogKind::Realtor, None);

        assert!(selector.load(&source, None, &mut draft).is_err());
        assert!(selector.candidates().is_empty());
        assert!(!selector.is_loaded());
        assert_eq!(selector.last_error(), Some("catalog unavailable: timeout"));

        let loaded = selector.load(&source, None, &mut draft).expect("retry works");
        assert!(!loaded.is_empty());
        assert!(selector.last_error().is_none());
    }

    #[test]
    fn preferred_partner_is_selected_on_load() {
        let catalog = InMemoryCatalog::demo();
        let mut draft = WizardDraft::new(PageType::RateQuote);
        let mut selector = CatalogSelector::new(CatalogKind::Realtor, Some("re-202".to_string()));

        selector.load(&catalog, None, &mut draft).expect("loads");
        let partner = draft.selected_partner.expect("auto-selected");
        assert_eq!(partner.id, "re-202");
        assert_eq!(partner.profile.name, "Luis Ortega");
    }

    #[test]
    fn missing_preferred_id_selects_nothing() {
        let catalog = InMemoryCatalog::demo();
        let mut draft = WizardDraft::new(PageType::RateQuote);
        let mut selector = CatalogSelector::new(CatalogKind::Realtor, Some("re-999".to_string()));

        selector.load(&catalog, None, &mut draft).expect("loads");
        assert!(draft.selected_partner.is_none());
    }

    #[test]
    fn select_and_clear_resources() {
        let catalog = InMemoryCatalog::demo();
        let mut draft = WizardDraft::new(PageType::ApplyNow);
        let mut selector = CatalogSelector::new(CatalogKind::Form, None);
        selector.load(&catalog, None, &mut draft).expect("loads");

        selector.select("form-12", &mut draft).expect("selects");
        assert_eq!(
            draft.selected_resource.as_ref().map(|r| r.name.as_str()),
            Some("Buyer Pre-Qualification")
        );

        assert_eq!(
            selector.select("cal-21", &mut draft),
            Err(SelectionError::UnknownEntry {
                kind: CatalogKind::Form,
                id: "cal-21".to_string(),
            })
        );

        selector.clear(&mut draft);
        assert!(draft.selected_resource.is_none());
    }

    #[test]
    fn filtered_narrows_loaded_candidates() {
        let catalog = InMemoryCatalog::demo();
        let mut draft = WizardDraft::new(PageType::OpenHouse);
        let mut selector = CatalogSelector::new(CatalogKind::LoanOfficer, None);
        selector.load(&catalog, None, &mut draft).expect("loads");

        let names: Vec<&str> = selector
            .filtered(Some("priya"))
            .map(|entry| entry.profile.name.as_str())
            .collect();
        assert_eq!(names, vec!["Priya Natarajan"]);
    }
}
