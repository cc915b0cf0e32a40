//! Partners, lead forms, and booking calendars a wizard can attach to a page.

mod parser;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::workflows::wizard::domain::{CatalogKind, PartyProfile};
use parser::RowError;

/// One selectable record. Forms and calendars only use `profile.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub kind: CatalogKind,
    #[serde(flatten)]
    pub profile: PartyProfile,
}

impl CatalogEntry {
    pub fn matches(&self, search: Option<&str>) -> bool {
        match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => self
                .profile
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown catalog kind '{kind}' on line {line}")]
    UnknownKind { line: u64, kind: String },
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<RowError> for CatalogError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::UnknownKind { line, kind } => Self::UnknownKind { line, kind },
        }
    }
}

/// External list of candidates, queried by kind with an optional name filter.
pub trait CatalogSource: Send + Sync {
    fn list(&self, kind: CatalogKind, search: Option<&str>)
        -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// Read-only catalog held in memory; order is insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    entries: Arc<[CatalogEntry]>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let entries = parser::parse_entries(reader)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample partners and intake resources used by the demo and by default in development.
    pub fn demo() -> Self {
        let person = |id: &str, kind, name: &str, email: &str, license: &str, company: &str| {
            CatalogEntry {
                id: id.to_string(),
                kind,
                profile: PartyProfile {
                    name: name.to_string(),
                    email: Some(email.to_string()),
                    phone: Some("(515) 555-0142".to_string()),
                    license: Some(license.to_string()),
                    photo_url: Some(format!("https://cdn.example.com/headshots/{id}.jpg")),
                    company: Some(company.to_string()),
                },
            }
        };
        let resource = |id: &str, kind, name: &str| CatalogEntry {
            id: id.to_string(),
            kind,
            profile: PartyProfile {
                name: name.to_string(),
                ..PartyProfile::default()
            },
        };

        Self::new(vec![
            person(
                "lo-101",
                CatalogKind::LoanOfficer,
                "Morgan Ellis",
                "morgan.ellis@example.com",
                "1456789",
                "Prairie Home Lending",
            ),
            person(
                "lo-102",
                CatalogKind::LoanOfficer,
                "Priya Natarajan",
                "priya.n@example.com",
                "2245871",
                "Prairie Home Lending",
            ),
            person(
                "re-201",
                CatalogKind::Realtor,
                "Dana Brooks",
                "dana@brooksrealty.example.com",
                "S61234000",
                "Brooks Realty Group",
            ),
            person(
                "re-202",
                CatalogKind::Realtor,
                "Luis Ortega",
                "luis@riverbend.example.com",
                "S58801000",
                "Riverbend Homes",
            ),
            resource("form-11", CatalogKind::Form, "Open House Sign-In"),
            resource("form-12", CatalogKind::Form, "Buyer Pre-Qualification"),
            resource("cal-21", CatalogKind::Calendar, "Rate Consultation (30 min)"),
        ])
    }
}

impl CatalogSource for InMemoryCatalog {
    fn list(
        &self,
        kind: CatalogKind,
        search: Option<&str>,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.kind == kind && entry.matches(search))
            .cloned()
            .collect())
    }
}
