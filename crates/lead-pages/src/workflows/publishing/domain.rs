use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::wizard::{CatalogKind, CreatorRole, PageType, PartyProfile};

/// Identifier wrapper for published pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which branded party a download is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Primary,
    Partner,
}

impl Party {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Partner => "partner",
        }
    }

    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("primary") | Some("creator") => Some(Self::Primary),
            Some("partner") => Some(Self::Partner),
            _ => None,
        }
    }
}

/// Metadata keys written next to the wizard's own fields.
pub mod meta_keys {
    pub const PAGE_TYPE: &str = "page_type";
    pub const CREATOR_ROLE: &str = "creator_role";
    pub const PARTNER_ID: &str = "partner_id";
    pub const PARTNER_ROLE: &str = "partner_role";
    pub const RESOURCE_KIND: &str = "resource_kind";
    pub const RESOURCE_ID: &str = "resource_id";
    pub const RESOURCE_NAME: &str = "resource_name";
}

/// Stored landing page: identity plus one flat string map of metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPage {
    pub id: PageId,
    pub title: String,
    pub page_type: PageType,
    pub creator_role: CreatorRole,
    pub author_id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub meta: BTreeMap<String, String>,
}

impl PublishedPage {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_co_branded(&self) -> bool {
        self.meta(meta_keys::PARTNER_ID).is_some()
    }

    /// Role of the given party: the creator's role or the partner's.
    pub fn party_role(&self, party: Party) -> CreatorRole {
        match party {
            Party::Primary => self.creator_role,
            Party::Partner => match self.meta(meta_keys::PARTNER_ROLE) {
                Some("loan_officer") => CreatorRole::LoanOfficer,
                Some("realtor") => CreatorRole::Realtor,
                _ => match self.creator_role.partner_kind() {
                    CatalogKind::LoanOfficer => CreatorRole::LoanOfficer,
                    _ => CreatorRole::Realtor,
                },
            },
        }
    }

    /// Branding for one party, read back out of the flat metadata.
    pub fn party_profile(&self, party: Party) -> Option<PartyProfile> {
        let prefix = party.prefix();
        let read = |suffix: &str| self.meta(&format!("{prefix}_{suffix}")).map(str::to_string);
        let name = read("name")?;
        Some(PartyProfile {
            name,
            email: read("email"),
            phone: read("phone"),
            license: read("license"),
            photo_url: read("photo_url"),
            company: read("company"),
        })
    }
}

/// Writes a party's branding under `{prefix}_{field}` keys.
pub(crate) fn flatten_party(
    meta: &mut BTreeMap<String, String>,
    party: Party,
    profile: &PartyProfile,
) {
    let prefix = party.prefix();
    let entries = [
        ("name", Some(&profile.name)),
        ("email", profile.email.as_ref()),
        ("phone", profile.phone.as_ref()),
        ("license", profile.license.as_ref()),
        ("photo_url", profile.photo_url.as_ref()),
        ("company", profile.company.as_ref()),
    ];
    for (suffix, value) in entries {
        if let Some(value) = value.map(|value| value.trim()).filter(|value| !value.is_empty()) {
            meta.insert(format!("{prefix}_{suffix}"), value.to_string());
        }
    }
}

/// Sanitized page representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub id: PageId,
    pub title: String,
    pub page_type: PageType,
    pub page_type_label: &'static str,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub co_branded: bool,
    pub meta: BTreeMap<String, String>,
}

impl From<&PublishedPage> for PageView {
    fn from(page: &PublishedPage) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            page_type: page.page_type,
            page_type_label: page.page_type.label(),
            url: page.url.clone(),
            created_at: page.created_at,
            co_branded: page.is_co_branded(),
            meta: page.meta.clone(),
        }
    }
}
