use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The landing page families a creator can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    OpenHouse,
    CustomerSpotlight,
    SpecialEvent,
    MortgageCalculator,
    ApplyNow,
    RateQuote,
}

impl PageType {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::OpenHouse,
            Self::CustomerSpotlight,
            Self::SpecialEvent,
            Self::MortgageCalculator,
            Self::ApplyNow,
            Self::RateQuote,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenHouse => "Open House",
            Self::CustomerSpotlight => "Customer Spotlight",
            Self::SpecialEvent => "Special Event",
            Self::MortgageCalculator => "Mortgage Calculator",
            Self::ApplyNow => "Apply Now",
            Self::RateQuote => "Rate Quote",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::OpenHouse => "open_house",
            Self::CustomerSpotlight => "customer_spotlight",
            Self::SpecialEvent => "special_event",
            Self::MortgageCalculator => "mortgage_calculator",
            Self::ApplyNow => "apply_now",
            Self::RateQuote => "rate_quote",
        }
    }

    /// Pages that describe a scheduled gathering and can be exported as ICS.
    pub const fn has_schedule(self) -> bool {
        matches!(self, Self::OpenHouse | Self::SpecialEvent)
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|page_type| page_type.slug() == normalized)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Which side of the partnership is building the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorRole {
    LoanOfficer,
    Realtor,
}

impl CreatorRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoanOfficer => "Loan Officer",
            Self::Realtor => "Realtor",
        }
    }

    /// The catalog a creator picks co-branding partners from.
    pub const fn partner_kind(self) -> CatalogKind {
        match self {
            Self::LoanOfficer => CatalogKind::Realtor,
            Self::Realtor => CatalogKind::LoanOfficer,
        }
    }

    /// Credential label printed next to the party's license number.
    pub const fn license_label(self) -> &'static str {
        match self {
            Self::LoanOfficer => "NMLS",
            Self::Realtor => "License",
        }
    }

    pub const fn role_key(self) -> &'static str {
        match self {
            Self::LoanOfficer => "loan_officer",
            Self::Realtor => "realtor",
        }
    }

    /// Maps a host role name onto a creator role. Administrators create pages as loan officers.
    pub fn from_role_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "loan_officer" | "loan-officer" | "administrator" | "admin" => Some(Self::LoanOfficer),
            "realtor" | "realtor_partner" | "agent" => Some(Self::Realtor),
            _ => None,
        }
    }
}

/// Caller identity supplied by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreatorIdentity {
    pub user_id: String,
    pub roles: BTreeSet<String>,
}

impl CreatorIdentity {
    pub fn new<I, S>(user_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn can_act_as(&self, role: CreatorRole) -> bool {
        self.roles
            .iter()
            .filter_map(|name| CreatorRole::from_role_name(name))
            .any(|granted| granted == role)
    }
}

/// Kinds of records the selector can load from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    LoanOfficer,
    Realtor,
    Form,
    Calendar,
}

impl CatalogKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::LoanOfficer, Self::Realtor, Self::Form, Self::Calendar]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::LoanOfficer => "loan_officer",
            Self::Realtor => "realtor",
            Self::Form => "form",
            Self::Calendar => "calendar",
        }
    }

    pub const fn is_partner(self) -> bool {
        matches!(self, Self::LoanOfficer | Self::Realtor)
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == normalized)
    }
}

/// A single value captured by the field collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whitespace-only text is treated as missing; flags always count as answered.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Flag(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            Self::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" | "" => Some(false),
                _ => None,
            },
        }
    }

    /// Flat string form stored in page metadata.
    pub fn to_meta(&self) -> String {
        match self {
            Self::Text(value) => value.trim().to_string(),
            Self::Flag(true) => "1".to_string(),
            Self::Flag(false) => "0".to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Contact and branding details for one party shown on a page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartyProfile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Co-branding partner copied into the draft from a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRef {
    pub id: String,
    pub kind: CatalogKind,
    pub profile: PartyProfile,
}

/// Lead intake mechanism (form or booking calendar) attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    pub kind: CatalogKind,
    pub name: String,
}
