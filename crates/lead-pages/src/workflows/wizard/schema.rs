use serde::Serialize;

use super::domain::{CatalogKind, PageType};

/// Field names shared across wizards and page metadata.
pub mod fields {
    pub const PAGE_MODE: &str = "page_mode";
    pub const HEADLINE: &str = "headline";
    pub const SUBHEADLINE: &str = "subheadline";
    pub const HERO_IMAGE_URL: &str = "hero_image_url";
    pub const DESCRIPTION: &str = "description";
    pub const PROPERTY_ADDRESS: &str = "property_address";
    pub const PROPERTY_PRICE: &str = "property_price";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const EVENT_TITLE: &str = "event_title";
    pub const EVENT_DATE: &str = "event_date";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const VENUE_NAME: &str = "venue_name";
    pub const VENUE_ADDRESS: &str = "venue_address";
    pub const RSVP_LIMIT: &str = "rsvp_limit";
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const CUSTOMER_STORY: &str = "customer_story";
    pub const CUSTOMER_PHOTO_URL: &str = "customer_photo_url";
    pub const CTA_TEXT: &str = "cta_text";
    pub const BRAND_COLOR: &str = "brand_color";
    pub const DEFAULT_HOME_PRICE: &str = "default_home_price";
    pub const DEFAULT_DOWN_PAYMENT: &str = "default_down_payment";
    pub const DEFAULT_RATE: &str = "default_rate";
    pub const OUTPUT_TYPE: &str = "output_type";
    pub const ASK_EMPLOYMENT: &str = "ask_employment";
    pub const ASK_CREDIT_RANGE: &str = "ask_credit_range";
    pub const ASK_DOWN_PAYMENT: &str = "ask_down_payment";
    pub const ASK_TIMELINE: &str = "ask_timeline";
    pub const ASK_PROPERTY_TYPE: &str = "ask_property_type";
    pub const LOAN_PURPOSE: &str = "loan_purpose";
    pub const SHOW_RATE_DISCLAIMER: &str = "show_rate_disclaimer";

    pub const MODE_SOLO: &str = "solo";
    pub const MODE_CO_BRANDED: &str = "co_branded";
    pub const OUTPUT_LANDING_PAGE: &str = "landing_page";
    pub const OUTPUT_EMBED_CODE: &str = "embed_code";
}

const PAGE_MODES: &[&str] = &[fields::MODE_SOLO, fields::MODE_CO_BRANDED];
const OUTPUT_TYPES: &[&str] = &[fields::OUTPUT_LANDING_PAGE, fields::OUTPUT_EMBED_CODE];
const LOAN_PURPOSES: &[&str] = &["purchase", "refinance", "cash_out"];

/// View hint describing how a field is rendered and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Url,
    Date,
    Time,
    Color,
    Number,
    Flag,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }
}

/// One wizard step: which fields it collects and what must be present to leave it.
#[derive(Debug, Clone, Serialize)]
pub struct StepTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
    /// The partner picker lives on this step and is mandatory for co-branded pages.
    pub partner_step: bool,
    /// Intake resource that must be attached before leaving this step.
    pub resource: Option<CatalogKind>,
}

impl StepTemplate {
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }
}

/// Declarative description of one wizard, consumed by the generic session engine.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSchema {
    pub page_type: PageType,
    pub title: &'static str,
    pub accent_color: &'static str,
    pub steps: Vec<StepTemplate>,
}

impl WizardSchema {
    pub fn for_page(page_type: PageType) -> Self {
        match page_type {
            PageType::OpenHouse => open_house(),
            PageType::CustomerSpotlight => customer_spotlight(),
            PageType::SpecialEvent => special_event(),
            PageType::MortgageCalculator => mortgage_calculator(),
            PageType::ApplyNow => apply_now(),
            PageType::RateQuote => rate_quote(),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepTemplate> {
        self.steps.get(index)
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.key == key)
    }

    pub fn resource_kind(&self) -> Option<CatalogKind> {
        self.steps.iter().find_map(|step| step.resource)
    }
}

fn partnership_step() -> StepTemplate {
    StepTemplate {
        key: "partnership",
        title: "Page Type",
        fields: vec![FieldSpec::required(
            fields::PAGE_MODE,
            "Solo or co-branded",
            FieldKind::Choice(PAGE_MODES),
        )],
        partner_step: true,
        resource: None,
    }
}

fn open_house() -> WizardSchema {
    WizardSchema {
        page_type: PageType::OpenHouse,
        title: "Open House Page",
        accent_color: "#1f7a8c",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "property",
                title: "Property",
                fields: vec![
                    FieldSpec::required(
                        fields::PROPERTY_ADDRESS,
                        "Property address",
                        FieldKind::Text,
                    ),
                    FieldSpec::optional(fields::PROPERTY_PRICE, "List price", FieldKind::Number),
                    FieldSpec::optional(fields::BEDROOMS, "Bedrooms", FieldKind::Number),
                    FieldSpec::optional(fields::BATHROOMS, "Bathrooms", FieldKind::Number),
                    FieldSpec::optional(fields::HERO_IMAGE_URL, "Hero image", FieldKind::Url),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "schedule",
                title: "Schedule",
                fields: vec![
                    FieldSpec::required(fields::EVENT_DATE, "Open house date", FieldKind::Date),
                    FieldSpec::required(fields::START_TIME, "Start time", FieldKind::Time),
                    FieldSpec::required(fields::END_TIME, "End time", FieldKind::Time),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "content",
                title: "Content & Sign-In Form",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::optional(fields::SUBHEADLINE, "Subheadline", FieldKind::Text),
                    FieldSpec::optional(fields::DESCRIPTION, "Description", FieldKind::LongText),
                ],
                partner_step: false,
                resource: Some(CatalogKind::Form),
            },
        ],
    }
}

fn customer_spotlight() -> WizardSchema {
    WizardSchema {
        page_type: PageType::CustomerSpotlight,
        title: "Customer Spotlight Page",
        accent_color: "#7b2cbf",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "customer",
                title: "Customer",
                fields: vec![
                    FieldSpec::required(fields::CUSTOMER_NAME, "Customer name", FieldKind::Text),
                    FieldSpec::required(
                        fields::CUSTOMER_STORY,
                        "Customer story",
                        FieldKind::LongText,
                    ),
                    FieldSpec::optional(
                        fields::CUSTOMER_PHOTO_URL,
                        "Customer photo",
                        FieldKind::Url,
                    ),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "content",
                title: "Page Content",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::optional(fields::SUBHEADLINE, "Subheadline", FieldKind::Text),
                    FieldSpec::optional(fields::HERO_IMAGE_URL, "Hero image", FieldKind::Url),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "publish",
                title: "Publish",
                fields: vec![FieldSpec::optional(
                    fields::CTA_TEXT,
                    "Call to action",
                    FieldKind::Text,
                )],
                partner_step: false,
                resource: None,
            },
        ],
    }
}

fn special_event() -> WizardSchema {
    WizardSchema {
        page_type: PageType::SpecialEvent,
        title: "Special Event Page",
        accent_color: "#e76f51",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "event",
                title: "Event Details",
                fields: vec![
                    FieldSpec::required(fields::EVENT_TITLE, "Event title", FieldKind::Text),
                    FieldSpec::required(fields::EVENT_DATE, "Event date", FieldKind::Date),
                    FieldSpec::required(fields::START_TIME, "Start time", FieldKind::Time),
                    FieldSpec::optional(fields::END_TIME, "End time", FieldKind::Time),
                    FieldSpec::optional(fields::VENUE_NAME, "Venue name", FieldKind::Text),
                    FieldSpec::required(fields::VENUE_ADDRESS, "Venue address", FieldKind::Text),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "content",
                title: "Page Content",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::optional(fields::SUBHEADLINE, "Subheadline", FieldKind::Text),
                    FieldSpec::optional(fields::HERO_IMAGE_URL, "Hero image", FieldKind::Url),
                    FieldSpec::optional(fields::DESCRIPTION, "Description", FieldKind::LongText),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "registration",
                title: "Registration",
                fields: vec![FieldSpec::optional(
                    fields::RSVP_LIMIT,
                    "RSVP limit",
                    FieldKind::Number,
                )],
                partner_step: false,
                resource: Some(CatalogKind::Form),
            },
            StepTemplate {
                key: "publish",
                title: "Review & Publish",
                fields: Vec::new(),
                partner_step: false,
                resource: None,
            },
        ],
    }
}

fn mortgage_calculator() -> WizardSchema {
    WizardSchema {
        page_type: PageType::MortgageCalculator,
        title: "Mortgage Calculator",
        accent_color: "#2a9d8f",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "branding",
                title: "Branding",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::required(fields::BRAND_COLOR, "Brand color", FieldKind::Color),
                    FieldSpec::optional(
                        fields::DEFAULT_HOME_PRICE,
                        "Default home price",
                        FieldKind::Number,
                    ),
                    FieldSpec::optional(
                        fields::DEFAULT_DOWN_PAYMENT,
                        "Default down payment %",
                        FieldKind::Number,
                    ),
                    FieldSpec::optional(fields::DEFAULT_RATE, "Default rate %", FieldKind::Number),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "output",
                title: "Output",
                fields: vec![FieldSpec::required(
                    fields::OUTPUT_TYPE,
                    "Output type",
                    FieldKind::Choice(OUTPUT_TYPES),
                )],
                partner_step: false,
                resource: None,
            },
        ],
    }
}

fn apply_now() -> WizardSchema {
    WizardSchema {
        page_type: PageType::ApplyNow,
        title: "Apply Now Page",
        accent_color: "#264653",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "content",
                title: "Page Content",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::optional(fields::SUBHEADLINE, "Subheadline", FieldKind::Text),
                    FieldSpec::optional(fields::HERO_IMAGE_URL, "Hero image", FieldKind::Url),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "questions",
                title: "Questions",
                fields: vec![
                    FieldSpec::optional(
                        fields::ASK_EMPLOYMENT,
                        "Ask about employment",
                        FieldKind::Flag,
                    ),
                    FieldSpec::optional(
                        fields::ASK_CREDIT_RANGE,
                        "Ask for credit range",
                        FieldKind::Flag,
                    ),
                    FieldSpec::optional(
                        fields::ASK_DOWN_PAYMENT,
                        "Ask about down payment",
                        FieldKind::Flag,
                    ),
                    FieldSpec::optional(fields::ASK_TIMELINE, "Ask for timeline", FieldKind::Flag),
                    FieldSpec::optional(
                        fields::ASK_PROPERTY_TYPE,
                        "Ask for property type",
                        FieldKind::Flag,
                    ),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "intake",
                title: "Application Form",
                fields: Vec::new(),
                partner_step: false,
                resource: Some(CatalogKind::Form),
            },
        ],
    }
}

fn rate_quote() -> WizardSchema {
    WizardSchema {
        page_type: PageType::RateQuote,
        title: "Rate Quote Page",
        accent_color: "#f4a261",
        steps: vec![
            partnership_step(),
            StepTemplate {
                key: "content",
                title: "Page Content",
                fields: vec![
                    FieldSpec::required(fields::HEADLINE, "Headline", FieldKind::Text),
                    FieldSpec::optional(fields::SUBHEADLINE, "Subheadline", FieldKind::Text),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "quote",
                title: "Quote Options",
                fields: vec![
                    FieldSpec::required(
                        fields::LOAN_PURPOSE,
                        "Loan purpose",
                        FieldKind::Choice(LOAN_PURPOSES),
                    ),
                    FieldSpec::optional(
                        fields::SHOW_RATE_DISCLAIMER,
                        "Show rate disclaimer",
                        FieldKind::Flag,
                    ),
                ],
                partner_step: false,
                resource: None,
            },
            StepTemplate {
                key: "booking",
                title: "Booking Calendar",
                fields: Vec::new(),
                partner_step: false,
                resource: Some(CatalogKind::Calendar),
            },
        ],
    }
}
