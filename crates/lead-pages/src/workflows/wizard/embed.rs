use super::domain::PartyProfile;
use super::draft::WizardDraft;
use super::schema::fields;

const CALCULATOR_FIELDS: [(&str, &str); 5] = [
    ("data-headline", fields::HEADLINE),
    ("data-brand-color", fields::BRAND_COLOR),
    ("data-home-price", fields::DEFAULT_HOME_PRICE),
    ("data-down-payment", fields::DEFAULT_DOWN_PAYMENT),
    ("data-rate", fields::DEFAULT_RATE),
];

/// Static snippet that mounts the mortgage calculator on a third-party site.
///
/// Only branding collected in the draft is referenced; nothing is persisted.
pub fn render_calculator_embed(
    draft: &WizardDraft,
    creator: &PartyProfile,
    base_url: &str,
) -> String {
    let mut attributes = String::new();

    for (attribute, field) in CALCULATOR_FIELDS {
        if let Some(value) = draft.text(field) {
            push_attribute(&mut attributes, attribute, value);
        }
    }

    push_party(&mut attributes, "primary", creator);
    if draft.is_co_branded() {
        if let Some(partner) = &draft.selected_partner {
            push_party(&mut attributes, "partner", &partner.profile);
        }
    }

    let base = base_url.trim_end_matches('/');
    format!(
        "<div class=\"lead-pages-calculator\"{attributes}></div>\n<script src=\"{base}/embed/mortgage-calculator.js\" async></script>"
    )
}

fn push_party(attributes: &mut String, prefix: &str, profile: &PartyProfile) {
    push_attribute(attributes, &format!("data-{prefix}-name"), &profile.name);
    let optional = [
        ("license", &profile.license),
        ("email", &profile.email),
        ("phone", &profile.phone),
        ("photo", &profile.photo_url),
    ];
    for (suffix, value) in optional {
        if let Some(value) = value.as_deref() {
            push_attribute(attributes, &format!("data-{prefix}-{suffix}"), value);
        }
    }
}

fn push_attribute(attributes: &mut String, name: &str, value: &str) {
    attributes.push_str(&format!(
        " {name}=\"{}\"",
        escape_attribute(value.trim())
    ));
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::wizard::domain::PageType;

    #[test]
    fn embed_references_branding_fields() {
        let mut draft = WizardDraft::new(PageType::MortgageCalculator);
        draft.set(fields::PAGE_MODE, fields::MODE_SOLO);
        draft.set(fields::HEADLINE, "Run the numbers");
        draft.set(fields::BRAND_COLOR, "#2a9d8f");
        let creator = PartyProfile {
            name: "Morgan Ellis".to_string(),
            license: Some("1456789".to_string()),
            ..PartyProfile::default()
        };

        let snippet = render_calculator_embed(&draft, &creator, "https://pages.example.com/");
        assert!(snippet.contains("data-headline=\"Run the numbers\""));
        assert!(snippet.contains("data-brand-color=\"#2a9d8f\""));
        assert!(snippet.contains("data-primary-name=\"Morgan Ellis\""));
        assert!(snippet.contains("data-primary-license=\"1456789\""));
        assert!(!snippet.contains("data-partner-name"));
        assert!(snippet.contains("src=\"https://pages.example.com/embed/mortgage-calculator.js\""));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(
            escape_attribute("Tom & Jerry's \"best\" <rates>"),
            "Tom &amp; Jerry&#39;s &quot;best&quot; &lt;rates&gt;"
        );
    }
}
