use super::{escape_text, push_line, strip_controls, FormatError};

pub const CONTENT_TYPE: &str = "text/vcard; charset=utf-8";

/// Contact details for one branded party on a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactCard {
    pub full_name: String,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub url: Option<String>,
    pub note: Option<String>,
}

impl ContactCard {
    /// File name offered with the download, e.g. `morgan-ellis.vcf`.
    pub fn file_name(&self) -> String {
        let slug: String = self
            .full_name
            .split(|ch: char| !ch.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        if slug.is_empty() {
            "contact.vcf".to_string()
        } else {
            format!("{slug}.vcf")
        }
    }
}

/// Renders a vCard 3.0 body.
pub fn render_card(card: &ContactCard) -> Result<String, FormatError> {
    let full_name = card.full_name.trim();
    if full_name.is_empty() {
        return Err(FormatError::MissingField("contact name"));
    }

    let (given, family) = split_name(full_name);
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCARD");
    push_line(&mut out, "VERSION:3.0");
    push_line(
        &mut out,
        &format!("N:{};{};;;", escape_text(family), escape_text(given)),
    );
    push_line(&mut out, &format!("FN:{}", escape_text(full_name)));

    if let Some(org) = non_empty(&card.organization) {
        push_line(&mut out, &format!("ORG:{}", escape_text(org)));
    }
    if let Some(title) = non_empty(&card.title) {
        push_line(&mut out, &format!("TITLE:{}", escape_text(title)));
    }
    if let Some(phone) = non_empty(&card.phone) {
        push_line(&mut out, &format!("TEL;TYPE=WORK,VOICE:{}", escape_text(phone)));
    }
    if let Some(email) = non_empty(&card.email) {
        push_line(&mut out, &format!("EMAIL;TYPE=INTERNET:{}", escape_text(email)));
    }
    if let Some(photo) = non_empty(&card.photo_url) {
        let photo = strip_controls(photo);
        let line = match photo_type(&photo) {
            Some(kind) => format!("PHOTO;VALUE=URI;TYPE={kind}:{photo}"),
            None => format!("PHOTO;VALUE=URI:{photo}"),
        };
        push_line(&mut out, &line);
    }
    if let Some(url) = non_empty(&card.url) {
        push_line(&mut out, &format!("URL:{}", strip_controls(url)));
    }
    if let Some(note) = non_empty(&card.note) {
        push_line(&mut out, &format!("NOTE:{}", escape_text(note)));
    }
    push_line(&mut out, "END:VCARD");
    Ok(out)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// "Mary Ann Smith" becomes ("Mary Ann", "Smith"); single names have no family part.
fn split_name(full_name: &str) -> (&str, &str) {
    match full_name.rsplit_once(char::is_whitespace) {
        Some((given, family)) => (given.trim(), family.trim()),
        None => (full_name, ""),
    }
}

/// Image subtype guessed from the URL path, e.g. `JPEG` or `PNG`.
fn photo_type(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let guess = mime_guess::from_path(path).first()?;
    if guess.type_() == mime::IMAGE {
        Some(guess.subtype().as_str().to_ascii_uppercase())
    } else {
        None
    }
}
