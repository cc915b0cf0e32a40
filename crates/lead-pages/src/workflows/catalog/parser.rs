use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::CatalogEntry;
use crate::workflows::wizard::domain::{CatalogKind, PartyProfile};

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    UnknownKind { line: u64, kind: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        let line = entries.len() as u64 + 2;
        let kind = CatalogKind::from_slug(&row.kind).ok_or_else(|| RowError::UnknownKind {
            line,
            kind: row.kind.clone(),
        })?;
        entries.push(row.into_entry(kind));
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    kind: String,
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    license: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    photo_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
}

impl CatalogRow {
    fn into_entry(self, kind: CatalogKind) -> CatalogEntry {
        CatalogEntry {
            id: self.id,
            kind,
            profile: PartyProfile {
                name: self.name,
                email: self.email,
                phone: self.phone,
                license: self.license,
                photo_url: self.photo_url,
                company: self.company,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
