use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    #[default]
    Firm,
    IndividualProfessional,
    Ngo,
}

impl RecordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordType::Firm => "firm",
            RecordType::IndividualProfessional => "individual_professional",
            RecordType::Ngo => "ngo",
        }
    }

    /// Accepts the canonical labels and the legacy ones found in older stores.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "firm" | "despacho" => Some(RecordType::Firm),
            "individual_professional" | "abogado" => Some(RecordType::IndividualProfessional),
            "ngo" | "ong" => Some(RecordType::Ngo),
            _ => None,
        }
    }

    pub const fn all() -> &'static [RecordType] {
        &[
            RecordType::Firm,
            RecordType::IndividualProfessional,
            RecordType::Ngo,
        ]
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    // Unknown labels fall back to the default rather than failing the whole store.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .and_then(RecordType::parse)
            .unwrap_or_default())
    }
}

/// One observed or consolidated entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "nombre", default)]
    pub name: String,
    #[serde(rename = "type", alias = "tipo", default)]
    pub kind: RecordType,
    #[serde(
        alias = "phone",
        alias = "telefono",
        default,
        deserialize_with = "one_or_many"
    )]
    pub phones: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "web", default)]
    pub website: Option<String>,
    #[serde(alias = "direccion", default)]
    pub address: Option<String>,
    #[serde(alias = "ciudad", default)]
    pub city: Option<String>,
    #[serde(alias = "distrito", default)]
    pub district: Option<String>,
    #[serde(alias = "codigo_postal", default)]
    pub postal_code: Option<String>,
    #[serde(alias = "especialidades", default, deserialize_with = "nullable")]
    pub specialties: BTreeSet<String>,
    #[serde(alias = "idiomas", default, deserialize_with = "nullable")]
    pub languages: BTreeSet<String>,
    #[serde(alias = "horario", default)]
    pub opening_hours: Option<String>,
    #[serde(alias = "valoracion", default)]
    pub rating: Option<f64>,
    #[serde(alias = "fuente", default)]
    pub source: Option<String>,
    #[serde(alias = "url_origen", default)]
    pub source_url: Option<String>,
    #[serde(alias = "fecha_actualizacion", default)]
    pub last_updated: Option<String>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        if !self.has_phone() && self.email().is_none() && self.website().is_none() {
            return Err(CoreError::NoContactChannel);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn has_phone(&self) -> bool {
        self.phones.iter().any(|phone| !phone.trim().is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn website(&self) -> Option<&str> {
        present(&self.website)
    }

    pub fn address(&self) -> Option<&str> {
        present(&self.address)
    }

    pub fn city(&self) -> Option<&str> {
        present(&self.city)
    }

    /// Field-wise equality that ignores `last_updated`.
    pub fn same_content(&self, other: &Record) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.phones == other.phones
            && self.email == other.email
            && self.website == other.website
            && self.address == other.address
            && self.city == other.city
            && self.district == other.district
            && self.postal_code == other.postal_code
            && self.specialties == other.specialties
            && self.languages == other.languages
            && self.opening_hours == other.opening_hours
            && self.rating == other.rating
            && self.source == other.source
            && self.source_url == other.source_url
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<Option<String>>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) if value.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values
            .into_iter()
            .flatten()
            .filter(|value| !value.trim().is_empty())
            .collect(),
    })
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
