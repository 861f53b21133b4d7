//! Artist domain entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{FieldErrors, MSG_REQUIRED, NON_FIELD_ERRORS};

pub const NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtistId(pub i64);

impl From<i64> for ArtistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub agency: String,
    pub debut_date: NaiveDate,
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
    pub name: String,
    pub agency: String,
    pub debut_date: NaiveDate,
    pub is_group: bool,
}

impl NewArtist {
    /// Validate raw input; `debut_date` must be `YYYY-MM-DD`
    pub fn parse(
        name: Option<&str>,
        agency: Option<&str>,
        debut_date: Option<&str>,
        is_group: Option<bool>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", name, Some(NAME_MAX_CHARS));
        let agency = errors.require_text("agency", agency, None);
        let debut_date = match debut_date {
            None => {
                errors.add("debut_date", MSG_REQUIRED);
                None
            }
            Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add(
                        "debut_date",
                        "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
                    );
                    None
                }
            },
        };
        if is_group.is_none() {
            errors.add("is_group", MSG_REQUIRED);
        }
        errors.into_result()?;

        match (name, agency, debut_date, is_group) {
            (Some(name), Some(agency), Some(debut_date), Some(is_group)) => Ok(Self {
                name: name.to_string(),
                agency: agency.to_string(),
                debut_date,
                is_group,
            }),
            // unreachable: each None above recorded an error
            _ => Err(FieldErrors::single(NON_FIELD_ERRORS, "Incomplete artist.")),
        }
    }
}

/// The editable subset of an artist
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistChanges {
    pub agency: String,
    pub is_group: bool,
}

impl ArtistChanges {
    pub fn parse(agency: Option<&str>, is_group: Option<bool>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let agency = errors.require_text("agency", agency, None);
        if is_group.is_none() {
            errors.add("is_group", MSG_REQUIRED);
        }
        errors.into_result()?;

        Ok(Self {
            agency: agency.unwrap_or_default().to_string(),
            is_group: is_group.unwrap_or_default(),
        })
    }
}
