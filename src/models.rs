use serde::Deserialize;

pub use crate::entities::movie::Model as Movie;

// Column widths of the `movies` table.
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const REVIEW_MAX_LEN: usize = 500;
pub const POSTER_URL_MAX_LEN: usize = 300;

/// A catalog entry resolved into the shape stored in the list. Rating, review and
/// ranking stay unset until the user edits the new entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub poster_url: String,
}

/// One raw match from a catalog title search.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchCandidate {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SearchCandidate {
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.split('-').next()).filter(|y| !y.is_empty())
    }
}
