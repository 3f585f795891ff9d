use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    /// The catalog calls these `tv`
    #[serde(alias = "tv")]
    Series,
}

/// A movie or series cached from the external catalog, shared by all users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Title {
    pub id: Uuid,
    /// Identifier in the external catalog
    pub external_id: i64,
    pub name: String,
    pub media_kind: MediaKind,
    pub poster_path: Option<String>,
    /// Mean rating of root reviews, one decimal place
    pub aggregate_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to reference a title for the first time
#[derive(Debug, Clone, PartialEq)]
pub struct NewTitle {
    pub external_id: i64,
    pub name: String,
    pub media_kind: MediaKind,
    pub poster_path: Option<String>,
}

impl Title {
    /// Builds a fresh title row from a first reference
    pub fn new(input: &NewTitle) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: input.external_id,
            name: input.name.clone(),
            media_kind: input.media_kind,
            poster_path: input.poster_path.clone(),
            aggregate_rating: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_title() {
        let title = Title::new(&NewTitle {
            external_id: 550,
            name: "Fight Club".to_string(),
            media_kind: MediaKind::Movie,
            poster_path: Some("/poster.jpg".to_string()),
        });
        assert_eq!(title.external_id, 550);
        assert_eq!(title.name, "Fight Club");
        assert_eq!(title.aggregate_rating, None);
    }

    #[test]
    fn test_media_kind_accepts_tv_alias() {
        let kind: MediaKind = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(kind, MediaKind::Series);

        let kind: MediaKind = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(kind, MediaKind::Series);

        assert_eq!(serde_json::to_string(&MediaKind::Series).unwrap(), "\"series\"");
    }
}
