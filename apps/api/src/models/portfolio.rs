use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::portfolio::document::PortfolioDocument;
use crate::portfolio::section::Section;
use crate::portfolio::theme::Theme;

/// One portfolio per owner, one per username. `content` is the JSON-encoded
/// section array; `published` gates public visibility.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub content: Value,
    pub published: bool,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PortfolioRow {
    /// Decodes the stored section array. Tolerant by element: a section that
    /// no longer deserializes (e.g. written by an older build) is skipped
    /// rather than poisoning the whole document.
    pub fn document(&self) -> PortfolioDocument {
        let elements: Vec<Value> = match &self.content {
            Value::Array(items) => items.clone(),
            _ => return PortfolioDocument::default(),
        };

        let sections = elements
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Section>(v).ok());
        PortfolioDocument::from_sections(sections)
    }

    /// Stored theme selector; unrecognized values fall back to the default.
    pub fn theme(&self) -> Theme {
        Theme::parse(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::section::SectionKind;
    use serde_json::json;

    fn row(content: Value, theme: &str) -> PortfolioRow {
        PortfolioRow {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            username: "jane".to_string(),
            content,
            published: true,
            theme: theme.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_document_skips_undecodable_sections() {
        let content = json!([
            {"section": "header", "data": {"name": "Jane"}},
            {"section": "projects", "data": []},
            {"section": "skills", "data": ["Rust"]}
        ]);
        let doc = row(content, "default").document();
        assert_eq!(doc.sections().len(), 2);
        assert!(doc.get(SectionKind::Header).is_some());
        assert!(doc.get(SectionKind::Skills).is_some());
    }

    #[test]
    fn test_document_of_non_array_content_is_empty() {
        assert!(row(json!({"broken": true}), "default")
            .document()
            .sections()
            .is_empty());
    }

    #[test]
    fn test_theme_fallback_on_unknown_value() {
        assert_eq!(row(json!([]), "sparkle").theme(), Theme::Default);
        assert_eq!(row(json!([]), "pink").theme(), Theme::Pink);
    }
}
