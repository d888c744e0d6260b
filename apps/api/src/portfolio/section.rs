//! Portfolio section types — the tagged variants that make up a document.
//!
//! Wire shape matches the stored JSON: `{"section": "<kind>", "data": ...}`.

use serde::{Deserialize, Serialize};

/// The closed set of section kinds. A kind acts as the unique key for a
/// section within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    About,
    Experience,
    Education,
    Skills,
    Socials,
    Footer,
}

impl SectionKind {
    /// All kinds in canonical display order.
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Header,
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Socials,
        SectionKind::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::About => "about",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Socials => "socials",
            SectionKind::Footer => "footer",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutData {
    pub markdown: String,
}

/// One position. `end` absent means "present".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub company: String,
    pub role: String,
    /// yyyy or yyyy-MM
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    /// e.g. "github", "linkedin", "email", "website" — free-form
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterData {
    pub text: String,
}

/// A single portfolio section, keyed by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "lowercase")]
pub enum Section {
    Header(HeaderData),
    About(AboutData),
    Experience(Vec<ExperienceItem>),
    Education(Vec<EducationItem>),
    Skills(Vec<String>),
    Socials(Vec<SocialLink>),
    Footer(FooterData),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Header(_) => SectionKind::Header,
            Section::About(_) => SectionKind::About,
            Section::Experience(_) => SectionKind::Experience,
            Section::Education(_) => SectionKind::Education,
            Section::Skills(_) => SectionKind::Skills,
            Section::Socials(_) => SectionKind::Socials,
            Section::Footer(_) => SectionKind::Footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_wire_shape_roundtrip() {
        let section = Section::Header(HeaderData {
            name: "Jane".to_string(),
            tagline: Some("Engineer".to_string()),
            display_picture: None,
        });

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["section"], "header");
        assert_eq!(json["data"]["name"], "Jane");
        assert_eq!(json["data"]["tagline"], "Engineer");
        // absent optionals are omitted, not null
        assert!(json["data"].get("displayPicture").is_none());

        let back: Section = serde_json::from_value(json).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_experience_section_deserializes_from_stored_json() {
        let json = serde_json::json!({
            "section": "experience",
            "data": [
                {"company": "Acme", "role": "Engineer", "start": "2020-01", "highlights": ["Shipped v1"]},
                {"company": "Globex", "role": "Lead", "start": "2022", "end": "2024", "location": "Remote"}
            ]
        });

        let section: Section = serde_json::from_value(json).unwrap();
        let Section::Experience(items) = &section else {
            panic!("expected experience section");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].highlights.as_deref(), Some(&["Shipped v1".to_string()][..]));
        assert!(items[0].end.is_none());
        assert_eq!(items[1].end.as_deref(), Some("2024"));
    }

    #[test]
    fn test_section_kind_accessor_matches_tag() {
        let skills = Section::Skills(vec!["Rust".to_string()]);
        assert_eq!(skills.kind(), SectionKind::Skills);
        assert_eq!(skills.kind().as_str(), "skills");
    }

    #[test]
    fn test_unknown_section_tag_is_rejected() {
        let json = serde_json::json!({"section": "projects", "data": []});
        assert!(serde_json::from_value::<Section>(json).is_err());
    }
}
