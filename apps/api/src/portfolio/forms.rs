//! Per-section save payloads.
//!
//! Each authenticated save submits one section's worth of fields. Repeated-item
//! sections are capped at the fixed form size (3 experience, 3 education,
//! 5 socials). The validation policy is drop-the-invalid-item, keep-the-rest:
//! a half-filled slot never discards the slots that were filled correctly.
//! The one hard failure is a header with an empty name.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::portfolio::section::{
    AboutData, EducationItem, ExperienceItem, FooterData, HeaderData, Section, SectionKind,
    SocialLink,
};

pub const MAX_EXPERIENCE_ITEMS: usize = 3;
pub const MAX_EDUCATION_ITEMS: usize = 3;
pub const MAX_SOCIAL_LINKS: usize = 5;

/// Trims a field; empty-after-trim collapses to `None`.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn opt_non_empty(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderForm {
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub display_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AboutForm {
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceItemForm {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceForm {
    pub items: Vec<ExperienceItemForm>,
}

#[derive(Debug, Deserialize)]
pub struct EducationItemForm {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EducationForm {
    pub items: Vec<EducationItemForm>,
}

/// Skills arrive as one comma-separated input, matching the dashboard form.
#[derive(Debug, Deserialize)]
pub struct SkillsForm {
    pub skills: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialLinkForm {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialsForm {
    pub links: Vec<SocialLinkForm>,
}

#[derive(Debug, Deserialize)]
pub struct FooterForm {
    #[serde(default)]
    pub text: String,
}

/// Parses the JSON body of a section save into a validated `Section`.
pub fn section_from_form(kind: SectionKind, body: Value) -> Result<Section, AppError> {
    let section = match kind {
        SectionKind::Header => build_header(parse_form(body)?)?,
        SectionKind::About => build_about(parse_form(body)?),
        SectionKind::Experience => build_experience(parse_form(body)?),
        SectionKind::Education => build_education(parse_form(body)?),
        SectionKind::Skills => build_skills(parse_form(body)?),
        SectionKind::Socials => build_socials(parse_form(body)?),
        SectionKind::Footer => build_footer(parse_form(body)?),
    };
    Ok(section)
}

fn parse_form<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(format!("Invalid payload: {e}")))
}

pub fn build_header(form: HeaderForm) -> Result<Section, AppError> {
    let name =
        non_empty(&form.name).ok_or_else(|| AppError::Validation("Name is required".to_string()))?;

    Ok(Section::Header(HeaderData {
        name,
        tagline: opt_non_empty(form.tagline),
        display_picture: opt_non_empty(form.display_picture),
    }))
}

pub fn build_about(form: AboutForm) -> Section {
    Section::About(AboutData {
        markdown: form.markdown.trim().to_string(),
    })
}

pub fn build_experience(form: ExperienceForm) -> Section {
    let capped = form.items.into_iter().take(MAX_EXPERIENCE_ITEMS).collect();
    Section::Experience(clean_experience_items(capped))
}

/// Validates repeated experience items: required fields must be non-empty
/// after trimming, invalid items are dropped, the rest survive.
pub fn clean_experience_items(items: Vec<ExperienceItemForm>) -> Vec<ExperienceItem> {
    items
        .into_iter()
        .filter_map(|item| {
            Some(ExperienceItem {
                company: non_empty(&item.company)?,
                role: non_empty(&item.role)?,
                start: non_empty(&item.start)?,
                end: opt_non_empty(item.end),
                location: opt_non_empty(item.location),
                highlights: clean_highlights(item.highlights),
            })
        })
        .collect()
}

fn clean_highlights(highlights: Option<Vec<String>>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = highlights?
        .iter()
        .filter_map(|h| non_empty(h))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn build_education(form: EducationForm) -> Section {
    let capped = form.items.into_iter().take(MAX_EDUCATION_ITEMS).collect();
    Section::Education(clean_education_items(capped))
}

pub fn clean_education_items(items: Vec<EducationItemForm>) -> Vec<EducationItem> {
    items
        .into_iter()
        .filter_map(|item| {
            Some(EducationItem {
                institution: non_empty(&item.institution)?,
                degree: opt_non_empty(item.degree),
                start: non_empty(&item.start)?,
                end: opt_non_empty(item.end),
            })
        })
        .collect()
}

pub fn build_skills(form: SkillsForm) -> Section {
    let skills = form.skills.split(',').filter_map(non_empty).collect();
    Section::Skills(skills)
}

/// Trims skill entries and drops blanks.
pub fn clean_skill_list(skills: Vec<String>) -> Vec<String> {
    skills.iter().filter_map(|s| non_empty(s)).collect()
}

pub fn build_socials(form: SocialsForm) -> Section {
    let capped = form.links.into_iter().take(MAX_SOCIAL_LINKS).collect();
    Section::Socials(clean_social_links(capped))
}

/// Drops links missing either platform or url.
pub fn clean_social_links(links: Vec<SocialLinkForm>) -> Vec<SocialLink> {
    links
        .into_iter()
        .filter_map(|link| {
            Some(SocialLink {
                platform: non_empty(&link.platform)?,
                url: non_empty(&link.url)?,
            })
        })
        .collect()
}

pub fn build_footer(form: FooterForm) -> Section {
    Section::Footer(FooterData {
        text: form.text.trim().to_string(),
    })
}
