//! Resume and bulk-JSON import.
//!
//! The resume pipeline runs strictly in sequence: validate the target
//! username, send the resume to a text-generation provider, extract and
//! normalize the JSON it returns, then persist. Nothing retries — every
//! failure is converted to a tagged outcome at the HTTP boundary and the
//! user decides whether to resubmit.
//!
//! Import is a full-document replace rather than a merge against prior
//! state: a resume import starts the portfolio over. Interactive section
//! saves are the merge path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::Principal;
use crate::llm_client::{LlmClient, LlmError};
use crate::portfolio::document::PortfolioDocument;
use crate::portfolio::forms::{
    clean_education_items, clean_experience_items, clean_skill_list, clean_social_links,
};
use crate::portfolio::prompts::{
    RESUME_PARSE_DOCUMENT_PROMPT, RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM,
};
use crate::portfolio::section::{AboutData, FooterData, HeaderData, Section, SectionKind};
use crate::portfolio::store::{PortfolioStore, UpsertPortfolio};
use crate::portfolio::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Text,
    Binary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub username: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume_base64: Option<String>,
    pub file_type: FileType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The import surface never throws across the HTTP boundary; every failure
/// becomes `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), ImportError>> for ImportOutcome {
    fn from(result: Result<(), ImportError>) -> Self {
        match result {
            Ok(()) => ImportOutcome {
                success: true,
                error: None,
            },
            Err(e) => ImportOutcome {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Username is required")]
    MissingUsername,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("A resume is required")]
    MissingResume,

    #[error("Resume parsing failed: {0}")]
    Upstream(String),

    #[error("No valid JSON found in response")]
    NoJsonFound,

    #[error("Invalid JSON in response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("No portfolio sections could be extracted")]
    EmptyResult,

    #[error("Failed to save portfolio: {0}")]
    Persistence(String),
}

/// Upstream resume-parsing collaborator. Text and binary payloads route to
/// different providers; both return raw response text with embedded JSON.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse_text(&self, resume_text: &str) -> Result<String, LlmError>;

    async fn parse_document(&self, base64_data: &str) -> Result<String, LlmError>;
}

pub struct LlmResumeParser {
    llm: LlmClient,
}

impl LlmResumeParser {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeParser for LlmResumeParser {
    async fn parse_text(&self, resume_text: &str) -> Result<String, LlmError> {
        let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text);
        self.llm.complete_text(RESUME_PARSE_SYSTEM, &prompt).await
    }

    async fn parse_document(&self, base64_data: &str) -> Result<String, LlmError> {
        self.llm
            .complete_document(
                RESUME_PARSE_SYSTEM,
                RESUME_PARSE_DOCUMENT_PROMPT,
                "application/pdf",
                base64_data,
            )
            .await
    }
}

/// Runs the import pipeline end to end. On success the new document is
/// persisted (published, with the requested theme) and the public cache is
/// invalidated by the store.
pub async fn run_import(
    store: &dyn PortfolioStore,
    parser: &dyn ResumeParser,
    principal: &Principal,
    request: &ImportRequest,
) -> Result<(), ImportError> {
    // Validating
    let requested = request.username.trim();
    if requested.is_empty() {
        return Err(ImportError::MissingUsername);
    }
    let existing = store
        .find_by_username(requested)
        .await
        .map_err(|e| ImportError::Persistence(e.to_string()))?;
    if let Some(row) = existing {
        if row.user_id != principal.user_id {
            return Err(ImportError::UsernameTaken);
        }
    }

    // An owner holds at most one row and the upsert conflicts on username,
    // so a prior row keeps its username regardless of what the import asks
    // for. Only a first import claims the requested one.
    let owned = store
        .find_by_owner(&principal.user_id)
        .await
        .map_err(|e| ImportError::Persistence(e.to_string()))?;
    let username = match &owned {
        Some(row) if row.username != requested => {
            warn!(
                requested,
                stored = %row.username,
                "import keeps the portfolio's existing username"
            );
            row.username.clone()
        }
        _ => requested.to_string(),
    };
    let username = username.as_str();

    // Parsing
    let response_text = match request.file_type {
        FileType::Text => {
            let text = request
                .resume_text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or(ImportError::MissingResume)?;
            parser.parse_text(text).await
        }
        FileType::Binary => {
            let data = request
                .resume_base64
                .as_deref()
                .filter(|d| !d.is_empty())
                .ok_or(ImportError::MissingResume)?;
            parser.parse_document(data).await
        }
    }
    .map_err(|e| ImportError::Upstream(e.to_string()))?;

    // Normalizing
    let json_text = extract_json_object(&response_text).ok_or(ImportError::NoJsonFound)?;
    let value: Value = serde_json::from_str(json_text).map_err(ImportError::InvalidJson)?;
    let extracted = document_from_json(&value)?;
    if !extracted.skipped_keys.is_empty() {
        warn!(
            username,
            skipped = ?extracted.skipped_keys,
            "resume import skipped malformed section keys"
        );
    }

    let name = request.name.as_deref().unwrap_or(&principal.display_name);
    let avatar = request.avatar.as_deref().or(principal.avatar.as_deref());
    let document = apply_identity_fallbacks(extracted.document, name, avatar);

    // Persisting (full-document replace)
    let theme = Theme::parse(request.theme.as_deref().unwrap_or_default());
    store
        .upsert(UpsertPortfolio {
            user_id: &principal.user_id,
            username,
            document: &document,
            published: true,
            theme,
        })
        .await
        .map_err(|e| ImportError::Persistence(e.to_string()))?;

    info!(
        username,
        sections = document.sections().len(),
        "resume import complete"
    );
    Ok(())
}

/// Extracts the first brace-balanced top-level JSON object substring,
/// tolerating surrounding prose and code-fence markers.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug)]
pub struct ExtractedDocument {
    pub document: PortfolioDocument,
    /// Recognized top-level keys whose value could not be mapped to a section.
    pub skipped_keys: Vec<String>,
}

/// Maps an arbitrary JSON object onto a typed document: each present
/// top-level section key becomes a section, absent keys are simply omitted,
/// malformed values are reported rather than silently coerced. Zero usable
/// sections is an error — an empty document must never be persisted.
pub fn document_from_json(value: &Value) -> Result<ExtractedDocument, ImportError> {
    let Some(object) = value.as_object() else {
        return Err(ImportError::EmptyResult);
    };

    let mut sections = Vec::new();
    let mut skipped_keys = Vec::new();

    for kind in SectionKind::ALL {
        let Some(raw) = object.get(kind.as_str()) else {
            continue;
        };
        match section_from_key(kind, raw) {
            Some(section) => sections.push(section),
            None => skipped_keys.push(kind.as_str().to_string()),
        }
    }

    if sections.is_empty() {
        return Err(ImportError::EmptyResult);
    }

    Ok(ExtractedDocument {
        document: PortfolioDocument::from_sections(sections),
        skipped_keys,
    })
}

fn section_from_key(kind: SectionKind, raw: &Value) -> Option<Section> {
    match kind {
        SectionKind::Header => {
            let data: HeaderData = serde_json::from_value(raw.clone()).ok()?;
            let name = data.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Section::Header(HeaderData { name, ..data }))
        }
        SectionKind::About => {
            // Providers sometimes return a bare string instead of {markdown}
            let markdown = match raw {
                Value::String(s) => s.trim().to_string(),
                _ => serde_json::from_value::<AboutData>(raw.clone())
                    .ok()?
                    .markdown
                    .trim()
                    .to_string(),
            };
            Some(Section::About(AboutData { markdown }))
        }
        SectionKind::Experience => {
            let items = clean_experience_items(serde_json::from_value(raw.clone()).ok()?);
            if items.is_empty() {
                return None;
            }
            Some(Section::Experience(items))
        }
        SectionKind::Education => {
            let items = clean_education_items(serde_json::from_value(raw.clone()).ok()?);
            if items.is_empty() {
                return None;
            }
            Some(Section::Education(items))
        }
        SectionKind::Skills => {
            let skills = clean_skill_list(serde_json::from_value(raw.clone()).ok()?);
            if skills.is_empty() {
                return None;
            }
            Some(Section::Skills(skills))
        }
        SectionKind::Socials => {
            let links = clean_social_links(serde_json::from_value(raw.clone()).ok()?);
            if links.is_empty() {
                return None;
            }
            Some(Section::Socials(links))
        }
        SectionKind::Footer => {
            let text = match raw {
                Value::String(s) => s.trim().to_string(),
                _ => serde_json::from_value::<FooterData>(raw.clone())
                    .ok()?
                    .text
                    .trim()
                    .to_string(),
            };
            Some(Section::Footer(FooterData { text }))
        }
    }
}

/// Fills identity gaps from the session: a missing header is synthesized
/// from the display name, a header without a picture gets the avatar.
fn apply_identity_fallbacks(
    document: PortfolioDocument,
    name: &str,
    avatar: Option<&str>,
) -> PortfolioDocument {
    if document.get(SectionKind::Header).is_none() {
        let name = name.trim();
        if name.is_empty() {
            return document;
        }
        let header = Section::Header(HeaderData {
            name: name.to_string(),
            tagline: None,
            display_picture: avatar.map(str::to_string),
        });
        return PortfolioDocument::from_sections(
            std::iter::once(header).chain(document),
        );
    }

    let sections = document.into_iter().map(|section| match section {
        Section::Header(mut data) => {
            if data.display_picture.is_none() {
                data.display_picture = avatar.map(str::to_string);
            }
            Section::Header(data)
        }
        other => other,
    });
    PortfolioDocument::from_sections(sections)
}
