use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::Principal;
use crate::errors::AppError;
use crate::models::portfolio::PortfolioRow;
use crate::portfolio::document::PortfolioDocument;
use crate::portfolio::forms::section_from_form;
use crate::portfolio::import::{document_from_json, run_import, ImportOutcome, ImportRequest};
use crate::portfolio::section::{Section, SectionKind};
use crate::portfolio::slug::slugify;
use crate::portfolio::store::UpsertPortfolio;
use crate::portfolio::theme::Theme;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub username: String,
    pub theme: Theme,
    pub published: bool,
    pub content: PortfolioDocument,
}

/// GET /api/v1/portfolio/:username
/// Public read surface: only published portfolios are visible.
pub async fn handle_public_portfolio(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let row = state
        .store
        .find_by_username(&username)
        .await?
        .filter(|r| r.published)
        .ok_or_else(|| AppError::NotFound(format!("No portfolio for '{username}'")))?;

    Ok(Json(PortfolioResponse {
        username: row.username.clone(),
        theme: row.theme(),
        published: row.published,
        content: row.document(),
    }))
}

/// GET /api/v1/portfolio
/// The owner's own portfolio, published or not — backs the dashboard.
pub async fn handle_get_own(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<PortfolioResponse>, AppError> {
    let username = slugify(&principal.display_name);
    match state.store.find_by_owner(&principal.user_id).await? {
        Some(row) => Ok(Json(PortfolioResponse {
            username: row.username.clone(),
            theme: row.theme(),
            published: row.published,
            content: row.document(),
        })),
        None => Ok(Json(PortfolioResponse {
            username,
            theme: Theme::default(),
            published: false,
            content: PortfolioDocument::default(),
        })),
    }
}

/// PUT /api/v1/portfolio/sections/:kind
/// Per-section save: validate the payload, merge it into the stored document
/// by kind, persist. Returns the merged document for the live preview.
pub async fn handle_save_section(
    State(state): State<AppState>,
    principal: Principal,
    Path(kind): Path<SectionKind>,
    Json(body): Json<Value>,
) -> Result<Json<PortfolioDocument>, AppError> {
    let section = section_from_form(kind, body)?;
    let document = persist_section(&state, &principal, section).await?;
    Ok(Json(document))
}

/// POST /api/v1/portfolio/import/json
/// Bulk import: builds a document from whichever section keys are present
/// and persists it as a full replace. The chat-wizard completion callback
/// posts its fenced JSON here.
pub async fn handle_import_json(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<Value>,
) -> Result<Json<PortfolioDocument>, AppError> {
    let extracted = document_from_json(&body)
        .map_err(|_| AppError::Validation("No valid sections found in payload".to_string()))?;

    let (username, current) = resolve_write_target(&state, &principal).await?;
    let theme = current.as_ref().map(PortfolioRow::theme).unwrap_or_default();
    state
        .store
        .upsert(UpsertPortfolio {
            user_id: &principal.user_id,
            username: &username,
            document: &extracted.document,
            published: true,
            theme,
        })
        .await?;

    Ok(Json(extracted.document))
}

/// POST /api/v1/portfolio/import/resume
/// Resume import. This boundary never throws: every pipeline failure comes
/// back as `{success: false, error}`.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<ImportRequest>,
) -> Json<ImportOutcome> {
    let result = run_import(
        state.store.as_ref(),
        state.parser.as_ref(),
        &principal,
        &request,
    )
    .await;

    if let Err(e) = &result {
        tracing::warn!(username = %request.username, error = %e, "resume import failed");
    }
    Json(result.into())
}

/// The username is the public lookup key: a write may only target a username
/// that is unclaimed or already owned by the caller.
async fn ensure_username_available(
    state: &AppState,
    username: &str,
    user_id: &str,
) -> Result<(), AppError> {
    match state.store.find_by_username(username).await? {
        Some(row) if row.user_id != user_id => Err(AppError::UsernameTaken),
        _ => Ok(()),
    }
}

/// Resolves the username an owner's write must target. An owner holds at
/// most one row, and the upsert conflicts on username — so once a row
/// exists, every write goes to its stored username even if the display
/// name (and thus the derived slug) has changed since. Only the first
/// write derives a fresh slug, which must then be unclaimed.
async fn resolve_write_target(
    state: &AppState,
    principal: &Principal,
) -> Result<(String, Option<PortfolioRow>), AppError> {
    let current = state.store.find_by_owner(&principal.user_id).await?;
    let username = match &current {
        Some(row) => row.username.clone(),
        None => {
            let username = slugify(&principal.display_name);
            if username.is_empty() {
                return Err(AppError::Validation(
                    "Display name yields an empty username".to_string(),
                ));
            }
            ensure_username_available(state, &username, &principal.user_id).await?;
            username
        }
    };
    Ok((username, current))
}

/// Merge-and-persist for interactive saves: read the owner's current
/// document, replace the one section, write back. Read-modify-write without
/// a spanning transaction — concurrent saves resolve last-write-wins at the
/// row level.
async fn persist_section(
    state: &AppState,
    principal: &Principal,
    section: Section,
) -> Result<PortfolioDocument, AppError> {
    let (username, current) = resolve_write_target(state, principal).await?;
    let (document, theme) = match &current {
        Some(row) => (row.document(), row.theme()),
        None => (PortfolioDocument::default(), Theme::default()),
    };

    let next = document.replace(section);
    state
        .store
        .upsert(UpsertPortfolio {
            user_id: &principal.user_id,
            username: &username,
            document: &next,
            published: true,
            theme,
        })
        .await?;

    Ok(next)
}
