//! Persistence gateway for portfolio rows.
//!
//! The contract the rest of the service relies on: one row per owner, one row
//! per username, and `upsert` keyed on the unique username — an existing row
//! is updated in place, otherwise a fresh row is created. Row-level
//! last-committed-wins is the only concurrency guarantee. Every successful
//! upsert bumps the public cache stamp.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::PortfolioRow;
use crate::portfolio::cache::CacheStamp;
use crate::portfolio::document::PortfolioDocument;
use crate::portfolio::theme::Theme;

#[derive(Debug, Clone)]
pub struct UpsertPortfolio<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub document: &'a PortfolioDocument,
    pub published: bool,
    pub theme: Theme,
}

/// `AppState` holds an `Arc<dyn PortfolioStore>`; handlers and the import
/// pipeline never touch the pool directly, which keeps them testable against
/// the in-memory double.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<PortfolioRow>, AppError>;

    async fn find_by_owner(&self, user_id: &str) -> Result<Option<PortfolioRow>, AppError>;

    async fn upsert(&self, params: UpsertPortfolio<'_>) -> Result<(), AppError>;
}

pub struct PgPortfolioStore {
    pool: PgPool,
    cache: CacheStamp,
}

impl PgPortfolioStore {
    pub fn new(pool: PgPool, cache: CacheStamp) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl PortfolioStore for PgPortfolioStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<PortfolioRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM portfolio WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Option<PortfolioRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM portfolio WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert(&self, params: UpsertPortfolio<'_>) -> Result<(), AppError> {
        let content = serde_json::to_value(params.document)
            .map_err(|e| anyhow::anyhow!("failed to encode document: {e}"))?;

        sqlx::query(
            r#"
            INSERT INTO portfolio (id, user_id, username, content, published, theme, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            ON CONFLICT (username) DO UPDATE
            SET content = EXCLUDED.content,
                published = EXCLUDED.published,
                theme = EXCLUDED.theme,
                updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.user_id)
        .bind(params.username)
        .bind(content)
        .bind(params.published)
        .bind(params.theme.as_str())
        .execute(&self.pool)
        .await?;

        tracing::info!(username = params.username, "portfolio upserted");
        self.cache.invalidate();
        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store double with the same upsert-by-username semantics.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct MemoryPortfolioStore {
        rows: Mutex<HashMap<String, PortfolioRow>>,
        pub cache: CacheStamp,
        /// When set, `upsert` fails — exercises the persistence error path.
        pub fail_writes: bool,
    }

    impl MemoryPortfolioStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PortfolioStore for MemoryPortfolioStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<PortfolioRow>, AppError> {
            Ok(self.rows.lock().unwrap().get(username).cloned())
        }

        async fn find_by_owner(&self, user_id: &str) -> Result<Option<PortfolioRow>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|r| r.user_id == user_id)
                .cloned())
        }

        async fn upsert(&self, params: UpsertPortfolio<'_>) -> Result<(), AppError> {
            if self.fail_writes {
                return Err(AppError::Internal(anyhow::anyhow!("write refused")));
            }

            let content = serde_json::to_value(params.document)
                .map_err(|e| anyhow::anyhow!("failed to encode document: {e}"))?;

            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(params.username) {
                Some(existing) => {
                    existing.content = content;
                    existing.published = params.published;
                    existing.theme = params.theme.as_str().to_string();
                    existing.updated_at = Utc::now();
                }
                None => {
                    // user_id is UNIQUE in Postgres; the double must refuse
                    // a second row for the same owner just as the real
                    // store would.
                    if rows.values().any(|r| r.user_id == params.user_id) {
                        return Err(AppError::Internal(anyhow::anyhow!(
                            "duplicate key value violates unique constraint \"portfolio_user_id_key\""
                        )));
                    }
                    rows.insert(
                        params.username.to_string(),
                        PortfolioRow {
                            id: Uuid::new_v4(),
                            user_id: params.user_id.to_string(),
                            username: params.username.to_string(),
                            content,
                            published: params.published,
                            theme: params.theme.as_str().to_string(),
                            created_at: Utc::now(),
                            updated_at: Utc::now(),
                        },
                    );
                }
            }
            drop(rows);

            self.cache.invalidate();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::portfolio::section::{HeaderData, Section};

        fn doc(name: &str) -> PortfolioDocument {
            PortfolioDocument::from_sections([Section::Header(HeaderData {
                name: name.to_string(),
                tagline: None,
                display_picture: None,
            })])
        }

        #[tokio::test]
        async fn test_upsert_inserts_then_updates_in_place() {
            let store = MemoryPortfolioStore::new();
            let first = doc("Jane");
            store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "jane",
                    document: &first,
                    published: false,
                    theme: Theme::Default,
                })
                .await
                .unwrap();

            let created = store.find_by_username("jane").await.unwrap().unwrap();
            assert!(!created.published);

            let second = doc("Jane Doe");
            store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "jane",
                    document: &second,
                    published: true,
                    theme: Theme::Pink,
                })
                .await
                .unwrap();

            let updated = store.find_by_username("jane").await.unwrap().unwrap();
            assert_eq!(updated.id, created.id, "conflict must update, not replace");
            assert!(updated.published);
            assert_eq!(updated.theme, "pink");
            assert_eq!(updated.document(), second);
        }

        #[tokio::test]
        async fn test_upsert_refuses_second_row_for_same_owner() {
            let store = MemoryPortfolioStore::new();
            store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "jane",
                    document: &doc("Jane"),
                    published: true,
                    theme: Theme::Default,
                })
                .await
                .unwrap();

            let err = store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "janet",
                    document: &doc("Janet"),
                    published: true,
                    theme: Theme::Default,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Internal(_)));
            assert!(store.find_by_username("janet").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_upsert_bumps_cache_stamp() {
            let store = MemoryPortfolioStore::new();
            let before = store.cache.generation();
            store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "jane",
                    document: &doc("Jane"),
                    published: true,
                    theme: Theme::Default,
                })
                .await
                .unwrap();
            assert_eq!(store.cache.generation(), before + 1);
        }

        #[tokio::test]
        async fn test_find_by_owner() {
            let store = MemoryPortfolioStore::new();
            store
                .upsert(UpsertPortfolio {
                    user_id: "u1",
                    username: "jane",
                    document: &doc("Jane"),
                    published: true,
                    theme: Theme::Default,
                })
                .await
                .unwrap();

            assert!(store.find_by_owner("u1").await.unwrap().is_some());
            assert!(store.find_by_owner("u2").await.unwrap().is_none());
        }
    }
}
