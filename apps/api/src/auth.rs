//! Request-scoped authenticated principal.
//!
//! Session verification happens upstream (the auth gateway terminates the
//! cookie and forwards identity headers). The extractor turns those headers
//! into an explicit `Principal` handed to every write path — no ambient
//! session state anywhere in the service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub display_name: String,
    pub avatar: Option<String>,
}

const USER_ID_HEADER: &str = "x-user-id";
const USER_NAME_HEADER: &str = "x-user-name";
const USER_AVATAR_HEADER: &str = "x-user-avatar";

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let user_id = header(USER_ID_HEADER).ok_or(AppError::Unauthorized)?;
        let display_name = header(USER_NAME_HEADER).ok_or(AppError::Unauthorized)?;
        let avatar = header(USER_AVATAR_HEADER);

        Ok(Principal {
            user_id,
            display_name,
            avatar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Principal, AppError> {
        let (mut parts, _) = request.into_parts();
        Principal::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_principal_from_headers() {
        let request = Request::builder()
            .header("x-user-id", "u-42")
            .header("x-user-name", "Jane Doe")
            .header("x-user-avatar", "https://cdn.example/jane.png")
            .body(())
            .unwrap();

        let principal = extract(request).await.unwrap();
        assert_eq!(principal.user_id, "u-42");
        assert_eq!(principal.display_name, "Jane Doe");
        assert_eq!(principal.avatar.as_deref(), Some("https://cdn.example/jane.png"));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let request = Request::builder()
            .header("x-user-name", "Jane Doe")
            .body(())
            .unwrap();

        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_blank_avatar_header_is_none() {
        let request = Request::builder()
            .header("x-user-id", "u-42")
            .header("x-user-name", "Jane Doe")
            .header("x-user-avatar", "  ")
            .body(())
            .unwrap();

        let principal = extract(request).await.unwrap();
        assert!(principal.avatar.is_none());
    }
}
