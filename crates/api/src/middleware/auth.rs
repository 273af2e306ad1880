//! Identity extractor for Axum handlers.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity as headers:
//!
//! | Header                  | Meaning                                  |
//! |-------------------------|------------------------------------------|
//! | `x-user-id`             | learner / admin UUID (required)          |
//! | `x-user-role`           | `student` or `admin` (default `student`) |
//! | `x-subscription-active` | `true` when a paid plan is active        |

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use mambo_core::error::CoreError;
use mambo_core::roles::{ROLE_STUDENT, VALID_ROLES};
use mambo_core::types::EntityId;

use crate::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const SUBSCRIPTION_HEADER: &str = "x-subscription-active";

/// Authenticated user extracted from the identity headers.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: EntityId,
    /// The user's role name (`"student"` or `"admin"`).
    pub role: String,
    /// Whether the user holds an active subscription.
    pub subscription_active: bool,
}

impl AuthUser {
    fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let raw_id = header_str(headers, USER_ID_HEADER).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Missing {USER_ID_HEADER} header"
            )))
        })?;

        let user_id: EntityId = raw_id.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Invalid {USER_ID_HEADER} header. Expected a UUID"
            )))
        })?;

        let role = header_str(headers, USER_ROLE_HEADER)
            .map(|r| r.trim().to_ascii_lowercase())
            .unwrap_or_else(|| ROLE_STUDENT.to_string());
        if !VALID_ROLES.contains(&role.as_str()) {
            return Err(AppError::Core(CoreError::Unauthorized(format!(
                "Unknown role '{role}'"
            ))));
        }

        let subscription_active = header_str(headers, SUBSCRIPTION_HEADER)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        Ok(AuthUser {
            user_id,
            role,
            subscription_active,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}
