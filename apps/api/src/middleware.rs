use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use marquee_core::{AppError, TenantId};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header selecting the tenant a request runs in. Defaults to the root tenant.
pub const TENANT_HEADER: &str = "x-tenant";

/// Resolves the tenant and bearer identity of a request and stores the
/// resulting [`marquee_application::RequestContext`] in its extensions.
pub async fn resolve_request_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let tenant_id = tenant_id(request.headers())?;
    let identity = match bearer_token(request.headers())? {
        Some(token) => Some(
            state
                .services
                .security
                .authenticate(&token)
                .await?
                .ok_or_else(|| AppError::Unauthorized("invalid or expired token".to_owned()))?,
        ),
        None => None,
    };

    let context = state
        .services
        .authorization
        .build_context(&tenant_id, identity)
        .await?;
    debug!(
        tenant_id = %context.tenant().id(),
        identity = context.identity().map(|identity| identity.id()),
        "resolved request context"
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn tenant_id(headers: &HeaderMap) -> Result<TenantId, AppError> {
    match headers.get(TENANT_HEADER) {
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                AppError::Validation(format!("{TENANT_HEADER} header must be visible ASCII"))
            })?;
            TenantId::new(value.trim())
        }
        None => Ok(TenantId::root()),
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Some(token.to_owned()))
        .ok_or_else(|| {
            AppError::Unauthorized("authorization header must carry a bearer token".to_owned())
        })
}
