#[cfg(test)]
use crate::features::admin::model::Moderator;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
async fn inject_moderator_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(Moderator::from_shared_token());
    next.run(request).await
}

/// Wrap a router so every request carries a moderator context, bypassing the
/// bearer-token middleware in tests.
#[cfg(test)]
#[allow(dead_code)]
pub fn with_moderator_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_moderator_middleware))
}
