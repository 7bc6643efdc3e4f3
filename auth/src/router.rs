use crate::token::{TokenService, require_token};
use axum::middleware;
use axum::routing::MethodRouter;
use tracing::{debug, instrument};
use utoipa_axum::router::OpenApiRouter;

pub trait ProtectedRouter<S> {
    /// Route `path` to `method_router`, answering 401 before the handler runs
    /// unless the request carries a valid token cookie.
    fn protected_route(self, path: &str, method_router: MethodRouter<S>, tokens: TokenService) -> Self;
}

impl<S> ProtectedRouter<S> for OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    #[instrument(skip_all)]
    fn protected_route(self, path: &str, method_router: MethodRouter<S>, tokens: TokenService) -> Self {
        debug!("creating route '{path}' protected by token cookie");
        self.route(
            path,
            method_router.layer(middleware::from_fn_with_state(tokens, require_token)),
        )
    }
}
