use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use courtside_auth_types::bearer::bearer_token;

use crate::domain::types::User;
use crate::error::ArenaError;
use crate::state::AppState;
use crate::usecase::identity::CurrentUserUseCase;

/// The live user behind the request's bearer token.
///
/// Missing token: `Unauthenticated`. Bad signature or expired: `InvalidToken`.
/// Unknown or deactivated user: `Unauthenticated`.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ArenaError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let state = state.clone();

        async move {
            let token = token.ok_or(ArenaError::Unauthenticated)?;
            let usecase = CurrentUserUseCase {
                users: state.user_repo(),
                tokens: state.token_issuer(),
            };
            usecase.execute(&token).await.map(CurrentUser)
        }
    }
}
