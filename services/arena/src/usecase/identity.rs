use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ArenaError;
use crate::usecase::token::TokenIssuer;

/// Resolve a bearer token to its live user.
pub struct CurrentUserUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenIssuer,
}

impl<U: UserRepository> CurrentUserUseCase<U> {
    pub async fn execute(&self, token: &str) -> Result<User, ArenaError> {
        let phone = self.tokens.verify(token)?;
        match self.users.find_by_phone(&phone).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(ArenaError::Unauthenticated),
        }
    }
}
