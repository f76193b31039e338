use kernel::model::{auth::AccessToken, id::UserId};
use shared::error::AppError;
use std::str::FromStr;

pub trait RedisKey {
    type Value: RedisValue + TryFrom<String, Error = AppError>;
    fn inner(&self) -> String;
}

pub trait RedisValue {
    fn inner(&self) -> String;
}

/// Key under which an access token's owner is stored.
pub struct AuthorizationKey(String);

impl From<&AccessToken> for AuthorizationKey {
    fn from(token: &AccessToken) -> Self {
        Self(format!("auth:{}", token.0))
    }
}

impl From<AccessToken> for AuthorizationKey {
    fn from(token: AccessToken) -> Self {
        Self::from(&token)
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        self.0.clone()
    }
}

pub struct AuthorizedUserId(UserId);

impl AuthorizedUserId {
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl RedisValue for AuthorizedUserId {
    fn inner(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<String> for AuthorizedUserId {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self(UserId::from_str(&s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespaced_by_token() {
        let key = AuthorizationKey::from(AccessToken("abc123".into()));
        assert_eq!(key.inner(), "auth:abc123");
    }

    #[test]
    fn user_id_value_round_trips_through_text() {
        let user_id = UserId::new();
        let stored = AuthorizedUserId::new(user_id).inner();
        let restored = AuthorizedUserId::try_from(stored).unwrap();
        assert_eq!(restored.into_inner(), user_id);
        assert!(AuthorizedUserId::try_from("garbage".to_string()).is_err());
    }
}
