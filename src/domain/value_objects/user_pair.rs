use super::UserId;
use crate::shared::AppError;

/// Two distinct, non-empty users. Construction is the single place self-pairs are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPair {
    first: UserId,
    second: UserId,
}

impl UserPair {
    pub fn new(first: &str, second: &str) -> Result<Self, AppError> {
        let first = UserId::new(first).map_err(AppError::invalid_pair)?;
        let second = UserId::new(second).map_err(AppError::invalid_pair)?;
        Self::from_ids(first, second)
    }

    pub fn from_ids(first: UserId, second: UserId) -> Result<Self, AppError> {
        if first == second {
            return Err(AppError::invalid_pair(format!(
                "cannot pair user {first} with itself"
            )));
        }
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &UserId {
        &self.first
    }

    pub fn second(&self) -> &UserId {
        &self.second
    }

    /// Order-independent key: `(min, max)`.
    pub fn canonical(&self) -> (&UserId, &UserId) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }
}
