//! UseCase 層のエラー定義

use std::time::Duration;

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    /// The storage call did not finish before its deadline
    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
