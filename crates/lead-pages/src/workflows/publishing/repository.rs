use super::domain::{PageId, PublishedPage};

/// Storage abstraction so the publishing service can be exercised in isolation.
pub trait PageRepository: Send + Sync {
    fn insert(&self, page: PublishedPage) -> Result<PublishedPage, RepositoryError>;
    fn fetch(&self, id: &PageId) -> Result<Option<PublishedPage>, RepositoryError>;
    fn by_author(&self, author_id: &str) -> Result<Vec<PublishedPage>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("page already exists")]
    Conflict,
    #[error("page not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
