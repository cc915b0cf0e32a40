//! Server side of the wizards: turns submissions into page records and
//! serves the calendar and contact downloads derived from them.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{meta_keys, PageId, PageView, Party, PublishedPage};
pub use repository::{PageRepository, RepositoryError};
pub use router::{page_router, PublishingState, ROLES_HEADER, TOKEN_HEADER, USER_HEADER};
pub use service::{PagePublishingService, PublishError, PublishingSettings, ServiceSubmitter};
