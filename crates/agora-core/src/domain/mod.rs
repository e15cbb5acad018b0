//! Domain entities - the core business objects.

mod event;
mod page;
mod post;
mod user;

pub use event::FeedEvent;
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use post::{CreatorSummary, Post, PostDetails};
pub use user::{DEFAULT_STATUS, User, normalize_email};
