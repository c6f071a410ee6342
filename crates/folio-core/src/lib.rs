// Repository feed for the portfolio's Projects page
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod page;
pub mod providers;
pub mod source;
pub mod theme;

pub use config::Config;
pub use error::Error;
pub use folio_api::GitHubError;
pub use feed::{fetch_feed, FeedLoader, FeedRequest, MalformedPolicy};
pub use models::{ExclusionSet, FeedState, FeedStatus, RepositoryRecord};
pub use page::PageSession;
pub use source::{FeedSource, SourceListing};
pub use theme::{Palette, ThemeMode};

pub type Result<T> = std::result::Result<T, Error>;
