pub mod traits;
pub mod reddit;

pub use traits::FeedClient;
pub use reddit::RedditSource;
