pub mod post;
pub mod seen_set;
pub mod digest;

pub use post::Post;
pub use seen_set::{SeenSet, SEEN_CAPACITY};
pub use digest::Digest;
