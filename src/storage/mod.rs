pub mod traits;
pub mod json_file;

pub use traits::SeenStore;
pub use json_file::JsonSeenStore;
