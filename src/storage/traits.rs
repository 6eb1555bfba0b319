use crate::domain::SeenSet;
use crate::errors::ScoutResult;

#[cfg_attr(test, mockall::automock)]
pub trait SeenStore {
    /// Load the persisted seen-set; unreadable state yields an empty set
    fn load(&self) -> SeenSet;

    /// Persist the seen-set, keeping only the most recently inserted ids
    fn save(&self, seen: &SeenSet) -> ScoutResult<()>;
}
