use anyhow::Result;

/// A single storage slot holding the serialized diary.
///
/// `load` returns `None` when nothing has been stored yet. `save` replaces
/// the stored string as a whole.
pub trait DiaryRepository {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, xml: &str) -> Result<()>;

    /// Storage key the slot lives under.
    fn key(&self) -> &str;
}
