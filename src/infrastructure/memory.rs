use crate::infrastructure::DiaryRepository;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key/value storage held in memory.
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what the store wrote.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    key: String,
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Write the slot directly, bypassing the store.
    pub fn set_raw(&self, xml: impl Into<String>) {
        self.slots.borrow_mut().insert(self.key.clone(), xml.into());
    }

    pub fn raw(&self) -> Option<String> {
        self.slots.borrow().get(&self.key).cloned()
    }
}

impl DiaryRepository for MemoryRepository {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.raw())
    }

    fn save(&self, xml: &str) -> Result<()> {
        self.set_raw(xml);
        Ok(())
    }

    fn key(&self) -> &str {
        &self.key
    }
}
