use anyhow::Result;
use log::warn;
use std::path::PathBuf;

/// Context provided to write hooks
#[derive(Debug, Clone)]
pub struct WriteContext {
    pub key: String,
    pub storage_path: PathBuf,
    pub data_dir: PathBuf,
    pub content: String,
}

/// Trait for plugins that respond to diary writes
pub trait WriteHook: Send + Sync {
    /// Called after the diary has been successfully written to disk
    fn on_diary_written(&self, context: &WriteContext) -> Result<()>;

    /// Human-readable name for this hook
    fn name(&self) -> &str;

    /// Whether this hook should be enabled by default
    fn enabled_by_default(&self) -> bool {
        true
    }
}

/// Registry for managing write hooks
pub struct HookRegistry {
    hooks: Vec<Box<dyn WriteHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Registry holding every hook that is on unless asked otherwise
    pub fn with_defaults<I>(hooks: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn WriteHook>>,
    {
        Self {
            hooks: hooks
                .into_iter()
                .filter(|hook| hook.enabled_by_default())
                .collect(),
        }
    }

    /// Register a new write hook
    pub fn register<H>(&mut self, hook: H)
    where
        H: WriteHook + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Run every hook; a failing hook is logged and the rest still run
    pub fn execute_write_hooks(&self, context: &WriteContext) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_diary_written(context) {
                warn!("Hook '{}' failed: {:#}", hook.name(), e);
            }
        }
    }

    /// List all registered hooks
    pub fn list_hooks(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
