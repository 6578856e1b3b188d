use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "diaryXML";

pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub theme: String,
    pub editor: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = non_empty("DIARY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("diarist")
            });

        let storage_key =
            non_empty("DIARY_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let theme = non_empty("DIARY_THEME").unwrap_or_else(|| "dark".to_string());
        let editor = non_empty("EDITOR").unwrap_or_else(|| "nano".to_string());

        Self {
            data_dir,
            storage_key,
            theme,
            editor,
        }
    }
}
