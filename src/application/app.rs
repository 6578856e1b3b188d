use crate::application::tui::{BrowserResult, EntryBrowser, EntryRenderer, Theme};
use crate::application::Config;
use crate::domain::{
    DateParts, Diary, DiaryEntry, ImportReport, Upsert, fmt_date, iso_today, parts_from_iso,
};
use crate::infrastructure::{FileSystemRepository, HookRegistry, WriteHook, WriteLogHook};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct DiaryApp {
    diary: Diary,
    config: Config,
    theme: Theme,
}

impl DiaryApp {
    pub fn new() -> Self {
        Self::with_default_plugins()
    }

    pub fn with_default_plugins() -> Self {
        let config = Config::from_env();

        // Set up hook registry with default plugins
        let hook_registry =
            HookRegistry::with_defaults([Box::new(WriteLogHook) as Box<dyn WriteHook>]);
        debug!("Write hooks: {:?}", hook_registry.list_hooks());

        let repository = FileSystemRepository::with_hooks(
            config.data_dir.clone(),
            config.storage_key.clone(),
            hook_registry,
        );
        Self::with_parts(config, Diary::new(Box::new(repository)))
    }

    pub fn with_parts(config: Config, diary: Diary) -> Self {
        let theme = Theme::by_name(&config.theme);
        Self {
            diary,
            config,
            theme,
        }
    }

    pub fn diary(&self) -> &Diary {
        &self.diary
    }

    pub fn renderer(&self) -> EntryRenderer {
        EntryRenderer::new(self.theme.clone())
    }

    fn date_or_today(date: Option<&str>) -> String {
        date.map(str::to_string).unwrap_or_else(iso_today)
    }

    pub fn write_entry(&self, date: Option<&str>, text: &str) -> Result<Upsert> {
        let date = Self::date_or_today(date);
        let outcome = self.diary.save_entry(&date, text)?;
        info!("Entry for {} {:?}", date, outcome);
        Ok(outcome)
    }

    pub fn show_entry(&self, date: Option<&str>) -> Result<Option<DiaryEntry>> {
        self.diary.entry_for(&Self::date_or_today(date))
    }

    pub fn list_entries(&self, query: Option<&str>) -> Result<Vec<DiaryEntry>> {
        self.diary.search(query.unwrap_or_default())
    }

    /// Merge a file into the diary. Undecodable bytes are replaced rather than
    /// refused, so a binary file imports as nothing.
    pub fn import_file(&self, path: &Path) -> Result<ImportReport> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Could not read import file {}", path.display()))?;
        self.diary
            .import_xml_string(&String::from_utf8_lossy(&bytes))
    }

    /// Write `diary.xml` to `output`: a file path, an existing directory, or
    /// the current directory when absent.
    pub fn export_to(&self, output: Option<&Path>) -> Result<PathBuf> {
        let export = self.diary.export_file()?;
        let target = match output {
            Some(path) if path.is_dir() => path.join(export.file_name),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(export.file_name),
        };

        std::fs::write(&target, &export.contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        info!(
            "Exported {} bytes of {} to {}",
            export.contents.len(),
            export.mime_type,
            target.display()
        );
        Ok(target)
    }

    pub fn edit_entry_for_date(&self, iso_date: &str) -> Result<Option<Upsert>> {
        let Some(parts) = parts_from_iso(iso_date.trim()) else {
            bail!("'{}' is not a date in YYYY-MM-DD form", iso_date);
        };
        self.edit_entry(parts)
    }

    /// Open the entry in `$EDITOR` and save whatever comes back.
    ///
    /// Returns `None` when the text was left empty or unchanged.
    pub fn edit_entry(&self, parts: DateParts) -> Result<Option<Upsert>> {
        let label = fmt_date(parts.day, parts.month, parts.year);
        let existing = self
            .diary
            .entry_at(parts)?
            .map(|entry| entry.text)
            .unwrap_or_default();

        let scratch = tempfile::Builder::new()
            .prefix("diarist-")
            .suffix(".txt")
            .tempfile()
            .context("Failed to create editor scratch file")?;
        std::fs::write(scratch.path(), &existing)?;

        let status = Command::new(&self.config.editor)
            .arg(scratch.path())
            .status()
            .with_context(|| format!("Failed to launch editor '{}'", self.config.editor))?;

        if !status.success() {
            return Err(anyhow!("Editor exited with error: {}", status));
        }

        let edited = std::fs::read_to_string(scratch.path())?;
        if edited.trim().is_empty() || edited.trim() == existing.trim() {
            info!("Entry for {} left unchanged", label);
            return Ok(None);
        }

        Ok(Some(self.diary.save_entry_at(parts, &edited)?))
    }

    pub fn run_browser(&mut self) -> Result<()> {
        loop {
            let entries = self.diary.enumerate()?;
            let result = {
                let mut browser = EntryBrowser::new(entries, self.theme.clone())?;
                let result = browser.run()?;
                self.theme = browser.theme().clone();
                result
            }; // browser is dropped here, restoring the terminal

            match result {
                BrowserResult::EditRequested(parts) => {
                    // A failed edit returns to the browser rather than ending it
                    if let Err(e) = self.edit_entry(parts) {
                        warn!(
                            "Could not edit {}: {:#}",
                            fmt_date(parts.day, parts.month, parts.year),
                            e
                        );
                    }
                }
                BrowserResult::Exited => break,
            }
        }

        Ok(())
    }
}

impl Default for DiaryApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImportSummary;
    use crate::infrastructure::MemoryRepository;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn app_with(vars: &[(&str, &str)]) -> (DiaryApp, MemoryRepository) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_lookup(|name| vars.get(name).cloned());
        let repository = MemoryRepository::new(config.storage_key.clone());
        let app = DiaryApp::with_parts(config, Diary::new(Box::new(repository.clone())));
        (app, repository)
    }

    #[test]
    fn write_defaults_to_today() {
        let (app, _) = app_with(&[]);
        app.write_entry(None, "today's thoughts").unwrap();

        let entry = app.show_entry(None).unwrap().unwrap();
        assert_eq!(entry.iso_date(), iso_today());
        assert_eq!(entry.text, "today's thoughts");
    }

    #[test]
    fn import_file_reports_unreadable_files() {
        let (app, repository) = app_with(&[]);
        let dir = TempDir::new().unwrap();

        let err = app.import_file(&dir.path().join("missing.xml")).unwrap_err();

        assert!(err.to_string().starts_with("Could not read import file"));
        assert_eq!(repository.raw(), None);
    }

    #[test]
    fn import_file_merges() {
        let (app, _) = app_with(&[]);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.xml");
        std::fs::write(
            &path,
            "<diary><entry day=\"1\" month=\"MAR\" year=\"2024\">fresh</entry></diary>",
        )
        .unwrap();

        let report = app.import_file(&path).unwrap();

        assert_eq!(report.summary.added, 1);
        assert_eq!(app.list_entries(Some("fresh")).unwrap().len(), 1);
    }

    #[test]
    fn import_file_treats_binary_as_an_empty_diary() {
        let (app, _) = app_with(&[]);
        app.write_entry(Some("2024-01-05"), "grocery list").unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"\x89PNG\xff\x00").unwrap();

        let report = app.import_file(&path).unwrap();

        assert_eq!(report.summary, ImportSummary::default());
        assert!(report.source_status.is_recovered());
        assert_eq!(app.list_entries(None).unwrap().len(), 1);
    }

    #[test]
    fn export_into_a_directory_uses_the_fixed_name() {
        let (app, _) = app_with(&[]);
        app.write_entry(Some("2024-01-05"), "grocery list").unwrap();
        let dir = TempDir::new().unwrap();

        let target = app.export_to(Some(dir.path())).unwrap();

        assert_eq!(target, dir.path().join("diary.xml"));
        let written = std::fs::read_to_string(target).unwrap();
        assert_eq!(
            written,
            "<diary><entry day=\"5\" month=\"JAN\" year=\"2024\">grocery list</entry></diary>"
        );
    }

    #[test]
    fn export_to_an_explicit_file() {
        let (app, _) = app_with(&[]);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup-2024.xml");

        assert_eq!(app.export_to(Some(&path)).unwrap(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<diary></diary>");
    }

    #[cfg(unix)]
    #[test]
    fn editor_that_changes_nothing_saves_nothing() {
        let (app, repository) = app_with(&[("EDITOR", "true")]);
        assert_eq!(app.edit_entry_for_date("2024-01-05").unwrap(), None);
        assert_eq!(repository.raw(), None);
    }

    #[cfg(unix)]
    #[test]
    fn imported_out_of_calendar_entry_opens_in_the_editor() {
        let (app, repository) = app_with(&[("EDITOR", "true")]);
        app.diary()
            .import_xml_string(
                "<diary><entry day=\"31\" month=\"FEB\" year=\"2024\">leap?</entry></diary>",
            )
            .unwrap();
        let before = repository.raw();
        let entry = app.list_entries(None).unwrap().remove(0);

        assert!(app.edit_entry_for_date(&entry.iso_date()).is_err());
        assert_eq!(app.edit_entry(entry.parts()).unwrap(), None);
        assert_eq!(repository.raw(), before);
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_is_an_error() {
        let (app, _) = app_with(&[("EDITOR", "false")]);
        assert!(app.edit_entry_for_date("2024-01-05").is_err());
    }
}
