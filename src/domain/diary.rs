use crate::domain::{
    DateParts, DiaryDocument, DiaryEntry, ImportSummary, Month, Upsert, list_view, merge_into, parts_from_iso,
};
use crate::infrastructure::{DiaryRepository, ParseStatus, XmlCodec};
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};

pub const EXPORT_FILE_NAME: &str = "diary.xml";
pub const EXPORT_MIME_TYPE: &str = "application/xml";

/// A document together with how it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document: DiaryDocument,
    pub status: ParseStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub summary: ImportSummary,
    /// How the imported text parsed; `Recovered` means it was unreadable.
    pub source_status: ParseStatus,
}

/// Payload for the "export" download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

/// The entry store: every operation loads the slot fresh, mutates, and saves.
pub struct Diary {
    repository: Box<dyn DiaryRepository>,
    codec: XmlCodec,
}

impl Diary {
    pub fn new(repository: Box<dyn DiaryRepository>) -> Self {
        Self {
            repository,
            codec: XmlCodec::new(),
        }
    }

    pub fn load(&self) -> Result<LoadedDocument> {
        let raw = self
            .repository
            .load()
            .with_context(|| format!("Failed to read diary '{}'", self.repository.key()))?;

        let parsed = self.codec.parse(raw.as_deref().unwrap_or_default());
        match &parsed.status {
            ParseStatus::Recovered(reason) => warn!(
                "Stored diary '{}' is malformed ({}); treating it as empty",
                self.repository.key(),
                reason
            ),
            status => debug!(
                "Loaded {} records from '{}' ({})",
                parsed.document.len(),
                self.repository.key(),
                status
            ),
        }

        Ok(LoadedDocument {
            document: parsed.document,
            status: parsed.status,
        })
    }

    pub fn document(&self) -> Result<DiaryDocument> {
        Ok(self.load()?.document)
    }

    pub fn save(&self, document: &DiaryDocument) -> Result<()> {
        let xml = self.codec.serialize(document)?;
        self.repository
            .save(&xml)
            .with_context(|| format!("Failed to write diary '{}'", self.repository.key()))?;
        debug!(
            "Saved {} records to '{}'",
            document.len(),
            self.repository.key()
        );
        Ok(())
    }

    pub fn find(&self, day: u32, month: Month, year: i32) -> Result<Option<DiaryEntry>> {
        Ok(self
            .document()?
            .find(day, month, year)
            .map(|record| DiaryEntry::new(day, month, year, record.text.clone())))
    }

    pub fn upsert(&self, day: u32, month: Month, year: i32, text: impl Into<String>) -> Result<Upsert> {
        let mut document = self.document()?;
        let outcome = document.upsert(day, month, year, text);
        self.save(&document)?;
        Ok(outcome)
    }

    pub fn enumerate(&self) -> Result<Vec<DiaryEntry>> {
        Ok(self.document()?.enumerate())
    }

    /// Sorted newest first and filtered by `query`.
    pub fn search(&self, query: &str) -> Result<Vec<DiaryEntry>> {
        Ok(list_view(self.enumerate()?, query))
    }

    /// Stored entry for a `YYYY-MM-DD` date, if any.
    pub fn entry_for(&self, iso_date: &str) -> Result<Option<DiaryEntry>> {
        let Some(parts) = parts_from_iso(iso_date) else {
            bail!("'{}' is not a date in YYYY-MM-DD form", iso_date);
        };
        self.entry_at(parts)
    }

    /// Stored entry at these fields. Unlike [`Diary::entry_for`], this reaches
    /// records the calendar would reject, such as an imported `31 FEB`.
    pub fn entry_at(&self, parts: DateParts) -> Result<Option<DiaryEntry>> {
        self.find(parts.day, parts.month, parts.year)
    }

    /// Save from the edit screen: both a date and some text are required.
    pub fn save_entry(&self, iso_date: &str, text: &str) -> Result<Upsert> {
        let iso_date = iso_date.trim();
        if iso_date.is_empty() {
            bail!("Please select a date.");
        }
        let Some(parts) = parts_from_iso(iso_date) else {
            bail!("'{}' is not a date in YYYY-MM-DD form", iso_date);
        };
        self.save_entry_at(parts, text)
    }

    /// Save trimmed text at these fields; empty text is refused.
    pub fn save_entry_at(&self, parts: DateParts, text: &str) -> Result<Upsert> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Please write something before saving.");
        }

        self.upsert(parts.day, parts.month, parts.year, text)
    }

    pub fn import_xml_string(&self, text: &str) -> Result<ImportReport> {
        let incoming = self.codec.parse(text);
        if let ParseStatus::Recovered(reason) = &incoming.status {
            warn!("Import is not a readable diary ({}); nothing to merge", reason);
        }

        let mut document = self.document()?;
        let summary = merge_into(&mut document, incoming.document);
        self.save(&document)?;

        info!("Imported into '{}': {}", self.repository.key(), summary);
        Ok(ImportReport {
            summary,
            source_status: incoming.status,
        })
    }

    pub fn export_xml(&self) -> Result<String> {
        self.codec.serialize(&self.document()?)
    }

    pub fn export_file(&self) -> Result<ExportFile> {
        Ok(ExportFile {
            file_name: EXPORT_FILE_NAME,
            mime_type: EXPORT_MIME_TYPE,
            contents: self.export_xml()?,
        })
    }
}
