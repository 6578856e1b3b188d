/// Test utilities for file-backed diaries
///
/// Each harness owns a fresh temporary data directory that is removed when the
/// harness is dropped, so tests never share a storage slot.
///
/// ```rust,ignore
/// use crate::infrastructure::test_utils::test_harness::TestDiary;
///
/// #[test]
/// fn my_test() {
///     let test_diary = TestDiary::new();
///     test_diary.diary().save_entry("2024-01-05", "grocery list").unwrap();
/// }
/// ```
#[cfg(test)]
pub mod test_harness {
    use crate::domain::{Diary, DiaryEntry, Month};
    use crate::infrastructure::{FileSystemRepository, HookRegistry, WriteLogHook};
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub const TEST_KEY: &str = "diaryXML";

    pub struct TestDiary {
        pub diary: Diary,
        _temp_dir: TempDir, // Keep temp dir alive
    }

    impl TestDiary {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp directory");
            let mut hooks = HookRegistry::new();
            hooks.register(WriteLogHook);
            let repository =
                FileSystemRepository::with_hooks(temp_dir.path().to_path_buf(), TEST_KEY, hooks);

            Self {
                diary: Diary::new(Box::new(repository)),
                _temp_dir: temp_dir,
            }
        }

        pub fn diary(&self) -> &Diary {
            &self.diary
        }

        pub fn data_dir(&self) -> &Path {
            self._temp_dir.path()
        }

        pub fn storage_path(&self) -> PathBuf {
            self.data_dir().join(format!("{}.xml", TEST_KEY))
        }

        /// Write the storage file directly, as if another program had.
        pub fn write_raw(&self, contents: impl AsRef<[u8]>) -> Result<()> {
            std::fs::write(self.storage_path(), contents)?;
            Ok(())
        }

        /// The two entries used by the search scenarios.
        pub fn seed_sample_entries(&self) -> Result<Vec<DiaryEntry>> {
            let entries = vec![
                DiaryEntry::new(5, Month::Jan, 2024, "grocery list"),
                DiaryEntry::new(25, Month::Dec, 2023, "holiday trip"),
            ];
            for entry in &entries {
                self.diary
                    .upsert(entry.day, entry.month, entry.year, entry.text.clone())?;
            }
            Ok(entries)
        }
    }

    pub fn with_test_diary<F, R>(test_fn: F) -> R
    where
        F: FnOnce(&TestDiary) -> R,
    {
        let test_diary = TestDiary::new();
        test_fn(&test_diary)
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;
    use crate::domain::Month;
    use crate::infrastructure::{ParseStatus, WRITE_LOG_FILE};

    #[test]
    fn harness_persists_to_disk() {
        let test_diary = TestDiary::new();
        test_diary.seed_sample_entries().unwrap();

        let on_disk = std::fs::read_to_string(test_diary.storage_path()).unwrap();
        assert!(on_disk.starts_with("<diary>"));
        assert!(on_disk.contains("holiday trip"));

        let log = std::fs::read_to_string(test_diary.data_dir().join(WRITE_LOG_FILE)).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn harness_isolation() {
        let first = TestDiary::new();
        let second = TestDiary::new();

        first.seed_sample_entries().unwrap();

        assert!(second.diary().enumerate().unwrap().is_empty());
    }

    #[test]
    fn corrupted_file_recovers_then_is_overwritten_by_next_save() {
        with_test_diary(|test_diary| {
            test_diary.write_raw("not xml at all").unwrap();
            assert!(test_diary.diary().load().unwrap().status.is_recovered());

            test_diary
                .diary()
                .upsert(1, Month::Mar, 2024, "fresh start")
                .unwrap();

            let loaded = test_diary.diary().load().unwrap();
            assert_eq!(loaded.status, ParseStatus::Parsed);
            assert_eq!(loaded.document.len(), 1);
        });
    }

    #[test]
    fn non_utf8_file_recovers_and_can_be_saved_over() {
        with_test_diary(|test_diary| {
            test_diary.write_raw(b"\xff\xfe\x00<").unwrap();

            let loaded = test_diary.diary().load().unwrap();
            assert!(loaded.status.is_recovered());
            assert!(loaded.document.is_empty());

            test_diary.diary().save_entry("2024-01-05", "x").unwrap();

            let loaded = test_diary.diary().load().unwrap();
            assert_eq!(loaded.status, ParseStatus::Parsed);
            assert_eq!(loaded.document.len(), 1);
        });
    }

    #[test]
    fn import_then_export_through_the_file_system() {
        with_test_diary(|test_diary| {
            test_diary.seed_sample_entries().unwrap();

            let report = test_diary
                .diary()
                .import_xml_string(
                    "<diary><entry day=\"05\" month=\"01\" year=\"2024\">updated list</entry></diary>",
                )
                .unwrap();
            assert_eq!((report.summary.added, report.summary.updated), (0, 1));

            let exported = test_diary.diary().export_xml().unwrap();
            assert!(exported.contains(">updated list</entry>"));
            assert!(!exported.contains("grocery list"));
        });
    }
}
