//! Section mastery tracking with durable, fail-open persistence.
//!
//! Mastery is a flat map from section key ("{chapter_id}-{section_id}") to a
//! boolean. Only `true` entries are ever stored: toggling a section off
//! removes its key, so a map and its persisted form always agree
//! structurally. The store never blocks the app: a missing or corrupt file
//! loads as empty progress, and a failed write is logged while the in-memory
//! map stays authoritative.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::curriculum::Curriculum;
use crate::error::PersistenceError;
use crate::model::{Chapter, SectionAddress};

/// In-memory mastery map. BTreeMap keeps the persisted JSON deterministic.
pub type MasteryMap = BTreeMap<String, bool>;

/// Flip a section's mastery flag. A flag flipped to off is removed outright
/// rather than stored as `false`, so toggling twice restores the exact
/// original map.
pub fn toggle(map: &mut MasteryMap, addr: &SectionAddress) {
    let key = addr.mastery_key();
    if map.remove(&key).is_none() {
        map.insert(key, true);
    }
}

pub fn is_mastered(map: &MasteryMap, addr: &SectionAddress) -> bool {
    map.get(&addr.mastery_key()).copied().unwrap_or(false)
}

/// Aggregate completion state of one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Derive a chapter's status from its sections' mastery flags. A chapter with
/// no sections is reported as not started.
pub fn chapter_status(map: &MasteryMap, chapter: &Chapter) -> ChapterStatus {
    let total = chapter.sections.len();
    if total == 0 {
        return ChapterStatus::NotStarted;
    }
    let mastered = chapter
        .sections
        .iter()
        .filter(|s| is_mastered(map, &SectionAddress::new(&chapter.id, &s.id)))
        .count();
    if mastered == 0 {
        ChapterStatus::NotStarted
    } else if mastered == total {
        ChapterStatus::Completed
    } else {
        ChapterStatus::InProgress
    }
}

/// Count of (mastered, total) sections in a chapter.
pub fn chapter_progress(map: &MasteryMap, chapter: &Chapter) -> (usize, usize) {
    let mastered = chapter
        .sections
        .iter()
        .filter(|s| is_mastered(map, &SectionAddress::new(&chapter.id, &s.id)))
        .count();
    (mastered, chapter.sections.len())
}

/// File-backed mastery store.
#[derive(Debug, Clone)]
pub struct MasteryStore {
    path: PathBuf,
}

impl MasteryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted map. Fail-open: a missing file yields empty
    /// progress, and a corrupt file is purged (and logged) so the next
    /// persist starts clean.
    pub fn load(&self) -> MasteryMap {
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "mastery store unreadable, starting with empty progress"
                );
                if let Err(e) = std::fs::remove_file(&self.path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!(error = %e, "failed to purge corrupt mastery store");
                    }
                }
                MasteryMap::new()
            }
        }
    }

    fn try_load(&self) -> Result<MasteryMap, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MasteryMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        let raw: MasteryMap = serde_json::from_str(&content)?;
        // Older records may carry explicit false entries; normalize them away.
        Ok(raw.into_iter().filter(|(_, mastered)| *mastered).collect())
    }

    /// Persist the whole map, overwriting the previous record. Failures are
    /// logged and swallowed: in-memory state stays authoritative.
    pub fn persist(&self, map: &MasteryMap) {
        if let Err(e) = self.try_persist(map) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "failed to persist mastery progress"
            );
        }
    }

    fn try_persist(&self, map: &MasteryMap) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), entries = map.len(), "mastery progress persisted");
        Ok(())
    }
}

/// Mastery map plus its backing store: the unit the CLI and session work with.
#[derive(Debug)]
pub struct MasteryTracker {
    map: MasteryMap,
    store: MasteryStore,
}

impl MasteryTracker {
    /// Open the store and load whatever progress survives.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = MasteryStore::new(path);
        let map = store.load();
        Self { map, store }
    }

    pub fn map(&self) -> &MasteryMap {
        &self.map
    }

    pub fn is_mastered(&self, addr: &SectionAddress) -> bool {
        is_mastered(&self.map, addr)
    }

    /// Toggle a section and write the whole map through to disk.
    pub fn toggle_and_persist(&mut self, addr: &SectionAddress) -> bool {
        toggle(&mut self.map, addr);
        self.store.persist(&self.map);
        self.is_mastered(addr)
    }

    pub fn chapter_status(&self, chapter: &Chapter) -> ChapterStatus {
        chapter_status(&self.map, chapter)
    }

    pub fn chapter_progress(&self, chapter: &Chapter) -> (usize, usize) {
        chapter_progress(&self.map, chapter)
    }

    /// Overall (mastered, total) across the whole curriculum.
    pub fn overall_progress(&self, curriculum: &Curriculum) -> (usize, usize) {
        curriculum
            .chapters
            .iter()
            .map(|c| chapter_progress(&self.map, c))
            .fold((0, 0), |(m, t), (cm, ct)| (m + cm, t + ct))
    }
}
