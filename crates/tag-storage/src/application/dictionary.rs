//! # Dictionary Mirror
//!
//! A string-to-string dictionary kept in one file on the tag and mirrored
//! in memory.
//!
//! ## Cache Rules
//!
//! - The snapshot is loaded lazily on the first access after a detection.
//! - It is reloaded whenever the UID in the field differs from the UID it
//!   was loaded from.
//! - A failed load or save leaves the mirror unloaded; the next access
//!   reloads from the tag.
//! - Every mutation writes the whole dictionary through before returning.

use std::sync::Arc;

use crate::adapters::sinks::TracingSink;
use crate::application::file_store::FileStore;
use crate::config::TagStorageConfig;
use crate::domain::dictionary::{DictionarySnapshot, Entry};
use crate::domain::errors::{Operation, Result, TagStorageError};
use crate::domain::events::{InvalidationReason, StorageEvent};
use crate::domain::geometry::BLOCK_SIZE;
use crate::domain::value_objects::{FileLabel, Uid};
use crate::ports::inbound::TagDictionaryApi;
use crate::ports::outbound::{EventSink, TagDevice};

#[derive(Clone, Debug, PartialEq, Eq)]
enum MirrorState {
    Unloaded,
    Loaded { uid: Uid },
}

/// Dictionary persisted on a tag.
pub struct DictionaryMirror<D: TagDevice> {
    files: FileStore<D>,
    start_block: u16,
    label: FileLabel,
    detect_attempts: u8,
    snapshot: DictionarySnapshot,
    state: MirrorState,
    last_error: Option<TagStorageError>,
}

impl<D: TagDevice> DictionaryMirror<D> {
    pub fn new(device: D, config: &TagStorageConfig) -> Self {
        Self::with_sink(device, config, Arc::new(TracingSink))
    }

    pub fn with_sink(device: D, config: &TagStorageConfig, sink: Arc<dyn EventSink>) -> Self {
        let dictionary = &config.dictionary;
        Self {
            files: FileStore::with_sink(device, config, sink),
            start_block: dictionary.start_block,
            label: FileLabel::new(&dictionary.label),
            detect_attempts: config.detect_attempts.max(1),
            snapshot: DictionarySnapshot::new(dictionary.initial_pairs, dictionary.growth_pairs),
            state: MirrorState::Unloaded,
            last_error: None,
        }
    }

    pub fn device(&self) -> &D {
        self.files.block_store().device()
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.files.block_store_mut().device_mut()
    }

    pub fn into_device(self) -> D {
        self.files.into_block_store().into_device()
    }

    pub fn start_block(&self) -> u16 {
        self.start_block
    }

    pub fn label(&self) -> &FileLabel {
        &self.label
    }

    /// Whether the snapshot matches the tag it was loaded from.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, MirrorState::Loaded { .. })
    }

    /// UID the snapshot was loaded from.
    pub fn loaded_uid(&self) -> Option<&Uid> {
        match &self.state {
            MirrorState::Loaded { uid } => Some(uid),
            MirrorState::Unloaded => None,
        }
    }

    /// Load failure behind the last `None`/`false` query answer.
    pub fn last_error(&self) -> Option<&TagStorageError> {
        self.last_error.as_ref()
    }

    /// Largest serialized dictionary that fits after the start block.
    pub fn max_space(&self) -> Result<usize> {
        self.space_for(Operation::Capacity)
    }

    fn space_for(&self, op: Operation) -> Result<usize> {
        let tag = self.files.block_store().tag_type(op)?;
        Ok(tag.usable_capacity(self.start_block).saturating_sub(BLOCK_SIZE))
    }

    /// Load the snapshot unless it is already loaded from the tag now in
    /// the field.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if let MirrorState::Loaded { uid } = &self.state {
            if self.device().current_uid().as_ref() == Some(uid) {
                return Ok(());
            }
            self.invalidate(InvalidationReason::UidChanged);
        }
        self.load_dictionary()
    }

    /// Replace the snapshot with the dictionary stored on the tag.
    ///
    /// A tag without a dictionary file loads as empty.
    pub fn load_dictionary(&mut self) -> Result<()> {
        self.state = MirrorState::Unloaded;
        self.snapshot.clear();

        match self.read_snapshot() {
            Ok(uid) => {
                self.state = MirrorState::Loaded { uid };
                self.emit(StorageEvent::DictionaryLoaded {
                    entries: self.snapshot.len(),
                });
                Ok(())
            }
            Err(err) => {
                self.snapshot.clear();
                tracing::warn!(error = %err, "[tag] dictionary load failed");
                self.invalidate(InvalidationReason::Failure);
                Err(err)
            }
        }
    }

    fn read_snapshot(&mut self) -> Result<Uid> {
        let op = Operation::LoadDictionary;
        let uid = self
            .device()
            .current_uid()
            .ok_or(TagStorageError::MediumNotPresent { op })?;
        let capacity = self.space_for(op)?;

        let bytes = match self
            .files
            .read_labelled(op, self.start_block, &self.label, capacity)
        {
            Ok(bytes) => bytes,
            Err(err) if err.is_missing_file() => {
                tracing::debug!(block = self.start_block, "[tag] no dictionary on tag");
                return Ok(uid);
            }
            Err(err) => return Err(err),
        };
        self.snapshot.load_from(&bytes);
        Ok(uid)
    }

    /// Write the whole snapshot through to the tag.
    ///
    /// On failure the mirror is left unloaded so the next access reloads
    /// what is actually on the tag.
    pub fn save_dictionary(&mut self) -> Result<()> {
        match self.write_snapshot() {
            Ok(bytes) => {
                self.emit(StorageEvent::DictionarySaved {
                    entries: self.snapshot.len(),
                    bytes,
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "[tag] dictionary save failed");
                self.invalidate(InvalidationReason::Failure);
                Err(err)
            }
        }
    }

    fn write_snapshot(&mut self) -> Result<usize> {
        let available = self.max_space()?;
        let required = self.snapshot.serialized_len();
        if required > available {
            return Err(TagStorageError::CapacityExceeded {
                required,
                available,
            });
        }
        let bytes = self.snapshot.serialize();
        self.files
            .write_labelled(Operation::SaveDictionary, self.start_block, &self.label, &bytes)?;
        Ok(bytes.len())
    }

    /// Number of entries; same as [`TagDictionaryApi::num_entries`].
    pub fn num_keys(&mut self) -> Option<usize> {
        self.num_entries()
    }

    /// Snapshot entries in insertion order.
    pub fn entries(&mut self) -> Result<impl Iterator<Item = &Entry> + '_> {
        self.ensure_loaded()?;
        Ok(self.snapshot.iter())
    }

    fn loaded(&mut self) -> bool {
        match self.ensure_loaded() {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                self.last_error = Some(err);
                false
            }
        }
    }

    fn invalidate(&mut self, reason: InvalidationReason) {
        if self.is_loaded() {
            self.emit(StorageEvent::DictionaryInvalidated { reason });
        }
        self.state = MirrorState::Unloaded;
    }

    fn emit(&self, event: StorageEvent) {
        self.files.block_store().emit(event);
    }
}

impl<D: TagDevice> TagDictionaryApi for DictionaryMirror<D> {
    fn detect_medium(&mut self) -> Option<Uid> {
        for attempt in 1..=self.detect_attempts {
            if self.device_mut().detect() {
                self.invalidate(InvalidationReason::Detected);
                let uid = self.device().current_uid()?;
                self.emit(StorageEvent::MediumDetected { uid: uid.clone() });
                return Some(uid);
            }
            tracing::trace!(attempt, "[tag] no tag in field");
        }
        None
    }

    fn get(&mut self, key: &str) -> Option<String> {
        if !self.loaded() {
            return None;
        }
        self.snapshot.get(key).map(str::to_owned)
    }

    fn has_key(&mut self, key: &str) -> bool {
        self.loaded() && self.snapshot.find(key).is_some()
    }

    fn key_at(&mut self, index: usize) -> Option<String> {
        if !self.loaded() {
            return None;
        }
        self.snapshot.key_at(index).map(str::to_owned)
    }

    fn num_entries(&mut self) -> Option<usize> {
        self.loaded().then(|| self.snapshot.len())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_loaded()?;
        self.snapshot.set(key, value);
        self.save_dictionary()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.ensure_loaded()?;
        if self.snapshot.remove(key).is_none() {
            return Err(TagStorageError::KeyNotFound {
                key: key.to_owned(),
            });
        }
        self.save_dictionary()
    }

    fn disconnect(&mut self, allow_redetection: bool) {
        self.device_mut().release(allow_redetection);
        self.invalidate(InvalidationReason::Disconnected);
        self.snapshot.clear();
        self.emit(StorageEvent::MediumReleased);
    }
}
