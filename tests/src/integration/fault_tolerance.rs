//! # Fault Tolerance
//!
//! Injected reader faults: bounded retries recover transient errors, and
//! persistent ones surface as typed errors without corrupting the mirror.

#[cfg(test)]
mod tests {
    use super::super::{fresh_tag, init_test_logging};
    use std::sync::Arc;
    use tag_storage::{
        Block, BlockStore, DeviceError, DictionaryMirror, ErrorKind, FileStore, InMemoryTag,
        Operation, RecordingSink, SectorKey, StorageEvent, TagDevice, TagDictionaryApi,
        TagFileApi, TagStorageConfig, TagStorageError, TagType, Uid,
    };

    const UID: [u8; 4] = [0xC0, 0xFF, 0xEE, 0x01];

    /// Reader that loses the tag after a number of block writes.
    struct LeavesFieldAfter {
        tag: InMemoryTag,
        writes_left: usize,
    }

    impl TagDevice for LeavesFieldAfter {
        fn detect(&mut self) -> bool {
            self.tag.detect()
        }

        fn current_uid(&self) -> Option<Uid> {
            self.tag.current_uid()
        }

        fn tag_type(&self) -> Option<TagType> {
            self.tag.tag_type()
        }

        fn authenticate_sector(&mut self, sector: u8, key: &SectorKey) -> Result<(), DeviceError> {
            self.tag.authenticate_sector(sector, key)
        }

        fn read_block(&mut self, block: u16) -> Result<Block, DeviceError> {
            self.tag.read_block(block)
        }

        fn write_block(&mut self, block: u16, data: &Block) -> Result<(), DeviceError> {
            if self.writes_left == 0 {
                self.tag.remove();
            } else {
                self.writes_left -= 1;
            }
            self.tag.write_block(block, data)
        }

        fn release(&mut self, allow_redetection: bool) {
            self.tag.release(allow_redetection)
        }
    }

    #[test]
    fn test_transient_faults_absorbed_by_retries() {
        init_test_logging();
        let sink = RecordingSink::new();
        let mut files = FileStore::with_sink(
            fresh_tag(TagType::Classic1K, UID),
            &TagStorageConfig::default(),
            Arc::new(sink.clone()),
        );
        {
            let faults = files.block_store_mut().device_mut().faults_mut();
            faults.auth_failures = 3;
            faults.write_failures = 2;
            faults.corrupt_writes = 1;
        }

        let data = vec![0x42; 100];
        files.write_file(4, &"retry".into(), &data).unwrap();

        files.block_store_mut().device_mut().faults_mut().read_failures = 4;
        assert_eq!(files.read_file(4, &"retry".into(), 100).unwrap(), data);
        assert!(sink.count(|e| matches!(e, StorageEvent::BlockRetry { .. })) >= 4);
    }

    #[test]
    fn test_single_attempt_config_surfaces_first_fault() {
        let mut blocks = BlockStore::new(
            fresh_tag(TagType::Classic1K, UID),
            &TagStorageConfig::for_testing(),
        );
        blocks.device_mut().faults_mut().write_failures = 1;

        let err = blocks.write_extent(4, b"once").unwrap_err();
        assert!(matches!(
            err,
            TagStorageError::BlockWriteFailure {
                op: Operation::WriteExtent,
                block: 4,
                attempts: 1,
                source: DeviceError::Transport(_),
            }
        ));
    }

    #[test]
    fn test_wrong_configured_key() {
        let tag = fresh_tag(TagType::Classic1K, UID).with_key(SectorKey([0xA0; 6]));
        let mut mirror = DictionaryMirror::new(tag, &TagStorageConfig::default());

        assert_eq!(mirror.get("k"), None);
        assert_eq!(
            mirror.last_error().map(TagStorageError::kind),
            Some(ErrorKind::AuthenticationFailure)
        );

        let keyed = TagStorageConfig::default().with_key_a(SectorKey([0xA0; 6]));
        let mut mirror = DictionaryMirror::new(mirror.into_device(), &keyed);
        mirror.set("k", "v").unwrap();
        assert_eq!(mirror.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_tag_leaving_field_mid_save() {
        let device = LeavesFieldAfter {
            tag: fresh_tag(TagType::Classic1K, UID),
            writes_left: usize::MAX,
        };
        let mut mirror = DictionaryMirror::new(device, &TagStorageConfig::default());
        mirror.set("stable", "yes").unwrap();

        // header write succeeds, the tag is gone for the payload
        mirror.device_mut().writes_left = 1;
        let err = mirror.set("lost", &"x".repeat(40)).unwrap_err();
        assert!(matches!(
            err,
            TagStorageError::BlockWriteFailure {
                op: Operation::SaveDictionary,
                block: 2,
                source: DeviceError::NotPresent,
                ..
            }
        ));
        assert!(!mirror.is_loaded());

        mirror.device_mut().writes_left = usize::MAX;
        mirror.device_mut().tag.insert();
        assert!(mirror.detect_medium().is_some());

        // the header was rewritten with the new size, the payload is stale
        assert!(mirror.num_entries().is_some());
        mirror.set("stable", "again").unwrap();
        assert_eq!(mirror.get("stable").as_deref(), Some("again"));
    }

    #[test]
    fn test_boxed_reader() {
        let device: Box<dyn TagDevice> = Box::new(fresh_tag(TagType::Mini, UID));
        let mut mirror = DictionaryMirror::new(device, &TagStorageConfig::default());
        mirror.set("boxed", "ok").unwrap();
        assert_eq!(mirror.get("boxed").as_deref(), Some("ok"));
        assert_eq!(mirror.max_space().unwrap(), 208);
    }

    #[test]
    fn test_failed_remove_keeps_tag_contents() {
        let mut mirror = DictionaryMirror::new(
            fresh_tag(TagType::Classic1K, UID),
            &TagStorageConfig::default(),
        );
        mirror.set("a", "1").unwrap();
        mirror.set("b", "2").unwrap();

        mirror.device_mut().faults_mut().auth_failures = 5;
        let err = mirror.remove("a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);

        // the snapshot dropped "a" but the tag did not; the reload wins
        assert!(mirror.has_key("a"));
        assert_eq!(mirror.num_entries(), Some(2));
    }
}
