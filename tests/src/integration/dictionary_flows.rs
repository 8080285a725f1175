//! # Dictionary Flows
//!
//! `DictionaryMirror` over complete tag lifecycles.
//!
//! ## Flows Tested:
//!
//! 1. **Blank tag**: empty dictionary without error
//! 2. **Dictionary laws**: set/get, overwrite, removal order
//! 3. **Tag swaps**: the snapshot follows the tag in the field
//! 4. **Capacity**: the dictionary never outgrows its space
//! 5. **Persistence**: a second mirror reads what the first wrote

#[cfg(test)]
mod tests {
    use super::super::{fresh_tag, init_test_logging};
    use proptest::prelude::*;
    use std::sync::Arc;
    use tag_storage::{
        DictionaryMirror, ErrorKind, FileStore, InMemoryTag, InvalidationReason, RecordingSink,
        StorageEvent, TagDictionaryApi, TagFileApi, TagStorageConfig, TagStorageError, TagType,
        Uid, DICTIONARY_LABEL,
    };

    const UID_A: [u8; 4] = [0x11, 0x22, 0x33, 0x44];
    const UID_B: [u8; 4] = [0x55, 0x66, 0x77, 0x88];

    fn detected(tag: InMemoryTag) -> DictionaryMirror<InMemoryTag> {
        let mut mirror = DictionaryMirror::new(tag, &TagStorageConfig::default());
        assert!(mirror.detect_medium().is_some());
        mirror
    }

    fn keys(mirror: &mut DictionaryMirror<InMemoryTag>) -> Vec<String> {
        (0..mirror.num_entries().unwrap())
            .filter_map(|i| mirror.key_at(i))
            .collect()
    }

    // =========================================================================
    // BLANK TAG
    // =========================================================================

    #[test]
    fn test_blank_tag_is_empty_dictionary() {
        init_test_logging();
        let mut tag = fresh_tag(TagType::Classic1K, UID_A);
        {
            let mut files = FileStore::new(&mut tag, &TagStorageConfig::default());
            assert!(!files.exists_file(1, &DICTIONARY_LABEL.into()));
        }

        let mut mirror = detected(tag);
        assert_eq!(mirror.get("missing"), None);
        assert!(mirror.last_error().is_none());
        assert_eq!(mirror.num_entries(), Some(0));
    }

    #[test]
    fn test_max_space_is_capacity_minus_header() {
        let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
        assert_eq!(mirror.max_space().unwrap(), 752 - 16);

        let mut mini = detected(fresh_tag(TagType::Mini, UID_A));
        assert_eq!(mini.max_space().unwrap(), 224 - 16);

        let mut large = detected(fresh_tag(TagType::Classic4K, UID_A));
        assert_eq!(large.max_space().unwrap(), 3440 - 16);
    }

    // =========================================================================
    // DICTIONARY LAWS
    // =========================================================================

    #[test]
    fn test_removal_preserves_order() {
        let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
        for (k, v) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
            mirror.set(k, v).unwrap();
        }

        mirror.remove("b").unwrap();
        assert_eq!(keys(&mut mirror), vec!["a", "c", "d"]);

        mirror.set("b", "5").unwrap();
        mirror.set("a", "6").unwrap();
        assert_eq!(keys(&mut mirror), vec!["a", "c", "d", "b"]);
        assert_eq!(mirror.get("a").as_deref(), Some("6"));
    }

    #[test]
    fn test_empty_keys_and_values() {
        let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
        mirror.set("", "empty key").unwrap();
        mirror.set("empty value", "").unwrap();

        let mut reread = detected(mirror.into_device());
        assert_eq!(reread.get("").as_deref(), Some("empty key"));
        assert_eq!(reread.get("empty value").as_deref(), Some(""));
        assert_eq!(reread.num_entries(), Some(2));
    }

    #[test]
    fn test_many_entries_grow_snapshot() {
        let mut mirror = detected(fresh_tag(TagType::Classic4K, UID_A));
        for i in 0..40 {
            mirror.set(&format!("k{i}"), &format!("v{i}")).unwrap();
        }
        assert_eq!(mirror.num_entries(), Some(40));

        let mut reread = detected(mirror.into_device());
        assert_eq!(reread.get("k39").as_deref(), Some("v39"));
        assert_eq!(reread.key_at(0).as_deref(), Some("k0"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_set_then_get(key in "[a-z]{1,8}", v1 in "[ -~]{0,16}", v2 in "[ -~]{0,16}") {
            let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
            mirror.set("anchor", "x").unwrap();

            mirror.set(&key, &v1).unwrap();
            prop_assert_eq!(mirror.get(&key), Some(v1));
            let count = mirror.num_entries();

            mirror.set(&key, &v2).unwrap();
            prop_assert_eq!(mirror.get(&key), Some(v2));
            prop_assert_eq!(mirror.num_entries(), count);
        }

        #[test]
        fn prop_remove_law(
            entries in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
            for (k, v) in &entries {
                mirror.set(k, v).unwrap();
            }
            let before = keys(&mut mirror);
            let victim = before[pick.index(before.len())].clone();

            mirror.remove(&victim).unwrap();

            prop_assert!(!mirror.has_key(&victim));
            prop_assert_eq!(mirror.num_entries(), Some(before.len() - 1));
            let expected: Vec<String> = before.into_iter().filter(|k| *k != victim).collect();
            prop_assert_eq!(keys(&mut mirror), expected);
        }
    }

    // =========================================================================
    // TAG SWAPS
    // =========================================================================

    #[test]
    fn test_swapped_tag_forces_reload() {
        let sink = RecordingSink::new();
        let mut mirror = DictionaryMirror::with_sink(
            fresh_tag(TagType::Classic1K, UID_A),
            &TagStorageConfig::default(),
            Arc::new(sink.clone()),
        );
        mirror.set("owner", "alice").unwrap();

        let mut other = fresh_tag(TagType::Classic1K, UID_B);
        {
            let mut seed = DictionaryMirror::new(&mut other, &TagStorageConfig::default());
            seed.set("owner", "bob").unwrap();
        }

        std::mem::swap(mirror.device_mut(), &mut other);
        assert_eq!(mirror.get("owner").as_deref(), Some("bob"));
        assert_eq!(mirror.loaded_uid(), Some(&Uid::new(UID_B.to_vec())));
        assert!(sink.events().contains(&StorageEvent::DictionaryInvalidated {
            reason: InvalidationReason::UidChanged
        }));

        std::mem::swap(mirror.device_mut(), &mut other);
        assert_eq!(mirror.get("owner").as_deref(), Some("alice"));
    }

    #[test]
    fn test_redetection_reloads_lazily() {
        let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
        mirror.set("n", "1").unwrap();
        assert!(mirror.is_loaded());

        assert_eq!(mirror.detect_medium(), Some(Uid::new(UID_A.to_vec())));
        assert!(!mirror.is_loaded());
        assert_eq!(mirror.get("n").as_deref(), Some("1"));
        assert!(mirror.is_loaded());
    }

    #[test]
    fn test_disconnect_then_field_cycle() {
        let mut mirror = detected(fresh_tag(TagType::Classic1K, UID_A));
        mirror.set("n", "1").unwrap();

        mirror.disconnect(false);
        assert!(!mirror.is_loaded());
        assert_eq!(mirror.num_entries(), None);
        assert_eq!(
            mirror.last_error().map(TagStorageError::kind),
            Some(ErrorKind::MediumNotPresent)
        );

        mirror.device_mut().remove();
        mirror.device_mut().insert();
        assert!(mirror.detect_medium().is_some());
        assert_eq!(mirror.get("n").as_deref(), Some("1"));
    }

    // =========================================================================
    // CAPACITY
    // =========================================================================

    #[test]
    fn test_filling_the_tag_until_capacity_exceeded() {
        let mut mirror = detected(fresh_tag(TagType::Mini, UID_A));
        let max_space = mirror.max_space().unwrap();

        let mut stored = 0;
        let err = loop {
            // 4 + 1 + 10 + 1 = 16 bytes per entry
            match mirror.set(&format!("k{stored:03}"), "0123456789") {
                Ok(()) => stored += 1,
                Err(err) => break err,
            }
        };

        assert_eq!(stored, max_space / 16);
        assert!(matches!(err, TagStorageError::CapacityExceeded { .. }));
        assert!(!mirror.is_loaded());
        assert_eq!(mirror.num_entries(), Some(stored));
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    #[test]
    fn test_second_mirror_reads_first_mirrors_writes() {
        let mut tag = fresh_tag(TagType::Classic1K, UID_A);
        {
            let mut writer = DictionaryMirror::new(&mut tag, &TagStorageConfig::default());
            writer.set("ssid", "home").unwrap();
            writer.set("channel", "6").unwrap();
            writer.remove("ssid").unwrap();
        }

        {
            let mut files = FileStore::new(&mut tag, &TagStorageConfig::default());
            assert_eq!(
                files.read_file(1, &DICTIONARY_LABEL.into(), 64).unwrap(),
                b"channel\n6\n".to_vec()
            );
        }

        let mut reader = DictionaryMirror::new(tag, &TagStorageConfig::default());
        assert_eq!(reader.get("channel").as_deref(), Some("6"));
        assert!(!reader.has_key("ssid"));
    }

    #[test]
    fn test_separate_dictionaries_on_one_tag() {
        let mut tag = fresh_tag(TagType::Classic4K, UID_A);
        let low = TagStorageConfig::default();
        let high = TagStorageConfig::default()
            .with_dictionary_start(128)
            .with_dictionary_label("settings");

        DictionaryMirror::new(&mut tag, &low).set("who", "low").unwrap();
        DictionaryMirror::new(&mut tag, &high).set("who", "high").unwrap();

        assert_eq!(
            DictionaryMirror::new(&mut tag, &low).get("who").as_deref(),
            Some("low")
        );
        assert_eq!(
            DictionaryMirror::new(&mut tag, &high).get("who").as_deref(),
            Some("high")
        );
    }
}
