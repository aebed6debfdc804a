//! Tests for preset persistence.

use tempfile::TempDir;

use crate::filter::{match_sequence_to_preset_name, validate_pattern};
use crate::preset::mock::MockPresetStore;
use crate::preset::{
    FilePresetStore, LoadResult, Preset, PresetError, PresetStore, default_presets,
    find_by_name_or_id, name_pattern_pairs,
};

fn temp_store() -> (TempDir, FilePresetStore) {
    let dir = TempDir::new().unwrap();
    let store = FilePresetStore::new(dir.path().join("presets.json"));
    (dir, store)
}

mod defaults {
    use super::*;

    #[test]
    fn all_defaults_are_marked_default() {
        assert!(default_presets().iter().all(|p| p.is_default));
    }

    #[test]
    fn all_default_patterns_compile() {
        for preset in default_presets() {
            assert!(validate_pattern(&preset.pattern), "{}", preset.name);
        }
    }

    #[test]
    fn default_ids_are_unique() {
        let presets = default_presets();
        let mut ids: Vec<_> = presets.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), presets.len());
    }
}

mod preset_record {
    use super::*;

    #[test]
    fn serializes_in_camel_case() {
        let preset = Preset::new("p1", "HD", "1080p").with_description("hd only");
        let json = serde_json::to_value(&preset).unwrap();

        assert_eq!(json["isDefault"], false);
        assert_eq!(json["description"], "hd only");
    }

    #[test]
    fn description_is_optional_on_read() {
        let preset: Preset =
            serde_json::from_str(r#"{"id":"a","name":"A","pattern":"x"}"#).unwrap();
        assert!(!preset.is_default);
        assert!(preset.description.is_none());
    }

    #[test]
    fn custom_generates_prefixed_id() {
        let preset = Preset::custom("Mine", "x264");
        assert!(preset.id.starts_with("custom-"));
        assert!(!preset.is_default);
    }

    #[test]
    fn name_pattern_pairs_feed_sequence_matching() {
        let presets = vec![Preset::new("a", "HD", "1080p.*")];
        let name = match_sequence_to_preset_name(&["1080p.*"], name_pattern_pairs(&presets));
        assert_eq!(name, Some("HD"));
    }

    #[test]
    fn find_by_name_then_id() {
        let presets = vec![Preset::new("id-1", "HD", "1080p"), Preset::new("HD", "Other", "x")];
        assert_eq!(find_by_name_or_id(&presets, "HD").unwrap().id, "id-1");
        assert_eq!(find_by_name_or_id(&presets, "id-1").unwrap().name, "HD");
        assert!(find_by_name_or_id(&presets, "missing").is_none());
    }
}

mod load_result {
    use super::*;

    #[test]
    fn not_found_falls_back_to_defaults() {
        assert_eq!(LoadResult::NotFound.into_presets(), default_presets());
    }

    #[test]
    fn corrupted_falls_back_to_defaults() {
        let result = LoadResult::Corrupted {
            reason: "bad".to_string(),
        };
        assert!(!result.is_loaded());
        assert_eq!(result.into_presets(), default_presets());
    }

    #[test]
    fn loaded_returns_stored_presets() {
        let presets = vec![Preset::new("a", "A", "x")];
        let result = LoadResult::Loaded(presets.clone());
        assert!(result.is_loaded());
        assert_eq!(result.into_presets(), presets);
    }
}

mod file_store {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load(), LoadResult::NotFound));
        assert_eq!(store.list(), default_presets());
    }

    #[test]
    fn invalid_json_is_corrupted() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "not json").unwrap();

        match store.load() {
            LoadResult::Corrupted { reason } => assert!(reason.contains("Invalid JSON")),
            other => panic!("expected Corrupted, got {other:?}"),
        }
    }

    #[test]
    fn wrong_version_is_corrupted() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), r#"{"version":99,"presets":[]}"#).unwrap();

        match store.load() {
            LoadResult::Corrupted { reason } => assert!(reason.contains("Incompatible version")),
            other => panic!("expected Corrupted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_adds_custom_preset_after_defaults() {
        let (_dir, store) = temp_store();

        let presets = store.save(Preset::new("mine", "Mine", "x265")).await.unwrap();

        assert_eq!(presets.len(), default_presets().len() + 1);
        assert_eq!(presets.last().unwrap().id, "mine");
        assert!(store.load().is_loaded());
        assert_eq!(store.list(), presets);
    }

    #[tokio::test]
    async fn save_replaces_existing_custom_preset() {
        let (_dir, store) = temp_store();
        store.save(Preset::new("mine", "Mine", "x265")).await.unwrap();

        let presets = store.save(Preset::new("mine", "Renamed", "hevc")).await.unwrap();

        let mine: Vec<_> = presets.iter().filter(|p| p.id == "mine").collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Renamed");
        assert_eq!(mine[0].pattern, "hevc");
    }

    #[tokio::test]
    async fn save_cannot_mark_preset_default() {
        let (_dir, store) = temp_store();
        let mut preset = Preset::new("mine", "Mine", "x");
        preset.is_default = true;

        let presets = store.save(preset).await.unwrap();
        assert!(!presets.iter().find(|p| p.id == "mine").unwrap().is_default);
    }

    #[tokio::test]
    async fn save_rejects_overwriting_default() {
        let (_dir, store) = temp_store();
        let id = default_presets()[0].id.clone();

        let result = store.save(Preset::new(id, "Hijacked", "x")).await;

        assert!(matches!(result, Err(PresetError::ReadOnlyDefault(_))));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn delete_removes_custom_preset() {
        let (_dir, store) = temp_store();
        store.save(Preset::new("mine", "Mine", "x")).await.unwrap();

        let presets = store.delete("mine").await.unwrap();

        assert_eq!(presets, default_presets());
        assert_eq!(store.list(), default_presets());
    }

    #[tokio::test]
    async fn delete_rejects_default() {
        let (_dir, store) = temp_store();
        let id = default_presets()[0].id.clone();

        let result = store.delete(&id).await;
        assert!(matches!(result, Err(PresetError::ReadOnlyDefault(ref d)) if *d == id));
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let (_dir, store) = temp_store();
        let result = store.delete("nope").await;
        assert!(matches!(result, Err(PresetError::NotFound(_))));
    }

    #[tokio::test]
    async fn corrupted_file_is_replaced_on_save() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "garbage").unwrap();

        store.save(Preset::new("mine", "Mine", "x")).await.unwrap();

        assert!(store.load().is_loaded());
        assert_eq!(store.list().len(), default_presets().len() + 1);
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FilePresetStore::new(dir.path().join("nested/deeper/presets.json"));

        store.save(Preset::new("mine", "Mine", "x")).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let (dir, store) = temp_store();
        store.save(Preset::new("mine", "Mine", "x")).await.unwrap();
        assert!(!dir.path().join("presets.json.tmp").exists());
    }
}

mod mock_store {
    use super::*;

    #[tokio::test]
    async fn mock_enforces_same_rules() {
        let store = MockPresetStore::with_defaults();
        let id = default_presets()[0].id.clone();

        assert!(store.delete(&id).await.is_err());
        let presets = store.save(Preset::new("m", "M", "x")).await.unwrap();
        assert_eq!(presets.len(), default_presets().len() + 1);
    }
}
