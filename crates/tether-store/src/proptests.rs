use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{Category, HookStore, StoreConfig};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn record() -> impl Strategy<Value = BTreeMap<String, Vec<i64>>> {
    prop::collection::btree_map("[a-z]{1,8}", prop::collection::vec(any::<i64>(), 0..6), 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn read_returns_what_was_written(value in record()) {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let back = rt.block_on(async {
            let store = HookStore::open(dir.path(), StoreConfig::default()).await.unwrap();
            store.write(&Category::Snapshots, "state.json", &value).await.unwrap();
            store
                .read::<BTreeMap<String, Vec<i64>>>(&Category::Snapshots, "state.json")
                .await
                .unwrap()
        });
        prop_assert_eq!(back, Some(value));
    }

    /// A crash at any byte of an in-flight write leaves the committed record
    /// readable and unchanged.
    #[test]
    fn crash_mid_write_never_exposes_partial_record(
        old in record(),
        new in record(),
        cut in 0.0f64..1.0,
    ) {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let back = rt.block_on(async {
            let store = HookStore::open(dir.path(), StoreConfig::default()).await.unwrap();
            store.write(&Category::Scenes, "level.json", &old).await.unwrap();

            let encoded = serde_json::to_vec(&new).unwrap();
            let offset = (encoded.len() as f64 * cut) as usize;
            let temp = dir.path().join("scenes").join(".level.json.crashed.tmp");
            std::fs::write(&temp, &encoded[..offset]).unwrap();

            store
                .read::<BTreeMap<String, Vec<i64>>>(&Category::Scenes, "level.json")
                .await
                .unwrap()
        });
        prop_assert_eq!(back, Some(old));
    }
}
