//! ItemStore interface tests.
//!
//! These tests verify the contract of the ItemStore trait.
//! Each storage implementation should run these tests.

use serde_json::json;
use singletable::storage::{ItemStore, StoreError};
use singletable::{Item, ItemType};

fn sort_keys(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.sort_key.as_str()).collect()
}

// =============================================================================
// ItemStore::query_by_partition tests
// =============================================================================

pub async fn test_query_empty_partition<S: ItemStore>(store: &S) {
    let items = store
        .query_by_partition("test_empty_partition")
        .await
        .expect("query should succeed");
    assert!(items.is_empty(), "unknown partition should be empty");
}

pub async fn test_query_empty_key_rejected<S: ItemStore>(store: &S) {
    let err = store
        .query_by_partition("")
        .await
        .expect_err("empty partition key should fail");
    assert!(
        matches!(err, StoreError::InvalidInput(_)),
        "expected InvalidInput, got {:?}",
        err
    );
}

// =============================================================================
// ItemStore::put tests
// =============================================================================

pub async fn test_put_and_query<S: ItemStore>(store: &S) {
    let item = Item::new(
        "test_put_query",
        "meta",
        ItemType::Parent,
        json!({"name": "order-1"}),
    );

    store.put(item.clone()).await.expect("put should succeed");

    let items = store
        .query_by_partition("test_put_query")
        .await
        .expect("query should succeed");
    assert_eq!(items, vec![item], "should return the stored item");
}

pub async fn test_put_overwrites<S: ItemStore>(store: &S) {
    let pk = "test_put_overwrite";

    store
        .put(Item::new(
            pk,
            "meta",
            ItemType::Parent,
            json!({"v": 1, "old": true}),
        ))
        .await
        .unwrap();
    store
        .put(Item::new(pk, "meta", ItemType::Parent, json!({"v": 2})))
        .await
        .unwrap();

    let items = store.query_by_partition(pk).await.unwrap();
    assert_eq!(items.len(), 1, "same key pair should hold one item");
    assert_eq!(
        items[0].data,
        json!({"v": 2}),
        "second put should fully replace the first"
    );
}

pub async fn test_put_empty_sort_key_rejected<S: ItemStore>(store: &S) {
    let err = store
        .put(Item::new("test_put_empty_sk", "", ItemType::Child, json!(1)))
        .await
        .expect_err("empty sort key should fail");
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let items = store.query_by_partition("test_put_empty_sk").await.unwrap();
    assert!(items.is_empty(), "rejected put should not be stored");
}

// =============================================================================
// Ordering and isolation
// =============================================================================

pub async fn test_sort_key_order<S: ItemStore>(store: &S) {
    let pk = "test_sort_order";

    for sk in ["child#2", "b", "B", "child#10", "a-meta"] {
        store
            .put(Item::new(pk, sk, ItemType::Child, json!(sk)))
            .await
            .unwrap();
    }

    let items = store.query_by_partition(pk).await.unwrap();
    assert_eq!(
        sort_keys(&items),
        vec!["B", "a-meta", "b", "child#10", "child#2"],
        "items should be ordered by sort key, byte-wise ascending"
    );
}

pub async fn test_partition_isolation<S: ItemStore>(store: &S) {
    store
        .put(Item::new("test_iso_a", "meta", ItemType::Parent, json!("a")))
        .await
        .unwrap();
    store
        .put(Item::new("test_iso_ab", "meta", ItemType::Parent, json!("ab")))
        .await
        .unwrap();

    let items = store.query_by_partition("test_iso_a").await.unwrap();
    assert_eq!(items.len(), 1, "prefix partition must not leak");
    assert_eq!(items[0].data, json!("a"));

    let items = store.query_by_partition("test_iso_ab").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].data, json!("ab"));
}

pub async fn test_parent_and_children_share_partition<S: ItemStore>(store: &S) {
    let pk = "test_family";

    store
        .put(Item::new(pk, "child#1", ItemType::Child, json!({"qty": 1})))
        .await
        .unwrap();
    store
        .put(Item::new(pk, "child#2", ItemType::Child, json!({"qty": 2})))
        .await
        .unwrap();
    store
        .put(Item::new(
            pk,
            "a-parent",
            ItemType::Parent,
            json!({"total": 3}),
        ))
        .await
        .unwrap();

    let items = store.query_by_partition(pk).await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.partition_key == pk));
    assert_eq!(sort_keys(&items), vec!["a-parent", "child#1", "child#2"]);
    assert_eq!(items[0].item_type, ItemType::Parent);
    assert_eq!(items[1].item_type, ItemType::Child);
}

pub async fn test_control_characters_in_keys<S: ItemStore>(store: &S) {
    let keys = [
        ("test_ctrl_nul\u{0}pk", "sk\u{0}1"),
        ("test_ctrl_newline\npk", "line\nbreak"),
        ("test_ctrl_backslash\\pk", "back\\slash'quote"),
    ];

    for (pk, sk) in keys {
        store
            .put(Item::new(pk, sk, ItemType::Child, json!(pk)))
            .await
            .unwrap_or_else(|e| panic!("put {:?} should succeed: {:?}", pk, e));

        let items = store
            .query_by_partition(pk)
            .await
            .unwrap_or_else(|e| panic!("query {:?} should succeed: {:?}", pk, e));
        assert_eq!(items.len(), 1, "partition {:?} should hold one item", pk);
        assert_eq!(items[0].partition_key, pk);
        assert_eq!(items[0].sort_key, sk);
        assert_eq!(items[0].data, json!(pk));
    }

    let items = store.query_by_partition("test_ctrl_nul").await.unwrap();
    assert!(items.is_empty(), "key truncated at NUL must not match");
}

// =============================================================================
// Payload fidelity
// =============================================================================

pub async fn test_data_round_trip<S: ItemStore>(store: &S) {
    let pk = "test_data_round_trip";
    let data = json!({
        "name": "widget \"deluxe\"; DROP TABLE items; --",
        "price": 9.75,
        "qty": -3,
        "tags": ["a", "b"],
        "unicode": "héllo 世界",
        "nested": {"active": false, "note": null}
    });

    store
        .put(Item::new(pk, "meta", ItemType::Parent, data.clone()))
        .await
        .unwrap();

    let items = store.query_by_partition(pk).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].data, data, "payload should round-trip verbatim");
}

pub async fn test_item_type_preserved<S: ItemStore>(store: &S) {
    let pk = "test_item_type";

    store
        .put(Item::new(
            pk,
            "note#1",
            ItemType::Other("Note".into()),
            json!(1),
        ))
        .await
        .unwrap();

    let items = store.query_by_partition(pk).await.unwrap();
    assert_eq!(items[0].item_type, ItemType::Other("Note".into()));
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all ItemStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_item_store_tests {
    ($store:expr) => {
        use $crate::storage::item_store_tests::*;

        // query tests
        test_query_empty_partition($store).await;
        println!("  test_query_empty_partition: PASSED");

        test_query_empty_key_rejected($store).await;
        println!("  test_query_empty_key_rejected: PASSED");

        // put tests
        test_put_and_query($store).await;
        println!("  test_put_and_query: PASSED");

        test_put_overwrites($store).await;
        println!("  test_put_overwrites: PASSED");

        test_put_empty_sort_key_rejected($store).await;
        println!("  test_put_empty_sort_key_rejected: PASSED");

        // ordering and isolation tests
        test_sort_key_order($store).await;
        println!("  test_sort_key_order: PASSED");

        test_partition_isolation($store).await;
        println!("  test_partition_isolation: PASSED");

        test_parent_and_children_share_partition($store).await;
        println!("  test_parent_and_children_share_partition: PASSED");

        test_control_characters_in_keys($store).await;
        println!("  test_control_characters_in_keys: PASSED");

        // payload tests
        test_data_round_trip($store).await;
        println!("  test_data_round_trip: PASSED");

        test_item_type_preserved($store).await;
        println!("  test_item_type_preserved: PASSED");
    };
}
