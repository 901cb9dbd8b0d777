//! Saved list tests: ordering, write-through and delete with undo.

use super::{saved_record, MemoryStore};
use request_lists::config::ListConfig;
use request_lists::{
    ListMode, NavigationTarget, RequestList, StoreClient, StoreKind, UpdateOutcome,
};
use std::sync::Arc;

fn saved_list(store: MemoryStore) -> RequestList<MemoryStore> {
    let config = ListConfig {
        selectable: true,
        ..ListConfig::default()
    };
    RequestList::with_config(ListMode::Saved, Arc::new(store), &config)
}

fn names(list: &RequestList<MemoryStore>) -> Vec<Option<String>> {
    list.requests()
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect()
}

#[tokio::test]
async fn test_unnamed_record_sorts_first() {
    let store = MemoryStore::new().with_saved(vec![
        saved_record("1", Some("b")),
        saved_record("2", None),
        saved_record("3", Some("a")),
    ]);
    let mut list = saved_list(store);
    list.load_next().await.unwrap();

    assert_eq!(
        names(&list),
        vec![None, Some("a".to_string()), Some("b".to_string())]
    );
}

#[tokio::test]
async fn test_store_internal_documents_are_hidden() {
    let store = MemoryStore::new().with_saved(vec![
        saved_record("_design/by-name", Some("index")),
        saved_record("1", Some("users")),
    ]);
    let mut list = saved_list(store);

    assert_eq!(list.load_next().await.unwrap(), 1);
    assert_eq!(list.ids(), vec!["1"]);
}

#[tokio::test]
async fn test_sorting_spans_pages() {
    let store = MemoryStore::new().with_saved(vec![
        saved_record("1", Some("delta")),
        saved_record("2", Some("Charlie")),
        saved_record("3", Some("bravo")),
        saved_record("4", Some("alpha")),
    ]);
    let config = ListConfig {
        page_limit: 2,
        ..ListConfig::default()
    };
    let mut list = RequestList::with_config(ListMode::Saved, Arc::new(store), &config);
    list.load_next().await.unwrap();
    list.load_next().await.unwrap();

    assert_eq!(list.ids(), vec!["4", "3", "2", "1"]);
}

#[tokio::test]
async fn test_update_through_store_replaces_in_place() {
    let store = MemoryStore::new().with_saved(vec![
        saved_record("1", Some("a")),
        saved_record("2", Some("b")),
    ]);
    let mut list = saved_list(store);
    let bus = list.store().bus().clone();
    list.attach(&bus).await.unwrap();
    assert_eq!(list.len(), 2);

    let renamed = saved_record("1", Some("z"));
    list.update_request(renamed).await.unwrap();
    assert_eq!(list.drain_notifications().await.unwrap(), 1);

    // Position is kept; only a reload re-sorts.
    assert_eq!(list.ids(), vec!["1", "2"]);
    assert_eq!(list.requests().unwrap()[0].name.as_deref(), Some("z"));
}

#[tokio::test]
async fn test_new_record_is_inserted_at_head() {
    let store = MemoryStore::new().with_saved(vec![saved_record("1", Some("a"))]);
    let mut list = saved_list(store);
    list.load_next().await.unwrap();

    let outcome = list.apply_update(saved_record("2", Some("b")));
    assert_eq!(outcome, UpdateOutcome::Inserted);
    assert_eq!(list.ids(), vec!["2", "1"]);
}

#[tokio::test]
async fn test_delete_selected_and_undo() {
    let store = MemoryStore::new().with_saved(vec![
        saved_record("1", Some("a")),
        saved_record("2", Some("b")),
        saved_record("3", Some("c")),
    ]);
    let mut list = saved_list(store);
    let bus = list.store().bus().clone();
    list.attach(&bus).await.unwrap();

    assert!(list.toggle_selection("1"));
    assert!(list.toggle_selection("3"));
    assert_eq!(list.delete_selected().await.unwrap(), 2);
    assert_eq!(list.ids(), vec!["2"]);
    assert!(list.selection().is_empty());

    // The store's own delete notifications find nothing left to remove.
    assert_eq!(list.drain_notifications().await.unwrap(), 2);
    assert_eq!(list.ids(), vec!["2"]);

    assert_eq!(list.undo_delete().await.unwrap(), 2);
    assert_eq!(list.ids(), vec!["1", "2", "3"]);
    assert!(!list.can_undo());
}

#[tokio::test]
async fn test_failed_undo_can_be_retried() {
    let store = MemoryStore::new().with_saved(vec![saved_record("1", Some("a"))]);
    let mut list = saved_list(store);
    list.load_next().await.unwrap();
    list.select("1");
    list.delete_selected().await.unwrap();

    list.store().set_failing(true);
    assert!(list.undo_delete().await.is_err());
    assert!(list.can_undo());

    list.store().set_failing(false);
    assert_eq!(list.undo_delete().await.unwrap(), 1);
    assert_eq!(list.ids(), vec!["1"]);
}

#[tokio::test]
async fn test_selection_requires_selectable_lists() {
    let store = MemoryStore::new().with_saved(vec![saved_record("1", Some("a"))]);
    let mut list = RequestList::with_config(
        ListMode::Saved,
        Arc::new(store),
        &ListConfig::default(),
    );
    list.load_next().await.unwrap();

    assert!(!list.select("1"));
    assert!(!list.toggle_select_all());
    assert_eq!(list.delete_selected().await.unwrap(), 0);
}

#[tokio::test]
async fn test_bulk_update_and_navigation() {
    let store = MemoryStore::new();
    let list = saved_list(store);

    let changes = list
        .update_bulk(vec![saved_record("1", Some("a")), saved_record("2", Some("b"))])
        .await
        .unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(
        list.store().read(StoreKind::Saved, "2").await.unwrap().name.as_deref(),
        Some("b")
    );

    assert_eq!(
        list.open_request("2"),
        NavigationTarget {
            kind: StoreKind::Saved,
            id: "2".to_string(),
        }
    );
}
