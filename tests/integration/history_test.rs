//! History list tests: day grouping, pagination and search.

use super::{history_record, MemoryStore, DAY, NOW, TODAY};
use request_lists::config::ListConfig;
use request_lists::history::{TODAY_LABEL, YESTERDAY_LABEL};
use request_lists::telemetry::{AnalyticsEvent, RecordingReporter};
use request_lists::utils::FixedClock;
use request_lists::{ListError, ListMode, RequestList, StoreError};
use std::sync::Arc;

fn history_list(store: MemoryStore, page_limit: usize) -> RequestList<MemoryStore> {
    let config = ListConfig {
        page_limit,
        ..ListConfig::default()
    };
    RequestList::with_config(ListMode::History, Arc::new(store), &config)
        .with_clock(Arc::new(FixedClock::at(NOW)))
}

fn group_ids(list: &RequestList<MemoryStore>) -> Vec<Vec<String>> {
    list.history()
        .unwrap()
        .groups()
        .iter()
        .map(|g| g.items.iter().map(|i| i.record.id.clone()).collect())
        .collect()
}

#[tokio::test]
async fn test_two_days_interleaved() {
    let yesterday = TODAY - DAY;
    let store = MemoryStore::new().with_history(vec![
        history_record("y1", yesterday + 1_000, yesterday),
        history_record("t1", TODAY + 1_000, TODAY),
        history_record("y3", yesterday + 3_000, yesterday),
        history_record("t2", TODAY + 2_000, TODAY),
        history_record("y2", yesterday + 2_000, yesterday),
    ]);
    let mut list = history_list(store, 150);

    assert_eq!(list.load_next().await.unwrap(), 5);

    let groups = list.history().unwrap().groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].day_key, TODAY);
    assert_eq!(groups[0].label, TODAY_LABEL);
    assert_eq!(groups[1].day_key, yesterday);
    assert_eq!(groups[1].label, YESTERDAY_LABEL);
    assert_eq!(
        group_ids(&list),
        vec![vec!["t2", "t1"], vec!["y3", "y2", "y1"]]
    );
    assert!(list.take_layout_invalidated());
}

#[tokio::test]
async fn test_older_days_use_long_date() {
    let day = TODAY - 3 * DAY;
    let store = MemoryStore::new().with_history(vec![history_record("old", day + 5_000, day)]);
    let mut list = history_list(store, 150);
    list.load_next().await.unwrap();

    let group = &list.history().unwrap().groups()[0];
    assert_eq!(group.label, "Saturday, November 11, 2023");
    assert!(group.expanded);
}

#[tokio::test]
async fn test_pages_accumulate_across_days() {
    let records = (0..5)
        .map(|i| {
            let midnight = TODAY - i * DAY;
            history_record(&format!("r{}", i), midnight + 60_000, midnight)
        })
        .collect();
    let mut list = history_list(MemoryStore::new().with_history(records), 2);

    assert_eq!(list.load_next().await.unwrap(), 2);
    assert_eq!(list.load_next().await.unwrap(), 2);
    assert_eq!(list.load_next().await.unwrap(), 1);
    assert_eq!(list.load_next().await.unwrap(), 0);

    assert_eq!(list.len(), 5);
    assert_eq!(list.history().unwrap().group_count(), 5);

    let keys: Vec<i64> = list.history().unwrap().groups().iter().map(|g| g.day_key).collect();
    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn test_refresh_starts_from_first_page() {
    let store = MemoryStore::new().with_history(vec![
        history_record("a", TODAY + 1, TODAY),
        history_record("b", TODAY + 2, TODAY),
        history_record("c", TODAY + 3, TODAY),
    ]);
    let mut list = history_list(store, 2);
    list.load_next().await.unwrap();
    list.load_next().await.unwrap();
    assert_eq!(list.len(), 3);

    assert_eq!(list.refresh().await.unwrap(), 2);
    assert_eq!(list.len(), 2);

    let calls = list_calls(&list);
    assert_eq!(calls, vec![None, Some("2".to_string()), None]);
}

fn list_calls(list: &RequestList<MemoryStore>) -> Vec<Option<String>> {
    list.store()
        .list_calls()
        .into_iter()
        .map(|p| p.next_page_token)
        .collect()
}

#[tokio::test]
async fn test_search_replaces_list_and_refresh_restores_it() {
    let store = MemoryStore::new().with_history(vec![
        history_record("users", TODAY + 1, TODAY),
        history_record("orders", TODAY + 2, TODAY),
    ]);
    let reporter = RecordingReporter::new();
    let mut list = history_list(store, 150).with_reporter(Arc::new(reporter.clone()));
    list.load_next().await.unwrap();

    assert_eq!(list.search("_USERS").await.unwrap(), 1);
    assert!(list.is_search());
    assert_eq!(list.ids(), vec!["users"]);

    // Pagination is paused while results are shown.
    assert_eq!(list.load_next().await.unwrap(), 0);

    assert_eq!(list.search("nothing").await.unwrap(), 0);
    assert!(list.search_list_empty());
    assert!(!list.data_unavailable());

    assert_eq!(list.search("").await.unwrap(), 2);
    assert!(!list.is_search());
    assert_eq!(
        reporter.events(),
        vec![
            AnalyticsEvent::search("history"),
            AnalyticsEvent::search("history"),
        ]
    );
}

#[tokio::test]
async fn test_failed_search_leaves_list_empty() {
    let store = MemoryStore::new().with_history(vec![history_record("a", TODAY + 1, TODAY)]);
    let reporter = RecordingReporter::new();
    let mut list = history_list(store, 150).with_reporter(Arc::new(reporter.clone()));
    list.load_next().await.unwrap();

    list.store().set_failing(true);
    let result = list.search("a").await;

    assert!(matches!(
        result,
        Err(ListError::Store(StoreError::Rejected(_)))
    ));
    assert!(list.is_empty());
    assert!(!list.querying());
    assert!(matches!(
        reporter.events().as_slice(),
        [AnalyticsEvent::Exception { fatal: false, .. }]
    ));
}

#[tokio::test]
async fn test_group_expansion() {
    let store = MemoryStore::new().with_history(vec![history_record("a", TODAY + 1, TODAY)]);
    let mut list = history_list(store, 150);
    list.load_next().await.unwrap();
    list.take_layout_invalidated();

    assert_eq!(list.toggle_group_expansion(0), Some(false));
    assert!(list.take_layout_invalidated());
    assert_eq!(list.toggle_group_expansion(0), Some(true));
    assert_eq!(list.toggle_group_expansion(5), None);
}
