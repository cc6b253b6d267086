//! Paged List Unit Tests
//!
//! Drives `ListView` through the page sources against the in-memory backend:
//! - Server paging of datasets with the default sort
//! - Local sorting and paging of subscribers
//! - Failed fetches keeping the previous rows

use std::sync::Arc;

use crate::core::api::{BaleenApi, SortDirection, SortSpec, Subscriber};
use crate::core::list_view::{DatasetSource, ListView, PageSource, SubscriberSource};
use crate::tests::common::*;

fn dataset_list() -> ListView<crate::core::api::Dataset> {
    ListView::new("datasets", 20, SortSpec::new("createdAt", SortDirection::Desc))
}

// =============================================================================
// Datasets
// =============================================================================

#[tokio::test]
async fn test_first_load_reports_totals() {
    let api = Arc::new(FakeApi::new().with_datasets(datasets(45)));
    let source = DatasetSource::new(api.clone());

    let list = dataset_list();
    let request = list.refresh();
    let list = list.begin_load(request.clone());
    assert!(list.is_loading());

    let list = list.apply_page(source.fetch_page(&request).await.unwrap());
    assert!(!list.is_loading());
    assert_eq!(list.total_elements(), 45);
    assert_eq!(list.total_pages(), 3);
    assert_eq!(list.rows().len(), 20);
    assert_eq!(list.page_label(), "Page 1 of 3 (45 total)");
}

#[tokio::test]
async fn test_next_page_keeps_sort() {
    let api = Arc::new(FakeApi::new().with_datasets(datasets(45)));
    let source = DatasetSource::new(api.clone());

    let mut list = dataset_list();
    let first = list.refresh();
    list = list.apply_page(source.fetch_page(&first).await.unwrap());

    let next = list.next_page().expect("second page exists");
    list = list.begin_load(next.clone());
    list = list.apply_page(source.fetch_page(&next).await.unwrap());

    let requests = api.dataset_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].page, 1);
    assert_eq!(requests[1].size, 20);
    assert_eq!(requests[1].sort, SortSpec::new("createdAt", SortDirection::Desc));
    assert_eq!(list.current_page(), 1);
    assert_eq!(list.rows()[0].id, 21);
}

#[tokio::test]
async fn test_last_page_has_no_next() {
    let api = Arc::new(FakeApi::new().with_datasets(datasets(45)));
    let source = DatasetSource::new(api.clone());

    let list = dataset_list();
    let last = list.refresh().with_page(2);
    let list = list.begin_load(last.clone());
    let list = list.apply_page(source.fetch_page(&last).await.unwrap());

    assert_eq!(list.rows().len(), 5);
    assert!(list.next_page().is_none());
    assert_eq!(list.previous_page().map(|r| r.page), Some(1));
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_rows() {
    let api = Arc::new(FakeApi::new().with_datasets(datasets(45)));
    let source = DatasetSource::new(api.clone());

    let mut list = dataset_list();
    let first = list.refresh();
    list = list.apply_page(source.fetch_page(&first).await.unwrap());

    api.fail_reads_with(Some(404));
    let next = list.next_page().unwrap();
    list = list.begin_load(next.clone());
    let err = source.fetch_page(&next).await.unwrap_err();
    list = list.apply_error(&err);

    assert_eq!(list.rows().len(), 20);
    assert_eq!(list.rows()[0].id, 1);
    assert_eq!(
        list.error(),
        Some("Datasets endpoint not found. The API might not be deployed correctly.")
    );
    assert!(!list.is_loading());
}

#[tokio::test]
async fn test_empty_backend() {
    let api = Arc::new(FakeApi::new());
    let source = DatasetSource::new(api);

    let list = dataset_list();
    let request = list.refresh();
    let list = list.apply_page(source.fetch_page(&request).await.unwrap());

    assert!(list.is_empty());
    assert_eq!(list.total_pages(), 0);
    assert!(list.next_page().is_none());
    assert!(list.selected_row().is_none());
}

// =============================================================================
// Subscribers
// =============================================================================

fn named(n: u32, mrn: &str) -> Subscriber {
    let mut s = subscriber(n);
    s.node_mrn = Some(mrn.to_string());
    s
}

#[tokio::test]
async fn test_subscribers_sorted_locally() {
    let api: Arc<FakeApi> = Arc::new(FakeApi::new().with_subscribers(vec![
        named(1, "urn:mrn:b"),
        named(2, "urn:mrn:c"),
        named(3, "urn:mrn:a"),
    ]));
    let source = SubscriberSource::new(api.clone() as Arc<dyn BaleenApi>);

    let list: ListView<Subscriber> =
        ListView::new("subscribers", 20, SortSpec::new("nodeMrn", SortDirection::Asc));
    let page = source.fetch_page(&list.refresh()).await.unwrap();
    let mrns: Vec<_> = page.content.iter().filter_map(|s| s.node_mrn.clone()).collect();
    assert_eq!(mrns, vec!["urn:mrn:a", "urn:mrn:b", "urn:mrn:c"]);

    let flipped = list.apply_page(page).sort_by("nodeMrn");
    assert_eq!(flipped.sort.direction, SortDirection::Desc);
    let page = source.fetch_page(&flipped).await.unwrap();
    assert_eq!(page.content[0].node_mrn.as_deref(), Some("urn:mrn:c"));
    assert_eq!(api.count(|c| *c == Call::Subscribers), 2);
}

#[tokio::test]
async fn test_subscribers_paged_locally() {
    let api = Arc::new(FakeApi::new().with_subscribers(subscribers(25)));
    let source = SubscriberSource::new(api);

    let list: ListView<Subscriber> =
        ListView::new("subscribers", 10, SortSpec::new("subscriptionStart", SortDirection::Desc));
    let page = source.fetch_page(&list.refresh().with_page(2)).await.unwrap();

    assert_eq!(page.total_elements, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content.len(), 5);
    assert!(page.last);
}
