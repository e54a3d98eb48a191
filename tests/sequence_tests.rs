//! Integration tests for paginated collections.
//!
//! These tests cover single-page listing with `ResourcePage`, lazy
//! `Sequence` iteration against a mock list endpoint, first-page sizing,
//! early termination and read-ahead of the next page.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, BoxFuture};
use futures::{FutureExt, StreamExt, TryStreamExt};
use mollie_api::clients::HttpError;
use mollie_api::pagination::{
    Continuation, EnvelopeError, Page, PageLimits, PageQuery, PageRequest, PagedSource, Sequence,
};
use mollie_api::{ApiEndpoint, ApiKey, MollieConfig, RestClient, RestError, RetryPolicy};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_test::{assert_ok, assert_pending};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Payment {
    id: String,
}

fn test_client(server: &MockServer) -> RestClient {
    let config = MollieConfig::builder()
        .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
        .api_endpoint(ApiEndpoint::new(format!("{}/v2", server.uri())).unwrap())
        .retry_policy(RetryPolicy::new(3, Duration::from_millis(10)).unwrap())
        .build()
        .unwrap();
    RestClient::new(&config)
}

/// Builds a payments list envelope with ids `tr_<first>..tr_<first + count>`.
fn payments_page(server: &MockServer, first: usize, count: usize, next_from: Option<usize>) -> Value {
    let payments: Vec<Value> = (first..first + count)
        .map(|n| json!({"resource": "payment", "id": format!("tr_{n}")}))
        .collect();
    let next = next_from.map_or(Value::Null, |from| {
        json!({
            "href": format!("{}/v2/payments?from=tr_{from}&limit={count}", server.uri()),
            "type": "application/hal+json"
        })
    });

    json!({
        "count": count,
        "_embedded": {"payments": payments},
        "_links": {
            "self": {"href": format!("{}/v2/payments", server.uri()), "type": "application/hal+json"},
            "previous": null,
            "next": next
        }
    })
}

fn ids(payments: &[Payment]) -> Vec<String> {
    payments.iter().map(|payment| payment.id.clone()).collect()
}

/// A page source serving `pages` pages of `size` numbers each, counting
/// requests as they are issued.
#[derive(Debug)]
struct CountingSource {
    size: usize,
    pages: usize,
    requests: AtomicUsize,
}

impl CountingSource {
    fn new(size: usize, pages: usize) -> Self {
        Self {
            size,
            pages,
            requests: AtomicUsize::new(0),
        }
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PagedSource for CountingSource {
    fn fetch(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<Value>, RestError>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let index = match request {
            PageRequest::First { .. } => 0,
            PageRequest::Next(next) => next.query()[0].1.parse().unwrap_or(self.pages),
        };
        let start = index * self.size;
        let continuation = (index + 1 < self.pages).then(|| {
            Continuation::parse(&format!("https://api.example.test/v2/numbers?page={}", index + 1))
                .unwrap()
        });
        let page = Page {
            items: (start..start + self.size).map(|n| json!(n)).collect(),
            continuation,
            total_count: self.size,
        };
        future::ready(Ok(page)).boxed()
    }
}

// ============================================================================
// Single Pages
// ============================================================================

#[tokio::test]
async fn test_page_uses_requested_limit_and_follows_next_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "2"))
        .and(query_param("profileId", "pfl_QkEhN94Ba"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 2, Some(2))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 2, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = PageQuery::new().limit(2).param("profileId", "pfl_QkEhN94Ba");
    let first = client
        .page::<Payment>("payments", "payments", query)
        .await
        .unwrap();

    assert_eq!(ids(&first), vec!["tr_0", "tr_1"]);
    assert_eq!(first.total_count(), 2);
    assert!(first.has_next_page());

    let second = assert_ok!(first.next_page().await.unwrap());
    assert_eq!(ids(&second), vec!["tr_2"]);
    assert!(!second.has_next_page());
    assert!(second.next_page().await.is_none());
}

#[tokio::test]
async fn test_next_link_query_is_sent_back_as_received() {
    let server = MockServer::start().await;
    let mut first_page = payments_page(&server, 0, 1, None);
    first_page["_links"]["next"] = json!({
        "href": format!("{}/v2/payments?from=tr_1&limit=1&sort=created%20desc", server.uri()),
        "type": "application/hal+json"
    });
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 1, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let first = client
        .page::<Payment>("payments", "payments", PageQuery::new().limit(1))
        .await
        .unwrap();
    let second = assert_ok!(first.next_page().await.unwrap());

    assert_eq!(ids(&second), vec!["tr_1"]);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[1].url.query(),
        Some("from=tr_1&limit=1&sort=created%20desc")
    );
}

#[tokio::test]
async fn test_page_caps_limit_at_maximum() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .page::<Payment>("payments", "payments", PageQuery::new().limit(1000))
        .await;

    assert_ok!(page);
}

#[tokio::test]
async fn test_page_rejects_body_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "tr_1"})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client
        .page::<Payment>("payments", "payments", PageQuery::new())
        .await;

    assert!(matches!(
        result,
        Err(RestError::Envelope(EnvelopeError::MissingEmbedded))
    ));
}

// ============================================================================
// Lazy Sequences
// ============================================================================

#[tokio::test]
async fn test_take_asks_for_exactly_n_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 5, Some(5))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let payments = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .take(5)
        .collect()
        .await
        .unwrap();

    assert_eq!(payments.len(), 5);
    assert_eq!(payments[4].id, "tr_4");
}

#[tokio::test]
async fn test_drop_then_take_sizes_first_page_by_sum() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "90"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 90, Some(90))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let payments = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .drop(10)
        .take(80)
        .collect()
        .await
        .unwrap();

    assert_eq!(payments.len(), 80);
    assert_eq!(payments[0].id, "tr_10");
    assert_eq!(payments[79].id, "tr_89");
}

#[tokio::test]
async fn test_unbounded_sequence_walks_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "128"))
        .and(query_param("testmode", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 3, Some(3))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 3, 3, Some(6))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 6, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let payments = client
        .list::<Payment>("payments", "payments", PageQuery::new().param("testmode", "true"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(
        ids(&payments),
        vec!["tr_0", "tr_1", "tr_2", "tr_3", "tr_4", "tr_5", "tr_6"]
    );
}

#[tokio::test]
async fn test_filter_and_map_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "128"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 4, Some(4))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 4, 4, None)))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let sequence = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .filter(|payment| payment.id.ends_with('5') || payment.id.ends_with('1'))
        .map(|payment| payment.id)
        .take(2);

    assert_eq!(sequence.first_page_size(), 128);
    assert_eq!(sequence.collect().await.unwrap(), vec!["tr_1", "tr_5"]);
}

#[tokio::test]
async fn test_early_termination_fetches_no_further_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 3, Some(3))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 3, 3, None)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut stream = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .take(3)
        .into_stream();

    let mut seen = Vec::new();
    while let Some(payment) = stream.try_next().await.unwrap() {
        seen.push(payment.id);
    }

    assert_eq!(seen, vec!["tr_0", "tr_1", "tr_2"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stopping_after_one_item_leaves_next_page_unfetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "128"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 3, Some(3))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 3, 3, None)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let sequence = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap();
    assert_eq!(sequence.demand(), mollie_api::Demand::Unbounded);

    // One pull leaves two items buffered, below the low-water mark, with a next link.
    let mut stream = sequence.into_stream();
    let first = stream.try_next().await.unwrap().unwrap();
    drop(stream);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(first.id, "tr_0");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_take_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 1, None)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let payments = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .take(0)
        .collect()
        .await
        .unwrap();

    assert!(payments.is_empty());
}

#[test]
fn test_list_rejects_empty_path() {
    let server_uri = "http://127.0.0.1:1";
    let config = MollieConfig::builder()
        .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
        .api_endpoint(ApiEndpoint::new(server_uri).unwrap())
        .build()
        .unwrap();
    let client = RestClient::new(&config);

    let result = client.list::<Value>("  / ", "payments", PageQuery::new());
    assert!(matches!(result, Err(RestError::InvalidPath { .. })));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_page_error_ends_sequence_after_buffered_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "128"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 2, Some(2))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut stream = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .into_stream();

    assert_ok!(stream.next().await.unwrap());
    assert_ok!(stream.next().await.unwrap());
    match stream.next().await {
        Some(Err(RestError::Http(HttpError::Response(response)))) => {
            assert_eq!(response.code, 500);
        }
        other => panic!("Expected a server error, got {other:?}"),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_item_that_does_not_decode_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "_embedded": {"payments": [{"resource": "payment"}]},
            "_links": {"next": null}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .collect()
        .await;

    assert!(matches!(result, Err(RestError::Deserialize { .. })));
}

// ============================================================================
// Read-Ahead
// ============================================================================

#[tokio::test]
async fn test_next_page_is_requested_before_buffer_runs_dry() {
    let source = Arc::new(CountingSource::new(10, 3));
    let mut stream = Sequence::new(source.clone(), PageLimits::default()).into_stream();

    for _ in 0..5 {
        assert_ok!(stream.next().await.unwrap());
    }
    assert_eq!(source.requests(), 1);

    // The sixth pull resumes with five items buffered, the low-water mark.
    assert_ok!(stream.next().await.unwrap());
    assert_eq!(source.requests(), 2);

    let rest: Vec<Value> = stream.try_collect().await.unwrap();
    assert_eq!(rest.len(), 24);
    assert_eq!(source.requests(), 3);
}

#[tokio::test]
async fn test_bounded_demand_never_reads_ahead_past_it() {
    let source = Arc::new(CountingSource::new(10, 3));
    let items = Sequence::new(source.clone(), PageLimits::default())
        .take(8)
        .collect()
        .await
        .unwrap();

    assert_eq!(items.len(), 8);
    assert_eq!(source.requests(), 1);
}

#[tokio::test]
async fn test_stream_waits_on_slow_page_and_can_be_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("limit", "128"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&server, 0, 2, Some(2))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("from", "tr_2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payments_page(&server, 2, 2, None))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut stream = client
        .list::<Payment>("payments", "payments", PageQuery::new())
        .unwrap()
        .into_stream();

    assert_ok!(stream.next().await.unwrap());
    assert_ok!(stream.next().await.unwrap());
    assert_pending!(futures::poll!(stream.next()));

    drop(stream);
}
