//! Behavior-driven tests for error classification
//!
//! Validation failures and upstream failures must stay distinguishable all
//! the way to the caller, and upstream text must survive unchanged.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use barlink_core::{
    Bar, BarQuery, BarRequest, BarRow, BarService, BarTable, DataProvider, FetchError, Interval,
    ProviderError, ProviderErrorKind, ProviderId, UtcDateTime, ValidationError,
};

struct FailingProvider {
    error: ProviderError,
    calls: AtomicUsize,
}

impl DataProvider for FailingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Alpaca
    }

    fn get_bars<'a>(
        &'a self,
        _req: &'a BarRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarTable, ProviderError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

struct UntaggedProvider;

impl DataProvider for UntaggedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Alpaca
    }

    fn get_bars<'a>(
        &'a self,
        _req: &'a BarRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarTable, ProviderError>> + Send + 'a>> {
        let timestamp = UtcDateTime::parse("2024-03-01T00:00:00Z").expect("valid timestamp");
        let row = BarRow::untagged(Bar::new(timestamp, 1.0, 1.0, 1.0, 1.0, 1));
        Box::pin(async move { Ok(BarTable::new(vec![row])) })
    }
}

fn failing(error: ProviderError) -> Arc<FailingProvider> {
    Arc::new(FailingProvider {
        error,
        calls: AtomicUsize::new(0),
    })
}

// =============================================================================
// Upstream failures
// =============================================================================

#[tokio::test]
async fn when_provider_fails_message_is_carried_verbatim() {
    // Given: A provider failing with vendor text
    let vendor_text = "invalid timeframe: 7Min is not supported for this feed";
    let provider = failing(ProviderError::from_status(ProviderId::Alpaca, 422, vendor_text));
    let service = BarService::new(provider.clone());

    // When: Bars are fetched
    let error = service
        .fetch_bars(&BarQuery::new("AAPL", "7Min"))
        .await
        .expect_err("provider failure must surface");

    // Then: It is an upstream error containing the vendor text
    assert!(matches!(error, FetchError::Upstream(_)));
    assert_eq!(error.code(), "upstream_error");
    assert!(error.to_string().contains(vendor_text));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rate_limit_keeps_its_status() {
    let provider = failing(ProviderError::from_status(
        ProviderId::Alpaca,
        429,
        "too many requests",
    ));
    let service = BarService::new(provider);

    let error = service
        .fetch_bars(&BarQuery::new("AAPL,MSFT", "1Min"))
        .await
        .expect_err("throttled");

    match error {
        FetchError::Upstream(upstream) => {
            assert_eq!(upstream.kind(), ProviderErrorKind::RateLimited);
            assert_eq!(upstream.status(), Some(429));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn untagged_rows_for_several_symbols_are_an_upstream_error() {
    // Given: A provider that drops symbol tags
    let service = BarService::new(Arc::new(UntaggedProvider));

    // When: Two symbols are requested
    let error = service
        .fetch_bars(&BarQuery::new("AAPL,TSLA", "1Day"))
        .await
        .expect_err("rows cannot be attributed");

    // Then: The response is reported as malformed, not silently mis-keyed
    match error {
        FetchError::Upstream(upstream) => {
            assert_eq!(upstream.kind(), ProviderErrorKind::MalformedResponse);
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

// =============================================================================
// Validation failures
// =============================================================================

#[tokio::test]
async fn validation_failures_never_reach_a_failing_provider() {
    // Given: A provider that would fail if called
    let provider = failing(ProviderError::unavailable("should not be called"));
    let service = BarService::new(provider.clone());

    // When: The interval is malformed
    let error = service
        .fetch_bars(&BarQuery::new("AAPL", "Min15"))
        .await
        .expect_err("bad interval");

    // Then: The caller sees a bad request, not the provider's failure
    assert!(error.is_bad_request());
    assert_eq!(error.code(), "bad_request");
    assert!(error.to_string().contains("Invalid timeframe format: 'Min15'"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn timeframe_rejections_share_one_error_kind() {
    for raw in ["abc", "Min15", "15Minutes", "", "5Days", "0Min", "15min", "99999999999Min"] {
        assert!(
            matches!(
                Interval::parse(raw),
                Err(ValidationError::InvalidTimeframeFormat { .. })
            ),
            "{raw:?} should be rejected as a format error"
        );
    }
}
