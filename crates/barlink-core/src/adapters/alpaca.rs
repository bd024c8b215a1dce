use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AlpacaConfig;
use crate::data_source::{BarRequest, DataProvider, ProviderError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{Bar, BarRow, BarTable, ProviderId, Symbol, UtcDateTime};

use super::execute_json;

/// Largest page the bars endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Alpaca market-data adapter for `GET /v2/stocks/bars`.
///
/// Follows `next_page_token` until the vendor reports no further pages or the
/// request's `limit` is reached, so callers see one logical call.
#[derive(Clone)]
pub struct AlpacaDataProvider {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl AlpacaDataProvider {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &AlpacaConfig) -> Self {
        Self {
            http_client,
            auth: config.auth(),
            base_url: config.data_url.trim_end_matches('/').to_owned(),
            timeout_ms: crate::config::DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn bars_url(
        &self,
        req: &BarRequest,
        page_limit: Option<u32>,
        page_token: Option<&str>,
    ) -> String {
        let mut params: Vec<(&str, String)> = vec![
            ("symbols", req.symbols.joined()),
            ("timeframe", req.interval.to_string()),
        ];
        if let Some(start) = req.start {
            params.push(("start", start.format_rfc3339()));
        }
        if let Some(end) = req.end {
            params.push(("end", end.format_rfc3339()));
        }
        if let Some(limit) = page_limit {
            params.push(("limit", limit.to_string()));
        }
        params.push(("adjustment", req.adjustment.as_str().to_owned()));
        params.push(("sort", req.sort.as_str().to_owned()));
        if let Some(feed) = &req.feed {
            params.push(("feed", feed.as_str().to_owned()));
        }
        if let Some(token) = page_token {
            params.push(("page_token", token.to_owned()));
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/v2/stocks/bars?{query}", self.base_url)
    }

    async fn fetch_page(&self, url: String) -> Result<AlpacaBarsPage, ProviderError> {
        let request = HttpRequest::get(url)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);
        execute_json(self.http_client.as_ref(), ProviderId::Alpaca, request).await
    }
}

impl DataProvider for AlpacaDataProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Alpaca
    }

    fn get_bars<'a>(
        &'a self,
        req: &'a BarRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarTable, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let limit = req.limit.map(|limit| limit.get());
            let mut rows: Vec<BarRow> = Vec::new();
            let mut page_token: Option<String> = None;
            let mut pages = 0_usize;

            loop {
                let collected = u32::try_from(rows.len()).unwrap_or(u32::MAX);
                let page_limit =
                    limit.map(|limit| limit.saturating_sub(collected).min(MAX_PAGE_SIZE));
                let url = self.bars_url(req, page_limit, page_token.as_deref());

                let page = self.fetch_page(url).await?;
                pages += 1;
                page.append_rows(&mut rows)?;

                let collected = u32::try_from(rows.len()).unwrap_or(u32::MAX);
                let reached_limit = limit.is_some_and(|limit| collected >= limit);
                match page.next_page_token {
                    Some(token) if !token.is_empty() && !reached_limit => page_token = Some(token),
                    _ => break,
                }
            }

            tracing::debug!(
                symbols = %req.symbols.joined(),
                rows = rows.len(),
                pages,
                "alpaca bars fetched"
            );

            Ok(BarTable::new(rows))
        })
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsPage {
    #[serde(default)]
    bars: Option<IndexMap<String, Vec<AlpacaBar>>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl AlpacaBarsPage {
    fn append_rows(&self, rows: &mut Vec<BarRow>) -> Result<(), ProviderError> {
        let Some(bars) = &self.bars else {
            return Ok(());
        };

        for (raw_symbol, symbol_bars) in bars {
            let symbol = Symbol::parse(raw_symbol).map_err(|error| {
                ProviderError::malformed_response(format!(
                    "alpaca returned unusable symbol '{raw_symbol}': {error}"
                ))
            })?;
            rows.extend(
                symbol_bars
                    .iter()
                    .map(|bar| BarRow::tagged(symbol.clone(), bar.to_bar())),
            );
        }
        Ok(())
    }
}

/// Wire bar: `t`, `o`, `h`, `l`, `c`, `v`, plus optional `n`, `vw` and
/// whatever else the vendor adds.
#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: UtcDateTime,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: u64,
    #[serde(default)]
    n: Option<u64>,
    #[serde(default)]
    vw: Option<f64>,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

impl AlpacaBar {
    fn to_bar(&self) -> Bar {
        let mut bar = Bar::new(self.t, self.o, self.h, self.l, self.c, self.v);
        if let Some(trade_count) = self.n {
            bar = bar.with_extra("trade_count", trade_count);
        }
        if let Some(vwap) = self.vw {
            bar = bar.with_extra("vwap", vwap);
        }
        bar.extra
            .extend(self.other.iter().map(|(name, value)| (name.clone(), value.clone())));
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{BarQuery, ProviderErrorKind};
    use crate::http_client::{HttpError, HttpResponse};
    use crate::normalizer::BarService;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    #[derive(Debug)]
    struct RecordingHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn scripted(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
            Box::pin(async move { response })
        }
    }

    fn provider(client: Arc<RecordingHttpClient>) -> AlpacaDataProvider {
        let mut config = AlpacaConfig::new("key-id", "secret-key");
        config.data_url = String::from("https://data.example.test/");
        AlpacaDataProvider::new(client, &config)
    }

    fn request(query: BarQuery) -> BarRequest {
        BarService::normalize(&query)
            .expect("valid query")
            .expect("symbols present")
    }

    const TWO_SYMBOL_PAGE: &str = r#"{
        "bars": {
            "AAPL": [
                {"t":"2024-01-02T14:30:00Z","o":187.15,"h":188.44,"l":183.89,"c":185.64,"v":82488700,"n":1009074,"vw":185.9},
                {"t":"2024-01-03T14:30:00Z","o":184.22,"h":185.88,"l":183.43,"c":184.25,"v":58414460,"n":656956,"vw":184.32}
            ],
            "TSLA": [
                {"t":"2024-01-02T14:30:00Z","o":250.08,"h":251.25,"l":244.41,"c":248.42,"v":104654163}
            ]
        },
        "next_page_token": null
    }"#;

    #[test]
    fn builds_bars_query_with_auth_headers() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(TWO_SYMBOL_PAGE))]);
        let adapter = provider(client.clone());
        let req = request(
            BarQuery::new("AAPL,TSLA", "1Day")
                .with_start("2024-01-01T00:00:00+00:00")
                .with_limit(50)
                .with_feed("iex"),
        );

        let table = block_on(adapter.get_bars(&req)).expect("bars should decode");
        assert_eq!(table.len(), 3);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        let url = &requests[0].url;
        assert!(url.starts_with("https://data.example.test/v2/stocks/bars?"), "{url}");
        assert!(url.contains("symbols=AAPL%2CTSLA"), "{url}");
        assert!(url.contains("timeframe=1Day"), "{url}");
        assert!(url.contains("start=2024-01-01T00%3A00%3A00Z"), "{url}");
        assert!(url.contains("limit=50"), "{url}");
        assert!(url.contains("adjustment=raw"), "{url}");
        assert!(url.contains("sort=asc"), "{url}");
        assert!(url.contains("feed=iex"), "{url}");
        assert!(!url.contains("end="), "{url}");
        assert_eq!(
            requests[0].headers.get("apca-api-key-id").map(String::as_str),
            Some("key-id")
        );
        assert_eq!(
            requests[0]
                .headers
                .get("apca-api-secret-key")
                .map(String::as_str),
            Some("secret-key")
        );
    }

    #[test]
    fn rows_are_tagged_and_extras_renamed() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(TWO_SYMBOL_PAGE))]);
        let adapter = provider(client);
        let req = request(BarQuery::new("AAPL,TSLA", "1Day"));

        let table = block_on(adapter.get_bars(&req)).expect("bars should decode");

        let first = &table.rows[0];
        assert_eq!(first.symbol.as_ref().map(Symbol::as_str), Some("AAPL"));
        assert_eq!(first.bar.volume, 82_488_700);
        assert_eq!(first.bar.extra.get("trade_count"), Some(&Value::from(1_009_074_u64)));
        assert_eq!(first.bar.extra.get("vwap"), Some(&Value::from(185.9)));
        assert!(!first.bar.extra.contains_key("n"));

        let last = &table.rows[2];
        assert_eq!(last.symbol.as_ref().map(Symbol::as_str), Some("TSLA"));
        assert!(last.bar.extra.is_empty());
    }

    #[test]
    fn follows_page_tokens_until_exhausted() {
        let first = r#"{"bars":{"AAPL":[{"t":"2024-01-02T14:30:00Z","o":1,"h":2,"l":0.5,"c":1.5,"v":10}]},"next_page_token":"QUFQTHwy"}"#;
        let second = r#"{"bars":{"AAPL":[{"t":"2024-01-03T14:30:00Z","o":1,"h":2,"l":0.5,"c":1.5,"v":11}]},"next_page_token":null}"#;
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(first)),
            Ok(HttpResponse::ok_json(second)),
        ]);
        let adapter = provider(client.clone());
        let req = request(BarQuery::new("AAPL", "1Day"));

        let table = block_on(adapter.get_bars(&req)).expect("both pages decode");

        assert_eq!(table.len(), 2);
        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].url.contains("page_token="));
        assert!(requests[1].url.contains("page_token=QUFQTHwy"));
        assert!(!requests[0].url.contains("limit="));
    }

    #[test]
    fn stops_paging_once_limit_is_reached() {
        let page = r#"{"bars":{"AAPL":[
            {"t":"2024-01-02T14:30:00Z","o":1,"h":2,"l":0.5,"c":1.5,"v":10},
            {"t":"2024-01-03T14:30:00Z","o":1,"h":2,"l":0.5,"c":1.5,"v":11}
        ]},"next_page_token":"more"}"#;
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(page))]);
        let adapter = provider(client.clone());
        let req = request(BarQuery::new("AAPL", "1Day").with_limit(2));

        let table = block_on(adapter.get_bars(&req)).expect("page decodes");

        assert_eq!(table.len(), 2);
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[test]
    fn remaining_limit_shrinks_follow_up_pages() {
        let first = r#"{"bars":{"AAPL":[{"t":"2024-01-02T14:30:00Z","o":1,"h":2,"l":0.5,"c":1.5,"v":10}]},"next_page_token":"next"}"#;
        let second = r#"{"bars":{},"next_page_token":null}"#;
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(first)),
            Ok(HttpResponse::ok_json(second)),
        ]);
        let adapter = provider(client.clone());
        let req = request(BarQuery::new("AAPL", "1Day").with_limit(3));

        block_on(adapter.get_bars(&req)).expect("pages decode");

        let requests = client.recorded_requests();
        assert!(requests[0].url.contains("limit=3"));
        assert!(requests[1].url.contains("limit=2"));
    }

    #[test]
    fn null_bars_yield_empty_table() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"bars":null,"next_page_token":null}"#,
        ))]);
        let adapter = provider(client);
        let req = request(BarQuery::new("AAPL", "1Day"));

        let table = block_on(adapter.get_bars(&req)).expect("empty page decodes");
        assert!(table.is_empty());
    }

    #[test]
    fn vendor_rejection_keeps_message() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::new(
            422,
            r#"{"code":42210000,"message":"invalid timeframe"}"#,
        ))]);
        let adapter = provider(client);
        let req = request(BarQuery::new("AAPL", "90Min"));

        let error = block_on(adapter.get_bars(&req)).expect_err("vendor rejects");
        assert_eq!(error.kind(), ProviderErrorKind::Rejected);
        assert_eq!(error.status(), Some(422));
        assert!(error.message().contains("invalid timeframe"));
    }

    #[test]
    fn transport_failure_is_unavailable() {
        let client =
            RecordingHttpClient::scripted(vec![Err(HttpError::new("connection failed: refused"))]);
        let adapter = provider(client);
        let req = request(BarQuery::new("AAPL", "1Day"));

        let error = block_on(adapter.get_bars(&req)).expect_err("transport fails");
        assert_eq!(error.kind(), ProviderErrorKind::Unavailable);
        assert!(error.message().contains("connection failed: refused"));
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json("<html>"))]);
        let adapter = provider(client);
        let req = request(BarQuery::new("AAPL", "1Day"));

        let error = block_on(adapter.get_bars(&req)).expect_err("body is not json");
        assert_eq!(error.kind(), ProviderErrorKind::MalformedResponse);
    }

    fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
