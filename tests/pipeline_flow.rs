use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, TimeZone, Utc};
use eventBot::clients::page_client::{HttpPageFetcher, PageFetcher, DEFAULT_TIMEOUT};
use eventBot::models::error::{ExtractError, FetchError, PipelineError};
use eventBot::models::event::{RawPage, NO_DESCRIPTION};
use eventBot::service::event_pipeline::{EventPipeline, DEFAULT_EVENT_HOST};
use eventBot::service::page_extractor::PageExtractor;

const BOARD_GAME_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div>
    <h1><span>Board Game Night</span></h1>
    <div>
      <div><span>Hosted by Sam</span></div>
      <div><div><span>Bring snacks</span></div></div>
    </div>
    <time datetime="2099-01-01T00:00:00Z">
      <div><div><div>Friday, Jan 1</div><div>7:00pm–10:00pm</div></div></div>
    </time>
  </div>
</body></html>"#;

struct FakeFetcher {
    response: Result<String, u16>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    fn ok(html: &str) -> Self {
        Self {
            response: Ok(html.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn status(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: AtomicUsize::new(0),
        }
    }
}

#[serenity::async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(&self, url: &str) -> Result<RawPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(html) => Ok(RawPage {
                url: url.to_string(),
                html: html.clone(),
            }),
            Err(status) => Err(FetchError::BadStatus { status: *status }),
        }
    }
}

fn pipeline(fetcher: Arc<FakeFetcher>) -> EventPipeline {
    EventPipeline::new(fetcher, PageExtractor::default(), DEFAULT_EVENT_HOST)
}

#[tokio::test]
async fn board_game_night_end_to_end() {
    let fetcher = Arc::new(FakeFetcher::ok(BOARD_GAME_PAGE));
    let record = pipeline(fetcher.clone())
        .create_event_from_link("https://partiful.com/e/board-games")
        .await
        .expect("valid page should produce a record");

    assert_eq!(record.title, "Board Game Night");
    assert_eq!(record.description, "Bring snacks");
    assert_eq!(record.start_time, Utc.with_ymd_and_hms(2099, 1, 1, 19, 0, 0).unwrap());
    assert_eq!(record.end_time, Utc.with_ymd_and_hms(2099, 1, 1, 22, 0, 0).unwrap());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn foreign_link_is_rejected_without_fetching() {
    let fetcher = Arc::new(FakeFetcher::ok(BOARD_GAME_PAGE));
    let err = pipeline(fetcher.clone())
        .create_event_from_link("https://example.com/e/board-games")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidLink(_)));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn past_event_is_rejected() {
    let fetcher = Arc::new(FakeFetcher::ok(BOARD_GAME_PAGE));
    let after_start = Utc.with_ymd_and_hms(2099, 1, 1, 19, 0, 0).unwrap();
    let err = pipeline(fetcher)
        .create_event_from_link_at("https://partiful.com/e/board-games", after_start)
        .await
        .unwrap_err();

    match err {
        PipelineError::PastEvent { start_time } => assert_eq!(start_time, after_start),
        other => panic!("expected PastEvent, got {:?}", other),
    }
}

#[tokio::test]
async fn event_just_ahead_of_now_is_accepted() {
    let fetcher = Arc::new(FakeFetcher::ok(BOARD_GAME_PAGE));
    let just_before = Utc.with_ymd_and_hms(2099, 1, 1, 19, 0, 0).unwrap() - Duration::seconds(1);
    let record = pipeline(fetcher)
        .create_event_from_link_at("https://partiful.com/e/board-games", just_before)
        .await
        .unwrap();
    assert_eq!(record.title, "Board Game Night");
}

#[tokio::test]
async fn fetch_failure_passes_through() {
    let fetcher = Arc::new(FakeFetcher::status(500));
    let err = pipeline(fetcher)
        .create_event_from_link("https://partiful.com/e/gone")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(FetchError::BadStatus { status: 500 })));
}

#[tokio::test]
async fn missing_time_text_is_not_a_partial_record() {
    let html = r#"<html><body>
        <h1><span>Board Game Night</span></h1>
        <time datetime="2099-01-01T00:00:00Z"><div>7:00pm</div></time>
    </body></html>"#;
    let err = pipeline(Arc::new(FakeFetcher::ok(html)))
        .create_event_from_link("https://partiful.com/e/board-games")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Extract(ExtractError::MissingTimeText)));
}

#[tokio::test]
async fn missing_title_short_circuits() {
    // The time text is garbage too; the title check must fire first.
    let html = r#"<html><body>
        <time datetime="2099-01-01T00:00:00Z"><div><div><div></div><div>whenever</div></div></div></time>
    </body></html>"#;
    let err = pipeline(Arc::new(FakeFetcher::ok(html)))
        .create_event_from_link("https://partiful.com/e/board-games")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Extract(ExtractError::MissingTitle)));
}

#[tokio::test]
async fn page_without_description_still_succeeds() {
    let html = r#"<html><body>
        <h1><span>Quiet Night</span></h1>
        <time datetime="2099-03-05T00:00:00Z"><div><div><div>Thu</div><div>6:00pm</div></div></div></time>
    </body></html>"#;
    let record = pipeline(Arc::new(FakeFetcher::ok(html)))
        .create_event_from_link("https://partiful.com/e/quiet")
        .await
        .unwrap();
    assert_eq!(record.description, NO_DESCRIPTION);
    assert_eq!(record.end_time - record.start_time, Duration::hours(3));
}

#[tokio::test]
async fn http_fetcher_feeds_the_pipeline() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/e/board-games")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(BOARD_GAME_PAGE)
        .create_async()
        .await;

    // The mock server's address stands in for the event host.
    let host = server.host_with_port();
    let fetcher = HttpPageFetcher::new(DEFAULT_TIMEOUT).unwrap();
    let pipeline = EventPipeline::new(Arc::new(fetcher), PageExtractor::default(), host);

    let record = pipeline
        .create_event_from_link(&format!("{}/e/board-games", server.url()))
        .await
        .unwrap();
    assert_eq!(record.title, "Board Game Night");
    mock.assert_async().await;
}
