//! Integration tests for the scrape pipeline against mock HTTP servers.

use std::sync::Arc;
use std::time::Duration;

use ogscraper_core::download::{FetchError, Fetcher, HttpFetcher};
use ogscraper_core::{ErrorKind, ScrapeError, ScrapeOptions, Scraper, split_options};
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::chunked_server::{ChunkedBody, start_chunked_server};
use support::socket_guard::{should_skip_socket_bound_test, start_mock_server_or_skip};

const ARTICLE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Fallback title</title>
    <meta property="og:title" content="Integration Article">
    <meta property="og:type" content="article">
    <meta property="og:image" content="/images/cover.png">
    <meta property="og:image:width" content="1200">
    <meta name="twitter:card" content="summary">
</head>
<body><p>Hello</p></body>
</html>"#;

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_scrape_url_success_with_charset_and_absolute_media() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(html_response(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/article", mock_server.uri());
    let result = Scraper::new()
        .scrape(ScrapeOptions::for_url(&url))
        .await
        .expect("scrape should succeed");

    let og = &result.og_object;
    assert!(og.success);
    assert_eq!(og.request_url.as_deref(), Some(url.as_str()));
    assert_eq!(og.metadata.og_title.as_deref(), Some("Integration Article"));
    assert_eq!(og.metadata.og_type.as_deref(), Some("article"));
    assert_eq!(og.metadata.twitter_card.as_deref(), Some("summary"));
    assert_eq!(og.charset.as_deref(), Some("UTF-8"));
    assert_eq!(
        og.metadata.og_image[0].url,
        format!("{}/images/cover.png", mock_server.uri())
    );
    assert_eq!(og.metadata.og_image[0].width.as_deref(), Some("1200"));

    assert_eq!(result.response.status_code, Some(200));
    assert!(
        result
            .response
            .headers
            .get("content-type")
            .is_some_and(|v| v.starts_with("text/html"))
    );
    assert_eq!(result.response.body, ARTICLE);
}

#[tokio::test]
async fn test_scrape_only_open_graph_info_has_no_charset() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(html_response(ARTICLE))
        .mount(&mock_server)
        .await;

    let options = ScrapeOptions {
        only_get_open_graph_info: true,
        ..ScrapeOptions::for_url(format!("{}/article", mock_server.uri()))
    };
    let result = Scraper::new().scrape(options).await.expect("scrape should succeed");

    assert_eq!(result.og_object.charset, None);
    let json = serde_json::to_value(&result.og_object).expect("serializable");
    assert!(json.get("charset").is_none(), "charset must be omitted: {json}");
}

#[tokio::test]
async fn test_scrape_decodes_latin1_body() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    let mut body = b"<html><head><meta property=\"og:title\" content=\"Caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b"\"></head></html>");

    Mock::given(method("GET"))
        .and(path("/cafe"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=ISO-8859-1"))
        .mount(&mock_server)
        .await;

    let result = Scraper::new()
        .scrape(ScrapeOptions::for_url(format!("{}/cafe", mock_server.uri())))
        .await
        .expect("scrape should succeed");

    assert_eq!(result.og_object.metadata.og_title.as_deref(), Some("Café"));
    assert_eq!(result.og_object.charset.as_deref(), Some("windows-1252"));
}

#[tokio::test]
async fn test_scrape_server_error_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = Scraper::new()
        .scrape(ScrapeOptions::for_url(format!("{}/down", mock_server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err, ScrapeError::ServerError);
    assert_eq!(err.to_string(), "Web server is returning error");
}

#[tokio::test]
async fn test_scrape_not_found_status_is_still_a_result() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(b"<title>Not here</title>".to_vec(), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = Scraper::new()
        .scrape(ScrapeOptions::for_url(format!("{}/missing", mock_server.uri())))
        .await
        .expect("4xx responses are not fetch failures");

    assert_eq!(result.response.status_code, Some(404));
    assert_eq!(result.og_object.metadata.og_title.as_deref(), Some("Not here"));
}

#[tokio::test]
async fn test_scrape_download_limit_exceeded() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    let big = format!("<html><body>{}</body></html>", "x".repeat(5000));
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html_response(&big))
        .mount(&mock_server)
        .await;

    let options = ScrapeOptions {
        download_limit: 1000,
        ..ScrapeOptions::for_url(format!("{}/big", mock_server.uri()))
    };
    let err = Scraper::new().scrape(options).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DownloadLimitExceeded);
    let msg = err.to_string();
    assert!(msg.contains("1000"), "Expected limit in: {msg}");
}

#[tokio::test]
async fn test_scrape_body_at_exact_limit_succeeds() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    let body = "a".repeat(1000);
    Mock::given(method("GET"))
        .and(path("/exact"))
        .respond_with(html_response(&body))
        .mount(&mock_server)
        .await;

    let options = ScrapeOptions {
        download_limit: 1000,
        ..ScrapeOptions::for_url(format!("{}/exact", mock_server.uri()))
    };
    let result = Scraper::new().scrape(options).await;
    assert!(result.is_ok(), "Expected success: {:?}", result.err());
}

#[tokio::test]
async fn test_scrape_timeout() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_response(ARTICLE).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let options = ScrapeOptions {
        timeout_ms: 100,
        ..ScrapeOptions::for_url(format!("{}/slow", mock_server.uri()))
    };
    let err = Scraper::new().scrape(options).await.unwrap_err();

    assert_eq!(err, ScrapeError::TimedOut);
    assert_eq!(err.to_string(), "Time out");
}

#[tokio::test]
async fn test_scrape_non_html_content_type() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/avatar"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .mount(&mock_server)
        .await;

    let err = Scraper::new()
        .scrape(ScrapeOptions::for_url(format!("{}/avatar", mock_server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err, ScrapeError::NonHtmlResource);
}

#[tokio::test]
async fn test_scrape_sends_custom_headers_and_default_user_agent() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/lang"))
        .and(header("accept-language", "nl-NL"))
        .and(header_regex("user-agent", "^ogscraper/"))
        .respond_with(html_response(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut options = ScrapeOptions::for_url(format!("{}/lang", mock_server.uri()));
    options
        .headers
        .insert("Accept-Language".to_string(), "nl-NL".to_string());

    let result = Scraper::new().scrape(options).await;
    assert!(result.is_ok(), "Expected success: {:?}", result.err());
}

#[tokio::test]
async fn test_scrape_gates_do_not_touch_the_server() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .respond_with(html_response(ARTICLE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = Scraper::new()
        .scrape(ScrapeOptions::for_url(format!("{}/report.pdf", mock_server.uri())))
        .await
        .unwrap_err();
    assert_eq!(err, ScrapeError::NonHtmlResource);

    let options = ScrapeOptions {
        blacklist: vec!["127.0.0.1".to_string()],
        ..ScrapeOptions::for_url(format!("{}/article", mock_server.uri()))
    };
    let err = Scraper::new().scrape(options).await.unwrap_err();
    assert_eq!(err, ScrapeError::Blacklisted);
}

#[tokio::test]
async fn test_scrape_unreachable_host_is_page_not_found() {
    if should_skip_socket_bound_test() {
        return;
    }

    // Nothing listens on port 1.
    let err = Scraper::new()
        .scrape(ScrapeOptions::for_url("http://127.0.0.1:1/"))
        .await
        .unwrap_err();

    assert_eq!(err, ScrapeError::PageNotFound);
    assert_eq!(err.to_string(), "Page not found");
}

#[tokio::test]
async fn test_http_fetcher_reports_limit_signal() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html_response(&"y".repeat(4096)))
        .mount(&mock_server)
        .await;

    let options = ScrapeOptions {
        download_limit: 100,
        ..ScrapeOptions::default()
    };
    let (_, transport) = split_options(options).expect("valid options");
    let transport = transport.with_url(format!("{}/big", mock_server.uri()));

    let result = HttpFetcher::new().fetch(&transport, 1024).await;
    assert!(
        matches!(result, Err(FetchError::DownloadLimitExceeded { limit: 100, .. })),
        "Expected download limit signal: {result:?}"
    );
}

#[tokio::test]
async fn test_http_fetcher_with_custom_client_keeps_its_defaults() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "custom-agent/1.0"))
        .respond_with(html_response(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("custom-agent/1.0")
        .build()
        .expect("client builds");
    let scraper = Scraper::with_fetcher(Arc::new(HttpFetcher::with_client(client)));

    let result = scraper
        .scrape(ScrapeOptions::for_url(format!("{}/article", mock_server.uri())))
        .await
        .expect("scrape should succeed");
    assert_eq!(
        result.og_object.metadata.og_title.as_deref(),
        Some("Integration Article")
    );
}

fn chunks(count: usize, size: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| vec![b'a'; size]).collect()
}

#[tokio::test]
async fn test_streamed_body_over_limit_is_canceled() {
    if should_skip_socket_bound_test() {
        return;
    }

    let url = start_chunked_server(ChunkedBody::Complete(chunks(10, 500)))
        .await
        .expect("server starts");
    let options = ScrapeOptions {
        download_limit: 1000,
        ..ScrapeOptions::for_url(url)
    };
    let err = Scraper::new().scrape(options).await.unwrap_err();

    assert_eq!(err, ScrapeError::DownloadLimitExceeded { limit: 1000 });
    assert_eq!(err.to_string(), "Exceeded the download limit of 1000 bytes");
}

#[tokio::test]
async fn test_streamed_body_at_exact_limit_succeeds() {
    if should_skip_socket_bound_test() {
        return;
    }

    let url = start_chunked_server(ChunkedBody::Complete(chunks(2, 500)))
        .await
        .expect("server starts");
    let options = ScrapeOptions {
        download_limit: 1000,
        ..ScrapeOptions::for_url(url)
    };
    let result = Scraper::new()
        .scrape(options)
        .await
        .expect("body at the limit should be accepted");

    assert_eq!(result.response.body.len(), 1000);
    assert!(result.response.headers.get("content-length").is_none());
}

#[tokio::test]
async fn test_streamed_body_stalling_after_headers_times_out() {
    if should_skip_socket_bound_test() {
        return;
    }

    let url = start_chunked_server(ChunkedBody::Stall)
        .await
        .expect("server starts");
    let options = ScrapeOptions {
        timeout_ms: 300,
        ..ScrapeOptions::for_url(url)
    };
    let err = Scraper::new().scrape(options).await.unwrap_err();

    assert_eq!(err, ScrapeError::TimedOut);
}

#[tokio::test]
async fn test_http_fetcher_streamed_limit_signal() {
    if should_skip_socket_bound_test() {
        return;
    }

    let url = start_chunked_server(ChunkedBody::Complete(chunks(10, 500)))
        .await
        .expect("server starts");
    let options = ScrapeOptions {
        download_limit: 1000,
        ..ScrapeOptions::default()
    };
    let (_, transport) = split_options(options).expect("valid options");
    let transport = transport.with_url(url);

    let result = HttpFetcher::new().fetch(&transport, 1024).await;
    assert!(
        matches!(result, Err(FetchError::DownloadLimitExceeded { limit: 1000, .. })),
        "Expected download limit signal: {result:?}"
    );
}
