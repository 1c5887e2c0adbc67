use tempfile::TempDir;
use trojmiasto_http::{Fetcher, HttpClient, RequestOpts, ResponseCache, extract_cookie};

#[test]
fn fetch_returns_body_on_success() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/Dom/")
        .with_status(200)
        .with_body("<html>listing</html>")
        .create();

    let fetcher = Fetcher::new(HttpClient::new().unwrap());
    let response = fetcher
        .fetch(&format!("{}/Dom/", server.url()))
        .expect("transport ok")
        .expect("2xx response");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "<html>listing</html>");
    mock.assert();
}

#[test]
fn fetch_on_404_returns_none_without_erroring() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("not found")
        .create();

    let fetcher = Fetcher::new(HttpClient::new().unwrap());
    let result = fetcher
        .fetch(&format!("{}/missing", server.url()))
        .expect("a 404 is not a transport failure");

    assert!(result.is_none());
    mock.assert();
}

#[test]
fn fetch_serves_repeat_requests_from_cache() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/cached")
        .with_status(200)
        .with_body("first and only")
        .expect(1)
        .create();

    let tmp = TempDir::new().unwrap();
    let fetcher =
        Fetcher::new(HttpClient::new().unwrap()).with_cache(ResponseCache::new(tmp.path()));
    let url = format!("{}/cached", server.url());

    let first = fetcher.fetch(&url).unwrap().unwrap();
    let second = fetcher.fetch(&url).unwrap().unwrap();

    assert_eq!(first.body, "first and only");
    assert_eq!(second.body, "first and only");
    mock.assert();
}

#[test]
fn error_responses_are_not_cached() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/flaky")
        .with_status(503)
        .expect(2)
        .create();

    let tmp = TempDir::new().unwrap();
    let fetcher =
        Fetcher::new(HttpClient::new().unwrap()).with_cache(ResponseCache::new(tmp.path()));
    let url = format!("{}/flaky", server.url());

    assert!(fetcher.fetch(&url).unwrap().is_none());
    assert!(fetcher.fetch(&url).unwrap().is_none());
    mock.assert();
}

#[test]
fn post_form_preserves_order_and_repeated_keys() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/szukaj/")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(mockito::Matcher::Exact(
            "id_kat=104&cena=100&cena=200".to_string(),
        ))
        .with_status(200)
        .with_body("ok")
        .create();

    let client = HttpClient::new().unwrap();
    let payload = [
        ("id_kat".to_string(), "104".to_string()),
        ("cena".to_string(), "100".to_string()),
        ("cena".to_string(), "200".to_string()),
    ];
    let response = client
        .post_form(
            &format!("{}/szukaj/", server.url()),
            &payload,
            RequestOpts::default(),
        )
        .unwrap();

    assert_eq!(response.status, 200);
    mock.assert();
}

#[test]
fn request_headers_are_forwarded() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/decode")
        .match_header("cookie", "sid=abc123")
        .with_status(200)
        .create();

    let client = HttpClient::new().unwrap();
    let opts = RequestOpts {
        headers: vec![("cookie".to_string(), "sid=abc123".to_string())],
        ..Default::default()
    };
    client
        .post_form(
            &format!("{}/decode", server.url()),
            &[("hash", "xyz")],
            opts,
        )
        .unwrap();

    mock.assert();
}

#[test]
fn cookie_is_extracted_from_live_response() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "sid=abc123; Path=/; HttpOnly")
        .create();

    let client = HttpClient::new().unwrap();
    let response = client.get(&server.url(), RequestOpts::default()).unwrap();

    assert_eq!(extract_cookie(&response).unwrap(), "sid=abc123");
}
