//! Liveness endpoint: fixed 200 on every GET path.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use csb_liveness::{router, LIVENESS_BODY};
use tower::ServiceExt;

async fn call(method: Method, path: &str) -> (StatusCode, Option<String>, String) {
    let response = router()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn any_get_path_is_alive() {
    for path in ["/", "/health", "/some/deep/path", "/favicon.ico?x=1"] {
        let (status, content_type, body) = call(Method::GET, path).await;
        assert_eq!(status, StatusCode::OK, "path {path}");
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body, LIVENESS_BODY);
    }
}

#[tokio::test]
async fn body_is_exact() {
    let (_, _, body) = call(Method::GET, "/").await;
    assert_eq!(body, "Bot is running successfully!");
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let (status, _, _) = call(Method::POST, "/").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _, _) = call(Method::DELETE, "/anything").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn serve_stops_on_cancel() {
    let token = tokio_util::sync::CancellationToken::new();
    // Port 0 lets the OS pick a free port.
    let task = tokio::spawn(csb_liveness::serve(0, token.clone()));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    token.cancel();
    task.await.unwrap().unwrap();
}
