use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use evco::startup::frontend_router;
use tower::ServiceExt;

async fn render(uri: &str) -> (StatusCode, String, String) {
    let response = frontend_router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn static_pages_render_their_fixed_text() {
    let cases = [
        ("/", "Nền tảng đồng sở hữu xe điện"),
        ("/booking", "Đặt lịch sử dụng xe"),
        ("/cost", "Chia sẻ chi phí"),
        ("/group", "Nhóm đồng sở hữu"),
        ("/vehicle", "Thông tin xe"),
    ];

    for (path, heading) in cases {
        let (status, content_type, html) = render(path).await;

        assert_eq!(status, StatusCode::OK, "{}", path);
        assert!(content_type.starts_with("text/html"));
        assert!(html.contains(&format!("<h1>{}</h1>", heading)), "{}", path);
    }
}

#[tokio::test]
async fn unknown_path_renders_not_found_page() {
    let (status, content_type, html) = render("/khong-ton-tai").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.starts_with("text/html"));
    assert!(html.contains("404 - Không tìm thấy trang"));
}
