//! HTML pages: the landing page and a plain smoke-test page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::AppState;

const INDEX_TEMPLATE: &str = "index.html";

const TEST_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Test</title></head>
<body>
    <h1>Server is working!</h1>
    <p>If you can see this page, the server is running normally.</p>
    <a href="/">Back to home</a>
</body>
</html>
"#;

/// GET / — the landing page from the template directory.
pub async fn index(State(state): State<AppState>) -> Response {
    let path = state.config.template_dir.join(INDEX_TEMPLATE);
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load landing page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    "Error loading template: {e}<br>Template folder: {}<br>Static folder: {}",
                    state.config.template_dir.display(),
                    state.config.static_dir.display(),
                )),
            )
                .into_response()
        }
    }
}

/// GET /test — static page confirming the server answers.
pub async fn test_page() -> Html<&'static str> {
    Html(TEST_PAGE)
}
