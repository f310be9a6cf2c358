//! The file-access endpoints and their traversal behavior.

use actix_web::{test, App};
use integration_tests::harness;

#[actix_web::test]
async fn home_serves_the_index_page() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("<h1>Brittle Board</h1>"));
}

#[actix_web::test]
async fn file_endpoint_requires_the_parameter_and_echoes_contents() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/file").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body)
        .contains("Error: file parameter required. Usage: /api/file?file=filename"));

    let req = test::TestRequest::get()
        .uri("/api/file?file=index.html")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("File Contents"));
    // Embedded verbatim, not escaped.
    assert!(text.contains("<h1>Brittle Board</h1>"));
}

#[actix_web::test]
async fn ascending_segments_escape_the_base_directory() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    // secret.txt lives one level above the page base.
    let req = test::TestRequest::get()
        .uri("/api/file?file=../secret.txt")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("outside-the-base"));

    let req = test::TestRequest::get()
        .uri("/include?page=../secret.txt")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("outside-the-base"));
}

#[actix_web::test]
async fn unreadable_files_render_the_io_message() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/file?file=missing.txt")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("File Read Error"));
    assert!(text.contains("Error reading file:"));

    let req = test::TestRequest::get()
        .uri("/include?page=missing.txt")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Error including file:"));
}

#[actix_web::test]
async fn include_defaults_to_the_index_page() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/include").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("Included File"));
    assert!(text.contains("<h1>Brittle Board</h1>"));
}
