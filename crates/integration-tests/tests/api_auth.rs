//! Login, logout, the weak input filter, and the process-wide session slot.

use actix_web::{test, App};
use integration_tests::harness;

#[actix_web::test]
async fn seed_account_login_reaches_authenticated_state() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "admin"), ("password", "admin123")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("Welcome, admin!"));
    assert!(text.contains("Admin Panel"));

    let identity = h.state.current_identity().expect("identity set");
    assert_eq!(identity.id, 1);
    assert_eq!(identity.role, "admin");
    assert_eq!(identity.status, "active");
}

#[actix_web::test]
async fn wrong_password_renders_login_failed() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "alice"), ("password", "nope")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Login failed"));
    assert!(h.state.current_identity().is_none());
}

#[actix_web::test]
async fn blocklisted_fragments_are_rejected_before_the_query() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "admin' OR 1=1 --"), ("password", "x")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Suspicious input blocked"));
    assert!(h.state.current_identity().is_none());
}

#[actix_web::test]
async fn unlisted_injection_spelling_authenticates_as_first_row() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    // Quote breakout with a parenthesized always-true predicate: none of the
    // nine blocked substrings appear, and the password clause is ORed away.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "x'or(1=1)or'"), ("password", "anything")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Welcome, admin!"));

    let identity = h.state.current_identity().expect("identity set");
    assert_eq!(identity.username, "admin");
}

#[actix_web::test]
async fn stray_quote_surfaces_the_raw_store_error() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    // A lone quote passes the blocklist, breaks the statement, and the login
    // page embeds the store's own message — exactly what a scanner probes for.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "O'Brien"), ("password", "x")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("Database Error"));
    assert!(text.contains("syntax error"));
    assert!(h.state.current_identity().is_none());
}

#[actix_web::test]
async fn banned_seed_account_cannot_log_in() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    // Correct credentials, banned status: refused, slot stays empty.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "bob"), ("password", "password")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Account banned"));
    assert!(h.state.current_identity().is_none());
}

#[actix_web::test]
async fn session_slot_bleeds_across_callers() {
    let h = harness().await;
    let app = test::init_service(
        App::new()
            .app_data(h.state.clone())
            .configure(bb_api::configure_routes),
    )
    .await;

    // Caller A logs in as alice.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "alice"), ("password", "password")])
        .to_request();
    test::call_and_read_body(&app, req).await;

    // Caller B, who never logged in, already appears as alice.
    let req = test::TestRequest::get().uri("/community").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Logged in as <strong>alice</strong>"));

    // B logs in as Willie; A's next request now sees Willie.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_form([("username", "Willie"), ("password", "mylove3000")])
        .to_request();
    test::call_and_read_body(&app, req).await;

    let req = test::TestRequest::get().uri("/community").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Logged in as <strong>Willie</strong>"));

    // One logout clears the slot for everyone.
    let req = test::TestRequest::get().uri("/user/logout").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("You have been logged out."));
    assert!(h.state.current_identity().is_none());

    let req = test::TestRequest::get().uri("/community").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("You are browsing as guest."));
}
