pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{
    auth, certificate, events, payments, queries, registration, results, submissions, users,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/events", get(events::handlers::handle_list_events))
        .route(
            "/api/v1/events/:event_type",
            get(events::handlers::handle_get_event),
        )
        // Accounts
        .route("/api/v1/auth/signup", post(auth::handlers::handle_signup))
        .route("/api/v1/auth/login", post(auth::handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth::handlers::handle_logout))
        .route(
            "/api/v1/users/profile",
            get(users::handlers::handle_get_profile).put(users::handlers::handle_update_profile),
        )
        .route(
            "/api/v1/users/dashboard",
            get(users::handlers::handle_dashboard),
        )
        .route(
            "/api/v1/users/certificate",
            get(certificate::handlers::handle_download_certificate),
        )
        // Results
        .route("/api/v1/results", get(results::handlers::handle_list_results))
        .route(
            "/api/v1/results/search",
            get(results::handlers::handle_search_results),
        )
        .route(
            "/api/v1/results/:event_type/:season",
            get(results::handlers::handle_get_result),
        )
        // Registration wizard
        .route(
            "/api/v1/registrations",
            post(registration::handlers::handle_start_registration),
        )
        .route(
            "/api/v1/registrations/:id",
            get(registration::handlers::handle_get_registration),
        )
        .route(
            "/api/v1/registrations/:id/personal-info",
            put(registration::handlers::handle_personal_info),
        )
        .route(
            "/api/v1/registrations/:id/submission",
            post(registration::handlers::handle_attach_submission),
        )
        .route(
            "/api/v1/registrations/:id/payment",
            post(registration::handlers::handle_registration_payment),
        )
        // Submissions & payments
        .route(
            "/api/v1/submissions",
            post(submissions::handlers::handle_create_submission),
        )
        .route(
            "/api/v1/submissions/user",
            get(submissions::handlers::handle_user_submissions),
        )
        .route(
            "/api/v1/payments/create-order",
            post(payments::handlers::handle_create_order),
        )
        .route(
            "/api/v1/payments/checkout",
            post(payments::handlers::handle_checkout),
        )
        .route(
            "/api/v1/payments/verify",
            post(payments::handlers::handle_verify_payment),
        )
        .route(
            "/api/v1/payments/intent",
            put(payments::handlers::handle_save_intent),
        )
        // Contact
        .route("/api/v1/queries", post(queries::handlers::handle_submit_query))
        // Admin
        .route(
            "/api/v1/admin/results",
            post(results::handlers::handle_publish_result),
        )
        .route(
            "/api/v1/admin/results/import",
            post(results::handlers::handle_import_results),
        )
        .route(
            "/api/v1/admin/results/template",
            get(results::handlers::handle_download_template),
        )
        .route(
            "/api/v1/admin/participants",
            get(registration::handlers::handle_list_participants),
        )
        .route(
            "/api/v1/admin/queries",
            get(queries::handlers::handle_list_queries),
        )
        .route(
            "/api/v1/admin/queries/:id/resolve",
            post(queries::handlers::handle_resolve_query),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::memory::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "kalakriti-test-boundary";

    fn app() -> Router {
        build_router(AppState::new(
            Arc::new(MemoryStore::default()),
            Config::for_tests(),
        ))
    }

    fn request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn multipart_file(uri: &str, field: &str, file_name: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: image/png\r\n\r\n\
             {contents}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Text fields plus an optional binary file part, as a browser form sends.
    fn multipart_form(
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                     {value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, contents)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(contents);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn signup_body(email: &str) -> Value {
        json!({
            "fullName": "Asha Patil",
            "email": email,
            "phoneNumber": "9876543210",
            "password": "password123",
            "confirmPassword": "password123"
        })
    }

    async fn signup(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            request("POST", "/api/v1/auth/signup", None, Some(signup_body(email))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "kalakriti-api");
        assert_eq!(body["storage"], "memory");
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;
        assert!(token.starts_with("auth-token-"));

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/signup",
                None,
                Some(signup_body("ASHA@example.com")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let app = app();
        signup(&app, "asha@example.com").await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "asha@example.com", "password": "wrong-password"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "asha@example.com", "password": "password123"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "asha@example.com");
    }

    async fn save_intent(app: &Router, event_type: &str, artworks: u32) -> String {
        let (status, body) = send(
            app,
            request(
                "PUT",
                "/api/v1/payments/intent",
                None,
                Some(json!({"eventType": event_type, "numberOfArtworks": artworks})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["intentId"].as_str().unwrap().to_string()
    }

    fn login(email: &str, intent_id: Option<&str>) -> Request<Body> {
        let mut body = json!({"email": email, "password": "password123"});
        if let Some(id) = intent_id {
            body["intentId"] = json!(id);
        }
        request("POST", "/api/v1/auth/login", None, Some(body))
    }

    #[tokio::test]
    async fn test_login_returns_saved_intent_once() {
        let app = app();
        signup(&app, "asha@example.com").await;
        let intent_id = save_intent(&app, "art", 2).await;

        let (status, body) = send(&app, login("asha@example.com", Some(&intent_id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paymentIntent"]["eventType"], "art");
        assert_eq!(body["paymentIntent"]["numberOfArtworks"], 2);
        let (_, body) = send(&app, login("asha@example.com", Some(&intent_id))).await;
        assert!(body.get("paymentIntent").is_none());
    }

    #[tokio::test]
    async fn test_intent_is_not_handed_to_another_login() {
        let app = app();
        signup(&app, "asha@example.com").await;
        signup(&app, "ravi@example.com").await;
        let asha_intent = save_intent(&app, "dance", 3).await;
        let ravi_intent = save_intent(&app, "art", 1).await;

        let (status, body) = send(&app, login("ravi@example.com", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("paymentIntent").is_none());
        let (_, body) = send(&app, login("ravi@example.com", Some(&ravi_intent))).await;
        assert_eq!(body["paymentIntent"]["eventType"], "art");

        let (_, body) = send(&app, login("asha@example.com", Some(&asha_intent))).await;
        assert_eq!(body["paymentIntent"]["eventType"], "dance");
        assert_eq!(body["paymentIntent"]["numberOfArtworks"], 3);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = app();
        let (status, _) = send(&app, request("GET", "/api/v1/users/profile", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            request("GET", "/api/v1/users/profile", Some("auth-token-bogus"), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = signup(&app, "asha@example.com").await;
        let (status, body) = send(
            &app,
            request("GET", "/api/v1/users/profile", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fullName"], "Asha Patil");
        assert!(body.get("credentials").is_none());
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;
        let (status, _) = send(
            &app,
            request("POST", "/api/v1/auth/logout", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(
            &app,
            request("GET", "/api/v1/users/dashboard", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_token() {
        let app = app();
        let user_token = signup(&app, "asha@example.com").await;
        for token in [None, Some(user_token.as_str())] {
            let (status, body) =
                send(&app, request("GET", "/api/v1/admin/queries", token, None)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["error"]["code"], "FORBIDDEN");
        }
        let (status, body) = send(
            &app,
            request("GET", "/api/v1/admin/queries", Some("admin-secret"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected() {
        let (status, body) = send(
            &app(),
            request("GET", "/api/v1/results/search?q=%20%20", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please enter a Contestant ID or Name"
        );
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let app = app();
        let (status, _) = send(&app, request("GET", "/api/v1/events/sculpture", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, request("GET", "/api/v1/events", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_checkout_flow_verifies() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;

        let (status, order) = send(
            &app,
            request(
                "POST",
                "/api/v1/payments/create-order",
                Some(token.as_str()),
                Some(json!({"eventType": "dance", "numberOfArtworks": 1})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["currency"], "INR");
        let order_id = order["id"].as_str().unwrap().to_string();

        let (status, paid) = send(
            &app,
            request(
                "POST",
                "/api/v1/payments/checkout",
                Some(token.as_str()),
                Some(json!({"orderId": order_id})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let mut verify = json!({
            "paymentId": paid["paymentId"],
            "orderId": paid["orderId"],
            "signature": paid["signature"],
            "eventType": "dance",
            "numberOfArtworks": 1
        });
        let (_, body) = send(
            &app,
            request("POST", "/api/v1/payments/verify", Some(token.as_str()), Some(verify.clone())),
        )
        .await;
        assert_eq!(body["verified"], true);

        verify["signature"] = json!("00");
        let (_, body) = send(
            &app,
            request("POST", "/api/v1/payments/verify", Some(token.as_str()), Some(verify)),
        )
        .await;
        assert_eq!(body["verified"], false);
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_tier() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/v1/payments/create-order",
                Some(token.as_str()),
                Some(json!({"eventType": "art", "numberOfArtworks": 42})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_certificate_unavailable_without_placement() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;
        let (status, body) = send(
            &app,
            request("GET", "/api/v1/users/certificate", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            "Certificate not available. Results must be declared and you must be a winner."
        );
    }

    /// Registration wizard through to a published placement and its certificate.
    #[tokio::test]
    async fn test_registration_to_certificate() {
        let app = app();
        let token = signup(&app, "asha@example.com").await;

        let (status, draft) = send(
            &app,
            request(
                "POST",
                "/api/v1/registrations",
                None,
                Some(json!({"eventType": "dance"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = draft["id"].as_str().unwrap().to_string();

        // Paying before the earlier steps is refused.
        let (status, _) = send(
            &app,
            request(
                "POST",
                &format!("/api/v1/registrations/{id}/payment"),
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            request(
                "PUT",
                &format!("/api/v1/registrations/{id}/personal-info"),
                None,
                Some(json!({
                    "fullName": "Asha Patil",
                    "email": "asha@example.com",
                    "phone": "9876543210",
                    "address": "12 MG Road",
                    "age": "24",
                    "city": "Pune",
                    "state": "Maharashtra"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            multipart_file(
                &format!("/api/v1/registrations/{id}/submission"),
                "file",
                "routine.png",
                "not really a png",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, receipt) = send(
            &app,
            request(
                "POST",
                &format!("/api/v1/registrations/{id}/payment"),
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let participant_id = receipt["participantId"].as_str().unwrap().to_string();
        assert!(participant_id.starts_with("S1D25"));
        assert_eq!(receipt["amount"], 15_000);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/v1/admin/results",
                Some("admin-secret"),
                Some(json!({
                    "eventType": "dance",
                    "season": "Season 1",
                    "topPositions": {
                        "adult": [{
                            "participantId": participant_id,
                            "name": "Asha Patil",
                            "ageCategory": "adult",
                            "position": 1,
                            "score": 97.5
                        }]
                    }
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, dashboard) = send(
            &app,
            request("GET", "/api/v1/users/dashboard", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(dashboard["hasParticipated"], true);
        assert_eq!(dashboard["registrations"].as_array().unwrap().len(), 1);
        assert_eq!(dashboard["placements"].as_array().unwrap().len(), 1);
        assert_eq!(dashboard["placements"][0]["positionLabel"], "1st Place");

        let resp = app
            .clone()
            .oneshot(request("GET", "/api/v1/users/certificate", Some(token.as_str()), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains(&format!("Kalakriti_Certificate_{participant_id}.pdf")));
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_contact_query_reaches_admin_listing() {
        let app = app();
        let (status, query) = send(
            &app,
            request(
                "POST",
                "/api/v1/queries",
                None,
                Some(json!({
                    "name": "Ravi",
                    "email": "ravi@example.com",
                    "message": "When are the dance results out?"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = query["id"].as_str().unwrap().to_string();

        let (status, resolved) = send(
            &app,
            request(
                "POST",
                &format!("/api/v1/admin/queries/{id}/resolve"),
                Some("admin-secret"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resolved["status"], "resolved");

        let (_, listing) = send(
            &app,
            request(
                "GET",
                "/api/v1/admin/queries?search=ravi",
                Some("admin-secret"),
                None,
            ),
        )
        .await;
        assert_eq!(listing["resolved"], 1);
        assert_eq!(listing["queries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_event_in_a_body_is_a_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            request(
                "PUT",
                "/api/v1/payments/intent",
                None,
                Some(json!({"eventType": "pottery", "numberOfArtworks": 1})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let token = signup(&app, "asha@example.com").await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/payments/create-order",
                Some(token.as_str()),
                Some(json!({"eventType": "pottery", "numberOfArtworks": 1})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            request("GET", "/api/v1/results/pottery/2024", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    async fn download_template(app: &Router) -> Vec<u8> {
        let resp = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/v1/admin/results/template?eventType=art",
                Some("admin-secret"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"art-results-template.xlsx\""
        );
        to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_results_template_download() {
        let app = app();
        let bytes = download_template(&app).await;
        // xlsx is a zip archive.
        assert!(bytes.starts_with(b"PK"));

        let (status, _) = send(
            &app,
            request(
                "GET",
                "/api/v1/admin/results/template?eventType=art",
                None,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_results_import_previews_the_workbook() {
        let app = app();
        let template = download_template(&app).await;

        let (status, body) = send(
            &app,
            multipart_form(
                "/api/v1/admin/results/import",
                "admin-secret",
                &[("eventType", "art"), ("season", "2024")],
                Some(("results.xlsx", template.as_slice())),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["eventType"], "art");
        assert_eq!(body["season"], "2024");
        assert_eq!(body["isPublished"], false);
        assert_eq!(body["topPositions"]["adult"].as_array().unwrap().len(), 5);
        assert_eq!(body["topPositions"]["children"].as_array().unwrap().len(), 5);
        assert_eq!(body["topPositions"]["preschool"].as_array().unwrap().len(), 5);
        assert_eq!(body["top100"].as_array().unwrap().len(), 100);

        // A preview is not published.
        let (_, body) = send(&app, request("GET", "/api/v1/results", None, None)).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_results_import_requires_fields_and_file() {
        let app = app();
        let (status, body) = send(
            &app,
            multipart_form(
                "/api/v1/admin/results/import",
                "admin-secret",
                &[("eventType", "art"), ("season", "2024")],
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please select an Excel file");

        let (status, body) = send(
            &app,
            multipart_form(
                "/api/v1/admin/results/import",
                "admin-secret",
                &[("eventType", "art")],
                Some(("results.xlsx", &b"irrelevant"[..])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "'season' is required");

        let (status, _) = send(
            &app,
            multipart_form(
                "/api/v1/admin/results/import",
                "wrong-token",
                &[("eventType", "art"), ("season", "2024")],
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
