use crate::{
    api::{admin, employee, report},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{guard, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("rate limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            // Employee role
            .service(
                web::scope("/employee")
                    // /employee/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(employee::get_employee)),
                    )
                    // /employee/{employee_id}/requests, only submissions are limited
                    .service(
                        web::resource("/{employee_id}/requests")
                            .guard(guard::Post())
                            .wrap(submit_limiter)
                            .route(web::post().to(employee::create_request)),
                    )
                    .service(
                        web::resource("/{employee_id}/requests")
                            .route(web::get().to(employee::list_own_requests)),
                    ),
            )
            // Admin role
            .service(
                web::scope("/admin")
                    .wrap(admin_limiter)
                    // /admin/requests
                    .service(
                        web::resource("/requests").route(web::get().to(admin::list_requests)),
                    )
                    // /admin/requests/statuses
                    .service(
                        web::resource("/requests/statuses")
                            .route(web::get().to(admin::status_options)),
                    )
                    // /admin/requests/{request_id}/status
                    .service(
                        web::resource("/requests/{request_id}/status")
                            .route(web::put().to(admin::update_status)),
                    )
                    // /admin/requests/{request_id}/audit
                    .service(
                        web::resource("/requests/{request_id}/audit")
                            .route(web::get().to(admin::request_audit)),
                    )
                    // /admin/audit
                    .service(web::resource("/audit").route(web::get().to(admin::audit_log)))
                    .service(
                        web::scope("/reports")
                            .service(web::resource("/summary").route(web::get().to(report::summary)))
                            .service(
                                web::resource("/status-counts")
                                    .route(web::get().to(report::status_counts)),
                            )
                            .service(
                                web::resource("/supply-demand")
                                    .route(web::get().to(report::supply_demand)),
                            )
                            .service(web::resource("/budget").route(web::get().to(report::budget)))
                            .service(
                                web::resource("/status-chart")
                                    .route(web::get().to(report::status_chart)),
                            )
                            .service(
                                web::resource("/time-series")
                                    .route(web::get().to(report::time_series)),
                            ),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{audit::AuditLog, requests::RequestStore, roster::RosterStore};
    use actix_web::{App, http::StatusCode, test, web::Data};
    use serde_json::{Value, json};
    use std::net::SocketAddr;
    use tempfile::TempDir;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::for_dir(dir.path());
        std::fs::write(
            &config.employee_data_path,
            "Employee ID,Name,Department,Phone Number,Email\n\
             E001,Alice,Ops,555-1111,a@x.com\n",
        )
        .unwrap();
        (dir, config)
    }

    macro_rules! app {
        ($config:expr) => {{
            let config: Config = $config.clone();
            test::init_service(
                App::new()
                    .app_data(Data::new(RosterStore::new(&config.employee_data_path)))
                    .app_data(Data::new(RequestStore::new(&config.requests_path)))
                    .app_data(Data::new(AuditLog::new(&config.audit_log_path)))
                    .app_data(Data::new(config.clone()))
                    .configure(|cfg| configure(cfg, config.clone())),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn employee_submits_and_admin_sees_it() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::get()
            .uri("/api/employee/E001")
            .peer_addr(peer())
            .to_request();
        let employee: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(employee["name"], "Alice");

        let req = test::TestRequest::post()
            .uri("/api/employee/E001/requests")
            .peer_addr(peer())
            .set_json(json!({
                "location": "HQ",
                "status": "Evacuated",
                "supplies": ["Water", "Food"],
                "notes": "urgent"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["request"]["request_status"], "Pending");
        assert_eq!(created["request"]["supplies_needed"], json!(["Water", "Food"]));
        assert_eq!(created["request"]["email"], "a@x.com");

        let req = test::TestRequest::get()
            .uri("/api/admin/requests")
            .peer_addr(peer())
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["total"], 1);
        assert_eq!(listed["data"][0]["id"], created["request"]["id"]);

        let req = test::TestRequest::get()
            .uri("/api/employee/E001/requests")
            .peer_addr(peer())
            .to_request();
        let mine: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mine["total"], 1);
        assert_eq!(mine["employee"]["department"], "Ops");
    }

    #[actix_web::test]
    async fn unknown_employee_gets_a_warning() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::post()
            .uri("/api/employee/E404/requests")
            .peer_addr(peer())
            .set_json(json!({ "location": "HQ", "status": "Safe" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Employee ID E404 not found. Please check again.");
        assert!(!std::path::Path::new(&config.requests_path).exists());
    }

    #[actix_web::test]
    async fn admin_updates_status_and_reads_reports() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::post()
            .uri("/api/employee/E001/requests")
            .peer_addr(peer())
            .set_json(json!({
                "status": "In Need of Help",
                "supplies": ["Medical Kit", "Blanket"]
            }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/requests/{id}/status"))
            .peer_addr(peer())
            .set_json(json!({ "status": "Delivered", "expected_status": "Pending" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/requests/{id}/status"))
            .peer_addr(peer())
            .set_json(json!({ "status": "Rejected", "expected_status": "Pending" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri("/api/admin/reports/summary")
            .peer_addr(peer())
            .to_request();
        let summary: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary["total_requests"], 1);
        assert_eq!(
            summary["status_counts"],
            json!([{ "status": "Delivered", "count": 1 }])
        );
        assert_eq!(summary["budget"]["total"], 28);
        assert_eq!(summary["budget"]["currency"], "MYR");
        assert_eq!(summary["time_series"]["points"][0]["count"], 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/requests/{id}/audit"))
            .peer_addr(peer())
            .to_request();
        let audit: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(audit["total"], 1);
        assert_eq!(audit["data"][0]["from"], "Pending");
        assert_eq!(audit["data"][0]["to"], "Delivered");
    }

    #[actix_web::test]
    async fn empty_store_reports_are_empty() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::get()
            .uri("/api/admin/reports/status-counts")
            .peer_addr(peer())
            .to_request();
        let counts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(counts, json!([]));

        let req = test::TestRequest::get()
            .uri("/api/admin/requests")
            .peer_addr(peer())
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["total"], 0);
    }

    #[actix_web::test]
    async fn unknown_request_id_is_not_found() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/requests/{}/status", uuid::Uuid::new_v4()))
            .peer_addr(peer())
            .set_json(json!({ "status": "Approved" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn status_options_list_the_closed_set() {
        let (_dir, config) = setup();
        let app = app!(config);

        let req = test::TestRequest::get()
            .uri("/api/admin/requests/statuses")
            .peer_addr(peer())
            .to_request();
        let options: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(options, json!(["Pending", "Approved", "Delivered", "Rejected"]));
    }

    #[actix_web::test]
    async fn history_reads_do_not_spend_the_submission_budget() {
        let (_dir, mut config) = setup();
        config.rate_submit_per_min = 1;
        let app = app!(config);

        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri("/api/employee/E001/requests")
                .peer_addr(peer())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let submit = || {
            test::TestRequest::post()
                .uri("/api/employee/E001/requests")
                .peer_addr(peer())
                .set_json(json!({ "status": "Safe" }))
                .to_request()
        };
        let resp = test::call_service(&app, submit()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = test::call_service(&app, submit()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
