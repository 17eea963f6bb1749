use actix_web::{HttpResponse, Responder, web};

use crate::config::Config;
use crate::service::{
    reporting::{self, Budget, ChartBar, StatusCount, Summary, SupplyDemand, TimeSeries},
    review,
};
use crate::store::requests::RequestStore;

/// Full dashboard summary
#[utoipa::path(
    get,
    path = "/api/admin/reports/summary",
    responses(
        (status = 200, description = "All report widgets", body = Summary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Report"
)]
pub async fn summary(
    store: web::Data<RequestStore>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::summary(&requests, &config.budget_currency)))
}

/// Request count per status
#[utoipa::path(
    get,
    path = "/api/admin/reports/status-counts",
    responses(
        (status = 200, description = "Most frequent status first", body = Vec<StatusCount>)
    ),
    tag = "Report"
)]
pub async fn status_counts(store: web::Data<RequestStore>) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::status_counts(&requests)))
}

/// Demand per supply item
#[utoipa::path(
    get,
    path = "/api/admin/reports/supply-demand",
    responses(
        (status = 200, description = "Most requested item first", body = Vec<SupplyDemand>)
    ),
    tag = "Report"
)]
pub async fn supply_demand(store: web::Data<RequestStore>) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::supply_demand(&requests)))
}

/// Estimated cost of requested supplies
#[utoipa::path(
    get,
    path = "/api/admin/reports/budget",
    responses(
        (status = 200, description = "Cost per item and total", body = Budget)
    ),
    tag = "Report"
)]
pub async fn budget(
    store: web::Data<RequestStore>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::budget(&requests, &config.budget_currency)))
}

/// Bar chart data: requests per status category
#[utoipa::path(
    get,
    path = "/api/admin/reports/status-chart",
    responses(
        (status = 200, description = "One bar per status in use", body = Vec<ChartBar>)
    ),
    tag = "Report"
)]
pub async fn status_chart(store: web::Data<RequestStore>) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::status_chart(&requests)))
}

/// Line chart data: requests per day
#[utoipa::path(
    get,
    path = "/api/admin/reports/time-series",
    responses(
        (status = 200, description = "Daily request volume", body = TimeSeries)
    ),
    tag = "Report"
)]
pub async fn time_series(store: web::Data<RequestStore>) -> actix_web::Result<impl Responder> {
    let requests = review::list(store.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reporting::time_series(&requests)))
}
