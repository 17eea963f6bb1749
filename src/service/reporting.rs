//! Read-only aggregates over the request collection, recomputed on every view.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::model::{request::Request, status::RequestStatus, supply::Supply};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: RequestStatus,
    #[schema(example = 3)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SupplyDemand {
    #[schema(example = "Water")]
    pub supply: String,
    #[schema(example = 7)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BudgetLine {
    #[schema(example = "Water")]
    pub supply: String,
    #[schema(example = 7)]
    pub count: usize,
    #[schema(example = 5)]
    pub unit_price: u64,
    #[schema(example = 35)]
    pub cost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Budget {
    #[schema(example = "MYR")]
    pub currency: String,
    pub lines: Vec<BudgetLine>,
    #[schema(example = 35)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartBar {
    #[schema(example = "Pending")]
    pub label: String,
    #[schema(example = 4)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyVolume {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 2)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeSeries {
    pub points: Vec<DailyVolume>,
    /// Requests left out because their timestamp could not be parsed
    #[schema(example = 0)]
    pub skipped: usize,
}

/// Everything the admin dashboard shows under the request table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Summary {
    #[schema(example = 12)]
    pub total_requests: usize,
    pub status_counts: Vec<StatusCount>,
    pub supply_demand: Vec<SupplyDemand>,
    pub budget: Budget,
    pub status_chart: Vec<ChartBar>,
    pub time_series: TimeSeries,
}

/// Requests per status, most frequent first.
pub fn status_counts(requests: &[Request]) -> Vec<StatusCount> {
    let mut counts = tally_statuses(requests)
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect::<Vec<_>>();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// How often each supply was asked for, most requested first.
pub fn supply_demand(requests: &[Request]) -> Vec<SupplyDemand> {
    tally_supplies(requests)
        .into_iter()
        .map(|(supply, count)| SupplyDemand {
            supply: supply.name().to_string(),
            count,
        })
        .collect()
}

/// Estimated cost of fulfilling every requested item. Items without a
/// price cost nothing.
pub fn budget(requests: &[Request], currency: &str) -> Budget {
    let lines: Vec<BudgetLine> = tally_supplies(requests)
        .into_iter()
        .map(|(supply, count)| {
            let unit_price = supply.unit_price();
            BudgetLine {
                supply: supply.name().to_string(),
                count,
                unit_price,
                cost: count as u64 * unit_price,
            }
        })
        .collect();
    let total: u64 = lines.iter().map(|l| l.cost).sum();

    Budget {
        currency: currency.to_string(),
        lines,
        total,
    }
}

/// Bars per status in lifecycle order; statuses nobody is in are left out.
pub fn status_chart(requests: &[Request]) -> Vec<ChartBar> {
    tally_statuses(requests)
        .into_iter()
        .map(|(status, count)| ChartBar {
            label: status.to_string(),
            count,
        })
        .collect()
}

/// Requests per calendar day, oldest first.
pub fn time_series(requests: &[Request]) -> TimeSeries {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut skipped = 0;

    for request in requests {
        match request.submitted_on() {
            Some(day) => *per_day.entry(day).or_default() += 1,
            None => skipped += 1,
        }
    }

    TimeSeries {
        points: per_day
            .into_iter()
            .map(|(date, count)| DailyVolume { date, count })
            .collect(),
        skipped,
    }
}

pub fn summary(requests: &[Request], currency: &str) -> Summary {
    Summary {
        total_requests: requests.len(),
        status_counts: status_counts(requests),
        supply_demand: supply_demand(requests),
        budget: budget(requests, currency),
        status_chart: status_chart(requests),
        time_series: time_series(requests),
    }
}

fn tally_statuses(requests: &[Request]) -> BTreeMap<RequestStatus, usize> {
    let mut counts = BTreeMap::new();
    for request in requests {
        *counts.entry(request.request_status).or_default() += 1;
    }
    counts
}

/// Counts per supply, sorted by count descending; ties keep catalogue order.
fn tally_supplies(requests: &[Request]) -> Vec<(Supply, usize)> {
    let mut counts: BTreeMap<Supply, usize> = BTreeMap::new();
    for supply in requests.iter().flat_map(|r| r.supplies_needed.iter()) {
        *counts.entry(supply.clone()).or_default() += 1;
    }

    let mut tally: Vec<_> = counts.into_iter().collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}
