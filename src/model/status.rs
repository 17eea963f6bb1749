use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The employee's own situation at the time of the request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Situation {
    Safe,
    Evacuated,
    #[serde(rename = "In Need of Help")]
    #[strum(serialize = "In Need of Help")]
    InNeedOfHelp,
}

/// Lifecycle of a request. Any status may move to any other.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Delivered,
    Rejected,
}
