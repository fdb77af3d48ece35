use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 現在または次回のレンタル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: i64,
    pub active: bool,
    pub customer: Customer,
    pub rental_period: TimePeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
