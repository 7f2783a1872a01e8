use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    clock_time, CoachId, CourtId, LessonType, MemberId, MembershipTier, ResourceKind, SurfaceType,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_members: u64,
    pub total_revenue: Decimal,
    pub bookings_this_month: u64,
    pub revenue_this_month: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Window offered by the dashboard revenue chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ChartPeriod {
    #[default]
    Days30,
    Days90,
    Days180,
    Days365,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 4] = [
        ChartPeriod::Days30,
        ChartPeriod::Days90,
        ChartPeriod::Days180,
        ChartPeriod::Days365,
    ];

    pub fn days(self) -> u32 {
        match self {
            ChartPeriod::Days30 => 30,
            ChartPeriod::Days90 => 90,
            ChartPeriod::Days180 => 180,
            ChartPeriod::Days365 => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartPeriod::Days30 => "30 Days",
            ChartPeriod::Days90 => "3 Months",
            ChartPeriod::Days180 => "6 Months",
            ChartPeriod::Days365 => "1 Year",
        }
    }
}

impl TryFrom<u32> for ChartPeriod {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        ChartPeriod::ALL
            .into_iter()
            .find(|period| period.days() == days)
            .ok_or_else(|| format!("unsupported chart period: {days} days"))
    }
}

impl From<ChartPeriod> for u32 {
    fn from(period: ChartPeriod) -> Self {
        period.days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub membership_tier: MembershipTier,
    pub join_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCoach {
    pub name: String,
    pub specialty: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_available_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourt {
    pub court_name: String,
    pub surface_type: SurfaceType,
    #[serde(default)]
    pub indoor: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub court_id: CourtId,
    pub lesson_type: LessonType,
    pub booking_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A validated create request for exactly one resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NewEntity {
    Member(NewMember),
    Coach(NewCoach),
    Court(NewCourt),
    Booking(NewBooking),
}

impl NewEntity {
    pub fn kind(&self) -> ResourceKind {
        match self {
            NewEntity::Member(_) => ResourceKind::Member,
            NewEntity::Coach(_) => ResourceKind::Coach,
            NewEntity::Court(_) => ResourceKind::Court,
            NewEntity::Booking(_) => ResourceKind::Booking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// One prior exchange resent to the stateless query backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResults {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<QueryResults>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
