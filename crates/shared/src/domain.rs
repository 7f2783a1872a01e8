use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(MemberId);
id_newtype!(CoachId);
id_newtype!(CourtId);
id_newtype!(BookingId);

/// The four entity categories managed by the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Member,
    Coach,
    Court,
    Booking,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Member,
        ResourceKind::Coach,
        ResourceKind::Court,
        ResourceKind::Booking,
    ];

    /// Collection segment used by the admin REST API (`/admin/{segment}`).
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Member => "members",
            ResourceKind::Coach => "coaches",
            ResourceKind::Court => "courts",
            ResourceKind::Booking => "bookings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Member => "Member",
            ResourceKind::Coach => "Coach",
            ResourceKind::Court => "Court",
            ResourceKind::Booking => "Booking",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value:?}")]
pub struct ParseEnumError {
    pub what: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" | "members" => Ok(ResourceKind::Member),
            "coach" | "coaches" => Ok(ResourceKind::Coach),
            "court" | "courts" => Ok(ResourceKind::Court),
            "booking" | "bookings" => Ok(ResourceKind::Booking),
            _ => Err(ParseEnumError::new("resource kind", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipTier {
    Premium,
    Standard,
    Junior,
}

impl FromStr for MembershipTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Premium" => Ok(MembershipTier::Premium),
            "Standard" => Ok(MembershipTier::Standard),
            "Junior" => Ok(MembershipTier::Junior),
            _ => Err(ParseEnumError::new("membership tier", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    Hard,
    Clay,
    Grass,
}

impl FromStr for SurfaceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hard" => Ok(SurfaceType::Hard),
            "clay" => Ok(SurfaceType::Clay),
            "grass" => Ok(SurfaceType::Grass),
            _ => Err(ParseEnumError::new("surface type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonType {
    Private,
    SemiPrivate,
    Group,
    CourtRental,
}

impl FromStr for LessonType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "private" => Ok(LessonType::Private),
            "semi-private" => Ok(LessonType::SemiPrivate),
            "group" => Ok(LessonType::Group),
            "court-rental" => Ok(LessonType::CourtRental),
            _ => Err(ParseEnumError::new("lesson type", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub membership_tier: MembershipTier,
    pub join_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub coach_id: CoachId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    pub hourly_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_available_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub court_id: CourtId,
    pub court_name: String,
    pub surface_type: SurfaceType,
    #[serde(default, deserialize_with = "flag_from_int_or_bool")]
    pub indoor: bool,
}

/// Booking as returned by the read view, including server-joined display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub member_id: MemberId,
    #[serde(default)]
    pub coach_id: Option<CoachId>,
    pub court_id: CourtId,
    pub lesson_type: LessonType,
    pub booking_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub price: Decimal,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub member_name: String,
    #[serde(default)]
    pub coach_name: Option<String>,
    pub court_name: String,
}

/// The server stores `indoor` as an SQLite integer, so accept 0/1 as well as booleans.
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        None => false,
    })
}

/// `HH:MM` wall-clock times as produced by the booking form; `HH:MM:SS` is accepted on input.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
