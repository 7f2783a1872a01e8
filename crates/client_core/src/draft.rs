//! Typed create-form drafts, one shape per resource kind.
//!
//! Values are held exactly as typed into the form and are only parsed when
//! the draft is submitted.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    domain::{clock_time, CoachId, CourtId, MemberId, ResourceKind},
    protocol::{NewBooking, NewCoach, NewCourt, NewEntity, NewMember},
};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required,
    }
}

pub const MEMBER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", true),
    field("email", "Email", true),
    field("phone", "Phone", false),
    field("membership_tier", "Membership tier (Premium|Standard|Junior)", true),
    field("join_date", "Join date (YYYY-MM-DD)", true),
];

pub const COACH_FIELDS: &[FieldSpec] = &[
    field("name", "Name", true),
    field("specialty", "Specialty", false),
    field("hourly_rate", "Hourly rate", true),
    field("weekly_available_hours", "Weekly hours", false),
];

pub const COURT_FIELDS: &[FieldSpec] = &[
    field("court_name", "Court name", true),
    field("surface_type", "Surface (hard|clay|grass)", true),
    field("indoor", "Indoor (yes|no)", false),
];

pub const BOOKING_FIELDS: &[FieldSpec] = &[
    field("member_id", "Member id", true),
    field("coach_id", "Coach id (optional)", false),
    field("court_id", "Court id", true),
    field(
        "lesson_type",
        "Lesson type (private|semi-private|group|court-rental)",
        true,
    ),
    field("booking_date", "Date (YYYY-MM-DD)", true),
    field("start_time", "Start time (HH:MM)", true),
    field("end_time", "End time (HH:MM)", true),
    field("duration_minutes", "Duration (minutes)", true),
    field("price", "Price", true),
];

pub fn fields_for(kind: ResourceKind) -> &'static [FieldSpec] {
    match kind {
        ResourceKind::Member => MEMBER_FIELDS,
        ResourceKind::Coach => COACH_FIELDS,
        ResourceKind::Court => COURT_FIELDS,
        ResourceKind::Booking => BOOKING_FIELDS,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_tier: Option<String>,
    pub join_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoachDraft {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub hourly_rate: Option<String>,
    pub weekly_available_hours: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourtDraft {
    pub court_name: Option<String>,
    pub surface_type: Option<String>,
    pub indoor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub member_id: Option<String>,
    pub coach_id: Option<String>,
    pub court_id: Option<String>,
    pub lesson_type: Option<String>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<String>,
    pub price: Option<String>,
}

/// In-progress create form. Each variant only carries its own kind's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Member(MemberDraft),
    Coach(CoachDraft),
    Court(CourtDraft),
    Booking(BookingDraft),
}

impl Draft {
    pub fn empty(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Member => Draft::Member(MemberDraft::default()),
            ResourceKind::Coach => Draft::Coach(CoachDraft::default()),
            ResourceKind::Court => Draft::Court(CourtDraft::default()),
            ResourceKind::Booking => Draft::Booking(BookingDraft::default()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Draft::Member(_) => ResourceKind::Member,
            Draft::Coach(_) => ResourceKind::Coach,
            Draft::Court(_) => ResourceKind::Court,
            Draft::Booking(_) => ResourceKind::Booking,
        }
    }

    /// Stores one raw form value. Blank input clears the field.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let kind = self.kind();
        let slot = self
            .slot_mut(field)
            .ok_or_else(|| ClientError::UnknownField {
                kind,
                field: field.to_string(),
            })?;
        let value = value.trim();
        *slot = (!value.is_empty()).then(|| value.to_string());
        Ok(())
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.slot(field).and_then(|slot| slot.as_deref())
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fields_for(self.kind())
            .iter()
            .filter(|spec| spec.required && self.field(spec.name).is_none())
            .map(|spec| spec.name)
            .collect()
    }

    /// Checks required fields and parses the draft into a create payload.
    pub fn validate(&self) -> Result<NewEntity> {
        if let Some(&field) = self.missing_fields().first() {
            return Err(ClientError::MissingField {
                kind: self.kind(),
                field,
            });
        }

        let entity = match self {
            Draft::Member(draft) => NewEntity::Member(NewMember {
                name: present("name", &draft.name)?.to_string(),
                email: present("email", &draft.email)?.to_string(),
                phone: draft.phone.clone(),
                membership_tier: parse(
                    "membership_tier",
                    present("membership_tier", &draft.membership_tier)?,
                )?,
                join_date: parse_date("join_date", present("join_date", &draft.join_date)?)?,
            }),
            Draft::Coach(draft) => NewEntity::Coach(NewCoach {
                name: present("name", &draft.name)?.to_string(),
                specialty: draft.specialty.clone(),
                hourly_rate: parse_money(
                    "hourly_rate",
                    present("hourly_rate", &draft.hourly_rate)?,
                )?,
                weekly_available_hours: draft
                    .weekly_available_hours
                    .as_deref()
                    .map(|raw| parse("weekly_available_hours", raw))
                    .transpose()?,
            }),
            Draft::Court(draft) => NewEntity::Court(NewCourt {
                court_name: present("court_name", &draft.court_name)?.to_string(),
                surface_type: parse("surface_type", present("surface_type", &draft.surface_type)?)?,
                indoor: draft
                    .indoor
                    .as_deref()
                    .map(|raw| parse_flag("indoor", raw))
                    .transpose()?
                    .unwrap_or(false),
            }),
            Draft::Booking(draft) => NewEntity::Booking(NewBooking {
                member_id: MemberId(parse("member_id", present("member_id", &draft.member_id)?)?),
                coach_id: draft
                    .coach_id
                    .as_deref()
                    .map(|raw| parse("coach_id", raw).map(CoachId))
                    .transpose()?,
                court_id: CourtId(parse("court_id", present("court_id", &draft.court_id)?)?),
                lesson_type: parse("lesson_type", present("lesson_type", &draft.lesson_type)?)?,
                booking_date: parse_date(
                    "booking_date",
                    present("booking_date", &draft.booking_date)?,
                )?,
                start_time: parse_time("start_time", present("start_time", &draft.start_time)?)?,
                end_time: parse_time("end_time", present("end_time", &draft.end_time)?)?,
                duration_minutes: parse(
                    "duration_minutes",
                    present("duration_minutes", &draft.duration_minutes)?,
                )?,
                price: parse_money("price", present("price", &draft.price)?)?,
            }),
        };
        Ok(entity)
    }

    fn slot(&self, field: &str) -> Option<&Option<String>> {
        let slot = match self {
            Draft::Member(draft) => match field {
                "name" => &draft.name,
                "email" => &draft.email,
                "phone" => &draft.phone,
                "membership_tier" => &draft.membership_tier,
                "join_date" => &draft.join_date,
                _ => return None,
            },
            Draft::Coach(draft) => match field {
                "name" => &draft.name,
                "specialty" => &draft.specialty,
                "hourly_rate" => &draft.hourly_rate,
                "weekly_available_hours" => &draft.weekly_available_hours,
                _ => return None,
            },
            Draft::Court(draft) => match field {
                "court_name" => &draft.court_name,
                "surface_type" => &draft.surface_type,
                "indoor" => &draft.indoor,
                _ => return None,
            },
            Draft::Booking(draft) => match field {
                "member_id" => &draft.member_id,
                "coach_id" => &draft.coach_id,
                "court_id" => &draft.court_id,
                "lesson_type" => &draft.lesson_type,
                "booking_date" => &draft.booking_date,
                "start_time" => &draft.start_time,
                "end_time" => &draft.end_time,
                "duration_minutes" => &draft.duration_minutes,
                "price" => &draft.price,
                _ => return None,
            },
        };
        Some(slot)
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut Option<String>> {
        let slot = match self {
            Draft::Member(draft) => match field {
                "name" => &mut draft.name,
                "email" => &mut draft.email,
                "phone" => &mut draft.phone,
                "membership_tier" => &mut draft.membership_tier,
                "join_date" => &mut draft.join_date,
                _ => return None,
            },
            Draft::Coach(draft) => match field {
                "name" => &mut draft.name,
                "specialty" => &mut draft.specialty,
                "hourly_rate" => &mut draft.hourly_rate,
                "weekly_available_hours" => &mut draft.weekly_available_hours,
                _ => return None,
            },
            Draft::Court(draft) => match field {
                "court_name" => &mut draft.court_name,
                "surface_type" => &mut draft.surface_type,
                "indoor" => &mut draft.indoor,
                _ => return None,
            },
            Draft::Booking(draft) => match field {
                "member_id" => &mut draft.member_id,
                "coach_id" => &mut draft.coach_id,
                "court_id" => &mut draft.court_id,
                "lesson_type" => &mut draft.lesson_type,
                "booking_date" => &mut draft.booking_date,
                "start_time" => &mut draft.start_time,
                "end_time" => &mut draft.end_time,
                "duration_minutes" => &mut draft.duration_minutes,
                "price" => &mut draft.price,
                _ => return None,
            },
        };
        Some(slot)
    }
}

// `missing_fields` has already run, so a blank slot here means the field
// table and the draft shape disagree.
fn present<'a>(field: &'static str, slot: &'a Option<String>) -> Result<&'a str> {
    slot.as_deref().ok_or_else(|| ClientError::InvalidField {
        field,
        value: String::new(),
        reason: "value is required".to_string(),
    })
}

fn invalid(field: &'static str, value: &str, reason: impl Display) -> ClientError {
    ClientError::InvalidField {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(field: &'static str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|err| invalid(field, raw, err))
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| invalid(field, raw, err))
}

fn parse_time(field: &'static str, raw: &str) -> Result<chrono::NaiveTime> {
    clock_time::parse(raw).map_err(|err| invalid(field, raw, err))
}

fn parse_money(field: &'static str, raw: &str) -> Result<Decimal> {
    let amount: Decimal = parse(field, raw)?;
    if amount.is_sign_negative() {
        return Err(invalid(field, raw, "amount must not be negative"));
    }
    Ok(amount)
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(invalid(field, raw, "expected yes or no")),
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
