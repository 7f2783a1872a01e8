use super::*;

use shared::domain::{LessonType, MembershipTier, SurfaceType};

fn filled(kind: ResourceKind, values: &[(&str, &str)]) -> Draft {
    let mut draft = Draft::empty(kind);
    for (field, value) in values {
        draft.set_field(field, value).expect("known field");
    }
    draft
}

#[test]
fn member_draft_validates_into_typed_payload() {
    let draft = filled(
        ResourceKind::Member,
        &[
            ("name", "Coco Gauff"),
            ("email", "coco@example.com"),
            ("membership_tier", "Junior"),
            ("join_date", "2025-11-02"),
        ],
    );

    let NewEntity::Member(member) = draft.validate().expect("valid member") else {
        panic!("expected member payload");
    };
    assert_eq!(member.name, "Coco Gauff");
    assert_eq!(member.phone, None);
    assert_eq!(member.membership_tier, MembershipTier::Junior);
    assert_eq!(
        member.join_date,
        NaiveDate::from_ymd_opt(2025, 11, 2).expect("date")
    );
}

#[test]
fn missing_required_field_is_reported_in_form_order() {
    let draft = filled(ResourceKind::Member, &[("name", "Coco Gauff")]);

    assert_eq!(
        draft.missing_fields(),
        vec!["email", "membership_tier", "join_date"]
    );
    match draft.validate() {
        Err(ClientError::MissingField { kind, field }) => {
            assert_eq!(kind, ResourceKind::Member);
            assert_eq!(field, "email");
        }
        other => panic!("unexpected validation result: {other:?}"),
    }
}

#[test]
fn blank_value_clears_a_field() {
    let mut draft = filled(ResourceKind::Coach, &[("name", "Ivan"), ("hourly_rate", "80")]);
    draft.set_field("hourly_rate", "   ").expect("known field");

    assert_eq!(draft.field("hourly_rate"), None);
    assert_eq!(draft.missing_fields(), vec!["hourly_rate"]);
}

#[test]
fn field_from_another_kind_is_rejected() {
    let mut draft = Draft::empty(ResourceKind::Member);
    let err = draft
        .set_field("hourly_rate", "80")
        .expect_err("coach field on member draft");

    assert!(matches!(
        err,
        ClientError::UnknownField {
            kind: ResourceKind::Member,
            ref field,
        } if field == "hourly_rate"
    ));
    assert_eq!(draft, Draft::empty(ResourceKind::Member));
}

#[test]
fn coach_optional_fields_may_stay_blank() {
    let draft = filled(ResourceKind::Coach, &[("name", "Ivan"), ("hourly_rate", "82.50")]);

    let NewEntity::Coach(coach) = draft.validate().expect("valid coach") else {
        panic!("expected coach payload");
    };
    assert_eq!(coach.hourly_rate, Decimal::new(8250, 2));
    assert_eq!(coach.specialty, None);
    assert_eq!(coach.weekly_available_hours, None);
}

#[test]
fn unparseable_rate_is_an_invalid_field() {
    let draft = filled(ResourceKind::Coach, &[("name", "Ivan"), ("hourly_rate", "lots")]);

    match draft.validate() {
        Err(ClientError::InvalidField { field, value, .. }) => {
            assert_eq!(field, "hourly_rate");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected validation result: {other:?}"),
    }
}

#[test]
fn court_indoor_defaults_to_outdoor() {
    let outdoor = filled(
        ResourceKind::Court,
        &[("court_name", "Court 7"), ("surface_type", "grass")],
    );
    let indoor = filled(
        ResourceKind::Court,
        &[
            ("court_name", "Court 8"),
            ("surface_type", "hard"),
            ("indoor", "yes"),
        ],
    );

    let NewEntity::Court(outdoor) = outdoor.validate().expect("valid court") else {
        panic!("expected court payload");
    };
    let NewEntity::Court(indoor) = indoor.validate().expect("valid court") else {
        panic!("expected court payload");
    };
    assert!(!outdoor.indoor);
    assert_eq!(outdoor.surface_type, SurfaceType::Grass);
    assert!(indoor.indoor);
}

#[test]
fn booking_draft_parses_references_and_times() {
    let draft = filled(
        ResourceKind::Booking,
        &[
            ("member_id", "12"),
            ("court_id", "3"),
            ("lesson_type", "private"),
            ("booking_date", "2026-01-10"),
            ("start_time", "17:00"),
            ("end_time", "18:00"),
            ("duration_minutes", "60"),
            ("price", "70"),
        ],
    );

    let NewEntity::Booking(booking) = draft.validate().expect("valid booking") else {
        panic!("expected booking payload");
    };
    assert_eq!(booking.member_id, MemberId(12));
    assert_eq!(booking.coach_id, None);
    assert_eq!(booking.court_id, CourtId(3));
    assert_eq!(booking.lesson_type, LessonType::Private);
    assert_eq!(booking.duration_minutes, 60);
}

#[test]
fn negative_price_is_rejected() {
    let draft = filled(
        ResourceKind::Booking,
        &[
            ("member_id", "12"),
            ("court_id", "3"),
            ("lesson_type", "group"),
            ("booking_date", "2026-01-10"),
            ("start_time", "17:00"),
            ("end_time", "18:00"),
            ("duration_minutes", "60"),
            ("price", "-5"),
        ],
    );

    assert!(matches!(
        draft.validate(),
        Err(ClientError::InvalidField { field: "price", .. })
    ));
}
