//! Unit tests for weekday frequency matching

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use habitrack::habits::{is_due, Frequency, FrequencyError, WEEKDAY_NAMES};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Every weekday name matches exactly its own day
#[test]
fn test_each_weekday_name_matches_its_day() {
    for (offset, name) in WEEKDAY_NAMES.iter().enumerate() {
        let day = monday() + Duration::days(offset as i64);
        for other in 0..7 {
            let candidate = monday() + Duration::days(other);
            assert_eq!(
                is_due(name, candidate).unwrap(),
                candidate == day,
                "{} vs {}",
                name,
                candidate
            );
        }
    }
}

#[test]
fn test_mon_wed_fri_over_a_month() {
    let mut due_days = 0;
    for offset in 0..28 {
        let day = monday() + Duration::days(offset);
        let due = is_due("Lunes,Miércoles,Viernes", day).unwrap();
        assert_eq!(
            due,
            matches!(day.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri)
        );
        due_days += due as u32;
    }
    assert_eq!(due_days, 12);
}

#[test]
fn test_daily_matches_every_day() {
    for offset in 0..366 {
        assert!(is_due("daily", monday() + Duration::days(offset)).unwrap());
    }
}

#[test]
fn test_duplicates_do_not_change_meaning() {
    assert_eq!(
        Frequency::parse("Lunes,Lunes,Martes").unwrap(),
        Frequency::parse("Martes,Lunes").unwrap()
    );
}

#[test]
fn test_malformed_descriptors() {
    for descriptor in ["", ",,", "DAILY", "Monday", "Lunes;Martes"] {
        assert!(
            matches!(
                Frequency::parse(descriptor),
                Err(FrequencyError::InvalidFrequency(_))
            ),
            "{:?} should be invalid",
            descriptor
        );
    }
}

#[test]
fn test_descriptor_roundtrip_is_canonical() {
    let parsed = Frequency::parse("Domingo, Sabado ,Lunes").unwrap();
    assert_eq!(parsed.descriptor(), "Lunes,Sábado,Domingo");
    assert_eq!(Frequency::parse(&parsed.descriptor()).unwrap(), parsed);
}
