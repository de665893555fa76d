// Resolution across daylight saving transitions.

use std::collections::HashSet;

use chrono::{DateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::{
    America::{Los_Angeles, New_York, Sao_Paulo},
    Asia::{Kolkata, Tokyo},
    Europe::{London, Paris},
    Tz,
};
use cronexpr::{Cron, CronError};
use rstest::rstest;

fn earliest(tz: Tz, (y, mo, d): (i32, u32, u32), (h, mi, s): (u32, u32, u32)) -> DateTime<Tz> {
    tz.with_ymd_and_hms(y, mo, d, h, mi, s)
        .earliest()
        .expect("existing local time")
}

fn latest(tz: Tz, (y, mo, d): (i32, u32, u32), (h, mi, s): (u32, u32, u32)) -> DateTime<Tz> {
    tz.with_ymd_and_hms(y, mo, d, h, mi, s)
        .latest()
        .expect("existing local time")
}

fn utc_offset_hours(time: &DateTime<Tz>) -> i32 {
    time.offset().fix().local_minus_utc() / 3600
}

#[test]
fn test_daily_time_inside_spring_gap() -> Result<(), CronError> {
    let cron = Cron::parse("0 2 * * *")?;
    let start = earliest(Los_Angeles, (2024, 3, 9), (2, 0, 0));

    let first = cron.next(&start).expect("next day");
    assert_eq!(first, earliest(Los_Angeles, (2024, 3, 10), (3, 0, 0)));
    assert_eq!(utc_offset_hours(&first), -7);

    let second = cron.next(&first).expect("day after");
    assert_eq!(second, earliest(Los_Angeles, (2024, 3, 11), (2, 0, 0)));
    Ok(())
}

#[test]
fn test_daily_time_inside_repeated_hour_fires_once() -> Result<(), CronError> {
    let cron = Cron::parse("30 1 * * *")?;
    let start = earliest(Los_Angeles, (2024, 11, 3), (0, 0, 0));

    let first = cron.next(&start).expect("same day");
    assert_eq!(first, earliest(Los_Angeles, (2024, 11, 3), (1, 30, 0)));
    assert_eq!(utc_offset_hours(&first), -7);

    let second = cron.next(&first).expect("next day");
    assert_eq!(second, earliest(Los_Angeles, (2024, 11, 4), (1, 30, 0)));
    assert_eq!(utc_offset_hours(&second), -8);
    Ok(())
}

#[test]
fn test_hourly_runs_through_repeated_hour() -> Result<(), CronError> {
    let cron = Cron::parse("30 * * * *")?;
    let start = earliest(Los_Angeles, (2024, 11, 3), (0, 0, 0));
    let times: Vec<_> = cron.iter_after(start).take(4).collect();
    assert_eq!(
        times,
        vec![
            earliest(Los_Angeles, (2024, 11, 3), (0, 30, 0)),
            earliest(Los_Angeles, (2024, 11, 3), (1, 30, 0)),
            latest(Los_Angeles, (2024, 11, 3), (1, 30, 0)),
            earliest(Los_Angeles, (2024, 11, 3), (2, 30, 0)),
        ]
    );
    Ok(())
}

#[test]
fn test_top_of_hour_inside_repeated_hour() -> Result<(), CronError> {
    let cron = Cron::parse("0 0 * * * * *")?;
    let start = earliest(Los_Angeles, (2024, 11, 3), (1, 30, 0));
    assert_eq!(cron.next(&start), Some(start + TimeDelta::minutes(30)));
    Ok(())
}

#[rstest]
#[case(London, (2019, 3, 31))]
#[case(London, (2019, 10, 27))]
#[case(Paris, (2019, 3, 31))]
#[case(Paris, (2019, 10, 27))]
#[case(New_York, (2019, 3, 10))]
#[case(New_York, (2019, 11, 3))]
#[case(Los_Angeles, (2019, 3, 10))]
#[case(Los_Angeles, (2019, 11, 3))]
#[case(Tokyo, (2019, 3, 31))]
#[case(Kolkata, (2019, 10, 27))]
fn test_half_hourly_keeps_real_spacing(
    #[case] tz: Tz,
    #[case] date: (i32, u32, u32),
) -> Result<(), CronError> {
    let cron = Cron::parse("0 0/30 * * * * *")?;
    let mut time = earliest(tz, date, (0, 0, 0));
    for _ in 0..8 {
        let next = cron.next(&time).expect("half hourly");
        assert_eq!(next - time.clone(), TimeDelta::minutes(30), "after {time}");
        time = next;
    }
    Ok(())
}

#[rstest]
#[case(London, (2019, 3, 31), (2, 30), (2019, 4, 1))]
#[case(London, (2019, 10, 27), (2, 30), (2019, 10, 28))]
#[case(New_York, (2019, 3, 10), (3, 30), (2019, 3, 11))]
#[case(New_York, (2019, 11, 3), (2, 30), (2019, 11, 4))]
#[case(Sao_Paulo, (2018, 2, 17), (2, 30), (2018, 2, 18))]
fn test_daily_across_transition(
    #[case] tz: Tz,
    #[case] from_date: (i32, u32, u32),
    #[case] time: (u32, u32),
    #[case] expected_date: (i32, u32, u32),
) -> Result<(), CronError> {
    let cron = Cron::parse("0 30 2 * * * *")?;
    let from = earliest(tz, from_date, (time.0, time.1, 0));
    assert_eq!(cron.next(&from), Some(earliest(tz, expected_date, (2, 30, 0))));
    Ok(())
}

#[test]
fn test_daily_gap_moves_forward_by_gap_length() -> Result<(), CronError> {
    let cron = Cron::parse("0 30 2 * * * *")?;
    let from = earliest(New_York, (2019, 3, 9), (2, 30, 0));
    let next = cron.next(&from).expect("next day");
    assert_eq!(next, earliest(New_York, (2019, 3, 10), (3, 30, 0)));
    assert_eq!(utc_offset_hours(&next), -4);
    Ok(())
}

#[test]
fn test_midnight_skipped_by_transition() -> Result<(), CronError> {
    let cron = Cron::parse("0 0 * * *")?;
    let from = earliest(Sao_Paulo, (2018, 11, 3), (12, 0, 0));
    let next = cron.next(&from).expect("next day");
    assert_eq!(next, earliest(Sao_Paulo, (2018, 11, 4), (1, 0, 0)));
    assert_eq!(utc_offset_hours(&next), -2);
    Ok(())
}

#[test]
fn test_single_date_in_offset_zone() -> Result<(), CronError> {
    let cron = Cron::parse("0 59 23 1 9 * 2023")?;
    let from = earliest(Kolkata, (2023, 9, 1), (23, 58, 0));
    assert_eq!(cron.next(&from), Some(from + TimeDelta::minutes(1)));
    Ok(())
}

#[test]
fn test_hour_steps_move_forward() -> Result<(), CronError> {
    let starts = [
        earliest(Los_Angeles, (2024, 3, 10), (0, 0, 0)),
        earliest(Los_Angeles, (2024, 3, 10), (1, 59, 59)),
        earliest(Los_Angeles, (2024, 11, 3), (0, 59, 0)),
        latest(Los_Angeles, (2024, 11, 3), (1, 0, 0)),
        latest(Los_Angeles, (2024, 11, 3), (1, 45, 0)),
    ];
    for step in 1..12 {
        let cron = Cron::parse(&format!("0 0 */{step} * * * *"))?;
        for from in &starts {
            let next = cron.next(from).expect("hour step");
            assert!(next > *from, "*/{step} after {from} gave {next}");
        }
    }
    Ok(())
}

#[rstest]
#[case(Los_Angeles, "0 3-23 * * *", (2024, 3, 10), (1, 30), (3, 0))]
#[case(Los_Angeles, "*/15 3,4 * * *", (2024, 3, 10), (1, 59), (3, 0))]
#[case(London, "0 2-5 * * *", (2024, 3, 31), (0, 30), (2, 0))]
#[case(Paris, "0 3,4 * * *", (2024, 3, 31), (1, 0), (3, 0))]
fn test_first_hour_after_spring_gap(
    #[case] tz: Tz,
    #[case] pattern: &str,
    #[case] date: (i32, u32, u32),
    #[case] from: (u32, u32),
    #[case] expected: (u32, u32),
) -> Result<(), CronError> {
    let cron = Cron::parse(pattern)?;
    let from = earliest(tz, date, (from.0, from.1, 0));
    assert_eq!(
        cron.next(&from),
        Some(earliest(tz, date, (expected.0, expected.1, 0)))
    );
    Ok(())
}

#[test]
fn test_fixed_hours_fire_once_in_repeated_hour() -> Result<(), CronError> {
    let cron = Cron::parse("0 1,2 * * *")?;
    let start = earliest(Los_Angeles, (2024, 11, 3), (0, 0, 0));
    let times: Vec<_> = cron.iter_after(start).take(3).collect();
    assert_eq!(
        times,
        vec![
            earliest(Los_Angeles, (2024, 11, 3), (1, 0, 0)),
            earliest(Los_Angeles, (2024, 11, 3), (2, 0, 0)),
            earliest(Los_Angeles, (2024, 11, 4), (1, 0, 0)),
        ]
    );
    Ok(())
}

// Every matching minute of a window, keeping only the first pass of a
// wall-clock time that the clocks repeat.
fn matching_minutes(cron: &Cron, start: DateTime<Tz>, hours: i64) -> Vec<DateTime<Tz>> {
    let mut seen = HashSet::new();
    (0..hours * 60)
        .map(|minute| start + TimeDelta::minutes(minute))
        .filter(|time| cron.is_time_matching(time))
        .filter(|time| seen.insert(time.naive_local()))
        .collect()
}

#[rstest]
#[case("* * * * *")]
#[case("*/15 * * * *")]
#[case("30 * * * *")]
#[case("0 */2 * * *")]
#[case("30 1,2 * * *")]
#[case("0 1,2 * * *")]
#[case("0 2 * * *")]
#[case("0 0 * * *")]
#[case("0 3-23 * * *")]
#[case("*/15 3,4 * * *")]
#[case("45 2,3 * * *")]
fn test_next_is_earliest_match(#[case] pattern: &str) -> Result<(), CronError> {
    let cron = Cron::parse(pattern)?;
    for date in [(2024, 3, 10), (2024, 11, 3)] {
        let start = earliest(Los_Angeles, date, (0, 0, 0));
        let matches = matching_minutes(&cron, start, 32);
        for minute in 0..4 * 60 {
            let from = start + TimeDelta::minutes(minute);
            let next = cron.next(&from).expect("daily schedule");
            assert!(next > from, "'{pattern}' after {from} gave {next}");

            let skipped = matches[matches.partition_point(|time| *time <= from)..]
                .iter()
                .find(|time| **time < next);
            assert_eq!(skipped, None, "'{pattern}' after {from} gave {next}");
        }
    }
    Ok(())
}

#[test]
fn test_matching_uses_wall_clock() -> Result<(), CronError> {
    let cron = Cron::parse("0 30 1 * * * *")?;
    assert!(cron.is_time_matching(&earliest(Los_Angeles, (2024, 11, 3), (1, 30, 0))));
    assert!(cron.is_time_matching(&latest(Los_Angeles, (2024, 11, 3), (1, 30, 0))));
    assert!(!cron.is_time_matching(&earliest(Los_Angeles, (2024, 11, 3), (2, 30, 0))));
    Ok(())
}
