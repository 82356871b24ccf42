//! Publication slot planning.
//!
//! Local times are Asia/Tashkent, which is a fixed UTC+5 with no DST.

use anyhow::bail;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

/// Posts generated per run.
pub const POSTS_PER_RUN: usize = 7;

/// Daily slots, local hour of day.
pub const DAILY_SLOT_HOURS: [u32; POSTS_PER_RUN] = [9, 11, 13, 15, 17, 19, 21];

const TASHKENT_OFFSET_SECS: i32 = 5 * 3600;

/// How far apart the generated posts are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleMode {
    /// One post per minute starting a minute from now (testing).
    Fast,
    /// The fixed daily slots, today if the first slot is still ahead, else tomorrow.
    #[default]
    Daily,
}

impl std::str::FromStr for ScheduleMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(ScheduleMode::Fast),
            "daily" => Ok(ScheduleMode::Daily),
            other => bail!("Invalid BLOG_SCHEDULE_MODE: {} (expected fast|daily)", other),
        }
    }
}

pub fn tashkent() -> FixedOffset {
    FixedOffset::east_opt(TASHKENT_OFFSET_SECS).expect("UTC+5 is a valid offset")
}

/// Start of the current Tashkent calendar day, as a UTC instant.
pub fn start_of_local_day(now: DateTime<Utc>) -> DateTime<Utc> {
    local_instant(now.with_timezone(&tashkent()).date_naive(), NaiveTime::MIN)
}

/// The `POSTS_PER_RUN` publication times for a run started at `now`,
/// strictly increasing.
pub fn publish_slots(mode: ScheduleMode, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    match mode {
        ScheduleMode::Fast => (1..=POSTS_PER_RUN as i64)
            .map(|i| now + Duration::minutes(i))
            .collect(),
        ScheduleMode::Daily => {
            let local_now = now.with_timezone(&tashkent());
            let first_slot = slot_time(DAILY_SLOT_HOURS[0]);

            let mut day = local_now.date_naive();
            if local_now.time() >= first_slot {
                day = day.succ_opt().unwrap_or(day);
            }

            DAILY_SLOT_HOURS
                .iter()
                .map(|hour| local_instant(day, slot_time(*hour)))
                .collect()
        }
    }
}

fn slot_time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn local_instant(day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    // Fixed offsets have no gaps, so the local -> UTC mapping is exact.
    let naive_utc = day.and_time(time) - Duration::seconds(TASHKENT_OFFSET_SECS as i64);
    naive_utc.and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn fast_mode_spaces_posts_one_minute_apart() {
        let now = utc(2025, 3, 1, 10, 0);
        let slots = publish_slots(ScheduleMode::Fast, now);

        assert_eq!(slots.len(), POSTS_PER_RUN);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(*slot, now + Duration::minutes(i as i64 + 1));
        }
    }

    #[test]
    fn daily_mode_after_first_slot_uses_tomorrow() {
        // 23:00 Tashkent on 1 March
        let now = utc(2025, 3, 1, 18, 0);
        let slots = publish_slots(ScheduleMode::Daily, now);

        let local: Vec<_> = slots.iter().map(|s| s.with_timezone(&tashkent())).collect();
        assert_eq!(local[0].date_naive(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        let hours: Vec<u32> = local.iter().map(|s| s.hour()).collect();
        assert_eq!(hours, DAILY_SLOT_HOURS.to_vec());
        assert_eq!(slots[0], utc(2025, 3, 2, 4, 0));
    }

    #[test]
    fn daily_mode_before_first_slot_uses_today() {
        // 07:30 Tashkent on 1 March
        let now = utc(2025, 3, 1, 2, 30);
        let slots = publish_slots(ScheduleMode::Daily, now);

        assert_eq!(slots[0], utc(2025, 3, 1, 4, 0));
        assert_eq!(slots[6], utc(2025, 3, 1, 16, 0));
    }

    #[test]
    fn slots_are_strictly_increasing_and_in_the_future() {
        for now in [utc(2025, 1, 1, 0, 0), utc(2025, 6, 30, 18, 0), utc(2025, 12, 31, 23, 59)] {
            for mode in [ScheduleMode::Fast, ScheduleMode::Daily] {
                let slots = publish_slots(mode, now);
                assert!(slots.windows(2).all(|w| w[0] < w[1]));
                assert!(slots.iter().all(|s| *s > now));
            }
        }
    }

    #[test]
    fn local_day_starts_at_tashkent_midnight() {
        // 20:00 UTC is already the next day in Tashkent
        assert_eq!(start_of_local_day(utc(2025, 3, 1, 20, 0)), utc(2025, 3, 1, 19, 0));
        assert_eq!(start_of_local_day(utc(2025, 3, 1, 10, 0)), utc(2025, 2, 28, 19, 0));
    }

    #[test]
    fn schedule_mode_parses() {
        assert_eq!("FAST".parse::<ScheduleMode>().unwrap(), ScheduleMode::Fast);
        assert_eq!("daily".parse::<ScheduleMode>().unwrap(), ScheduleMode::Daily);
        assert!("hourly".parse::<ScheduleMode>().is_err());
    }
}
