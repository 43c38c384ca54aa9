//! Calendar systems for month-boundary computations
//!
//! Overdue bookkeeping needs "the first day of the current month", and which
//! month a date falls in depends on the calendar the building operates under.
//! The Jalali conversion uses the standard 33-year-cycle arithmetic with the
//! published break-point table, working through Julian day numbers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar system used for month boundaries and year/month display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    /// Gregorian calendar months
    #[default]
    Gregorian,
    /// Persian (Jalali) calendar months
    Jalali,
}

impl CalendarSystem {
    /// Parse a calendar system from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gregorian" => Some(Self::Gregorian),
            "jalali" | "persian" => Some(Self::Jalali),
            _ => None,
        }
    }

    /// The year and month of `date` in this calendar
    pub fn year_month(&self, date: NaiveDate) -> (i32, u32) {
        match self {
            Self::Gregorian => (date.year(), date.month()),
            Self::Jalali => {
                let (jy, jm, _) = jalali_from_jdn(jdn_from_date(date));
                (jy as i32, jm as u32)
            }
        }
    }

    /// The first day of the calendar month containing `date`
    pub fn month_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Gregorian => date.with_day(1).expect("day 1 exists in every month"),
            Self::Jalali => {
                let (jy, jm, _) = jalali_from_jdn(jdn_from_date(date));
                date_from_jdn(jdn_from_jalali(jy, jm, 1))
            }
        }
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gregorian => write!(f, "gregorian"),
            Self::Jalali => write!(f, "jalali"),
        }
    }
}

/// Jalali years in which the leap-year pattern shifts
const BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

struct JalCycle {
    leap: i64,
    gy: i64,
    march: i64,
}

/// Leap-year and March-offset data for a Jalali year
///
/// All division here is truncated (Rust's `/` and `%`), matching the
/// reference arithmetic.
fn jal_cal(jy: i64) -> JalCycle {
    let gy = jy + 621;
    let mut leap_j = -14i64;
    let mut jp = BREAKS[0];
    let mut jump = 0i64;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += (jump / 33) * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += (n / 33) * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - ((gy / 100 + 1) * 3) / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + ((jump + 4) / 33) * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    JalCycle { leap, gy, march }
}

/// Julian day number of a Gregorian date
fn jdn_from_gregorian(gy: i64, gm: i64, gd: i64) -> i64 {
    let mut d =
        ((gy + (gm - 8) / 6 + 100100) * 1461) / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd - 34840408;
    d = d - (((gy + 100100 + (gm - 8) / 6) / 100) * 3) / 4 + 752;
    d
}

/// Gregorian date of a Julian day number
fn gregorian_from_jdn(jdn: i64) -> (i64, i64, i64) {
    let mut j = 4 * jdn + 139361631;
    j += (((4 * jdn + 183187720) / 146097) * 3 / 4) * 4 - 3908;
    let i = ((j % 1461) / 4) * 5 + 308;
    let gd = (i % 153) / 5 + 1;
    let gm = (i / 153) % 12 + 1;
    let gy = j / 1461 - 100100 + (8 - gm) / 6;
    (gy, gm, gd)
}

/// Julian day number of a Jalali date
fn jdn_from_jalali(jy: i64, jm: i64, jd: i64) -> i64 {
    let r = jal_cal(jy);
    jdn_from_gregorian(r.gy, 3, r.march) + (jm - 1) * 31 - (jm / 7) * (jm - 7) + jd - 1
}

/// Jalali date of a Julian day number
fn jalali_from_jdn(jdn: i64) -> (i64, i64, i64) {
    let (gy, _, _) = gregorian_from_jdn(jdn);
    let mut jy = gy - 621;
    let r = jal_cal(jy);
    let jdn1f = jdn_from_gregorian(gy, 3, r.march);
    let mut k = jdn - jdn1f;

    if k >= 0 {
        if k <= 185 {
            return (jy, 1 + k / 31, k % 31 + 1);
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        // Leap status of the year the JDN's March belongs to, not jy - 1
        if r.leap == 1 {
            k += 1;
        }
    }

    let jm = 7 + k / 30;
    let jd = k % 30 + 1;
    (jy, jm, jd)
}

fn jdn_from_date(date: NaiveDate) -> i64 {
    jdn_from_gregorian(date.year() as i64, date.month() as i64, date.day() as i64)
}

fn date_from_jdn(jdn: i64) -> NaiveDate {
    let (gy, gm, gd) = gregorian_from_jdn(jdn);
    NaiveDate::from_ymd_opt(gy as i32, gm as u32, gd as u32)
        .expect("JDN conversion yields a valid Gregorian date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_nowruz_dates() {
        // 1403-01-01 = 2024-03-20, 1404-01-01 = 2025-03-21
        assert_eq!(
            CalendarSystem::Jalali.year_month(date(2024, 3, 20)),
            (1403, 1)
        );
        assert_eq!(
            CalendarSystem::Jalali.year_month(date(2025, 3, 21)),
            (1404, 1)
        );
    }

    #[test]
    fn test_leap_year_end() {
        // 1403 is a leap year; its Esfand has 30 days, ending 2025-03-20
        let (jy, jm, jd) = jalali_from_jdn(jdn_from_date(date(2025, 3, 20)));
        assert_eq!((jy, jm, jd), (1403, 12, 30));
    }

    #[test]
    fn test_winter_dates_after_leap_nowruz() {
        // 1403 began 2024-03-20 and is a leap year; dates between the
        // Gregorian new year and the next Nowruz must not drift a day early
        assert_eq!(
            jalali_from_jdn(jdn_from_date(date(2025, 1, 20))),
            (1403, 11, 1)
        );
        // Bahman 1 starts its own month
        assert_eq!(
            CalendarSystem::Jalali.month_start(date(2025, 1, 20)),
            date(2025, 1, 20)
        );
        assert_eq!(
            CalendarSystem::Jalali.month_start(date(2025, 2, 10)),
            date(2025, 1, 20)
        );
    }

    #[test]
    fn test_jalali_round_trip() {
        for gdate in [
            date(2021, 3, 21),
            date(2024, 12, 31),
            date(2025, 8, 29),
            date(1999, 1, 1),
        ] {
            let jdn = jdn_from_date(gdate);
            let (jy, jm, jd) = jalali_from_jdn(jdn);
            assert_eq!(date_from_jdn(jdn_from_jalali(jy, jm, jd)), gdate);
        }
    }

    #[test]
    fn test_gregorian_month_start() {
        assert_eq!(
            CalendarSystem::Gregorian.month_start(date(2025, 8, 29)),
            date(2025, 8, 1)
        );
        assert_eq!(
            CalendarSystem::Gregorian.month_start(date(2025, 2, 1)),
            date(2025, 2, 1)
        );
    }

    #[test]
    fn test_jalali_month_start() {
        // 2025-08-29 falls in Shahrivar 1404, which begins 2025-08-23
        assert_eq!(
            CalendarSystem::Jalali.month_start(date(2025, 8, 29)),
            date(2025, 8, 23)
        );
        // 2024-12-31 falls in Dey 1403, which begins 2024-12-21
        assert_eq!(
            CalendarSystem::Jalali.month_start(date(2024, 12, 31)),
            date(2024, 12, 21)
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            CalendarSystem::parse("jalali"),
            Some(CalendarSystem::Jalali)
        );
        assert_eq!(
            CalendarSystem::parse("Persian"),
            Some(CalendarSystem::Jalali)
        );
        assert_eq!(
            CalendarSystem::parse("gregorian"),
            Some(CalendarSystem::Gregorian)
        );
        assert_eq!(CalendarSystem::parse("lunar"), None);
        assert_eq!(CalendarSystem::Jalali.to_string(), "jalali");
    }
}
