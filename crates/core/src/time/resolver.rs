//! Natural-language time resolution

use chrono::offset::LocalResult;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use invitekit_domain::{EndTimeResponse, InviteKitError, Result};
use regex::Captures;
use tracing::{debug, warn};

use super::patterns::{
    month_from_name, weekday_from_cjk, weekday_from_name, AT_HOUR, CJK_DATE, CJK_TIME, CJK_WEEKDAY,
    CLOCK_TIME, DAY_MONTH, IN_N_UNITS, ISO_DATE, MONTH_DAY, NAMED_TIME, RELATIVE_DAY, SLASH_DATE,
    WEEKDAY, YEAR, ZONED_DATETIME,
};
use crate::settings::PipelineSettings;

/// Default hour for "tonight" when no clock time is given
const TONIGHT_HOUR: u32 = 20;

/// A calendar date found in the text, possibly without a year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateToken {
    Full(NaiveDate),
    MonthDay { month: u32, day: u32 },
}

/// Date part of an expression after relative words are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DatePart {
    date: NaiveDate,
    evening: bool,
}

/// Converts fuzzy time expressions into UTC instants.
///
/// Resolution is anchored to a caller-supplied reference instant and the
/// home timezone fixed at construction, so the same inputs always produce
/// the same instant.
#[derive(Debug, Clone)]
pub struct TimeResolver {
    home_timezone: Tz,
    default_duration: Duration,
}

impl TimeResolver {
    pub fn new(home_timezone: Tz, default_duration: Duration) -> Self {
        Self { home_timezone, default_duration }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.home_timezone, settings.default_duration)
    }

    pub fn home_timezone(&self) -> Tz {
        self.home_timezone
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Resolve `expression` in the home timezone
    ///
    /// # Errors
    /// `TimeParse` when no date or time token is recognised, including the
    /// `"unknown"` sentinel.
    pub fn resolve(&self, expression: &str, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.resolve_in(expression, reference, self.home_timezone)
    }

    /// Resolve `expression` against an explicit timezone
    pub fn resolve_in(
        &self,
        expression: &str,
        reference: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<DateTime<Utc>> {
        let text = expression.trim();
        if invitekit_domain::constants::is_unknown(text) {
            return Err(InviteKitError::TimeParse(format!(
                "no time information in {expression:?}"
            )));
        }

        if let Some(instant) = zoned_datetime(text) {
            debug!(expression = text, %instant, "Resolved zone-qualified timestamp");
            return Ok(instant);
        }

        let local_reference = reference.with_timezone(&timezone);
        let today = local_reference.date_naive();

        let date_part = date_part(text, today);
        let time = clock_time(text);

        let resolved = match (date_part, time) {
            (None, None) => {
                return Err(InviteKitError::TimeParse(format!(
                    "no recognisable date or time in {expression:?}"
                )))
            }
            (Some(part), Some(time)) => localize(timezone, part.date.and_time(evening(part, time)))?,
            (Some(part), None) => {
                let time = if part.evening { hms(TONIGHT_HOUR, 0, 0)? } else { NaiveTime::MIN };
                localize(timezone, part.date.and_time(time))?
            }
            (None, Some(time)) => {
                let candidate = localize(timezone, today.and_time(time.clock))?;
                if candidate >= reference {
                    candidate
                } else {
                    let tomorrow = today.succ_opt().ok_or_else(|| out_of_range(expression))?;
                    localize(timezone, tomorrow.and_time(time.clock))?
                }
            }
        };

        debug!(expression = text, %resolved, %timezone, "Resolved time expression");
        Ok(resolved)
    }

    /// Resolve the end of an event that starts at `start`.
    ///
    /// An explicit end that resolves to an instant after `start` wins;
    /// anything else falls back to `start + default_duration`. Never fails.
    pub fn resolve_end(
        &self,
        end: &EndTimeResponse,
        start: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let fallback = start + self.default_duration;

        let Some(expression) = end.expression() else {
            debug!(%fallback, "No explicit end time, using default duration");
            return fallback;
        };

        match self.resolve(expression, reference) {
            Ok(instant) if instant > start => instant,
            Ok(instant) => {
                warn!(%instant, %start, "Explicit end time is not after start, using default duration");
                fallback
            }
            Err(error) => {
                warn!(%error, "Could not resolve explicit end time, using default duration");
                fallback
            }
        }
    }
}

/// Clock time plus whether it carried an explicit am/pm marker
#[derive(Debug, Clone, Copy)]
struct ClockTime {
    clock: NaiveTime,
    has_meridiem: bool,
}

/// "tonight at 8" means 20:00
fn evening(part: DatePart, time: ClockTime) -> NaiveTime {
    if part.evening && !time.has_meridiem && time.clock.hour() < 12 {
        time.clock.with_hour(time.clock.hour() + 12).unwrap_or(time.clock)
    } else {
        time.clock
    }
}

/// Interpret a naive local time in `timezone`.
///
/// Ambiguous times take the earlier instant; times inside a DST gap move
/// forward by one hour.
fn localize(timezone: Tz, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            warn!(%naive, %timezone, "Local time falls in a DST gap, shifting forward");
            timezone
                .from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    InviteKitError::TimeParse(format!("{naive} does not exist in {timezone}"))
                })
        }
    }
}

fn hms(hour: u32, minute: u32, second: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        InviteKitError::TimeParse(format!("invalid time {hour:02}:{minute:02}:{second:02}"))
    })
}

fn out_of_range(expression: &str) -> InviteKitError {
    InviteKitError::TimeParse(format!("date out of range in {expression:?}"))
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn zoned_datetime(text: &str) -> Option<DateTime<Utc>> {
    ZONED_DATETIME.captures_iter(text).find_map(|caps| {
        let date = NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
        let time = NaiveTime::from_hms_opt(
            number(&caps, 4)?,
            number(&caps, 5)?,
            number(&caps, 6).unwrap_or(0),
        )?;
        let offset = parse_offset(caps.get(7)?.as_str())?;
        offset.from_local_datetime(&date.and_time(time)).single().map(|dt| dt.with_timezone(&Utc))
    })
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Find the date the expression refers to, if any.
///
/// Explicit dates win over relative words, which win over weekdays.
fn date_part(text: &str, today: NaiveDate) -> Option<DatePart> {
    let evening = RELATIVE_DAY.captures(text).is_some_and(|caps| {
        caps.get(0).is_some_and(|m| {
            let word = m.as_str().to_lowercase();
            word == "tonight" || word == "今晚"
        })
    });

    if let Some(token) = explicit_date(text) {
        let date = match token {
            DateToken::Full(date) => Some(date),
            DateToken::MonthDay { month, day } => {
                let year = stray_year(text).unwrap_or_else(|| today.year());
                NaiveDate::from_ymd_opt(year, month, day)
            }
        };
        if let Some(date) = date {
            return Some(DatePart { date, evening });
        }
    }

    relative_date(text, today)
        .or_else(|| weekday_date(text, today))
        .map(|date| DatePart { date, evening })
}

fn explicit_date(text: &str) -> Option<DateToken> {
    let iso = || {
        ISO_DATE.captures_iter(text).find_map(|caps| {
            NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)
                .map(DateToken::Full)
        })
    };

    let cjk = || {
        CJK_DATE.captures_iter(text).find_map(|caps| {
            let month: u32 = number(&caps, 2)?;
            let day: u32 = number(&caps, 3)?;
            month_day_token(number(&caps, 1), month, day)
        })
    };

    let month_day = || {
        MONTH_DAY.captures_iter(text).find_map(|caps| {
            let month = month_from_name(caps.get(1)?.as_str())?;
            month_day_token(number(&caps, 3), month, number(&caps, 2)?)
        })
    };

    let day_month = || {
        DAY_MONTH.captures_iter(text).find_map(|caps| {
            let month = month_from_name(caps.get(2)?.as_str())?;
            month_day_token(number(&caps, 3), month, number(&caps, 1)?)
        })
    };

    let slash = || {
        SLASH_DATE.captures_iter(text).find_map(|caps| {
            let year = caps.get(3).and_then(|m| {
                let value: i32 = m.as_str().parse().ok()?;
                Some(if m.as_str().len() == 2 { 2000 + value } else { value })
            });
            month_day_token(year, number(&caps, 1)?, number(&caps, 2)?)
        })
    };

    iso().or_else(cjk).or_else(month_day).or_else(day_month).or_else(slash)
}

fn month_day_token(year: Option<i32>, month: u32, day: u32) -> Option<DateToken> {
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day).map(DateToken::Full),
        // Feb 29 is checked once the year is known
        None if (1..=12).contains(&month) && (1..=31).contains(&day) => {
            Some(DateToken::MonthDay { month, day })
        }
        None => None,
    }
}

fn stray_year(text: &str) -> Option<i32> {
    YEAR.captures(text).and_then(|caps| number(&caps, 1))
}

fn relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = RELATIVE_DAY.captures(text) {
        let word = caps.get(0)?.as_str().to_lowercase();
        let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
        let offset = match word.as_str() {
            "today" | "tonight" | "今天" | "今晚" => 0,
            "tomorrow" | "明天" => 1,
            "day after tomorrow" | "后天" | "後天" => 2,
            "大后天" => 3,
            "yesterday" | "昨天" => -1,
            _ => return None,
        };
        return today.checked_add_signed(Duration::try_days(offset)?);
    }

    let caps = IN_N_UNITS.captures(text)?;
    let count: i64 = number(&caps, 1)?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();
    let delta =
        if unit.starts_with("week") { Duration::try_weeks(count)? } else { Duration::try_days(count)? };
    today.checked_add_signed(delta)
}

fn weekday_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let english = WEEKDAY.captures(text).and_then(|caps| {
        let weekday = weekday_from_name(caps.get(2)?.as_str())?;
        let strictly_after =
            caps.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case("next"));
        Some((weekday, strictly_after))
    });

    let cjk = || {
        CJK_WEEKDAY.captures(text).and_then(|caps| {
            let weekday = weekday_from_cjk(caps.get(2)?.as_str())?;
            Some((weekday, caps.get(1).is_some_and(|m| m.as_str() == "下")))
        })
    };

    let (weekday, strictly_after) = english.or_else(cjk)?;
    today.checked_add_signed(Duration::try_days(days_until(today.weekday(), weekday, strictly_after))?)
}

/// Days from `from` to the next `target`: 0–6 ahead, or 1–7 when
/// `strictly_after` is set
fn days_until(from: Weekday, target: Weekday, strictly_after: bool) -> i64 {
    let ahead =
        (7 + i64::from(target.num_days_from_monday()) - i64::from(from.num_days_from_monday())) % 7;
    if strictly_after && ahead == 0 {
        7
    } else {
        ahead
    }
}

fn clock_time(text: &str) -> Option<ClockTime> {
    cjk_time(text)
        .or_else(|| latin_time(text))
        .or_else(|| named_time(text))
        .or_else(|| at_hour(text))
}

fn cjk_time(text: &str) -> Option<ClockTime> {
    CJK_TIME.captures_iter(text).find_map(|caps| {
        let period = caps.get(1).map(|m| m.as_str());
        let uses_marker = caps.get(4).is_some();
        if period.is_none() && !uses_marker {
            return None;
        }

        let mut hour: u32 = number(&caps, 2)?;
        let minute: u32 = if caps.get(6).is_some() {
            30
        } else {
            number(&caps, 3).or_else(|| number(&caps, 5)).unwrap_or(0)
        };

        match period {
            Some("下午" | "傍晚" | "晚上") if hour < 12 => hour += 12,
            Some("中午") if hour < 6 => hour += 12,
            Some("上午" | "早上" | "凌晨") if hour == 12 => hour = 0,
            _ => {}
        }

        Some(ClockTime { clock: NaiveTime::from_hms_opt(hour, minute, 0)?, has_meridiem: period.is_some() })
    })
}

fn latin_time(text: &str) -> Option<ClockTime> {
    CLOCK_TIME.captures_iter(text).find_map(|caps| {
        let minute = caps.get(2);
        let meridiem = caps.get(4).map(|m| m.as_str().to_ascii_lowercase());
        if minute.is_none() && meridiem.is_none() {
            return None;
        }

        let mut hour: u32 = number(&caps, 1)?;
        let minute: u32 = number(&caps, 2).unwrap_or(0);
        let second: u32 = number(&caps, 3).unwrap_or(0);

        if let Some(meridiem) = &meridiem {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let pm = meridiem.starts_with('p');
            hour = match (pm, hour) {
                (true, 12) => 12,
                (true, h) => h + 12,
                (false, 12) => 0,
                (false, h) => h,
            };
        }

        Some(ClockTime {
            clock: NaiveTime::from_hms_opt(hour, minute, second)?,
            has_meridiem: meridiem.is_some(),
        })
    })
}

/// `at 9` with neither minutes nor am/pm reads as a 24-hour clock hour
fn at_hour(text: &str) -> Option<ClockTime> {
    let hour: u32 = number(&AT_HOUR.captures(text)?, 1)?;
    Some(ClockTime { clock: NaiveTime::from_hms_opt(hour, 0, 0)?, has_meridiem: false })
}

fn named_time(text: &str) -> Option<ClockTime> {
    let caps = NAMED_TIME.captures(text)?;
    let hour = if caps.get(1)?.as_str().eq_ignore_ascii_case("midnight") { 0 } else { 12 };
    Some(ClockTime { clock: NaiveTime::from_hms_opt(hour, 0, 0)?, has_meridiem: true })
}
