//! Token patterns recognised by the time resolver
//!
//! Every pattern is compiled once on first use. Matching is fuzzy: the
//! resolver searches for tokens anywhere in the text and ignores the rest.

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("time token pattern is valid and well-formed")
}

/// Full date-time carrying a UTC offset or `Z`
pub static ZONED_DATETIME: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?(Z|z|[+-]\d{2}:?\d{2})",
    )
});

/// `YYYY-MM-DD` or `YYYY/MM/DD`
pub static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:\D|$)"));

/// US order `M/D/YYYY`, `M/D/YY` or `M/D`
pub static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?\b"));

/// `2024年8月16日`, `8月16日`, `8月16号`
pub static CJK_DATE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?:(\d{4})\s*年\s*)?(\d{1,2})\s*月\s*(\d{1,2})\s*[日号號]?")
});

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|\
                      november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

/// `Aug 16, 2024`, `August 16th`
pub static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b({MONTHS})\b\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s*(\d{{4}})\b)?"
    ))
});

/// `16 August 2024`, `16th of Aug`
pub static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b\.?(?:,?\s*(\d{{4}})\b)?"
    ))
});

/// A stray four digit year, e.g. the `2024` in `8月16日 2024`
pub static YEAR: Lazy<Regex> = Lazy::new(|| compile(r"(?:^|[^\d])((?:19|20)\d{2})(?:[^\d]|$)"));

/// Relative day words, longest phrase first
pub static RELATIVE_DAY: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(day\s+after\s+tomorrow|tomorrow|today|tonight|yesterday)\b|(大后天|后天|後天|明天|今天|今晚|昨天)")
});

/// `in 3 days`, `in 2 weeks`
pub static IN_N_UNITS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bin\s+(\d{1,4})\s+(days?|weeks?)\b"));

/// `Tuesday`, `this Tue`, `next Tuesday`
pub static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(?:(this|next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\b",
    )
});

/// `周二`, `星期二`, `下周二`
pub static CJK_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    compile(r"(下|这|這|本)?\s*(?:周|週|星期|礼拜|禮拜)([一二三四五六日天])")
});

/// `下午5点`, `上午9点30分`, `5点半`, `晚上8:30`
pub static CJK_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(上午|早上|凌晨|中午|下午|傍晚|晚上)?\s*(\d{1,2})(?:\s*[:：]\s*(\d{2})|\s*([点點时時])(?:\s*(\d{1,2})\s*分?|(半))?)",
    )
});

/// `9:30am`, `5pm`, `5:00 p.m.`, `17:00`, `17:00:30`
pub static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)(?:\b|T)(\d{1,2})(?::(\d{2})(?::(\d{2}))?)?\s*(am\b|pm\b|a\.m\.?|p\.m\.?)?")
});

/// Bare hour after `at` or `@`: `at 9`, `@10`
pub static AT_HOUR: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(?:\bat\s+|@\s*)(\d{1,2})\b(?:[^:\d]|$)"));

/// `noon`, `midday`, `midnight`
pub static NAMED_TIME: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(noon|midday|midnight)\b"));

/// Map an English weekday name or abbreviation
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.to_ascii_lowercase();
    let weekday = match lower.get(..3)? {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Map the CJK weekday suffix (`一` .. `日`)
pub fn weekday_from_cjk(suffix: &str) -> Option<Weekday> {
    let weekday = match suffix {
        "一" => Weekday::Mon,
        "二" => Weekday::Tue,
        "三" => Weekday::Wed,
        "四" => Weekday::Thu,
        "五" => Weekday::Fri,
        "六" => Weekday::Sat,
        "日" | "天" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Map an English month name or abbreviation to its number
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
