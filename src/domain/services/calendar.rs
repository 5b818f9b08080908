use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// 日文星期縮寫，從星期一開始
pub const WEEKDAY_LABELS_JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// Monday to Friday in a fixed civil time zone. Exchange holidays are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
}

impl BusinessCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.tz)
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    pub fn is_business_day(&self, now: DateTime<Utc>) -> bool {
        !matches!(self.local(now).weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// e.g. `10月16日（金）`
    pub fn report_date_label(&self, now: DateTime<Utc>) -> String {
        let local = self.local(now);
        format!(
            "{}（{}）",
            local.format("%m月%d日"),
            weekday_label(local.weekday())
        )
    }

    /// e.g. `2026年10月16日（金）`
    pub fn long_date_label(&self, now: DateTime<Utc>) -> String {
        let local = self.local(now);
        format!(
            "{}（{}）",
            local.format("%Y年%m月%d日"),
            weekday_label(local.weekday())
        )
    }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_LABELS_JA[weekday.num_days_from_monday() as usize]
}
