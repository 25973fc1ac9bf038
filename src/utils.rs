use chrono::{Datelike, Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Inclusive first-to-last-day window of a calendar month.
pub fn month_window(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
        last_day_of_month(year, month),
    )
}

/// The calendar month `n` months before the given one, rolling over year
/// boundaries via modulo-12 arithmetic.
pub fn months_back(year: i32, month: u32, n: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - n as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

pub fn months_forward(year: i32, month: u32, n: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + n as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// The most recently completed Monday-to-Saturday span before `today`.
///
/// A Sunday resolves to the week that ended yesterday; a Saturday resolves to
/// the previous completed week, never a span ending today.
pub fn last_completed_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let mut days_back = (today.weekday().num_days_from_sunday() + 1) % 7;
    if days_back == 0 {
        days_back = 7;
    }
    let end = today - Days::new(days_back as u64);
    let start = end - Days::new(5);
    (start, end)
}

/// Missing issue dates compare as earliest-possible, so they land last in
/// descending date order.
pub fn date_or_epoch(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or(NaiveDate::MIN)
}

/// Rounded percentage change from `previous` to `current`; defined as 0 when
/// the denominator is 0, never NaN or infinite.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    ((current - previous) / previous * 100.0).round()
}

/// Rounded share of `part` in `whole`, 0 when `whole` is 0.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    (part / whole * 100.0).round()
}
