use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Resolve a period expression to its first and last day.
///
/// Accepted: `YYYY-MM-DD`, `YYYY-MM`, `YYYY`.
pub fn bounds_of_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    // YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(p, "%Y-%m-%d") {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Ok(dm) = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d") {
        return Ok((dm, last_day_of_month(dm.year(), dm.month())?));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        let first = NaiveDate::from_ymd_opt(year, 1, 1);
        let last = NaiveDate::from_ymd_opt(year, 12, 31);
        if let (Some(f), Some(l)) = (first, last) {
            return Ok((f, l));
        }
    }

    Err(format!("Invalid period: {}", p))
}

/// Resolve `A` or `A:B` to an inclusive date range.
pub fn resolve_range(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start, end)) = p.split_once(':') {
        let (s, _) = bounds_of_period(start)?;
        let (_, e) = bounds_of_period(end)?;
        if e < s {
            return Err(format!("Invalid period: {} ends before it starts", p));
        }
        return Ok((s, e));
    }
    bounds_of_period(p)
}

pub fn current_month_bounds() -> Result<(NaiveDate, NaiveDate), String> {
    let today = today();
    bounds_of_period(&today.format("%Y-%m").to_string())
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, String> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| format!("Invalid month: {year}-{month:02}"))
}
