use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

/// Source of "now" for every time-relative operation of the engine.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    DateTime::<Local>::from(at).date_naive()
}

pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    local_day(a) == local_day(b)
}

/// Parses the CLI's date forms relative to `now`: `today`, `yesterday`,
/// `-Nd` (N days back), or `YYYY-MM-DD` (local noon of that day).
pub fn parse_human_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" | "tod" | "now" => return Ok(now),
        "yesterday" | "yes" => return Ok(now - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('-') {
        let num_str = rest
            .strip_suffix('d')
            .ok_or_else(|| anyhow!("Relative dates use days, e.g. -3d"))?;
        let days: u32 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid relative format: {}", input))?;
        return Duration::try_days(i64::from(days))
            .and_then(|offset| now.checked_sub_signed(offset))
            .ok_or_else(|| anyhow!("Date out of range: {}", input));
    }

    if let Ok(d) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return local_noon(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn local_noon(date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("Invalid time of day"))?;
    Local
        .from_local_datetime(&local_dt)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Local time does not exist: {}", local_dt))
}
