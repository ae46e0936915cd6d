//! Wall-clock timestamps and their display form.

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Current time as an RFC 3339 string. Native builds return the epoch.
pub fn now_iso() -> String {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::new_0().to_iso_string().into()
    }
    #[cfg(not(feature = "csr"))]
    {
        "1970-01-01T00:00:00.000Z".to_owned()
    }
}

/// Render the date part of an RFC 3339 timestamp as `Nov 15, 2025`.
///
/// Returns the input unchanged when it does not start with `YYYY-MM-DD`.
#[must_use]
pub fn format_date(iso: &str) -> String {
    parse_date(iso).map_or_else(
        || iso.to_owned(),
        |(year, month, day)| format!("{} {day}, {year}", MONTHS[month - 1]),
    )
}

fn parse_date(iso: &str) -> Option<(u32, usize, u32)> {
    let date = iso.get(..10)?;
    let mut parts = date.split('-');
    let year = parts.next()?.parse::<u32>().ok()?;
    let month = parts.next()?.parse::<usize>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some((year, month, day))
}
