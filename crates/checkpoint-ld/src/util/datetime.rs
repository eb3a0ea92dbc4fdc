//! RFC 3339 timestamp formatting.
//!
//! Export timestamps use the UTC millisecond form that browsers emit
//! (`YYYY-MM-DDTHH:MM:SS.mmmZ`) so re-exported files diff cleanly against
//! ones written by the editing UI.

use std::time::{SystemTime, UNIX_EPOCH};

const MILLISECONDS_PER_SECOND: i64 = 1000;
const MILLISECONDS_PER_DAY: i64 = 24 * 60 * 60 * MILLISECONDS_PER_SECOND;

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    // Howard Hinnant's civil_from_days
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1; // day
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // month

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Formats milliseconds since Unix epoch as an RFC 3339 UTC timestamp.
pub fn format_epoch_millis(epoch_millis: i64) -> String {
    let days = epoch_millis.div_euclid(MILLISECONDS_PER_DAY);
    let ms_of_day = epoch_millis.rem_euclid(MILLISECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);
    let secs_of_day = ms_of_day / MILLISECONDS_PER_SECOND;
    let millis = ms_of_day % MILLISECONDS_PER_SECOND;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60,
        millis
    )
}

/// Returns the current instant as an RFC 3339 UTC timestamp.
pub fn now_rfc3339() -> String {
    let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    };
    format_epoch_millis(millis)
}
