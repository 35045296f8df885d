//! Venue slot pricing.
//!
//! Weekend price beats peak-hour price when both apply. Slot listings and
//! bookings go through the same functions, so a listed price is the price
//! a booking is charged.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::domain::types::{PEAK_END_HOUR, PEAK_START_HOUR, Slot, Venue};
use crate::error::ArenaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub duration_hours: i32,
    pub rate_paise: i64,
    pub total_paise: i64,
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn is_peak(hour: u32) -> bool {
    (PEAK_START_HOUR..PEAK_END_HOUR).contains(&hour)
}

fn on_the_hour(t: NaiveTime) -> bool {
    t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0
}

/// Per-hour rate for a slot starting at `start_hour` on `date`.
pub fn hourly_rate(venue: &Venue, date: NaiveDate, start_hour: u32) -> i64 {
    if is_weekend(date)
        && let Some(weekend) = venue.weekend_price_paise
    {
        return weekend;
    }
    if is_peak(start_hour)
        && let Some(peak) = venue.peak_hour_price_paise
    {
        return peak;
    }
    venue.price_per_hour_paise
}

/// Price a whole-hour booking. The rate is fixed by the start hour.
pub fn quote(
    venue: &Venue,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Quote, ArenaError> {
    if !on_the_hour(start) || !on_the_hour(end) {
        return Err(ArenaError::validation("bookings start and end on the hour"));
    }
    if end <= start {
        return Err(ArenaError::validation("end_time must be after start_time"));
    }
    if start < venue.opening_time || end > venue.closing_time {
        return Err(ArenaError::validation("booking is outside opening hours"));
    }

    let duration_hours = (end.hour() - start.hour()) as i32;
    let rate_paise = hourly_rate(venue, date, start.hour());
    let total_paise = rate_paise
        .checked_mul(i64::from(duration_hours))
        .ok_or_else(|| ArenaError::validation("booking total is out of range"))?;
    Ok(Quote {
        duration_hours,
        rate_paise,
        total_paise,
    })
}

/// Hourly slots between opening and closing. `booked` holds the start times
/// of live bookings on `date`.
pub fn list_slots(venue: &Venue, date: NaiveDate, booked: &[NaiveTime]) -> Vec<Slot> {
    let open = venue.opening_time.hour();
    let close = venue.closing_time.hour();
    (open..close)
        .filter_map(|hour| {
            let start_time = NaiveTime::from_hms_opt(hour, 0, 0)?;
            let end_time = NaiveTime::from_hms_opt(hour + 1, 0, 0)?;
            Some(Slot {
                start_time,
                end_time,
                price_paise: hourly_rate(venue, date, hour),
                available: !booked.contains(&start_time),
            })
        })
        .collect()
}
