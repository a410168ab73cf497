//! Demand- and scarcity-sensitive seat pricing.
//!
//! Pure functions of the flight's current state. The quote produced at
//! reservation time is locked into the booking and never recalculated.

/// Fixed time-pressure surcharge applied to every quote.
const TIME_PRESSURE: f64 = 0.05;

/// Round to currency precision (2 decimal places).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scarcity surcharge/discount selected by the fraction of seats still open.
///
/// A mostly-empty cabin is discounted; a nearly-full one carries a premium.
pub fn scarcity_adjustment(seats_remaining: u32, total_seats: u32) -> f64 {
    let remaining_fraction = seats_remaining as f64 / total_seats as f64;

    if remaining_fraction > 0.75 {
        -0.05
    } else if remaining_fraction > 0.50 {
        0.0
    } else if remaining_fraction > 0.25 {
        0.15
    } else {
        0.30
    }
}

/// Final seat price: `base * (1 + scarcity + time_pressure) * demand_factor`.
///
/// Callers guarantee `total_seats >= 1`; flights are validated at
/// construction, so a zero here is a data-integrity violation rather than
/// a recoverable input.
pub fn final_price(
    base_price: f64,
    seats_remaining: u32,
    total_seats: u32,
    demand_factor: f64,
) -> f64 {
    debug_assert!(total_seats > 0, "flight must hold at least one seat");

    let adjustment = scarcity_adjustment(seats_remaining, total_seats);
    round2(base_price * (1.0 + adjustment + TIME_PRESSURE) * demand_factor)
}
