//! Frame rate from sequence header timing info

use crate::types::Rational;

/// Frame rate implied by `timing_info()`:
/// `time_scale / (num_units_in_display_tick * ticks_per_frame)`.
///
/// Returns `None` when any input is not positive, when the tick product
/// overflows, or when the reduced fraction does not fit in `i32`.
pub fn framerate(ticks_per_frame: i64, units_per_tick: i64, time_scale: i64) -> Option<Rational> {
    if ticks_per_frame <= 0 || units_per_tick <= 0 || time_scale <= 0 {
        return None;
    }

    let ticks = ticks_per_frame.checked_mul(units_per_tick)?;
    let divisor = gcd(ticks, time_scale);

    Some(Rational {
        num: i32::try_from(time_scale / divisor).ok()?,
        den: i32::try_from(ticks / divisor).ok()?,
    })
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
