use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of gameplay time.
pub type Ticks = u64;

/// Fixed update rate: ticks per wall-clock second. The host drives every
/// active puzzle at this rate from its frame callback.
pub const TICK_RATE: Ticks = 60;

/// Convert a duration in seconds to ticks, rounding up so that any positive
/// duration lasts at least one tick.
pub fn seconds_to_ticks(seconds: f64) -> Ticks {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * TICK_RATE as f64).ceil() as Ticks
}

/// Convert an f64 to Fixed64. Use only at data-loading boundaries, never in
/// the logic path.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in the logic path.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}
