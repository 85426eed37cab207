// Math utilities and helper functions

/// Tolerance used when comparing accumulated step time against a duration
pub const TIME_EPSILON: f32 = 1e-4;

/// Clamp a move-axis reading into [-1, 1]. Non-finite readings count as neutral.
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
