/// Euclidean remainder of `t` by `period`, always in `[0, period)`.
///
/// `period` must be positive; callers validate it at configuration time.
pub fn frac(t: f64, period: f64) -> f64 {
    let r = t.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs.
    if r >= period { 0.0 } else { r }
}

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// Returns 0 for `x <= edge0` and 1 for `x >= edge1`. A degenerate range acts as a step at
/// `edge0`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if x <= edge0 {
        return 0.0;
    }
    if x >= edge1 {
        return 1.0;
    }
    smoothstep_unit((x - edge0) / (edge1 - edge0))
}

/// `x^2 (3 - 2x)` with `x` clamped to `[0, 1]`.
pub fn smoothstep_unit(x: f64) -> f64 {
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
    x * x * (3.0 - 2.0 * x)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Quantize a blend weight in `[0, 1]` to 255ths.
pub(crate) fn weight_to_u8(weight: f32) -> u16 {
    let w = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) };
    ((w * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Additive weighted sum of premultiplied pixels, saturating per channel.
///
/// Weights are quantized to 255ths and are not renormalized, so overlapping weights brighten.
pub(crate) fn weighted_sum_px(inputs: &[([u8; 4], u16)]) -> [u8; 4] {
    let mut acc = [0u16; 4];
    for (px, w) in inputs {
        if *w == 0 {
            continue;
        }
        for i in 0..4 {
            acc[i] = acc[i].saturating_add(mul_div255_u16(u16::from(px[i]), *w));
        }
    }
    acc.map(|c| c.min(255) as u8)
}

/// Convert premultiplied RGBA8 pixels to straight alpha. Fully transparent pixels become zero.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
