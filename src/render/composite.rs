use rayon::prelude::*;
use smallvec::SmallVec;

use crate::foundation::error::{CompositorError, CompositorResult};
use crate::foundation::math::{weight_to_u8, weighted_sum_px};

/// One composite input: a premultiplied RGBA8 buffer and its blend weight.
pub type CompositeInput<'a> = (&'a [u8], f32);

/// Write `sum(input_i * weight_i)` into `dst`, row chunks in parallel.
///
/// Inputs must match `dst` in length. Zero-weight inputs are skipped. Weights are not
/// renormalized, so overlapping weights brighten and channels saturate at 255.
pub fn weighted_sum_into(
    dst: &mut [u8],
    row_bytes: usize,
    inputs: &[CompositeInput<'_>],
) -> CompositorResult<()> {
    if row_bytes == 0 || !row_bytes.is_multiple_of(4) || !dst.len().is_multiple_of(row_bytes) {
        return Err(CompositorError::render(format!(
            "composite row length {row_bytes} does not tile a {} byte frame",
            dst.len()
        )));
    }
    for (i, (src, _)) in inputs.iter().enumerate() {
        if src.len() != dst.len() {
            return Err(CompositorError::render(format!(
                "composite input {i} has {} bytes, expected {}",
                src.len(),
                dst.len()
            )));
        }
    }

    let active: SmallVec<[(&[u8], u16); 3]> = inputs
        .iter()
        .map(|(src, w)| (*src, weight_to_u8(*w)))
        .filter(|(_, w)| *w > 0)
        .collect();

    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(row, out)| {
            let base = row * row_bytes;
            for (x, px) in out.chunks_exact_mut(4).enumerate() {
                let off = base + x * 4;
                let mut samples: SmallVec<[([u8; 4], u16); 3]> = SmallVec::new();
                for (src, w) in &active {
                    samples.push((
                        [src[off], src[off + 1], src[off + 2], src[off + 3]],
                        *w,
                    ));
                }
                px.copy_from_slice(&weighted_sum_px(&samples));
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
