use super::*;

fn solid(px: [u8; 4], n: usize) -> Vec<u8> {
    px.iter().copied().cycle().take(n * 4).collect()
}

#[test]
fn single_full_weight_input_is_copied() {
    let a = solid([10, 20, 30, 255], 6);
    let mut dst = vec![0u8; a.len()];
    weighted_sum_into(&mut dst, 8, &[(&a, 1.0)]).unwrap();
    assert_eq!(dst, a);
}

#[test]
fn half_weights_crossfade() {
    let a = solid([200, 0, 0, 255], 4);
    let b = solid([0, 0, 200, 255], 4);
    let mut dst = vec![0u8; a.len()];
    weighted_sum_into(&mut dst, 8, &[(&a, 0.5), (&b, 0.5)]).unwrap();
    for px in dst.chunks_exact(4) {
        assert_eq!(px, &[100, 0, 100, 255]);
    }
}

#[test]
fn overlap_adds_and_saturates() {
    let a = solid([200, 200, 200, 255], 2);
    let mut dst = vec![0u8; a.len()];
    weighted_sum_into(&mut dst, 8, &[(&a, 1.0), (&a, 0.5)]).unwrap();
    assert_eq!(&dst[..4], &[255, 255, 255, 255]);
}

#[test]
fn zero_weights_produce_transparent_black() {
    let a = solid([9, 9, 9, 9], 2);
    let mut dst = vec![7u8; a.len()];
    weighted_sum_into(&mut dst, 8, &[(&a, 0.0)]).unwrap();
    assert!(dst.iter().all(|b| *b == 0));
}

#[test]
fn rejects_mismatched_buffers() {
    let a = solid([1, 1, 1, 1], 2);
    let mut dst = vec![0u8; 16];
    assert!(weighted_sum_into(&mut dst, 8, &[(&a, 1.0)]).is_err());
    assert!(weighted_sum_into(&mut dst, 6, &[]).is_err());
}
