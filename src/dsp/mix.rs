//! Signal summing primitives.

/*
Summing
=======

Routing several nodes into one input adds their signals sample by sample.
Nothing here normalises the result: with two oscillators on separate ears
each output channel only ever carries one full-scale tone, and the channel
gain (at most 0 dB) keeps it within [-1, +1].

Downmixing a stereo pair to mono averages the two sides, which is what a
single-speaker device receives.
*/

/// Add `input` into `out`.
#[inline]
pub fn sum_into(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());

    for (o, &s) in out.iter_mut().zip(input.iter()) {
        *o += s;
    }
}

/// Average a stereo pair into a mono buffer.
#[inline]
pub fn downmix(left: &[f32], right: &[f32], out: &mut [f32]) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert_eq!(left.len(), out.len());

    for ((&l, &r), o) in left.iter().zip(right.iter()).zip(out.iter_mut()) {
        *o = (l + r) * 0.5;
    }
}
