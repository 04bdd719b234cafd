//! Parameter modulation primitives.

/*
Parameter Modulation
====================

A soundscape stays alive because something keeps moving. Ocean surf is a
lowpass whose cutoff rises and falls with the swell; forest wind is a
bandpass whose center drifts. Both are the same trick: a slow oscillator
(an LFO) drives a filter parameter.

Vocabulary
----------

  modulator     The control signal. Here always a sine LFO in [-1.0, +1.0].

  depth         How far the parameter moves. In the node graph this is a
                plain Gain node sitting between the LFO and the parameter:

                    LFO (±1) ──→ Gain(depth) ──→ filter.frequency

  base value    The parameter's value when the modulator is at zero.


The Math
--------

Every signal routed into a parameter input is summed and ADDED to the base:

    value = base + Σ modulation inputs

Ocean:  base 500 Hz, LFO 0.15 Hz through Gain(400)
        cutoff sweeps 100 Hz ↔ 900 Hz once every ~6.7 s

Forest: base 400 Hz, LFO 0.1 Hz through Gain(200)
        center sweeps 200 Hz ↔ 600 Hz once every 10 s


Block-Rate Modulation
---------------------

Parameters are updated once per rendered block from the AVERAGE of the
modulating signal over that block. Recomputing filter coefficients every
sample would cost a tan() per sample for no audible gain: at 0.15 Hz the
LFO moves less than 0.1% of its range across a 512-sample block.


Parameter Clamping
------------------

The target node clamps the result to its valid range. The filter keeps its
cutoff inside [10 Hz, 20 kHz] (and below Nyquist), the oscillator keeps
frequency non-negative, gains are left unclamped.
*/

/// Combine a parameter's base value with the summed modulation and clamp.
#[inline]
pub fn modulated_value(base_value: f32, modulation: f32, min: f32, max: f32) -> f32 {
    (base_value + modulation).clamp(min, max)
}

/// Calculate the average of a modulator signal over a block.
///
/// Used for block-rate modulation: we need one value to represent
/// the entire block's worth of modulator samples.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
