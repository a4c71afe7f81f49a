//! Log-distance path-loss model.
//!
//! A receiver calibrated with reference power `p0` at one unit of distance and
//! attenuation factor `L` observes `p = p0 - 10 * L * log10(d)` from an
//! emitter `d` units away.

use crate::receiver::Receiver;

/// Estimate the distance between `receiver` and the emitter from the received `power`.
///
/// Always positive for finite `power`. Monotonically decreasing in `power` when
/// the attenuation factor is positive.
pub fn estimate_distance(receiver: &Receiver, power: f64) -> f64 {
    10f64.powf((receiver.p0() - power) / (10. * receiver.attenuation()))
}

/// The noiseless power `receiver` observes from an emitter `distance` units away.
///
/// Inverse of [`estimate_distance`].
pub fn expected_power(receiver: &Receiver, distance: f64) -> f64 {
    receiver.p0() - 10. * receiver.attenuation() * distance.log10()
}
