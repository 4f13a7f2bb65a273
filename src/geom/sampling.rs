use rand::Rng;

/// Draw a scalar uniformly from `[min, max]`.
///
/// Written as `min + u * (max - min)` so a collapsed range (`min == max`)
/// yields that value instead of panicking.
#[must_use]
pub fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + sample_unit(rng) * (max - min)
}

/// Draw a scalar uniformly from `[-max, +max]`.
///
/// Variation parameters must be able to perturb in both directions; sampling
/// only `[0, max]` gives a one-sided drift.
#[must_use]
pub fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    max - sample_unit(rng) * 2.0 * max
}

/// Draw a scalar uniformly from `[0, 1)`.
#[must_use]
pub fn sample_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Accept a candidate with probability `percent` in `[0, 100]`.
#[must_use]
pub fn accept<R: Rng + ?Sized>(rng: &mut R, percent: f64) -> bool {
    sample_unit(rng) > 1.0 - percent / 100.0
}

/// The overloaded "copies per primitive" parameter.
///
/// Values at or above 1 are an integer repeat count placed with certainty;
/// values below 1 are a single attempt at `value * 100` percent certainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyCount {
    pub repeat: usize,
    pub percent: f64,
}

impl CopyCount {
    #[must_use]
    pub fn resolve(value: f64) -> Self {
        if value < 1.0 {
            Self {
                repeat: 1,
                percent: value * 100.0,
            }
        } else {
            Self {
                repeat: value as usize,
                percent: 100.0,
            }
        }
    }
}
