//! Random source for the display-only fields of an assessment
//!
//! Confidence values and the agreement label carry no decision weight.
//! Keeping their randomness behind [`NoiseSource`] lets callers swap in a
//! deterministic source.

use rand::Rng;

/// Source of cosmetic randomness
pub trait NoiseSource: Send + Sync {
    /// Integer in `[low, high]`
    fn int_in(&self, low: u8, high: u8) -> u8;

    /// Uniform value in `[0, 1)`
    fn unit(&self) -> f64;
}

/// Thread-local RNG backed source used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngNoise;

impl NoiseSource for ThreadRngNoise {
    fn int_in(&self, low: u8, high: u8) -> u8 {
        rand::thread_rng().gen_range(low..=high)
    }

    fn unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source returning fixed values
///
/// `int_in` clamps the configured value into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise {
    /// Value handed out for integer draws
    pub int_value: u8,
    /// Value handed out for unit draws
    pub unit_value: f64,
}

impl FixedNoise {
    /// Create a fixed source
    pub fn new(int_value: u8, unit_value: f64) -> Self {
        Self {
            int_value,
            unit_value,
        }
    }
}

impl NoiseSource for FixedNoise {
    fn int_in(&self, low: u8, high: u8) -> u8 {
        self.int_value.clamp(low, high)
    }

    fn unit(&self) -> f64 {
        self.unit_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_stays_in_range() {
        let noise = ThreadRngNoise;
        for _ in 0..1_000 {
            let v = noise.int_in(75, 95);
            assert!((75..=95).contains(&v));

            let u = noise.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_fixed_noise_clamps() {
        let noise = FixedNoise::new(100, 0.5);
        assert_eq!(noise.int_in(85, 99), 99);
        assert_eq!(noise.int_in(75, 95), 95);

        let noise = FixedNoise::new(0, 0.1);
        assert_eq!(noise.int_in(85, 99), 85);
        assert_eq!(noise.unit(), 0.1);
    }
}
