//! Uniform random draws used by the combat and arena formulas.
//!
//! Every formula in the engine is written in terms of `U(0,1)` draws. The
//! source of those draws is injected so that a duel seeded with the same
//! value replays identically, and tests can script exact draws.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

/// Source of uniform draws.
pub trait Dice {
    /// Draw a value from `[0, 1)`.
    ///
    /// Scripted sources may also return exactly `1.0`.
    fn unit(&mut self) -> f64;

    /// Draw an integer from `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Truncation is the point: floor(U * bound).
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let drawn = (self.unit() * f64::from(bound)) as u32;
        drawn.min(bound - 1)
    }
}

impl<R: RngCore> Dice for R {
    fn unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}

/// Replays a fixed sequence of unit draws, cycling when exhausted.
///
/// An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: VecDeque<f64>,
}

impl ScriptedDice {
    /// Create a scripted source from the given draws.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: draws.into_iter().collect(),
        }
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        let Some(value) = self.script.pop_front() else {
            return 0.0;
        };
        self.script.push_back(value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_scripted_dice_cycles() {
        let mut dice = ScriptedDice::new([0.25, 0.75]);
        assert!((dice.unit() - 0.25).abs() < f64::EPSILON);
        assert!((dice.unit() - 0.75).abs() < f64::EPSILON);
        assert!((dice.unit() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scripted_below_clamps_unit_one() {
        let mut dice = ScriptedDice::new([1.0, 0.0, 0.5]);
        assert_eq!(dice.below(3), 2);
        assert_eq!(dice.below(3), 0);
        assert_eq!(dice.below(3), 1);
        assert_eq!(dice.below(0), 0);
    }

    #[test]
    fn test_empty_script_yields_zero() {
        let mut dice = ScriptedDice::default();
        assert!(dice.unit().abs() < f64::EPSILON);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(a.below(100), b.below(100));
            let (ua, ub) = (a.unit(), b.unit());
            assert!((0.0..1.0).contains(&ua));
            assert!((ua - ub).abs() < f64::EPSILON);
        }
    }
}
