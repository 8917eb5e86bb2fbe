//! Random draws used for order sizing and crossing trades.
//!
//! The bot never touches an ambient RNG: every draw goes through [`Draws`],
//! so tests can script exact values.

use rand::Rng;
use rust_decimal::Decimal;

/// Source of the bot's random choices.
pub trait Draws: Send {
    /// Size jitter percentage in `0..20`; the multiplier is `1 + pct/100`.
    fn size_jitter_pct(&mut self) -> u32;

    /// Step multiplier for crossing trades, `1` or `2`.
    fn step_multiplier(&mut self) -> u32;

    /// Size multiplier in `[1.00, 1.19]`.
    fn size_multiplier(&mut self) -> Decimal {
        Decimal::ONE + Decimal::new(i64::from(self.size_jitter_pct()), 2)
    }
}

/// [`Draws`] backed by any `rand` generator.
pub struct RngDraws<R>(pub R);

impl<R: Rng + Send> Draws for RngDraws<R> {
    fn size_jitter_pct(&mut self) -> u32 {
        self.0.gen_range(0..20)
    }

    fn step_multiplier(&mut self) -> u32 {
        self.0.gen_range(1..=2)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::Draws;

    /// Replays scripted draws; falls back to the smallest value when empty.
    #[derive(Default)]
    pub struct ScriptedDraws {
        pub jitter: VecDeque<u32>,
        pub multipliers: VecDeque<u32>,
    }

    impl ScriptedDraws {
        pub fn new(jitter: &[u32], multipliers: &[u32]) -> Self {
            Self {
                jitter: jitter.iter().copied().collect(),
                multipliers: multipliers.iter().copied().collect(),
            }
        }
    }

    impl Draws for ScriptedDraws {
        fn size_jitter_pct(&mut self) -> u32 {
            self.jitter.pop_front().unwrap_or(0)
        }

        fn step_multiplier(&mut self) -> u32 {
            self.multipliers.pop_front().unwrap_or(1)
        }
    }
}
