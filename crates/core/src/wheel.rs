//! The selector wheel: 60 equal segments cycling hard, easy, medium clockwise
//! from the pointer at the top.

use rand::Rng;

use crate::model::Difficulty;

pub const SEGMENT_COUNT: usize = 60;
const SEGMENT_DEG: f64 = 360.0 / SEGMENT_COUNT as f64;

/// Result of a single spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    /// Cumulative clockwise rotation after the spin, in degrees.
    pub rotation_deg: f64,
    pub tier: Difficulty,
}

#[derive(Debug, Clone, Default)]
pub struct Wheel {
    rotation_deg: f64,
}

impl Wheel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tier painted on segment `idx`.
    #[must_use]
    pub fn segment(idx: usize) -> Difficulty {
        match idx % 3 {
            0 => Difficulty::Hard,
            1 => Difficulty::Easy,
            _ => Difficulty::Medium,
        }
    }

    /// Tier under the pointer once the wheel has turned `rotation_deg` clockwise.
    #[must_use]
    pub fn landing(rotation_deg: f64) -> Difficulty {
        let angle = normalize_deg(360.0 - normalize_deg(rotation_deg));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = ((angle / SEGMENT_DEG).floor() as usize).min(SEGMENT_COUNT - 1);
        Self::segment(idx)
    }

    /// Turn the wheel 7 to 10 full turns plus a uniform extra angle.
    pub fn spin<R: Rng>(&mut self, rng: &mut R) -> SpinOutcome {
        let full_turns = f64::from(rng.random_range(7_u32..=10));
        let extra_deg = rng.random_range(0.0..360.0);
        self.rotation_deg += full_turns * 360.0 + extra_deg;

        SpinOutcome {
            rotation_deg: self.rotation_deg,
            tier: Self::landing(self.rotation_deg),
        }
    }

    #[must_use]
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }
}

fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn segments_repeat_hard_easy_medium() {
        assert_eq!(Wheel::segment(0), Difficulty::Hard);
        assert_eq!(Wheel::segment(1), Difficulty::Easy);
        assert_eq!(Wheel::segment(2), Difficulty::Medium);
        assert_eq!(Wheel::segment(59), Difficulty::Medium);
    }

    #[test]
    fn each_tier_owns_a_third_of_the_wheel() {
        for tier in Difficulty::ALL {
            let n = (0..SEGMENT_COUNT)
                .filter(|idx| Wheel::segment(*idx) == tier)
                .count();
            assert_eq!(n, SEGMENT_COUNT / 3);
        }
    }

    #[test]
    fn landing_reads_segment_under_pointer() {
        assert_eq!(Wheel::landing(0.0), Difficulty::Hard);
        // Turning back one segment brings segment 1 under the pointer.
        assert_eq!(Wheel::landing(354.0), Difficulty::Easy);
        // A small clockwise turn shows the last segment.
        assert_eq!(Wheel::landing(3.0), Difficulty::Medium);
        assert_eq!(Wheel::landing(720.0 + 354.0), Difficulty::Easy);
        assert_eq!(Wheel::landing(-6.5), Difficulty::Easy);
    }

    #[test]
    fn spin_accumulates_rotation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut wheel = Wheel::new();
        let first = wheel.spin(&mut rng);
        assert!(first.rotation_deg >= 7.0 * 360.0);
        assert!(first.rotation_deg < 11.0 * 360.0);

        let second = wheel.spin(&mut rng);
        assert!(second.rotation_deg > first.rotation_deg);
        assert_eq!(second.tier, Wheel::landing(second.rotation_deg));
        assert_eq!(wheel.rotation_deg(), second.rotation_deg);
    }

    #[test]
    fn spins_reach_every_tier() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut wheel = Wheel::new();
        let mut seen = [0_u32; 3];
        for _ in 0..300 {
            seen[wheel.spin(&mut rng).tier.index()] += 1;
        }
        assert!(seen.iter().all(|&n| n > 60), "{seen:?}");
    }
}
