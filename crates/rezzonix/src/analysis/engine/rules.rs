use rand::Rng;
use rand_distr::StandardNormal;

use super::super::catalog::Organ;
use super::super::domain::{ObservationNote, OrganResult};

const SCORE_MEAN: f64 = 78.0;
const SCORE_STD_DEV: f64 = 10.0;
pub const SCORE_FLOOR: u8 = 35;
pub const SCORE_CEILING: u8 = 98;
const MAX_STRESS: u8 = 10;

pub(crate) fn derive_result<R: Rng>(organ: Organ, rng: &mut R) -> OrganResult {
    let score = draw_score(rng);
    let stress = stress_for_score(score);

    OrganResult {
        organ,
        score,
        stress,
        note: ObservationNote::for_stress(stress),
    }
}

/// Normal(78, 10) clamped into the score window, then rounded.
fn draw_score<R: Rng>(rng: &mut R) -> u8 {
    let z: f64 = rng.sample(StandardNormal);
    score_from_sample(SCORE_MEAN + SCORE_STD_DEV * z)
}

fn score_from_sample(sample: f64) -> u8 {
    if sample.is_nan() {
        return SCORE_FLOOR;
    }
    let clamped = sample.clamp(f64::from(SCORE_FLOOR), f64::from(SCORE_CEILING));
    clamped.round() as u8
}

/// `round((100 - score) / 10)` with halves rounded up, clamped to 0..=10.
pub fn stress_for_score(score: u8) -> u8 {
    let deficit = 100 - score.min(100);
    ((deficit + 5) / 10).min(MAX_STRESS)
}
