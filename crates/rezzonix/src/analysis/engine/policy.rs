use super::super::domain::{BalanceBand, OrganResult};

pub const BALANCED_THRESHOLD: u8 = 80;
pub const MONITOR_THRESHOLD: u8 = 70;

/// Truncating mean of all organ scores; an empty slice averages over one.
pub fn overall_score(results: &[OrganResult]) -> u8 {
    let total: u32 = results.iter().map(|result| u32::from(result.score)).sum();
    let count = results.len().max(1) as u32;
    (total / count).min(100) as u8
}

pub fn classify_band(overall_score: u8) -> BalanceBand {
    if overall_score >= BALANCED_THRESHOLD {
        BalanceBand::Balanced
    } else if overall_score >= MONITOR_THRESHOLD {
        BalanceBand::Monitor
    } else {
        BalanceBand::HighMonitor
    }
}

/// Highest stress first. `sort_by` is stable, so equal stress keeps submission order.
pub(crate) fn order_by_stress(results: &mut [OrganResult]) {
    results.sort_by(|left, right| right.stress.cmp(&left.stress));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::Organ;
    use crate::analysis::domain::ObservationNote;

    fn result(organ: Organ, score: u8, stress: u8) -> OrganResult {
        OrganResult {
            organ,
            score,
            stress,
            note: ObservationNote::for_stress(stress),
        }
    }

    #[test]
    fn band_thresholds_cross_at_seventy_and_eighty() {
        assert_eq!(classify_band(100), BalanceBand::Balanced);
        assert_eq!(classify_band(80), BalanceBand::Balanced);
        assert_eq!(classify_band(79), BalanceBand::Monitor);
        assert_eq!(classify_band(70), BalanceBand::Monitor);
        assert_eq!(classify_band(69), BalanceBand::HighMonitor);
        assert_eq!(classify_band(0), BalanceBand::HighMonitor);
    }

    #[test]
    fn band_is_monotonic_in_score() {
        let rank = |band: BalanceBand| match band {
            BalanceBand::HighMonitor => 0,
            BalanceBand::Monitor => 1,
            BalanceBand::Balanced => 2,
        };
        for score in 0..100u8 {
            assert!(rank(classify_band(score)) <= rank(classify_band(score + 1)));
        }
    }

    #[test]
    fn overall_score_truncates() {
        let results = vec![
            result(Organ::Heart, 80, 2),
            result(Organ::Liver, 81, 2),
            result(Organ::Lung, 81, 2),
        ];
        assert_eq!(overall_score(&results), 80);
        assert_eq!(overall_score(&[]), 0);
    }

    #[test]
    fn ordering_is_stable_for_equal_stress() {
        let mut results = vec![
            result(Organ::Heart, 80, 2),
            result(Organ::Liver, 60, 4),
            result(Organ::Kidney, 81, 2),
            result(Organ::Brain, 58, 4),
            result(Organ::Spine, 40, 6),
        ];
        order_by_stress(&mut results);

        let organs: Vec<Organ> = results.iter().map(|r| r.organ).collect();
        assert_eq!(
            organs,
            vec![
                Organ::Spine,
                Organ::Liver,
                Organ::Brain,
                Organ::Heart,
                Organ::Kidney
            ]
        );

        let once = results.clone();
        order_by_stress(&mut results);
        assert_eq!(results, once);
    }
}
