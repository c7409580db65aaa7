//! Per-section statistics accumulation
//!
//! Single-pass running min/max/sum/count; the zero-observation case reports
//! defined sentinels rather than dividing by zero.

use serde::{Deserialize, Serialize};

/// Aggregated length statistics for one section across a run
///
/// `min`/`max`/`mean` are null in the artifact when no site had a non-empty
/// instance of the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStats {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub mean: Option<f64>,
    pub sites_with_content: u64,
}

/// Running accumulator over non-empty section lengths
#[derive(Debug, Default)]
pub(crate) struct SectionAccumulator {
    min: Option<u64>,
    max: Option<u64>,
    sum: u64,
    count: u64,
}

impl SectionAccumulator {
    /// Folds in one non-empty section length
    pub fn observe(&mut self, length: u64) {
        self.min = Some(self.min.map_or(length, |m| m.min(length)));
        self.max = Some(self.max.map_or(length, |m| m.max(length)));
        self.sum += length;
        self.count += 1;
    }

    /// Finishes the pass; mean is rounded to two decimals
    pub fn finish(&self) -> SectionStats {
        let mean = if self.count > 0 {
            Some((self.sum as f64 / self.count as f64 * 100.0).round() / 100.0)
        } else {
            None
        };

        SectionStats {
            min: self.min,
            max: self.max,
            mean,
            sites_with_content: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_min_max_mean() {
        let mut acc = SectionAccumulator::default();
        acc.observe(10);
        acc.observe(30);
        acc.observe(20);

        let stats = acc.finish();
        assert_eq!(stats.min, Some(10));
        assert_eq!(stats.max, Some(30));
        assert_eq!(stats.mean, Some(20.0));
        assert_eq!(stats.sites_with_content, 3);
    }

    #[test]
    fn test_empty_accumulator_reports_sentinels() {
        let stats = SectionAccumulator::default().finish();

        assert_eq!(stats.min, None);
        assert_eq!(stats.max, None);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.sites_with_content, 0);
    }

    #[test]
    fn test_mean_rounded_to_two_decimals() {
        let mut acc = SectionAccumulator::default();
        acc.observe(1);
        acc.observe(1);
        acc.observe(2);

        assert_eq!(acc.finish().mean, Some(1.33));
    }

    #[test]
    fn test_single_observation() {
        let mut acc = SectionAccumulator::default();
        acc.observe(42);

        let stats = acc.finish();
        assert_eq!(stats.min, Some(42));
        assert_eq!(stats.max, Some(42));
        assert_eq!(stats.mean, Some(42.0));
    }
}
