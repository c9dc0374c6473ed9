use serde::{Deserialize, Serialize};

/// User-facing rendering of a similarity: a percentage and a 1-5 star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket {
    /// In [10, 100]
    pub percent: u32,
    /// In [1, 5]
    pub stars: u32,
}

impl ScoreBucket {
    /// Bucket a raw similarity. Values are clamped to [0, 1] first, so negative
    /// similarity scores the same as 0; NaN is treated as 0.
    pub fn from_similarity(similarity: f64) -> Self {
        let clamped = if similarity.is_nan() {
            0.0
        } else {
            similarity.clamp(0.0, 1.0)
        };
        let percent = (10.0 + 90.0 * clamped).round() as u32;
        Self {
            percent,
            stars: stars_for_percent(percent),
        }
    }
}

fn stars_for_percent(percent: u32) -> u32 {
    match percent {
        85.. => 5,
        70..=84 => 4,
        55..=69 => 3,
        40..=54 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(ScoreBucket::from_similarity(0.0), ScoreBucket { percent: 10, stars: 1 });
        assert_eq!(ScoreBucket::from_similarity(1.0), ScoreBucket { percent: 100, stars: 5 });
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(ScoreBucket::from_similarity(-0.7), ScoreBucket::from_similarity(0.0));
        assert_eq!(ScoreBucket::from_similarity(1.5), ScoreBucket::from_similarity(1.0));
        assert_eq!(ScoreBucket::from_similarity(f64::NAN), ScoreBucket::from_similarity(0.0));
    }

    #[test]
    fn test_star_thresholds() {
        // percent = round(10 + 90 * s)
        assert_eq!(ScoreBucket::from_similarity(0.5).percent, 55);
        assert_eq!(ScoreBucket::from_similarity(0.5).stars, 3);
        assert_eq!(ScoreBucket::from_similarity(2.0 / 3.0), ScoreBucket { percent: 70, stars: 4 });
        assert_eq!(ScoreBucket::from_similarity(0.25), ScoreBucket { percent: 33, stars: 1 });
        assert_eq!(ScoreBucket::from_similarity(1.0 / 3.0), ScoreBucket { percent: 40, stars: 2 });
        assert_eq!(ScoreBucket::from_similarity(0.8), ScoreBucket { percent: 82, stars: 4 });
        assert_eq!(ScoreBucket::from_similarity(0.9), ScoreBucket { percent: 91, stars: 5 });
    }

    #[test]
    fn test_monotonic() {
        let mut last = ScoreBucket::from_similarity(-1.0);
        for i in 0..=1000 {
            let bucket = ScoreBucket::from_similarity(i as f64 / 1000.0);
            assert!(bucket.percent >= last.percent);
            assert!(bucket.stars >= last.stars);
            assert!((10..=100).contains(&bucket.percent));
            assert!((1..=5).contains(&bucket.stars));
            last = bucket;
        }
    }
}
