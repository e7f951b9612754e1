use super::Point;
use serde::{Deserialize, Serialize};

fn euclidean(a: &Point, b: &Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn manhattan(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Distance function used to score tours.
///
/// Both metrics are symmetric, non-negative and satisfy the triangle
/// inequality. Selection, fitness and the batch driver all take the metric
/// explicitly, so a population can be re-scored under a different metric
/// without rebuilding it.
///
/// # Examples
///
/// ```rust
/// use tsp_ga::models::{Metric, Point};
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
///
/// assert_eq!(Metric::Euclidean.distance(&a, &b), 5.0);
/// assert_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Straight-line distance, `sqrt(dx² + dy²)`.
    #[default]
    Euclidean,
    /// Grid distance, `|dx| + |dy|`.
    Manhattan,
}

impl Metric {
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        match self {
            Self::Euclidean => euclidean(a, b),
            Self::Manhattan => manhattan(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_computes_euclidean_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(Metric::Euclidean.distance(&a, &b), 5.0);
    }

    #[test]
    fn it_computes_manhattan_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
    }

    #[test]
    fn it_is_symmetric_and_non_negative() {
        let a = Point::new(-3.5, 12.0);
        let b = Point::new(7.25, -1.0);

        for metric in [Metric::Euclidean, Metric::Manhattan] {
            assert_eq!(metric.distance(&a, &b), metric.distance(&b, &a));
            assert!(metric.distance(&a, &b) >= 0.0);
            assert_eq!(metric.distance(&a, &a), 0.0);
        }
    }

    #[test]
    fn it_deserializes_lowercase_names() {
        let metric: Metric = serde_json::from_str("\"manhattan\"").unwrap();
        assert_eq!(metric, Metric::Manhattan);

        let metric: Metric = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(metric, Metric::Euclidean);
    }
}
