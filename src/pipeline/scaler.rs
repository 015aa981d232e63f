// file: src/pipeline/scaler.rs
// description: per-column standardization of coordinates before clustering
// reference: zero mean / unit variance feature scaling

use crate::pipeline::kmeans::Point;

/// Column means and scales learned from one set of points.
///
/// Statistics are kept relative to each column's largest absolute value so
/// that any finite input, up to `±f64::MAX`, scales to finite output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    magnitudes: Point,
    means: Point,
    scales: Point,
}

impl StandardScaler {
    /// Learn per-column mean and population standard deviation. A column with
    /// (near) zero variance keeps a unit scale so it is centered but not blown up.
    pub fn fit(points: &[Point]) -> Self {
        let mut scaler = Self {
            magnitudes: [1.0; 2],
            means: [0.0; 2],
            scales: [1.0; 2],
        };
        if points.is_empty() {
            return scaler;
        }

        for d in 0..2 {
            let magnitude = points.iter().map(|p| p[d].abs()).fold(0.0, f64::max);
            let magnitude = if magnitude > 0.0 && magnitude.is_finite() {
                magnitude
            } else {
                1.0
            };

            // Welford over values in [-1, 1]
            let mut mean = 0.0;
            let mut m2 = 0.0;
            for (i, p) in points.iter().enumerate() {
                let x = p[d] / magnitude;
                let delta = x - mean;
                mean += delta / (i + 1) as f64;
                m2 += delta * (x - mean);
            }
            let std = (m2 / points.len() as f64).sqrt();

            scaler.magnitudes[d] = magnitude;
            scaler.means[d] = mean;
            scaler.scales[d] = if std <= 10.0 * f64::EPSILON * mean.abs() || std == 0.0 {
                1.0
            } else {
                std
            };
        }

        scaler
    }

    /// Column mean in original units.
    pub fn mean(&self, column: usize) -> f64 {
        self.means[column] * self.magnitudes[column]
    }

    /// Column standard deviation in original units; a constant column
    /// reports its magnitude.
    pub fn scale(&self, column: usize) -> f64 {
        self.scales[column] * self.magnitudes[column]
    }

    pub fn transform(&self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .map(|p| {
                [
                    (p[0] / self.magnitudes[0] - self.means[0]) / self.scales[0],
                    (p[1] / self.magnitudes[1] - self.means[1]) / self.scales[1],
                ]
            })
            .collect()
    }

    pub fn fit_transform(points: &[Point]) -> (Self, Vec<Point>) {
        let scaler = Self::fit(points);
        let scaled = scaler.transform(points);
        (scaler, scaled)
    }

    pub fn inverse_transform_point(&self, point: Point) -> Point {
        [
            (point[0] * self.scales[0] + self.means[0]) * self.magnitudes[0],
            (point[1] * self.scales[1] + self.means[1]) * self.magnitudes[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scaled_columns_have_zero_mean_unit_variance() {
        let points = vec![[1.0, 100.0], [2.0, 300.0], [3.0, 500.0], [4.0, 700.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&points);

        for d in 0..2 {
            let mean = scaled.iter().map(|p| p[d]).sum::<f64>() / 4.0;
            let var = scaled.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(approx(mean, 0.0));
            assert!(approx(var, 1.0));
        }
        assert!(approx(scaler.mean(0), 2.5));
        assert!(approx(scaler.mean(1), 400.0));
        assert!(approx(scaler.scale(1), 223.606797749979));
    }

    #[test]
    fn test_constant_column_is_only_centered() {
        let points = vec![[0.1, 5.0], [0.1, 6.0], [0.1, 7.0]];
        let scaler = StandardScaler::fit(&points);
        assert!(approx(scaler.mean(0), 0.1));

        let scaled = scaler.transform(&points);
        assert!(scaled.iter().all(|p| p[0].abs() < 1e-12));
    }

    #[test]
    fn test_all_zero_column() {
        let points = vec![[0.0, 1.0], [0.0, 2.0]];
        let scaled = StandardScaler::fit(&points).transform(&points);
        assert!(scaled.iter().all(|p| p[0] == 0.0));
    }

    #[test]
    fn test_extreme_finite_values_stay_finite() {
        let points = vec![
            [1e308, 1.0],
            [1.5e308, 1.1],
            [-1e308, 50.0],
            [-1.5e308, 50.1],
            [f64::MAX, -f64::MAX],
        ];
        let (scaler, scaled) = StandardScaler::fit_transform(&points);

        assert!(scaled.iter().flatten().all(|v| v.is_finite()));
        for d in 0..2 {
            assert!(scaler.mean(d).is_finite());
            assert!(scaler.scale(d).is_finite() && scaler.scale(d) > 0.0);
        }

        let restored = scaler.inverse_transform_point(scaled[1]);
        assert!(((restored[0] - 1.5e308) / 1.5e308).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_transform_round_trips() {
        let points = vec![[10.0, -3.0], [20.0, 9.0], [35.0, 1.5]];
        let (scaler, scaled) = StandardScaler::fit_transform(&points);
        let restored = scaler.inverse_transform_point(scaled[2]);
        assert!(approx(restored[0], 35.0));
        assert!(approx(restored[1], 1.5));
    }

    #[test]
    fn test_empty_input() {
        let scaler = StandardScaler::fit(&[]);
        assert_eq!(scaler.scale(0), 1.0);
        assert!(scaler.transform(&[]).is_empty());
    }
}
