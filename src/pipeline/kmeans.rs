// file: src/pipeline/kmeans.rs
// description: seeded k-means with k-means++ initialization over 2-D points
// reference: Lloyd's algorithm with restarts, best inertia kept

use crate::config::ClusteringConfig;
use crate::error::{PipelineError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use tracing::{debug, warn};

pub type Point = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    /// convergence threshold on the summed squared centroid shift
    pub tolerance: f64,
}

impl KMeansParams {
    pub fn from_config(k: usize, config: &ClusteringConfig) -> Self {
        Self {
            k,
            seed: config.seed,
            n_init: config.n_init.max(1),
            max_iterations: config.max_iterations.max(1),
            tolerance: config.tolerance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// one label per input point, in input order
    pub labels: Vec<usize>,
    pub centroids: Vec<Point>,
    /// points per label
    pub sizes: Vec<usize>,
    /// within-cluster sum of squared distances
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
}

pub struct KMeans {
    params: KMeansParams,
}

impl KMeans {
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    /// Partition `points` into exactly `k` labels.
    ///
    /// Labels are canonical: clusters are numbered by ascending centroid
    /// (first coordinate, then second), with empty clusters last. The same
    /// grouping therefore always gets the same labels.
    pub fn fit(&self, points: &[Point]) -> Result<KMeansFit> {
        let k = self.params.k;
        if k == 0 || points.len() < k {
            return Err(PipelineError::InsufficientPoints {
                points: points.len(),
                clusters: k,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut best: Option<KMeansFit> = None;

        for run in 0..self.params.n_init {
            let initial = kmeans_plus_plus(points, k, &mut rng);
            let fit = lloyd(points, initial, &self.params);
            debug!(
                "k-means run {}: inertia={:.6}, iterations={}, converged={}",
                run, fit.inertia, fit.iterations, fit.converged
            );

            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        let fit = best.ok_or_else(|| {
            PipelineError::Validation("k-means produced no result".to_string())
        })?;

        let fit = canonicalize(fit);
        let occupied = fit.sizes.iter().filter(|&&s| s > 0).count();
        if occupied < k {
            warn!(
                "Only {} distinct clusters found for k={} (too few distinct points)",
                occupied, k
            );
        }

        Ok(fit)
    }
}

fn distance_sq(a: &Point, b: &Point) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Index of the nearest centroid; the lowest index wins ties.
fn nearest(point: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    (best, best_dist)
}

fn kmeans_plus_plus(points: &[Point], k: usize, rng: &mut ChaCha8Rng) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)]);

    let mut min_distances: Vec<f64> = points
        .iter()
        .map(|p| distance_sq(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();

        let next = if total <= 0.0 {
            rng.random_range(0..n)
        } else {
            let target = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = n - 1;
            for (i, d) in min_distances.iter().enumerate() {
                cumulative += d;
                if cumulative > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        let centroid = points[next];
        for (i, p) in points.iter().enumerate() {
            let d = distance_sq(p, &centroid);
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }
        centroids.push(centroid);
    }

    centroids
}

fn assign(points: &[Point], centroids: &[Point], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (i, point) in points.iter().enumerate() {
        let (label, dist) = nearest(point, centroids);
        labels[i] = label;
        inertia += dist;
    }
    inertia
}

fn update_centroids(
    points: &[Point],
    labels: &[usize],
    previous: &[Point],
) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![[0.0; 2]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        sums[label][0] += point[0];
        sums[label][1] += point[1];
        counts[label] += 1;
    }

    let mut centroids: Vec<Point> = sums
        .iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count > 0 {
                [sum[0] / count as f64, sum[1] / count as f64]
            } else {
                *prev
            }
        })
        .collect();

    // Empty clusters move to the points farthest from their own centroid.
    let empty: Vec<usize> = (0..k).filter(|&j| counts[j] == 0).collect();
    if !empty.is_empty() {
        let mut by_distance: Vec<(usize, f64)> = points
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (p, &label))| (i, distance_sq(p, &centroids[label])))
            .collect();
        by_distance.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        for (slot, j) in empty.into_iter().enumerate() {
            if let Some(&(i, _)) = by_distance.get(slot) {
                centroids[j] = points[i];
            }
        }
    }

    centroids
}

fn lloyd(points: &[Point], initial: Vec<Point>, params: &KMeansParams) -> KMeansFit {
    let mut centroids = initial;
    let mut labels = vec![0usize; points.len()];
    let mut previous_labels: Option<Vec<usize>> = None;
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..params.max_iterations {
        iterations = iter + 1;
        assign(points, &centroids, &mut labels);

        if previous_labels.as_deref() == Some(labels.as_slice()) {
            converged = true;
            break;
        }

        let updated = update_centroids(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| distance_sq(old, new))
            .sum();
        centroids = updated;

        if shift <= params.tolerance {
            converged = true;
            break;
        }
        previous_labels = Some(labels.clone());
    }

    // labels always describe the final centroids
    let inertia = assign(points, &centroids, &mut labels);
    let mut sizes = vec![0usize; centroids.len()];
    for &label in &labels {
        sizes[label] += 1;
    }

    KMeansFit {
        labels,
        centroids,
        sizes,
        inertia,
        iterations,
        converged,
    }
}

fn canonicalize(fit: KMeansFit) -> KMeansFit {
    let k = fit.centroids.len();
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        let empty_a = fit.sizes[a] == 0;
        let empty_b = fit.sizes[b] == 0;
        empty_a
            .cmp(&empty_b)
            .then_with(|| compare_points(&fit.centroids[a], &fit.centroids[b]))
            .then(a.cmp(&b))
    });

    let mut relabel = vec![0usize; k];
    for (new, &old) in order.iter().enumerate() {
        relabel[old] = new;
    }

    KMeansFit {
        labels: fit.labels.iter().map(|&l| relabel[l]).collect(),
        centroids: order.iter().map(|&old| fit.centroids[old]).collect(),
        sizes: order.iter().map(|&old| fit.sizes[old]).collect(),
        inertia: fit.inertia,
        iterations: fit.iterations,
        converged: fit.converged,
    }
}

fn compare_points(a: &Point, b: &Point) -> Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}
