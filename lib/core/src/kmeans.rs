use crate::config::{DEFAULT_K, DEFAULT_MAX_ITERS, DEFAULT_SEED};
use crate::rng::Mulberry32;
use crate::{Error, Result, Vector};
use ahash::AHashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansOptions {
    pub k: usize,
    pub max_iters: usize,
    pub seed: u32,
    /// Stop once an assignment pass repeats the previous one. The output is the
    /// same as running all `max_iters` passes, only cheaper.
    pub converge_early: bool,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iters: DEFAULT_MAX_ITERS,
            seed: DEFAULT_SEED,
            converge_early: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub centroids: Vec<Vector>,
    /// Cluster index per input vector, from the last assignment pass
    pub assignments: Vec<usize>,
    /// Assignment passes actually run
    pub iterations: usize,
}

/// Seeded k-means over cosine similarity (fixed iteration budget, index-based tie-breaks).
///
/// At most `min(k, vectors.len())` clusters are produced. Initial centroids are
/// distinct input vectors drawn with [`Mulberry32`]. Each pass assigns every vector
/// to its most similar centroid, then moves each non-empty cluster's centroid to the
/// mean of its members; empty clusters keep their previous centroid.
pub fn kmeans(vectors: &[Vector], options: &KMeansOptions) -> Result<KMeansResult> {
    let n = vectors.len();
    if n == 0 {
        return Err(Error::EmptyInputSet);
    }
    let dim = vectors[0].dim();
    if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
        return Err(Error::DimensionMismatch {
            expected: dim,
            actual: bad.dim(),
        });
    }

    let k = options.k.min(n).max(1);
    let mut centroids = init_centroids(vectors, k, options.seed);

    let mut assignments = vec![0usize; n];
    let mut iterations = 0;
    for _ in 0..options.max_iters {
        let previous = options.converge_early.then(|| assignments.clone());

        // Assign
        for (slot, v) in assignments.iter_mut().zip(vectors) {
            if let Some((best, _)) = nearest_centroid(v, &centroids) {
                *slot = best;
            }
        }
        iterations += 1;

        if iterations > 1 && previous.as_deref() == Some(&assignments[..]) {
            break;
        }

        // Update
        let mut sums = vec![Vector::zeros(dim); k];
        let mut counts = vec![0usize; k];
        for (v, &c) in vectors.iter().zip(&assignments) {
            sums[c] += v;
            counts[c] += 1;
        }
        for (c, (mut sum, count)) in sums.into_iter().zip(counts).enumerate() {
            if count > 0 {
                sum /= count as f64;
                if sum.as_slice().iter().any(|x| !x.is_finite()) {
                    sum = scaled_mean(vectors, &assignments, c, count, dim);
                }
                centroids[c] = sum;
            }
        }
    }

    debug!(n, k, iterations, "k-means finished");

    Ok(KMeansResult {
        centroids,
        assignments,
        iterations,
    })
}

/// Most similar centroid by cosine similarity, lowest index on ties.
///
/// Returns `None` when `centroids` is empty.
pub fn nearest_centroid(vector: &Vector, centroids: &[Vector]) -> Option<(usize, f64)> {
    if centroids.is_empty() {
        return None;
    }
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let score = vector.cosine_similarity(centroid);
        if score > best_score {
            best_score = score;
            best = c;
        }
    }
    Some((best, best_score))
}

// Mean of one cluster with every member divided before summing, for sums that overflow.
fn scaled_mean(vectors: &[Vector], assignments: &[usize], cluster: usize, count: usize, dim: usize) -> Vector {
    let mut mean = Vector::zeros(dim);
    let count = count as f64;
    for (v, _) in vectors.iter().zip(assignments).filter(|(_, c)| **c == cluster) {
        for (m, x) in mean.as_mut_slice().iter_mut().zip(v.as_slice()) {
            *m += x / count;
        }
    }
    mean
}

// Sampling without replacement, uniform over input order.
fn init_centroids(vectors: &[Vector], k: usize, seed: u32) -> Vec<Vector> {
    let mut rng = Mulberry32::new(seed);
    let mut used = AHashSet::with_capacity(k);
    let mut centroids = Vec::with_capacity(k);
    while centroids.len() < k {
        let idx = rng.gen_index(vectors.len());
        if used.insert(idx) {
            centroids.push(vectors[idx].clone());
        }
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(data: &[f64]) -> Vector {
        Vector::from_slice(data)
    }

    fn options(k: usize, max_iters: usize) -> KMeansOptions {
        KMeansOptions { k, max_iters, ..Default::default() }
    }

    fn pseudo_random_vectors(n: usize, dim: usize, seed: u32) -> Vec<Vector> {
        let mut rng = Mulberry32::new(seed);
        (0..n)
            .map(|_| Vector::new((0..dim).map(|_| rng.next_f64() * 2.0 - 1.0).collect()))
            .collect()
    }

    #[test]
    fn test_two_groups_converge_in_one_pass() {
        let vectors = vec![
            v(&[1.0, 0.0]), v(&[1.0, 0.0]), v(&[1.0, 0.0]),
            v(&[0.0, 1.0]), v(&[0.0, 1.0]), v(&[0.0, 1.0]),
        ];
        let result = kmeans(&vectors, &options(2, 1)).unwrap();

        // Seed 42 draws indices 3 then 2
        assert_eq!(result.centroids, vec![v(&[0.0, 1.0]), v(&[1.0, 0.0])]);
        assert_eq!(result.assignments, vec![1, 1, 1, 0, 0, 0]);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_k_is_clamped_to_point_count() {
        let vectors = vec![v(&[1.0, 0.0, 0.0]), v(&[0.0, 1.0, 0.0]), v(&[0.0, 0.0, 1.0])];
        let result = kmeans(&vectors, &options(10, 5)).unwrap();

        assert_eq!(result.centroids.len(), 3);
        for (i, vector) in vectors.iter().enumerate() {
            let c = result.assignments[i];
            assert_eq!(&result.centroids[c], vector);
        }
        let mut seen = result.assignments.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_single_vector_is_its_own_centroid() {
        let vectors = vec![v(&[0.2, 0.4])];
        let result = kmeans(&vectors, &options(10, 15)).unwrap();
        assert_eq!(result.centroids, vectors);
        assert_eq!(result.assignments, vec![0]);
        let (_, sim) = nearest_centroid(&vectors[0], &result.centroids).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_cluster_keeps_previous_centroid() {
        // Seed 42 over 4 points picks indices 2 and 1: two identical centroids.
        // Every point ties toward centroid 0, leaving centroid 1 empty.
        let vectors = vec![v(&[1.0, 0.0]), v(&[1.0, 0.0]), v(&[1.0, 0.0]), v(&[0.0, 1.0])];
        let result = kmeans(&vectors, &options(2, 1)).unwrap();

        assert_eq!(result.assignments, vec![0, 0, 0, 0]);
        assert_eq!(result.centroids[0], v(&[0.75, 0.25]));
        assert_eq!(result.centroids[1], v(&[1.0, 0.0]));
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let vectors = pseudo_random_vectors(60, 8, 7);
        let a = kmeans(&vectors, &options(5, 15)).unwrap();
        let b = kmeans(&vectors, &options(5, 15)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.iterations, 15);
    }

    #[test]
    fn test_seed_changes_initialization() {
        let vectors = pseudo_random_vectors(40, 4, 3);
        let a = kmeans(&vectors, &KMeansOptions { k: 4, max_iters: 0, seed: 1, converge_early: false }).unwrap();
        let b = kmeans(&vectors, &KMeansOptions { k: 4, max_iters: 0, seed: 2, converge_early: false }).unwrap();
        assert_ne!(a.centroids, b.centroids);
    }

    #[test]
    fn test_zero_iterations_returns_initial_centroids() {
        let vectors = vec![v(&[1.0, 0.0]), v(&[0.0, 1.0])];
        let result = kmeans(&vectors, &options(2, 0)).unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.assignments, vec![0, 0]);
        assert_eq!(result.centroids.len(), 2);
    }

    #[test]
    fn test_early_exit_matches_full_run() {
        let vectors = pseudo_random_vectors(80, 6, 11);
        let full = kmeans(&vectors, &options(4, 50)).unwrap();
        let early = kmeans(
            &vectors,
            &KMeansOptions { converge_early: true, ..options(4, 50) },
        )
        .unwrap();

        assert_eq!(full.centroids, early.centroids);
        assert_eq!(full.assignments, early.assignments);
        assert!(early.iterations <= full.iterations);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(kmeans(&[], &options(3, 5)), Err(Error::EmptyInputSet)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let vectors = vec![v(&[1.0, 0.0]), v(&[1.0, 0.0, 0.0])];
        assert!(matches!(
            kmeans(&vectors, &options(2, 1)),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_huge_components_keep_similarity_in_range() {
        let vectors = vec![v(&[1e200, 0.0]), v(&[0.0, 1.0])];
        let result = kmeans(&vectors, &options(2, 15)).unwrap();
        for (vector, &c) in vectors.iter().zip(&result.assignments) {
            let (best, sim) = nearest_centroid(vector, &result.centroids).unwrap();
            assert_eq!(best, c);
            assert_eq!(sim, 1.0);
        }
    }

    #[test]
    fn test_overflowing_cluster_sum_still_averages() {
        let vectors = vec![v(&[1e308, 0.0]), v(&[1e308, 0.0]), v(&[1e308, 0.0])];
        let result = kmeans(&vectors, &options(1, 2)).unwrap();
        let centroid = &result.centroids[0];
        assert!(centroid.as_slice().iter().all(|x| x.is_finite()));
        assert!((centroid.as_slice()[0] / 1e308 - 1.0).abs() < 1e-12);
        assert_eq!(centroid.as_slice()[1], 0.0);
    }

    #[test]
    fn test_nearest_centroid_ties_go_to_lowest_index() {
        let centroids = vec![v(&[0.0, 1.0]), v(&[3.0, 4.0]), v(&[6.0, 8.0])];
        let (best, sim) = nearest_centroid(&v(&[3.0, 4.0]), &centroids).unwrap();
        assert_eq!(best, 1);
        assert_eq!(sim, 1.0);
        assert!(nearest_centroid(&v(&[1.0, 0.0]), &[]).is_none());
    }
}
