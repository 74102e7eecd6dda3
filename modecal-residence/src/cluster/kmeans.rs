use crate::ResidenceError;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// centroid-based partitioning (Lloyd's algorithm with k-means++ seeding).
/// the random generator is seeded from `seed`, so a fit is reproducible.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// cluster index of each input point
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// sum of squared distances of points to their centroid
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize, seed: u64) -> KMeans {
        KMeans {
            n_clusters,
            seed,
            max_iterations: 300,
        }
    }

    pub fn fit(&self, points: &[Vec<f64>]) -> Result<KMeansResult, ResidenceError> {
        if self.n_clusters == 0 || self.n_clusters > points.len() {
            return Err(ResidenceError::ClusteringError(format!(
                "cannot form {} clusters from {} points",
                self.n_clusters,
                points.len()
            )));
        }
        let dim = points[0].len();
        if let Some(bad) = points.iter().position(|p| p.len() != dim) {
            return Err(ResidenceError::ClusteringError(format!(
                "point {bad} has {} dimensions, expected {dim}",
                points[bad].len()
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.initial_centroids(points, &mut rng);
        let mut labels = vec![usize::MAX; points.len()];
        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            let next_labels = points
                .iter()
                .map(|p| nearest(p, &centroids).0)
                .collect::<Vec<_>>();
            let changed = next_labels != labels;
            labels = next_labels;
            if !changed {
                break;
            }
            for (k, centroid) in centroids.iter_mut().enumerate() {
                let members = points
                    .iter()
                    .zip(labels.iter())
                    .filter(|(_, l)| **l == k)
                    .map(|(p, _)| p)
                    .collect::<Vec<_>>();
                // an empty cluster keeps its previous centroid
                if members.is_empty() {
                    continue;
                }
                for (d, value) in centroid.iter_mut().enumerate() {
                    *value = members.iter().map(|p| p[d]).sum::<f64>() / members.len() as f64;
                }
            }
        }
        let inertia = points
            .iter()
            .zip(labels.iter())
            .map(|(p, l)| squared_distance(p, &centroids[*l]))
            .sum();
        Ok(KMeansResult {
            labels,
            centroids,
            inertia,
            iterations,
        })
    }

    /// k-means++: the first centroid is a uniformly drawn point, each further
    /// centroid is drawn with probability proportional to its squared
    /// distance from the nearest centroid chosen so far.
    fn initial_centroids(&self, points: &[Vec<f64>], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = vec![points[rng.random_range(0..points.len())].clone()];
        while centroids.len() < self.n_clusters {
            let distances = points
                .iter()
                .map(|p| nearest(p, &centroids).1)
                .collect::<Vec<_>>();
            let total: f64 = distances.iter().sum();
            let chosen = if total <= 0.0 {
                rng.random_range(0..points.len())
            } else {
                let mut threshold = rng.random::<f64>() * total;
                let mut idx = points.len() - 1;
                for (i, d) in distances.iter().enumerate() {
                    if threshold < *d {
                        idx = i;
                        break;
                    }
                    threshold -= d;
                }
                idx
            };
            centroids.push(points[chosen].clone());
        }
        centroids
    }
}

/// index of and squared distance to the closest centroid. ties go to the
/// lower index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(point, c)))
        .fold((0, f64::INFINITY), |best, (i, d)| {
            if d < best.1 {
                (i, d)
            } else {
                best
            }
        })
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.9, 0.1],
            vec![0.85, 0.15],
            vec![0.8, 0.2],
            vec![0.1, 0.9],
            vec![0.15, 0.85],
            vec![0.2, 0.8],
        ]
    }

    #[test]
    fn test_separates_blobs() {
        let result = KMeans::new(2, 42).fit(&blobs()).unwrap();
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[1], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_eq!(result.labels[4], result.labels[5]);
        assert_ne!(result.labels[0], result.labels[3]);
        assert!(result.inertia < 0.05);
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = KMeans::new(3, 7).fit(&blobs()).unwrap();
        let b = KMeans::new(3, 7).fit(&blobs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_many_clusters() {
        assert!(KMeans::new(7, 0).fit(&blobs()).is_err());
        assert!(KMeans::new(0, 0).fit(&blobs()).is_err());
    }
}
