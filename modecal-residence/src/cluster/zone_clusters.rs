use super::{KMeans, KMeansResult};
use crate::share_aggregation::zone_share_vectors;
use crate::{ResidenceError, SurveyRow};
use itertools::Itertools;
use std::path::Path;

/// exploratory clustering of residence zones by their mode-share vectors.
/// the result is advisory: it is reported to the analyst who curates the
/// residence group list, and is never used as the group list itself.
#[derive(Debug, Clone)]
pub struct ZoneClusters {
    pub zones: Vec<String>,
    pub modes: Vec<String>,
    pub result: KMeansResult,
}

impl ZoneClusters {
    pub fn compute(rows: &[SurveyRow], kmeans: &KMeans) -> Result<ZoneClusters, ResidenceError> {
        let (zones, modes, vectors) = zone_share_vectors(rows)?;
        let result = kmeans.fit(&vectors)?;
        log::info!(
            "clustered {} zones into {} clusters after {} iterations, inertia {:.5}",
            zones.len(),
            kmeans.n_clusters,
            result.iterations,
            result.inertia
        );
        Ok(ZoneClusters {
            zones,
            modes,
            result,
        })
    }

    /// zone ids of each cluster, in cluster order
    pub fn members(&self) -> Vec<Vec<&str>> {
        (0..self.result.centroids.len())
            .map(|k| {
                self.zones
                    .iter()
                    .zip(self.result.labels.iter())
                    .filter(|(_, l)| **l == k)
                    .map(|(z, _)| z.as_str())
                    .collect_vec()
            })
            .collect_vec()
    }

    pub fn log_summary(&self) {
        for (k, members) in self.members().iter().enumerate() {
            let centroid = self.modes
                .iter()
                .zip(self.result.centroids[k].iter())
                .map(|(m, s)| format!("{m}={s:.3}"))
                .join(" ");
            log::info!("cluster {k}: zones [{}] shares {centroid}", members.join(","));
        }
    }

    /// writes `residence_msr_id,cluster`
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ResidenceError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let write_err = |e: csv::Error| ResidenceError::WriteError {
            filepath: filepath.clone(),
            error: e.to_string(),
        };
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(write_err)?;
        writer
            .write_record(["residence_msr_id", "cluster"])
            .map_err(write_err)?;
        for (zone, label) in self.zones.iter().zip(self.result.labels.iter()) {
            writer
                .write_record([zone.as_str(), label.to_string().as_str()])
                .map_err(write_err)?;
        }
        writer.flush().map_err(|e| ResidenceError::WriteError {
            filepath: filepath.clone(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_clusters() {
        let rows = vec![
            SurveyRow::new("1", "car", 9.0),
            SurveyRow::new("1", "pt", 1.0),
            SurveyRow::new("2", "car", 8.0),
            SurveyRow::new("2", "pt", 2.0),
            SurveyRow::new("3", "car", 1.0),
            SurveyRow::new("3", "pt", 9.0),
            SurveyRow::new("4", "car", 2.0),
            SurveyRow::new("4", "pt", 8.0),
        ];
        let clusters = ZoneClusters::compute(&rows, &KMeans::new(2, 0)).unwrap();
        let mut members = clusters.members();
        members.sort();
        assert_eq!(members, vec![vec!["1", "2"], vec!["3", "4"]]);

        let path = std::env::temp_dir().join(format!("modecal-clusters-{}.csv", std::process::id()));
        clusters.write_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("residence_msr_id,cluster\n1,"));
        assert_eq!(text.lines().count(), 5);
        std::fs::remove_file(path).unwrap();
    }
}
