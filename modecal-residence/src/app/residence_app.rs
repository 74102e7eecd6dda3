use crate::cluster::{KMeans, ZoneClusters};
use crate::{share_aggregation, ResidenceError, ResidenceGroup, SurveyRow};
use clap::Parser;

/// builds reference mode shares per residence group from the mobility survey
/// workbook, and reports a clustering of residence zones as a guide for
/// curating the group list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ResidenceApp {
    /// survey workbook with one row per respondent
    #[arg(long, default_value_t = String::from("report_residence_msr.xlsx"))]
    pub workbook: String,
    /// zero-based index of the sheet to read
    #[arg(long, default_value_t = 2)]
    pub sheet: usize,
    /// zero-based row holding the column names
    #[arg(long, default_value_t = 1)]
    pub header_row: usize,
    /// TOML file with the hand-curated residence groups
    #[arg(long)]
    pub groups: String,
    /// file to write the group shares to
    #[arg(long, default_value_t = String::from("ref_by_residence.csv"))]
    pub output: String,
    /// number of clusters for the zone clustering report, 0 to skip it
    #[arg(long, default_value_t = 8)]
    pub clusters: usize,
    /// random seed of the zone clustering
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// optional file to write the zone clustering to
    #[arg(long)]
    pub cluster_output: Option<String>,
}

impl ResidenceApp {
    pub fn run(&self) -> Result<(), ResidenceError> {
        let rows = SurveyRow::read_workbook(&self.workbook, self.sheet, self.header_row)?;

        let groups = ResidenceGroup::read_groups(&self.groups)?;
        let shares = share_aggregation::group_shares(&rows, &groups)?;
        shares.write_file(&self.output)?;
        log::info!(
            "wrote {} shares for {} residence groups to {}",
            shares.rows.len(),
            groups.len(),
            self.output
        );

        if self.clusters > 0 {
            if let Err(e) = self.report_clusters(&rows) {
                log::warn!("zone clustering skipped: {e}");
            }
        }
        Ok(())
    }

    /// clusters the survey zones, capped at one cluster per zone
    fn report_clusters(&self, rows: &[SurveyRow]) -> Result<(), ResidenceError> {
        let n_zones = share_aggregation::zones(rows).len();
        let n_clusters = self.clusters.min(n_zones);
        if n_clusters < self.clusters {
            log::warn!(
                "only {n_zones} residence zones in the survey, clustering into {n_clusters} instead of {}",
                self.clusters
            );
        }
        let clusters = ZoneClusters::compute(rows, &KMeans::new(n_clusters, self.seed))?;
        clusters.log_summary();
        if let Some(cluster_output) = &self.cluster_output {
            clusters.write_file(cluster_output)?;
        }
        Ok(())
    }
}
