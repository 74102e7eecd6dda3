mod kmeans;
mod zone_clusters;

pub use kmeans::{KMeans, KMeansResult};
pub use zone_clusters::ZoneClusters;
