//! Carga sintética del benchmark.
//!
//! Una carga es el producto `clusters × log_types × per_log_type`, recorrido
//! en ese orden (cluster, luego log type, luego índice). Cada elemento recibe
//! una ruta única `"{log_type}/{uuid}/test.log"`.

use chrono::Utc;
use uuid::Uuid;

use crate::record::{FileMetadataRecord, NewFileMetadata};
use crate::DomainError;

pub const DEFAULT_CLUSTERS: [&str; 2] = ["cluster1", "cluster2"];
pub const DEFAULT_LOG_TYPES: [&str; 2] = ["logtype1", "logtype2"];
pub const DEFAULT_PER_LOG_TYPE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub clusters: Vec<String>,
    pub log_types: Vec<String>,
    pub per_log_type: usize,
}

impl Default for Workload {
    fn default() -> Self {
        Self::new(&DEFAULT_CLUSTERS, &DEFAULT_LOG_TYPES, DEFAULT_PER_LOG_TYPE)
    }
}

impl Workload {
    pub fn new(clusters: &[&str], log_types: &[&str], per_log_type: usize) -> Self {
        Self { clusters: clusters.iter().map(|c| c.to_string()).collect(),
               log_types: log_types.iter().map(|l| l.to_string()).collect(),
               per_log_type }
    }

    /// Número total de elementos generados.
    pub fn len(&self) -> usize { self.clusters.len() * self.log_types.len() * self.per_log_type }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Genera los elementos de forma perezosa; cada llamada produce rutas nuevas.
    pub fn items(&self) -> impl Iterator<Item = WorkloadItem> + '_ {
        self.clusters.iter().flat_map(move |cluster| {
            self.log_types.iter().flat_map(move |log_type| {
                (0..self.per_log_type).map(move |index| WorkloadItem::generate(cluster, log_type, index))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadItem {
    pub cluster: String,
    pub log_type: String,
    pub index: usize,
    pub local_path: String,
}

impl WorkloadItem {
    fn generate(cluster: &str, log_type: &str, index: usize) -> Self {
        Self { cluster: cluster.to_string(),
               log_type: log_type.to_string(),
               index,
               local_path: format!("{log_type}/{}/test.log", Uuid::new_v4()) }
    }

    /// Registro con los valores de relleno del benchmark.
    pub fn to_record(&self) -> Result<FileMetadataRecord, DomainError> {
        let now = Utc::now();
        FileMetadataRecord::new(NewFileMetadata { cluster_name: self.cluster.clone(),
                                                  local_path: self.local_path.clone(),
                                                  log_type_name: self.log_type.clone(),
                                                  tier: 1,
                                                  database_name: "test".to_string(),
                                                  table_name: "test".to_string(),
                                                  storage_account_name: "test".to_string(),
                                                  container_name: "local".to_string(),
                                                  file_size_in_bytes: 100,
                                                  operation_id: None,
                                                  created_on: now,
                                                  enqueue_time: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workload_has_two_thousand_items() {
        let w = Workload::default();
        assert_eq!(w.len(), 2000);
        assert_eq!(w.items().count(), 2000);
    }

    #[test]
    fn items_are_cluster_major() {
        let w = Workload::new(&["c1", "c2"], &["l1", "l2"], 2);
        let order: Vec<(String, String, usize)> =
            w.items().map(|i| (i.cluster, i.log_type, i.index)).collect();
        assert_eq!(order[0], ("c1".to_string(), "l1".to_string(), 0));
        assert_eq!(order[1], ("c1".to_string(), "l1".to_string(), 1));
        assert_eq!(order[2], ("c1".to_string(), "l2".to_string(), 0));
        assert_eq!(order[4], ("c2".to_string(), "l1".to_string(), 0));
    }

    #[test]
    fn paths_are_prefixed_by_log_type_and_unique() {
        let w = Workload::new(&["c1"], &["l1"], 10);
        let paths: Vec<String> = w.items().map(|i| i.local_path).collect();
        assert!(paths.iter().all(|p| p.starts_with("l1/") && p.ends_with("/test.log")));
        let mut dedup = paths.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), paths.len());
    }

    #[test]
    fn empty_dimensions_produce_nothing() {
        let w = Workload::new(&[], &["l1"], 5);
        assert!(w.is_empty());
        assert_eq!(w.items().count(), 0);
    }
}
