// bench-domain library entry point
pub mod error;
pub mod keys;
pub mod record;
pub mod workload;
pub use error::DomainError;
pub use keys::{derive_key, partition_key, row_key};
pub use record::{FileMetadataRecord, NewFileMetadata, CLUSTER_NAME_PROPERTY, LOCAL_PATH_PROPERTY};
pub use workload::{Workload, WorkloadItem};
