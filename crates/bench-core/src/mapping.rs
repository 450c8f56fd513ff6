//! Conversión registro <-> entidad dinámica del store.
//! Las claves viajan fuera de la bolsa de propiedades.

use bench_domain::{DomainError, FileMetadataRecord};
use bench_store::query::{PARTITION_KEY, ROW_KEY};
use bench_store::TableEntity;
use serde_json::Value;

pub fn record_to_entity(record: &FileMetadataRecord) -> Result<TableEntity, DomainError> {
    let mut properties = record.to_properties()?;
    properties.remove(PARTITION_KEY);
    properties.remove(ROW_KEY);
    Ok(TableEntity::new(record.partition_key(), record.row_key(), properties))
}

pub fn entity_to_record(entity: TableEntity) -> Result<FileMetadataRecord, DomainError> {
    let mut properties = entity.properties;
    properties.insert(PARTITION_KEY.to_string(), Value::String(entity.partition_key));
    properties.insert(ROW_KEY.to_string(), Value::String(entity.row_key));
    FileMetadataRecord::from_properties(properties, entity.etag, entity.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_domain::Workload;

    #[test]
    fn keys_are_lifted_out_of_properties() {
        let item = Workload::new(&["c1"], &["l1"], 1).items().next().unwrap();
        let record = item.to_record().unwrap();
        let entity = record_to_entity(&record).unwrap();
        assert_eq!(entity.partition_key, record.partition_key());
        assert_eq!(entity.row_key, record.row_key());
        assert!(!entity.properties.contains_key(PARTITION_KEY));
        assert_eq!(entity.properties["LocalPath"], Value::String(item.local_path.clone()));
    }

    #[test]
    fn entity_back_to_record_passes_etag_through() {
        let record = Workload::new(&["c1"], &["l1"], 1).items().next().unwrap().to_record().unwrap();
        let mut entity = record_to_entity(&record).unwrap();
        entity.etag = Some("W/\"7\"".into());
        let back = entity_to_record(entity).unwrap();
        assert_eq!(back.etag(), Some("W/\"7\""));
        assert_eq!(back.row_key(), record.row_key());
        assert_eq!(back.local_path(), record.local_path());
    }
}
