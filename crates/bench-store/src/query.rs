//! Filtros de consulta sobre tablas: conjunción de igualdades.
//!
//! `PartitionKey` y `RowKey` se resuelven contra las claves de la entidad;
//! cualquier otro nombre contra su bolsa de propiedades.

use serde_json::Value;

use crate::table::TableEntity;

pub const PARTITION_KEY: &str = "PartitionKey";
pub const ROW_KEY: &str = "RowKey";

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub predicates: Vec<Predicate>,
    /// Tamaño de página pedido; `None` deja decidir al store.
    pub page_size: Option<usize>,
}

impl TableQuery {
    pub fn new() -> Self { Self::default() }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate { field: field.into(), value: value.into() });
        self
    }

    pub fn keys(partition_key: &str, row_key: &str) -> Self {
        Self::new().eq(PARTITION_KEY, partition_key).eq(ROW_KEY, row_key)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn matches(&self, entity: &TableEntity) -> bool {
        self.predicates.iter().all(|p| match p.field.as_str() {
                                     PARTITION_KEY => p.value.as_str() == Some(entity.partition_key.as_str()),
                                     ROW_KEY => p.value.as_str() == Some(entity.row_key.as_str()),
                                     other => entity.properties.get(other) == Some(&p.value),
                                 })
    }

    /// Render estilo OData (`Campo eq 'valor' and ...`).
    pub fn render(&self) -> String {
        self.predicates
            .iter()
            .map(|p| format!("{} eq {}", p.field, render_literal(&p.value)))
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
