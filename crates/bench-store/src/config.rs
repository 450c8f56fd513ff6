//! Carga de la cadena de conexión del almacenamiento desde el entorno.
//! Convención: `STORAGE_CONNECTION_STRING` con pares `clave=valor;...`.

use std::collections::BTreeMap;
use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::StoreError;

pub const CONNECTION_STRING_VAR: &str = "STORAGE_CONNECTION_STRING";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Cadena de conexión parseada. Las claves se comparan sin distinguir mayúsculas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    entries: BTreeMap<String, String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Config("connection string is empty".into()));
        }
        let mut entries = BTreeMap::new();
        for segment in trimmed.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // el valor puede contener '=' (AccountKey en base64)
            let (key, value) = segment.split_once('=')
                                      .ok_or_else(|| StoreError::Config(format!("malformed segment: {segment:?}")))?;
            entries.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.entries.get(&key.to_ascii_lowercase()).map(String::as_str) }

    /// `UseDevelopmentStorage=true`.
    pub fn is_development(&self) -> bool {
        self.get("UseDevelopmentStorage").is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn account_name(&self) -> Option<&str> {
        if self.is_development() {
            return Some("devstoreaccount1");
        }
        self.get("AccountName")
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub connection: ConnectionString,
}

impl StorageConfig {
    /// Falla si la variable no está definida: sin ella no hay cliente.
    pub fn from_env() -> Result<Self, StoreError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let raw = env::var(CONNECTION_STRING_VAR)
            .map_err(|_| StoreError::Config(format!("{CONNECTION_STRING_VAR} no definido")))?;
        Ok(Self { connection: ConnectionString::parse(&raw)? })
    }

    pub fn development() -> Self {
        let entries = BTreeMap::from([("usedevelopmentstorage".to_string(), "true".to_string())]);
        Self { connection: ConnectionString { entries } }
    }
}
