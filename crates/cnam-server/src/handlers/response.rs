use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Response de DELETE /cache/{number}.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Clave canonica afectada
    pub id: String,

    /// Si existia un registro y se borro
    pub deleted: bool,
}

/// Response de DELETE /cleanup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    /// Corte usado, en RFC 3339 con milisegundos
    pub expired_at: String,

    /// Registros eliminados; 0 si el store no estaba disponible
    pub affected_rows: u64,
}

impl CleanupResponse {
    pub fn new(expired_at: DateTime<Utc>, affected_rows: u64) -> Self {
        Self {
            expired_at: expired_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            affected_rows,
        }
    }
}
