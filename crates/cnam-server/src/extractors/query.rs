use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Query parameters de DELETE /cleanup.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CleanupQuery {
    /// Borra los registros creados antes de este instante.
    /// Si falta, se usa la ventana por defecto del store.
    pub expire: Option<String>,
}

impl CleanupQuery {
    /// Parsea `expire`, si viene. Un valor vacio cuenta como ausente.
    pub fn expire_at(&self) -> Result<Option<DateTime<Utc>>, String> {
        match self.expire.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_timestamp(raw).map(Some),
        }
    }
}

/// Acepta RFC 3339, una fecha-hora sin zona (UTC) o solo una fecha
/// (medianoche UTC).
///
/// Un `+` sin codificar en el offset llega como espacio
/// (`2024-03-01T00:00:00 05:00`); se trata como `+`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Some(restored) = restore_plus_offset(raw)
        && let Ok(ts) = DateTime::parse_from_rfc3339(&restored)
    {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(format!("Invalid expire timestamp: {raw}"))
}

/// Devuelve `raw` con `+` en lugar del espacio que precede a un offset
/// `HH:MM` final.
fn restore_plus_offset(raw: &str) -> Option<String> {
    let (head, offset) = raw.rsplit_once(' ')?;
    let bytes = offset.as_bytes();
    let is_offset = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    is_offset.then(|| format!("{head}+{offset}"))
}
