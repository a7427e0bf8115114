//! Middleware stack para el servidor HTTP.
//!
//! Este modulo contiene los middleware de Tower que se aplican a todas las requests:
//! - `RequestIdLayer`: Genera/propaga X-Request-Id (tambien usado como correlation id del provider)
//! - `LoggingLayer`: Logging estructurado de requests y header X-Response-Time

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware, RESPONSE_TIME_HEADER};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
