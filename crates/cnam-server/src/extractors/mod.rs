//! Request extractors.

pub mod nanp;
pub mod query;
pub mod request_id;

pub use nanp::Nanp;
pub use query::CleanupQuery;
pub use request_id::CorrelationId;
