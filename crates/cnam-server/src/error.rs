use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use cnam_core::NormalizeError;
use serde::Serialize;

/// Cuerpo de la respuesta para un numero rechazado.
pub const INVALID_NUMBER_BODY: &str = "Invalid NANP number";

#[derive(Debug)]
pub enum AppError {
    /// El numero no normaliza a una clave NANP valida
    InvalidNumber(NormalizeError),

    /// Parametros invalidos
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::InvalidNumber(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Texto plano, sin detalles de la normalizacion
            AppError::InvalidNumber(_) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                INVALID_NUMBER_BODY,
            )
                .into_response(),
            AppError::BadRequest(message) => {
                let body = Json(ErrorResponse {
                    error: "Bad Request".to_string(),
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            },
        }
    }
}
