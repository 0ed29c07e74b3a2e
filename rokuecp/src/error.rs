use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::xml::{ErrorDocument, to_xml};

/// Erreurs de la surface ECP
#[derive(Debug, Error)]
pub enum EcpError {
    #[error("Invalid application id: {0}")]
    InvalidAppId(String),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("No application defined in configuration")]
    EmptyAppList,
}

impl EcpError {
    pub fn status(&self) -> StatusCode {
        match self {
            EcpError::InvalidAppId(_) | EcpError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            EcpError::NotFound(_) => StatusCode::NOT_FOUND,
            EcpError::Internal(_) | EcpError::EmptyAppList => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EcpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::debug!("{} {}", status.as_u16(), self);
        }
        error_envelope(status, &self.to_string())
    }
}

/// Construit la réponse `<error><status/><message/></error>`
pub fn error_envelope(status: StatusCode, message: &str) -> Response {
    let document = ErrorDocument {
        status: status.as_u16(),
        message: message.to_string(),
    };

    match to_xml(&document) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "text/xml")], body).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to render error envelope: {}", e);
            status.into_response()
        }
    }
}
