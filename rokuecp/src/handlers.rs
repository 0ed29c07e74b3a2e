//! Handlers HTTP de l'API ECP

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State, rejection::PathRejection},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rokubus::CommandEvent;
use serde::Serialize;
use tracing::{debug, info};

use crate::xml::{ActiveAppDocument, AppEntry, AppsDocument, DeviceInfoDocument, to_xml};
use crate::{EcpContext, EcpError};

const LANDING_TEXT: &str = "Roku ECP emulation server";

fn xml_response<T: Serialize>(document: &T) -> Result<Response, EcpError> {
    let body = to_xml(document)?;
    Ok((
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Paramètre de chemin décodé, ou enveloppe 400 s'il est illisible
fn path_param(param: Result<Path<String>, PathRejection>) -> Result<String, EcpError> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| EcpError::InvalidPath(rejection.body_text()))
}

/// GET /
pub async fn landing() -> &'static str {
    LANDING_TEXT
}

/// GET /query/apps
pub async fn query_apps(State(ctx): State<EcpContext>) -> Result<Response, EcpError> {
    xml_response(&AppsDocument::from_registry(&ctx.registry))
}

/// GET /query/active-app
pub async fn query_active_app(State(ctx): State<EcpContext>) -> Result<Response, EcpError> {
    let document = ActiveAppDocument {
        app: AppEntry {
            id: ctx.selection.get(),
            name: ctx.selection.resolve_name(&ctx.registry),
        },
    };
    xml_response(&document)
}

/// GET /query/device-info
pub async fn query_device_info(State(ctx): State<EcpContext>) -> Result<Response, EcpError> {
    xml_response(&DeviceInfoDocument::from(ctx.identity.as_ref()))
}

/// GET /query/icon/{id} : aucune icône n'est servie
pub async fn query_icon(app_id: Result<Path<String>, PathRejection>) -> EcpError {
    match path_param(app_id) {
        Ok(app_id) => EcpError::NotFound(format!("No icon for application {}", app_id)),
        Err(e) => e,
    }
}

/// POST /keypress/{cmd}
///
/// Publie `<namespace>/<application active>` avec la touche comme payload.
/// Répond 200 que le bus soit connecté ou non. Un nom de touche non
/// décodable donne une enveloppe 400 sans publication.
pub async fn keypress(
    State(ctx): State<EcpContext>,
    cmd: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, EcpError> {
    let cmd = path_param(cmd)?;
    let app_name = ctx.selection.resolve_name(&ctx.registry);
    info!("🎮 {} {}", app_name, cmd);

    CommandEvent::new(app_name, cmd).publish_on(ctx.bus.as_ref(), &ctx.namespace);
    Ok(StatusCode::OK)
}

/// POST /keydown/{cmd}
pub async fn keydown(cmd: Result<Path<String>, PathRejection>) -> Result<StatusCode, EcpError> {
    debug!("keydown {}", path_param(cmd)?);
    Ok(StatusCode::OK)
}

/// POST /keyup/{cmd}
pub async fn keyup(cmd: Result<Path<String>, PathRejection>) -> Result<StatusCode, EcpError> {
    debug!("keyup {}", path_param(cmd)?);
    Ok(StatusCode::OK)
}

/// POST /launch/{id}
///
/// L'index n'est pas borné : une valeur hors liste est conservée et
/// l'application active devient `None`.
pub async fn launch(
    State(ctx): State<EcpContext>,
    app_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, EcpError> {
    let app_id = path_param(app_id)?;
    let index: i64 = app_id
        .trim()
        .parse()
        .map_err(|_| EcpError::InvalidAppId(app_id.clone()))?;

    ctx.selection.set(index);
    info!(
        "📺 Select app: {}",
        ctx.selection.resolve_name(&ctx.registry)
    );
    Ok(StatusCode::OK)
}

/// POST /input
pub async fn input(Query(params): Query<HashMap<String, String>>) -> StatusCode {
    info!("⌨️ Input: {:?}", params);
    StatusCode::OK
}

/// POST /search et POST /search/browse
pub async fn search(Query(params): Query<HashMap<String, String>>) -> StatusCode {
    match params.get("keyword") {
        Some(keyword) => info!("🔍 Search: {}", keyword),
        None => debug!("Search without keyword: {:?}", params),
    }
    StatusCode::OK
}

/// Route inconnue
pub async fn not_found(uri: Uri) -> EcpError {
    EcpError::NotFound(uri.path().to_string())
}
