use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::monitoring::MappingError;
use crate::waffle::SwitchStore;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub views: usize,
    pub code_owner_mappings_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetSwitch {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct SwitchState {
    pub name: String,
    pub active: bool,
    pub previous: Option<bool>,
}

#[derive(Serialize)]
pub struct CodeOwnerPrefix {
    pub prefix: String,
    pub code_owner: String,
}

#[derive(Serialize)]
pub struct CodeOwnerReport {
    pub configured: bool,
    pub prefixes: Vec<CodeOwnerPrefix>,
    pub errors: Vec<MappingError>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        views: state.views.len(),
        code_owner_mappings_configured: state.mappings.load().is_configured(),
    })
}

pub async fn list_switches(State(state): State<AppState>) -> Json<BTreeMap<String, bool>> {
    Json(state.switches.all())
}

pub async fn set_switch(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<SetSwitch>,
) -> Json<SwitchState> {
    let previous = state.switches.set_active(&name, body.active);
    tracing::info!(switch = %name, active = body.active, previous = ?previous, "Waffle switch toggled");
    Json(SwitchState {
        name,
        active: body.active,
        previous,
    })
}

pub async fn get_code_owners(State(state): State<AppState>) -> Json<CodeOwnerReport> {
    let mappings = state.mappings.load();
    Json(CodeOwnerReport {
        configured: mappings.is_configured(),
        prefixes: mappings
            .entries()
            .into_iter()
            .map(|(prefix, code_owner)| CodeOwnerPrefix {
                prefix: prefix.to_string(),
                code_owner: code_owner.to_string(),
            })
            .collect(),
        errors: mappings.errors().to_vec(),
    })
}
