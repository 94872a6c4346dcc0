//! In-memory stand-in for the inventory REST API.
//!
//! Serves `/api/v1/semillas` and `/api/v1/proveedores` with the same routes,
//! status codes and filter rules as the real service, so client tests can
//! run end-to-end without a database.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semilla {
    pub codigo: String,
    pub nombre: String,
    pub precio: f64,
    pub stock: i64,
    pub tipo_semilla: String,
    pub porcentaje_germinacion: f64,
    pub proveedor_nit: String,
    pub fecha_ingreso: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proveedor {
    pub nit: String,
    pub nombre: String,
    pub ciudad: String,
    pub telefono: String,
    pub fecha_registro: String,
    pub activo: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Top2 {
    pub proveedor: Proveedor,
    pub semillas: Vec<Semilla>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemillaQuery {
    pub tipo: Option<String>,
    pub germinacion_min: Option<String>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProveedorQuery {
    pub nombre: Option<String>,
    pub ciudad: Option<String>,
    pub activo: Option<String>,
}

#[derive(Default)]
pub struct Store {
    semillas: BTreeMap<String, Semilla>,
    proveedores: BTreeMap<String, Proveedor>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body shaped like the real service's exception handler output.
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/v1/semillas", get(list_semillas).post(create_semilla))
        .route(
            "/api/v1/semillas/{codigo}",
            get(get_semilla).put(update_semilla).delete(delete_semilla),
        )
        .route("/api/v1/proveedores", get(list_proveedores).post(create_proveedor))
        .route(
            "/api/v1/proveedores/{nit}",
            get(get_proveedor).put(update_proveedor).delete(delete_proveedor),
        )
        .route("/api/v1/proveedores/{nit}/top2", get(top2))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn parse_iso(field: &str, value: &str) -> Result<NaiveDateTime, Failure> {
    NaiveDateTime::parse_from_str(value, ISO_FORMAT).map_err(|_| {
        Failure::bad_request(format!("{field}: expected date format yyyy-MM-dd'T'HH:mm:ss"))
    })
}

fn require(field: &str, value: &str) -> Result<(), Failure> {
    if value.trim().is_empty() {
        return Err(Failure::bad_request(format!("{field}: must not be blank")));
    }
    Ok(())
}

fn check_semilla(s: &Semilla) -> Result<(), Failure> {
    require("codigo", &s.codigo)?;
    require("nombre", &s.nombre)?;
    require("tipoSemilla", &s.tipo_semilla)?;
    require("proveedorNit", &s.proveedor_nit)?;
    if s.precio < 0.0 {
        return Err(Failure::bad_request("precio: must be >= 0"));
    }
    if s.stock < 0 {
        return Err(Failure::bad_request("stock: must be >= 0"));
    }
    if !(0.0..=100.0).contains(&s.porcentaje_germinacion) {
        return Err(Failure::bad_request("porcentajeGerminacion: must be between 0 and 100"));
    }
    parse_iso("fechaIngreso", &s.fecha_ingreso)?;
    Ok(())
}

fn check_proveedor(p: &Proveedor) -> Result<(), Failure> {
    require("nit", &p.nit)?;
    require("nombre", &p.nombre)?;
    require("ciudad", &p.ciudad)?;
    require("telefono", &p.telefono)?;
    parse_iso("fechaRegistro", &p.fecha_registro)?;
    Ok(())
}

// --- semillas ---

async fn list_semillas(
    State(db): State<Db>,
    Query(query): Query<SemillaQuery>,
) -> Result<Json<Vec<Semilla>>, Failure> {
    let germinacion_min = query
        .germinacion_min
        .as_deref()
        .map(|raw| {
            raw.parse::<f64>()
                .map_err(|_| Failure::bad_request("germinacionMin: must be numeric"))
        })
        .transpose()?;
    let desde = query.desde.as_deref().map(|v| parse_iso("desde", v)).transpose()?;
    let hasta = query.hasta.as_deref().map(|v| parse_iso("hasta", v)).transpose()?;

    let store = db.read().await;
    let semillas = store
        .semillas
        .values()
        .filter(|s| query.tipo.as_ref().is_none_or(|tipo| &s.tipo_semilla == tipo))
        .filter(|s| germinacion_min.is_none_or(|min| s.porcentaje_germinacion >= min))
        .filter(|s| {
            let Ok(fecha) = NaiveDateTime::parse_from_str(&s.fecha_ingreso, ISO_FORMAT) else {
                return false;
            };
            desde.is_none_or(|d| fecha >= d) && hasta.is_none_or(|h| fecha <= h)
        })
        .cloned()
        .collect();
    Ok(Json(semillas))
}

async fn create_semilla(
    State(db): State<Db>,
    Json(input): Json<Semilla>,
) -> Result<(StatusCode, Json<Semilla>), Failure> {
    check_semilla(&input)?;
    let mut store = db.write().await;
    if store.semillas.contains_key(&input.codigo) {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            format!("seed {} already exists", input.codigo),
        ));
    }
    info!(codigo = %input.codigo, "seed created");
    store.semillas.insert(input.codigo.clone(), input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn get_semilla(
    State(db): State<Db>,
    Path(codigo): Path<String>,
) -> Result<Json<Semilla>, Failure> {
    let store = db.read().await;
    store
        .semillas
        .get(&codigo)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("seed {codigo} not found")))
}

async fn update_semilla(
    State(db): State<Db>,
    Path(codigo): Path<String>,
    Json(input): Json<Semilla>,
) -> Result<Json<Semilla>, Failure> {
    check_semilla(&input)?;
    let mut store = db.write().await;
    let semilla = store
        .semillas
        .get_mut(&codigo)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("seed {codigo} not found")))?;
    *semilla = Semilla { codigo, ..input };
    Ok(Json(semilla.clone()))
}

async fn delete_semilla(
    State(db): State<Db>,
    Path(codigo): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .semillas
        .remove(&codigo)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("seed {codigo} not found")))
}

// --- proveedores ---

async fn list_proveedores(
    State(db): State<Db>,
    Query(query): Query<ProveedorQuery>,
) -> Json<Vec<Proveedor>> {
    let store = db.read().await;
    let all = store.proveedores.values();
    let proveedores = if let Some(nombre) = &query.nombre {
        let needle = nombre.to_lowercase();
        all.filter(|p| p.nombre.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    } else {
        // Any token other than "true" reads as false.
        let activo = query.activo.as_deref().map(|v| v.eq_ignore_ascii_case("true"));
        all.filter(|p| query.ciudad.as_ref().is_none_or(|c| &p.ciudad == c))
            .filter(|p| activo.is_none_or(|a| p.activo == a))
            .cloned()
            .collect()
    };
    Json(proveedores)
}

async fn create_proveedor(
    State(db): State<Db>,
    Json(input): Json<Proveedor>,
) -> Result<(StatusCode, Json<Proveedor>), Failure> {
    check_proveedor(&input)?;
    let mut store = db.write().await;
    if store.proveedores.contains_key(&input.nit) {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            format!("supplier {} already exists", input.nit),
        ));
    }
    info!(nit = %input.nit, "supplier created");
    store.proveedores.insert(input.nit.clone(), input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn get_proveedor(
    State(db): State<Db>,
    Path(nit): Path<String>,
) -> Result<Json<Proveedor>, Failure> {
    let store = db.read().await;
    store
        .proveedores
        .get(&nit)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("supplier {nit} not found")))
}

async fn update_proveedor(
    State(db): State<Db>,
    Path(nit): Path<String>,
    Json(input): Json<Proveedor>,
) -> Result<Json<Proveedor>, Failure> {
    check_proveedor(&input)?;
    let mut store = db.write().await;
    let proveedor = store
        .proveedores
        .get_mut(&nit)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("supplier {nit} not found")))?;
    *proveedor = Proveedor { nit, ..input };
    Ok(Json(proveedor.clone()))
}

async fn delete_proveedor(
    State(db): State<Db>,
    Path(nit): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .proveedores
        .remove(&nit)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("supplier {nit} not found")))
}

async fn top2(State(db): State<Db>, Path(nit): Path<String>) -> Result<Json<Top2>, Failure> {
    let store = db.read().await;
    let proveedor = store
        .proveedores
        .get(&nit)
        .cloned()
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("supplier {nit} not found")))?;
    let mut semillas: Vec<Semilla> = store
        .semillas
        .values()
        .filter(|s| s.proveedor_nit == nit)
        .cloned()
        .collect();
    // Canonical timestamps sort chronologically as strings.
    semillas.sort_by(|a, b| b.fecha_ingreso.cmp(&a.fecha_ingreso));
    semillas.truncate(2);
    Ok(Json(Top2 {
        proveedor,
        semillas,
    }))
}
