//! Domain records, filters and the normalized API response.
//!
//! # Design
//! Rust field names are English; the wire keys are the inventory API's
//! Spanish camel-case names, pinned with `#[serde(rename)]` so the payload
//! key sets stay exactly as the API documents them. The stub server in
//! `mock-server` defines its own copies; integration tests catch drift.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpResponse;

/// Seed stock record, as sent on create/update and returned on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "tipoSemilla")]
    pub seed_type: String,
    #[serde(rename = "porcentajeGerminacion")]
    pub germination_percentage: f64,
    #[serde(rename = "proveedorNit")]
    pub supplier_id: String,
    /// Canonical `YYYY-MM-DDTHH:MM:SS`.
    #[serde(rename = "fechaIngreso")]
    pub ingestion_date: String,
}

/// Seed provider record, referenced by `Seed::supplier_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "nit")]
    pub tax_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Canonical `YYYY-MM-DDTHH:MM:SS`.
    #[serde(rename = "fechaRegistro")]
    pub registration_date: String,
    #[serde(rename = "activo")]
    pub active: bool,
}

/// A supplier together with its (at most two) most recently ingested seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSeeds {
    #[serde(rename = "proveedor")]
    pub supplier: Supplier,
    #[serde(rename = "semillas")]
    pub seeds: Vec<Seed>,
}

/// Filters for listing seeds. `None` fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedFilter {
    pub seed_type: Option<String>,
    /// Sent as the user typed it once it has been checked to be numeric.
    pub germination_min: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SeedFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("tipo", &self.seed_type),
            ("germinacionMin", &self.germination_min),
            ("desde", &self.from),
            ("hasta", &self.to),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

/// Filters for listing suppliers.
///
/// A name search is exclusive: when `name` is set, `city` and `active` are
/// not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierFilter {
    pub name: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

impl SupplierFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        if let Some(name) = &self.name {
            return vec![("nombre", name.clone())];
        }
        let mut pairs = Vec::new();
        if let Some(city) = &self.city {
            pairs.push(("ciudad", city.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("activo", active.to_string()));
        }
        pairs
    }
}

/// Status code plus body of a completed exchange, ready for display.
///
/// `data` is the parsed JSON body, or `{"raw": <text>}` when the body is
/// not JSON (including an empty body).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<HttpResponse> for ApiResponse {
    fn from(response: HttpResponse) -> Self {
        let data: Value = serde_json::from_str(&response.body)
            .unwrap_or_else(|_| serde_json::json!({ "raw": response.body }));
        Self {
            status: response.status,
            data,
        }
    }
}
