//! Stateless HTTP request builder and response parser for the inventory API.
//!
//! # Design
//! `InventoryClient` holds only the parsed base URL and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `Gateway` pairs the two with a transport; tests use the
//! halves directly.
//!
//! Identifiers are encoded as single path segments and filters as a
//! form-encoded query, so user input can never change the route.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Seed, SeedFilter, Supplier, SupplierFilter, TopSeeds};

const SEEDS: [&str; 3] = ["api", "v1", "semillas"];
const SUPPLIERS: [&str; 3] = ["api", "v1", "proveedores"];

/// Synchronous, stateless client for the inventory API.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    base: Url,
}

impl InventoryClient {
    /// A trailing slash on `base_url` is ignored; a path prefix is kept.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let invalid = || ApiError::InvalidBaseUrl(base_url.to_string());
        let base = Url::parse(base_url.trim_end_matches('/')).map_err(|_| invalid())?;
        if base.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(Self { base })
    }

    // --- seeds ---

    pub fn build_create_seed(&self, seed: &Seed) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.url(&SEEDS, None, &[]), seed)
    }

    pub fn build_get_seed(&self, code: &str) -> HttpRequest {
        empty_request(HttpMethod::Get, self.url(&SEEDS, Some(code), &[]))
    }

    pub fn build_update_seed(&self, code: &str, seed: &Seed) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.url(&SEEDS, Some(code), &[]), seed)
    }

    pub fn build_delete_seed(&self, code: &str) -> HttpRequest {
        empty_request(HttpMethod::Delete, self.url(&SEEDS, Some(code), &[]))
    }

    pub fn build_list_seeds(&self, filter: &SeedFilter) -> HttpRequest {
        empty_request(HttpMethod::Get, self.url(&SEEDS, None, &filter.query_pairs()))
    }

    pub fn parse_create_seed(&self, response: HttpResponse) -> Result<Seed, ApiError> {
        parse_json(&response, &[201, 200])
    }

    pub fn parse_get_seed(&self, response: HttpResponse) -> Result<Seed, ApiError> {
        parse_json(&response, &[200])
    }

    pub fn parse_update_seed(&self, response: HttpResponse) -> Result<Seed, ApiError> {
        parse_json(&response, &[200])
    }

    pub fn parse_delete_seed(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    pub fn parse_list_seeds(&self, response: HttpResponse) -> Result<Vec<Seed>, ApiError> {
        parse_json(&response, &[200])
    }

    // --- suppliers ---

    pub fn build_create_supplier(&self, supplier: &Supplier) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.url(&SUPPLIERS, None, &[]), supplier)
    }

    pub fn build_get_supplier(&self, tax_id: &str) -> HttpRequest {
        empty_request(HttpMethod::Get, self.url(&SUPPLIERS, Some(tax_id), &[]))
    }

    pub fn build_update_supplier(
        &self,
        tax_id: &str,
        supplier: &Supplier,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.url(&SUPPLIERS, Some(tax_id), &[]), supplier)
    }

    pub fn build_delete_supplier(&self, tax_id: &str) -> HttpRequest {
        empty_request(HttpMethod::Delete, self.url(&SUPPLIERS, Some(tax_id), &[]))
    }

    pub fn build_list_suppliers(&self, filter: &SupplierFilter) -> HttpRequest {
        empty_request(HttpMethod::Get, self.url(&SUPPLIERS, None, &filter.query_pairs()))
    }

    /// `GET /proveedores/{nit}/top2`: the supplier and its two most recent seeds.
    pub fn build_top_seeds(&self, tax_id: &str) -> HttpRequest {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(SUPPLIERS).push(tax_id).push("top2");
        }
        empty_request(HttpMethod::Get, url.into())
    }

    pub fn parse_create_supplier(&self, response: HttpResponse) -> Result<Supplier, ApiError> {
        parse_json(&response, &[201, 200])
    }

    pub fn parse_get_supplier(&self, response: HttpResponse) -> Result<Supplier, ApiError> {
        parse_json(&response, &[200])
    }

    pub fn parse_update_supplier(&self, response: HttpResponse) -> Result<Supplier, ApiError> {
        parse_json(&response, &[200])
    }

    pub fn parse_delete_supplier(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    pub fn parse_list_suppliers(&self, response: HttpResponse) -> Result<Vec<Supplier>, ApiError> {
        parse_json(&response, &[200])
    }

    pub fn parse_top_seeds(&self, response: HttpResponse) -> Result<TopSeeds, ApiError> {
        parse_json(&response, &[200])
    }

    fn url(&self, collection: &[&str], id: Option<&str>, query: &[(&str, String)]) -> String {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(collection).extend(id);
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        url.into()
    }
}

fn empty_request(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    url: String,
    payload: &T,
) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse, expected: &[u16]) -> Result<T, ApiError> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> InventoryClient {
        InventoryClient::new("http://localhost:8080").unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn seed() -> Seed {
        Seed {
            code: "S-01".to_string(),
            name: "Maize".to_string(),
            price: 12.5,
            stock: 40,
            seed_type: "cereal".to_string(),
            germination_percentage: 92.0,
            supplier_id: "900123456".to_string(),
            ingestion_date: "2024-06-01T00:00:00".to_string(),
        }
    }

    const SEED_JSON: &str = r#"{"codigo":"S-01","nombre":"Maize","precio":12.5,"stock":40,"tipoSemilla":"cereal","porcentajeGerminacion":92.0,"proveedorNit":"900123456","fechaIngreso":"2024-06-01T00:00:00"}"#;
    const SUPPLIER_JSON: &str = r#"{"nit":"900123456","nombre":"Acme","ciudad":"Bogota","telefono":"3001234567","fechaRegistro":"2024-01-01T00:00:00","activo":true}"#;

    #[test]
    fn build_create_seed_produces_json_post() {
        let req = client().build_create_seed(&seed()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/v1/semillas");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["codigo"], "S-01");
        assert_eq!(body["porcentajeGerminacion"], 92.0);
    }

    #[test]
    fn build_get_seed_puts_code_in_path() {
        let req = client().build_get_seed("S-01");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/v1/semillas/S-01");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_update_and_delete_seed() {
        let req = client().build_update_seed("S-01", &seed()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/api/v1/semillas/S-01");
        assert!(req.body.is_some());

        let req = client().build_delete_seed("S-01");
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn path_identifiers_are_encoded_as_one_segment() {
        let req = client().build_get_supplier("90/12 3");
        assert_eq!(req.url, "http://localhost:8080/api/v1/proveedores/90%2F12%203");
    }

    #[test]
    fn build_list_seeds_encodes_filters() {
        let filter = SeedFilter {
            seed_type: Some("cereal".to_string()),
            germination_min: Some("80".to_string()),
            from: Some("2024-01-01T00:00:00".to_string()),
            to: None,
        };
        let req = client().build_list_seeds(&filter);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:8080/api/v1/semillas?tipo=cereal&germinacionMin=80&desde=2024-01-01T00%3A00%3A00"
        );
    }

    #[test]
    fn build_list_without_filters_has_no_query() {
        let req = client().build_list_suppliers(&SupplierFilter::default());
        assert_eq!(req.url, "http://localhost:8080/api/v1/proveedores");
    }

    #[test]
    fn supplier_name_filter_wins_over_city() {
        let filter = SupplierFilter {
            name: Some("Acme".to_string()),
            city: Some("Bogota".to_string()),
            active: None,
        };
        let req = client().build_list_suppliers(&filter);
        assert_eq!(req.url, "http://localhost:8080/api/v1/proveedores?nombre=Acme");
    }

    #[test]
    fn build_top_seeds_targets_nested_route() {
        let req = client().build_top_seeds("900123456");
        assert_eq!(req.url, "http://localhost:8080/api/v1/proveedores/900123456/top2");
    }

    #[test]
    fn trailing_slash_is_stripped_and_prefix_kept() {
        let c = InventoryClient::new("http://localhost:8080/").unwrap();
        assert_eq!(c.build_get_seed("A").url, "http://localhost:8080/api/v1/semillas/A");

        let c = InventoryClient::new("http://gateway.local/inventory/").unwrap();
        assert_eq!(
            c.build_get_seed("A").url,
            "http://gateway.local/inventory/api/v1/semillas/A"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            InventoryClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            InventoryClient::new("mailto:ops@example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn parse_create_seed_accepts_201() {
        let parsed = client().parse_create_seed(response(201, SEED_JSON)).unwrap();
        assert_eq!(parsed, seed());
    }

    #[test]
    fn parse_get_seed_not_found() {
        let err = client().parse_get_seed(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_supplier_conflict_is_surfaced() {
        let err = client()
            .parse_create_supplier(response(409, r#"{"message":"duplicate"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 409, .. }));
    }

    #[test]
    fn parse_delete_accepts_no_content() {
        assert!(client().parse_delete_seed(response(204, "")).is_ok());
        assert!(client().parse_delete_supplier(response(200, "")).is_ok());
        assert!(matches!(
            client().parse_delete_supplier(response(404, "")),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn parse_list_suppliers_success() {
        let body = format!("[{SUPPLIER_JSON}]");
        let suppliers = client().parse_list_suppliers(response(200, &body)).unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].tax_id, "900123456");
        assert!(suppliers[0].active);
    }

    #[test]
    fn parse_list_seeds_bad_json() {
        let err = client().parse_list_seeds(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_top_seeds_success() {
        let body = format!(r#"{{"proveedor":{SUPPLIER_JSON},"semillas":[{SEED_JSON}]}}"#);
        let top = client().parse_top_seeds(response(200, &body)).unwrap();
        assert_eq!(top.supplier.name, "Acme");
        assert_eq!(top.seeds, vec![seed()]);
    }
}
