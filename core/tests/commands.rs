//! Command pipeline against a scripted transport.
//!
//! The stub answers by method and path and records every request, so tests
//! can assert both what was sent and what was never sent.

use std::sync::{Arc, Mutex};

use inventario_core::{
    dispatch, Error, Fields, Gateway, HttpMethod, HttpRequest, HttpResponse, InventoryClient,
    Transport, ValidationError,
};

type Route = Box<dyn Fn(&HttpRequest) -> Option<(u16, String)>>;

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<HttpRequest>>>);

impl Recorder {
    fn requests(&self) -> Vec<HttpRequest> {
        self.0.lock().unwrap().clone()
    }
}

struct ScriptedTransport {
    routes: Vec<Route>,
    recorder: Recorder,
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, inventario_core::ApiError> {
        self.recorder.0.lock().unwrap().push(request.clone());
        let (status, body) = self
            .routes
            .iter()
            .find_map(|route| route(request))
            .unwrap_or((404, String::new()));
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

const BASE: &str = "http://stub.test";

fn gateway(routes: Vec<Route>) -> (Gateway, Recorder) {
    let recorder = Recorder::default();
    let transport = ScriptedTransport {
        routes,
        recorder: recorder.clone(),
    };
    let client = InventoryClient::new(BASE).unwrap();
    (Gateway::new(client, Box::new(transport)), recorder)
}

fn route(method: HttpMethod, path: &'static str, status: u16) -> Route {
    Box::new(move |req: &HttpRequest| {
        (req.method == method && req.url == format!("{BASE}{path}"))
            .then(|| (status, req.body.clone().unwrap_or_else(|| "{}".to_string())))
    })
}

fn seed_fields(supplier: &str) -> Fields {
    Fields::new()
        .with("code", "S-01")
        .with("name", "Sweet corn")
        .with("price", "12.5")
        .with("stock", "40")
        .with("seed_type", "cereal")
        .with("germination", "92")
        .with("supplier_id", supplier)
        .with("ingestion_date", "2024-06-01")
}

fn body_keys(request: &HttpRequest) -> Vec<String> {
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

#[test]
fn unknown_supplier_blocks_seed_create() {
    let (gw, recorder) = gateway(vec![route(HttpMethod::Post, "/api/v1/semillas", 201)]);

    let err = dispatch(&gw, "seed.create", &seed_fields("404404")).unwrap_err();
    assert!(matches!(err, Error::Referential { .. }));
    assert!(err.to_string().contains("create the supplier first"));

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1, "only the existence probe is sent");
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].url, format!("{BASE}/api/v1/proveedores/404404"));
}

#[test]
fn unknown_supplier_blocks_seed_update() {
    let (gw, recorder) = gateway(vec![route(HttpMethod::Put, "/api/v1/semillas/S-01", 200)]);

    let err = dispatch(&gw, "seed.update", &seed_fields("404404")).unwrap_err();
    assert!(matches!(err, Error::Referential { .. }));
    assert!(recorder
        .requests()
        .iter()
        .all(|r| r.method == HttpMethod::Get));
}

#[test]
fn invalid_fields_send_nothing() {
    let (gw, recorder) = gateway(Vec::new());

    let cases = [
        ("seed.create", seed_fields("1").with("germination", "100.1")),
        ("seed.create", seed_fields("1").with("code", "  ")),
        ("seed.update", seed_fields("1").with("stock", "1.5")),
        ("seed.get", Fields::new()),
        ("seed.list", Fields::new().with("from", "yesterday")),
        ("supplier.create", Fields::new().with("tax_id", "1").with("active", "yes")),
        ("supplier.delete", Fields::new().with("tax_id", " ")),
    ];
    for (name, fields) in cases {
        let err = dispatch(&gw, name, &fields).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{name}: {err}");
    }
    assert!(recorder.requests().is_empty());
}

#[test]
fn missing_code_names_the_field() {
    let (gw, _) = gateway(Vec::new());
    let err = dispatch(&gw, "seed.delete", &Fields::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::RequiredField { field: "code" })
    ));
}

#[test]
fn unknown_command_is_reported() {
    let (gw, _) = gateway(Vec::new());
    let err = dispatch(&gw, "seed.plant", &Fields::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownCommand(name) if name == "seed.plant"));
}

#[test]
fn supplier_then_seed_with_exact_payloads() {
    let (gw, recorder) = gateway(vec![
        route(HttpMethod::Post, "/api/v1/proveedores", 201),
        route(HttpMethod::Get, "/api/v1/proveedores/900123456", 200),
        route(HttpMethod::Post, "/api/v1/semillas", 201),
    ]);

    let supplier = Fields::new()
        .with("tax_id", "900123456")
        .with("registration_date", "2024-01-01 10:00");
    let created = dispatch(&gw, "supplier.create", &supplier).unwrap();
    assert_eq!(created.status, 201);

    let created = dispatch(&gw, "seed.create", &seed_fields("900123456")).unwrap();
    assert_eq!(created.status, 201);
    assert_eq!(created.data["proveedorNit"], "900123456");

    let requests = recorder.requests();
    let sent: Vec<(HttpMethod, &str)> = requests
        .iter()
        .map(|r| (r.method, r.url.trim_start_matches(BASE)))
        .collect();
    assert_eq!(
        sent,
        vec![
            (HttpMethod::Post, "/api/v1/proveedores"),
            (HttpMethod::Get, "/api/v1/proveedores/900123456"),
            (HttpMethod::Post, "/api/v1/semillas"),
        ]
    );

    assert_eq!(
        body_keys(&requests[0]),
        ["activo", "ciudad", "fechaRegistro", "nit", "nombre", "telefono"]
    );
    assert_eq!(
        body_keys(&requests[2]),
        [
            "codigo",
            "fechaIngreso",
            "nombre",
            "porcentajeGerminacion",
            "precio",
            "proveedorNit",
            "stock",
            "tipoSemilla",
        ]
    );

    let supplier_body: serde_json::Value =
        serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(supplier_body["fechaRegistro"], "2024-01-01T10:00:00");
    assert_eq!(supplier_body["nombre"], "Proveedor");
    assert_eq!(supplier_body["activo"], true);

    let seed_body: serde_json::Value =
        serde_json::from_str(requests[2].body.as_deref().unwrap()).unwrap();
    assert_eq!(seed_body["fechaIngreso"], "2024-06-01T00:00:00");
    assert_eq!(seed_body["stock"], 40);
    assert_eq!(seed_body["precio"], 12.5);
}

#[test]
fn supplier_list_sends_only_name_when_given_and_ignores_the_rest() {
    let (gw, recorder) = gateway(Vec::new());
    let fields = Fields::new()
        .with("name", "Acme")
        .with("city", "Bogota")
        .with("active", "yes");
    dispatch(&gw, "supplier.list", &fields).unwrap();

    let requests = recorder.requests();
    assert_eq!(requests[0].url, format!("{BASE}/api/v1/proveedores?nombre=Acme"));
}

#[test]
fn supplier_list_combines_city_and_active() {
    let (gw, recorder) = gateway(Vec::new());
    let fields = Fields::new().with("city", "Bogota").with("active", "TRUE");
    dispatch(&gw, "supplier.list", &fields).unwrap();

    assert_eq!(
        recorder.requests()[0].url,
        format!("{BASE}/api/v1/proveedores?ciudad=Bogota&activo=true")
    );
}

#[test]
fn non_success_statuses_are_returned_verbatim() {
    let failing: Route = Box::new(|_req: &HttpRequest| Some((500, "upstream exploded".to_string())));
    let (gw, _) = gateway(vec![failing]);
    let response = dispatch(&gw, "seed.get", &Fields::new().with("code", "S-01")).unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.data, serde_json::json!({ "raw": "upstream exploded" }));
}
