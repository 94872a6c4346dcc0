//! Named, stateless command handlers.
//!
//! A UI shell collects raw field values into [`Fields`] and calls
//! [`dispatch`] with a command name. Each handler validates, builds and
//! sends exactly one operation (plus the supplier existence probe for seed
//! writes) and hands back the normalized response.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::Error;
use crate::forms::{SeedFilterForm, SeedForm, SupplierFilterForm, SupplierForm};
use crate::gateway::Gateway;
use crate::types::{ApiResponse, Seed};
use crate::validate;

/// Raw field values keyed by field name. Missing fields read as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Parse `key=value` tokens. Tokens without `=` are reported back as `Err`.
    pub fn from_pairs<'a, I>(tokens: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = Self::new();
        for token in tokens {
            let (key, value) = token.split_once('=').ok_or_else(|| token.to_string())?;
            fields.insert(key.trim(), value);
        }
        Ok(fields)
    }

    fn seed_form(&self) -> SeedForm {
        SeedForm {
            code: self.get("code").to_string(),
            name: self.get("name").to_string(),
            price: self.get("price").to_string(),
            stock: self.get("stock").to_string(),
            seed_type: self.get("seed_type").to_string(),
            germination: self.get("germination").to_string(),
            supplier_id: self.get("supplier_id").to_string(),
            ingestion_date: self.get("ingestion_date").to_string(),
        }
    }

    fn supplier_form(&self) -> SupplierForm {
        SupplierForm {
            tax_id: self.get("tax_id").to_string(),
            name: self.get("name").to_string(),
            city: self.get("city").to_string(),
            phone: self.get("phone").to_string(),
            registration_date: self.get("registration_date").to_string(),
            active: self.get("active").to_string(),
        }
    }
}

pub type Handler = fn(&Gateway, &Fields) -> Result<ApiResponse, Error>;

/// An entry of the dispatch table.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub summary: &'static str,
    pub handler: Handler,
}

const SEED_FIELDS: &[&str] = &[
    "code",
    "name",
    "price",
    "stock",
    "seed_type",
    "germination",
    "supplier_id",
    "ingestion_date",
];
const SUPPLIER_FIELDS: &[&str] = &["tax_id", "name", "city", "phone", "registration_date", "active"];

pub const COMMANDS: &[Command] = &[
    Command {
        name: "seed.create",
        fields: SEED_FIELDS,
        summary: "Create a seed; the supplier must already exist",
        handler: create_seed,
    },
    Command {
        name: "seed.get",
        fields: &["code"],
        summary: "Fetch a seed by code",
        handler: get_seed,
    },
    Command {
        name: "seed.update",
        fields: SEED_FIELDS,
        summary: "Replace a seed; the supplier must already exist",
        handler: update_seed,
    },
    Command {
        name: "seed.delete",
        fields: &["code"],
        summary: "Delete a seed by code",
        handler: delete_seed,
    },
    Command {
        name: "seed.list",
        fields: &["seed_type", "germination_min", "from", "to"],
        summary: "List seeds, optionally filtered",
        handler: list_seeds,
    },
    Command {
        name: "supplier.create",
        fields: SUPPLIER_FIELDS,
        summary: "Create a supplier",
        handler: create_supplier,
    },
    Command {
        name: "supplier.get",
        fields: &["tax_id"],
        summary: "Fetch a supplier by tax id",
        handler: get_supplier,
    },
    Command {
        name: "supplier.update",
        fields: SUPPLIER_FIELDS,
        summary: "Replace a supplier",
        handler: update_supplier,
    },
    Command {
        name: "supplier.delete",
        fields: &["tax_id"],
        summary: "Delete a supplier by tax id",
        handler: delete_supplier,
    },
    Command {
        name: "supplier.list",
        fields: &["name", "city", "active"],
        summary: "List suppliers; a name search ignores city and active",
        handler: list_suppliers,
    },
    Command {
        name: "supplier.top-seeds",
        fields: &["tax_id"],
        summary: "Show a supplier with its two most recent seeds",
        handler: top_seeds,
    },
];

pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// Run the command registered as `name`.
pub fn dispatch(gateway: &Gateway, name: &str, fields: &Fields) -> Result<ApiResponse, Error> {
    let command = find(name).ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
    let result = (command.handler)(gateway, fields);
    match &result {
        Ok(response) => info!(command = name, status = response.status, "command completed"),
        Err(err) => warn!(command = name, error = %err, "command failed"),
    }
    result
}

fn ensure_supplier(gateway: &Gateway, seed: &Seed) -> Result<(), Error> {
    if gateway.supplier_exists(&seed.supplier_id) {
        Ok(())
    } else {
        Err(Error::Referential {
            supplier_id: seed.supplier_id.clone(),
        })
    }
}

fn create_seed(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let seed = fields.seed_form().validate()?;
    ensure_supplier(gateway, &seed)?;
    Ok(gateway.create_seed(&seed)?)
}

fn get_seed(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let code = validate::require("code", fields.get("code"))?;
    Ok(gateway.get_seed(&code)?)
}

fn update_seed(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let seed = fields.seed_form().validate()?;
    ensure_supplier(gateway, &seed)?;
    Ok(gateway.update_seed(&seed.code, &seed)?)
}

fn delete_seed(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let code = validate::require("code", fields.get("code"))?;
    Ok(gateway.delete_seed(&code)?)
}

fn list_seeds(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let filter = SeedFilterForm {
        seed_type: fields.get("seed_type").to_string(),
        germination_min: fields.get("germination_min").to_string(),
        from: fields.get("from").to_string(),
        to: fields.get("to").to_string(),
    }
    .validate()?;
    Ok(gateway.list_seeds(&filter)?)
}

fn create_supplier(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let supplier = fields.supplier_form().validate()?;
    Ok(gateway.create_supplier(&supplier)?)
}

fn get_supplier(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let tax_id = validate::require("tax_id", fields.get("tax_id"))?;
    Ok(gateway.get_supplier(&tax_id)?)
}

fn update_supplier(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let supplier = fields.supplier_form().validate()?;
    Ok(gateway.update_supplier(&supplier.tax_id, &supplier)?)
}

fn delete_supplier(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let tax_id = validate::require("tax_id", fields.get("tax_id"))?;
    Ok(gateway.delete_supplier(&tax_id)?)
}

fn list_suppliers(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let filter = SupplierFilterForm {
        name: fields.get("name").to_string(),
        city: fields.get("city").to_string(),
        active: fields.get("active").to_string(),
    }
    .validate()?;
    Ok(gateway.list_suppliers(&filter)?)
}

fn top_seeds(gateway: &Gateway, fields: &Fields) -> Result<ApiResponse, Error> {
    let tax_id = validate::require("tax_id", fields.get("tax_id"))?;
    Ok(gateway.top_seeds(&tax_id)?)
}
