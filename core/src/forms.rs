//! Raw form input and its conversion into typed payloads and filters.
//!
//! Forms hold exactly what the user typed. `validate*` runs every field
//! through `validate` and `datetime` and yields the record or filter the
//! client sends. Blank numeric fields count as `0` and blank supplier
//! details fall back to placeholders, since the API rejects empty strings
//! there.

use chrono::{Local, NaiveDateTime};

use crate::datetime::normalize_datetime_at;
use crate::error::ValidationError;
use crate::types::{Seed, SeedFilter, Supplier, SupplierFilter};
use crate::validate;

const DEFAULT_SUPPLIER_NAME: &str = "Proveedor";
const DEFAULT_SUPPLIER_CITY: &str = "Ciudad";
const DEFAULT_SUPPLIER_PHONE: &str = "0000000000";

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Seed fields as typed into a create or update form.
#[derive(Debug, Clone, Default)]
pub struct SeedForm {
    pub code: String,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub seed_type: String,
    pub germination: String,
    pub supplier_id: String,
    pub ingestion_date: String,
}

impl SeedForm {
    pub fn validate(&self) -> Result<Seed, ValidationError> {
        self.validate_at(now())
    }

    /// Validate against a fixed clock; a blank date becomes `now`.
    pub fn validate_at(&self, now: NaiveDateTime) -> Result<Seed, ValidationError> {
        let code = validate::require("code", &self.code)?;
        let ingestion_date = normalize_datetime_at(&self.ingestion_date, now)?;
        let germination_percentage =
            validate::percentage("germination", validate::or_zero(&self.germination))?;
        let price = validate::non_negative("price", validate::or_zero(&self.price))?;
        let stock = validate::non_negative_integer("stock", validate::or_zero(&self.stock))?;
        let supplier_id = validate::require("supplier_id", &self.supplier_id)?;

        Ok(Seed {
            code,
            name: self.name.trim().to_string(),
            price,
            stock,
            seed_type: self.seed_type.trim().to_string(),
            germination_percentage,
            supplier_id,
            ingestion_date,
        })
    }
}

/// Supplier fields as typed into a create or update form.
///
/// `active` is free text; blank means active, matching a checkbox that
/// starts checked.
#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    pub tax_id: String,
    pub name: String,
    pub city: String,
    pub phone: String,
    pub registration_date: String,
    pub active: String,
}

impl SupplierForm {
    pub fn validate(&self) -> Result<Supplier, ValidationError> {
        self.validate_at(now())
    }

    pub fn validate_at(&self, now: NaiveDateTime) -> Result<Supplier, ValidationError> {
        let tax_id = validate::require("tax_id", &self.tax_id)?;
        let registration_date = normalize_datetime_at(&self.registration_date, now)?;
        let active = match validate::optional(&self.active) {
            Some(raw) => validate::boolean("active", &raw)?,
            None => true,
        };

        Ok(Supplier {
            tax_id,
            name: validate::optional(&self.name).unwrap_or_else(|| DEFAULT_SUPPLIER_NAME.to_string()),
            city: validate::optional(&self.city).unwrap_or_else(|| DEFAULT_SUPPLIER_CITY.to_string()),
            phone: validate::optional(&self.phone)
                .unwrap_or_else(|| DEFAULT_SUPPLIER_PHONE.to_string()),
            registration_date,
            active,
        })
    }
}

/// Seed listing filters as typed. Blank fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct SeedFilterForm {
    pub seed_type: String,
    pub germination_min: String,
    pub from: String,
    pub to: String,
}

impl SeedFilterForm {
    pub fn validate(&self) -> Result<SeedFilter, ValidationError> {
        self.validate_at(now())
    }

    pub fn validate_at(&self, now: NaiveDateTime) -> Result<SeedFilter, ValidationError> {
        let germination_min = match validate::optional(&self.germination_min) {
            Some(raw) => {
                validate::number("germination_min", &raw)?;
                Some(raw)
            }
            None => None,
        };
        let date = |raw: &str| -> Result<Option<String>, ValidationError> {
            validate::optional(raw)
                .map(|value| normalize_datetime_at(&value, now))
                .transpose()
        };

        Ok(SeedFilter {
            seed_type: validate::optional(&self.seed_type),
            germination_min,
            from: date(&self.from)?,
            to: date(&self.to)?,
        })
    }
}

/// Supplier listing filters as typed.
#[derive(Debug, Clone, Default)]
pub struct SupplierFilterForm {
    pub name: String,
    pub city: String,
    pub active: String,
}

impl SupplierFilterForm {
    /// A name search ignores city and active, so neither is checked then.
    pub fn validate(&self) -> Result<SupplierFilter, ValidationError> {
        if let Some(name) = validate::optional(&self.name) {
            return Ok(SupplierFilter {
                name: Some(name),
                ..Default::default()
            });
        }
        let active = validate::optional(&self.active)
            .map(|raw| validate::boolean("active", &raw))
            .transpose()?;
        Ok(SupplierFilter {
            name: None,
            city: validate::optional(&self.city),
            active,
        })
    }
}
