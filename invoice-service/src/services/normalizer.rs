//! Field normalizer: raw customer, vehicle and invoice rows to canonical models.
//!
//! Each canonical field is looked up through an ordered alias list in
//! [`aliases`]; the first present, non-null, well-typed value wins. A value
//! that cannot be read as the field's type (for example `"abc"` for a price)
//! is treated as absent and lookup falls through to the next alias.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{BillingError, EntityKind};
use crate::models::{
    Customer, DiscountSpec, ExtraCharge, GstSpec, Invoice, InvoiceKind, InvoiceStatus, LineItem,
    RawRecord, Vehicle, VehicleCategory,
};

/// Canonical field name plus the keys it has been stored under, modern first.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub field: &'static str,
    pub keys: &'static [&'static str],
}

const fn field(field: &'static str, keys: &'static [&'static str]) -> FieldAliases {
    FieldAliases { field, keys }
}

/// Alias priority table. Adding a legacy spelling is a one-line edit here.
pub mod aliases {
    use super::{field, FieldAliases};

    pub const CUSTOMER_NAME: FieldAliases = field("name", &["name", "customer_name", "customerName"]);
    pub const CUSTOMER_PHONE: FieldAliases =
        field("phone", &["phone", "phone_number", "phoneNumber", "mobile"]);
    pub const CUSTOMER_EMAIL: FieldAliases = field("email", &["email", "email_address", "emailAddress"]);
    pub const CUSTOMER_GST_NUMBER: FieldAliases =
        field("gst_number", &["gst_number", "gstNumber", "gstin"]);

    pub const VEHICLE_MAKE: FieldAliases = field("make", &["make", "vehicle_make", "vehicleMake"]);
    pub const VEHICLE_MODEL: FieldAliases = field("model", &["model", "vehicle_model", "vehicleModel"]);
    pub const VEHICLE_REGISTRATION: FieldAliases = field(
        "vehicle_number",
        &["vehicle_number", "vehicleNumber", "registration_number", "registrationNumber"],
    );
    pub const VEHICLE_CATEGORY: FieldAliases =
        field("vehicle_type", &["vehicle_type", "vehicleType", "type"]);

    pub const INVOICE_NUMBER: FieldAliases =
        field("invoice_number", &["invoice_number", "invoiceNumber"]);
    pub const INVOICE_CREATED: FieldAliases = field(
        "created_at",
        &["created_at", "createdAt", "invoice_date", "invoiceDate"],
    );
    pub const INVOICE_DUE: FieldAliases = field("due_date", &["due_date", "dueDate"]);
    pub const INVOICE_KIND: FieldAliases = field("invoice_type", &["invoice_type", "invoiceType"]);
    pub const INVOICE_STATUS: FieldAliases = field("status", &["status"]);
    pub const INVOICE_ITEMS: FieldAliases = field("items", &["items", "invoice_items", "invoiceItems"]);
    pub const INVOICE_LABOR: FieldAliases = field(
        "labor_charges",
        &["labor_charges", "laborCharges", "labour_charges", "labourCharges"],
    );
    pub const INVOICE_EXTRA_CHARGES: FieldAliases =
        field("extra_charges", &["extra_charges", "extraCharges"]);
    pub const INVOICE_DISCOUNT_PERCENTAGE: FieldAliases = field(
        "discount_percentage",
        &["discount_percentage", "discountPercentage", "discount"],
    );
    pub const INVOICE_DISCOUNT_AMOUNT: FieldAliases =
        field("discount_amount", &["discount_amount", "discountAmount"]);
    /// Non-GST rows often keep their single tax figure in the GST column.
    pub const INVOICE_FLAT_TAX: FieldAliases = field(
        "tax_amount",
        &["tax_amount", "taxAmount", "total_gst_amount", "totalGstAmount"],
    );
    pub const INVOICE_GST_AMOUNT: FieldAliases = field(
        "total_gst_amount",
        &["total_gst_amount", "totalGstAmount", "gst_amount", "gstAmount"],
    );
    pub const INVOICE_GST_RATE: FieldAliases = field(
        "gst_rate",
        &["gst_rate", "gstRate", "gst_percentage", "gstPercentage"],
    );
    pub const INVOICE_CGST: FieldAliases = field("cgst_amount", &["cgst_amount", "cgstAmount", "cgst"]);
    pub const INVOICE_SGST: FieldAliases = field("sgst_amount", &["sgst_amount", "sgstAmount", "sgst"]);
    pub const INVOICE_NOTES: FieldAliases = field("notes", &["notes", "remarks"]);
    pub const INVOICE_KILOMETERS: FieldAliases =
        field("kilometers", &["kilometers", "kms", "odometer_reading", "odometerReading"]);
    pub const INVOICE_CUSTOMER_ID: FieldAliases =
        field("customer_id", &["customer_id", "customerId"]);
    pub const INVOICE_VEHICLE_ID: FieldAliases = field("vehicle_id", &["vehicle_id", "vehicleId"]);

    pub const ITEM_DESCRIPTION: FieldAliases = field(
        "name",
        &["name", "description", "item_name", "itemName", "service_name"],
    );
    pub const ITEM_TYPE: FieldAliases = field("item_type", &["item_type", "itemType", "type"]);
    pub const ITEM_HSN_SAC: FieldAliases = field(
        "sac_hsn_code",
        &["sac_hsn_code", "hsn_sac_code", "hsnSacCode", "sacHsnCode", "hsn_code"],
    );
    pub const ITEM_QUANTITY: FieldAliases = field("quantity", &["quantity", "qty"]);
    pub const ITEM_UNIT_PRICE: FieldAliases =
        field("unit_price", &["unit_price", "unitPrice", "rate", "price"]);
    pub const ITEM_DISCOUNT: FieldAliases =
        field("discount_amount", &["discount_amount", "discountAmount", "discount"]);
    pub const ITEM_TOTAL: FieldAliases =
        field("total_amount", &["total_amount", "totalAmount", "total"]);

    pub const CHARGE_NAME: FieldAliases = field("name", &["name", "description", "label"]);
    pub const CHARGE_AMOUNT: FieldAliases = field("amount", &["amount", "value"]);
}

/// Typed lookups over one raw record.
struct Fields<'a> {
    record: &'a RawRecord,
}

impl<'a> Fields<'a> {
    fn new(record: &'a RawRecord) -> Self {
        Self { record }
    }

    fn first<T>(&self, aliases: &FieldAliases, read: impl Fn(&Value) -> Option<T>) -> Option<T> {
        aliases
            .keys
            .iter()
            .filter_map(|key| self.record.get(key))
            .find_map(read)
    }

    fn text(&self, aliases: &FieldAliases) -> Option<String> {
        self.first(aliases, value_to_text)
    }

    fn decimal(&self, aliases: &FieldAliases) -> Option<Decimal> {
        self.first(aliases, value_to_decimal)
    }

    fn integer(&self, aliases: &FieldAliases) -> Option<i64> {
        self.first(aliases, value_to_integer)
    }

    fn date(&self, aliases: &FieldAliases) -> Option<NaiveDate> {
        self.first(aliases, value_to_date)
    }

    fn array(&self, aliases: &FieldAliases) -> Option<Vec<Value>> {
        self.first(aliases, value_to_array)
    }

    fn required_text(&self, aliases: &FieldAliases, entity: EntityKind) -> Result<String, BillingError> {
        self.text(aliases)
            .ok_or_else(|| BillingError::missing(entity, aliases.field))
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        // Phone numbers and invoice numbers are sometimes stored numerically.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Whole numbers only; `2.5` is not a quantity.
fn value_to_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let decimal = value_to_decimal(value)?;
    if decimal.fract().is_zero() {
        decimal.to_i64()
    } else {
        None
    }
}

fn value_to_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Arrays, or arrays serialized into a text column by older rows.
fn value_to_array(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(values) => Some(values.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(values)) => Some(values),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize a customer row.
pub fn normalize_customer(record: &RawRecord) -> Result<Customer, BillingError> {
    let fields = Fields::new(record);
    Ok(Customer {
        name: fields.required_text(&aliases::CUSTOMER_NAME, EntityKind::Customer)?,
        phone: fields.required_text(&aliases::CUSTOMER_PHONE, EntityKind::Customer)?,
        email: fields.text(&aliases::CUSTOMER_EMAIL),
        gst_number: fields.text(&aliases::CUSTOMER_GST_NUMBER),
    })
}

/// Normalize a vehicle row. Unknown categories are dropped, not rejected.
pub fn normalize_vehicle(record: &RawRecord) -> Result<Vehicle, BillingError> {
    let fields = Fields::new(record);
    let category = fields.first(&aliases::VEHICLE_CATEGORY, |v| {
        v.as_str().and_then(VehicleCategory::parse)
    });
    Ok(Vehicle {
        make: fields.required_text(&aliases::VEHICLE_MAKE, EntityKind::Vehicle)?,
        model: fields.text(&aliases::VEHICLE_MODEL),
        registration: fields.required_text(&aliases::VEHICLE_REGISTRATION, EntityKind::Vehicle)?,
        category,
    })
}

/// Normalize one line-item row; `index` locates it in error messages.
pub fn normalize_line_item(record: &RawRecord, index: usize) -> Result<LineItem, BillingError> {
    let fields = Fields::new(record);
    let path = |f: &FieldAliases| format!("items[{}].{}", index, f.field);

    let quantity = fields
        .integer(&aliases::ITEM_QUANTITY)
        .ok_or_else(|| BillingError::missing(EntityKind::LineItem, path(&aliases::ITEM_QUANTITY)))?;
    let unit_price = fields.decimal(&aliases::ITEM_UNIT_PRICE).ok_or_else(|| {
        BillingError::missing(EntityKind::LineItem, path(&aliases::ITEM_UNIT_PRICE))
    })?;

    Ok(LineItem {
        description: fields.text(&aliases::ITEM_DESCRIPTION),
        item_type: fields.text(&aliases::ITEM_TYPE),
        hsn_sac_code: fields.text(&aliases::ITEM_HSN_SAC),
        quantity,
        unit_price,
        discount: fields.decimal(&aliases::ITEM_DISCOUNT),
        stored_total: fields.decimal(&aliases::ITEM_TOTAL),
    })
}

fn normalize_extra_charge(value: &Value, index: usize) -> Result<ExtraCharge, BillingError> {
    let record = RawRecord::from(value.clone());
    let fields = Fields::new(&record);
    let amount = fields.decimal(&aliases::CHARGE_AMOUNT).ok_or_else(|| {
        BillingError::missing(
            EntityKind::ExtraCharge,
            format!("extra_charges[{}].{}", index, aliases::CHARGE_AMOUNT.field),
        )
    })?;
    Ok(ExtraCharge {
        name: fields.text(&aliases::CHARGE_NAME),
        amount,
    })
}

/// Normalize an invoice row together with its line-item rows.
///
/// Separately fetched `items` win; when none are supplied, an item array
/// embedded in the invoice row is used instead.
pub fn normalize_invoice(record: &RawRecord, items: &[RawRecord]) -> Result<Invoice, BillingError> {
    let fields = Fields::new(record);

    let invoice_number = fields.required_text(&aliases::INVOICE_NUMBER, EntityKind::Invoice)?;
    let created_on = fields
        .date(&aliases::INVOICE_CREATED)
        .ok_or_else(|| BillingError::missing(EntityKind::Invoice, aliases::INVOICE_CREATED.field))?;
    let kind = fields
        .first(&aliases::INVOICE_KIND, |v| v.as_str().and_then(InvoiceKind::parse))
        .ok_or_else(|| BillingError::missing(EntityKind::Invoice, aliases::INVOICE_KIND.field))?;

    let items = if items.is_empty() {
        fields
            .array(&aliases::INVOICE_ITEMS)
            .unwrap_or_default()
            .into_iter()
            .map(RawRecord::from)
            .collect::<Vec<_>>()
    } else {
        items.to_vec()
    };
    let items = items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_line_item(item, index))
        .collect::<Result<Vec<_>, _>>()?;

    let extra_charges = fields
        .array(&aliases::INVOICE_EXTRA_CHARGES)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, value)| normalize_extra_charge(value, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Invoice {
        invoice_number,
        created_on,
        due_on: fields.date(&aliases::INVOICE_DUE),
        kind,
        status: fields.first(&aliases::INVOICE_STATUS, |v| {
            v.as_str().and_then(InvoiceStatus::parse)
        }),
        items,
        labor_charge: fields.decimal(&aliases::INVOICE_LABOR),
        extra_charges,
        discount: DiscountSpec {
            percentage: fields.decimal(&aliases::INVOICE_DISCOUNT_PERCENTAGE),
            amount: fields.decimal(&aliases::INVOICE_DISCOUNT_AMOUNT),
        },
        flat_tax: fields.decimal(&aliases::INVOICE_FLAT_TAX),
        gst: GstSpec {
            amount: fields.decimal(&aliases::INVOICE_GST_AMOUNT),
            rate: fields.decimal(&aliases::INVOICE_GST_RATE),
            cgst: fields.decimal(&aliases::INVOICE_CGST),
            sgst: fields.decimal(&aliases::INVOICE_SGST),
        },
        notes: fields.text(&aliases::INVOICE_NOTES),
        kilometers: fields
            .integer(&aliases::INVOICE_KILOMETERS)
            .and_then(|km| u64::try_from(km).ok()),
    })
}

/// Id of a record the invoice row points at (customer or vehicle).
pub fn linked_id(record: &RawRecord, aliases: &FieldAliases) -> Result<Uuid, BillingError> {
    Fields::new(record)
        .first(aliases, |v| v.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok()))
        .ok_or_else(|| BillingError::missing(EntityKind::Invoice, aliases.field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_numbers_and_numeric_strings() {
        assert_eq!(value_to_decimal(&json!(500)), Some(Decimal::from(500)));
        assert_eq!(value_to_decimal(&json!("  12.50 ")), Some(Decimal::new(1250, 2)));
        assert_eq!(value_to_decimal(&json!(1e3)), Some(Decimal::from(1000)));
        assert_eq!(value_to_decimal(&json!("abc")), None);
        assert_eq!(value_to_decimal(&json!(true)), None);
    }

    #[test]
    fn test_integer_rejects_fractions() {
        assert_eq!(value_to_integer(&json!(3)), Some(3));
        assert_eq!(value_to_integer(&json!("4")), Some(4));
        assert_eq!(value_to_integer(&json!(2.0)), Some(2));
        assert_eq!(value_to_integer(&json!(2.5)), None);
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(value_to_date(&json!("2024-03-05")), Some(expected));
        assert_eq!(value_to_date(&json!("2024-03-05T10:15:00Z")), Some(expected));
        assert_eq!(value_to_date(&json!("2024-03-05T10:15:00.123+05:30")), Some(expected));
        assert_eq!(value_to_date(&json!("2024-03-05 10:15:00.5+00")), Some(expected));
        assert_eq!(value_to_date(&json!("2024-03-05T10:15:00")), Some(expected));
        assert_eq!(value_to_date(&json!("05/03/2024")), None);
    }

    #[test]
    fn test_blank_text_falls_through_to_next_alias() {
        let record = RawRecord::from(json!({ "name": "   ", "customerName": "Ravi" }));
        let fields = Fields::new(&record);
        assert_eq!(fields.text(&aliases::CUSTOMER_NAME), Some("Ravi".to_string()));
    }

    #[test]
    fn test_array_from_serialized_text() {
        let value = json!("[{\"name\":\"Towing\",\"amount\":300}]");
        assert_eq!(value_to_array(&value).map(|v| v.len()), Some(1));
        assert_eq!(value_to_array(&json!("not json")), None);
    }

    #[test]
    fn test_linked_id() {
        let id = Uuid::new_v4();
        let record = RawRecord::from(json!({ "customerId": id.to_string() }));
        assert_eq!(linked_id(&record, &aliases::INVOICE_CUSTOMER_ID), Ok(id));
        assert_eq!(
            linked_id(&RawRecord::new(), &aliases::INVOICE_VEHICLE_ID),
            Err(BillingError::missing(EntityKind::Invoice, "vehicle_id"))
        );
    }
}
