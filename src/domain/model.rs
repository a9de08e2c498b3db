//! 報價請求的型別化結構
//!
//! 同一組型別由 snake_case 的 TOML 反序列化，並以遠端 API 要求的
//! PascalCase 形狀序列化。

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_decimal, validate_positive_number,
    validate_resolved_tree, Validate,
};
use chrono::Local;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;
use uuid::Uuid;

/// 送出時的最外層包裝：`{"RateRequest": {...}}`
#[derive(Debug, Serialize)]
pub struct RateRequestEnvelope<'a> {
    #[serde(rename = "RateRequest")]
    pub rate_request: &'a RateRequest,
}

impl<'a> RateRequestEnvelope<'a> {
    pub fn new(rate_request: &'a RateRequest) -> Self {
        Self { rate_request }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct RateRequest {
    #[serde(default)]
    pub request: RequestMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_type: Option<CodeDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_classification: Option<CodeDescription>,
    pub shipment: Shipment,
}

impl RateRequest {
    pub fn customer_context(&self) -> &str {
        &self.request.transaction_reference.customer_context
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct RequestMetadata {
    #[serde(default)]
    pub transaction_reference: TransactionReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct TransactionReference {
    #[serde(default = "generate_transaction_id")]
    pub customer_context: String,
}

impl Default for TransactionReference {
    fn default() -> Self {
        Self {
            customer_context: generate_transaction_id(),
        }
    }
}

/// 32 字元的交易識別碼
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Shipment {
    pub shipper: Party,
    pub ship_to: Party,
    pub ship_from: Party,
    pub payment_details: PaymentDetails,
    pub service: CodeDescription,
    #[serde(default = "default_num_of_pieces", serialize_with = "display_string")]
    pub num_of_pieces: u32,
    pub package: Package,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_total_weight: Option<PackageWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_line_total: Option<MonetaryAmount>,
    #[serde(default)]
    pub shipment_rating_options: RatingOptions,
    /// 有這段時回應才會帶 `TimeInTransit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time_information: Option<DeliveryTimeInformation>,
}

fn default_num_of_pieces() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Party {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attention_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Phone {
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Address {
    pub address_line: Vec<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_province_code: Option<String>,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct PaymentDetails {
    pub shipment_charge: Vec<ShipmentCharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct ShipmentCharge {
    pub r#type: String,
    pub bill_shipper: BillShipper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct BillShipper {
    pub account_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct CodeDescription {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Package {
    pub packaging_type: CodeDescription,
    pub dimensions: Dimensions,
    pub package_weight: PackageWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Dimensions {
    pub unit_of_measurement: CodeDescription,
    #[serde(serialize_with = "display_string")]
    pub length: f64,
    #[serde(serialize_with = "display_string")]
    pub width: f64,
    #[serde(serialize_with = "display_string")]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct PackageWeight {
    pub unit_of_measurement: CodeDescription,
    #[serde(serialize_with = "display_string")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct MonetaryAmount {
    pub currency_code: String,
    pub monetary_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct DeliveryTimeInformation {
    pub package_bill_type: String,
    #[serde(default = "Pickup::now")]
    pub pickup: Pickup,
}

/// 取件時間，格式為 `YYYYMMDD` 與 `HHMM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct Pickup {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Pickup {
    /// 未設定時以當地現在時間取件
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            date: now.format("%Y%m%d").to_string(),
            time: Some(now.format("%H%M").to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingOptions {
    #[serde(
        default,
        rename(serialize = "NegotiatedRatesIndicator"),
        serialize_with = "indicator",
        skip_serializing_if = "is_false"
    )]
    pub negotiated_rates: bool,
}

// 遠端 API 的數值欄位一律是字串
fn display_string<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn indicator<S: Serializer>(_value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str("Y")
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Validate for RateRequest {
    fn validate(&self) -> Result<()> {
        // 環境變數未設定時 `${...}` 會原樣留下，不能送出
        validate_resolved_tree("rate_request", &serde_json::to_value(self)?)?;

        validate_non_empty_string(
            "rate_request.request.transaction_reference.customer_context",
            self.customer_context(),
        )?;
        if let Some(pickup_type) = &self.pickup_type {
            validate_non_empty_string("rate_request.pickup_type.code", &pickup_type.code)?;
        }
        self.shipment.validate()
    }
}

impl Validate for Shipment {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("shipment.shipper.name", &self.shipper.name)?;
        validate_non_empty_string("shipment.ship_to.name", &self.ship_to.name)?;
        validate_non_empty_string("shipment.ship_from.name", &self.ship_from.name)?;
        validate_non_empty_string("shipment.service.code", &self.service.code)?;
        validate_positive_number("shipment.num_of_pieces", self.num_of_pieces as usize, 1)?;

        validate_positive_number(
            "shipment.payment_details.shipment_charge",
            self.payment_details.shipment_charge.len(),
            1,
        )?;
        for charge in &self.payment_details.shipment_charge {
            validate_non_empty_string(
                "shipment.payment_details.shipment_charge.type",
                &charge.r#type,
            )?;
            validate_non_empty_string(
                "shipment.payment_details.shipment_charge.bill_shipper.account_number",
                &charge.bill_shipper.account_number,
            )?;
        }

        if let Some(total) = &self.shipment_total_weight {
            validate_positive_decimal("shipment.shipment_total_weight.weight", total.weight)?;
        }
        if let Some(delivery) = &self.delivery_time_information {
            validate_non_empty_string(
                "shipment.delivery_time_information.package_bill_type",
                &delivery.package_bill_type,
            )?;
            validate_non_empty_string(
                "shipment.delivery_time_information.pickup.date",
                &delivery.pickup.date,
            )?;
        }

        self.package.validate()
    }
}

impl Validate for Package {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(
            "shipment.package.packaging_type.code",
            &self.packaging_type.code,
        )?;

        let dimensions = &self.dimensions;
        validate_non_empty_string(
            "shipment.package.dimensions.unit_of_measurement.code",
            &dimensions.unit_of_measurement.code,
        )?;
        validate_positive_decimal("shipment.package.dimensions.length", dimensions.length)?;
        validate_positive_decimal("shipment.package.dimensions.width", dimensions.width)?;
        validate_positive_decimal("shipment.package.dimensions.height", dimensions.height)?;

        validate_non_empty_string(
            "shipment.package.package_weight.unit_of_measurement.code",
            &self.package_weight.unit_of_measurement.code,
        )?;
        validate_positive_decimal(
            "shipment.package.package_weight.weight",
            self.package_weight.weight,
        )
    }
}
