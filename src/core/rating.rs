//! 將報價回應整理成依價格排序的服務選項

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOption {
    pub service_code: String,
    pub service_name: String,
    pub amount: String,
    pub currency: String,
    pub transit_days: Option<String>,
    pub guaranteed: bool,
    pub billing_weight: Option<String>,
    pub zone: Option<String>,
}

impl ServiceOption {
    fn amount_value(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

pub fn service_name(code: &str) -> String {
    let name = match code {
        "01" => "UPS Next Day Air",
        "02" => "UPS 2nd Day Air",
        "03" => "UPS Ground",
        "07" => "UPS Express",
        "08" => "UPS Expedited",
        "11" => "UPS Standard",
        "12" => "UPS 3 Day Select",
        "13" => "UPS Next Day Air Saver",
        "14" => "UPS Next Day Air Early",
        "54" => "UPS Express Plus",
        "59" => "UPS 2nd Day Air A.M.",
        "65" => "UPS Express Saver",
        "82" => "UPS Today Standard",
        "83" => "UPS Today Dedicated Courier",
        "84" => "UPS Today Intercity",
        "85" => "UPS Today Express",
        "86" => "UPS Today Express Saver",
        "96" => "UPS Worldwide Express Freight",
        other => return format!("UPS Service ({})", other),
    };
    name.to_string()
}

// 回應的寬鬆對應：只取摘要需要的欄位，其餘忽略

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RatedShipment {
    service: Code,
    total_charges: Option<Charge>,
    negotiated_rate_charges: Option<NegotiatedRateCharges>,
    time_in_transit: Option<TimeInTransit>,
    billing_weight: Option<BillingWeight>,
    zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Code {
    code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Charge {
    currency_code: Option<String>,
    monetary_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NegotiatedRateCharges {
    total_charge: Option<Charge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TimeInTransit {
    service_summary: Option<ServiceSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceSummary {
    estimated_arrival: Option<EstimatedArrival>,
    guaranteed_indicator: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EstimatedArrival {
    business_days_in_transit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BillingWeight {
    weight: Option<String>,
}

/// 指示欄位出現即為真，空字串與 `false` 除外
fn indicator_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "N",
        _ => true,
    }
}

impl From<RatedShipment> for ServiceOption {
    fn from(shipment: RatedShipment) -> Self {
        // 議價運費優先於公告運費
        let charge = shipment
            .negotiated_rate_charges
            .and_then(|n| n.total_charge)
            .or(shipment.total_charges);
        let (amount, currency) = match charge {
            Some(c) => (
                c.monetary_value.unwrap_or_default(),
                c.currency_code.unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        let summary = shipment.time_in_transit.and_then(|t| t.service_summary);
        let guaranteed = summary
            .as_ref()
            .and_then(|s| s.guaranteed_indicator.as_ref())
            .map(indicator_set)
            .unwrap_or(false);
        let transit_days = summary
            .and_then(|s| s.estimated_arrival)
            .and_then(|e| e.business_days_in_transit);

        Self {
            service_name: service_name(&shipment.service.code),
            service_code: shipment.service.code,
            amount,
            currency,
            transit_days,
            guaranteed,
            billing_weight: shipment.billing_weight.and_then(|w| w.weight),
            zone: shipment.zone,
        }
    }
}

/// 從成功回應擷取服務選項，依金額由低到高排序；無法解析的金額排在最後
pub fn summarize(response: &Value) -> Vec<ServiceOption> {
    // `Rate` 回傳單一物件，`Shop` 回傳陣列
    let rated: Vec<&Value> = match response.pointer("/RateResponse/RatedShipment") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => {
            tracing::debug!("No RatedShipment in response");
            return Vec::new();
        }
        Some(item) => vec![item],
    };

    // 單筆格式不符只略過該筆
    let mut options: Vec<ServiceOption> = rated
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match RatedShipment::deserialize(item) {
            Ok(shipment) => Some(ServiceOption::from(shipment)),
            Err(e) => {
                tracing::warn!("🔶 Skipping RatedShipment #{}: {}", i, e);
                None
            }
        })
        .collect();

    options.sort_by(|a, b| match (a.amount_value(), b.amount_value()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_single_rated_shipment() {
        let response = json!({
            "RateResponse": {
                "RatedShipment": {
                    "Service": {"Code": "65"},
                    "BillingWeight": {"Weight": "1.0"},
                    "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "85.20"},
                    "NegotiatedRateCharges": {
                        "TotalCharge": {"CurrencyCode": "EUR", "MonetaryValue": "41.10"}
                    }
                }
            }
        });

        let options = summarize(&response);

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].service_code, "65");
        assert_eq!(options[0].service_name, "UPS Express Saver");
        assert_eq!(options[0].amount, "41.10");
        assert_eq!(options[0].currency, "EUR");
        assert_eq!(options[0].billing_weight.as_deref(), Some("1.0"));
        assert_eq!(options[0].transit_days, None);
        assert!(!options[0].guaranteed);
    }

    #[test]
    fn test_summarize_sorts_by_amount() {
        let response = json!({
            "RateResponse": {
                "RatedShipment": [
                    {
                        "Service": {"Code": "07"},
                        "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "120.00"},
                        "TimeInTransit": {"ServiceSummary": {
                            "EstimatedArrival": {"BusinessDaysInTransit": "1"},
                            "GuaranteedIndicator": ""
                        }}
                    },
                    {
                        "Service": {"Code": "11"},
                        "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "not-a-number"}
                    },
                    {
                        "Service": {"Code": "65"},
                        "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "85.20"},
                        "Zone": "503",
                        "TimeInTransit": {"ServiceSummary": {
                            "EstimatedArrival": {"BusinessDaysInTransit": "3"},
                            "GuaranteedIndicator": "Y"
                        }}
                    }
                ]
            }
        });

        let options = summarize(&response);
        let codes: Vec<&str> = options.iter().map(|o| o.service_code.as_str()).collect();

        assert_eq!(codes, vec!["65", "07", "11"]);
        assert!(options[0].guaranteed);
        assert_eq!(options[0].zone.as_deref(), Some("503"));
        assert_eq!(options[0].transit_days.as_deref(), Some("3"));
        assert!(!options[1].guaranteed);
    }

    #[test]
    fn test_summarize_without_rated_shipment_is_empty() {
        assert!(summarize(&json!({"RateResponse": {}})).is_empty());
        assert!(summarize(&json!({"unexpected": true})).is_empty());
        assert!(summarize(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_malformed_rated_shipment_is_skipped() {
        let response = json!({
            "RateResponse": {
                "RatedShipment": [
                    {"TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "10.00"}},
                    {
                        "Service": {"Code": "11"},
                        "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": 12}
                    },
                    {
                        "Service": {"Code": "65"},
                        "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "85.20"}
                    }
                ]
            }
        });

        let options = summarize(&response);

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].service_code, "65");
        assert_eq!(options[0].amount, "85.20");
    }

    #[test]
    fn test_unknown_service_code_gets_fallback_name() {
        assert_eq!(service_name("99"), "UPS Service (99)");
        assert_eq!(service_name("03"), "UPS Ground");
    }
}
