use crate::core::rating::{summarize, ServiceOption};
use crate::core::RateQuoter;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct QuoteReport {
    pub quoted_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub response: serde_json::Value,
    pub options: Vec<ServiceOption>,
}

impl QuoteReport {
    /// 原樣輸出回應內容
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.response)?)
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Rate quote at {} ({} ms)",
            self.quoted_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.elapsed.as_millis()
        );

        if self.options.is_empty() {
            out.push_str("No rated services in response\n");
            return out;
        }

        let _ = writeln!(
            out,
            "{:<6} {:<32} {:>12} {:<4} {:>8} {:<10}",
            "CODE", "SERVICE", "AMOUNT", "CUR", "DAYS", "GUARANTEED"
        );
        for option in &self.options {
            let _ = writeln!(
                out,
                "{:<6} {:<32} {:>12} {:<4} {:>8} {:<10}",
                option.service_code,
                option.service_name,
                option.amount,
                option.currency,
                option.transit_days.as_deref().unwrap_or("-"),
                if option.guaranteed { "yes" } else { "no" }
            );
        }
        out
    }
}

pub struct QuoteEngine<Q: RateQuoter> {
    quoter: Q,
}

impl<Q: RateQuoter> QuoteEngine<Q> {
    pub fn new(quoter: Q) -> Self {
        Self { quoter }
    }

    pub async fn run(&self) -> Result<QuoteReport> {
        tracing::info!("🚀 Starting rate quote");
        let started = Instant::now();

        let response = self.quoter.quote().await?;
        let elapsed = started.elapsed();

        let options = summarize(&response);
        tracing::info!(
            "✅ Quote received in {:?}: {} rated service(s)",
            elapsed,
            options.len()
        );

        Ok(QuoteReport {
            quoted_at: Utc::now(),
            elapsed,
            response,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RateError;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticQuoter {
        response: std::result::Result<serde_json::Value, (u16, String)>,
    }

    #[async_trait]
    impl RateQuoter for StaticQuoter {
        async fn quote(&self) -> Result<serde_json::Value> {
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err((status, body)) => Err(RateError::Api {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_run_attaches_summary() {
        let engine = QuoteEngine::new(StaticQuoter {
            response: Ok(json!({
                "RateResponse": {"RatedShipment": {
                    "Service": {"Code": "11"},
                    "TotalCharges": {"CurrencyCode": "EUR", "MonetaryValue": "12.50"}
                }}
            })),
        });

        let report = engine.run().await.unwrap();

        assert_eq!(report.options.len(), 1);
        assert_eq!(report.options[0].service_name, "UPS Standard");

        let summary = report.render_summary();
        assert!(summary.contains("UPS Standard"));
        assert!(summary.contains("12.50"));
    }

    #[tokio::test]
    async fn test_render_json_is_response_verbatim() {
        let body = json!({"anything": [1, "two", null, true, 3.5]});
        let engine = QuoteEngine::new(StaticQuoter {
            response: Ok(body.clone()),
        });

        let report = engine.run().await.unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(&report.render_json().unwrap()).unwrap();

        assert_eq!(rendered, body);
        assert!(report.options.is_empty());
        assert!(report.render_summary().contains("No rated services"));
    }

    #[tokio::test]
    async fn test_render_json_keeps_key_order_and_large_integers() {
        let body: serde_json::Value =
            serde_json::from_str(r#"{"Zeta":1,"Alpha":2,"Big":123456789012345678901234567890}"#)
                .unwrap();
        let engine = QuoteEngine::new(StaticQuoter { response: Ok(body) });

        let report = engine.run().await.unwrap();

        assert_eq!(
            report.render_json().unwrap(),
            "{\n  \"Zeta\": 1,\n  \"Alpha\": 2,\n  \"Big\": 123456789012345678901234567890\n}"
        );
    }

    #[tokio::test]
    async fn test_run_propagates_api_error() {
        let engine = QuoteEngine::new(StaticQuoter {
            response: Err((401, "Unauthorized".to_string())),
        });

        let err = engine.run().await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.raw_body(), Some("Unauthorized"));
    }
}
