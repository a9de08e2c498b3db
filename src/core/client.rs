use crate::core::{ConfigProvider, RateQuoter};
use crate::domain::model::{RateRequest, RateRequestEnvelope};
use crate::utils::error::{RateError, Result};
use crate::utils::redact::redact_authorization;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

/// 送出前的請求內容，供 `--dump-request` 顯示
#[derive(Debug, Clone)]
pub struct RequestPreview {
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub payload: String,
}

pub struct RateClient<C: ConfigProvider> {
    config: C,
    request: RateRequest,
    client: Client,
}

impl<C: ConfigProvider> RateClient<C> {
    pub fn new(config: C, request: RateRequest) -> Result<Self> {
        let mut builder = Client::builder();

        // 未設定逾時則沿用 reqwest 預設（不限時）
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }

        let client = builder.build().map_err(|e| RateError::Config {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            config,
            request,
            client,
        })
    }

    pub fn request(&self) -> &RateRequest {
        &self.request
    }

    pub fn payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&RateRequestEnvelope::new(&self.request))?)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.config.credential())).map_err(|e| {
                RateError::InvalidConfigValue {
                    field: "api.token".to_string(),
                    value: redact_authorization(self.config.credential()),
                    reason: format!("Not a valid header value: {}", e),
                }
            })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let trans_id = HeaderValue::from_str(self.request.customer_context()).map_err(|e| {
            RateError::InvalidConfigValue {
                field: "rate_request.request.transaction_reference.customer_context".to_string(),
                value: self.request.customer_context().to_string(),
                reason: format!("Not a valid header value: {}", e),
            }
        })?;
        headers.insert(HeaderName::from_static("transid"), trans_id);

        if let Some(source) = self.config.transaction_source() {
            let value = HeaderValue::from_str(source).map_err(|e| RateError::InvalidConfigValue {
                field: "api.transaction_source".to_string(),
                value: source.to_string(),
                reason: format!("Not a valid header value: {}", e),
            })?;
            headers.insert(HeaderName::from_static("transactionsrc"), value);
        }

        Ok(headers)
    }

    /// 組出將要送出的請求；`reveal_credentials` 為 false 時遮蔽憑證
    pub fn preview(&self, reveal_credentials: bool) -> Result<RequestPreview> {
        let headers = self
            .headers()?
            .iter()
            .map(|(name, value)| {
                let text = String::from_utf8_lossy(value.as_bytes()).into_owned();
                let shown = if *name == AUTHORIZATION && !reveal_credentials {
                    redact_authorization(&text)
                } else {
                    text
                };
                (name.as_str().to_string(), shown)
            })
            .collect();

        let payload = serde_json::to_string_pretty(&RateRequestEnvelope::new(&self.request))?;

        Ok(RequestPreview {
            endpoint: self.config.endpoint().to_string(),
            headers,
            payload,
        })
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> RateQuoter for RateClient<C> {
    async fn quote(&self) -> Result<serde_json::Value> {
        let payload = self.payload()?;
        let headers = self.headers()?;

        tracing::info!(
            "📡 Requesting rate quote from {} (transaction {})",
            self.config.endpoint(),
            self.request.customer_context()
        );
        tracing::debug!("📦 Payload: {} bytes", payload.len());

        let response = self
            .client
            .post(self.config.endpoint())
            .headers(headers)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 API response status: {}", status);

        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::warn!("❌ Rate API returned {} ({} bytes)", status, body.len());
            return Err(RateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::error!("❌ Rate API returned 200 with a body that is not JSON");
            RateError::ResponseParse { source, body }
        })
    }
}
