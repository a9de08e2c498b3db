use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn credential(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn transaction_source(&self) -> Option<&str>;
}

#[async_trait]
pub trait RateQuoter: Send + Sync {
    /// 送出一次報價請求，成功時回傳解析後的 JSON 回應
    async fn quote(&self) -> Result<serde_json::Value>;
}
