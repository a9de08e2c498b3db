use serde::Deserialize;
use std::fmt;

const VISIBLE_PREFIX: usize = 4;

/// 持有憑證的字串，`Debug`/`Display` 永遠不輸出內容
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", self.redacted())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// 保留前幾個字元供辨識，其餘遮蔽
pub fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    if value.chars().count() <= VISIBLE_PREFIX * 2 {
        "[redacted]".to_string()
    } else {
        format!("{}…[redacted]", prefix)
    }
}

/// 遮蔽 `Authorization` 標頭值，保留 scheme
pub fn redact_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, credential)) => format!("{} {}", scheme, redact(credential)),
        None => redact(value),
    }
}
