pub mod client;
pub mod engine;
pub mod rating;

pub use crate::domain::model::RateRequest;
pub use crate::domain::ports::{ConfigProvider, RateQuoter};
pub use crate::utils::error::Result;
