use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, for reporting where a file went.
    fn locate(&self, path: &str) -> String;
}

/// A coordinate field as geocoders return it: some send strings, some numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawNumber::Number(value) => Some(*value),
            RawNumber::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            RawNumber::Number(value) => value.to_string(),
            RawNumber::Text(text) => text.clone(),
        }
    }
}

/// One search hit. Every other field of the response is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(alias = "lat")]
    pub latitude: RawNumber,
    #[serde(alias = "lon")]
    pub longitude: RawNumber,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>>;
}
