use serde::{Deserialize, Serialize};

/// Which tier served a cached value, surfaced on the response as
/// `X-Cache-Source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheSource {
    L1,
    L2,
    Db,
}

impl std::fmt::Display for CacheSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheSource::L1 => write!(f, "L1"),
            CacheSource::L2 => write!(f, "L2"),
            CacheSource::Db => write!(f, "DB"),
        }
    }
}
