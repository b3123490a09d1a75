//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

/// Limit/offset pagination shared across all list endpoints.
///
/// - `limit`: 1–100, default 50
/// - `offset`: 0–`i64::MAX`, default 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PageRequest {
    pub const MAX_LIMIT: u64 = 100;
    /// Offsets are bound as Postgres `bigint`.
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    /// Build from optional query values, falling back to defaults.
    pub fn from_parts(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit.unwrap_or_else(default_limit),
            offset: offset.unwrap_or(0),
        }
    }

    /// Clamp `limit` to 1–100 and `offset` to `MAX_OFFSET`.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            offset: self.offset.min(Self::MAX_OFFSET),
        }
    }
}
