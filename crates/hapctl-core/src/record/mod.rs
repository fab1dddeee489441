//! Typed view over a parsed statistics row.
//!
//! A [`ServerRecord`] wraps one [`StatRow`] and derives everything else on
//! demand: nothing is cached, so the classifications always reflect the row
//! they were computed from.

use std::collections::HashMap;

use serde::Serialize;
use strum::Display;

use crate::stats::StatRow;

/// Column holding the proxy name. The leading `# ` is part of the name.
pub const PROXY_COLUMN: &str = "# pxname";
/// Column holding the service name.
pub const SERVICE_COLUMN: &str = "svname";
/// Column holding the status text.
pub const STATUS_COLUMN: &str = "status";
/// Column holding the server weight.
pub const WEIGHT_COLUMN: &str = "weight";
/// Column holding accumulated downtime in seconds.
pub const DOWNTIME_COLUMN: &str = "downtime";

/// Service name of a proxy's frontend aggregate row.
pub const FRONTEND_SERVICE: &str = "FRONTEND";
/// Service name of a proxy's backend aggregate row.
pub const BACKEND_SERVICE: &str = "BACKEND";

/// Derived operational classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// Frontend or backend aggregate row.
    Aggregate,
    /// Server is up.
    Up,
    /// Server is down.
    Down,
    /// Server is in maintenance.
    Maint,
    /// Server is draining.
    Drain,
    /// Any other status.
    Other,
}

/// Coarse bucket for a server's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WeightBand {
    /// Weight is zero, negative, above 100, or unknown.
    Unbounded,
    /// 80 to 100.
    High,
    /// 50 to 79.
    Medium,
    /// 1 to 49.
    Low,
}

impl WeightBand {
    /// Classifies a weight.
    #[must_use]
    pub const fn classify(weight: Option<i64>) -> Self {
        match weight {
            Some(80..=100) => Self::High,
            Some(50..=79) => Self::Medium,
            Some(1..=49) => Self::Low,
            _ => Self::Unbounded,
        }
    }
}

/// One proxy, frontend, backend, or server row of the statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServerRecord {
    row: StatRow,
}

impl ServerRecord {
    /// Wraps a parsed row.
    #[must_use]
    pub const fn new(row: StatRow) -> Self {
        Self { row }
    }

    /// Raw value of any column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.row.get(column)
    }

    /// Proxy name; empty when the column is absent.
    #[must_use]
    pub fn proxy_name(&self) -> &str {
        self.get(PROXY_COLUMN).unwrap_or_default()
    }

    /// Service name; empty when the column is absent.
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.get(SERVICE_COLUMN).unwrap_or_default()
    }

    /// Raw status text; empty when the column is absent.
    #[must_use]
    pub fn status(&self) -> &str {
        self.get(STATUS_COLUMN).unwrap_or_default()
    }

    /// Weight, or `None` when empty or not an integer.
    #[must_use]
    pub fn weight(&self) -> Option<i64> {
        self.get(WEIGHT_COLUMN)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Accumulated downtime in seconds, or `None` when empty.
    #[must_use]
    pub fn downtime(&self) -> Option<u64> {
        self.get(DOWNTIME_COLUMN)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Whether this is a real server rather than an aggregate row.
    #[must_use]
    pub fn is_listener(&self) -> bool {
        !matches!(self.service_name(), FRONTEND_SERVICE | BACKEND_SERVICE)
    }

    /// Status is `UP`.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.status_is("UP")
    }

    /// Status is `DOWN`.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.status_is("DOWN")
    }

    /// Status is `MAINT`.
    #[must_use]
    pub fn is_maint(&self) -> bool {
        self.status_is("MAINT")
    }

    /// Status is `DRAIN`.
    #[must_use]
    pub fn is_drain(&self) -> bool {
        self.status_is("DRAIN")
    }

    /// Derived classification; aggregates first, then status in order.
    #[must_use]
    pub fn state(&self) -> ServerState {
        if !self.is_listener() {
            ServerState::Aggregate
        } else if self.is_up() {
            ServerState::Up
        } else if self.is_down() {
            ServerState::Down
        } else if self.is_maint() {
            ServerState::Maint
        } else if self.is_drain() {
            ServerState::Drain
        } else {
            ServerState::Other
        }
    }

    /// Weight bucket.
    #[must_use]
    pub fn weight_band(&self) -> WeightBand {
        WeightBand::classify(self.weight())
    }

    // `UP` matches `UP` and `UP 2/3` but not `UPGRADE`.
    fn status_is(&self, token: &str) -> bool {
        let status = self.status();
        status
            .strip_prefix(token)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    }
}

impl From<StatRow> for ServerRecord {
    fn from(row: StatRow) -> Self {
        Self::new(row)
    }
}

/// Records of one proxy, in response order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyGroup {
    /// Proxy name.
    #[serde(rename = "proxy")]
    pub name: String,
    /// Records belonging to the proxy.
    #[serde(rename = "servers")]
    pub records: Vec<ServerRecord>,
}

/// Groups records by proxy name, ordering groups by first appearance.
#[must_use]
pub fn group_by_proxy(records: Vec<ServerRecord>) -> Vec<ProxyGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<ServerRecord>> = HashMap::new();

    for record in records {
        let name = record.proxy_name().to_owned();
        if !grouped.contains_key(&name) {
            order.push(name.clone());
        }
        grouped.entry(name).or_default().push(record);
    }

    order
        .into_iter()
        .filter_map(|name| {
            grouped
                .remove(&name)
                .map(|members| ProxyGroup { name, records: members })
        })
        .collect()
}
