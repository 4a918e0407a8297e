use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const STATS_PATH: &str = "/api/admin/dashboard/stats";
pub const RECENT_ORDERS_PATH: &str = "/api/admin/dashboard/recent-orders";
pub const REVENUE_OVERVIEW_PATH: &str = "/api/admin/dashboard/revenue-overview";

/// The read-only admin dashboard endpoints, all of which sit behind bearer auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Stats,
    RecentOrders,
    RevenueOverview,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [
        Endpoint::Stats,
        Endpoint::RecentOrders,
        Endpoint::RevenueOverview,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Stats => STATS_PATH,
            Endpoint::RecentOrders => RECENT_ORDERS_PATH,
            Endpoint::RevenueOverview => REVENUE_OVERVIEW_PATH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Stats => "dashboard_stats",
            Endpoint::RecentOrders => "recent_orders",
            Endpoint::RevenueOverview => "revenue_overview",
        }
    }

    /// Top-level keys an authorized 200 body is expected to carry.
    ///
    /// Provisional: nothing on the backend side has confirmed these yet.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Endpoint::Stats => &[
                "total_orders",
                "total_revenue",
                "total_customers",
                "total_products",
            ],
            Endpoint::RecentOrders => &["orders"],
            Endpoint::RevenueOverview => &["time_range", "data"],
        }
    }

    /// Keys from [`Endpoint::required_keys`] absent from `body`.
    /// A non-object body is missing all of them.
    pub fn missing_keys(self, body: &Value) -> Vec<&'static str> {
        let object = body.as_object();
        self.required_keys()
            .iter()
            .copied()
            .filter(|key| object.map_or(true, |o| !o.contains_key(*key)))
            .collect()
    }
}

impl Serialize for Endpoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Bucket size for the revenue overview.
///
/// Deserialization goes through [`FromStr`], so config values are
/// case-insensitive like every other parse of a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimeRange {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Daily => "daily",
            TimeRange::Weekly => "weekly",
            TimeRange::Monthly => "monthly",
            TimeRange::Yearly => "yearly",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(TimeRange::Daily),
            "weekly" => Ok(TimeRange::Weekly),
            "monthly" => Ok(TimeRange::Monthly),
            "yearly" => Ok(TimeRange::Yearly),
            other => Err(format!(
                "unknown time range '{other}': expected daily, weekly, monthly or yearly"
            )),
        }
    }
}

impl TryFrom<String> for TimeRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// Response bodies below model only the keys the dashboard contract names.
// Anything else the backend sends lands in `extra` untouched.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: Value,
    pub total_revenue: Value,
    pub total_customers: Value,
    pub total_products: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentOrders {
    pub orders: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueOverview {
    pub time_range: String,
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the dashboard page loads in one go.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_orders: RecentOrders,
    pub revenue_overview: RevenueOverview,
}
