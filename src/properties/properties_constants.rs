/// Property types
///
/// Stored as lowercase text on the property record. Anything outside this
/// list still loads; it just rolls up under "other" in portfolio breakdowns.
pub const PROPERTY_TYPE_RESIDENTIAL: &str = "residential";

/// Office, retail, or other income-producing commercial real estate.
pub const PROPERTY_TYPE_COMMERCIAL: &str = "commercial";

/// Combined residential and commercial use in one building.
pub const PROPERTY_TYPE_MIXED_USE: &str = "mixed_use";

/// Undeveloped land.
pub const PROPERTY_TYPE_LAND: &str = "land";

/// Warehouses, manufacturing, distribution.
pub const PROPERTY_TYPE_INDUSTRIAL: &str = "industrial";

/// Property statuses
pub const PROPERTY_STATUS_OWNED: &str = "owned";
pub const PROPERTY_STATUS_UNDER_CONTRACT: &str = "under_contract";
pub const PROPERTY_STATUS_SOLD: &str = "sold";
pub const PROPERTY_STATUS_RENTED: &str = "rented";
pub const PROPERTY_STATUS_VACANT: &str = "vacant";
