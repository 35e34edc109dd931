/// Vacancy rate assumed when a property has none recorded
pub const DEFAULT_VACANCY_RATE: f64 = 0.05;

/// Monthly cash flow within +/- this band counts as break-even
pub const BREAK_EVEN_BAND: f64 = 50.0;

/// Number of cities reported in the portfolio geographic breakdown
pub const TOP_CITIES_LIMIT: usize = 3;

/// Name of the implicit folder every user gets
pub const DEFAULT_FOLDER_NAME: &str = "All Properties";

/// Folder color assigned to the default folder
pub const DEFAULT_FOLDER_COLOR: &str = "#6B7280";

/// Folder color assigned when none is provided
pub const FOLDER_COLOR: &str = "#10B981";

/// Folder icon assigned when none is provided
pub const FOLDER_ICON: &str = "folder";
