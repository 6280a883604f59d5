/// Required input columns, in canonical order
pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_DAY: &str = "day";
pub const COL_LOCATION: &str = "location";
pub const COL_PM25: &str = "PM2.5";
pub const COL_TEMP: &str = "TEMP";
pub const COL_PRES: &str = "PRES";
pub const COL_DEWP: &str = "DEWP";
pub const COL_RAIN: &str = "RAIN";
pub const COL_WSPM: &str = "WSPM";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_YEAR,
    COL_MONTH,
    COL_DAY,
    COL_LOCATION,
    COL_PM25,
    COL_TEMP,
    COL_PRES,
    COL_DEWP,
    COL_RAIN,
    COL_WSPM,
];

/// Severity band upper bounds for PM2.5 (µg/m³); the last band is open-ended
pub const SEVERITY_BOUNDS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];

/// Cell values treated as missing measurements
pub const DEFAULT_MISSING_MARKERS: [&str; 5] = ["", "NA", "NaN", "nan", "null"];

/// Processing defaults
pub const DEFAULT_DELIMITER: char = ',';
pub const ENV_PREFIX: &str = "AIRQ";

/// Minimum pairwise-complete observations for a defined correlation
pub const MIN_CORRELATION_OBSERVATIONS: usize = 2;
