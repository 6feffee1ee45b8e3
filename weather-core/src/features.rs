use crate::{error::DatasetError, model::WeatherSeries, table::Table};

/// Model inputs, in column order.
pub const FEATURE_COLUMNS: [&str; 7] = [
    "day_of_year",
    "hour",
    "lat",
    "lon",
    "humidity",
    "wind_speed",
    "visibility",
];

/// Project `table` onto [`FEATURE_COLUMNS`], preserving row order.
///
/// Any missing feature column is an error; other columns are dropped.
pub fn build_features(table: &Table) -> Result<Table, DatasetError> {
    table.select(&FEATURE_COLUMNS)
}

/// Feature table straight from a generated series.
pub fn series_features(series: &WeatherSeries) -> Result<Table, DatasetError> {
    build_features(&series.to_table()?)
}
