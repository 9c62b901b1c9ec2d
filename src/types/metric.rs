//! Defines the fixed set of metric columns carried by every regional dataset.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A numeric measurement column that can be compared across regions.
///
/// The string form of each variant is the exact CSV column name.
///
/// # Examples
///
/// ```
/// use solar_compare::Metric;
///
/// let metric: Metric = "GHI".parse().unwrap();
/// assert_eq!(metric, Metric::Ghi);
/// assert_eq!(Metric::Tamb.to_string(), "Tamb");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Global horizontal irradiance.
    Ghi,
    /// Direct normal irradiance.
    Dni,
    /// Diffuse horizontal irradiance.
    Dhi,
    /// Irradiance measured by module sensor A.
    ModA,
    /// Irradiance measured by module sensor B.
    ModB,
    /// Ambient temperature.
    Tamb,
    /// Relative humidity.
    Rh,
    /// Wind speed.
    Ws,
}

/// Every metric, in the order a metric picker lists them.
pub const METRICS: [Metric; 8] = [
    Metric::Ghi,
    Metric::Dni,
    Metric::Dhi,
    Metric::ModA,
    Metric::ModB,
    Metric::Tamb,
    Metric::Rh,
    Metric::Ws,
];

impl Metric {
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Ghi => "GHI",
            Metric::Dni => "DNI",
            Metric::Dhi => "DHI",
            Metric::ModA => "ModA",
            Metric::ModB => "ModB",
            Metric::Tamb => "Tamb",
            Metric::Rh => "RH",
            Metric::Ws => "WS",
        }
    }

    /// Unit used for axis labels.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Ghi | Metric::Dni | Metric::Dhi | Metric::ModA | Metric::ModB => "W/m²",
            Metric::Tamb => "°C",
            Metric::Rh => "%",
            Metric::Ws => "m/s",
        }
    }

    pub(crate) fn column_names() -> impl Iterator<Item = &'static str> {
        METRICS.into_iter().map(|metric| metric.column_name())
    }
}

impl AsRef<str> for Metric {
    fn as_ref(&self) -> &str {
        self.column_name()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Error returned when a string is not one of the metric column names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known metric column")]
pub struct UnknownMetricName(pub String);

impl FromStr for Metric {
    type Err = UnknownMetricName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METRICS
            .iter()
            .find(|metric| metric.column_name() == s)
            .copied()
            .ok_or_else(|| UnknownMetricName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_column_name() {
        for metric in METRICS {
            assert_eq!(metric.column_name().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn column_names_are_case_sensitive() {
        assert_eq!(
            "ghi".parse::<Metric>(),
            Err(UnknownMetricName("ghi".to_string()))
        );
    }

    #[test]
    fn unknown_name_is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownMetricName("Irradiance".to_string()));
        assert_eq!(err.to_string(), "'Irradiance' is not a known metric column");
    }
}
