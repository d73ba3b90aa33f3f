//! Empirical distribution of one metric, cast to "hours at or below" instead of percentiles.
//!
//! With hourly averages as input, reading the curve at a temperature gives the
//! number of hours per year spent at or below it (e.g. chilling hours).

use crate::analysis::error::AnalysisError;
use ordered_float::OrderedFloat;
use polars::prelude::*;

pub const HOURS_COLUMN: &str = "hours";
pub const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// What the cumulative fractions are multiplied by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoursBasis {
    /// Expected hours in one 365-day year.
    #[default]
    Year,
    /// Every row of the input counts as one hour.
    Observed,
}

/// Empirical CDF evaluated at each value of an ascending slice.
///
/// Entry `i` is the fraction of values `<= sorted[i]`, so ties share the fraction of
/// their last occurrence.
pub fn ecdf(sorted: &[f64]) -> Vec<f64> {
    let n = sorted.len() as f64;
    let mut fractions = vec![0.0; sorted.len()];
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start;
        while end + 1 < sorted.len() && sorted[end + 1] == sorted[start] {
            end += 1;
        }
        let fraction = (end + 1) as f64 / n;
        fractions[start..=end].fill(fraction);
        start = end + 1;
    }
    fractions
}

/// Builds the hours-below table for `metric`: its values ascending next to the hours
/// spent at or below each of them.
///
/// Nulls and NaNs are ignored.
///
/// # Errors
///
/// * [`AnalysisError::MissingColumn`] if `metric` is not a column of `hourly`.
/// * [`AnalysisError::EmptyMetric`] if it holds no numeric value.
pub fn hours_below_distribution(
    hourly: &DataFrame,
    metric: &str,
    basis: HoursBasis,
) -> Result<DataFrame, AnalysisError> {
    let column = hourly
        .column(metric)
        .map_err(|_| AnalysisError::MissingColumn(metric.to_string()))?;
    let column = column.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = column
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    if values.is_empty() {
        return Err(AnalysisError::EmptyMetric(metric.to_string()));
    }
    values.sort_by_key(|v| OrderedFloat(*v));

    let total_hours = match basis {
        HoursBasis::Year => HOURS_PER_YEAR,
        HoursBasis::Observed => hourly.height() as f64,
    };
    let hours: Vec<f64> = ecdf(&values).into_iter().map(|f| f * total_hours).collect();

    let df = DataFrame::new(vec![
        Column::new(metric.into(), values),
        Column::new(HOURS_COLUMN.into(), hours),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_ecdf_with_ties() {
        assert_close(&ecdf(&[1.0, 2.0, 2.0, 3.0]), &[0.25, 0.75, 0.75, 1.0]);
        assert_close(&ecdf(&[5.0]), &[1.0]);
        assert!(ecdf(&[]).is_empty());
    }

    #[test]
    fn test_distribution_per_year() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!(
            "day" => ["2020-01-01", "2020-01-01", "2020-01-03", "2020-01-03"],
            "TemperatureF" => [Some(51.0), Some(48.0), Some(30.0), None],
        )?;
        let dist = hours_below_distribution(&hourly, "TemperatureF", HoursBasis::Year)?;

        let values: Vec<f64> = dist.column("TemperatureF")?.f64()?.into_no_null_iter().collect();
        let hours: Vec<f64> = dist.column(HOURS_COLUMN)?.f64()?.into_no_null_iter().collect();
        assert_close(&values, &[30.0, 48.0, 51.0]);
        assert_close(&hours, &[2920.0, 5840.0, 8760.0]);
        Ok(())
    }

    #[test]
    fn test_distribution_observed_hours() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!("TemperatureF" => [40i64, 35, 40, 20])?;
        let dist = hours_below_distribution(&hourly, "TemperatureF", HoursBasis::Observed)?;
        let hours: Vec<f64> = dist.column(HOURS_COLUMN)?.f64()?.into_no_null_iter().collect();
        assert_close(&hours, &[1.0, 2.0, 4.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_distribution_errors() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!("TemperatureF" => [None::<f64>, None])?;
        assert!(matches!(
            hours_below_distribution(&hourly, "TemperatureF", HoursBasis::Year),
            Err(AnalysisError::EmptyMetric(_))
        ));
        assert!(matches!(
            hours_below_distribution(&hourly, "DewpointF", HoursBasis::Year),
            Err(AnalysisError::MissingColumn(c)) if c == "DewpointF"
        ));
        Ok(())
    }
}
