//! Read-only views over monthly rollups for charting and forecasting.

use serde::Serialize;

use crate::models::{Month, MonthlyData};

/// One calendar month of a gap-filled series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: Month,
    pub revenue: i64,
    pub expenses: i64,
    /// Percent change in revenue from the previous calendar month.
    /// `None` for January.
    pub revenue_change: Option<f64>,
    pub expenses_change: Option<f64>,
}

/// All twelve months January..December in calendar order, months the
/// account has no entry for reported as zero.
pub fn monthly_series(data: &MonthlyData) -> Vec<MonthlyPoint> {
    let mut points: Vec<MonthlyPoint> = Vec::with_capacity(Month::ALL.len());
    for month in Month::ALL {
        let agg = data.get_or_zero(month);
        let (revenue_change, expenses_change) = match points.last() {
            Some(prev) => (
                Some(period_change(prev.revenue, agg.revenue)),
                Some(period_change(prev.expenses, agg.expenses)),
            ),
            None => (None, None),
        };
        points.push(MonthlyPoint {
            month,
            revenue: agg.revenue,
            expenses: agg.expenses,
            revenue_change,
            expenses_change,
        });
    }
    points
}

/// Period-over-period change in percent. A zero previous value counts as
/// no change rather than an infinite one.
pub fn period_change(previous: i64, latest: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (latest - previous) as f64 / previous as f64 * 100.0
}
