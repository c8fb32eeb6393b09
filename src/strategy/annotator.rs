use crate::data::PricePoint;
use std::collections::{BTreeMap, BTreeSet};

//column name used for a moving average window in reports and logs
pub fn ma_column(window: usize) -> String {
    format!("MA_{}", window)
}

//union of every window a sweep needs, each computed once
pub fn sweep_windows(ma_short: &[usize], ma_long: &[usize]) -> BTreeSet<usize> {
    ma_short.iter().chain(ma_long.iter()).copied().collect()
}

//rolling arithmetic mean of the last `window` closes ending at each index
//None for the first window - 1 points, or when the window holds a non-finite close
//each mean is taken over its own window so no error carries between indices
pub fn rolling_mean(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || window > closes.len() {
        return vec![None; closes.len()];
    }

    let mut means = vec![None; window - 1];
    means.extend(closes.windows(window).map(window_mean));
    means
}

//an equal valued window yields that value exactly
fn window_mean(values: &[f64]) -> Option<f64> {
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return Some(first);
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

//a price series with one moving average column per window
//owned by a single pair's sweep
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSeries {
    points: Vec<PricePoint>,
    columns: BTreeMap<usize, Vec<Option<f64>>>,
}

impl AnnotatedSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        AnnotatedSeries {
            points,
            columns: BTreeMap::new(),
        }
    }

    //adds a column for every window not already present
    pub fn annotate(&mut self, windows: &BTreeSet<usize>) {
        let closes: Vec<f64> = self.points.iter().map(|p| p.close).collect();

        for &window in windows {
            self.columns
                .entry(window)
                .or_insert_with(|| rolling_mean(&closes, window));
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    //moving average column for a window, if it was annotated
    pub fn ma(&self, window: usize) -> Option<&[Option<f64>]> {
        self.columns.get(&window).map(|c| c.as_slice())
    }

    pub fn windows(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.keys().copied()
    }
}

//builds an annotated series for all requested windows
pub fn annotate(points: Vec<PricePoint>, windows: &BTreeSet<usize>) -> AnnotatedSeries {
    let mut series = AnnotatedSeries::new(points);
    series.annotate(windows);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::minutes(i as i64), c))
            .collect()
    }

    fn unwrap_all(column: &[Option<f64>]) -> Vec<f64> {
        column.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }

    #[test]
    fn rolling_mean_leaves_warmup_undefined() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0], 3);
        assert_eq!(means[0], None);
        assert_eq!(means[1], None);
        let expected = [
            2.0,
            7.0 / 3.0,
            2.0,
            5.0 / 3.0,
            2.0,
            3.0,
            10.0 / 3.0,
            3.0,
        ];
        for (value, want) in unwrap_all(&means[2..]).iter().zip(expected.iter()) {
            assert_relative_eq!(*value, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn rolling_mean_window_longer_than_series() {
        assert!(rolling_mean(&[1.0, 2.0], 5).iter().all(|v| v.is_none()));
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn rolling_mean_window_one_is_identity() {
        let closes = [1.5, 2.5, 0.5];
        let means = rolling_mean(&closes, 1);
        assert_eq!(means, vec![Some(1.5), Some(2.5), Some(0.5)]);
    }

    #[test]
    fn non_finite_close_poisons_only_its_windows() {
        let means = rolling_mean(&[1.0, f64::NAN, 3.0, 5.0, 7.0], 2);
        assert_eq!(means, vec![None, None, None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn flat_run_after_trend_averages_to_the_exact_close() {
        let mut closes: Vec<f64> = (0..50).map(|i| 1.2345 + i as f64 * 0.001).collect();
        closes.extend(std::iter::repeat(1.2845).take(500));

        let ma2 = rolling_mean(&closes, 2);
        let ma3 = rolling_mean(&closes, 3);
        for i in 52..closes.len() {
            assert_eq!(ma2[i], Some(1.2845));
            assert_eq!(ma3[i], Some(1.2845));
        }
    }

    #[test]
    fn sweep_windows_deduplicates() {
        let windows = sweep_windows(&[2, 3, 5], &[3, 5, 8]);
        assert_eq!(windows.into_iter().collect::<Vec<_>>(), vec![2, 3, 5, 8]);
    }

    #[test]
    fn annotate_adds_one_column_per_window() {
        let windows = sweep_windows(&[2], &[3]);
        let series = annotate(points(&[1.0, 2.0, 3.0, 2.0]), &windows);

        assert_eq!(series.windows().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(series.ma(2).unwrap()[1], Some(1.5));
        assert_eq!(series.ma(3).unwrap()[2], Some(2.0));
        assert!(series.ma(4).is_none());
        assert_eq!(ma_column(21), "MA_21");
    }

    #[test]
    fn annotating_twice_is_idempotent() {
        let windows = sweep_windows(&[2, 3], &[4]);
        let closes = [1.1, 1.3, 1.2, 1.6, 1.4, 1.5, 1.9];

        let once = annotate(points(&closes), &windows);
        let mut twice = once.clone();
        twice.annotate(&windows);

        assert_eq!(once, twice);
        assert_eq!(once, annotate(points(&closes), &windows));
    }
}
