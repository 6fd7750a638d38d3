//! Data Processor Module
//! Turns raw column text into the summaries charts are drawn from:
//! frequency counts, monthly buckets and fixed-width histograms.

use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::{BTreeMap, HashMap};

// Month-first before day-first: "05/01/2021" is May 1st, "14/03/2021" only
// parses day-first.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y%m%d",
];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Histogram output: `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Number of values that landed in a bin.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

pub struct DataProcessor;

impl DataProcessor {
    /// Count distinct non-missing values, most frequent first.
    /// Ties keep the order in which values first appear.
    pub fn value_counts(values: &[Option<String>]) -> Vec<(String, u64)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, u64)> = Vec::new();

        for value in values.iter().flatten() {
            match index.get(value.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(value.as_str(), counts.len());
                    counts.push((value.clone(), 1));
                }
            }
        }

        // sort_by is stable
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Parse a date (optionally with time of day). Unrecognised text yields `None`.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (day, time) = match text.split_once(|c: char| c == ' ' || c == 'T') {
            Some((day, time)) => (day, Some(time.trim())),
            None => (text, None),
        };
        if let Some(time) = time {
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
    }

    /// Rows per calendar month in chronological order, labelled `YYYY-MM`.
    /// Missing and unparseable dates are skipped.
    pub fn monthly_counts(values: &[Option<String>]) -> Vec<(String, u64)> {
        let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();

        for date in values.iter().flatten().filter_map(|v| Self::parse_date(v)) {
            *buckets.entry((date.year(), date.month())).or_insert(0) += 1;
        }

        buckets
            .into_iter()
            .map(|((year, month), count)| (format!("{:04}-{:02}", year, month), count))
            .collect()
    }

    /// Numeric coercion; non-numeric text and non-finite numbers are missing.
    pub fn to_numeric(values: &[Option<String>]) -> Vec<Option<f64>> {
        values
            .iter()
            .map(|v| {
                v.as_deref()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .filter(|x| x.is_finite())
            })
            .collect()
    }

    /// Bin values into fixed-width bins over `[start, end]`; the last bin is
    /// closed on the right. Values outside the range are not counted.
    pub fn histogram(values: &[Option<f64>], start: f64, end: f64, width: f64) -> Histogram {
        let n_bins = ((end - start) / width).ceil().max(1.0) as usize;
        let edges: Vec<f64> = (0..=n_bins)
            .map(|i| (start + i as f64 * width).min(end))
            .collect();
        let mut counts = vec![0u64; n_bins];

        for &v in values.iter().flatten() {
            if v < start || v > end {
                continue;
            }
            let idx = (((v - start) / width).floor() as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// Share of each count in percent.
    pub fn percentages(counts: &[(String, u64)]) -> Vec<f64> {
        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return vec![0.0; counts.len()];
        }
        counts
            .iter()
            .map(|(_, c)| *c as f64 * 100.0 / total as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn value_counts_orders_by_frequency() {
        let counts = DataProcessor::value_counts(&texts(&["X", "Y", "X"]));
        assert_eq!(counts, vec![("X".to_string(), 2), ("Y".to_string(), 1)]);
    }

    #[test]
    fn value_counts_ties_keep_first_appearance_and_skip_missing() {
        let mut values = texts(&["B", "A", "C", "A", "B"]);
        values.push(None);
        let counts = DataProcessor::value_counts(&values);
        assert_eq!(
            counts,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 14);
        assert_eq!(DataProcessor::parse_date("2021-03-14"), expected);
        assert_eq!(DataProcessor::parse_date("2021/03/14"), expected);
        assert_eq!(DataProcessor::parse_date("03/14/2021"), expected);
        assert_eq!(DataProcessor::parse_date("20210314"), expected);
        assert_eq!(DataProcessor::parse_date("2021-03-14 08:30:00"), expected);
        assert_eq!(DataProcessor::parse_date("2021-03-14T08:30:00"), expected);
        assert_eq!(DataProcessor::parse_date("2021-03-14 08:30:00.000"), expected);
        assert_eq!(DataProcessor::parse_date("03/14/2021 08:30"), expected);
        assert_eq!(DataProcessor::parse_date("not a date"), None);
        assert_eq!(DataProcessor::parse_date("2021-02-30"), None);
        assert_eq!(DataProcessor::parse_date("2021-03-14 25:99"), None);
    }

    #[test]
    fn ambiguous_dates_are_month_first_with_day_first_fallback() {
        let ymd = NaiveDate::from_ymd_opt;
        assert_eq!(DataProcessor::parse_date("05/01/2021"), ymd(2021, 5, 1));
        assert_eq!(DataProcessor::parse_date("05-01-2021"), ymd(2021, 5, 1));
        assert_eq!(DataProcessor::parse_date("01/13/2021"), ymd(2021, 1, 13));
        assert_eq!(DataProcessor::parse_date("14/03/2021"), ymd(2021, 3, 14));
        assert_eq!(DataProcessor::parse_date("14-03-2021 08:30"), ymd(2021, 3, 14));
    }

    #[test]
    fn monthly_counts_are_chronological_and_skip_invalid() {
        let mut values = texts(&[
            "2021-03-02",
            "15/01/2021",
            "2020-12-31",
            "garbage",
            "2021-03-20",
        ]);
        values.push(None);

        let counts = DataProcessor::monthly_counts(&values);
        assert_eq!(
            counts,
            vec![
                ("2020-12".to_string(), 1),
                ("2021-01".to_string(), 1),
                ("2021-03".to_string(), 2),
            ]
        );
    }

    #[test]
    fn histogram_excludes_out_of_range_and_non_numeric() {
        let ages = DataProcessor::to_numeric(&texts(&["5", "15", "999", "abc"]));
        let hist = DataProcessor::histogram(&ages, 0.0, 100.0, 5.0);

        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.counts[1], 1); // [5, 10)
        assert_eq!(hist.counts[3], 1); // [15, 20)
    }

    #[test]
    fn histogram_last_bin_is_closed() {
        let hist = DataProcessor::histogram(&[Some(100.0), Some(95.0), Some(0.0)], 0.0, 100.0, 5.0);
        assert_eq!(hist.counts[19], 2);
        assert_eq!(hist.counts[0], 1);
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let counts = vec![("F".to_string(), 1), ("M".to_string(), 3)];
        let pct = DataProcessor::percentages(&counts);
        assert_eq!(pct, vec![25.0, 75.0]);
        assert!(DataProcessor::percentages(&[]).is_empty());
    }
}
