use chrono::{DateTime, Duration, TimeZone, Utc};
use contracts::dashboards::d400_usage_metrics::{MetricsBucket, MetricsRange};

use super::monitoring::MetricPoint;

/// Метки запросов, которые считаем чтением.
/// Эвристика предварительная: реальная структура меток не подтверждена.
const READ_METHODS: &[&str] = &["GET", "LIST", "QUERY", "READ", "RUN_QUERY", "BATCH_GET"];

const METHOD_LABELS: &[&str] = &["method", "api_method", "type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Read,
    Write,
}

/// Окно графика `[start, end)`, выровненное по размеру слота.
/// Последний слот содержит `now`.
pub fn window(range: MetricsRange, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let slot_secs = range.slot_minutes() * 60;
    let ts = now.timestamp();
    let aligned = ts - ts.rem_euclid(slot_secs) + slot_secs;
    let end = Utc.timestamp_opt(aligned, 0).single().unwrap_or(now);
    let start = end - Duration::seconds(slot_secs * range.slot_count() as i64);
    (start, end)
}

/// Пустые слоты с подписями `HH:MM` (UTC)
pub fn empty_buckets(range: MetricsRange, start: DateTime<Utc>) -> Vec<MetricsBucket> {
    let slot = Duration::minutes(range.slot_minutes());
    (0..range.slot_count())
        .map(|i| {
            let at = start + slot * i as i32;
            MetricsBucket {
                label: at.format("%H:%M").to_string(),
                start: at,
                reads: 0,
                writes: 0,
                functions: 0,
            }
        })
        .collect()
}

/// Чтение или запись по метке метода. `RunQuery`, `run-query` и `RUN_QUERY` равнозначны.
pub fn classify(point: &MetricPoint) -> OpKind {
    let method = METHOD_LABELS
        .iter()
        .find_map(|key| point.labels.get(*key))
        .map(|m| normalize_method(m));
    match method {
        Some(m) if READ_METHODS.contains(&m.as_str()) => OpKind::Read,
        _ => OpKind::Write,
    }
}

fn normalize_method(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch == '-' || ch == ' ' || ch == '_' {
            out.push('_');
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_lowercase();
        out.extend(ch.to_uppercase());
    }
    out
}

/// Индекс слота, в который попадает момент; `None` вне окна
pub fn slot_index(range: MetricsRange, start: DateTime<Utc>, at: DateTime<Utc>) -> Option<usize> {
    if at < start {
        return None;
    }
    let offset = (at - start).num_seconds() / (range.slot_minutes() * 60);
    let idx = usize::try_from(offset).ok()?;
    (idx < range.slot_count()).then_some(idx)
}

fn as_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Раскладывает точки двух рядов по слотам окна
pub fn fill_buckets(
    range: MetricsRange,
    start: DateTime<Utc>,
    document_ops: &[MetricPoint],
    function_executions: &[MetricPoint],
) -> Vec<MetricsBucket> {
    let mut buckets = empty_buckets(range, start);

    for point in document_ops {
        let Some(idx) = slot_index(range, start, point.end_time) else {
            continue;
        };
        let count = as_count(point.value);
        match classify(point) {
            OpKind::Read => buckets[idx].reads += count,
            OpKind::Write => buckets[idx].writes += count,
        }
    }

    for point in function_executions {
        if let Some(idx) = slot_index(range, start, point.end_time) {
            buckets[idx].functions += as_count(point.value);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, h, m, s).unwrap()
    }

    fn point(end: DateTime<Utc>, value: f64, method: Option<&str>) -> MetricPoint {
        let mut labels = HashMap::new();
        if let Some(m) = method {
            labels.insert("method".to_string(), m.to_string());
        }
        MetricPoint {
            end_time: end,
            value,
            labels,
        }
    }

    #[test]
    fn test_window_alignment() {
        let (start, end) = window(MetricsRange::Hour, at(10, 7, 31));
        assert_eq!(end, at(10, 10, 0));
        assert_eq!(start, at(9, 10, 0));

        let (start, end) = window(MetricsRange::Day, at(10, 0, 0));
        assert_eq!(end, at(11, 0, 0));
        assert_eq!(end - start, Duration::hours(24));
    }

    #[test]
    fn test_labels() {
        let buckets = empty_buckets(MetricsRange::Hour, at(9, 10, 0));
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "09:10");
        assert_eq!(buckets[11].label, "10:05");
    }

    #[test]
    fn test_classify() {
        let now = at(10, 0, 0);
        assert_eq!(classify(&point(now, 1.0, Some("RunQuery"))), OpKind::Read);
        assert_eq!(classify(&point(now, 1.0, Some("BatchGet"))), OpKind::Read);
        assert_eq!(classify(&point(now, 1.0, Some("list"))), OpKind::Read);
        assert_eq!(classify(&point(now, 1.0, Some("Commit"))), OpKind::Write);
        assert_eq!(classify(&point(now, 1.0, None)), OpKind::Write);
        assert_eq!(normalize_method("run-query"), "RUN_QUERY");
    }

    #[test]
    fn test_points_fall_into_slot_of_end_time() {
        let (start, _) = window(MetricsRange::Hour, at(10, 7, 31));
        let docs = vec![
            point(at(9, 10, 0), 3.0, Some("Get")),
            point(at(9, 14, 59), 2.0, Some("Write")),
            point(at(9, 15, 0), 4.0, Some("Get")),
            point(at(9, 9, 59), 100.0, Some("Get")),
            point(at(10, 10, 0), 100.0, Some("Get")),
        ];
        let functions = vec![point(at(10, 9, 0), 5.4, None), point(at(10, 9, 30), -1.0, None)];

        let buckets = fill_buckets(MetricsRange::Hour, start, &docs, &functions);
        assert_eq!(buckets[0].reads, 3);
        assert_eq!(buckets[0].writes, 2);
        assert_eq!(buckets[1].reads, 4);
        assert_eq!(buckets[11].functions, 5);
        let total_reads: u64 = buckets.iter().map(|b| b.reads).sum();
        assert_eq!(total_reads, 7);
    }
}
