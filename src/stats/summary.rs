use std::time::Duration;

/// Aggregate statistics over a set of duration samples.
///
/// All values are computed in integer nanoseconds; the standard deviation
/// is the integer square root of the exact population variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    pub count: usize,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub median: Duration,
    pub std_dev: Duration,
}

/// Summarizes samples; returns `None` when the slice is empty.
#[must_use]
pub fn summarize(samples: &[Duration]) -> Option<SampleSummary> {
    if samples.is_empty() {
        return None;
    }
    let count = samples.len();
    let mut sorted: Vec<u128> = samples.iter().map(Duration::as_nanos).collect();
    sorted.sort_unstable();

    let total = sorted
        .iter()
        .fold(0u128, |acc, nanos| acc.saturating_add(*nanos));
    let mean = total.checked_div(count as u128).unwrap_or(0);

    Some(SampleSummary {
        count,
        total: duration_from_nanos(total),
        min: duration_from_nanos(sorted.first().copied().unwrap_or(0)),
        max: duration_from_nanos(sorted.last().copied().unwrap_or(0)),
        mean: duration_from_nanos(mean),
        median: duration_from_nanos(median_of(&sorted)),
        std_dev: duration_from_nanos(variance_of(&sorted, mean).isqrt()),
    })
}

/// Requests per second x100, for fixed-point display of burst throughput.
#[must_use]
pub fn throughput_rps_x100(requests: usize, elapsed: Duration) -> u64 {
    let duration_ms = elapsed.as_millis().max(1);
    let scaled = (requests as u128)
        .saturating_mul(100_000)
        .checked_div(duration_ms)
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

fn median_of(sorted: &[u128]) -> u128 {
    let len = sorted.len();
    let mid = len / 2;
    let upper = sorted.get(mid).copied().unwrap_or(0);
    if len % 2 == 0 {
        let lower = sorted.get(mid.saturating_sub(1)).copied().unwrap_or(0);
        lower.saturating_add(upper) / 2
    } else {
        upper
    }
}

fn variance_of(sorted: &[u128], mean: u128) -> u128 {
    let sum_squares = sorted.iter().fold(0u128, |acc, nanos| {
        let diff = nanos.abs_diff(mean);
        acc.saturating_add(diff.saturating_mul(diff))
    });
    sum_squares.checked_div(sorted.len() as u128).unwrap_or(0)
}

fn duration_from_nanos(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
