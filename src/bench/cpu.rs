use log::debug;
use std::hint::black_box;
use std::time::Instant;

/// Split an iteration budget into contiguous per-worker ranges.
///
/// The floor-division remainder is folded into the last range, and the
/// worker count is clamped so no range can ever be empty while the budget
/// still has iterations left. Together the ranges cover `[0, total)`
/// exactly once.
pub(crate) fn chunk_ranges(total: u64, workers: usize) -> Vec<(u64, u64)> {
    let workers = (workers.max(1) as u64).min(total.max(1));
    let chunk = total / workers;

    let mut ranges = Vec::with_capacity(workers as usize);
    for i in 0..workers {
        let start = i * chunk;
        let end = if i == workers - 1 { total } else { (i + 1) * chunk };
        ranges.push((start, end));
    }
    ranges
}

fn sum_of_squares_range(start: u64, end: u64) -> u64 {
    let mut total: u64 = 0;
    for i in start..end {
        // black_box keeps the loop from being folded into a closed form
        total = total.wrapping_add(black_box(i.wrapping_mul(i)));
    }
    total
}

// f64 on purpose: inputs past 170 saturate to infinity instead of overflowing,
// which bounds the magnitude the same way the modulo below bounds the input
fn factorial(n: u64) -> f64 {
    let mut res = 1.0_f64;
    for i in 2..=n {
        res *= i as f64;
    }
    res
}

fn factorial_range(start: u64, end: u64) -> f64 {
    let mut total = 0.0_f64;
    for i in start..end {
        total += black_box(factorial((i % 200) + 1));
    }
    total
}

/// Wall-clock seconds to run the sum-of-squares budget across `workers`
/// concurrent ranges. The partial sums are discarded, only the
/// dispatch-to-join time of the whole batch is measured.
pub async fn run_sum_of_squares(iterations: u64, workers: usize) -> f64 {
    run_partitioned("sum_of_squares", iterations, workers, sum_of_squares_range).await
}

/// Wall-clock seconds for the factorial workload, same batch timing rules.
pub async fn run_factorial(iterations: u64, workers: usize) -> f64 {
    run_partitioned("factorial", iterations, workers, factorial_range).await
}

async fn run_partitioned<T, F>(name: &str, iterations: u64, workers: usize, work: F) -> f64
where
    T: Send + 'static,
    F: Fn(u64, u64) -> T + Copy + Send + 'static,
{
    let ranges = chunk_ranges(iterations, workers);
    let range_count = ranges.len();

    let start = Instant::now();
    let mut handles = Vec::with_capacity(range_count);
    for (lo, hi) in ranges {
        handles.push(tokio::task::spawn_blocking(move || work(lo, hi)));
    }
    for handle in handles {
        // a worker panic only costs us that range's partial sum
        let _ = handle.await;
    }
    let elapsed = start.elapsed().as_secs_f64();

    debug!(
        "{} batch: {} iterations over {} ranges in {:.3}s",
        name, iterations, range_count, elapsed
    );

    elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_coverage(total: u64, workers: usize) {
        let ranges = chunk_ranges(total, workers);
        assert!(!ranges.is_empty());

        // contiguous, ordered, no gaps or overlaps
        let mut next = 0;
        for &(start, end) in &ranges {
            assert_eq!(start, next, "gap or overlap at {} (N={}, W={})", start, total, workers);
            assert!(end >= start);
            next = end;
        }
        assert_eq!(next, total, "ranges must end exactly at N={}", total);

        let covered: u64 = ranges.iter().map(|&(s, e)| e - s).sum();
        assert_eq!(covered, total);
    }

    #[test]
    fn chunk_ranges_cover_budget_exactly() {
        for &total in &[0, 1, 2, 7, 10_000, 15_000_000] {
            for &workers in &[0usize, 1, 2, 3, 4, 7, 8, 16, 61] {
                assert_exact_coverage(total, workers);
            }
        }
    }

    #[test]
    fn chunk_ranges_clamp_workers_to_budget() {
        // budget smaller than the worker count must not produce empty chunks
        let ranges = chunk_ranges(3, 8);
        assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn chunk_ranges_degrade_to_sequential() {
        assert_eq!(chunk_ranges(10, 0), vec![(0, 10)]);
        assert_eq!(chunk_ranges(10, 1), vec![(0, 10)]);
    }

    #[test]
    fn factorial_matches_small_values() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(5), 120.0);
        // saturates instead of overflowing
        assert!(factorial(200).is_infinite());
    }

    #[test]
    fn partitioned_sums_match_sequential() {
        // same total no matter how the range is split
        let sequential = sum_of_squares_range(0, 10_000);
        let split: u64 = chunk_ranges(10_000, 7)
            .into_iter()
            .map(|(lo, hi)| sum_of_squares_range(lo, hi))
            .fold(0, u64::wrapping_add);
        assert_eq!(sequential, split);
    }

    #[tokio::test]
    async fn workloads_report_positive_elapsed() {
        let elapsed = run_sum_of_squares(100_000, 4).await;
        assert!(elapsed >= 0.0);
        let elapsed = run_factorial(1_000, 4).await;
        assert!(elapsed >= 0.0);
    }
}
