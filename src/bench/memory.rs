use log::{debug, warn};
use std::hint::black_box;
use std::time::Instant;

/// Time an allocation of `elements` f64s plus one full-buffer mutation.
///
/// The mutation pass touches every element so lazily mapped pages are
/// actually committed before the clock stops. An allocation failure is a
/// measurement result, not an error: it comes back as `f64::INFINITY` and
/// the scorer turns it into a zero RAM speed score.
pub async fn run_memory_allocation(elements: usize) -> f64 {
    match tokio::task::spawn_blocking(move || allocation_pass(elements)).await {
        Ok(elapsed) => elapsed,
        Err(e) => {
            warn!("memory workload worker died: {}", e);
            f64::INFINITY
        }
    }
}

fn allocation_pass(elements: usize) -> f64 {
    let start = Instant::now();

    let mut buffer: Vec<f64> = Vec::new();
    if buffer.try_reserve_exact(elements).is_err() {
        warn!("memory workload could not allocate {} elements", elements);
        return f64::INFINITY;
    }
    buffer.resize(elements, 0.0);

    for value in buffer.iter_mut() {
        *value += 1.0;
    }
    black_box(&buffer);

    let elapsed = start.elapsed().as_secs_f64();
    debug!("memory allocation pass: {} elements in {:.3}s", elements, elapsed);

    // buffer is dropped here, the workload never holds it past its own call
    elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn small_allocation_succeeds() {
        let elapsed = run_memory_allocation(1_000_000).await;
        assert!(elapsed.is_finite());
        assert!(elapsed >= 0.0);
    }

    #[tokio::test]
    async fn impossible_allocation_reports_infinity() {
        // isize::MAX bytes can never be reserved, try_reserve must refuse it
        let elapsed = run_memory_allocation(isize::MAX as usize / 8).await;
        assert!(elapsed.is_infinite());
    }
}
