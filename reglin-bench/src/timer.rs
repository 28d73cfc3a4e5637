//! Wall and CPU time measurement.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Mean time per iteration of a measured closure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub iterations: u64,
    pub real: Duration,
    pub cpu: Duration,
}

/// CPU time consumed by this process so far.
#[cfg(unix)]
pub fn process_cpu_time() -> Duration {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        return Duration::ZERO;
    }
    Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
}

/// CPU time is not available here; wall time is reported in its place.
#[cfg(not(unix))]
pub fn process_cpu_time() -> Duration {
    Duration::ZERO
}

/// Run `f` `warmup` times untimed, then `iterations` times timed.
///
/// `f` receives the iteration index. Its result is passed through
/// [`black_box`] so the work is not optimized away.
pub fn measure<R>(warmup: u32, iterations: u32, mut f: impl FnMut(u32) -> R) -> Timing {
    for i in 0..warmup {
        black_box(f(i));
    }
    let iterations = iterations.max(1);

    let cpu_start = process_cpu_time();
    let start = Instant::now();
    for i in 0..iterations {
        black_box(f(i));
    }
    let real = start.elapsed();
    let cpu = process_cpu_time().saturating_sub(cpu_start);
    let cpu = if cfg!(unix) { cpu } else { real };

    Timing {
        iterations: u64::from(iterations),
        real: real / iterations,
        cpu: cpu / iterations,
    }
}
