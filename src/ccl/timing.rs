//! Zero-cost phase timing.
//!
//! With the `timing` feature enabled the orchestrator reports per-phase wall
//! time on stderr; without it everything here compiles away.
//!
//! Usage:
//!   cargo run --release --features timing --bin bench_ccl

use std::time::Duration;

/// Phase timings for one clustering call.
#[cfg(feature = "timing")]
#[derive(Debug, Clone)]
pub(crate) struct PhaseTimings {
    pub total: Duration,
    pub validate: Duration,
    pub soa_build: Duration,
    pub partition: Duration,
    pub kernel: Duration,
    pub demux: Duration,
}

#[cfg(feature = "timing")]
impl PhaseTimings {
    pub fn report(&self, n: usize) {
        let pct = |d: Duration| {
            if self.total.as_nanos() == 0 {
                0.0
            } else {
                d.as_secs_f64() / self.total.as_secs_f64() * 100.0
            }
        };
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;

        eprintln!("[timing] sparse_ccl n={}", n);
        if self.validate.as_nanos() > 0 {
            eprintln!(
                "  validate:  {:7.2}ms ({:4.1}%)",
                ms(self.validate),
                pct(self.validate)
            );
        }
        eprintln!(
            "  soa_build: {:7.2}ms ({:4.1}%)",
            ms(self.soa_build),
            pct(self.soa_build)
        );
        eprintln!(
            "  partition: {:7.2}ms ({:4.1}%)",
            ms(self.partition),
            pct(self.partition)
        );
        eprintln!(
            "  kernel:    {:7.2}ms ({:4.1}%)",
            ms(self.kernel),
            pct(self.kernel)
        );
        eprintln!(
            "  demux:     {:7.2}ms ({:4.1}%)",
            ms(self.demux),
            pct(self.demux)
        );
        eprintln!("  total:     {:7.2}ms", ms(self.total));
    }
}

/// Dummy timings when the feature is disabled (zero-sized).
#[cfg(not(feature = "timing"))]
#[derive(Debug, Clone, Copy)]
pub(crate) struct PhaseTimings;

#[cfg(not(feature = "timing"))]
impl PhaseTimings {
    #[inline(always)]
    pub fn report(&self, _n: usize) {}
}

/// Timer that tracks elapsed time when timing is enabled.
#[cfg(feature = "timing")]
pub(crate) struct Timer(std::time::Instant);

#[cfg(feature = "timing")]
impl Timer {
    #[inline]
    pub fn start() -> Self {
        Self(std::time::Instant::now())
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Dummy timer when the feature is disabled.
#[cfg(not(feature = "timing"))]
pub(crate) struct Timer;

#[cfg(not(feature = "timing"))]
impl Timer {
    #[inline(always)]
    pub fn start() -> Self {
        Self
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

/// Builder for collecting phase timings.
#[cfg(feature = "timing")]
pub(crate) struct TimingBuilder {
    t_start: std::time::Instant,
    validate: Duration,
    soa_build: Duration,
    partition: Duration,
    kernel: Duration,
    demux: Duration,
}

#[cfg(feature = "timing")]
impl TimingBuilder {
    pub fn new() -> Self {
        Self {
            t_start: std::time::Instant::now(),
            validate: Duration::ZERO,
            soa_build: Duration::ZERO,
            partition: Duration::ZERO,
            kernel: Duration::ZERO,
            demux: Duration::ZERO,
        }
    }

    pub fn set_validate(&mut self, d: Duration) {
        self.validate = d;
    }

    pub fn set_soa_build(&mut self, d: Duration) {
        self.soa_build = d;
    }

    pub fn set_partition(&mut self, d: Duration) {
        self.partition = d;
    }

    pub fn set_kernel(&mut self, d: Duration) {
        self.kernel = d;
    }

    pub fn set_demux(&mut self, d: Duration) {
        self.demux = d;
    }

    pub fn finish(self) -> PhaseTimings {
        PhaseTimings {
            total: self.t_start.elapsed(),
            validate: self.validate,
            soa_build: self.soa_build,
            partition: self.partition,
            kernel: self.kernel,
            demux: self.demux,
        }
    }
}

/// Dummy builder when the feature is disabled.
#[cfg(not(feature = "timing"))]
pub(crate) struct TimingBuilder;

#[cfg(not(feature = "timing"))]
impl TimingBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }

    #[inline(always)]
    pub fn set_validate(&mut self, _d: Duration) {}

    #[inline(always)]
    pub fn set_soa_build(&mut self, _d: Duration) {}

    #[inline(always)]
    pub fn set_partition(&mut self, _d: Duration) {}

    #[inline(always)]
    pub fn set_kernel(&mut self, _d: Duration) {}

    #[inline(always)]
    pub fn set_demux(&mut self, _d: Duration) {}

    #[inline(always)]
    pub fn finish(self) -> PhaseTimings {
        PhaseTimings
    }
}
