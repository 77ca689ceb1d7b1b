//! Simulation harness around a [`BindingEncoder`].
//!
//! The harness owns the control lines, advances simulated time through a
//! [`SimClock`] shared with the encoder, and records everything it
//! observes into an optional VCD trace. The stimulus schedule is fixed:
//!
//! 1. all lines low at t = 0
//! 2. hold for `settle`
//! 3. raise `init` and keep it high for `observe`
//! 4. close the trigger line, wait for the encoder to stop, close the trace
//!
//! All times are simulated nanoseconds. Run it on a paused-clock runtime
//! so a 60 s observation window costs no wall time.

use crate::clock::SimClock;
use crate::config::HarnessConfig;
use crate::encoder::{BindingEncoder, Publication};
use crate::error::{ItemMemError, Result};
use crate::signals::Signals;
use crate::trace::TraceRecorder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a harness run observed.
#[derive(Debug, Clone)]
pub struct HarnessReport {
    /// Cycles completed by the encoder
    pub cycles: u64,
    /// Every publication seen, in order
    pub publications: Vec<Arc<Publication>>,
    /// Simulated time covered by the run, 1 ns resolution
    pub elapsed: Duration,
    /// Where the trace was written, if anywhere
    pub trace_path: Option<PathBuf>,
}

impl HarnessReport {
    /// The last published snapshot.
    pub fn last(&self) -> Option<&Arc<Publication>> {
        self.publications.last()
    }
}

/// Drives one encoder through the fixed stimulus schedule.
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Validate `config` and build a harness.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Open the configured trace file, if any.
    pub fn open_trace(&self) -> Result<Option<TraceRecorder<BufWriter<File>>>> {
        let Some(path) = &self.config.trace_path else {
            return Ok(None);
        };
        let file = File::create(path).map_err(|source| ItemMemError::TraceSink {
            path: path.clone(),
            source,
        })?;
        let recorder = TraceRecorder::new(BufWriter::new(file), self.config.encoder.dimensions)?;
        Ok(Some(recorder))
    }

    /// Open the trace sink and run the schedule.
    ///
    /// Fails with [`ItemMemError::TraceSink`] before simulating anything if
    /// the trace file cannot be created.
    pub async fn run(&self) -> Result<HarnessReport> {
        let recorder = self.open_trace()?;
        let (mut report, _) = self.run_with_recorder(recorder).await?;
        report.trace_path = self.config.trace_path.clone();
        Ok(report)
    }

    /// Run the schedule, recording into `recorder` when present.
    ///
    /// Returns the report and the trace sink after the trace is closed.
    pub async fn run_with_recorder<W: Write>(
        &self,
        mut recorder: Option<TraceRecorder<W>>,
    ) -> Result<(HarnessReport, Option<W>)> {
        let clock = SimClock::start();

        let signals = Signals::new();
        let encoder = BindingEncoder::new(self.config.encoder.clone())?.with_clock(clock);
        let handle = encoder.spawn(signals.trigger_line());
        let mut publications_rx = handle.subscribe();

        if let Some(rec) = recorder.as_mut() {
            rec.record_signals(0, signals.levels())?;
        }

        clock.sleep(self.config.settle()).await;
        signals.set_init(true);
        let raised_ns = clock.now_ns();
        debug!(at_ns = raised_ns, "trigger raised");
        if let Some(rec) = recorder.as_mut() {
            rec.record_signals(raised_ns, signals.levels())?;
        }

        let deadline_ns = raised_ns.saturating_add(self.config.observe_ns);
        let mut publications = Vec::new();
        loop {
            tokio::select! {
                changed = publications_rx.changed() => {
                    if changed.is_err() {
                        warn!("encoder stopped before the observation window ended");
                        break;
                    }
                    let Some(publication) = publications_rx.borrow_and_update().clone() else {
                        continue;
                    };
                    if let Some(rec) = recorder.as_mut() {
                        rec.record_publication(publication.published_ns(), &publication)?;
                    }
                    publications.push(publication);
                }
                _ = clock.sleep_until_ns(deadline_ns) => break,
            }
        }

        drop(signals);
        let cycles = handle.join().await?;
        let end_ns = clock.now_ns();

        let sink = match recorder {
            Some(rec) => Some(rec.finish(end_ns)?),
            None => None,
        };

        info!(
            cycles,
            published = publications.len(),
            simulated_ns = end_ns,
            "harness run complete"
        );

        Ok((
            HarnessReport {
                cycles,
                publications,
                elapsed: Duration::from_nanos(end_ns),
                trace_path: None,
            },
            sink,
        ))
    }
}

/// A current-thread runtime whose clock starts paused.
///
/// Timers complete as soon as every task is idle, which turns the harness
/// into a discrete-event simulation.
pub fn simulation_runtime() -> Result<tokio::runtime::Runtime> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()?;
    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::representation::Representation;

    fn config(dims: usize, mode: Representation) -> HarnessConfig {
        HarnessConfig {
            encoder: EncoderConfig::new(dims, mode).with_seed(5),
            settle_ns: 10,
            observe_ns: 1_000_000,
            trace_path: None,
        }
    }

    #[test]
    fn test_new_validates() {
        let mut c = config(8, Representation::Binary);
        c.encoder.dimensions = 0;
        assert!(matches!(
            Harness::new(c),
            Err(ItemMemError::InvalidDimensions(0))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_cycle_without_trace() {
        let harness = Harness::new(config(64, Representation::Bipolar)).unwrap();
        let (report, sink) = harness.run_with_recorder::<Vec<u8>>(None).await.unwrap();

        assert!(sink.is_none());
        assert_eq!(report.cycles, 1);
        assert_eq!(report.publications.len(), 1);
        let p = report.last().unwrap();
        assert_eq!(p.output().dimensions(), 64);
        assert!(p.output().in_domain(Representation::Bipolar));
        assert_eq!(p.published_ns(), 10);
        assert_eq!(report.elapsed, Duration::from_nanos(1_000_010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trace_records_cycle() {
        let harness = Harness::new(config(4, Representation::Binary)).unwrap();
        let recorder = TraceRecorder::new(Vec::new(), 4).unwrap();
        let (report, sink) = harness.run_with_recorder(Some(recorder)).await.unwrap();
        let vcd = String::from_utf8(sink.unwrap()).unwrap();

        assert!(vcd.contains("$var wire 1 ! init $end"));
        assert!(vcd.contains("hv1_3 $end"));
        assert!(vcd.contains("hv2_3 $end"));
        assert!(vcd.contains("#10\n1!\n"), "init should rise at 10 ns:\n{}", vcd);
        assert!(vcd.trim_end().ends_with("#1000010"));
        assert_eq!(report.cycles, 1);
        assert_eq!(report.last().unwrap().published_ns(), 10);
    }

    #[test]
    fn test_open_trace_failure() {
        let mut c = config(4, Representation::Binary);
        c.trace_path = Some(PathBuf::from("/nonexistent-dir/for/sure/traces.vcd"));
        let harness = Harness::new(c).unwrap();
        assert!(matches!(
            harness.open_trace(),
            Err(ItemMemError::TraceSink { .. })
        ));
    }
}
