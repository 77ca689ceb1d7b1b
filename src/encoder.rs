//! Binding Encoder: the triggered item-memory encode cycle.
//!
//! One encoder owns three buffers of length D: the item-memory vector, the
//! continuous item-memory vector and the output vector. Every rising edge
//! on the trigger line runs one cycle:
//!
//! ```text
//! Idle --trigger--> Generating --> Binding --> Publishing --> Cooldown --> Idle
//! ```
//!
//! Both memory vectors are regenerated from scratch each cycle. Nothing is
//! cached between cycles. Published results are immutable snapshots shared
//! through `Arc`, so observers never see a partially bound output.

use crate::clock::SimClock;
use crate::config::EncoderConfig;
use crate::error::{ItemMemError, Result};
use crate::generator::HypervectorGenerator;
use crate::primitives::Primitives;
use crate::representation::Representation;
use crate::signals::TriggerLine;
use crate::vector::Hypervector;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Where the encoder is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderState {
    /// Waiting for a trigger
    Idle,
    /// Drawing the two memory vectors
    Generating,
    /// Combining them element-wise
    Binding,
    /// Handing the snapshot to observers
    Publishing,
    /// Enforcing the minimum spacing before the next cycle
    Cooldown,
}

/// The published result of one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publication {
    cycle: u64,
    published_ns: u64,
    item_memory: Hypervector,
    output: Hypervector,
}

impl Publication {
    /// 1-based cycle number.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Simulated time of publication, in ns on the encoder's clock.
    pub fn published_ns(&self) -> u64 {
        self.published_ns
    }

    /// The identity/position vector of this cycle.
    pub fn item_memory(&self) -> &Hypervector {
        &self.item_memory
    }

    /// `bind(item_memory, continuous_item_memory)` for this cycle.
    pub fn output(&self) -> &Hypervector {
        &self.output
    }
}

/// Latest publication, `None` until the first cycle completes.
pub type PublicationRx = watch::Receiver<Option<Arc<Publication>>>;

/// Encodes one bound hypervector per trigger.
#[derive(Debug)]
pub struct BindingEncoder {
    config: EncoderConfig,
    generator: HypervectorGenerator,
    clock: SimClock,
    state: EncoderState,
    cycles: u64,
    item_memory: Hypervector,
    continuous_item_memory: Hypervector,
    output: Hypervector,
}

impl BindingEncoder {
    /// Build an encoder. Fails on zero dimensions or zero cooldown.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;

        let generator = match config.seed {
            Some(seed) => {
                HypervectorGenerator::with_seed(config.dimensions, config.representation, seed)?
            }
            None => HypervectorGenerator::new(config.dimensions, config.representation)?,
        };
        let dimensions = config.dimensions;

        Ok(Self {
            config,
            generator,
            clock: SimClock::start(),
            state: EncoderState::Idle,
            cycles: 0,
            item_memory: Hypervector::zeros(dimensions),
            continuous_item_memory: Hypervector::zeros(dimensions),
            output: Hypervector::zeros(dimensions),
        })
    }

    /// Share an existing simulated clock, so publication stamps line up
    /// with the caller's schedule.
    pub fn with_clock(mut self, clock: SimClock) -> Self {
        self.clock = clock;
        self
    }

    /// The configuration this encoder was built with.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// The fixed representation mode.
    pub fn representation(&self) -> Representation {
        self.config.representation
    }

    /// Hypervector length D.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// The clock used for cooldowns and publication stamps.
    pub fn clock(&self) -> SimClock {
        self.clock
    }

    /// Current position in the cycle.
    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Item-memory vector of the last completed cycle, `None` before the first.
    pub fn item_memory(&self) -> Option<&Hypervector> {
        self.completed().then_some(&self.item_memory)
    }

    /// Continuous item-memory vector of the last completed cycle.
    pub fn continuous_item_memory(&self) -> Option<&Hypervector> {
        self.completed().then_some(&self.continuous_item_memory)
    }

    /// Output of the last completed cycle, `None` before the first.
    pub fn output(&self) -> Option<&Hypervector> {
        self.completed().then_some(&self.output)
    }

    fn completed(&self) -> bool {
        self.cycles > 0
    }

    /// Run Generating → Binding → Publishing once, without waiting.
    ///
    /// Leaves the encoder in `Publishing`; the async loop moves it on to
    /// `Cooldown`.
    pub fn encode_cycle(&mut self) -> Arc<Publication> {
        self.state = EncoderState::Generating;
        trace!(cycle = self.cycles + 1, "generating memory vectors");
        let item = self.generator.generate();
        let continuous = self.generator.generate();

        self.bind_and_publish(item, continuous)
    }

    /// Run Binding → Publishing with externally supplied memory vectors.
    ///
    /// Both vectors must have the configured length and lie in the
    /// configured representation's domain.
    pub fn encode_with(
        &mut self,
        item: Hypervector,
        continuous: Hypervector,
    ) -> Result<Arc<Publication>> {
        let mode = self.representation();
        for v in [&item, &continuous] {
            if v.dimensions() != self.dimensions() {
                return Err(ItemMemError::DimensionMismatch {
                    expected: self.dimensions(),
                    got: v.dimensions(),
                });
            }
            if !v.in_domain(mode) {
                return Err(ItemMemError::InvalidElement(mode));
            }
        }
        Ok(self.bind_and_publish(item, continuous))
    }

    fn bind_and_publish(&mut self, item: Hypervector, continuous: Hypervector) -> Arc<Publication> {
        self.state = EncoderState::Binding;
        let output = Primitives::bind(&item, &continuous, self.representation());

        self.item_memory = item;
        self.continuous_item_memory = continuous;
        self.output = output;

        self.state = EncoderState::Publishing;
        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            representation = %self.representation(),
            dimensions = self.dimensions(),
            "bound item memory with continuous item memory"
        );

        Arc::new(Publication {
            cycle: self.cycles,
            published_ns: self.clock.now_ns(),
            item_memory: self.item_memory.clone(),
            output: self.output.clone(),
        })
    }

    /// Serve triggers until the trigger line closes.
    ///
    /// Each cycle's snapshot replaces the previous one in `publish`.
    /// Returns the number of completed cycles.
    pub async fn run(
        mut self,
        mut trigger: TriggerLine,
        publish: watch::Sender<Option<Arc<Publication>>>,
    ) -> u64 {
        let cooldown = self.config.cooldown();
        info!(
            dimensions = self.dimensions(),
            representation = %self.representation(),
            cooldown_ns = self.config.cooldown_ns,
            "binding encoder started"
        );

        loop {
            self.state = EncoderState::Idle;
            if trigger.rising_edge().await.is_none() {
                break;
            }

            let publication = self.encode_cycle();
            info!(cycle = publication.cycle(), "published cycle");
            publish.send_replace(Some(publication));

            self.state = EncoderState::Cooldown;
            self.clock.sleep(cooldown).await;
        }

        info!(cycles = self.cycles, "trigger line closed, encoder stopping");
        self.cycles
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self, trigger: TriggerLine) -> EncoderHandle {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(self.run(trigger, tx));
        EncoderHandle { publications: rx, task }
    }
}

/// A running encoder task.
#[derive(Debug)]
pub struct EncoderHandle {
    publications: PublicationRx,
    task: JoinHandle<u64>,
}

impl EncoderHandle {
    /// A fresh receiver of published snapshots.
    pub fn subscribe(&self) -> PublicationRx {
        self.publications.clone()
    }

    /// Snapshot of the latest publication.
    pub fn latest(&self) -> Option<Arc<Publication>> {
        self.publications.borrow().clone()
    }

    /// Wait for the encoder to stop and return its cycle count.
    ///
    /// The encoder stops once its trigger line closes.
    pub async fn join(self) -> Result<u64> {
        self.task
            .await
            .map_err(|e| ItemMemError::EncoderStopped(e.to_string()))
    }
}
