//! Coordinated loads of prices, change points, and events.
//!
//! Every `start_load` bumps a generation counter. The spawned load task may
//! only publish its final state while its generation is still current; the
//! check and the publication happen under the same lock, so a superseded
//! load can never overwrite a newer one regardless of completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use brent_core::{
    ChangePoint, DateRange, Event, FetchError, MergedView, PricePoint, Resource, merge,
};
use tokio::sync::{oneshot, watch};

use crate::source_set::SourceSet;
use crate::util::fetch_with_timeout;

/// Payload of a successful load: all three datasets for one range.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Range the load was started with.
    pub range: DateRange,
    /// Price series restricted to `range`, date ascending.
    pub prices: Vec<PricePoint>,
    /// All change points.
    pub change_points: Vec<ChangePoint>,
    /// All events.
    pub events: Vec<Event>,
}

impl Dataset {
    /// Align the three datasets for presentation.
    #[must_use]
    pub fn view(&self) -> MergedView {
        merge(&self.prices, &self.change_points, &self.events)
    }
}

/// Visible state of the dashboard's data.
///
/// Never partial: a load either delivers all three datasets or fails as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// Nothing loaded and nothing in flight.
    #[default]
    Idle,
    /// A load is in flight.
    Loading {
        /// Requested range.
        range: DateRange,
        /// Generation of the in-flight load.
        generation: u64,
    },
    /// The latest load succeeded.
    Loaded(Arc<Dataset>),
    /// The latest load failed; any earlier data has been cleared.
    Failed {
        /// Requested range.
        range: DateRange,
        /// First sub-fetch error observed.
        error: FetchError,
    },
}

impl LoadState {
    /// True while a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Loaded payload, if any.
    #[must_use]
    pub const fn dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Self::Loaded(ds) => Some(ds),
            _ => None,
        }
    }

    /// Failure of the latest load, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Merged view of the loaded payload, if any.
    #[must_use]
    pub fn view(&self) -> Option<MergedView> {
        self.dataset().map(|ds| ds.view())
    }
}

/// How a load ended, from its handle's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The load was current when it finished and its state was published.
    Applied(LoadState),
    /// A newer load or an explicit cancel made this one stale; nothing was published.
    Superseded,
}

struct Shared {
    current: Mutex<u64>,
    generation_tx: watch::Sender<u64>,
    state_tx: watch::Sender<LoadState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new generation and publish `Loading` for it.
    fn begin(&self, range: DateRange) -> u64 {
        let mut current = self.lock();
        *current += 1;
        let generation = *current;
        self.generation_tx.send_replace(generation);
        self.state_tx
            .send_replace(LoadState::Loading { range, generation });
        generation
    }

    /// Publish `next` only if `generation` is still current.
    fn publish(&self, generation: u64, next: LoadState) -> bool {
        let current = self.lock();
        if *current != generation {
            return false;
        }
        self.state_tx.send_replace(next);
        true
    }

    /// Retire `generation` if current and fall back to `Idle`.
    fn cancel(&self, generation: u64) -> bool {
        let mut current = self.lock();
        if *current != generation {
            return false;
        }
        *current += 1;
        self.generation_tx.send_replace(*current);
        self.state_tx.send_replace(LoadState::Idle);
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.lock() == generation
    }
}

/// Owns the visible `LoadState` and runs coordinated loads.
pub struct FetchCoordinator {
    sources: SourceSet,
    fetch_timeout: Option<Duration>,
    shared: Arc<Shared>,
}

impl FetchCoordinator {
    /// Create an idle coordinator over `sources`.
    ///
    /// `fetch_timeout` bounds each sub-fetch separately; `None` waits indefinitely.
    #[must_use]
    pub fn new(sources: SourceSet, fetch_timeout: Option<Duration>) -> Self {
        let (generation_tx, _) = watch::channel(0);
        let (state_tx, _) = watch::channel(LoadState::Idle);
        Self {
            sources,
            fetch_timeout,
            shared: Arc::new(Shared {
                current: Mutex::new(0),
                generation_tx,
                state_tx,
            }),
        }
    }

    /// Sources this coordinator fans out to.
    #[must_use]
    pub const fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.shared.state_tx.borrow().clone()
    }

    /// Watch state transitions; only whole transitions are ever observed.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.shared.state_tx.subscribe()
    }

    /// Start loading all three datasets for `range`.
    ///
    /// The state becomes `Loading` before this returns. Any previous load is
    /// superseded: its handle reports cancelled and its results are discarded.
    /// Must be called within a Tokio runtime.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "brent::coordinator::start_load",
            skip_all,
            fields(range = %range, source = self.sources.name(), events = self.sources.events_name()),
        )
    )]
    pub fn start_load(&self, range: DateRange) -> LoadHandle {
        let generation = self.shared.begin(range);
        let (done_tx, done_rx) = oneshot::channel();

        let shared = Arc::clone(&self.shared);
        let sources = self.sources.clone();
        let timeout = self.fetch_timeout;
        let mut generation_rx = self.shared.generation_tx.subscribe();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = async {
                    let _ = generation_rx.wait_for(|g| *g != generation).await;
                } => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(generation, "load superseded; abandoning sub-fetches");
                    LoadOutcome::Superseded
                }
                res = fetch_all(&sources, range, timeout) => {
                    let next = match res {
                        Ok(ds) => LoadState::Loaded(Arc::new(ds)),
                        Err(error) => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(generation, resource = %error.resource(), error = %error, "load failed");
                            LoadState::Failed { range, error }
                        }
                    };
                    if shared.publish(generation, next.clone()) {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(generation, "load published");
                        LoadOutcome::Applied(next)
                    } else {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(generation, "stale load result discarded");
                        LoadOutcome::Superseded
                    }
                }
            };
            let _ = done_tx.send(outcome);
        });

        LoadHandle {
            generation,
            range,
            shared: Arc::clone(&self.shared),
            done: done_rx,
        }
    }
}

impl std::fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("sources", &self.sources)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("state", &*self.shared.state_tx.borrow())
            .finish()
    }
}

/// Fan out to the three sources; the first failure short-circuits the rest.
async fn fetch_all(
    sources: &SourceSet,
    range: DateRange,
    timeout: Option<Duration>,
) -> Result<Dataset, FetchError> {
    let (prices, change_points, events) = futures::future::try_join3(
        fetch_with_timeout(Resource::Prices, timeout, sources.prices.fetch_prices(&range)),
        fetch_with_timeout(
            Resource::ChangePoints,
            timeout,
            sources.change_points.fetch_change_points(),
        ),
        fetch_with_timeout(Resource::Events, timeout, sources.events.fetch_events()),
    )
    .await?;
    Ok(Dataset {
        range,
        prices,
        change_points,
        events,
    })
}

/// Handle to one coordinated load.
#[derive(Debug)]
pub struct LoadHandle {
    generation: u64,
    range: DateRange,
    shared: Arc<Shared>,
    done: oneshot::Receiver<LoadOutcome>,
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("current", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl LoadHandle {
    /// Generation number of this load; strictly increasing per coordinator.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Range this load was started with.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// True once a newer load started or this load was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.shared.is_current(self.generation)
    }

    /// Cancel this load.
    ///
    /// If it is still current the state returns to `Idle`; a load that was
    /// already superseded is left alone. Returns whether anything changed.
    pub fn cancel(&self) -> bool {
        let changed = self.shared.cancel(self.generation);
        #[cfg(feature = "tracing")]
        if changed {
            tracing::debug!(generation = self.generation, "load cancelled");
        }
        changed
    }

    /// Wait for the load task to finish.
    pub async fn wait(self) -> LoadOutcome {
        self.done.await.unwrap_or(LoadOutcome::Superseded)
    }
}
