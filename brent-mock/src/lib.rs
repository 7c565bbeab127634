//! In-memory data source for CI-safe tests and demos.
//!
//! `MockSource` serves deterministic fixtures by default. Tests can replace any
//! resource's behavior at runtime, add latency (fixed or one-shot), and read
//! back how often each resource was requested.
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use brent_core::{
    ChangePoint, ChangePointSource, DataSource, DateRange, Event, EventSource, FetchError,
    PriceSource, PricePoint, Resource,
};

pub mod fixtures;

/// Instruction for how a resource should answer.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value (prices are still filtered by the requested range).
    Return(T),
    /// Fail with the provided error.
    Fail(FetchError),
    /// Never answer (simulate a stalled request).
    Hang,
}

struct Rule<T> {
    behavior: MockBehavior<T>,
    delay: Duration,
    queued_delays: VecDeque<Duration>,
    calls: usize,
}

impl<T: Clone> Rule<T> {
    const fn new(value: T) -> Self {
        Self {
            behavior: MockBehavior::Return(value),
            delay: Duration::ZERO,
            queued_delays: VecDeque::new(),
            calls: 0,
        }
    }

    /// Record a call and take a snapshot of what it should do.
    fn begin(&mut self) -> (Duration, MockBehavior<T>) {
        self.calls += 1;
        let delay = self.queued_delays.pop_front().unwrap_or(self.delay);
        (delay, self.behavior.clone())
    }
}

struct State {
    prices: Rule<Vec<PricePoint>>,
    change_points: Rule<Vec<ChangePoint>>,
    events: Rule<Vec<Event>>,
    price_requests: Vec<DateRange>,
}

/// Scriptable data source implementing every source role.
pub struct MockSource {
    state: Mutex<State>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// A source serving the [`fixtures`] sample with no latency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(
            fixtures::prices(),
            fixtures::change_points(),
            fixtures::events(),
        )
    }

    /// A source serving the given datasets with no latency.
    #[must_use]
    pub fn with_data(
        prices: Vec<PricePoint>,
        change_points: Vec<ChangePoint>,
        events: Vec<Event>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                prices: Rule::new(prices),
                change_points: Rule::new(change_points),
                events: Rule::new(events),
                price_requests: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace how price requests are answered.
    pub fn set_prices(&self, behavior: MockBehavior<Vec<PricePoint>>) {
        self.lock().prices.behavior = behavior;
    }

    /// Replace how change point requests are answered.
    pub fn set_change_points(&self, behavior: MockBehavior<Vec<ChangePoint>>) {
        self.lock().change_points.behavior = behavior;
    }

    /// Replace how event requests are answered.
    pub fn set_events(&self, behavior: MockBehavior<Vec<Event>>) {
        self.lock().events.behavior = behavior;
    }

    /// Fail every later request for `resource` with `err`.
    ///
    /// `Resource::Metrics` is not served by the mock and is ignored here and
    /// in the delay setters.
    pub fn fail(&self, resource: Resource, err: FetchError) {
        let mut s = self.lock();
        match resource {
            Resource::Prices => s.prices.behavior = MockBehavior::Fail(err),
            Resource::ChangePoints => s.change_points.behavior = MockBehavior::Fail(err),
            Resource::Events => s.events.behavior = MockBehavior::Fail(err),
            _ => {}
        }
    }

    /// Latency added to every request for `resource`.
    pub fn set_delay(&self, resource: Resource, delay: Duration) {
        let mut s = self.lock();
        match resource {
            Resource::Prices => s.prices.delay = delay,
            Resource::ChangePoints => s.change_points.delay = delay,
            Resource::Events => s.events.delay = delay,
            _ => {}
        }
    }

    /// One-shot latency for a single upcoming request of `resource`.
    ///
    /// Queued delays are consumed in call order; once drained, the fixed delay
    /// from [`set_delay`](Self::set_delay) applies again.
    pub fn queue_delay(&self, resource: Resource, delay: Duration) {
        let mut s = self.lock();
        match resource {
            Resource::Prices => s.prices.queued_delays.push_back(delay),
            Resource::ChangePoints => s.change_points.queued_delays.push_back(delay),
            Resource::Events => s.events.queued_delays.push_back(delay),
            _ => {}
        }
    }

    /// Number of requests received for `resource`.
    #[must_use]
    pub fn calls(&self, resource: Resource) -> usize {
        let s = self.lock();
        match resource {
            Resource::ChangePoints => s.change_points.calls,
            Resource::Events => s.events.calls,
            Resource::Prices => s.prices.calls,
            _ => 0,
        }
    }

    /// Ranges passed to `fetch_prices`, in call order.
    #[must_use]
    pub fn price_requests(&self) -> Vec<DateRange> {
        self.lock().price_requests.clone()
    }
}

async fn settle<T>(delay: Duration, behavior: MockBehavior<T>) -> Result<T, FetchError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match behavior {
        MockBehavior::Return(v) => Ok(v),
        MockBehavior::Fail(e) => Err(e),
        MockBehavior::Hang => std::future::pending().await,
    }
}

#[async_trait]
impl PriceSource for MockSource {
    async fn fetch_prices(&self, range: &DateRange) -> Result<Vec<PricePoint>, FetchError> {
        let (delay, behavior) = {
            let mut s = self.lock();
            s.price_requests.push(*range);
            s.prices.begin()
        };
        let all = settle(delay, behavior).await?;
        Ok(all.into_iter().filter(|p| range.contains(p.date)).collect())
    }
}

#[async_trait]
impl ChangePointSource for MockSource {
    async fn fetch_change_points(&self) -> Result<Vec<ChangePoint>, FetchError> {
        let (delay, behavior) = self.lock().change_points.begin();
        settle(delay, behavior).await
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError> {
        let (delay, behavior) = self.lock().events.begin();
        settle(delay, behavior).await
    }
}

impl DataSource for MockSource {
    fn name(&self) -> &'static str {
        "brent-mock"
    }
}
