use std::fmt;
use std::sync::Arc;

use brent_core::{ChangePointSource, DataSource, EventSource, PriceSource};

/// The three role sources a coordinated load fans out to.
///
/// Usually all three point at one [`DataSource`]; the event role can be
/// swapped independently, e.g. for a static CSV file.
#[derive(Clone)]
pub struct SourceSet {
    pub(crate) prices: Arc<dyn PriceSource>,
    pub(crate) change_points: Arc<dyn ChangePointSource>,
    pub(crate) events: Arc<dyn EventSource>,
    name: &'static str,
    events_name: &'static str,
}

impl SourceSet {
    /// Serve every role from one source.
    pub fn from_source<S: DataSource + 'static>(source: Arc<S>) -> Self {
        let name = source.name();
        Self {
            prices: Arc::clone(&source) as Arc<dyn PriceSource>,
            change_points: Arc::clone(&source) as Arc<dyn ChangePointSource>,
            events: source as Arc<dyn EventSource>,
            name,
            events_name: name,
        }
    }

    /// Replace the event role.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSource>) -> Self {
        self.events_name = events.origin();
        self.events = events;
        self
    }

    /// Name of the data source serving prices and change points.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Name of whatever serves events: the main source's name, or the
    /// replacement's [`origin`](EventSource::origin).
    #[must_use]
    pub const fn events_name(&self) -> &'static str {
        self.events_name
    }
}

impl fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSet")
            .field("name", &self.name)
            .field("events_name", &self.events_name)
            .finish_non_exhaustive()
    }
}
