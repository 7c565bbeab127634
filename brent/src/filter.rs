use brent_core::{DateRange, NaiveDate, RangeError};

use crate::coordinator::{FetchCoordinator, LoadHandle};

/// User-edited date range, kept apart from the range last applied.
///
/// Edits that would put the start after the end are rejected and leave the
/// draft untouched; the rejection stays visible through
/// [`validation_message`](Self::validation_message) and blocks [`apply`](Self::apply)
/// until a valid edit clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeFilter {
    draft: DateRange,
    applied: DateRange,
    rejected: Option<RangeError>,
}

impl RangeFilter {
    /// Both ranges unbounded, no pending rejection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Range being edited.
    #[must_use]
    pub const fn draft(&self) -> DateRange {
        self.draft
    }

    /// Range of the last apply.
    #[must_use]
    pub const fn applied(&self) -> DateRange {
        self.applied
    }

    /// Pending rejection, if the last edit was invalid.
    #[must_use]
    pub const fn validation_error(&self) -> Option<&RangeError> {
        self.rejected.as_ref()
    }

    /// Human-readable form of the pending rejection.
    #[must_use]
    pub fn validation_message(&self) -> Option<String> {
        self.rejected.as_ref().map(ToString::to_string)
    }

    /// Set or clear the draft start.
    ///
    /// # Errors
    /// Returns `StartAfterEnd` if `start` is after the draft end; the draft is unchanged.
    pub fn set_draft_start(&mut self, start: Option<NaiveDate>) -> Result<(), RangeError> {
        let next = self.draft.with_start(start);
        self.edit(next)
    }

    /// Set or clear the draft end.
    ///
    /// # Errors
    /// Returns `StartAfterEnd` if `end` is before the draft start; the draft is unchanged.
    pub fn set_draft_end(&mut self, end: Option<NaiveDate>) -> Result<(), RangeError> {
        let next = self.draft.with_end(end);
        self.edit(next)
    }

    fn edit(&mut self, next: Result<DateRange, RangeError>) -> Result<(), RangeError> {
        match next {
            Ok(range) => {
                self.draft = range;
                self.rejected = None;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, draft = %self.draft, "draft edit rejected");
                self.rejected = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Commit the draft and start a load for it.
    ///
    /// # Errors
    /// Returns the pending `RangeError`, without loading, while the last edit
    /// is still rejected.
    pub fn apply(&mut self, coordinator: &FetchCoordinator) -> Result<LoadHandle, RangeError> {
        if let Some(e) = &self.rejected {
            return Err(e.clone());
        }
        self.applied = self.draft;
        Ok(coordinator.start_load(self.applied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejected_edit_keeps_draft_and_surfaces_message() {
        let mut f = RangeFilter::new();
        f.set_draft_end(Some(d(2021, 1, 1))).unwrap();
        let err = f.set_draft_start(Some(d(2021, 6, 1))).unwrap_err();
        assert_eq!(
            err,
            RangeError::StartAfterEnd {
                start: d(2021, 6, 1),
                end: d(2021, 1, 1)
            }
        );
        assert_eq!(f.draft().start(), None);
        assert_eq!(f.draft().end(), Some(d(2021, 1, 1)));
        assert_eq!(
            f.validation_message().as_deref(),
            Some("start date 2021-06-01 is after end date 2021-01-01")
        );
    }

    #[test]
    fn valid_edit_clears_rejection() {
        let mut f = RangeFilter::new();
        f.set_draft_end(Some(d(2021, 1, 1))).unwrap();
        assert!(f.set_draft_start(Some(d(2021, 6, 1))).is_err());
        f.set_draft_end(None).unwrap();
        assert!(f.validation_error().is_none());
        f.set_draft_start(Some(d(2021, 6, 1))).unwrap();
        assert_eq!(f.draft().start(), Some(d(2021, 6, 1)));
    }

    #[test]
    fn clearing_a_bound_is_always_valid() {
        let mut f = RangeFilter::new();
        f.set_draft_start(Some(d(2020, 1, 1))).unwrap();
        f.set_draft_end(Some(d(2020, 1, 1))).unwrap();
        assert!(f.set_draft_start(None).is_ok());
        assert!(f.set_draft_end(None).is_ok());
        assert!(f.draft().is_unbounded());
        assert!(f.applied().is_unbounded());
    }
}
