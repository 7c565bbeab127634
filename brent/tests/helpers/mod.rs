#![allow(dead_code)]

use std::sync::Arc;

use brent::{Dashboard, FetchCoordinator, NaiveDate, SourceSet};
use brent_mock::MockSource;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn coordinator(mock: &Arc<MockSource>) -> FetchCoordinator {
    FetchCoordinator::new(SourceSet::from_source(Arc::clone(mock)), None)
}

pub fn dashboard(mock: &Arc<MockSource>) -> Dashboard {
    Dashboard::builder()
        .with_source(Arc::clone(mock))
        .fetch_timeout(None)
        .build()
        .expect("dashboard over mock source")
}
