//! Deterministic Brent sample covering the March-April 2020 collapse.
use brent_core::{ChangePoint, Event, EventCategory, NaiveDate, PricePoint};

const PRICES: &[(&str, f64)] = &[
    ("2020-03-02", 51.90),
    ("2020-03-03", 51.86),
    ("2020-03-04", 51.13),
    ("2020-03-05", 49.99),
    ("2020-03-06", 45.27),
    ("2020-03-09", 34.36),
    ("2020-03-10", 37.22),
    ("2020-03-11", 35.79),
    ("2020-03-16", 30.05),
    ("2020-03-18", 24.88),
    ("2020-04-01", 24.74),
    ("2020-04-09", 31.48),
    ("2020-04-14", 29.60),
    ("2020-04-20", 25.57),
    ("2020-04-21", 19.33),
    ("2020-04-28", 20.46),
];

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}

/// Daily prices, strictly date ascending.
#[must_use]
pub fn prices() -> Vec<PricePoint> {
    PRICES
        .iter()
        .map(|&(d, p)| PricePoint::new(date(d), p))
        .collect()
}

/// Change points detected in the sample.
#[must_use]
pub fn change_points() -> Vec<ChangePoint> {
    vec![
        ChangePoint::new(date("2020-03-09"), 0.93),
        ChangePoint::new(date("2020-04-21"), 0.68),
    ]
}

/// Events around the sample, one of each known category plus an unlisted one.
#[must_use]
pub fn events() -> Vec<Event> {
    vec![
        Event::new(
            date("2020-03-06"),
            EventCategory::Opec,
            "OPEC+ fails to agree on production cuts",
        ),
        Event::new(
            date("2020-03-09"),
            EventCategory::Geopolitical,
            "Saudi Arabia and Russia start a price war",
        ),
        Event::new(
            date("2020-03-11"),
            EventCategory::Other("Pandemic".into()),
            "WHO declares COVID-19 a pandemic",
        ),
        Event::new(
            date("2020-04-20"),
            EventCategory::Economic,
            "WTI front-month futures settle below zero",
        ),
    ]
}
