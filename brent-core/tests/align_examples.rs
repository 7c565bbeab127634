use brent_core::{
    ChangePoint, Event, EventCategory, Marker, MarkerKind, MarkerPayload, NaiveDate, PricePoint,
    merge,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn merges_backend_sized_sample() {
    let prices = vec![
        PricePoint::new(d(2020, 1, 1), 66.0),
        PricePoint::new(d(2020, 1, 2), 67.0),
        PricePoint::new(d(2020, 1, 3), 68.5),
    ];
    let cps = vec![ChangePoint::new(d(2020, 1, 2), 0.91)];
    let evs = vec![
        Event::new(d(2020, 1, 3), EventCategory::Geopolitical, "Soleimani strike"),
        Event::new(d(2020, 1, 2), EventCategory::Opec, "Output review"),
    ];

    let view = merge(&prices, &cps, &evs);

    assert_eq!(view.series, prices);
    assert_eq!(
        view.markers,
        vec![
            Marker {
                date: d(2020, 1, 2),
                payload: MarkerPayload::ChangePoint { probability: 0.91 },
            },
            Marker {
                date: d(2020, 1, 2),
                payload: MarkerPayload::Event {
                    category: EventCategory::Opec,
                    description: "Output review".into(),
                },
            },
            Marker {
                date: d(2020, 1, 3),
                payload: MarkerPayload::Event {
                    category: EventCategory::Geopolitical,
                    description: "Soleimani strike".into(),
                },
            },
        ]
    );
    assert!(view.markers.iter().all(|m| view.is_within_series(m)));
}

#[test]
fn all_inputs_empty_gives_empty_view() {
    let view = merge(&[], &[], &[]);
    assert!(view.series.is_empty());
    assert!(view.markers.is_empty());
}

#[test]
fn markers_serialize_with_kind_tag() {
    let view = merge(&[], &[ChangePoint::new(d(2014, 11, 27), 0.75)], &[]);
    let json = serde_json::to_value(&view.markers[0]).unwrap();
    assert_eq!(json["payload"]["kind"], "ChangePoint");
    assert_eq!(json["date"], "2014-11-27");
    assert_eq!(view.markers_of(MarkerKind::ChangePoint).count(), 1);
}
