// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use geomap_app_core::{ConfigService, MapPrefs};
use geomap_dry_tests::{point, square, two_field_query, GeometryBuilder, InMemoryConfigStore};
use geomap_features::{FeatureError, FeatureStore, NodePath, QueryOrigin, SessionKind};
use geomap_surface_port::{Color, HeadlessSurface, LayerStyle};

fn plan() -> QueryOrigin {
    QueryOrigin::Plan {
        query: "GEO == 'POINT(0 0)'".to_owned(),
    }
}

#[test]
fn two_fields_attach_then_delete_leaves_nothing() {
    let mut store = FeatureStore::new(HeadlessSurface::new());
    let id = store.load_query(two_field_query().payload().unwrap(), plan());

    assert_eq!(store.layers().len(), 2);
    assert_eq!(store.surface().layer_count(), 0);

    store.enable(&id, &NodePath::root()).unwrap();
    assert_eq!(store.surface().layer_count(), 2);

    store.delete(&id).unwrap();
    assert_eq!(store.surface().layer_count(), 0);
    assert!(store.is_empty());
    assert!(store.layers().is_empty());
}

#[test]
fn sessions_are_independent() {
    let mut store = FeatureStore::new(HeadlessSurface::new());
    let a = store.load_query(two_field_query().payload().unwrap(), plan());
    let b = store
        .load_json(SessionKind::Lookup, &two_field_query().to_json())
        .unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("Query 1", "Query Lookup 1"));

    store.enable(&a, &NodePath::root()).unwrap();
    store.enable(&b, &NodePath::root()).unwrap();
    assert_eq!(store.surface().layer_count(), 4);

    store.disable(&a, &NodePath::root()).unwrap();
    assert!(!store.is_visible(&a, &NodePath::root()).unwrap());
    assert!(store.is_visible(&b, &NodePath::root()).unwrap());

    store.delete(&b).unwrap();
    assert_eq!(store.surface().layer_count(), 0);
    assert_eq!(store.layers().len(), 2);
}

#[test]
fn zoom_fits_the_visible_union() {
    let mut store = FeatureStore::new(HeadlessSurface::new());
    let id = store.load_query(two_field_query().payload().unwrap(), plan());
    store.enable(&id, &NodePath::root()).unwrap();

    let bounds = store
        .zoom_to_visible(&id, &NodePath::root())
        .unwrap()
        .unwrap();
    assert_eq!(bounds.to_array(), [[0.0, 0.0], [6.0, 6.0]]);
    assert_eq!(store.surface().viewport, Some(bounds));
}

#[test]
fn subtree_colour_round_trip() {
    let mut store = FeatureStore::new(HeadlessSurface::new());
    let id = store
        .load_json(
            SessionKind::Geometry,
            &GeometryBuilder::new()
                .geometry(square("g", [0.0, 0.0], [1.0, 1.0]))
                .range_tier("1", point("r", 0.5, 0.5))
                .to_json(),
        )
        .unwrap();
    let geometry: NodePath = "0".parse().unwrap();
    let ranges: NodePath = "1".parse().unwrap();

    assert_eq!(
        store.uniform_color(&id, &NodePath::root()).unwrap(),
        Some(Color::default())
    );
    let red = Color::parse("#d32f2f").unwrap();
    store.set_color(&id, &ranges, &red).unwrap();
    assert_eq!(store.uniform_color(&id, &ranges).unwrap(), Some(red));
    assert_eq!(
        store.uniform_color(&id, &geometry).unwrap(),
        Some(Color::default())
    );
    assert_eq!(store.uniform_color(&id, &NodePath::root()).unwrap(), None);
}

#[test]
fn renamed_sessions_keep_their_layers() {
    let mut store = FeatureStore::new(HeadlessSurface::new());
    let id = store.load_query(two_field_query().payload().unwrap(), plan());
    store.enable(&id, &NodePath::root()).unwrap();

    store.rename(&id, "Parcels").unwrap();
    assert!(store.is_visible("Parcels", &NodePath::root()).unwrap());
    assert!(matches!(
        store.is_visible(&id, &NodePath::root()),
        Err(FeatureError::SessionNotFound(_))
    ));
    assert_eq!(
        store.node("Parcels", &NodePath::root()).unwrap().label(),
        "Parcels"
    );
}

#[test]
fn stored_prefs_configure_the_store() {
    let config = ConfigService::new(InMemoryConfigStore::new());
    let mut prefs = MapPrefs::default();
    prefs.naming.query = "Run ".to_owned();
    prefs.layer_style = LayerStyle::default().with_color(Color::parse("#388e3c").unwrap());
    config.save_prefs(&prefs).unwrap();

    let mut store = FeatureStore::from_prefs(&config.load_prefs().unwrap(), HeadlessSurface::new());
    let id = store.load_query(two_field_query().payload().unwrap(), plan());
    assert_eq!(id, "Run 1");
    assert_eq!(
        store.uniform_color(&id, &NodePath::root()).unwrap(),
        Some(Color::parse("#388e3c").unwrap())
    );
}

#[test]
fn unknown_root_tags_are_rejected() {
    let raw = r#"{"typeName": "GeoSomethingElse"}"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert!(matches!(
        geomap_features::FeatureRoot::from_value(value),
        Err(FeatureError::UnknownNodeType(name)) if name == "GeoSomethingElse"
    ));
}
