// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Each writes its report to `out`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use geomap_app_core::{ConfigService, MapPrefs};
use geomap_config_fs::FsConfigStore;
use geomap_features::{FeatureStore, NodePath, SessionKind};
use geomap_surface_port::HeadlessSurface;
use tracing::{debug, warn};

pub type Config = ConfigService<FsConfigStore>;

pub fn config_service(dir: Option<&Path>) -> Result<Config> {
    let store = match dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("opening config store")?;
    debug!(dir = %store.base().display(), "config store ready");
    Ok(ConfigService::new(store))
}

/// Stored prefs, or the defaults when the config store cannot be opened.
pub fn load_prefs(dir: Option<&Path>) -> MapPrefs {
    match config_service(dir) {
        Ok(config) => config.load_prefs_or_default(),
        Err(err) => {
            warn!("config store unavailable, using default prefs: {err:#}");
            MapPrefs::default()
        }
    }
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("reading payload from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn load(
    prefs: &MapPrefs,
    file: &Path,
    kind: SessionKind,
) -> Result<(FeatureStore<HeadlessSurface>, String)> {
    let raw = read_input(file)?;
    let mut store = FeatureStore::from_prefs(prefs, HeadlessSurface::new());
    let id = store
        .load_json(kind, &raw)
        .with_context(|| format!("loading {}", file.display()))?;
    Ok((store, id))
}

pub fn tree(
    out: &mut impl Write,
    prefs: &MapPrefs,
    file: &Path,
    kind: SessionKind,
    show_all: bool,
) -> Result<()> {
    let (mut store, id) = load(prefs, file, kind)?;
    if show_all {
        store.enable(&id, &NodePath::root())?;
    }

    let mut table = Table::new();
    table.set_header(vec!["Path", "Label", "Kind", "Visible", "Colour"]);
    for (path, node) in store.node(&id, &NodePath::root())?.outline() {
        let visible = store.layers().layers_visible(node, store.surface());
        let colour = match store.layers().colors(node).as_slice() {
            [] => String::new(),
            [one] => one.to_string(),
            _ => "mixed".to_owned(),
        };
        let indent = "  ".repeat(path.depth());
        table.add_row(vec![
            path.to_string(),
            format!("{indent}{}", node.label()),
            node.kind().to_string(),
            if visible { "yes" } else { "no" }.to_owned(),
            colour,
        ]);
    }
    writeln!(out, "session: {id}")?;
    writeln!(out, "{table}")?;
    Ok(())
}

pub fn bounds(
    out: &mut impl Write,
    prefs: &MapPrefs,
    file: &Path,
    kind: SessionKind,
    path: &NodePath,
    show_all: bool,
) -> Result<()> {
    let (mut store, id) = load(prefs, file, kind)?;
    if show_all {
        store.enable(&id, &NodePath::root())?;
    }
    match store.visible_bounds(&id, path)? {
        Some(bounds) => writeln!(out, "{}", serde_json::to_string(&bounds.to_array())?)?,
        None => writeln!(out, "none")?,
    }
    Ok(())
}

pub fn decorate(
    out: &mut impl Write,
    prefs: &MapPrefs,
    file: &Path,
    kind: SessionKind,
) -> Result<()> {
    let (store, id) = load(prefs, file, kind)?;
    let root = store
        .get(&id)
        .with_context(|| format!("session {id} missing after load"))?;
    writeln!(out, "{}", serde_json::to_string_pretty(root)?)?;
    Ok(())
}

pub fn prefs(out: &mut impl Write, config: &Config, reset: bool) -> Result<()> {
    if reset {
        config
            .save_prefs(&MapPrefs::default())
            .context("resetting prefs")?;
    }
    let prefs = config.load_prefs().context("reading prefs")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
    Ok(())
}
