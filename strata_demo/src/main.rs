// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders every chart listed in a manifest to SVG, plus an HTML report linking them.
//!
//! Usage: `strata_demo [MANIFEST] [OUT_DIR]`, defaulting to `strata_demo/data/page.json` and
//! `target/strata_demo`. Set `RUST_LOG=debug` to see per-chart build logs.

mod geojson;
mod html;
mod manifest;
mod svg;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use strata_charts::{
    ChartBuilder, ChartData, ChartStyle, GeoCollection, PLACEHOLDER_MESSAGE,
};
use strata_core::{Scene, Table, TableLoader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::manifest::{ChartEntry, Manifest};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut args = std::env::args_os().skip(1);
    let manifest_path = args
        .next()
        .map_or_else(|| PathBuf::from("strata_demo/data/page.json"), PathBuf::from);
    let out_dir = args
        .next()
        .map_or_else(|| PathBuf::from("target/strata_demo"), PathBuf::from);

    let manifest = Manifest::load(&manifest_path)?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let style = ChartStyle::default();
    let mut sections = Vec::with_capacity(manifest.charts.len());
    for entry in &manifest.charts {
        let builder =
            ChartBuilder::new(style.clone(), manifest.size).with_title(entry.title.clone());
        let scene = match load_inputs(&manifest, entry) {
            Ok((table, geometry)) => {
                let mut data = ChartData::new(&table);
                if let Some(geometry) = &geometry {
                    data = data.with_geometry(geometry);
                }
                builder.build_or_placeholder(&entry.kind, data)
            }
            Err(err) => {
                warn!(chart = %entry.id, "inputs unavailable: {err:#}");
                Scene::placeholder(
                    manifest.size.width,
                    manifest.size.height,
                    PLACEHOLDER_MESSAGE,
                    style.text_color,
                )
            }
        };

        let svg = svg::scene_to_svg(&scene, &style);
        let path = out_dir.join(format!("{}.svg", entry.id));
        std::fs::write(&path, &svg).with_context(|| format!("writing {}", path.display()))?;
        info!(chart = %entry.id, primitives = scene.len(), "wrote {}", path.display());
        sections.push(html::HtmlSection {
            id: entry.id.clone(),
            title: entry.title.clone(),
            svg,
        });
    }

    let report = out_dir.join("report.html");
    std::fs::write(&report, html::render_report(&manifest.title, &sections))
        .with_context(|| format!("writing {}", report.display()))?;
    info!("wrote {}", report.display());
    Ok(())
}

fn load_inputs(
    manifest: &Manifest,
    entry: &ChartEntry,
) -> anyhow::Result<(Table, Option<GeoCollection>)> {
    let table = load_table(&manifest.resolve(&entry.data))?;
    let geometry = entry
        .geometry
        .as_deref()
        .map(|path| load_geometry(&manifest.resolve(path), &entry.name_property))
        .transpose()?;
    Ok((table, geometry))
}

fn load_table(path: &Path) -> anyhow::Result<Table> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let table = TableLoader::new()
        .load_reader(BufReader::new(file))
        .with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(table)
}

fn load_geometry(path: &Path, name_property: &str) -> anyhow::Result<GeoCollection> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    geojson::parse_collection(&text, name_property)
        .with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_chart_builds() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/page.json");
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.charts.len(), 15);
        let builder = ChartBuilder::new(ChartStyle::default(), manifest.size);
        for entry in &manifest.charts {
            let (table, geometry) = load_inputs(&manifest, entry).unwrap();
            let mut data = ChartData::new(&table);
            if let Some(geometry) = &geometry {
                data = data.with_geometry(geometry);
            }
            let scene = builder
                .build(&entry.kind, data)
                .unwrap_or_else(|err| panic!("{}: {err}", entry.id));
            assert!(scene.tooltips().count() > 0, "{} has no marks", entry.id);
        }
    }
}
