// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The demo page manifest: which charts to draw, from which files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use strata_charts::{ChartKind, ChartSize};

fn default_name_property() -> String {
    "name".to_string()
}

/// A page of charts.
#[derive(Debug, Deserialize)]
pub(crate) struct Manifest {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) size: ChartSize,
    pub(crate) charts: Vec<ChartEntry>,
    /// Directory the manifest was read from; entry paths are relative to it.
    #[serde(skip)]
    pub(crate) base: PathBuf,
}

/// One chart on the page.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartEntry {
    /// File stem for the SVG and the HTML anchor.
    pub(crate) id: String,
    pub(crate) title: String,
    /// Delimited text file holding the chart's table.
    pub(crate) data: PathBuf,
    /// GeoJSON `FeatureCollection`, for map charts.
    #[serde(default)]
    pub(crate) geometry: Option<PathBuf>,
    /// Feature property joined against the table.
    #[serde(default = "default_name_property")]
    pub(crate) name_property: String,
    pub(crate) kind: ChartKind,
}

impl Manifest {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let mut manifest: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        manifest.base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub(crate) fn resolve(&self, relative: &Path) -> PathBuf {
        self.base.join(relative)
    }
}
