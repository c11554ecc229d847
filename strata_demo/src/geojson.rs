// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reads GeoJSON `FeatureCollection`s into [`GeoCollection`]s.
//!
//! Only `Polygon` and `MultiPolygon` geometries are kept; features of other types, or without
//! the name property, are skipped with a log line.

use anyhow::{Context, bail};
use serde_json::Value;
use strata_charts::{GeoCollection, GeoFeature, Polygon, Ring};

pub(crate) fn parse_collection(text: &str, name_property: &str) -> anyhow::Result<GeoCollection> {
    let root: Value = serde_json::from_str(text).context("parsing GeoJSON")?;
    if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        bail!("expected a GeoJSON FeatureCollection");
    }
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .context("FeatureCollection without a `features` array")?;

    let mut out = GeoCollection::default();
    for (i, feature) in features.iter().enumerate() {
        let name = match feature.get("properties").and_then(|p| p.get(name_property)) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let Some(name) = name else {
            tracing::warn!(feature = i, name_property, "feature without a name; skipped");
            continue;
        };
        let geometry = feature.get("geometry").unwrap_or(&Value::Null);
        let kind = geometry.get("type").and_then(Value::as_str).unwrap_or("");
        let coordinates = geometry.get("coordinates").unwrap_or(&Value::Null);
        let polygons = match kind {
            "Polygon" => vec![polygon(coordinates).with_context(|| format!("feature {name}"))?],
            "MultiPolygon" => coordinates
                .as_array()
                .context("MultiPolygon coordinates must be an array")?
                .iter()
                .map(polygon)
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("feature {name}"))?,
            other => {
                tracing::debug!(name, geometry = other, "unsupported geometry; skipped");
                continue;
            }
        };
        out.push(GeoFeature::new(name, polygons));
    }
    tracing::debug!(features = out.len(), "loaded geometry");
    Ok(out)
}

fn polygon(value: &Value) -> anyhow::Result<Polygon> {
    value
        .as_array()
        .context("polygon must be an array of rings")?
        .iter()
        .map(ring)
        .collect()
}

fn ring(value: &Value) -> anyhow::Result<Ring> {
    value
        .as_array()
        .context("ring must be an array of positions")?
        .iter()
        .map(|pos| match pos.as_array().map(Vec::as_slice) {
            Some([lon, lat, ..]) => Ok((
                lon.as_f64().context("longitude must be a number")?,
                lat.as_f64().context("latitude must be a number")?,
            )),
            _ => bail!("position must hold at least two numbers"),
        })
        .collect()
}
