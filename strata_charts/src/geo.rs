// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named polygon geometry, an equirectangular fit, and table joins by name.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect};
use strata_core::{Key, SchemaError, Table};

/// A closed ring of `(longitude, latitude)` positions.
pub type Ring = Vec<(f64, f64)>;

/// A polygon: an outer ring followed by any holes.
pub type Polygon = Vec<Ring>;

/// One named region.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
    /// The join name (for example a country name).
    pub name: String,
    /// Polygons making up the region.
    pub polygons: Vec<Polygon>,
}

impl GeoFeature {
    /// Creates a feature.
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            polygons,
        }
    }

    /// Longitude/latitude bounding box.
    pub fn bounds(&self) -> Option<Rect> {
        bounds_of(self.polygons.iter().flatten().flatten())
    }

    /// Builds the projected outline; every ring becomes a closed subpath.
    pub fn path(&self, projection: &Projection) -> BezPath {
        let mut path = BezPath::new();
        for ring in self.polygons.iter().flatten() {
            let mut points = ring.iter().map(|&p| projection.project(p));
            let Some(first) = points.next() else {
                continue;
            };
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }

    /// Area-weighted centroid of the largest polygon's outer ring, in longitude/latitude.
    ///
    /// Falls back to the bounding-box center for degenerate rings.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let outer = self
            .polygons
            .iter()
            .filter_map(|p| p.first())
            .max_by(|a, b| ring_area(a).abs().total_cmp(&ring_area(b).abs()))?;
        let area = ring_area(outer);
        if area == 0.0 {
            return bounds_of(outer.iter()).map(|r| (r.center().x, r.center().y));
        }
        let (mut cx, mut cy) = (0.0, 0.0);
        for (a, b) in ring_edges(outer) {
            let cross = a.0 * b.1 - b.0 * a.1;
            cx += (a.0 + b.0) * cross;
            cy += (a.1 + b.1) * cross;
        }
        Some((cx / (6.0 * area), cy / (6.0 * area)))
    }
}

fn ring_edges(ring: &[(f64, f64)]) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}

// Signed shoelace area.
fn ring_area(ring: &[(f64, f64)]) -> f64 {
    ring_edges(ring)
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum::<f64>()
        * 0.5
}

fn bounds_of<'a>(points: impl IntoIterator<Item = &'a (f64, f64)>) -> Option<Rect> {
    points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(None, |acc: Option<Rect>, &(x, y)| {
            Some(match acc {
                None => Rect::new(x, y, x, y),
                Some(r) => r.union_pt(Point::new(x, y)),
            })
        })
}

/// An ordered set of named features.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoCollection {
    features: Vec<GeoFeature>,
}

impl GeoCollection {
    /// Creates a collection.
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Appends a feature.
    pub fn push(&mut self, feature: GeoFeature) {
        self.features.push(feature);
    }

    /// Returns the features in input order.
    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Longitude/latitude bounding box of every feature.
    pub fn bounds(&self) -> Option<Rect> {
        self.features
            .iter()
            .filter_map(GeoFeature::bounds)
            .reduce(|a, b| a.union(b))
    }
}

/// Equirectangular projection fitted to a target rectangle.
///
/// Longitude maps to x and latitude to y (north up) with one shared scale factor, so the
/// geometry keeps its aspect ratio and is centered in the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    scale: f64,
    offset: (f64, f64),
}

impl Projection {
    /// Fits `bounds` (in longitude/latitude) into `target`.
    pub fn fit(bounds: Rect, target: Rect) -> Self {
        let sx = if bounds.width() > 0.0 {
            target.width() / bounds.width()
        } else {
            f64::INFINITY
        };
        let sy = if bounds.height() > 0.0 {
            target.height() / bounds.height()
        } else {
            f64::INFINITY
        };
        let scale = match sx.min(sy) {
            s if s.is_finite() => s,
            _ => 1.0,
        };
        let c = bounds.center();
        let t = target.center();
        Self {
            scale,
            offset: (t.x - c.x * scale, t.y + c.y * scale),
        }
    }

    /// Projects a `(longitude, latitude)` position.
    pub fn project(&self, (lon, lat): (f64, f64)) -> Point {
        Point::new(
            self.offset.0 + lon * self.scale,
            self.offset.1 - lat * self.scale,
        )
    }
}

/// Joins a numeric column onto `features` by exact name match.
///
/// Name cells match by their display text, so a numeric code column (`840`) joins features
/// named `"840"`. The result is aligned with `features`. Features with no row, or whose row
/// holds a non-numeric value, get `None`. When a name appears in several rows the first wins.
pub fn join_values(
    features: &[GeoFeature],
    table: &Table,
    name_column: &str,
    value_column: &str,
) -> Result<Vec<Option<f64>>, SchemaError> {
    let value_idx = table.column_index(value_column)?;
    let rows = name_index(table, name_column)?;
    let out: Vec<Option<f64>> = features
        .iter()
        .map(|f| {
            rows.get(f.name.as_str())
                .and_then(|&r| table.rows()[r].get(value_idx).as_f64())
        })
        .collect();
    log_unmatched(features.len(), out.iter().filter(|v| v.is_none()).count());
    Ok(out)
}

/// Joins a categorical column onto `features` by exact name match, as in [`join_values`].
///
/// Null cells and unmatched features give `None`.
pub fn join_keys(
    features: &[GeoFeature],
    table: &Table,
    name_column: &str,
    key_column: &str,
) -> Result<Vec<Option<Key>>, SchemaError> {
    let key_idx = table.column_index(key_column)?;
    let rows = name_index(table, name_column)?;
    let out: Vec<Option<Key>> = features
        .iter()
        .map(|f| {
            let r = *rows.get(f.name.as_str())?;
            match table.rows()[r].get(key_idx).key() {
                Key::Null => None,
                k => Some(k),
            }
        })
        .collect();
    log_unmatched(features.len(), out.iter().filter(|v| v.is_none()).count());
    Ok(out)
}

fn name_index(table: &Table, name_column: &str) -> Result<HashMap<String, usize>, SchemaError> {
    let name_idx = table.column_index(name_column)?;
    let mut rows = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        let cell = row.get(name_idx);
        if !cell.is_null() {
            rows.entry(cell.to_string()).or_insert(i);
        }
    }
    Ok(rows)
}

fn log_unmatched(total: usize, missing: usize) {
    if missing > 0 {
        tracing::warn!(features = total, missing, "features without data after join");
    }
}
