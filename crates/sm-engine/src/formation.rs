//! Initial spatial layouts for freshly spawned macro members.
//!
//! A formation only decides *starting* positions; once spawned, sources are
//! driven entirely by their components.

use std::f32::consts::{PI, TAU};

use sm_core::Vec3;

/// How to arrange `n` new sources around a spawn origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formation {
    /// Evenly spaced on a horizontal circle; `spacing` is the arc distance
    /// between neighbours.
    Circle,
    /// A line along +x, centered on the origin.
    Line,
    /// A centered horizontal grid, row-major.
    Grid { columns: usize },
    /// A Fibonacci-lattice sphere: near-uniform nearest-neighbour spacing
    /// for any member count.
    Sphere,
}

impl Formation {
    /// Offsets from the spawn origin for `count` members, `spacing` units
    /// apart.  Always returns exactly `count` offsets.
    pub fn layout(self, count: usize, spacing: f32) -> Vec<Vec3> {
        let spacing = spacing.max(0.0);
        match self {
            Formation::Circle => {
                // Arc length between neighbours equals `spacing`.
                let radius = (spacing * count as f32 / TAU).max(spacing);
                (0..count)
                    .map(|i| {
                        let a = i as f32 / count as f32 * TAU;
                        Vec3::new(radius * a.cos(), radius * a.sin(), 0.0)
                    })
                    .collect()
            }
            Formation::Line => {
                let mid = (count as f32 - 1.0) / 2.0;
                (0..count)
                    .map(|i| Vec3::new((i as f32 - mid) * spacing, 0.0, 0.0))
                    .collect()
            }
            Formation::Grid { columns } => {
                let columns = columns.max(1);
                let rows = count.div_ceil(columns);
                let mid_col = (columns as f32 - 1.0) / 2.0;
                let mid_row = (rows as f32 - 1.0) / 2.0;
                (0..count)
                    .map(|i| {
                        let col = (i % columns) as f32;
                        let row = (i / columns) as f32;
                        Vec3::new((col - mid_col) * spacing, (row - mid_row) * spacing, 0.0)
                    })
                    .collect()
            }
            Formation::Sphere => {
                // Radius chosen so each point's share of the surface is a
                // spacing × spacing patch.
                let radius = spacing * (count as f32 / (4.0 * PI)).sqrt().max(0.5);
                let golden_angle = PI * (3.0 - 5.0f32.sqrt());
                (0..count)
                    .map(|i| {
                        // z descends uniformly from pole to pole.
                        let z = if count > 1 {
                            1.0 - 2.0 * i as f32 / (count as f32 - 1.0)
                        } else {
                            0.0
                        };
                        let ring = (1.0 - z * z).max(0.0).sqrt();
                        let a = golden_angle * i as f32;
                        Vec3::new(radius * ring * a.cos(), radius * ring * a.sin(), radius * z)
                    })
                    .collect()
            }
        }
    }
}
