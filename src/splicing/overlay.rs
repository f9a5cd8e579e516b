//! Priority overlay of coloured screen intervals onto exon rectangles.

use serde::Serialize;

/// Screen intervals painted in one colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLayer {
    pub regions: Vec<(f64, f64)>,
    pub colour: String,
}

impl OverlayLayer {
    pub fn new(regions: Vec<(f64, f64)>, colour: impl Into<String>) -> Self {
        Self {
            regions,
            colour: colour.into(),
        }
    }

    /// Build a layer from a flat `[x1, x2, x1, x2, ...]` list.
    pub fn from_pairs(xs: &[f64], colour: impl Into<String>) -> Self {
        let regions = xs.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        Self::new(regions, colour)
    }
}

/// A drawn rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColouredRect {
    pub x: f64,
    pub width: f64,
    pub colour: String,
}

/// Paint `layers` over the exon rectangles `exons`.
///
/// Later layers take priority. Each exon is cut wherever the highest active
/// layer changes; parts covered by no layer get `default_colour`. Ends are
/// applied before starts at the same x so abutting regions do not bleed.
pub fn overlay_regions(
    exons: &[(f64, f64)],
    layers: &[OverlayLayer],
    default_colour: &str,
) -> Vec<ColouredRect> {
    // (x, delta, layer)
    let mut events: Vec<(f64, i32, usize)> = layers
        .iter()
        .enumerate()
        .flat_map(|(layer, l)| {
            l.regions
                .iter()
                .filter(|(from, to)| from < to)
                .flat_map(move |&(from, to)| [(from, 1, layer), (to, -1, layer)])
        })
        .collect();
    events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut exons: Vec<(f64, f64)> = exons.iter().copied().filter(|(a, b)| a < b).collect();
    exons.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut active = vec![0i32; layers.len()];
    let colour_of = |active: &[i32]| {
        active
            .iter()
            .rposition(|&count| count > 0)
            .map_or(default_colour, |layer| layers[layer].colour.as_str())
    };

    let mut rects = Vec::new();
    let mut next = 0;
    for (from, to) in exons {
        while let Some(&(x, delta, layer)) = events.get(next) {
            if x > from {
                break;
            }
            active[layer] += delta;
            next += 1;
        }

        let mut cursor = from;
        let mut colour = colour_of(&active);
        while let Some(&(x, _, _)) = events.get(next) {
            if x >= to {
                break;
            }
            while let Some(&(ex, delta, layer)) = events.get(next) {
                if ex != x {
                    break;
                }
                active[layer] += delta;
                next += 1;
            }
            let updated = colour_of(&active);
            if updated != colour {
                rects.push(ColouredRect {
                    x: cursor,
                    width: x - cursor,
                    colour: colour.to_string(),
                });
                cursor = x;
                colour = updated;
            }
        }
        rects.push(ColouredRect {
            x: cursor,
            width: to - cursor,
            colour: colour.to_string(),
        });
    }
    rects
}
