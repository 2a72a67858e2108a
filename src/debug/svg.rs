// src/debug/svg.rs
use crate::error::PartitionResult;
use crate::mesh::{PartitionMesh, Triangle};
use crate::partition::PolygonId;
use crate::reconstruct::Reconstruction;
use geo::{BoundingRect, Coord, LineString, Rect};
use std::io::Write;
use svg::Document;
use svg::Node;
use svg::node::element::path::Data;
use svg::node::element::{Path, Polygon as SvgPolygon, Rectangle, Style};
use tracing::info;

const SVG_PIXEL_SIZE: f64 = 1000.0;

// ===================================================================================
// 1. HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Leinwand mit Stil und Hintergrund; y wird gespiegelt, damit Norden oben liegt.
struct SvgCanvas {
    document: Document,
}

impl SvgCanvas {
    fn new(bounds: Rect<f64>) -> Self {
        let width = bounds.width().max(f64::EPSILON);
        let height = bounds.height().max(f64::EPSILON);
        let min_x = bounds.min().x;
        let min_y = -bounds.max().y;

        // Relative Strichstärken, unabhängig vom Koordinatenbereich
        let stroke_normal = (width + height) / 2.0 * 0.003;
        let stroke_thin = (width + height) / 2.0 * 0.001;

        let style = Style::new(format!(
            r#"
    .background {{ fill: #f0f0f0; }}
    .clean {{ stroke: #555555; stroke-width: {stroke_thin}; fill-opacity: 0.6; }}
    .gap {{ fill: #ff3333; stroke: #aa0000; stroke-width: {stroke_thin}; }}
    .overlap {{ fill: #3333ff; stroke: #0000aa; stroke-width: {stroke_thin}; }}
    .exterior {{ fill: none; stroke: #cccccc; stroke-width: {stroke_thin}; }}
    .polygon {{ stroke: #222222; stroke-width: {stroke_normal}; fill-rule: evenodd; fill-opacity: 0.7; }}
"#
        ));
        let background = Rectangle::new()
            .set("x", min_x)
            .set("y", min_y)
            .set("width", width)
            .set("height", height)
            .set("class", "background");

        let document = Document::new()
            .set("width", SVG_PIXEL_SIZE)
            .set("height", SVG_PIXEL_SIZE)
            .set("viewBox", (min_x, min_y, width, height))
            .add(style)
            .add(background);
        Self { document }
    }

    fn draw_triangle(&mut self, corners: [Coord<f64>; 3], class: &str, fill: Option<String>) {
        let points = corners
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.x, -c.y))
            .collect::<Vec<_>>()
            .join(" ");
        let mut polygon = SvgPolygon::new().set("points", points).set("class", class);
        if let Some(fill) = fill {
            polygon.assign("fill", fill);
        }
        self.document.append(polygon);
    }

    /// Zeichnet ein Polygon mit Löchern als einen Pfad (even-odd).
    fn draw_rings<'a>(&mut self, rings: impl Iterator<Item = &'a LineString<f64>>, fill: String) {
        let mut data = Data::new();
        for ring in rings {
            let mut coords = ring.coords();
            let Some(first) = coords.next() else {
                continue;
            };
            data = data.move_to((first.x, -first.y));
            for c in coords {
                data = data.line_to((c.x, -c.y));
            }
            data = data.close();
        }
        let path = Path::new()
            .set("d", data)
            .set("class", "polygon")
            .set("fill", fill);
        self.document.append(path);
    }

    fn write<W: Write>(self, writer: W) -> PartitionResult<()> {
        svg::write(writer, &self.document)?;
        Ok(())
    }
}

/// Stabile Farbe je Polygon
fn color_of(id: PolygonId) -> String {
    let hue = (id.dataset * 137 + id.polygon * 47) % 360;
    format!("hsl({hue}, 65%, 55%)")
}

fn class_of(triangle: &Triangle) -> &'static str {
    if triangle.exterior {
        "exterior"
    } else {
        match triangle.labels.len() {
            0 => "gap",
            1 => "clean",
            _ => "overlap",
        }
    }
}

fn bounds_of(points: impl Iterator<Item = Coord<f64>>) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for p in points {
        bounds = Some(match bounds {
            None => Rect::new(p, p),
            Some(r) => Rect::new(
                Coord {
                    x: r.min().x.min(p.x),
                    y: r.min().y.min(p.y),
                },
                Coord {
                    x: r.max().x.max(p.x),
                    y: r.max().y.max(p.y),
                },
            ),
        });
    }
    bounds
}

/// Zeichnet die beschriftete Triangulation: saubere Dreiecke in der Farbe ihres
/// Polygons, Lücken rot, Überlappungen blau.
pub fn render_mesh_svg<W: Write>(mesh: &PartitionMesh, writer: W) -> PartitionResult<()> {
    let Some(bounds) = bounds_of(mesh.positions().iter().copied()) else {
        return SvgCanvas::new(Rect::new(Coord::zero(), Coord::zero())).write(writer);
    };
    let mut canvas = SvgCanvas::new(bounds);
    for (id, triangle) in mesh.triangles().iter().enumerate() {
        let fill = triangle.owner().map(color_of);
        canvas.draw_triangle(mesh.corners(id), class_of(triangle), fill);
    }
    canvas.write(writer)?;
    info!("Debug SVG of {} triangles written", mesh.len());
    Ok(())
}

/// Zeichnet alle rekonstruierten Polygone.
pub fn render_reconstruction_svg<W: Write>(
    reconstruction: &Reconstruction,
    writer: W,
) -> PartitionResult<()> {
    let bounds = bounds_of(
        reconstruction
            .polygons()
            .iter()
            .filter_map(|p| p.geometry.bounding_rect())
            .flat_map(|r| [r.min(), r.max()]),
    )
    .unwrap_or_else(|| Rect::new(Coord::zero(), Coord::zero()));

    let mut canvas = SvgCanvas::new(bounds);
    for polygon in reconstruction.polygons() {
        for part in &polygon.geometry {
            let rings = std::iter::once(part.exterior()).chain(part.interiors().iter());
            canvas.draw_rings(rings, color_of(polygon.id));
        }
    }
    canvas.write(writer)?;
    info!(
        "Debug SVG of {} reconstructed polygons written",
        reconstruction.len()
    );
    Ok(())
}
