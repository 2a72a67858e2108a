// src/utils.rs

/// Numerische Konstanten
pub mod constants {
    /// Absolute Toleranz für Flächen- und Längenvergleiche
    pub const EPSILON_F64: f64 = 1e-10;
    /// Relative Toleranz, unter der zwei Grenzlängen als gleich lang gelten
    pub const LENGTH_TIE_TOLERANCE: f64 = 1e-9;
}

/// Planare Hilfsfunktionen auf `geo::Coord<f64>`
pub mod planar {
    use geo::Coord;
    use geo::kernels::{Kernel, Orientation, RobustKernel};

    /// Doppelte vorzeichenbehaftete Fläche des Dreiecks (positiv für CCW).
    pub fn signed_area_doubled(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
    }

    pub fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
        0.5 * signed_area_doubled(a, b, c).abs()
    }

    /// Schwerpunkt des Dreiecks; liegt immer strikt im Inneren.
    pub fn centroid(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (a.x + b.x + c.x) / 3.0,
            y: (a.y + b.y + c.y) / 3.0,
        }
    }

    pub fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (a.x + b.x) * 0.5,
            y: (a.y + b.y) * 0.5,
        }
    }

    pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
        (b.x - a.x).hypot(b.y - a.y)
    }

    /// Kürzester Abstand von `p` zur Strecke `a`–`b`.
    pub fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return distance(p, a);
        }
        let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        distance(p, Coord { x: a.x + t * dx, y: a.y + t * dy })
    }

    /// Exakte Orientierung dreier Punkte.
    pub fn orientation(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Orientation {
        <RobustKernel as Kernel<f64>>::orient2d(a, b, c)
    }

    /// Vorzeichenbehaftete Fläche eines offenen Rings (Shoelace).
    pub fn ring_signed_area(ring: &[Coord<f64>]) -> f64 {
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = ring[i];
            let p2 = ring[(i + 1) % n];
            sum += p1.x * p2.y - p2.x * p1.y;
        }
        0.5 * sum
    }

}
