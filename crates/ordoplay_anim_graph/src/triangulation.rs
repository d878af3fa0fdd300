// SPDX-License-Identifier: MIT OR Apache-2.0
//! Delaunay triangulation of blend space vertices.
//!
//! Blend spaces hold a handful of vertices, so triangles are found directly:
//! every triple whose circumcircle holds no other vertex is a Delaunay
//! triangle. Cocircular vertices make that ambiguous; candidates are taken in
//! index order and any candidate overlapping an accepted triangle is skipped.

/// Triangle as indices into the input point list
pub type Triangle = [usize; 3];

const EPSILON: f64 = 1e-12;

/// Whether any two points share the same position
pub fn has_duplicates(points: &[[f32; 2]]) -> bool {
    points
        .iter()
        .enumerate()
        .any(|(i, a)| points[i + 1..].iter().any(|b| a == b))
}

/// Delaunay triangulation of a point set without duplicates.
///
/// Fewer than three points, or all points on one line, yield no triangles.
pub fn triangulate(points: &[[f32; 2]]) -> Vec<Triangle> {
    let vertices: Vec<[f64; 2]> = points.iter().map(|p| [f64::from(p[0]), f64::from(p[1])]).collect();
    let n = vertices.len();
    let mut triangles: Vec<Triangle> = Vec::new();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let candidate = [i, j, k];
                if orient(&vertices, candidate).abs() <= EPSILON {
                    continue;
                }
                let empty = (0..n)
                    .filter(|v| !candidate.contains(v))
                    .all(|v| !in_circumcircle(&vertices, candidate, vertices[v]));
                if empty && !triangles.iter().any(|t| overlaps(&vertices, *t, candidate)) {
                    triangles.push(candidate);
                }
            }
        }
    }
    triangles
}

/// Area of a triangle
pub fn area(points: &[[f32; 2]], triangle: Triangle) -> f64 {
    let [a, b, c] = triangle.map(|i| [f64::from(points[i][0]), f64::from(points[i][1])]);
    cross(a, b, c).abs() * 0.5
}

/// Whether a triangle is too small or too thin to blend across.
///
/// Width is the longest edge, height is the altitude onto it.
pub fn is_degenerate(points: &[[f32; 2]], triangle: Triangle, min_area: f64, min_extent: f64) -> bool {
    let area = area(points, triangle);
    if area < min_area {
        return true;
    }
    let [a, b, c] = triangle.map(|i| [f64::from(points[i][0]), f64::from(points[i][1])]);
    let width = distance(a, b).max(distance(b, c)).max(distance(c, a));
    let height = 2.0 * area / width;
    width < min_extent || height < min_extent
}

fn cross(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

fn orient(vertices: &[[f64; 2]], [a, b, c]: Triangle) -> f64 {
    cross(vertices[a], vertices[b], vertices[c])
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

fn in_circumcircle(vertices: &[[f64; 2]], triangle: Triangle, p: [f64; 2]) -> bool {
    let [a, b, c] = triangle.map(|i| vertices[i]);
    let (ax, ay) = (a[0] - p[0], a[1] - p[1]);
    let (bx, by) = (b[0] - p[0], b[1] - p[1]);
    let (cx, cy) = (c[0] - p[0], c[1] - p[1]);
    let det = (ax * ax + ay * ay) * (bx * cy - cx * by) - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    det * orient(vertices, triangle).signum() > EPSILON
}

/// Whether the interiors of two triangles intersect
fn overlaps(vertices: &[[f64; 2]], first: Triangle, second: Triangle) -> bool {
    !separated(vertices, first, second) && !separated(vertices, second, first)
}

/// Whether an edge of `by` has all of `other` on its outer side
fn separated(vertices: &[[f64; 2]], by: Triangle, other: Triangle) -> bool {
    let side = orient(vertices, by).signum();
    (0..3).any(|e| {
        let a = vertices[by[e]];
        let b = vertices[by[(e + 1) % 3]];
        other.iter().all(|v| cross(a, b, vertices[*v]) * side <= EPSILON)
    })
}
