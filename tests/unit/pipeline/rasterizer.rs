use std::collections::HashSet;

use glam::{Vec2, Vec4};

use super::*;

fn ndc(x: f32, y: f32, z: f32) -> Vertex {
    Vertex {
        position: Vec4::new(x, y, z, 1.0),
        ..Vertex::default()
    }
}

fn setup(w: u32, h: u32) -> (Rasterizer, DepthBuffer) {
    let viewport = Viewport::new(w, h).unwrap();
    (
        Rasterizer::new(viewport),
        DepthBuffer::new(viewport.pixel_count()),
    )
}

fn pixels(frags: &[Fragment]) -> HashSet<(i32, i32)> {
    frags.iter().map(|f| (f.x, f.y)).collect()
}

#[test]
fn bresenham_horizontal_is_inclusive() {
    let mut seen = Vec::new();
    bresenham((0, 0), (10, 0), |x, y| seen.push((x, y)));
    assert_eq!(seen, (0..=10).map(|x| (x, 0)).collect::<Vec<_>>());
}

#[test]
fn bresenham_steep_and_reversed() {
    let mut seen = Vec::new();
    bresenham((3, 7), (0, 0), |x, y| seen.push((x, y)));
    assert_eq!(seen.len(), 8);
    assert_eq!(seen.first(), Some(&(3, 7)));
    assert_eq!(seen.last(), Some(&(0, 0)));
    for pair in seen.windows(2) {
        assert_eq!(pair[0].1 - pair[1].1, 1);
    }
}

#[test]
fn line_of_eleven_pixels_yields_eleven_fragments() {
    let (r, depth) = setup(20, 20);
    let mut out = Vec::new();
    r.line(&depth, &mut out, &ndc(-1.0, 1.0, 0.5), &ndc(0.0, 1.0, 0.5));
    assert_eq!(out.len(), 11);
    let xs: Vec<i32> = out.iter().map(|f| f.x).collect();
    assert_eq!(xs, (0..=10).collect::<Vec<_>>());
    assert!(out.iter().all(|f| f.y == 0 && f.depth == 0.5));
}

#[test]
fn offscreen_line_is_clipped_but_interpolates_on_the_full_segment() {
    let (r, depth) = setup(20, 20);
    let mut a = ndc(-3.0, 0.0, 0.5);
    let mut b = ndc(3.0, 0.0, 0.5);
    a.uv = Vec2::ZERO;
    b.uv = Vec2::X;
    let mut out = Vec::new();
    r.line(&depth, &mut out, &a, &b);

    assert_eq!(out.len(), 20);
    assert!(out.iter().all(|f| f.y == 10));
    let first = out.iter().find(|f| f.x == 0).unwrap();
    assert!((first.vertex.uv.x - 1.0 / 3.0).abs() < 1e-5);
}

#[test]
fn fully_offscreen_line_emits_nothing() {
    let (r, depth) = setup(8, 8);
    let mut out = Vec::new();
    r.line(&depth, &mut out, &ndc(-3.0, 3.0, 0.5), &ndc(-2.0, 3.0, 0.5));
    assert!(out.is_empty());
}

#[test]
fn screen_map_rounds_and_clamps() {
    let (r, _) = setup(8, 8);
    let f = r.screen_map(&ndc(-1.0, 1.0, 0.0));
    assert_eq!((f.x, f.y), (0, 0));
    let f = r.screen_map(&ndc(1.0, -1.0, 0.0));
    assert_eq!((f.x, f.y), (7, 7));
    let f = r.screen_map(&ndc(0.0, 0.0, 0.0));
    assert_eq!((f.x, f.y), (4, 4));
}

#[test]
fn flat_top_triangle_fills_upper_right_half() {
    let (r, depth) = setup(8, 8);
    let mut out = Vec::new();
    r.triangle(
        &depth,
        &mut out,
        &ndc(-1.0, 1.0, 0.0),
        &ndc(1.0, 1.0, 0.0),
        &ndc(1.0, -1.0, 0.0),
    );
    let expected: HashSet<(i32, i32)> = (0..8)
        .flat_map(|y| (y..8).map(move |x| (x, y)))
        .collect();
    assert_eq!(out.len(), expected.len());
    assert_eq!(pixels(&out), expected);
}

#[test]
fn depth_test_rejects_equal_or_farther_fragments() {
    let (r, depth) = setup(8, 8);
    let tri = [ndc(-1.0, 1.0, 0.5), ndc(1.0, 1.0, 0.5), ndc(1.0, -1.0, 0.5)];
    let mut first = Vec::new();
    r.triangle(&depth, &mut first, &tri[0], &tri[1], &tri[2]);
    assert!(!first.is_empty());

    let mut second = Vec::new();
    r.triangle(&depth, &mut second, &tri[0], &tri[1], &tri[2]);
    assert!(second.is_empty());

    for f in &first {
        assert!(depth.holds(r.viewport().pixel_index(f.x, f.y), f.depth));
    }
}

#[test]
fn general_triangle_is_split_without_gaps_or_duplicates() {
    let (r, depth) = setup(16, 16);
    // Screen (2,0), (14,6), (4,14) after mapping.
    let a = ndc(-0.75, 1.0, 0.2);
    let b = ndc(0.75, 0.25, 0.4);
    let c = ndc(-0.5, -0.75, 0.6);
    let mut out = Vec::new();
    r.triangle(&depth, &mut out, &a, &b, &c);

    let set = pixels(&out);
    assert_eq!(set.len(), out.len());
    for v in [&a, &b, &c] {
        let f = r.screen_map(v);
        assert!(set.contains(&(f.x, f.y)), "missing vertex pixel {:?}", (f.x, f.y));
    }
    // Every covered row is one contiguous run.
    for y in 0..16 {
        let mut xs: Vec<i32> = set.iter().filter(|p| p.1 == y).map(|p| p.0).collect();
        xs.sort_unstable();
        for pair in xs.windows(2) {
            assert_eq!(pair[1] - pair[0], 1, "gap on row {y}");
        }
    }
    assert!(out.iter().all(|f| (0.199..=0.601).contains(&f.depth)));
}

#[test]
fn degenerate_horizontal_triangle_covers_its_span() {
    let (r, depth) = setup(8, 8);
    let mut out = Vec::new();
    r.triangle(
        &depth,
        &mut out,
        &ndc(-1.0, 0.0, 0.5),
        &ndc(0.0, 0.0, 0.5),
        &ndc(0.75, 0.0, 0.5),
    );
    let xs: Vec<i32> = out.iter().map(|f| f.x).collect();
    assert_eq!(xs, (0..=7).collect::<Vec<_>>());
}
