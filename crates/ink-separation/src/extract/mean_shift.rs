//! Flat-kernel mean-shift with bin seeding.

use std::collections::BTreeSet;

const MAX_ITERATIONS: usize = 300;

type Point = [f32; 3];

fn distance(a: &Point, b: &Point) -> f32 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Mean distance from each point to its k-th nearest neighbour (the
/// point itself counts as the first), `k = max(1, ⌊n·quantile⌋)`.
pub(crate) fn estimate_bandwidth(points: &[Point], quantile: f32) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    let k = ((points.len() as f32 * quantile) as usize).max(1);

    let mut total = 0.0f64;
    let mut dists = Vec::with_capacity(points.len());
    for p in points {
        dists.clear();
        dists.extend(points.iter().map(|q| distance(p, q)));
        let (_, kth, _) = dists.select_nth_unstable_by(k - 1, f32::total_cmp);
        total += f64::from(*kth);
    }
    (total / points.len() as f64) as f32
}

/// Cluster centres of `points`, strongest support first.
///
/// Seeds are the centres of occupied grid cells of size `bandwidth`. Each
/// seed climbs to the mean of the points within `bandwidth` until it moves
/// less than `1e-3 · bandwidth`. Converged modes within `bandwidth` of a
/// stronger mode are discarded.
pub(crate) fn mean_shift(points: &[Point], bandwidth: f32) -> Vec<Point> {
    if points.is_empty() || bandwidth <= 0.0 {
        return Vec::new();
    }

    let cells: BTreeSet<[i64; 3]> = points
        .iter()
        .map(|p| p.map(|c| (c / bandwidth).round() as i64))
        .collect();

    let stop = 1e-3 * bandwidth;
    let mut modes: Vec<(Point, usize)> = Vec::new();
    for cell in cells {
        let mut centre = cell.map(|c| c as f32 * bandwidth);
        for iteration in 0.. {
            let (sum, support) = points
                .iter()
                .filter(|p| distance(p, &centre) <= bandwidth)
                .fold(([0f64; 3], 0usize), |(mut sum, n), p| {
                    for c in 0..3 {
                        sum[c] += f64::from(p[c]);
                    }
                    (sum, n + 1)
                });
            if support == 0 {
                break;
            }
            let next = sum.map(|s| (s / support as f64) as f32);
            let shift = distance(&next, &centre);
            centre = next;
            if shift < stop || iteration + 1 >= MAX_ITERATIONS {
                modes.push((centre, support));
                break;
            }
        }
    }

    modes.sort_by(|a, b| b.1.cmp(&a.1));
    let mut kept: Vec<Point> = Vec::new();
    for (centre, _) in modes {
        if kept.iter().all(|k| distance(k, &centre) >= bandwidth) {
            kept.push(centre);
        }
    }
    kept
}
