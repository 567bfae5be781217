/// Thin a series to at most `target_points` by averaging consecutive chunks.
///
/// Keeps the shape of dense days readable without drawing every marker.
pub fn downsample(points: &[(f64, f64)], target_points: usize) -> Vec<(f64, f64)> {
    if target_points == 0 || points.len() <= target_points {
        return points.to_vec();
    }

    let window_size = (points.len() as f64 / target_points as f64).ceil() as usize;
    let mut aggregated = Vec::with_capacity(target_points);

    for chunk in points.chunks(window_size) {
        let n = chunk.len() as f64;
        let mean_x = chunk.iter().map(|(x, _)| *x).sum::<f64>() / n;
        let mean_y = chunk.iter().map(|(_, y)| *y).sum::<f64>() / n;
        aggregated.push((mean_x, mean_y));
    }

    aggregated
}
