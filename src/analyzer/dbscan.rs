//! Density-based clustering over a precomputed distance matrix

/// Label per point: `Some(cluster)` or `None` for noise
pub type Labels = Vec<Option<usize>>;

/// Runs DBSCAN over `distances`
///
/// A point is a core point when at least `min_samples` points (itself
/// included) lie within `eps` of it (`distance <= eps`). Clusters grow from
/// core points in index order; points reachable from a core point but not
/// core themselves join the first cluster that reaches them. Everything else
/// is noise. Cluster numbers follow discovery order.
///
/// ```
/// use docsift::analyzer::dbscan;
///
/// let distances = vec![
///     vec![0.0, 0.1, 0.9],
///     vec![0.1, 0.0, 0.9],
///     vec![0.9, 0.9, 0.0],
/// ];
/// assert_eq!(dbscan(&distances, 0.5, 2), vec![Some(0), Some(0), None]);
/// ```
pub fn dbscan(distances: &[Vec<f64>], eps: f64, min_samples: usize) -> Labels {
    let n = distances.len();

    let neighborhoods: Vec<Vec<usize>> = distances
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &d)| d <= eps)
                .map(|(j, _)| j)
                .collect()
        })
        .collect();
    let is_core: Vec<bool> = neighborhoods.iter().map(|nb| nb.len() >= min_samples).collect();

    let mut labels: Labels = vec![None; n];
    let mut next_label = 0;

    for start in 0..n {
        if labels[start].is_some() || !is_core[start] {
            continue;
        }

        let mut stack = vec![start];
        while let Some(point) = stack.pop() {
            if labels[point].is_some() {
                continue;
            }
            labels[point] = Some(next_label);

            if is_core[point] {
                stack.extend(
                    neighborhoods[point]
                        .iter()
                        .copied()
                        .filter(|&neighbor| labels[neighbor].is_none()),
                );
            }
        }

        next_label += 1;
    }

    labels
}
