use super::{Matrix3, Point3, Vector3, TOLERANCE};

/// Fits a least-squares plane through `points` and returns its unit normal.
///
/// The normal is the eigenvector of the point covariance with the smallest
/// eigenvalue. Returns `None` for fewer than three points or when the points
/// are (nearly) collinear, since no unique plane exists then.
#[must_use]
pub fn fit_plane_normal(points: &[Point3]) -> Option<Vector3> {
    if points.len() < 3 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / count;

    let mut covariance = Matrix3::zeros();
    for p in points {
        let d = p.coords - centroid;
        covariance += d * d.transpose();
    }

    let eigen = covariance.symmetric_eigen();
    let mut order = [0_usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Collinear input: two vanishing eigenvalues.
    let scale = eigen.eigenvalues[order[2]].abs().max(1.0);
    if eigen.eigenvalues[order[1]].abs() < TOLERANCE * scale {
        return None;
    }

    let normal: Vector3 = eigen.eigenvectors.column(order[0]).into_owned();
    normal.try_normalize(TOLERANCE)
}
