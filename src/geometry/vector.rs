use nalgebra::Vector3;

/// Angle between two vectors in degrees, within [0, 180].
///
/// A zero-length or non-finite input yields 0 rather than NaN.
pub fn vector_angle_deg(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let norms = v1.norm() * v2.norm();
    if norms <= 0.0 || !norms.is_finite() {
        return 0.0;
    }
    let cos_angle = v1.dot(v2) / norms;
    if !cos_angle.is_finite() {
        return 0.0;
    }
    cos_angle.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Distance and displacement from `from` to `to`, in the units of the inputs.
pub fn slant_range(from: &Vector3<f64>, to: &Vector3<f64>) -> (f64, Vector3<f64>) {
    let displacement = to - from;
    (displacement.norm(), displacement)
}
