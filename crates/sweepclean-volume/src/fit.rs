//! Aspect-preserving fit of a raw domain into a volume.

use glam::DVec3;

/// Result of fitting a raw domain box into a volume box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainFit {
    /// Size of the domain after fitting, in volume units.
    pub adjusted_dimensions: DVec3,
    /// Per-axis factor mapping raw extents to adjusted extents.
    pub scaling_factors: DVec3,
}

/// Fits a raw domain of size `raw` into a volume of size `volume`.
///
/// X and Y share one scale so the domain's X:Y aspect ratio survives: when the
/// volume is wider than the data, Y fills the volume and X follows; otherwise X
/// fills it and Y follows. Z always fills the volume on its own.
///
/// An axis with zero extent (single point, or nothing loaded yet) gets a scale
/// of 1 instead of a division by zero.
#[must_use]
pub fn fit_domain(raw: DVec3, volume: DVec3) -> DomainFit {
    let has_x = raw.x > 0.0;
    let has_y = raw.y > 0.0;

    let (adjusted_x, adjusted_y) = match (has_x, has_y) {
        (true, true) => {
            let domain_aspect = raw.x / raw.y;
            let volume_aspect = volume.x / volume.y;
            if volume_aspect > domain_aspect {
                (raw.x * (volume.y / raw.y), volume.y)
            } else {
                (volume.x, raw.y * (volume.x / raw.x))
            }
        }
        (true, false) => (volume.x, 0.0),
        (false, true) => (0.0, volume.y),
        (false, false) => (0.0, 0.0),
    };
    let adjusted_z = if raw.z > 0.0 { volume.z } else { 0.0 };

    let adjusted_dimensions = DVec3::new(adjusted_x, adjusted_y, adjusted_z);
    let scaling_factors = DVec3::new(
        axis_scale(adjusted_x, raw.x),
        axis_scale(adjusted_y, raw.y),
        axis_scale(adjusted_z, raw.z),
    );

    DomainFit {
        adjusted_dimensions,
        scaling_factors,
    }
}

fn axis_scale(adjusted: f64, raw: f64) -> f64 {
    if raw > 0.0 {
        adjusted / raw
    } else {
        1.0
    }
}
