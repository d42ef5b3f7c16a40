//! GPU-compatible volume uniforms.

use glam::Mat4;

use crate::volume::DataVolume;

/// Per-volume data a renderer needs to draw the backing box and the points.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VolumeUniforms {
    /// Unit cube to world.
    pub volume: [[f32; 4]; 4],
    /// Adjusted domain to world.
    pub adjusted_domain: [[f32; 4]; 4],
    /// Size of the fitted domain inside the volume.
    pub adjusted_dimensions: [f32; 3],
    /// 1.0 while custom bounds place the datasets, 0.0 otherwise.
    pub use_custom_bounds: f32,
}

impl From<&DataVolume> for VolumeUniforms {
    fn from(volume: &DataVolume) -> Self {
        Self {
            volume: volume.volume_transform().to_cols_array_2d(),
            adjusted_domain: volume.adjusted_domain_to_volume_transform().to_cols_array_2d(),
            adjusted_dimensions: volume.adjusted_dimensions().as_vec3().to_array(),
            use_custom_bounds: if volume.is_using_custom_bounds() {
                1.0
            } else {
                0.0
            },
        }
    }
}

impl Default for VolumeUniforms {
    fn default() -> Self {
        Self {
            volume: Mat4::IDENTITY.to_cols_array_2d(),
            adjusted_domain: Mat4::IDENTITY.to_cols_array_2d(),
            adjusted_dimensions: [0.0; 3],
            use_custom_bounds: 0.0,
        }
    }
}
