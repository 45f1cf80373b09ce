//! Static placement table for the hexagon copies and the per-frame rotation
//! rule.
//!
//! One large animated hero hexagon plus smaller background copies. The table
//! is declarative: nothing mutates a descriptor after construction. The only
//! derived value is the spin angle, recomputed from absolute elapsed time
//! every frame so dropped frames can never accumulate drift.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct HexInstance {
    pub position: [f32; 3],
    /// Base orientation, radians, applied before the animated spin.
    pub rotation: [f32; 3],
    pub scale: f32,
    pub opacity: f32,
    pub animated: bool,
    /// Spin around the local y axis, radians per second.
    pub rotation_speed: f32,
    /// Per-instance overrides of the shared ring mask.
    pub ring_thickness: f32,
    pub distortion: f32,
}

/// Hand-authored layout: the hero ring front and center, the rest scattered
/// behind the copy at lower opacity.
pub const PLACEMENTS: [HexInstance; 5] = [
    HexInstance {
        position: [0.0, 0.0, 0.0],
        rotation: [FRAC_PI_2, 0.0, 0.0],
        scale: 1.0,
        opacity: 0.5,
        animated: true,
        rotation_speed: 0.2,
        ring_thickness: 0.05,
        distortion: 0.5,
    },
    HexInstance {
        position: [-6.5, 3.2, -5.0],
        rotation: [FRAC_PI_2, 0.0, 0.4],
        scale: 0.35,
        opacity: 0.28,
        animated: true,
        rotation_speed: 0.05,
        ring_thickness: 0.08,
        distortion: 0.35,
    },
    HexInstance {
        position: [5.5, -3.0, -6.0],
        rotation: [FRAC_PI_2, 0.0, 0.9],
        scale: 0.5,
        opacity: 0.22,
        animated: false,
        rotation_speed: 0.0,
        ring_thickness: 0.06,
        distortion: 0.4,
    },
    HexInstance {
        position: [7.0, 3.8, -8.0],
        rotation: [FRAC_PI_2, 0.0, 1.7],
        scale: 0.25,
        opacity: 0.18,
        animated: true,
        rotation_speed: 0.08,
        ring_thickness: 0.1,
        distortion: 0.3,
    },
    HexInstance {
        position: [-5.0, -4.2, -7.0],
        rotation: [FRAC_PI_2, 0.0, 2.3],
        scale: 0.3,
        opacity: 0.2,
        animated: true,
        rotation_speed: 0.03,
        ring_thickness: 0.07,
        distortion: 0.45,
    },
];

impl HexInstance {
    /// Spin angle at absolute elapsed time `elapsed` seconds. Recomputed,
    /// never accumulated.
    pub fn spin_angle(&self, elapsed: f32) -> f32 {
        if self.animated {
            elapsed * self.rotation_speed
        } else {
            0.0
        }
    }

    /// Model matrix at `elapsed` seconds since overlay mount.
    pub fn model_matrix(&self, elapsed: f32) -> Mat4 {
        let base = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
        );
        let spin = Quat::from_rotation_y(self.spin_angle(elapsed));
        Mat4::from_translation(Vec3::from_array(self.position))
            * Mat4::from_quat(base * spin)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_hero_and_background_copies() {
        assert!(PLACEMENTS.len() > 1);
        let hero = &PLACEMENTS[0];
        assert!(hero.animated);
        assert_eq!(hero.scale, 1.0);
        for inst in &PLACEMENTS {
            assert!(inst.scale > 0.0);
            assert!((0.0..=1.0).contains(&inst.opacity));
        }
        assert!(PLACEMENTS.iter().any(|i| !i.animated));
    }

    #[test]
    fn spin_angle_is_absolute_not_accumulated() {
        let hero = &PLACEMENTS[0];
        // The same elapsed time yields the same angle no matter how many
        // frames (or frame drops) happened in between.
        let direct = hero.spin_angle(10.0);
        let mut resampled = 0.0;
        for elapsed in [0.5, 3.0, 9.99, 10.0] {
            resampled = hero.spin_angle(elapsed);
        }
        assert_eq!(direct, resampled);
        assert!((direct - 10.0 * hero.rotation_speed).abs() < 1e-6);
    }

    #[test]
    fn static_instances_never_spin() {
        let fixed = PLACEMENTS.iter().find(|i| !i.animated).unwrap();
        assert_eq!(fixed.spin_angle(123.0), 0.0);
        let a = fixed.model_matrix(0.0);
        let b = fixed.model_matrix(60.0);
        assert_eq!(a, b);
    }

    #[test]
    fn model_matrix_places_the_instance() {
        let inst = &PLACEMENTS[1];
        let m = inst.model_matrix(0.0);
        let origin = m.transform_point3(glam::Vec3::ZERO);
        let expected = Vec3::from_array(inst.position);
        assert!((origin - expected).length() < 1e-5);
    }
}
