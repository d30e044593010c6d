use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Instant;

/// Fixed pre-sampling resolution for the tangent/binormal table, independent
/// of segment count.
pub const DEFAULT_FRAME_SAMPLES: usize = 100;

const DEGENERATE_EPSILON: f32 = 1e-10;

/// Partial per-axis rotation override applied to a segment's own spin group,
/// independent of its position on the curve. Unset axes stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSpin {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisSpin {
    pub const NONE: AxisSpin = AxisSpin { x: None, y: None, z: None };

    /// Baseline orientation for tube-riding segments when a curve supplies no
    /// override of its own. Kept as a documented default, not inferred.
    pub const TUBE_DEFAULT: AxisSpin = AxisSpin { x: Some(-FRAC_PI_2), y: None, z: None };

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

/// Parametric space curve over phase t in [0,1), 0 and 1 identified.
pub type PointFn = fn(f32) -> Vec3;
/// Per-phase spin override for chain segments.
pub type SpinFn = fn(f32) -> AxisSpin;

fn tube_default_spin(_t: f32) -> AxisSpin {
    AxisSpin::TUBE_DEFAULT
}

/// A closed curve ridden by a chain of phase-offset segments.
#[derive(Clone)]
pub struct ChainCurve {
    pub name: &'static str,
    pub segment_count: usize,
    pub loop_duration: f32,
    pub point: PointFn,
    pub spin: SpinFn,
    pub origin_offset: Vec3,
    pub scale: f32,
}

impl ChainCurve {
    pub fn new(name: &'static str, segment_count: usize, loop_duration: f32, point: PointFn) -> Self {
        Self {
            name,
            segment_count: segment_count.max(1),
            loop_duration: loop_duration.max(f32::EPSILON),
            point,
            spin: tube_default_spin,
            origin_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn with_spin(mut self, spin: SpinFn) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_origin_offset(mut self, offset: Vec3) -> Self {
        self.origin_offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn point_world(&self, t: f32) -> Vec3 {
        (self.point)(t) * self.scale + self.origin_offset
    }
}

/// A single model spun in place; no curve sampling happens for this variant.
#[derive(Debug, Clone, Copy)]
pub struct SingleModel {
    pub name: &'static str,
    pub scale: f32,
}

/// Selectable animation entry: a segment chain on a closed curve, or one
/// static model with user-driven spin. Explicit discriminant, no truthy flag.
#[derive(Clone)]
pub enum CurveDef {
    Chain(ChainCurve),
    Single(SingleModel),
}

impl CurveDef {
    pub fn name(&self) -> &'static str {
        match self {
            CurveDef::Chain(chain) => chain.name,
            CurveDef::Single(single) => single.name,
        }
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, CurveDef::Chain(_))
    }
}

fn fruits_knot(t: f32) -> Vec3 {
    let t = t * TAU;
    let x = (2.0 + (3.0 * t).cos()) * (2.0 * t).cos();
    let y = (2.0 + (3.0 * t).cos()) * (2.0 * t).sin();
    let z = (3.0 * t).sin() * 2.0;
    Vec3::new(x, y, z) * 60.0
}

fn halo_ring(t: f32) -> Vec3 {
    let t = t * TAU;
    Vec3::new(t.cos() * 150.0, t.sin() * 150.0, (4.0 * t).sin() * 30.0)
}

fn cloverleaf(t: f32) -> Vec3 {
    let t = t * TAU;
    let x = (3.0 + (5.0 * t).cos()) * (2.0 * t).cos();
    let y = (3.0 + (5.0 * t).cos()) * (2.0 * t).sin();
    let z = (5.0 * t).sin();
    Vec3::new(x, y, z) * 45.0
}

fn rolling_spin(t: f32) -> AxisSpin {
    AxisSpin { x: Some(-FRAC_PI_2), y: None, z: Some(t * TAU) }
}

/// The installation's curve catalog, in selection order.
pub fn builtin_curves() -> Vec<CurveDef> {
    vec![
        CurveDef::Chain(ChainCurve::new("fruits", 75, 12.5, fruits_knot)),
        CurveDef::Chain(ChainCurve::new("halo", 40, 8.0, halo_ring)),
        CurveDef::Chain(ChainCurve::new("cloverleaf", 60, 10.0, cloverleaf).with_spin(rolling_spin)),
        CurveDef::Single(SingleModel { name: "pedestal", scale: 1.0 }),
    ]
}

/// Unnormalized curve derivative at phase `t` by central finite difference.
/// May be degenerate (near-zero); callers must check before normalizing.
pub fn tangent_of(point: PointFn, t: f32) -> Vec3 {
    const H: f32 = 5.0e-4;
    point((t + H).rem_euclid(1.0)) - point((t - H).rem_euclid(1.0))
}

/// Pre-sampled tangent/binormal frames over one closed loop, with the total
/// polyline length. Binormals are parallel-transported sample to sample, then
/// untwisted so the frame closes on itself at the 0/1 seam.
pub struct FrameTable {
    tangents: Vec<Vec3>,
    binormals: Vec<Vec3>,
    total_length: f32,
    built_at: Instant,
}

impl FrameTable {
    pub fn build(point: PointFn, samples: usize) -> Self {
        let samples = samples.max(2);
        let points: Vec<Vec3> =
            (0..samples).map(|k| point(k as f32 / samples as f32)).collect();

        let mut total_length = 0.0;
        for k in 0..samples {
            total_length += points[k].distance(points[(k + 1) % samples]);
        }

        let mut tangents = Vec::with_capacity(samples);
        for k in 0..samples {
            let ahead = points[(k + 1) % samples];
            let behind = points[(k + samples - 1) % samples];
            let raw = ahead - behind;
            if raw.length_squared() > DEGENERATE_EPSILON {
                tangents.push(raw.normalize());
            } else {
                // Degenerate sample: reuse the neighbouring tangent.
                tangents.push(tangents.last().copied().unwrap_or(Vec3::Z));
            }
        }

        let mut normal = initial_normal(tangents[0]);
        let mut normals = Vec::with_capacity(samples);
        normals.push(normal);
        for k in 1..samples {
            let axis = tangents[k - 1].cross(tangents[k]);
            if axis.length_squared() > DEGENERATE_EPSILON {
                let angle = tangents[k - 1].dot(tangents[k]).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), angle) * normal;
            }
            normals.push(normal);
        }

        // Distribute the residual twist so the transported frame matches
        // itself across the seam.
        let wrapped = {
            let axis = tangents[samples - 1].cross(tangents[0]);
            if axis.length_squared() > DEGENERATE_EPSILON {
                let angle = tangents[samples - 1].dot(tangents[0]).clamp(-1.0, 1.0).acos();
                Quat::from_axis_angle(axis.normalize(), angle) * normal
            } else {
                normal
            }
        };
        let mut twist = wrapped.dot(normals[0]).clamp(-1.0, 1.0).acos();
        if wrapped.cross(normals[0]).dot(tangents[0]) < 0.0 {
            twist = -twist;
        }
        for (k, n) in normals.iter_mut().enumerate() {
            let correction = twist * k as f32 / samples as f32;
            *n = Quat::from_axis_angle(tangents[k], correction) * *n;
        }

        let binormals: Vec<Vec3> =
            tangents.iter().zip(normals.iter()).map(|(t, n)| t.cross(*n)).collect();

        Self { tangents, binormals, total_length, built_at: Instant::now() }
    }

    /// Nearest-two-sample blend on the fractional sample index, wrapping at
    /// the 0/1 seam (the curve is always closed).
    pub fn binormal_at(&self, t: f32) -> Vec3 {
        let table = &self.binormals;
        let n = table.len();
        let pickt = t.rem_euclid(1.0) * n as f32;
        let pick = (pickt.floor() as usize).min(n - 1);
        let next = (pick + 1) % n;
        table[pick].lerp(table[next], pickt - pick as f32)
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn built_at(&self) -> Instant {
        self.built_at
    }

    pub fn sample_count(&self) -> usize {
        self.tangents.len()
    }
}

fn initial_normal(tangent: Vec3) -> Vec3 {
    // Seed the transport with the axis the tangent leans on least.
    let abs = tangent.abs();
    let min = abs.x.min(abs.y).min(abs.z);
    let axis = if min == abs.x {
        Vec3::X
    } else if min == abs.y {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let vec = tangent.cross(axis).normalize();
    tangent.cross(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_circle(t: f32) -> Vec3 {
        let t = t * TAU;
        Vec3::new(t.cos(), t.sin(), 0.0)
    }

    #[test]
    fn circle_length_matches_circumference() {
        let table = FrameTable::build(unit_circle, DEFAULT_FRAME_SAMPLES);
        assert!(
            (table.total_length() - TAU).abs() < 0.01,
            "polyline length {} should approximate 2*pi",
            table.total_length()
        );
    }

    #[test]
    fn blend_wraps_cleanly_at_the_seam() {
        let table = FrameTable::build(unit_circle, DEFAULT_FRAME_SAMPLES);
        let before = table.binormal_at(0.999);
        let after = table.binormal_at(0.001);
        assert!(
            before.distance(after) < 0.2,
            "seam blend jumped: {:?} vs {:?}",
            before,
            after
        );
        // Out-of-domain phases reduce into [0,1).
        assert!(table.binormal_at(1.25).distance(table.binormal_at(0.25)) < 1e-5);
    }

    #[test]
    fn transported_binormals_stay_orthogonal_to_the_curve_direction() {
        let table = FrameTable::build(fruits_knot, DEFAULT_FRAME_SAMPLES);
        for k in 0..table.sample_count() {
            let t = k as f32 / table.sample_count() as f32;
            let direction = tangent_of(fruits_knot, t).normalize();
            let dot = direction.dot(table.binormal_at(t)).abs();
            assert!(dot < 0.05, "binormal not orthogonal at sample {k}: dot {dot}");
        }
    }

    #[test]
    fn default_spin_is_the_documented_baseline() {
        let chain = ChainCurve::new("probe", 4, 1.0, unit_circle);
        assert_eq!((chain.spin)(0.37), AxisSpin::TUBE_DEFAULT);
    }

    #[test]
    fn catalog_entries_are_well_formed() {
        for def in builtin_curves() {
            if let CurveDef::Chain(chain) = def {
                assert!(chain.segment_count >= 1);
                assert!(chain.loop_duration > 0.0);
                let table = FrameTable::build(chain.point, DEFAULT_FRAME_SAMPLES);
                assert!(table.total_length() > 0.0, "curve {} has zero length", chain.name);
            }
        }
    }
}
