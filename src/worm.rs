use crate::curve::{self, ChainCurve, FrameTable, DEFAULT_FRAME_SAMPLES};
use glam::{Mat3, Quat, Vec3};
use std::time::Instant;

const DEGENERATE_EPSILON: f32 = 1e-10;

/// Per-tick, per-segment output consumed by the renderer. Recomputed every
/// tick; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFrame {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for SegmentFrame {
    fn default() -> Self {
        Self { position: Vec3::ZERO, orientation: Quat::IDENTITY }
    }
}

/// Empirically tuned constants for the tube illusion. The lateral offset and
/// look-ahead arclength were dialled in against the original curve scale;
/// they are configuration, not derived.
#[derive(Debug, Clone, Copy)]
pub struct WormConstants {
    pub lateral_offset: f32,
    pub lookahead_arclength: f32,
    pub frame_samples: usize,
}

impl Default for WormConstants {
    fn default() -> Self {
        Self { lateral_offset: 15.0, lookahead_arclength: 30.0, frame_samples: DEFAULT_FRAME_SAMPLES }
    }
}

/// Animates a chain of rigid segments riding a closed parametric curve like
/// beads on a loop: evenly phase-offset, tangent-facing, laterally offset
/// along the moving frame's normal so the chain reads as a tube surface.
///
/// The segment frame buffer is engine-private scratch; callers only ever see
/// it as a shared slice valid until the next `advance`.
pub struct WormAnimator {
    chain: ChainCurve,
    table: FrameTable,
    constants: WormConstants,
    frames: Vec<SegmentFrame>,
}

impl WormAnimator {
    pub fn new(chain: ChainCurve, constants: WormConstants) -> Self {
        let table = FrameTable::build(chain.point, constants.frame_samples);
        let frames = vec![SegmentFrame::default(); chain.segment_count];
        Self { chain, table, constants, frames }
    }

    /// Swaps the curve definition atomically: the frame table is rebuilt here,
    /// before any tick can read it, so a stale table is never consulted.
    pub fn set_curve(&mut self, chain: ChainCurve) {
        self.table = FrameTable::build(chain.point, self.constants.frame_samples);
        self.frames.resize(chain.segment_count, SegmentFrame::default());
        self.chain = chain;
    }

    pub fn chain(&self) -> &ChainCurve {
        &self.chain
    }

    pub fn table_built_at(&self) -> Instant {
        self.table.built_at()
    }

    /// Phase of segment `index` at `elapsed` seconds into playback: the base
    /// loop phase plus an even `index / segment_count` offset, wrapped to [0,1).
    pub fn segment_phase(&self, elapsed: f32, index: usize) -> f32 {
        let base = elapsed.rem_euclid(self.chain.loop_duration) / self.chain.loop_duration;
        (base + index as f32 / self.chain.segment_count as f32).rem_euclid(1.0)
    }

    pub fn segment_count(&self) -> usize {
        self.chain.segment_count
    }

    /// Recomputes every segment's position and orientation for this tick.
    /// Degenerate spots on the curve freeze that segment's orientation at the
    /// previous tick's value instead of failing; the animation degrades
    /// visually, never fatally.
    pub fn advance(&mut self, elapsed: f32) -> &[SegmentFrame] {
        let lookahead_step =
            self.constants.lookahead_arclength / self.table.total_length().max(f32::EPSILON);

        for i in 0..self.chain.segment_count {
            let t = self.segment_phase(elapsed, i);

            let spin = ((self.chain.spin)(t)).to_quat();
            let mut position = self.chain.point_world(t);

            let tangent_raw = curve::tangent_of(self.chain.point, t);
            if tangent_raw.length_squared() <= DEGENERATE_EPSILON {
                self.frames[i].position = position;
                continue;
            }
            let direction = tangent_raw.normalize();
            let binormal = self.table.binormal_at(t);
            let normal = binormal.cross(direction);
            position += normal * self.constants.lateral_offset;

            // Look-ahead by arclength keeps the facing stable at speed changes.
            let ahead = (t + lookahead_step).rem_euclid(1.0);
            let target = self.chain.point_world(ahead);

            let orientation = match look_at(position, target, normal) {
                Some(look) => spin * look,
                None => self.frames[i].orientation,
            };
            self.frames[i] = SegmentFrame { position, orientation };
        }
        &self.frames
    }

    pub fn frames(&self) -> &[SegmentFrame] {
        &self.frames
    }
}

/// Object-space look-at basis: +z from target back to eye, `up` as the
/// up-reference. `None` when the basis degenerates (coincident points or
/// up parallel to the view direction).
fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let forward = eye - target;
    if forward.length_squared() <= DEGENERATE_EPSILON {
        return None;
    }
    let z = forward.normalize();
    let x = up.cross(z);
    if x.length_squared() <= DEGENERATE_EPSILON {
        return None;
    }
    let x = x.normalize();
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::TAU;

    fn circle(t: f32) -> Vec3 {
        let t = t * TAU;
        Vec3::new(t.cos() * 100.0, t.sin() * 100.0, 0.0)
    }

    #[test]
    fn look_at_produces_a_unit_quaternion() {
        let q = look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y).expect("valid basis");
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn look_at_rejects_degenerate_bases() {
        assert!(look_at(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none(), "coincident points");
        assert!(look_at(Vec3::X, Vec3::ZERO, Vec3::X).is_none(), "up parallel to view");
    }

    #[test]
    fn advance_fills_every_segment_with_finite_frames() {
        let chain = ChainCurve::new("circle", 12, 4.0, circle);
        let mut animator = WormAnimator::new(chain, WormConstants::default());
        let frames = animator.advance(1.7);
        assert_eq!(frames.len(), 12);
        for frame in frames {
            assert!(frame.position.is_finite());
            assert!(frame.orientation.is_finite());
        }
    }
}
