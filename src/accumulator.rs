//! Truncating running mean.
//!
//! Each fold replaces every pixel with
//! `(frame[i] + count * mean[i]) / (count + 1)`, computed in the 64-bit width
//! of the frame counter with wrapping arithmetic, floor-divided, and narrowed
//! back to the 16-bit storage width. The result carries the truncation error of
//! every step and depends on fold order. It is intentionally not an exact mean.

use crate::frame::Frame;
use crate::geometry::Geometry;

/// Running per-pixel mean plus the number of frames folded into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    geometry: Geometry,
    pixels: Vec<u16>,
    count: u64,
}

impl Accumulator {
    /// All-zero accumulator with `count == 0`.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            pixels: vec![0u16; geometry.pixel_count()],
            count: 0,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current mean in storage order.
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Fold one frame into the mean.
    ///
    /// # Panics
    ///
    /// If `frame` was read with a different geometry. `pipeline::accumulate`
    /// builds its `FrameSource` and `Accumulator` from the same `Geometry`, so
    /// a run never reaches this.
    pub fn fold(&mut self, frame: &Frame<'_>) {
        assert_eq!(
            frame.geometry(),
            self.geometry,
            "frame geometry does not match accumulator"
        );
        let count = self.count;
        for (mean, sample) in self.pixels.iter_mut().zip(frame.samples()) {
            *mean = fold_sample(*mean, sample, count);
        }
        self.count += 1;
    }
}

/// One step of the truncating recurrence for a single pixel.
pub fn fold_sample(mean: u16, sample: u16, count: u64) -> u16 {
    let numerator = u64::from(sample).wrapping_add(count.wrapping_mul(u64::from(mean)));
    (numerator / count.wrapping_add(1)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuffer;

    fn fold_trace(values: &[u16]) -> Vec<u16> {
        let geometry = Geometry::new(1, 1).unwrap();
        let mut acc = Accumulator::new(geometry);
        values
            .iter()
            .map(|&v| {
                let buf = FrameBuffer::from_samples(geometry, &[v]).unwrap();
                acc.fold(&buf.frame());
                acc.pixels()[0]
            })
            .collect()
    }

    #[test]
    fn starts_zeroed() {
        let acc = Accumulator::new(Geometry::new(3, 2).unwrap());
        assert_eq!(acc.count(), 0);
        assert!(acc.pixels().iter().all(|&p| p == 0));
        assert_eq!(acc.pixels().len(), 6);
    }

    #[test]
    fn truncates_every_step() {
        // 21/2 -> 10, then 32/3 -> 10; the exact mean would be 11.
        assert_eq!(fold_trace(&[10, 11, 12]), vec![10, 10, 10]);
        // 7/2 -> 3, 9/3 -> 3, 14/4 -> 3, 17/5 -> 3; exact mean is 4.
        assert_eq!(fold_trace(&[4, 3, 3, 5, 5]), vec![4, 3, 3, 3, 3]);
        assert_eq!(fold_trace(&[1, 2]), vec![1, 1]);
    }

    #[test]
    fn fold_order_changes_truncation() {
        assert_eq!(fold_trace(&[1, 2, 6]), vec![1, 1, 2]);
        assert_eq!(fold_trace(&[2, 6, 1]), vec![2, 4, 3]);
        assert_eq!(fold_trace(&[6, 2, 1]), vec![6, 4, 3]);
    }

    #[test]
    fn divisible_values_are_exact() {
        assert_eq!(fold_trace(&[100, 200]), vec![100, 150]);
        assert_eq!(fold_trace(&[u16::MAX, u16::MAX, u16::MAX]), vec![u16::MAX; 3]);
    }

    #[test]
    fn fold_is_per_pixel() {
        let geometry = Geometry::new(2, 2).unwrap();
        let mut acc = Accumulator::new(geometry);
        let a = FrameBuffer::from_samples(geometry, &[0, 10, 20, 30]).unwrap();
        let b = FrameBuffer::from_samples(geometry, &[2, 10, 25, 65535]).unwrap();
        acc.fold(&a.frame());
        acc.fold(&b.frame());
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.pixels(), &[1, 10, 22, 32782]);
    }

    #[test]
    #[should_panic(expected = "frame geometry does not match")]
    fn mismatched_geometry_panics() {
        let mut acc = Accumulator::new(Geometry::new(2, 2).unwrap());
        let other = FrameBuffer::from_samples(Geometry::new(1, 4).unwrap(), &[1, 2, 3, 4]).unwrap();
        acc.fold(&other.frame());
    }

    #[test]
    fn fold_sample_matches_recurrence() {
        assert_eq!(fold_sample(0, 10, 0), 10);
        assert_eq!(fold_sample(10, 11, 1), 10);
        assert_eq!(fold_sample(10, 12, 2), 10);
        assert_eq!(fold_sample(150, 0, 2), 100);
    }
}
