//! Host-side output head: class logits to a*b* chrominance.
//!
//! The network classifies every output location into one of 313 quantized
//! a*b* bins. Two fixed layers turn that into colour: a rescale layer that
//! multiplies each logit by a constant (annealing the distribution), and a
//! 1x1 projection whose weights are the bin centres. After a softmax in
//! between, each location's chrominance is the expectation of the centres.

use std::path::Path;

use ndarray::{Array1, Array2, Array4, ArrayView4};
use ndarray_npy::{read_npy, ReadNpyError};

use crate::error::{Error, Result};
use crate::pipeline::ChrominanceTensor;

/// Number of quantized a*b* bins the network predicts over.
pub const NUM_CLUSTERS: usize = 313;

/// Broadcast weight of the rescale layer.
pub const RESCALE_FACTOR: f32 = 2.606;

/// The two reconfigured output layers. Immutable once built.
#[derive(Debug, Clone)]
pub struct ClusterHead {
    centers: Array2<f32>,
    rescale: Array1<f32>,
}

impl ClusterHead {
    /// Build a head from a `(313, 2)` table of a*b* centres.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the table has the wrong shape.
    pub fn new(centers: Array2<f32>) -> Result<Self> {
        if centers.dim() != (NUM_CLUSTERS, 2) {
            return Err(Error::ShapeMismatch {
                expected: format!("({NUM_CLUSTERS}, 2) cluster centres"),
                actual: format!("{:?}", centers.shape()),
            });
        }

        Ok(Self {
            centers,
            rescale: Array1::from_elem(NUM_CLUSTERS, RESCALE_FACTOR),
        })
    }

    /// Load the centre table from a `.npy` file.
    ///
    /// float64, float32 and int64 tables are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClusterCenters`] if the file cannot be parsed or has
    /// the wrong shape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let centers = read_centers(path).map_err(|source| Error::ClusterCenters {
            path: path.to_path_buf(),
            reason: source.to_string(),
        })?;

        Self::new(centers).map_err(|err| Error::ClusterCenters {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// The `(313, 2)` centre table.
    #[must_use]
    pub const fn centers(&self) -> &Array2<f32> {
        &self.centers
    }

    /// Map `(n, 313, h, w)` logits to `(n, 2, h, w)` chrominance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the channel axis is not 313 wide.
    pub fn apply(&self, logits: ArrayView4<'_, f32>) -> Result<ChrominanceTensor> {
        let (batch, classes, height, width) = logits.dim();
        if classes != NUM_CLUSTERS {
            return Err(Error::ShapeMismatch {
                expected: format!("{NUM_CLUSTERS} class logits"),
                actual: format!("{:?}", logits.shape()),
            });
        }

        let mut ab = Array4::zeros((batch, 2, height, width));
        let mut weights = vec![0.0_f32; NUM_CLUSTERS];

        for n in 0..batch {
            for y in 0..height {
                for x in 0..width {
                    let mut max = f32::NEG_INFINITY;
                    for (k, w) in weights.iter_mut().enumerate() {
                        *w = logits[[n, k, y, x]] * self.rescale[k];
                        max = max.max(*w);
                    }

                    let mut total = 0.0;
                    for w in &mut weights {
                        *w = (*w - max).exp();
                        total += *w;
                    }

                    let (mut a, mut b) = (0.0_f32, 0.0_f32);
                    for (k, w) in weights.iter().enumerate() {
                        let p = w / total;
                        a = p.mul_add(self.centers[[k, 0]], a);
                        b = p.mul_add(self.centers[[k, 1]], b);
                    }

                    ab[[n, 0, y, x]] = a;
                    ab[[n, 1, y, x]] = b;
                }
            }
        }

        Ok(ab)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn read_centers(path: &Path) -> std::result::Result<Array2<f32>, ReadNpyError> {
    read_npy::<_, Array2<f64>>(path)
        .map(|table| table.mapv(|v| v as f32))
        .or_else(|_| read_npy::<_, Array2<f32>>(path))
        .or_else(|_| read_npy::<_, Array2<i64>>(path).map(|table| table.mapv(|v| v as f32)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray_npy::write_npy;

    /// Centre `k` sits at `(k, -k)`.
    fn ramp_centers() -> Array2<f32> {
        Array2::from_shape_fn((NUM_CLUSTERS, 2), |(k, c)| if c == 0 { k as f32 } else { -(k as f32) })
    }

    #[test]
    fn test_rejects_wrong_table_shape() {
        let err = ClusterHead::new(Array2::zeros((2, NUM_CLUSTERS))).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_uniform_logits_give_mean_centre() {
        let head = ClusterHead::new(ramp_centers()).unwrap();
        let logits = Array4::<f32>::zeros((1, NUM_CLUSTERS, 2, 3));

        let ab = head.apply(logits.view()).unwrap();

        let mean = (NUM_CLUSTERS - 1) as f32 / 2.0;
        assert_eq!(ab.shape(), &[1, 2, 2, 3]);
        for v in ab.index_axis(ndarray::Axis(1), 0) {
            assert!((v - mean).abs() < 1e-2, "a = {v}");
        }
        for v in ab.index_axis(ndarray::Axis(1), 1) {
            assert!((v + mean).abs() < 1e-2, "b = {v}");
        }
    }

    #[test]
    fn test_dominant_class_selects_its_centre() {
        let head = ClusterHead::new(ramp_centers()).unwrap();
        let mut logits = Array4::<f32>::zeros((1, NUM_CLUSTERS, 1, 1));
        logits[[0, 42, 0, 0]] = 20.0;

        let ab = head.apply(logits.view()).unwrap();

        assert!((ab[[0, 0, 0, 0]] - 42.0).abs() < 1e-2);
        assert!((ab[[0, 1, 0, 0]] + 42.0).abs() < 1e-2);
    }

    #[test]
    fn test_rescale_sharpens_distribution() {
        // Two live classes; the logit gap is chosen so that after the
        // rescale layer the odds are exactly 3:1.
        let mut centers = Array2::zeros((NUM_CLUSTERS, 2));
        centers[[0, 0]] = 10.0;
        centers[[1, 1]] = 10.0;
        let head = ClusterHead::new(centers).unwrap();

        let mut logits = Array4::from_elem((1, NUM_CLUSTERS, 1, 1), -1000.0_f32);
        logits[[0, 0, 0, 0]] = 3.0_f32.ln() / RESCALE_FACTOR;
        logits[[0, 1, 0, 0]] = 0.0;

        let ab = head.apply(logits.view()).unwrap();

        assert!((ab[[0, 0, 0, 0]] - 7.5).abs() < 1e-3, "a = {}", ab[[0, 0, 0, 0]]);
        assert!((ab[[0, 1, 0, 0]] - 2.5).abs() < 1e-3, "b = {}", ab[[0, 1, 0, 0]]);
    }

    #[test]
    fn test_rejects_wrong_logit_count() {
        let head = ClusterHead::new(ramp_centers()).unwrap();
        let err = head.apply(Array4::zeros((1, 2, 4, 4)).view()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_load_float64_and_int64_tables() {
        let dir = std::env::temp_dir();
        let f64_path = dir.join(format!("chromafy-pts-{}-f64.npy", std::process::id()));
        let i64_path = dir.join(format!("chromafy-pts-{}-i64.npy", std::process::id()));

        let table = Array2::from_shape_fn((NUM_CLUSTERS, 2), |(k, c)| (k * 2 + c) as i64 - 300);
        write_npy(&f64_path, &table.mapv(|v| v as f64)).unwrap();
        write_npy(&i64_path, &table).unwrap();

        let from_f64 = ClusterHead::load(&f64_path).unwrap();
        let from_i64 = ClusterHead::load(&i64_path).unwrap();
        std::fs::remove_file(&f64_path).ok();
        std::fs::remove_file(&i64_path).ok();

        assert_eq!(from_f64.centers(), from_i64.centers());
        assert!((from_f64.centers()[[1, 1]] - (-297.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_rejects_wrong_shape_and_garbage() {
        let dir = std::env::temp_dir();
        let small = dir.join(format!("chromafy-pts-{}-small.npy", std::process::id()));
        let garbage = dir.join(format!("chromafy-pts-{}-garbage.npy", std::process::id()));
        write_npy(&small, &Array2::<f64>::zeros((10, 2))).unwrap();
        std::fs::write(&garbage, b"not numpy").unwrap();

        let small_err = ClusterHead::load(&small).unwrap_err();
        let garbage_err = ClusterHead::load(&garbage).unwrap_err();
        std::fs::remove_file(&small).ok();
        std::fs::remove_file(&garbage).ok();

        assert!(matches!(small_err, Error::ClusterCenters { .. }));
        assert!(matches!(garbage_err, Error::ClusterCenters { .. }));
        assert!(garbage_err.is_model_load());
    }
}
