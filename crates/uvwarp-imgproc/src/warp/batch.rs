use uvwarp_image::{ImageView, ImageViewMut};

use super::quad::{warp_face, FaceCorrespondence, FacePatch, FaceStats, WarpOptions};
use crate::{
    error::{HomographyError, WarpError},
    parallel::{map_ordered, ExecutionStrategy},
};

/// A face that was not warped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSkip {
    /// Position of the face in the input slice.
    pub index: usize,
    /// Why the face was skipped.
    pub reason: HomographyError,
}

/// Summary of a batch warp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarpReport {
    /// Number of faces supplied.
    pub faces_total: usize,
    /// Number of faces whose homography was computed and rasterized.
    pub faces_processed: usize,
    /// Faces skipped, in input order.
    pub skipped: Vec<FaceSkip>,
    /// Pixel counters summed over the processed faces.
    pub stats: FaceStats,
}

impl WarpReport {
    fn record(
        &mut self,
        index: usize,
        result: Result<FaceStats, WarpError>,
    ) -> Result<(), WarpError> {
        match result {
            Ok(stats) => {
                log::debug!(
                    "face {}: wrote {} pixels ({} degenerate, {} outside the source)",
                    index,
                    stats.written,
                    stats.degenerate,
                    stats.out_of_bounds
                );
                self.faces_processed += 1;
                self.stats += stats;
            }
            Err(WarpError::Homography(reason)) => {
                log::warn!("face {}: {}; skipping", index, reason);
                self.skipped.push(FaceSkip { index, reason });
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

/// Warp an ordered batch of faces from `src` into `dst`.
///
/// Faces are applied in the order given; where destination boxes overlap the
/// last face wins. A face whose homography cannot be estimated or inverted is
/// logged, recorded in [`WarpReport::skipped`] and does not stop the batch.
///
/// With [`ExecutionStrategy::Parallel`] or [`ExecutionStrategy::Fixed`] the
/// faces are rasterized concurrently into staged patches which are then
/// committed in input order, so the output matches the serial strategy.
///
/// # Errors
///
/// [`WarpError::InvalidInput`] when no faces are supplied or either image is
/// empty, before any pixel is written. [`WarpError::Parallel`] when the
/// local thread pool cannot be built.
pub fn warp_faces(
    src: &ImageView<'_>,
    dst: &mut ImageViewMut<'_>,
    faces: &[FaceCorrespondence],
    options: &WarpOptions,
) -> Result<WarpReport, WarpError> {
    if faces.is_empty() {
        return Err(WarpError::InvalidInput("no faces supplied".to_string()));
    }
    if src.is_empty() {
        return Err(WarpError::InvalidInput(format!(
            "source image is empty ({})",
            src.size()
        )));
    }
    if dst.is_empty() {
        return Err(WarpError::InvalidInput(format!(
            "destination image is empty ({})",
            dst.size()
        )));
    }

    let mut report = WarpReport {
        faces_total: faces.len(),
        ..Default::default()
    };

    match options.strategy {
        ExecutionStrategy::Serial => {
            for (index, face) in faces.iter().enumerate() {
                let result = warp_face(src, dst, &face.src_uv, &face.dst_uv, options);
                report.record(index, result)?;
            }
        }
        strategy => {
            let (dst_size, dst_channels) = (dst.size(), dst.num_channels());
            let patches = map_ordered(faces, strategy, |_, face| {
                FacePatch::compute(src, dst_size, dst_channels, face, options.sample_origin)
            })?;

            for (index, patch) in patches.into_iter().enumerate() {
                let result = match patch {
                    Ok(patch) => patch.commit(dst).map(|_| patch.stats()),
                    Err(err) => Err(err),
                };
                report.record(index, result)?;
            }
        }
    }

    log::debug!(
        "warped {}/{} faces, {} pixels written",
        report.faces_processed,
        report.faces_total,
        report.stats.written
    );

    Ok(report)
}
