use uvwarp_image::{ImageSize, ImageView, ImageViewMut};

use super::homography::Homography;
use crate::{
    error::WarpError,
    interpolation::bilinear_sample_into,
    parallel::ExecutionStrategy,
};

/// Four 2d points in loop order.
pub type Quad = [[f64; 2]; 4];

/// Under [`SampleOrigin::PixelIndex`], inverse-mapped coordinates this close
/// to the source border are snapped onto it before the bounds test.
pub(crate) const SOURCE_BOUNDS_SNAP: f64 = 1e-9;

/// A face given as a source and a destination UV quad.
///
/// Both quads hold normalized `[0, 1]` coordinates and must share the same
/// loop order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCorrespondence {
    /// UV quad in the source image.
    pub src_uv: Quad,
    /// UV quad in the destination image.
    pub dst_uv: Quad,
}

impl FaceCorrespondence {
    /// Create a correspondence from two UV quads.
    pub fn new(src_uv: Quad, dst_uv: Quad) -> Self {
        Self { src_uv, dst_uv }
    }
}

/// Where inside a destination pixel the inverse mapping is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrigin {
    /// Evaluate at `(x + 0.5, y + 0.5)`.
    #[default]
    PixelCenter,
    /// Evaluate at the integer index `(x, y)`, the same convention as the
    /// UV to pixel conversion.
    PixelIndex,
}

impl SampleOrigin {
    /// Offset added to the integer pixel index.
    pub fn offset(self) -> f64 {
        match self {
            SampleOrigin::PixelCenter => 0.5,
            SampleOrigin::PixelIndex => 0.0,
        }
    }

    // slack allowed outside [0, dim-1] in the source bounds test
    fn bounds_tolerance(self) -> f64 {
        match self {
            SampleOrigin::PixelCenter => 0.0,
            SampleOrigin::PixelIndex => SOURCE_BOUNDS_SNAP,
        }
    }
}

/// Options for the quad warper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarpOptions {
    /// Sampling position inside each destination pixel.
    pub sample_origin: SampleOrigin,
    /// How a batch of faces is executed.
    pub strategy: ExecutionStrategy,
}

/// Per-pixel counters accumulated while warping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceStats {
    /// Destination pixels overwritten.
    pub written: usize,
    /// Pixels skipped because the perspective divide was degenerate.
    pub degenerate: usize,
    /// Pixels skipped because they map outside the source image.
    pub out_of_bounds: usize,
}

impl std::ops::AddAssign for FaceStats {
    fn add_assign(&mut self, rhs: Self) {
        self.written += rhs.written;
        self.degenerate += rhs.degenerate;
        self.out_of_bounds += rhs.out_of_bounds;
    }
}

/// Convert a UV coordinate into pixel index space.
///
/// Each component is clamped to `[0, 1]` and scaled by `(dimension - 1)`.
/// NaN components clamp to zero.
///
/// # Example
///
/// ```
/// use uvwarp_imgproc::warp::uv_to_pixel;
///
/// assert_eq!(uv_to_pixel([0.5, 1.5], [5, 3].into()), [2.0, 2.0]);
/// ```
pub fn uv_to_pixel(uv: [f64; 2], size: ImageSize) -> [f64; 2] {
    let scale = |v: f64, dim: usize| v.max(0.0).min(1.0) * dim.saturating_sub(1) as f64;
    [scale(uv[0], size.width), scale(uv[1], size.height)]
}

/// Convert the four corners of a UV quad into pixel index space.
pub fn quad_uv_to_pixel(quad: &Quad, size: ImageSize) -> Quad {
    quad.map(|uv| uv_to_pixel(uv, size))
}

/// An inclusive, axis aligned box of pixel indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    /// Smallest column.
    pub min_x: usize,
    /// Smallest row.
    pub min_y: usize,
    /// Largest column, inclusive.
    pub max_x: usize,
    /// Largest row, inclusive.
    pub max_y: usize,
}

impl PixelBox {
    /// Bounding box of a pixel space quad, `floor` of the minimum and `ceil`
    /// of the maximum on each axis, clamped to the image.
    ///
    /// Returns `None` for an empty image.
    pub fn from_quad(quad: &Quad, size: ImageSize) -> Option<Self> {
        if size.is_empty() {
            return None;
        }

        let (mut lo_x, mut lo_y) = (f64::INFINITY, f64::INFINITY);
        let (mut hi_x, mut hi_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &[x, y] in quad {
            lo_x = lo_x.min(x);
            lo_y = lo_y.min(y);
            hi_x = hi_x.max(x);
            hi_y = hi_y.max(y);
        }

        let clamp = |v: f64, dim: usize| v.max(0.0).min((dim - 1) as f64) as usize;
        let bbox = Self {
            min_x: clamp(lo_x.floor(), size.width),
            min_y: clamp(lo_y.floor(), size.height),
            max_x: clamp(hi_x.ceil(), size.width),
            max_y: clamp(hi_y.ceil(), size.height),
        };

        if bbox.min_x > bbox.max_x || bbox.min_y > bbox.max_y {
            return None;
        }
        Some(bbox)
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Number of pixels covered.
    pub fn num_pixels(&self) -> usize {
        self.width() * self.height()
    }
}

/// Everything needed to rasterize one face, computed once per face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlan {
    /// Source quad in pixel space.
    pub src_px: Quad,
    /// Destination quad in pixel space.
    pub dst_px: Quad,
    /// Source pixel to destination pixel transform.
    pub src_to_dst: Homography,
    /// Destination pixel to source pixel transform.
    pub dst_to_src: Homography,
    /// Destination pixels visited.
    pub bbox: PixelBox,
}

impl FacePlan {
    /// Convert the face to pixel space, estimate and invert its homography
    /// and compute the destination bounding box.
    ///
    /// # Errors
    ///
    /// [`WarpError::InvalidInput`] for empty images,
    /// [`WarpError::Homography`] when the transform cannot be estimated or
    /// inverted.
    pub fn new(
        src_size: ImageSize,
        dst_size: ImageSize,
        face: &FaceCorrespondence,
    ) -> Result<Self, WarpError> {
        if src_size.is_empty() || dst_size.is_empty() {
            return Err(WarpError::InvalidInput(format!(
                "cannot warp between {src_size} and {dst_size}"
            )));
        }

        let src_px = quad_uv_to_pixel(&face.src_uv, src_size);
        let dst_px = quad_uv_to_pixel(&face.dst_uv, dst_size);

        let src_to_dst = Homography::from_correspondences(&src_px, &dst_px)?;
        let dst_to_src = src_to_dst.inverse()?;

        let bbox = PixelBox::from_quad(&dst_px, dst_size).ok_or_else(|| {
            WarpError::InvalidInput(format!("empty destination box for {dst_size}"))
        })?;

        Ok(Self {
            src_px,
            dst_px,
            src_to_dst,
            dst_to_src,
            bbox,
        })
    }
}

// rejects anything outside [-tol, max + tol] and clamps the rest into [0, max]
#[inline]
fn snap_into(v: f64, max: f64, tol: f64) -> Option<f64> {
    if v >= -tol && v <= max + tol {
        Some(v.max(0.0).min(max))
    } else {
        None
    }
}

// writes a sampled color into a destination pixel, dropping extra channels
// and filling missing ones with 1.0
#[inline]
pub(crate) fn write_channels(dst_pixel: &mut [f32], color: &[f32]) {
    for (c, v) in dst_pixel.iter_mut().enumerate() {
        *v = color.get(c).copied().unwrap_or(1.0);
    }
}

/// Visit every destination pixel of the plan's box, inverse map it into the
/// source and hand the sampled color to `write`.
pub(crate) fn rasterize<F>(
    src: &ImageView<'_>,
    plan: &FacePlan,
    origin: SampleOrigin,
    mut write: F,
) -> FaceStats
where
    F: FnMut(usize, usize, &[f32]),
{
    let mut stats = FaceStats::default();
    if src.is_empty() {
        return stats;
    }

    let max_x = (src.width() - 1) as f64;
    let max_y = (src.height() - 1) as f64;
    let offset = origin.offset();
    let tol = origin.bounds_tolerance();
    let mut color = vec![0.0f32; src.num_channels()];

    for y in plan.bbox.min_y..=plan.bbox.max_y {
        for x in plan.bbox.min_x..=plan.bbox.max_x {
            let p = [x as f64 + offset, y as f64 + offset];

            let Some([sx, sy]) = plan.dst_to_src.project(p) else {
                stats.degenerate += 1;
                continue;
            };

            let (sx, sy) = (snap_into(sx, max_x, tol), snap_into(sy, max_y, tol));
            let (Some(sx), Some(sy)) = (sx, sy) else {
                stats.out_of_bounds += 1;
                continue;
            };

            bilinear_sample_into(src, sx, sy, &mut color);
            write(x, y, &color);
            stats.written += 1;
        }
    }

    stats
}

/// Warp one face of `src` into `dst`.
///
/// The source UV quad is mapped onto the destination UV quad with the
/// homography estimated from the four corner pairs. Every pixel of the
/// destination quad's bounding box is inverse mapped and, when it lands
/// inside the source image, overwritten with the bilinear sample. Pixels that
/// map outside the source or to infinity are left untouched.
///
/// The box test is an approximation of the quad: pixels in the destination
/// box but outside the quad are still written when their inverse mapping
/// lands inside the source image.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, modified in place.
/// * `src_uv` - The source quad in UV space.
/// * `dst_uv` - The destination quad in UV space.
/// * `options` - Sampling options; the execution strategy is ignored.
///
/// # Returns
///
/// Counters for the pixels written and skipped.
///
/// # Errors
///
/// [`WarpError::InvalidInput`] for empty images and
/// [`WarpError::Homography`] when the face is degenerate. `dst` is not
/// modified on error.
///
/// # Example
///
/// ```
/// use uvwarp_image::ImageBuffer;
/// use uvwarp_imgproc::warp::{warp_face, SampleOrigin, WarpOptions};
///
/// let src = ImageBuffer::from_size_val([4, 4].into(), 4, 0.5).unwrap();
/// let mut dst = ImageBuffer::from_size_val([8, 8].into(), 4, 0.0).unwrap();
///
/// let quad = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// let options = WarpOptions {
///     sample_origin: SampleOrigin::PixelIndex,
///     ..Default::default()
/// };
/// let stats = warp_face(&src.view(), &mut dst.view_mut(), &quad, &quad, &options).unwrap();
///
/// assert_eq!(stats.written, 64);
/// assert!(dst.as_slice().iter().all(|&v| v == 0.5));
/// ```
pub fn warp_face(
    src: &ImageView<'_>,
    dst: &mut ImageViewMut<'_>,
    src_uv: &Quad,
    dst_uv: &Quad,
    options: &WarpOptions,
) -> Result<FaceStats, WarpError> {
    let face = FaceCorrespondence::new(*src_uv, *dst_uv);
    let plan = FacePlan::new(src.size(), dst.size(), &face)?;

    Ok(rasterize(src, &plan, options.sample_origin, |x, y, color| {
        write_channels(dst.pixel_mut(x, y), color)
    }))
}

/// The pixels one face writes, computed without touching the destination.
///
/// Patches of different faces can be computed concurrently and committed in
/// order later.
#[derive(Debug, Clone)]
pub struct FacePatch {
    bbox: PixelBox,
    channels: usize,
    data: Vec<f32>,
    written: Vec<bool>,
    stats: FaceStats,
}

impl FacePatch {
    /// Rasterize `face` into a patch shaped for a destination of `dst_size`
    /// with `dst_channels` channels.
    ///
    /// # Errors
    ///
    /// Same as [`FacePlan::new`].
    pub fn compute(
        src: &ImageView<'_>,
        dst_size: ImageSize,
        dst_channels: usize,
        face: &FaceCorrespondence,
        origin: SampleOrigin,
    ) -> Result<Self, WarpError> {
        let plan = FacePlan::new(src.size(), dst_size, face)?;
        let bbox = plan.bbox;

        let mut data = vec![0.0f32; bbox.num_pixels() * dst_channels];
        let mut written = vec![false; bbox.num_pixels()];

        let stats = rasterize(src, &plan, origin, |x, y, color| {
            let idx = (y - bbox.min_y) * bbox.width() + (x - bbox.min_x);
            let base = idx * dst_channels;
            write_channels(&mut data[base..base + dst_channels], color);
            written[idx] = true;
        });

        Ok(Self {
            bbox,
            channels: dst_channels,
            data,
            written,
            stats,
        })
    }

    /// Destination box covered by the patch.
    pub fn bbox(&self) -> PixelBox {
        self.bbox
    }

    /// Counters collected while rasterizing.
    pub fn stats(&self) -> FaceStats {
        self.stats
    }

    /// Copy the written pixels into `dst`.
    ///
    /// # Errors
    ///
    /// [`WarpError::InvalidInput`] when `dst` does not match the shape the
    /// patch was computed for.
    pub fn commit(&self, dst: &mut ImageViewMut<'_>) -> Result<(), WarpError> {
        if dst.num_channels() != self.channels
            || dst.width() <= self.bbox.max_x
            || dst.height() <= self.bbox.max_y
        {
            return Err(WarpError::InvalidInput(format!(
                "patch {:?} with {} channels does not fit {} with {} channels",
                self.bbox,
                self.channels,
                dst.size(),
                dst.num_channels()
            )));
        }

        let width = self.bbox.width();
        for (idx, _) in self.written.iter().enumerate().filter(|(_, w)| **w) {
            let x = self.bbox.min_x + idx % width;
            let y = self.bbox.min_y + idx / width;
            let base = idx * self.channels;
            dst.pixel_mut(x, y)
                .copy_from_slice(&self.data[base..base + self.channels]);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HomographyError;
    use approx::assert_relative_eq;
    use uvwarp_image::{ImageBuffer, ImageError};

    const UNIT_QUAD: Quad = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn index_options() -> WarpOptions {
        WarpOptions {
            sample_origin: SampleOrigin::PixelIndex,
            ..Default::default()
        }
    }

    fn red_dot_4x4() -> Result<ImageBuffer, ImageError> {
        let mut image = ImageBuffer::from_size_val([4, 4].into(), 4, 0.0)?;
        for y in 0..4 {
            for x in 0..4 {
                image.set_pixel(x, y, &[0.0, 0.0, 0.0, 1.0])?;
            }
        }
        image.set_pixel(1, 1, &[1.0, 0.0, 0.0, 1.0])?;
        Ok(image)
    }

    #[test]
    fn uv_to_pixel_clamps() {
        let size = [5, 3].into();
        assert_eq!(uv_to_pixel([0.0, 0.0], size), [0.0, 0.0]);
        assert_eq!(uv_to_pixel([1.0, 1.0], size), [4.0, 2.0]);
        assert_eq!(uv_to_pixel([-0.5, 2.0], size), [0.0, 2.0]);
        assert_eq!(uv_to_pixel([0.25, f64::NAN], size), [1.0, 0.0]);
    }

    #[test]
    fn pixel_box_from_quad() {
        let quad = [[0.4, 1.2], [3.6, 0.9], [3.1, 2.0], [0.9, 2.5]];
        let bbox = PixelBox::from_quad(&quad, [5, 3].into()).expect("non empty");
        assert_eq!(
            bbox,
            PixelBox {
                min_x: 0,
                min_y: 0,
                max_x: 4,
                max_y: 2
            }
        );
        assert_eq!(bbox.num_pixels(), 15);
        assert_eq!(PixelBox::from_quad(&quad, [0, 3].into()), None);
    }

    #[test]
    fn identity_copies_red_dot() -> Result<(), Box<dyn std::error::Error>> {
        let src = red_dot_4x4()?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 4, 0.0)?;

        let stats = warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &UNIT_QUAD,
            &UNIT_QUAD,
            &index_options(),
        )?;

        assert_eq!(stats.written, 16);
        assert_eq!(dst.as_slice(), src.as_slice());
        assert_eq!(dst.get_pixel(1, 1)?, &[1.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn identity_pixel_center_blends_half_pixel() -> Result<(), Box<dyn std::error::Error>> {
        let src = red_dot_4x4()?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 4, 0.0)?;

        let stats = warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &UNIT_QUAD,
            &UNIT_QUAD,
            &WarpOptions::default(),
        )?;

        // the last row and column map to 3.5 and fall off the source
        assert_eq!(stats.written, 9);
        assert_eq!(stats.out_of_bounds, 7);

        // (0.5, 0.5), (1.5, 0.5), (0.5, 1.5) and (1.5, 1.5) all see a
        // quarter of the red pixel
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_relative_eq!(dst.get_pixel(x, y)?[0], 0.25, epsilon = 1e-6);
        }
        assert_relative_eq!(dst.get_pixel(2, 2)?[0], 0.0, epsilon = 1e-6);
        // untouched
        assert_eq!(dst.get_pixel(3, 3)?, &[0.0, 0.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn magnifies_central_region() -> Result<(), Box<dyn std::error::Error>> {
        // 5x5 ramp: value = x + 10 * y
        let data: Vec<f32> = (0..25).map(|i| ((i % 5) + 10 * (i / 5)) as f32).collect();
        let src = ImageBuffer::new([5, 5].into(), 1, data)?;
        let mut dst = ImageBuffer::from_size_val([5, 5].into(), 1, -1.0)?;

        let src_uv = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
        warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &src_uv,
            &UNIT_QUAD,
            &index_options(),
        )?;

        // destination (u, v) samples the source at (1 + u / 2, 1 + v / 2)
        for v in 0..5 {
            for u in 0..5 {
                let (sx, sy) = (1.0 + u as f32 / 2.0, 1.0 + v as f32 / 2.0);
                let expected = sx + 10.0 * sy;
                assert_relative_eq!(dst.get_pixel(u, v)?[0], expected, epsilon = 1e-4);
            }
        }
        // corners land on source pixels (1, 1) and (3, 3), the center on (2, 2)
        assert_relative_eq!(dst.get_pixel(0, 0)?[0], 11.0, epsilon = 1e-4);
        assert_relative_eq!(dst.get_pixel(4, 4)?[0], 33.0, epsilon = 1e-4);
        assert_relative_eq!(dst.get_pixel(2, 2)?[0], 22.0, epsilon = 1e-4);
        // halfway between (1, 1) and (2, 1)
        assert_relative_eq!(dst.get_pixel(1, 0)?[0], 11.5, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn magnifies_with_bilinear_blend() -> Result<(), Box<dyn std::error::Error>> {
        // a single bright pixel in the middle of a 5x5 image
        let mut src = ImageBuffer::from_size_val([5, 5].into(), 1, 0.0)?;
        src.set_pixel(2, 2, &[1.0])?;
        let mut dst = ImageBuffer::from_size_val([5, 5].into(), 1, 0.0)?;

        let src_uv = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
        warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &src_uv,
            &UNIT_QUAD,
            &index_options(),
        )?;

        // center is exact, edge midpoints sit half a pixel away, the
        // diagonal neighbours a quarter of the weight
        assert_relative_eq!(dst.get_pixel(2, 2)?[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(dst.get_pixel(1, 2)?[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(dst.get_pixel(3, 2)?[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(dst.get_pixel(1, 1)?[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(dst.get_pixel(0, 0)?[0], 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn out_of_source_pixels_are_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.25)?;

        // mirror the destination quad on x: with the pixel center origin
        // the last column maps to x = -0.5, outside the source
        let dst_uv = [[1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let stats = warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &UNIT_QUAD,
            &dst_uv,
            &WarpOptions::default(),
        )?;

        assert!(stats.out_of_bounds > 0);
        for y in 0..4 {
            assert_eq!(dst.get_pixel(3, y)?, &[0.25]);
        }
        // last row maps to y = 3.5 as well
        for x in 0..4 {
            assert_eq!(dst.get_pixel(x, 3)?, &[0.25]);
        }
        assert_eq!(dst.get_pixel(1, 1)?, &[1.0]);
        Ok(())
    }

    // a 4x4 to 4x4 plan with a hand-made inverse mapping
    fn plan_4x4(dst_to_src: [[f64; 3]; 3]) -> FacePlan {
        FacePlan {
            src_px: [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]],
            dst_px: [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]],
            src_to_dst: Homography::IDENTITY,
            dst_to_src: Homography(dst_to_src),
            bbox: PixelBox {
                min_x: 0,
                min_y: 0,
                max_x: 3,
                max_y: 3,
            },
        }
    }

    fn rasterize_into(
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
        plan: &FacePlan,
        origin: SampleOrigin,
    ) -> FaceStats {
        let mut view = dst.view_mut();
        rasterize(&src.view(), plan, origin, |x, y, color| {
            write_channels(view.pixel_mut(x, y), color)
        })
    }

    #[test]
    fn source_bounds_are_strict_at_pixel_centers() -> Result<(), ImageError> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.25)?;

        // column 0 lands a hair left of the source border
        let plan = plan_4x4([[1.0, 0.0, -0.5 - 5e-10], [0.0, 1.0, -0.5], [0.0, 0.0, 1.0]]);
        let stats = rasterize_into(&src, &mut dst, &plan, SampleOrigin::PixelCenter);

        assert_eq!(stats.written, 12);
        assert_eq!(stats.out_of_bounds, 4);
        for y in 0..4 {
            assert_eq!(dst.get_pixel(0, y)?, &[0.25]);
            assert_eq!(dst.get_pixel(1, y)?, &[1.0]);
        }
        Ok(())
    }

    #[test]
    fn pixel_index_snaps_border_round_off() -> Result<(), ImageError> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.25)?;

        let plan = plan_4x4([[1.0, 0.0, -5e-10], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let stats = rasterize_into(&src, &mut dst, &plan, SampleOrigin::PixelIndex);

        assert_eq!(stats.written, 16);
        assert_eq!(stats.out_of_bounds, 0);
        assert_eq!(dst.get_pixel(0, 2)?, &[1.0]);

        // a real miss is still rejected
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.25)?;
        let plan = plan_4x4([[1.0, 0.0, -1e-6], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let stats = rasterize_into(&src, &mut dst, &plan, SampleOrigin::PixelIndex);
        assert_eq!(stats.out_of_bounds, 4);
        assert_eq!(dst.get_pixel(0, 2)?, &[0.25]);
        Ok(())
    }

    #[test]
    fn degenerate_projection_leaves_pixels() -> Result<(), ImageError> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.25)?;

        // w = x + 0.5 - 1.5 vanishes on column 1
        let plan = plan_4x4([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, -1.5]]);
        let stats = rasterize_into(&src, &mut dst, &plan, SampleOrigin::PixelCenter);

        assert_eq!(
            stats,
            FaceStats {
                written: 7,
                degenerate: 4,
                out_of_bounds: 5,
            }
        );
        for y in 0..4 {
            assert_eq!(dst.get_pixel(1, y)?, &[0.25]);
            // w = -1 sends column 0 to x = -0.5
            assert_eq!(dst.get_pixel(0, y)?, &[0.25]);
            assert_eq!(dst.get_pixel(3, y)?, &[1.0]);
        }
        Ok(())
    }

    #[test]
    fn channel_mismatch_pads_and_truncates() -> Result<(), Box<dyn std::error::Error>> {
        let rgb = ImageBuffer::from_size_val([2, 2].into(), 3, 0.5)?;
        let mut rgba = ImageBuffer::from_size_val([2, 2].into(), 4, 0.0)?;
        warp_face(
            &rgb.view(),
            &mut rgba.view_mut(),
            &UNIT_QUAD,
            &UNIT_QUAD,
            &index_options(),
        )?;
        assert_eq!(rgba.get_pixel(1, 1)?, &[0.5, 0.5, 0.5, 1.0]);

        let mut gray = ImageBuffer::from_size_val([2, 2].into(), 1, 0.0)?;
        warp_face(
            &rgba.view(),
            &mut gray.view_mut(),
            &UNIT_QUAD,
            &UNIT_QUAD,
            &index_options(),
        )?;
        assert_eq!(gray.as_slice(), &[0.5; 4]);
        Ok(())
    }

    #[test]
    fn degenerate_face_leaves_destination() -> Result<(), ImageError> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let mut dst = ImageBuffer::from_size_val([4, 4].into(), 1, 0.0)?;
        let collinear = [[0.0, 0.0], [0.3, 0.3], [0.6, 0.6], [1.0, 1.0]];

        let res = warp_face(
            &src.view(),
            &mut dst.view_mut(),
            &collinear,
            &UNIT_QUAD,
            &WarpOptions::default(),
        );
        assert!(matches!(
            res,
            Err(WarpError::Homography(HomographyError::SingularMatrix { .. }))
        ));
        assert!(dst.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn warp_face_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let data: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let src = ImageBuffer::new([8, 8].into(), 1, data)?;
        let mut dst = ImageBuffer::from_size_val([8, 8].into(), 1, 0.0)?;

        let src_uv = [[0.1, 0.2], [0.9, 0.1], [0.8, 0.7], [0.2, 0.9]];
        let dst_uv = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let options = WarpOptions::default();

        warp_face(&src.view(), &mut dst.view_mut(), &src_uv, &dst_uv, &options)?;
        let first = dst.clone();
        warp_face(&src.view(), &mut dst.view_mut(), &src_uv, &dst_uv, &options)?;
        assert_eq!(dst, first);
        Ok(())
    }

    #[test]
    fn patch_matches_direct_warp() -> Result<(), Box<dyn std::error::Error>> {
        let data: Vec<f32> = (0..6 * 5 * 2).map(|i| (i % 7) as f32).collect();
        let src = ImageBuffer::new([6, 5].into(), 2, data)?;
        let face = FaceCorrespondence::new(
            [[0.0, 0.1], [0.9, 0.0], [1.0, 0.8], [0.1, 1.0]],
            [[0.2, 0.2], [0.7, 0.3], [0.8, 0.9], [0.3, 0.7]],
        );

        let mut direct = ImageBuffer::from_size_val([7, 7].into(), 3, -1.0)?;
        let stats = warp_face(
            &src.view(),
            &mut direct.view_mut(),
            &face.src_uv,
            &face.dst_uv,
            &WarpOptions::default(),
        )?;

        let mut staged = ImageBuffer::from_size_val([7, 7].into(), 3, -1.0)?;
        let patch = FacePatch::compute(
            &src.view(),
            staged.size(),
            staged.num_channels(),
            &face,
            SampleOrigin::PixelCenter,
        )?;
        patch.commit(&mut staged.view_mut())?;

        assert_eq!(patch.stats(), stats);
        assert_eq!(staged, direct);
        Ok(())
    }

    #[test]
    fn patch_rejects_mismatched_destination() -> Result<(), Box<dyn std::error::Error>> {
        let src = ImageBuffer::from_size_val([4, 4].into(), 1, 1.0)?;
        let face = FaceCorrespondence::new(UNIT_QUAD, UNIT_QUAD);
        let patch =
            FacePatch::compute(&src.view(), [4, 4].into(), 1, &face, SampleOrigin::default())?;

        let mut other = ImageBuffer::from_size_val([4, 4].into(), 3, 0.0)?;
        assert!(matches!(
            patch.commit(&mut other.view_mut()),
            Err(WarpError::InvalidInput(_))
        ));
        Ok(())
    }
}
