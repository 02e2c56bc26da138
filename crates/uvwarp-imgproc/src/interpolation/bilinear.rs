use uvwarp_image::ImageView;

/// Whether `(fx, fy)` lies inside `[0, width-1] x [0, height-1]`.
///
/// NaN coordinates are never inside.
#[inline]
pub(crate) fn in_sampling_range(image: &ImageView<'_>, fx: f64, fy: f64) -> bool {
    if image.is_empty() {
        return false;
    }
    let max_x = (image.width() - 1) as f64;
    let max_y = (image.height() - 1) as f64;
    (0.0..=max_x).contains(&fx) && (0.0..=max_y).contains(&fy)
}

/// Kernel for bilinear interpolation
///
/// Writes the interpolated channel values of `image` at `(fx, fy)` into `out`.
/// Coordinates outside `[0, width-1] x [0, height-1]` produce zeros. The far
/// neighbours are clamped to the last row/column, never wrapped.
///
/// # Arguments
///
/// * `image` - The input image view.
/// * `fx` - The x coordinate of the pixel to interpolate.
/// * `fy` - The y coordinate of the pixel to interpolate.
/// * `out` - The output channel values, with `image.num_channels()` entries.
pub fn bilinear_sample_into(image: &ImageView<'_>, fx: f64, fy: f64, out: &mut [f32]) {
    debug_assert_eq!(out.len(), image.num_channels());

    if !in_sampling_range(image, fx, fy) {
        out.iter_mut().for_each(|v| *v = 0.0);
        return;
    }

    let (cols, rows) = (image.width(), image.height());

    let x0 = fx.floor() as usize;
    let y0 = fy.floor() as usize;
    let x1 = (x0 + 1).min(cols - 1);
    let y1 = (y0 + 1).min(rows - 1);

    let sx = fx - x0 as f64;
    let sy = fy - y0 as f64;
    let (inv_sx, inv_sy) = (1.0 - sx, 1.0 - sy);

    let w00 = inv_sx * inv_sy;
    let w10 = sx * inv_sy;
    let w01 = inv_sx * sy;
    let w11 = sx * sy;

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    for (k, v) in out.iter_mut().enumerate() {
        let blended = p00[k] as f64 * w00
            + p10[k] as f64 * w10
            + p01[k] as f64 * w01
            + p11[k] as f64 * w11;
        *v = blended as f32;
    }
}

/// Sample `image` at `(fx, fy)` with bilinear interpolation.
///
/// Allocating variant of [`bilinear_sample_into`].
///
/// # Returns
///
/// The interpolated channel values, all zero when the position is outside
/// the last valid pixel index on either axis.
///
/// # Example
///
/// ```
/// use uvwarp_image::ImageView;
/// use uvwarp_imgproc::interpolation::bilinear_sample;
///
/// let data = [0.0f32, 1.0, 2.0, 3.0];
/// let image = ImageView::new([2, 2].into(), 1, &data).unwrap();
///
/// assert_eq!(bilinear_sample(&image, 0.5, 0.5), vec![1.5]);
/// assert_eq!(bilinear_sample(&image, 2.0, 0.0), vec![0.0]);
/// ```
pub fn bilinear_sample(image: &ImageView<'_>, fx: f64, fy: f64) -> Vec<f32> {
    let mut out = vec![0.0; image.num_channels()];
    bilinear_sample_into(image, fx, fy, &mut out);
    out
}
