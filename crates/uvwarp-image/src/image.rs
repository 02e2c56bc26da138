use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use uvwarp_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }

    /// Whether the size covers no pixel at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

// validates the flat layout shared by the owned buffer and the views
fn check_layout(size: ImageSize, channels: usize, len: usize) -> Result<(), ImageError> {
    if channels == 0 {
        return Err(ImageError::InvalidChannelCount(channels));
    }

    let expected = size.num_pixels() * channels;
    if len != expected {
        return Err(ImageError::InvalidChannelShape(len, expected));
    }

    Ok(())
}

#[inline]
fn pixel_offset(size: ImageSize, channels: usize, x: usize, y: usize) -> usize {
    (y * size.width + x) * channels
}

fn check_pixel(size: ImageSize, x: usize, y: usize) -> Result<(), ImageError> {
    if x >= size.width || y >= size.height {
        return Err(ImageError::PixelIndexOutOfBounds(x, y, size.width, size.height));
    }
    Ok(())
}

/// An owned image with a runtime number of channels.
///
/// The pixel data is a flat row-major, channel-interleaved `Vec<f32>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    size: ImageSize,
    channels: usize,
    data: Vec<f32>,
}

impl ImageBuffer {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels per pixel.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, or the
    /// number of channels is zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use uvwarp_image::{ImageBuffer, ImageSize};
    ///
    /// let image = ImageBuffer::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     4,
    ///     vec![0.0f32; 10 * 20 * 4],
    /// ).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// assert_eq!(image.num_channels(), 4);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        check_layout(size, channels, data.len())?;
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new image with the given size and every sample set to `val`.
    pub fn from_size_val(size: ImageSize, channels: usize, val: f32) -> Result<Self, ImageError> {
        Self::new(size, channels, vec![val; size.num_pixels() * channels])
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image and return the pixel data.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Borrow the image as a read-only view.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            size: self.size,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// Borrow the image as a mutable view.
    pub fn view_mut(&mut self) -> ImageViewMut<'_> {
        ImageViewMut {
            size: self.size,
            channels: self.channels,
            data: &mut self.data,
        }
    }

    /// Get the channel values of the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<&[f32], ImageError> {
        check_pixel(self.size, x, y)?;
        let base = pixel_offset(self.size, self.channels, x, y);
        Ok(&self.data[base..base + self.channels])
    }

    /// Overwrite the channel values of the pixel at `(x, y)`.
    ///
    /// `values` must hold exactly `num_channels()` samples.
    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[f32]) -> Result<(), ImageError> {
        check_pixel(self.size, x, y)?;
        if values.len() != self.channels {
            return Err(ImageError::InvalidChannelShape(values.len(), self.channels));
        }
        let base = pixel_offset(self.size, self.channels, x, y);
        self.data[base..base + self.channels].copy_from_slice(values);
        Ok(())
    }
}

/// A read-only view over a caller-owned pixel buffer.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    size: ImageSize,
    channels: usize,
    data: &'a [f32],
}

impl<'a> ImageView<'a> {
    /// Wrap a flat, row-major, channel-interleaved slice.
    ///
    /// # Errors
    ///
    /// Fails if `data.len() != width * height * channels` or `channels == 0`.
    pub fn new(size: ImageSize, channels: usize, data: &'a [f32]) -> Result<Self, ImageError> {
        check_layout(size, channels, data.len())?;
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Whether the view holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Get the channel values of the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<&'a [f32], ImageError> {
        check_pixel(self.size, x, y)?;
        Ok(self.pixel(x, y))
    }

    /// Channel values of the pixel at `(x, y)` without the bounds error.
    ///
    /// PRECONDITION: `x < width` and `y < height`; panics otherwise.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [f32] {
        let base = pixel_offset(self.size, self.channels, x, y);
        &self.data[base..base + self.channels]
    }

    /// Copy the viewed pixels into an owned buffer.
    pub fn to_buffer(&self) -> ImageBuffer {
        ImageBuffer {
            size: self.size,
            channels: self.channels,
            data: self.data.to_vec(),
        }
    }
}

/// A mutable view over a caller-owned pixel buffer.
#[derive(Debug)]
pub struct ImageViewMut<'a> {
    size: ImageSize,
    channels: usize,
    data: &'a mut [f32],
}

impl<'a> ImageViewMut<'a> {
    /// Wrap a flat, row-major, channel-interleaved mutable slice.
    ///
    /// # Errors
    ///
    /// Fails if `data.len() != width * height * channels` or `channels == 0`.
    pub fn new(size: ImageSize, channels: usize, data: &'a mut [f32]) -> Result<Self, ImageError> {
        check_layout(size, channels, data.len())?;
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Whether the view holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[f32] {
        &*self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut *self.data
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            size: self.size,
            channels: self.channels,
            data: &*self.data,
        }
    }

    /// Mutable channel values of the pixel at `(x, y)`.
    ///
    /// PRECONDITION: `x < width` and `y < height`; panics otherwise.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let base = pixel_offset(self.size, self.channels, x, y);
        &mut self.data[base..base + self.channels]
    }
}
