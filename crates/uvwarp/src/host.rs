use std::collections::BTreeMap;

use uvwarp_image::{ImageBuffer, ImageView};

/// Errors reported by a [`TextureHost`].
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum HostError {
    /// The host could not store the pixels of an image.
    #[error("Cannot write image '{image}': {reason}")]
    CommitFailed {
        /// Image that was being written.
        image: String,
        /// Host specific explanation.
        reason: String,
    },
}

/// The application side of an extraction.
///
/// A host owns the images and the mesh. It lists what can be picked, hands
/// out pixel buffers and the UV loops of the selected faces, and accepts the
/// final destination pixels in a single write.
pub trait TextureHost {
    /// Names of the images available for selection.
    fn image_names(&self) -> Vec<String>;

    /// Names of the UV layers of the active mesh.
    fn uv_layer_names(&self) -> Vec<String>;

    /// Borrow the pixels of an image, `None` when it does not exist.
    fn image(&self, name: &str) -> Option<ImageView<'_>>;

    /// UV loops of the selected faces in `layer`, one entry per face in a
    /// stable face order. Faces keep their own arity; `None` when the layer
    /// does not exist.
    fn selected_face_uvs(&self, layer: &str) -> Option<Vec<Vec<[f64; 2]>>>;

    /// Replace all pixels of an image.
    fn commit_image(&mut self, name: &str, pixels: &[f32]) -> Result<(), HostError>;
}

/// A host keeping everything in memory.
///
/// Useful to drive extractions outside of an editor and in tests.
///
/// # Example
///
/// ```
/// use uvwarp::{InMemoryHost, TextureHost};
/// use uvwarp::image::ImageBuffer;
///
/// let mut host = InMemoryHost::default();
/// host.insert_image("atlas", ImageBuffer::from_size_val([8, 8].into(), 4, 0.0).unwrap());
/// host.insert_uv_layer("UVMap", vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
///
/// assert_eq!(host.image_names(), vec!["atlas".to_string()]);
/// assert_eq!(host.selected_face_uvs("UVMap").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    images: BTreeMap<String, ImageBuffer>,
    uv_layers: BTreeMap<String, Vec<Vec<[f64; 2]>>>,
}

impl InMemoryHost {
    /// Add or replace an image.
    pub fn insert_image(&mut self, name: impl Into<String>, image: ImageBuffer) {
        self.images.insert(name.into(), image);
    }

    /// Add or replace a UV layer given the loops of its selected faces.
    pub fn insert_uv_layer(&mut self, name: impl Into<String>, faces: Vec<Vec<[f64; 2]>>) {
        self.uv_layers.insert(name.into(), faces);
    }

    /// Get an image by name.
    pub fn get_image(&self, name: &str) -> Option<&ImageBuffer> {
        self.images.get(name)
    }
}

impl TextureHost for InMemoryHost {
    fn image_names(&self) -> Vec<String> {
        self.images.keys().cloned().collect()
    }

    fn uv_layer_names(&self) -> Vec<String> {
        self.uv_layers.keys().cloned().collect()
    }

    fn image(&self, name: &str) -> Option<ImageView<'_>> {
        self.images.get(name).map(|image| image.view())
    }

    fn selected_face_uvs(&self, layer: &str) -> Option<Vec<Vec<[f64; 2]>>> {
        self.uv_layers.get(layer).cloned()
    }

    fn commit_image(&mut self, name: &str, pixels: &[f32]) -> Result<(), HostError> {
        let image = self
            .images
            .get_mut(name)
            .ok_or_else(|| HostError::CommitFailed {
                image: name.to_string(),
                reason: "unknown image".to_string(),
            })?;

        if image.as_slice().len() != pixels.len() {
            return Err(HostError::CommitFailed {
                image: name.to_string(),
                reason: format!(
                    "expected {} samples, got {}",
                    image.as_slice().len(),
                    pixels.len()
                ),
            });
        }

        image.as_slice_mut().copy_from_slice(pixels);
        Ok(())
    }
}
