use serde::{Deserialize, Serialize};

/// Placeholder a host uses when nothing is selected.
pub const UNSET: &str = "NONE";

/// Which images and UV layers an extraction reads and writes.
///
/// The host keeps this alongside its scene and passes it in explicitly.
///
/// # Example
///
/// ```
/// use uvwarp::ExtractionConfig;
///
/// let config = ExtractionConfig::new("photo.png", "atlas.png", "UVProjected", "UVAtlas");
/// assert!(config.images_selected());
/// assert!(!ExtractionConfig::default().images_selected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Image the patches are read from.
    pub source_image: String,
    /// Image the patches are written into.
    pub destination_image: String,
    /// UV layer locating each face in the source image.
    pub source_uv_layer: String,
    /// UV layer locating each face in the destination image.
    pub destination_uv_layer: String,
}

impl ExtractionConfig {
    /// Create a configuration from the four selections.
    pub fn new(
        source_image: impl Into<String>,
        destination_image: impl Into<String>,
        source_uv_layer: impl Into<String>,
        destination_uv_layer: impl Into<String>,
    ) -> Self {
        Self {
            source_image: source_image.into(),
            destination_image: destination_image.into(),
            source_uv_layer: source_uv_layer.into(),
            destination_uv_layer: destination_uv_layer.into(),
        }
    }

    /// Whether both image names are set.
    pub fn images_selected(&self) -> bool {
        is_set(&self.source_image) && is_set(&self.destination_image)
    }
}

fn is_set(name: &str) -> bool {
    !name.is_empty() && name != UNSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_names() {
        let mut config = ExtractionConfig::new("a", "b", "uv", "uv");
        assert!(config.images_selected());

        config.destination_image = UNSET.to_string();
        assert!(!config.images_selected());

        config.destination_image.clear();
        assert!(!config.images_selected());
    }

    #[test]
    fn json_roundtrip() -> Result<(), serde_json::Error> {
        let config = ExtractionConfig::new("src", "dst", "UVMap", "Atlas");
        let json = serde_json::to_string(&config)?;
        assert!(json.contains("\"source_uv_layer\":\"UVMap\""));
        let back: ExtractionConfig = serde_json::from_str(&json)?;
        assert_eq!(back, config);
        Ok(())
    }
}
