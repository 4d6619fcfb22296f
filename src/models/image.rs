use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

// ============================================================================
// Pexels API Types
// ============================================================================

/// Raw response from GET /v1/search
#[derive(Debug, Clone, Deserialize)]
pub struct PexelsSearchResponse {
    #[serde(default)]
    pub photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PexelsPhoto {
    #[serde(default)]
    pub alt: Option<String>,
    pub photographer: String,
    pub photographer_url: String,
    pub src: PexelsPhotoSource,
}

/// Image URLs per size; only the sizes we serve are decoded
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PexelsPhotoSource {
    pub original: String,
    pub medium: String,
}

// ============================================================================
// Category image catalog
// ============================================================================

/// One illustrative photo for a taxonomy query term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryImage {
    pub query: String,
    pub image_url: String,
    pub description: String,
    pub photographer: String,
    pub photographer_url: String,
}

impl CategoryImage {
    pub fn from_photo(query: &str, photo: PexelsPhoto) -> Self {
        Self {
            query: query.to_string(),
            image_url: photo.src.original,
            description: photo.alt.unwrap_or_default(),
            photographer: photo.photographer,
            photographer_url: photo.photographer_url,
        }
    }
}

/// Category name to images, serialized as a JSON object in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryImages {
    entries: Vec<(String, Vec<CategoryImage>)>,
}

impl CategoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, images: Vec<CategoryImage>) {
        self.entries.push((category.into(), images));
    }

    pub fn get(&self, category: &str) -> Option<&[CategoryImage]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, images)| images.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of images across all categories
    pub fn image_count(&self) -> usize {
        self.entries.iter().map(|(_, images)| images.len()).sum()
    }
}

impl Serialize for CategoryImages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, images) in &self.entries {
            map.serialize_entry(category, images)?;
        }
        map.end()
    }
}
