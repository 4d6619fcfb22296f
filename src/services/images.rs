use crate::{
    models::{CategoryImage, CategoryImages},
    services::providers::ImageSearch,
};

/// Keywords behind the `/images` swipe deck, in display order
pub const FOOD_KEYWORDS: [&str; 10] = [
    "burger", "biryani", "sushi", "pizza", "pasta", "steak", "salad", "ramen", "tacos", "dumplings",
];

/// Photos fetched per food keyword
pub const IMAGES_PER_KEYWORD: u32 = 5;

/// Preference taxonomy: category name and the query terms illustrating it
pub const CATEGORY_TAXONOMY: [(&str, &[&str]); 4] = [
    (
        "vibes",
        &[
            "beach", "mountain", "party", "cultural", "museums", "city life", "adventure",
            "relaxing/spa", "remote/nature",
        ],
    ),
    (
        "climate",
        &[
            "tropical", "dry", "temperate", "continental", "polar", "rainy", "snowy", "sunny",
            "humid", "cool",
        ],
    ),
    (
        "ecology",
        &[
            "low carbon footprint",
            "access to nature reserves",
            "public transport friendly",
            "eco-lodges",
            "green hotels",
            "vegetarian",
            "zero-waste cities",
            "clean air",
            "renewable energy",
            "minimal tourism",
        ],
    ),
    (
        "food",
        &[
            "japanese", "italian", "mexican", "indian", "middle eastern", "vegan", "seafood",
            "street food", "local", "wine & cheese", "halal", "kosher",
        ],
    ),
];

/// Collects medium-size image URLs for each keyword, one search at a time
///
/// A keyword whose search fails is logged and skipped.
pub async fn collect_keyword_images(search: &dyn ImageSearch, keywords: &[&str], per_page: u32) -> Vec<String> {
    let mut images = Vec::new();

    for keyword in keywords {
        match search.search(keyword, per_page).await {
            Ok(photos) => images.extend(photos.into_iter().map(|photo| photo.src.medium)),
            Err(e) => {
                tracing::warn!(
                    keyword = %keyword,
                    provider = search.name(),
                    error = %e,
                    "Image search failed, skipping keyword"
                );
            }
        }
    }

    tracing::info!(keywords = keywords.len(), images = images.len(), "Keyword images collected");

    images
}

/// Fetches one illustrative image per query term of each category
///
/// Every category appears in the result. Queries with no photo, or whose
/// search failed, are left out.
pub async fn collect_category_images(
    search: &dyn ImageSearch,
    taxonomy: &[(&str, &[&str])],
) -> CategoryImages {
    let mut catalog = CategoryImages::new();

    for (category, queries) in taxonomy {
        let mut images = Vec::new();

        for query in queries.iter() {
            tracing::info!(category = %category, query = %query, "Fetching category image");

            match search.search(query, 1).await {
                Ok(photos) => match photos.into_iter().next() {
                    Some(photo) => images.push(CategoryImage::from_photo(query, photo)),
                    None => tracing::warn!(query = %query, "No image found"),
                },
                Err(e) => {
                    tracing::warn!(
                        query = %query,
                        provider = search.name(),
                        error = %e,
                        "Failed to fetch category image"
                    );
                }
            }
        }

        catalog.insert(*category, images);
    }

    tracing::info!(images = catalog.image_count(), "Category images collected");

    catalog
}
