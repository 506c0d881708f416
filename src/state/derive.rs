/// Derived views over loaded collections
///
/// Pure functions only: no I/O, no mutation of inputs. Screens call
/// these on every render, so everything here is cheap filters and
/// projections, unit-tested without any network.

use crate::state::data::{Photo, Work};

/// Active category filter on a gallery
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show everything
    #[default]
    All,
    /// Show items whose category slug matches
    Slug(String),
}

/// Anything that carries a denormalized category slug
pub trait Categorized {
    fn category_slug(&self) -> Option<&str>;
}

impl Categorized for Photo {
    fn category_slug(&self) -> Option<&str> {
        self.category_slug.as_deref()
    }
}

impl Categorized for Work {
    fn category_slug(&self) -> Option<&str> {
        self.category_slug.as_deref()
    }
}

/// Apply a category filter, preserving relative order.
pub fn filter_by_category<'a, T: Categorized>(
    items: &'a [T],
    filter: &CategoryFilter,
) -> Vec<&'a T> {
    match filter {
        CategoryFilter::All => items.iter().collect(),
        CategoryFilter::Slug(slug) => items
            .iter()
            .filter(|item| item.category_slug() == Some(slug.as_str()))
            .collect(),
    }
}

/// Photos not assigned to any work.
pub fn unassigned(photos: &[Photo]) -> Vec<&Photo> {
    photos.iter().filter(|photo| photo.work_id.is_none()).collect()
}

/// Photos assigned to one work, in their stored order.
pub fn for_work(photos: &[Photo], work_id: i64) -> Vec<&Photo> {
    photos
        .iter()
        .filter(|photo| photo.work_id == Some(work_id))
        .collect()
}

/// Distinct non-empty category slugs, in first-seen order.
pub fn distinct_categories<T: Categorized>(items: &[T]) -> Vec<String> {
    let mut seen = Vec::new();
    for item in items {
        if let Some(slug) = item.category_slug() {
            if !slug.is_empty() && !seen.iter().any(|s| s == slug) {
                seen.push(slug.to_string());
            }
        }
    }
    seen
}

/// Featured photos only.
pub fn featured(photos: &[Photo]) -> Vec<&Photo> {
    photos.iter().filter(|photo| photo.is_featured).collect()
}

/// One tile in the public gallery grid.
///
/// Normally projected from works (cover photo + count); falls back to
/// plain photos when no works exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub category_slug: Option<String>,
    /// Set when the card opens a work gallery; None opens a lightbox
    pub work_id: Option<i64>,
    pub photo_count: i64,
}

impl Categorized for GalleryCard {
    fn category_slug(&self) -> Option<&str> {
        self.category_slug.as_deref()
    }
}

/// Project works into gallery cards. Works without a cover photo have
/// nothing to show and are skipped.
pub fn work_cards(works: &[Work]) -> Vec<GalleryCard> {
    works
        .iter()
        .filter_map(|work| {
            let url = work.cover_photo_url.clone()?;
            Some(GalleryCard {
                id: work.id,
                title: work.title.clone(),
                url,
                category_slug: work.category_slug.clone(),
                work_id: Some(work.id),
                photo_count: work.photo_count,
            })
        })
        .collect()
}

/// Project individual photos into gallery cards (fallback when no
/// works are published).
pub fn photo_cards(photos: &[Photo]) -> Vec<GalleryCard> {
    photos
        .iter()
        .map(|photo| GalleryCard {
            id: photo.id,
            title: photo.title.clone(),
            url: photo.url.clone(),
            category_slug: photo.category_slug.clone(),
            work_id: photo.work_id,
            photo_count: 0,
        })
        .collect()
}

/// Dashboard statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_photos: usize,
    pub featured_photos: usize,
    pub categories: usize,
    pub total_works: usize,
    pub unassigned_photos: usize,
}

/// Compute the admin dashboard tiles from the loaded collections.
pub fn stats(photos: &[Photo], works: &[Work]) -> Stats {
    let mut names: Vec<&str> = Vec::new();
    for photo in photos {
        if let Some(name) = photo.category_name.as_deref() {
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
    }

    Stats {
        total_photos: photos.len(),
        featured_photos: featured(photos).len(),
        categories: names.len(),
        total_works: works.len(),
        unassigned_photos: unassigned(photos).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: i64, slug: Option<&str>, work_id: Option<i64>, featured: bool) -> Photo {
        Photo {
            id,
            title: format!("photo {}", id),
            description: None,
            url: format!("https://cdn.example/{}.jpg", id),
            category_id: None,
            category_name: slug.map(|s| s.to_string()),
            category_slug: slug.map(|s| s.to_string()),
            work_id,
            is_featured: featured,
            order: 0,
            created_at: None,
        }
    }

    fn work(id: i64, cover: Option<&str>, count: i64) -> Work {
        Work {
            id,
            title: format!("work {}", id),
            description: None,
            category_id: None,
            category_name: None,
            category_slug: Some("sessions".to_string()),
            cover_photo_url: cover.map(|c| c.to_string()),
            is_featured: false,
            photo_count: count,
        }
    }

    #[test]
    fn test_filter_all_is_identity() {
        let photos = vec![
            photo(1, Some("sessions"), None, false),
            photo(2, None, None, false),
            photo(3, Some("events"), None, false),
        ];
        let filtered = filter_by_category(&photos, &CategoryFilter::All);
        assert_eq!(filtered.len(), 3);
        // Relative order preserved
        assert_eq!(filtered[0].id, 1);
        assert_eq!(filtered[2].id, 3);
    }

    #[test]
    fn test_filter_by_slug_keeps_only_matches_in_order() {
        let photos = vec![
            photo(1, Some("events"), None, false),
            photo(2, Some("sessions"), None, false),
            photo(3, Some("events"), None, false),
            photo(4, None, None, false),
        ];
        let filter = CategoryFilter::Slug("events".to_string());
        let filtered = filter_by_category(&photos, &filter);
        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_for_work_and_unassigned_partition_photos() {
        let photos = vec![
            photo(1, None, Some(10), false),
            photo(2, None, None, false),
            photo(3, None, Some(10), false),
            photo(4, None, Some(11), false),
            photo(5, None, None, false),
        ];

        let in_ten = for_work(&photos, 10);
        let loose = unassigned(&photos);

        // No photo appears in both sets
        for p in &in_ten {
            assert!(!loose.iter().any(|q| q.id == p.id));
        }
        // Together with the other work they cover everything exactly once
        let total = in_ten.len() + for_work(&photos, 11).len() + loose.len();
        assert_eq!(total, photos.len());
    }

    #[test]
    fn test_distinct_categories_dedupes_and_skips_empty() {
        let photos = vec![
            photo(1, Some("events"), None, false),
            photo(2, Some(""), None, false),
            photo(3, Some("sessions"), None, false),
            photo(4, Some("events"), None, false),
            photo(5, None, None, false),
        ];
        assert_eq!(distinct_categories(&photos), vec!["events", "sessions"]);
    }

    #[test]
    fn test_work_cards_skip_missing_covers() {
        let works = vec![
            work(1, Some("https://cdn.example/c1.jpg"), 4),
            work(2, None, 0),
            work(3, Some("https://cdn.example/c3.jpg"), 1),
        ];
        let cards = work_cards(&works);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].work_id, Some(1));
        assert_eq!(cards[0].photo_count, 4);
    }

    #[test]
    fn test_stats_counts() {
        let photos = vec![
            photo(1, Some("events"), Some(10), true),
            photo(2, Some("events"), None, false),
            photo(3, Some("sessions"), None, true),
        ];
        let works = vec![work(10, None, 1)];

        let stats = stats(&photos, &works);
        assert_eq!(stats.total_photos, 3);
        assert_eq!(stats.featured_photos, 2);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.total_works, 1);
        assert_eq!(stats.unassigned_photos, 2);
    }
}
