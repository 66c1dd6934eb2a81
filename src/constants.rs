/// Slug and lookup constants shared by the directory layer.
///
/// SEO pages use singular service slugs; the provider directory stores plural
/// or otherwise variant category slugs. This is the only translation table.
use prohub_core::Catalog;

/// Provider cards shown on a service-town page.
pub const MAX_MATCHED_PROVIDERS: usize = 3;

/// Reviews shown on a service-town page.
pub const REVIEW_LIMIT: usize = 6;

/// Related blog posts shown on a service-town page.
pub const POST_LIMIT: usize = 3;

// SEO slug -> directory category slug. Slugs not listed map to themselves.
const CATEGORY_SLUGS: &[(&str, &str)] = &[
    ("plumber", "plumbers"),
    ("electrician", "electricians"),
    ("cleaning-service", "cleaning-services"),
    ("garden-service", "garden-services"),
    ("painter", "painters"),
    ("solar-installer", "solar-installers"),
    ("aircon", "air-conditioning"),
    ("geyser-service", "geyser-services"),
    ("pool-service", "pool-services"),
    ("gate-motor-repair", "gate-motor-repairs"),
    ("garage-door", "garage-doors"),
    ("moving-service", "moving-services"),
];

/// Convert an SEO service slug to the category slug used by the directory
pub fn seo_slug_to_category_slug(seo_slug: &str) -> String {
    CATEGORY_SLUGS
        .iter()
        .find(|(seo, _)| *seo == seo_slug)
        .map(|(_, category)| category.to_string())
        .unwrap_or_else(|| seo_slug.to_string())
}

/// The directory region name for a town.
///
/// Regions are named after towns ("Mossel Bay"), so the catalog's display name
/// is used when the town is known and the title-cased slug otherwise.
pub fn region_name_for_town(catalog: &Catalog, town_slug: &str) -> String {
    match catalog.town(town_slug) {
        Some(town) => town.name.clone(),
        None => title_case_slug(town_slug),
    }
}

/// "mossel-bay" -> "Mossel Bay"
pub fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
