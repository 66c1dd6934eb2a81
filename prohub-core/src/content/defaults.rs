//! Rule-based page copy used when no generated record exists for a pair.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::{ContentStatus, Faq, PageContent, Service, Town};

pub const BRAND: &str = "ProHub";

/// Number of quotes a customer can receive per request.
pub const MAX_QUOTES: u32 = 5;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(namePlural|name|town|region|province)\}").unwrap());

/// Substitutes `{name}`, `{namePlural}`, `{town}`, `{region}` and `{province}`.
/// Anything else in braces is left alone.
pub fn fill_template(template: &str, service: &Service, town: &Town) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "name" => service.name.clone(),
            "namePlural" => service.name_plural.clone(),
            "town" => town.name.clone(),
            "region" => town.region.clone(),
            "province" => town.province.clone(),
            other => format!("{{{}}}", other),
        })
        .into_owned()
}

pub fn generate_default_content(service: &Service, town: &Town, now: DateTime<Utc>) -> PageContent {
    let name = service.name.to_lowercase();
    let plural = service.name_plural.to_lowercase();
    let town_name = &town.name;

    PageContent {
        title: fill_template(&service.meta_title, service, town),
        description: fill_template(&service.meta_description, service, town),
        hero_title: fill_template(&service.hero_title, service, town),
        hero_subtitle: fill_template(&service.hero_subtitle, service, town),
        guide_intro: format!(
            "Looking for professional {plural} in {town_name}? You're in the right place. \
             {BRAND} connects you with verified local {plural} who have been vetted for quality and reliability."
        ),
        guide_service_types: format!(
            "{town_name} and the {} area is home to a diverse range of {name} professionals \
             offering services from quick repairs to major installations.",
            town.region
        ),
        guide_diy_vs_pro: format!(
            "Not every {name} job requires a professional. But knowing when to call an expert \
             can save you time, money, and headaches."
        ),
        guide_what_to_expect: format!(
            "When you hire through {BRAND}, you'll receive quotes from up to {MAX_QUOTES} verified \
             {plural} in {town_name}."
        ),
        guide_choosing_provider: format!(
            "Choosing the right {name} in {town_name} doesn't have to be difficult when you know \
             what to look for."
        ),
        faqs: default_faqs(service, town),
        gallery: None,
        status: ContentStatus::Pending,
        last_updated: now,
        approved_at: None,
    }
}

fn default_faqs(service: &Service, town: &Town) -> Vec<Faq> {
    let name = service.name.to_lowercase();
    let plural = service.name_plural.to_lowercase();
    let town_name = &town.name;

    vec![
        Faq {
            question: format!("How much does a {name} cost in {town_name}?"),
            answer: format!(
                "{} costs in {town_name} vary depending on the job type and complexity. \
                 Submit a free request on {BRAND} to get up to {MAX_QUOTES} quotes from local {plural}.",
                service.name
            ),
        },
        Faq {
            question: format!("How do I find a reliable {name} in {town_name}?"),
            answer: format!(
                "{BRAND} matches you with up to {MAX_QUOTES} verified {plural} in {town_name}. \
                 All providers undergo ID verification and business checks, with real customer \
                 reviews tracked publicly."
            ),
        },
        Faq {
            question: format!("Are {BRAND} providers verified?"),
            answer: format!(
                "Yes. Every provider on {BRAND} undergoes ID verification, business registration \
                 checks, and ongoing monitoring of customer reviews and job completion rates."
            ),
        },
        Faq {
            question: format!("Is {BRAND} free to use?"),
            answer: format!(
                "{BRAND} is 100% free for customers. You'll never be charged for submitting a \
                 request or receiving quotes."
            ),
        },
        Faq {
            question: "How quickly will I get quotes?".to_string(),
            answer: "Most customers receive their first quote within 30 minutes. You'll typically \
                     have multiple quotes within 2-4 hours."
                .to_string(),
        },
    ]
}
