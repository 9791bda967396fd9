// src/services/enricher.rs
// DOCUMENTATION: Display-only enrichment
// PURPOSE: Fill description, rating, price range, specialties, atmosphere and
// a phone placeholder for cafés whose source data has none of these

use crate::models::{Amenities, Cafe, PriceRange};
use crate::services::tag_normalizer::NormalizedCafe;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

const DESCRIPTIONS: [&str; 8] = [
    "A cozy neighborhood cafe perfect for coffee lovers and casual meetings.",
    "Charming coffee shop with artisanal brews and a warm, welcoming atmosphere.",
    "Local favorite serving exceptional coffee and light bites in a relaxed setting.",
    "Trendy cafe offering specialty coffee drinks and a comfortable workspace.",
    "Family-owned coffee house with homemade pastries and friendly service.",
    "Modern coffee bar featuring locally roasted beans and creative beverages.",
    "Intimate cafe with a focus on quality coffee and community connection.",
    "Stylish coffee shop perfect for both work and leisure, with great ambiance.",
];

const SPECIALTIES: [&str; 20] = [
    "Espresso",
    "Cappuccino",
    "Latte",
    "Americano",
    "Macchiato",
    "Cold Brew",
    "Iced Coffee",
    "Frappé",
    "Mocha",
    "Flat White",
    "Croissants",
    "Muffins",
    "Scones",
    "Bagels",
    "Sandwiches",
    "Salads",
    "Soups",
    "Pastries",
    "Cakes",
    "Cookies",
];

const ATMOSPHERES: [&str; 10] = [
    "Cozy and intimate",
    "Modern and trendy",
    "Rustic and charming",
    "Bright and airy",
    "Quiet and peaceful",
    "Lively and social",
    "Industrial chic",
    "Bohemian and artistic",
    "Classic and elegant",
    "Casual and relaxed",
];

const AREA_CODES: [&str; 4] = ["555", "123", "456", "789"];

const MIN_RATING: f64 = 3.5;
const MAX_RATING: f64 = 5.0;

/// Enricher
/// DOCUMENTATION: All draws come from the generator passed in, so a seeded
/// StdRng pins every field. Production fetches use a fresh OS-seeded generator
pub struct Enricher;

impl Enricher {
    /// Complete a normalized café into a full Cafe record
    pub fn enrich<R: Rng + ?Sized>(normalized: NormalizedCafe, distance: u32, rng: &mut R) -> Cafe {
        let description = Self::description(&normalized.amenities, rng);
        let price_range = Self::price_range(rng);
        let rating = Self::rating(rng);
        let specialties = Self::specialties(rng);
        let atmosphere = Self::atmosphere(rng);

        let (phone, phone_is_synthetic) = match normalized.phone {
            Some(phone) => (phone, false),
            None => (Self::synthetic_phone(rng), true),
        };

        Cafe {
            id: normalized.id,
            name: normalized.name,
            address: normalized.address,
            phone,
            phone_is_synthetic,
            website: normalized.website,
            email: normalized.email,
            lat: normalized.lat,
            lng: normalized.lng,
            distance,
            opening_hours: normalized.opening_hours,
            is_open: normalized.is_open,
            amenities: normalized.amenities,
            tags: normalized.tags,
            cuisine: normalized.cuisine,
            rating,
            price_range,
            description,
            specialties,
            atmosphere,
        }
    }

    /// Canned description plus a clause listing wifi/outdoor/takeaway/wheelchair
    pub fn description<R: Rng + ?Sized>(amenities: &Amenities, rng: &mut R) -> String {
        let mut description = DESCRIPTIONS
            .choose(rng)
            .copied()
            .unwrap_or(DESCRIPTIONS[0])
            .to_string();

        let mut features = Vec::new();
        if amenities.wifi {
            features.push("Free WiFi available");
        }
        if amenities.outdoor_seating {
            features.push("outdoor seating");
        }
        if amenities.takeaway {
            features.push("takeaway options");
        }
        if amenities.wheelchair {
            features.push("wheelchair accessible");
        }

        if !features.is_empty() {
            description.push_str(&format!(" Features include {}.", features.join(", ")));
        }

        description
    }

    pub fn price_range<R: Rng + ?Sized>(rng: &mut R) -> PriceRange {
        PriceRange::ALL[rng.random_range(0..PriceRange::ALL.len())]
    }

    /// Uniform in [3.5, 5.0], one decimal
    pub fn rating<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        let raw = MIN_RATING + rng.random::<f64>() * (MAX_RATING - MIN_RATING);
        ((raw * 10.0).round() / 10.0).clamp(MIN_RATING, MAX_RATING)
    }

    /// Placeholder shaped like `(555) 123-4567`
    pub fn synthetic_phone<R: Rng + ?Sized>(rng: &mut R) -> String {
        let area_code = AREA_CODES[rng.random_range(0..AREA_CODES.len())];
        let number: u32 = rng.random_range(1_000_000..=9_999_999);
        format!("({}) {:03}-{:04}", area_code, number / 10_000, number % 10_000)
    }

    /// 3 to 7 distinct entries from the specialty vocabulary
    pub fn specialties<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
        let count = rng.random_range(3..=7);
        let mut pool = SPECIALTIES.to_vec();
        pool.shuffle(rng);
        pool.into_iter().take(count).map(str::to_string).collect()
    }

    pub fn atmosphere<R: Rng + ?Sized>(rng: &mut R) -> String {
        ATMOSPHERES
            .choose(rng)
            .copied()
            .unwrap_or(ATMOSPHERES[0])
            .to_string()
    }
}
