// src/services/local_search.rs
// DOCUMENTATION: Name search over an already-fetched café set
// PURPOSE: Case-insensitive substring match without touching the network

use crate::models::Cafe;

/// Local search engine
pub struct LocalSearchEngine;

impl LocalSearchEngine {
    /// Keep cafés whose name, description, any specialty or any tag contains `term`
    /// DOCUMENTATION: Blank terms return the input unchanged. Matching is
    /// case-insensitive on the trimmed term and keeps input order
    pub fn filter_by_name(cafes: &[Cafe], term: &str) -> Vec<Cafe> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return cafes.to_vec();
        }

        cafes
            .iter()
            .filter(|cafe| Self::matches(cafe, &term))
            .cloned()
            .collect()
    }

    /// `term` must already be lowercased
    fn matches(cafe: &Cafe, term: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(term);

        contains(&cafe.name)
            || contains(&cafe.description)
            || cafe.specialties.iter().any(|s| contains(s))
            || cafe.tags.iter().any(|t| contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::cafe;

    fn sample() -> Vec<Cafe> {
        let mut blue = cafe(1, "Blue Bottle Coffee", 40);
        blue.description = "Modern coffee bar featuring locally roasted beans.".to_string();

        let mut tea = cafe(2, "Mariage Frères", 90);
        tea.description = "Tea salon".to_string();
        tea.specialties = vec!["Cold Brew".to_string(), "Scones".to_string()];
        tea.tags = vec!["tea".to_string(), "wheelchair accessible".to_string()];

        let mut bakery = cafe(3, "Du Pain et des Idées", 300);
        bakery.description = "Bakery".to_string();
        bakery.specialties = vec!["Croissants".to_string()];
        bakery.tags = vec![];

        vec![blue, tea, bakery]
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let cafes = sample();
        for term in ["blue", "BOTTLE", "coffee", "  Blue Bottle  "] {
            let found = LocalSearchEngine::filter_by_name(&cafes, term);
            assert!(found.iter().any(|c| c.id == 1), "term {:?}", term);
        }
        assert!(LocalSearchEngine::filter_by_name(&cafes, "xyz").is_empty());
    }

    #[test]
    fn test_blank_term_is_identity() {
        let cafes = sample();
        assert_eq!(LocalSearchEngine::filter_by_name(&cafes, ""), cafes);
        assert_eq!(LocalSearchEngine::filter_by_name(&cafes, "   \t"), cafes);
    }

    #[test]
    fn test_matches_specialties_and_tags() {
        let cafes = sample();

        let ids: Vec<i64> = LocalSearchEngine::filter_by_name(&cafes, "croissant")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![3]);

        let ids: Vec<i64> = LocalSearchEngine::filter_by_name(&cafes, "WHEELCHAIR")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_results_keep_distance_order() {
        let cafes = sample();
        // "scones" is a default fixture specialty (id 1) and a tea salon specialty (id 2)
        let found = LocalSearchEngine::filter_by_name(&cafes, "scones");
        let distances: Vec<u32> = found.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![40, 90]);
    }
}
