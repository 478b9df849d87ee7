//! Rule-based SQL generator.
//!
//! A fixed, ordered list of keyword checks against the lower-cased
//! question, each emitting a canned query template. The first matching
//! rule wins; evaluation order is the only tie-break, so behavior is
//! fully deterministic. No question text is ever interpolated into SQL.
//!
//! Keyword sets cover both the English forms and the Thai forms used by
//! the suggested-question catalog, so the sample questions resolve on
//! this path when no completion service is configured.

use super::types::CandidateQuery;

const COUNT_INTERVIEWS: &str = "SELECT COUNT(*) as total_interviews FROM interviews";
const COUNT_PERSONAS: &str = "SELECT COUNT(*) as total_personas FROM personas";
const COUNT_THEMES: &str = "SELECT COUNT(*) as total_themes FROM themes";
const COUNT_BRANDS: &str = "SELECT COUNT(*) as total_brands FROM brands";

const AVERAGE_AGE: &str = "SELECT AVG(age) as average_age FROM personas WHERE age IS NOT NULL";

const AGE_DISTRIBUTION: &str = "\
SELECT
    CASE
        WHEN age < 25 THEN '18-24'
        WHEN age < 35 THEN '25-34'
        WHEN age < 45 THEN '35-44'
        WHEN age < 55 THEN '45-54'
        ELSE '55+'
    END as age_group,
    COUNT(*) as count
FROM personas
WHERE age IS NOT NULL
GROUP BY age_group
ORDER BY age_group";

const AGE_LISTING: &str =
    "SELECT interview_id, role, age FROM personas WHERE age IS NOT NULL ORDER BY age";

const ROLE_COUNTS: &str =
    "SELECT role, COUNT(*) as count FROM personas GROUP BY role ORDER BY count DESC";

const THEMES_POSITIVE: &str = "\
SELECT t.theme_name_th, COUNT(*) as mention_count
FROM interview_themes it
JOIN themes t ON it.theme_id = t.theme_id
WHERE it.sentiment = 'Positive'
GROUP BY t.theme_id
ORDER BY mention_count DESC
LIMIT 10";

const THEMES_NEGATIVE: &str = "\
SELECT t.theme_name_th, COUNT(*) as mention_count
FROM interview_themes it
JOIN themes t ON it.theme_id = t.theme_id
WHERE it.sentiment = 'Negative'
GROUP BY t.theme_id
ORDER BY mention_count DESC
LIMIT 10";

const THEMES_TOP: &str = "\
SELECT t.theme_name_th, COUNT(*) as mention_count
FROM interview_themes it
JOIN themes t ON it.theme_id = t.theme_id
GROUP BY t.theme_id
ORDER BY mention_count DESC
LIMIT 10";

const THEMES_LIST: &str = "SELECT theme_id, theme_name_th, theme_name_en FROM themes ORDER BY theme_id";

const BRANDS_TOP: &str = "\
SELECT b.brand_name, COUNT(DISTINCT ib.interview_id) as user_count
FROM interview_brands ib
JOIN brands b ON ib.brand_id = b.brand_id
GROUP BY b.brand_id
ORDER BY user_count DESC
LIMIT 10";

const BRANDS_LIST: &str = "SELECT brand_id, brand_name, brand_name_th FROM brands ORDER BY brand_name";

const SENTIMENT_DISTRIBUTION: &str = "\
SELECT sentiment, COUNT(*) as count
FROM interview_themes
GROUP BY sentiment
ORDER BY count DESC";

const GENDER_DISTRIBUTION: &str =
    "SELECT gender, COUNT(*) as count FROM personas WHERE gender IS NOT NULL GROUP BY gender";

/// Deterministic keyword-to-template SQL generator.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedGenerator;

impl RuleBasedGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a canned query for a recognized question shape.
    ///
    /// Returns `None` when no rule matches; that is a valid negative
    /// result, not an error.
    pub fn generate(&self, question: &str) -> Option<CandidateQuery> {
        let q = question.to_lowercase();

        // Count queries per entity
        if contains_any(&q, &["how many", "count", "กี่", "จำนวน"]) {
            if contains_any(&q, &["interview", "สัมภาษณ์"]) {
                return Some(CandidateQuery::from_rule(COUNT_INTERVIEWS));
            }
            if q.contains("persona") {
                return Some(CandidateQuery::from_rule(COUNT_PERSONAS));
            }
            if q.contains("theme") {
                return Some(CandidateQuery::from_rule(COUNT_THEMES));
            }
            if contains_any(&q, &["brand", "แบรนด์"]) {
                return Some(CandidateQuery::from_rule(COUNT_BRANDS));
            }
        }

        // Age queries
        if contains_any(&q, &["age", "อายุ"]) {
            if contains_any(&q, &["average", "avg", "เฉลี่ย"]) {
                return Some(CandidateQuery::from_rule(AVERAGE_AGE));
            }
            if contains_any(&q, &["distribution", "กระจาย"]) {
                return Some(CandidateQuery::from_rule(AGE_DISTRIBUTION));
            }
            return Some(CandidateQuery::from_rule(AGE_LISTING));
        }

        // Role queries
        if contains_any(&q, &["role", "occupation", "อาชีพ"]) {
            return Some(CandidateQuery::from_rule(ROLE_COUNTS));
        }

        // Theme queries
        if q.contains("theme") {
            if q.contains("positive") {
                return Some(CandidateQuery::from_rule(THEMES_POSITIVE));
            }
            if q.contains("negative") {
                return Some(CandidateQuery::from_rule(THEMES_NEGATIVE));
            }
            if contains_any(&q, &["top", "most", "นิยม", "มากที่สุด"]) {
                return Some(CandidateQuery::from_rule(THEMES_TOP));
            }
            return Some(CandidateQuery::from_rule(THEMES_LIST));
        }

        // Brand queries
        if contains_any(&q, &["brand", "แบรนด์"]) {
            if contains_any(&q, &["top", "most", "popular", "พูดถึง", "มากที่สุด"]) {
                return Some(CandidateQuery::from_rule(BRANDS_TOP));
            }
            return Some(CandidateQuery::from_rule(BRANDS_LIST));
        }

        // Sentiment distribution
        if q.contains("sentiment") {
            return Some(CandidateQuery::from_rule(SENTIMENT_DISTRIBUTION));
        }

        // Gender distribution
        if contains_any(&q, &["gender", "เพศ"]) {
            return Some(CandidateQuery::from_rule(GENDER_DISTRIBUTION));
        }

        None
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
