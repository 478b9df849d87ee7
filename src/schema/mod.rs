//! Table catalog for the interview dataset.
//!
//! Static description of the queryable tables and their columns. The
//! catalog is built once at startup and shared read-only by every request:
//! it grounds the completion prompt, backs the `/chat/tables` endpoint, and
//! supplies the fallback payload when no query can be formed.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ChatError, Result};

/// Schema for a single table.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub description: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    fn new(name: &str, description: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Render this table as a short schema snippet.
    pub fn render(&self) -> String {
        format!(
            "Table: {}\nDescription: {}\nColumns: {}",
            self.name,
            self.description,
            self.columns.join(", ")
        )
    }
}

/// Catalog of all queryable tables, in a fixed display order.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    tables: Vec<TableSchema>,
}

impl Default for TableCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCatalog {
    /// Build the catalog for the interview dataset.
    pub fn new() -> Self {
        let tables = vec![
            TableSchema::new(
                "interviews",
                "Interview metadata including ID, segment, topic, and date",
                &["interview_id", "segment_id", "topic", "interview_date", "created_at"],
            ),
            TableSchema::new(
                "personas",
                "Persona information for each interview including role, age, gender, and behavior patterns",
                &[
                    "interview_id",
                    "description_th",
                    "role",
                    "age",
                    "gender",
                    "environment",
                    "usage_pattern",
                    "key_drivers",
                    "constraints",
                ],
            ),
            TableSchema::new(
                "themes",
                "Available themes discussed in interviews",
                &["theme_id", "theme_name_th", "theme_name_en", "category", "description"],
            ),
            TableSchema::new(
                "interview_themes",
                "Themes mentioned in each interview with sentiment and quotes",
                &[
                    "interview_id",
                    "theme_name",
                    "sentiment",
                    "confidence",
                    "importance_level",
                    "quote_sample",
                    "theme_id",
                ],
            ),
            TableSchema::new(
                "brands",
                "Brand information",
                &[
                    "brand_id",
                    "brand_name",
                    "brand_name_th",
                    "manufacturer",
                    "brand_type",
                    "market_position",
                ],
            ),
            TableSchema::new(
                "interview_brands",
                "Brands mentioned in interviews with usage details",
                &[
                    "interview_id",
                    "brand_name",
                    "currently_using",
                    "has_used_before",
                    "awareness_level",
                    "satisfaction_score",
                    "brand_id",
                ],
            ),
            TableSchema::new(
                "brand_perceptions",
                "Brand perception data from interviews",
                &[
                    "interview_id",
                    "brand_name",
                    "perception_category",
                    "perception_value",
                    "sentiment",
                    "quote",
                    "brand_id",
                ],
            ),
            TableSchema::new(
                "segments",
                "Customer segments",
                &["segment_id", "segment_name_th", "segment_name_en", "key_focus", "description"],
            ),
            TableSchema::new(
                "transcript_lines",
                "Interview transcript lines",
                &[
                    "transcript_id",
                    "interview_id",
                    "turn_number",
                    "speaker",
                    "text",
                    "timestamp_seconds",
                    "language",
                ],
            ),
        ];

        Self { tables }
    }

    /// All tables in display order.
    pub fn all(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Render the schema snippet for a single table.
    pub fn describe(&self, name: &str) -> Result<String> {
        self.get(name)
            .map(TableSchema::render)
            .ok_or_else(|| ChatError::UnknownTable(name.to_string()).into())
    }

    /// Render the full catalog as grounding text for the completion prompt.
    pub fn as_prompt_text(&self) -> String {
        let mut text = String::from("# Database Schema for Interview Data\n\n## Tables:\n");
        for (i, table) in self.tables.iter().enumerate() {
            text.push_str(&format!(
                "\n### {}. {}\n{}\nColumns: {}\n",
                i + 1,
                table.name,
                table.description,
                table.columns.join(", ")
            ));
        }
        text.push_str(
            "\n## Important Notes:\n\
             - All Thai text fields contain data in Thai language\n\
             - Use JOINs to combine data from multiple tables\n\
             - COUNT(DISTINCT interview_id) for counting unique interviewees\n\
             - Use GROUP BY for aggregations\n\
             - SQLite syntax (no LIMIT without ORDER BY)\n",
        );
        text
    }

    /// Catalog payload for `/chat/tables` and the no-query fallback response.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for table in &self.tables {
            map.insert(
                table.name.clone(),
                json!({
                    "description": table.description,
                    "columns": table.columns,
                }),
            );
        }
        Value::Object(map)
    }
}

/// Sample questions users can ask, grouped for the UI.
pub fn query_suggestions() -> Value {
    json!({
        "suggestions": [
            "มีกี่คนที่สัมภาษณ์?",
            "อายุเฉลี่ยของผู้ให้สัมภาษณ์คือเท่าไร?",
            "แสดงการกระจายตัวของอายุ",
            "มีอาชีพอะไรบ้าง?",
            "Theme ไหนที่ได้รับความนิยมมากที่สุด?",
            "Theme ที่มี sentiment เป็น positive มากที่สุด",
            "Theme ที่มี sentiment เป็น negative มากที่สุด",
            "แบรนด์ไหนที่ผู้ใช้พูดถึงมากที่สุด?",
            "แสดงการกระจายตัวของเพศ",
            "แสดงการกระจายตัวของ sentiment",
        ],
        "categories": {
            "general": [
                "มีกี่คนที่สัมภาษณ์?",
                "อายุเฉลี่ยของผู้ให้สัมภาษณ์คือเท่าไร?",
            ],
            "demographics": [
                "แสดงการกระจายตัวของอายุ",
                "มีอาชีพอะไรบ้าง?",
                "แสดงการกระจายตัวของเพศ",
            ],
            "themes": [
                "Theme ไหนที่ได้รับความนิยมมากที่สุด?",
                "Theme ที่มี sentiment เป็น positive มากที่สุด",
            ],
            "brands": [
                "แบรนด์ไหนที่ผู้ใช้พูดถึงมากที่สุด?",
            ],
        },
    })
}
