//! Response assembler: composes the final chat payload.

use serde_json::Value;

use crate::schema::TableCatalog;

use super::types::{CandidateQuery, ChatResponse, ResultSet};

/// Rows enumerated in the templated narrative preview.
const NARRATIVE_ROWS: usize = 10;

/// Guidance response for the no-query-found outcome: suggested question
/// shapes plus the full table catalog. No query, no data.
pub fn assemble_no_query(ai_configured: bool, catalog: &TableCatalog) -> ChatResponse {
    let mode = if ai_configured {
        "🤖 AI-Powered"
    } else {
        "📋 Rule-Based"
    };

    let response = format!(
        "{}\n\nฉันไม่เข้าใจคำถามของคุณ กรุณาลองถามใหม่ เช่น:\n\
         - มีกี่คนที่สัมภาษณ์?\n\
         - อายุเฉลี่ยของผู้ให้สัมภาษณ์คือเท่าไร?\n\
         - Theme ไหนที่ได้รับความนิยมมากที่สุด?\n\
         - แบรนด์ไหนที่ผู้ใช้พูดถึงมากที่สุด?\n\
         - แสดงการกระจายตัวของอายุ\n\
         - Theme ที่มี sentiment เป็น positive มากที่สุด",
        mode
    );

    ChatResponse {
        response,
        sql_query: None,
        data: None,
        table_info: Some(catalog.to_json()),
        report: None,
    }
}

/// Response for a query that executed but matched nothing. The reporter
/// is never consulted here; there is no grounding data to summarize.
pub fn assemble_empty(candidate: &CandidateQuery) -> ChatResponse {
    ChatResponse {
        response: "ไม่พบข้อมูลที่ตรงกับคำถามของคุณ".to_string(),
        sql_query: Some(candidate.sql.clone()),
        data: Some(Vec::new()),
        table_info: None,
        report: None,
    }
}

/// Response for a non-empty result, with or without a generated report.
pub fn assemble_success(
    candidate: &CandidateQuery,
    result: &ResultSet,
    report: Option<String>,
) -> ChatResponse {
    let indicator = candidate.provenance.indicator();

    let response = if let Some(ref report_text) = report {
        format!(
            "[{}] {}\n\n---\n\nข้อมูลดิบ: พบ {} รายการ",
            indicator, report_text, result.total
        )
    } else {
        templated_summary(indicator, candidate, result)
    };

    ChatResponse {
        response,
        sql_query: Some(candidate.sql.clone()),
        data: Some(result.rows.clone()),
        table_info: None,
        report,
    }
}

/// Fallback narrative derived directly from the result set.
fn templated_summary(indicator: &str, candidate: &CandidateQuery, result: &ResultSet) -> String {
    let sql_upper = candidate.sql.to_uppercase();

    if sql_upper.contains("COUNT(*)") && result.rows.len() == 1 {
        if let Some(count) = single_aggregate(&result.rows[0]) {
            return format!("[{}] จำนวนทั้งหมด: {}", indicator, count);
        }
    }

    if sql_upper.contains("AVG(AGE)") {
        if let Some(avg) = result.rows.first().and_then(|r| r["average_age"].as_f64()) {
            return format!("[{}] อายุเฉลี่ย: {:.1} ปี", indicator, avg);
        }
    }

    let mut text = format!("[{}] ฉันพบข้อมูล {} รายการ:\n\n", indicator, result.total);
    for (i, row) in result.rows.iter().take(NARRATIVE_ROWS).enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, render_row(row)));
    }
    if result.total > NARRATIVE_ROWS {
        text.push_str(&format!("\n... และอีก {} รายการ", result.total - NARRATIVE_ROWS));
    }
    text
}

/// Pull the aggregate value out of a single-row COUNT result, whatever
/// alias the template used.
fn single_aggregate(row: &Value) -> Option<Value> {
    let obj = row.as_object()?;
    if obj.len() == 1 {
        return obj.values().next().cloned();
    }
    for key in [
        "total_interviews",
        "total_personas",
        "total_themes",
        "total_brands",
        "count",
        "COUNT(*)",
    ] {
        if let Some(v) = obj.get(key) {
            return Some(v.clone());
        }
    }
    None
}

fn render_row(row: &Value) -> String {
    match row {
        Value::Object(obj) => obj
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count_result(total: i64) -> ResultSet {
        ResultSet {
            rows: vec![json!({"total_interviews": total})],
            total: 1,
            truncated: false,
        }
    }

    #[test]
    fn test_no_query_includes_catalog() {
        let catalog = TableCatalog::new();
        let response = assemble_no_query(false, &catalog);

        assert!(response.response.contains("📋 Rule-Based"));
        assert!(response.sql_query.is_none());
        assert!(response.data.is_none());
        assert!(response.table_info.is_some());
    }

    #[test]
    fn test_count_summary() {
        let candidate =
            CandidateQuery::from_rule("SELECT COUNT(*) as total_interviews FROM interviews");
        let response = assemble_success(&candidate, &count_result(25), None);

        assert!(response.response.contains("จำนวนทั้งหมด: 25"));
        assert!(response.response.contains("📋 Rule"));
        assert_eq!(response.data.unwrap().len(), 1);
    }

    #[test]
    fn test_average_age_summary() {
        let candidate =
            CandidateQuery::from_rule("SELECT AVG(age) as average_age FROM personas");
        let result = ResultSet {
            rows: vec![json!({"average_age": 33.48})],
            total: 1,
            truncated: false,
        };
        let response = assemble_success(&candidate, &result, None);
        assert!(response.response.contains("อายุเฉลี่ย: 33.5 ปี"));
    }

    #[test]
    fn test_multi_row_preview_capped_at_ten() {
        let candidate = CandidateQuery::from_rule("SELECT role FROM personas");
        let result = ResultSet {
            rows: (0..15).map(|i| json!({"role": format!("role{}", i)})).collect(),
            total: 15,
            truncated: false,
        };
        let response = assemble_success(&candidate, &result, None);

        assert!(response.response.contains("10. "));
        assert!(!response.response.contains("11. "));
        assert!(response.response.contains("และอีก 5 รายการ"));
    }

    #[test]
    fn test_report_takes_priority() {
        let candidate = CandidateQuery::from_ai("SELECT 1", "gpt-4o-mini");
        let response = assemble_success(
            &candidate,
            &count_result(7),
            Some("รายงานเชิงลึก".to_string()),
        );

        assert!(response.response.starts_with("[🤖 AI] รายงานเชิงลึก"));
        assert!(response.response.contains("พบ 1 รายการ"));
        assert_eq!(response.report.unwrap(), "รายงานเชิงลึก");
    }

    #[test]
    fn test_empty_result_response() {
        let candidate = CandidateQuery::from_rule("SELECT * FROM personas WHERE age > 100");
        let response = assemble_empty(&candidate);

        assert_eq!(response.response, "ไม่พบข้อมูลที่ตรงกับคำถามของคุณ");
        assert!(response.sql_query.is_some());
        assert_eq!(response.data.unwrap().len(), 0);
        assert!(response.report.is_none());
    }

    #[test]
    fn test_true_total_visible_when_truncated() {
        let candidate = CandidateQuery::from_rule("SELECT n FROM nums");
        let result = ResultSet {
            rows: (0..50).map(|i| json!({"n": i})).collect(),
            total: 120,
            truncated: true,
        };
        let response = assemble_success(&candidate, &result, None);
        assert!(response.response.contains("120"));
        assert_eq!(response.data.unwrap().len(), 50);
    }
}
