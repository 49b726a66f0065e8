//! Terminal rendering of an analysis record

use analyst_core::scoring::COMPOSITE_CEILING;
use analyst_core::{AnalysisRecord, display_score};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::fmt::Display;

const UNCLASSIFIED: &str = "n/a";

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn label<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNCLASSIFIED.to_string(), |v| v.to_string())
}

/// Composite as shown to users, clamped onto 0-150
pub fn score_line(record: &AnalysisRecord) -> String {
    format!(
        "{} / {COMPOSITE_CEILING}",
        display_score(record.total_recommendation_score())
    )
}

/// Render every section of a record as text tables
pub fn render_record(record: &AnalysisRecord) -> String {
    let mut out = String::new();

    let mut overview = table();
    overview.set_header(vec!["Company", "Ticker", "Price", "30d", "Recommendation", "Risk"]);
    overview.add_row(vec![
        record.company_name().to_string(),
        record.ticker().to_string(),
        format!("{} {}", record.current_price(), record.currency()),
        record.price_trend_30d().to_string(),
        label(record.recommendation()),
        label(record.risk_level()),
    ]);
    out.push_str(&format!("{overview}\n"));
    out.push_str(&format!("Recommendation score: {}\n\n", score_line(record)));

    let breakdown = record.score_breakdown();
    let advanced = record.advanced_analysis();
    let mut scores = table();
    scores.set_header(vec!["Component", "Points", "Detail"]);
    for item in record.scores() {
        scores.add_row(vec![
            item.category.clone(),
            format!("{:.1} / 10", item.score),
            item.reasoning.clone(),
        ]);
    }
    scores.add_row(vec![
        "Piotroski F-Score".to_string(),
        format!("{:.1} / 25", breakdown.piotroski_scaled),
        format!(
            "{} / 9, {}",
            advanced.piotroski.score, advanced.piotroski.interpretation
        ),
    ]);
    scores.add_row(vec![
        "Altman Z-Score".to_string(),
        format!("{:.1} / 25", breakdown.altman_z_scaled),
        format!(
            "{:.2} ({}), {}",
            advanced.altman_z.score,
            label(advanced.altman_z.zone),
            advanced.altman_z.interpretation
        ),
    ]);
    scores.add_row(vec![
        "News sentiment".to_string(),
        format!("{:.1} / 50", breakdown.news_score),
        String::new(),
    ]);
    out.push_str(&format!("{scores}\n"));

    let facts = record.hardfacts();
    let mut hardfacts = table();
    hardfacts.set_header(vec!["Revenue", "Profit", "P/E", "Dividend", "Yield", "Equity ratio"]);
    hardfacts.add_row(vec![
        &facts.revenue,
        &facts.profit,
        &facts.pe_ratio,
        &facts.dividend,
        &facts.dividend_yield,
        &facts.equity_ratio,
    ]);
    out.push_str(&format!("{hardfacts}\n"));

    for (heading, text) in [
        ("Profile", record.company_profile()),
        ("Business model risk", record.business_model_risk()),
        ("Summary", record.summary()),
    ] {
        if !text.is_empty() {
            out.push_str(&format!("{heading}: {text}\n\n"));
        }
    }

    if !record.news().is_empty() {
        let mut news = table();
        news.set_header(vec!["Date", "Source", "Headline"]);
        for item in record.news() {
            news.add_row(vec![&item.date, &item.source, &item.title]);
        }
        out.push_str(&format!("{news}\n"));
    }

    if !record.sources().is_empty() {
        out.push_str("Sources:\n");
        for source in record.sources() {
            out.push_str(&format!("  - {} <{}>\n", source.title, source.uri));
        }
        out.push('\n');
    }

    for warning in record.quality_warnings() {
        out.push_str(&format!("warning: {warning}\n"));
    }

    if !record.disclaimer().is_empty() {
        out.push_str(record.disclaimer());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::process_payload;
    use analyst_llm::GroundingChunk;

    fn record(news_score: u32) -> AnalysisRecord {
        record_with_zone(news_score, "Safe")
    }

    fn record_with_zone(news_score: u32, zone: &str) -> AnalysisRecord {
        let raw = format!(
            r#"{{
                "companyName": "Rheinmetall AG",
                "ticker": "RHM",
                "scores": [
                    {{"category": "Valuation", "score": 10, "reasoning": "x"}},
                    {{"category": "Growth", "score": 10, "reasoning": "x"}},
                    {{"category": "Dividend", "score": 10, "reasoning": "x"}},
                    {{"category": "Trend", "score": 10, "reasoning": "x"}},
                    {{"category": "Sentiment", "score": 10, "reasoning": "x"}}
                ],
                "newsScore": {news_score},
                "recommendation": "Buy",
                "riskLevel": "High",
                "advancedAnalysis": {{
                    "piotroski": {{"score": 9, "interpretation": "Strong"}},
                    "altmanZ": {{"score": 3.6, "interpretation": "Safe", "zone": "{zone}"}}
                }},
                "disclaimer": "Not financial advice."
            }}"#
        );
        process_payload(&raw, &[GroundingChunk::web("https://rhm.example", "RHM IR")]).unwrap()
    }

    #[test]
    fn test_score_line_clamps_for_display() {
        let over = record(80);
        assert_eq!(over.total_recommendation_score(), 180);
        assert_eq!(score_line(&over), "150 / 150");

        let nominal = record(40);
        assert_eq!(score_line(&nominal), "140 / 150");
    }

    #[test]
    fn test_render_contains_sections() {
        let text = render_record(&record(40));

        assert!(text.contains("Rheinmetall AG"));
        assert!(text.contains("Recommendation score: 140 / 150"));
        assert!(text.contains("Piotroski F-Score"));
        assert!(text.contains("RHM IR <https://rhm.example>"));
        assert!(text.contains("Not financial advice."));
    }

    #[test]
    fn test_render_lists_quality_warnings() {
        let text = render_record(&record(80));
        assert!(text.contains("warning: news score 80 outside 0-50"));
    }

    #[test]
    fn test_unclassified_zone_rendered_as_na() {
        let text = render_record(&record_with_zone(40, "N/A"));
        assert!(text.contains("3.60 (n/a), Safe"));
        assert!(text.contains("advancedAnalysis.altmanZ.zone has unknown value"));
        assert!(text.contains("140 / 150"));
    }
}
