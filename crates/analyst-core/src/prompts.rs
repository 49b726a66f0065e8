//! Analysis prompt template

use crate::error::Result;
use minijinja::{Environment, context};

/// The five score categories, in display order
pub const SCORE_CATEGORIES: [&str; 5] = [
    "Valuation (P/E, P/B)",
    "Growth & Profitability",
    "Dividend & Safety",
    "Technical Analysis (Trend)",
    "Sentiment & News",
];

const ANALYSIS_TEMPLATE: &str = r#"You are a team of equity analysts covering the German stock market (DAX, MDAX, SDAX, TecDAX).
Analyze the company "{{ query }}".

Steps:
1. Research current financials (revenue, profit, P/E, dividend, balance sheet), today's share price and the price change over the last 30 days.
2. Find the 3 most recent, reputable and market-relevant news items.
3. Standard scoreboard (0-50 points): award 0-10 points in each of these categories:
{%- for category in categories %}
   - {{ category }}
{%- endfor %}
4. News sentiment score (0-50 points), assessed separately:
   - 50: extremely positive news (takeover, record profits, raised guidance)
   - 25: neutral or mixed
   - 0: extremely negative news (scandal, profit warning, lawsuits)
5. Piotroski F-Score (0-9): one point each for ROA > 0, CFO > 0, rising ROA, CFO > net income, falling debt, rising current ratio, no new shares, rising gross margin, rising asset turnover.
6. Altman Z-Score for non-financials (1.2*A + 1.4*B + 3.3*C + 0.6*D + 1.0*E). Zones: above 3.0 Safe, 1.8 to 3.0 Grey, below 1.8 Distress.

Return ONLY valid JSON with exactly this structure:
{
  "companyName": "Name",
  "ticker": "Symbol",
  "currentPrice": "Price",
  "currency": "EUR",
  "priceTrend30d": "Change over 30 days, e.g. +5.2% or -1.5%",
  "scores": [
{%- for category in categories %}
    { "category": "{{ category }}", "score": 0, "reasoning": "..." }{% if not loop.last %},{% endif %}
{%- endfor %}
  ],
  "newsScore": 0,
  "recommendation": "Buy" | "Hold" | "Sell",
  "riskLevel": "Low" | "Medium" | "High",
  "companyProfile": "...",
  "hardfacts": {
    "revenue": "...",
    "peRatio": "...",
    "profit": "...",
    "dividend": "...",
    "dividendYield": "%",
    "equityRatio": "%"
  },
  "businessModelRisk": "...",
  "advancedAnalysis": {
    "piotroski": { "score": 0, "interpretation": "..." },
    "altmanZ": { "score": 0.0, "interpretation": "...", "zone": "Safe" | "Grey" | "Distress" }
  },
  "news": [
    { "title": "...", "source": "...", "date": "...", "url": "..." }
  ],
  "summary": "...",
  "disclaimer": "This is not financial advice."
}"#;

/// Render the analysis prompt for a company name or ticker
pub fn build_prompt(query: &str) -> Result<String> {
    let env = Environment::new();
    let prompt = env.render_str(
        ANALYSIS_TEMPLATE,
        context! {
            query => query,
            categories => SCORE_CATEGORIES,
        },
    )?;
    Ok(prompt)
}
