pub mod classify;
pub mod config;
pub mod detect;
pub mod enrich;
pub mod error;
pub mod grade;
pub mod insights;
pub mod model;
pub mod parsing;
pub mod tables;

use chrono::{DateTime, Utc};
use classify::Scored;
use config::EngineConfig;
use detect::DetectionReport;
use enrich::{DisabledEnricher, DynEnricher, EnrichmentRequest};
use error::VigieError;
use model::{AnalysisMeta, AnalysisResult, Product, ProductInput};
use std::path::Path;
use std::sync::Arc;
use tables::{TableSet, TableStore};
use tracing::{debug, warn};

pub const ANALYZER_VERSION: &str = concat!("vigie-core/", env!("CARGO_PKG_VERSION"));

/// Analyze one product against a table set, rule-based only.
///
/// Normalize, detect, classify with the category's classifier, grade, then
/// render insights. Input errors are returned before any stage runs, so a
/// partial result is never produced. Identical input, tables and
/// `analyzed_at` give an identical result.
pub fn analyze_product(
    input: &ProductInput,
    tables: &TableSet,
    analyzed_at: DateTime<Utc>,
) -> Result<AnalysisResult, VigieError> {
    run_pipeline(input, tables, analyzed_at).map(|(_, result)| result)
}

#[tracing::instrument(skip_all, fields(category = %input.category))]
fn run_pipeline(
    input: &ProductInput,
    tables: &TableSet,
    analyzed_at: DateTime<Utc>,
) -> Result<(Product, AnalysisResult), VigieError> {
    let product = parsing::prepare_product(input)?;
    debug!(
        ingredients = product.ingredients.len(),
        "product normalized"
    );

    let report = detect::detect(&product, tables);
    let breakdown = classify::classify(&product, &report, tables);

    let score = breakdown.score();
    let confidence = grade::resolve_confidence(breakdown.confidence(), &product);
    let insights = insights::generate(&breakdown, score);

    debug!(score, confidence, "product graded");

    let result = AnalysisResult {
        score,
        grade: grade::grade_for(score),
        risk_label: grade::risk_label_for(score),
        confidence,
        breakdown,
        insights: insights.insights,
        warnings: insights.warnings,
        recommendations: insights.recommendations,
        meta: AnalysisMeta {
            category: product.category,
            product_name: product.name.clone(),
            analyzer_version: ANALYZER_VERSION.to_string(),
            tables_version: tables.version(),
            analyzed_at,
            ingredient_count: product.ingredients.len(),
            enrichment_available: false,
        },
    };
    Ok((product, result))
}

/// Long-lived analysis service: shared tables, injected enricher, configuration.
///
/// Cheap to share across threads; every call works on one table snapshot.
pub struct Analyzer {
    tables: Arc<TableStore>,
    enricher: DynEnricher,
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(tables: Arc<TableStore>) -> Self {
        Analyzer {
            tables,
            enricher: Arc::new(DisabledEnricher),
            config: EngineConfig::default(),
        }
    }

    /// Analyzer on the built-in tables, enrichment disabled.
    pub fn builtin() -> Self {
        Analyzer::new(Arc::new(TableStore::builtin()))
    }

    /// Analyzer from configuration: tables from `tables_dir` when set.
    pub fn from_config(config: EngineConfig) -> Result<Self, VigieError> {
        let store = match &config.tables_dir {
            Some(dir) => TableStore::from_dir(dir)?,
            None => TableStore::builtin(),
        };
        Ok(Analyzer {
            tables: Arc::new(store),
            enricher: Arc::new(DisabledEnricher),
            config,
        })
    }

    pub fn with_enricher(mut self, enricher: DynEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tables(&self) -> &Arc<TableStore> {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap in a new table set from a directory; see [`TableStore::reload_from`].
    pub fn reload_tables(&self, dir: &Path) -> Result<String, VigieError> {
        self.tables.reload_from(dir)
    }

    pub fn analyze(
        &self,
        input: &ProductInput,
        analyzed_at: DateTime<Utc>,
    ) -> Result<AnalysisResult, VigieError> {
        analyze_product(input, &self.tables.snapshot(), analyzed_at)
    }

    /// Analyze several products against the same table snapshot.
    pub fn analyze_many(
        &self,
        inputs: &[ProductInput],
        analyzed_at: DateTime<Utc>,
    ) -> Vec<Result<AnalysisResult, VigieError>> {
        let tables = self.tables.snapshot();
        inputs
            .iter()
            .map(|input| analyze_product(input, &tables, analyzed_at))
            .collect()
    }

    /// Normalize and run detection only.
    pub fn detect(&self, input: &ProductInput) -> Result<(Product, DetectionReport), VigieError> {
        let tables = self.tables.snapshot();
        let product = parsing::prepare_product(input)?;
        let report = detect::detect(&product, &tables);
        Ok((product, report))
    }

    /// Rule-based analysis, plus a narrative insight from the enricher when
    /// one is configured and answers within the deadline.
    ///
    /// A timeout or provider failure leaves the rule-based result untouched
    /// with `enrichment_available = false`.
    pub async fn analyze_enriched(
        &self,
        input: &ProductInput,
        analyzed_at: DateTime<Utc>,
    ) -> Result<AnalysisResult, VigieError> {
        let tables = self.tables.snapshot();
        let (product, mut result) = run_pipeline(input, &tables, analyzed_at)?;

        if !self.config.enrichment.enabled || !self.enricher.is_enabled() {
            return Ok(result);
        }

        let request = EnrichmentRequest {
            product_name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category,
            ingredients: product
                .ingredients
                .iter()
                .map(|i| i.display.clone())
                .collect(),
            score: result.score,
            grade: result.grade,
            risk_tier: result.breakdown.risk_tier(),
            highlights: result.breakdown.explanation().to_vec(),
        };

        let timeout = self.config.enrichment.timeout();
        match enrich::enrich_with_timeout(self.enricher.as_ref(), &request, timeout).await {
            Ok(narrative) => {
                result.meta.enrichment_available =
                    insights::add_narrative(&mut result.insights, &narrative);
                if !result.meta.enrichment_available {
                    debug!(
                        provider = self.enricher.name(),
                        "narrative repeats an insight"
                    );
                }
            }
            Err(e) => {
                warn!(provider = self.enricher.name(), error = %e, "enrichment skipped");
            }
        }
        Ok(result)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use model::Category;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_meta_filled() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients(&["eau", "farine", "sel"]);
        let result = Analyzer::builtin().analyze(&input, at()).unwrap();
        assert_eq!(result.meta.product_name, "Pain");
        assert_eq!(result.meta.ingredient_count, 3);
        assert_eq!(result.meta.analyzed_at, at());
        assert!(result.meta.analyzer_version.starts_with("vigie-core/"));
        assert!(!result.meta.enrichment_available);
    }

    #[test]
    fn test_grade_follows_score() {
        let input = ProductInput::new("Lessive", Category::Detergents)
            .with_ingredients(&["eau", "phosphates", "sodium lauryl sulfate", "parfum"]);
        let result = Analyzer::builtin().analyze(&input, at()).unwrap();
        assert_eq!(result.score, 57);
        assert_eq!(result.grade, grade::Grade::C);
        assert_eq!(result.risk_label, grade::RiskLabel::High);
    }

    #[test]
    fn test_analyze_many_keeps_errors_per_product() {
        let good = ProductInput::new("A", Category::Food).with_ingredients(&["eau"]);
        let bad = ProductInput::new("B", Category::Food);
        let results = Analyzer::builtin().analyze_many(&[good, bad], at());
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_validation());
    }

    #[test]
    fn test_detect_only() {
        let input = ProductInput::new("X", Category::Food).with_ingredients_text("sucre, E330");
        let (product, report) = Analyzer::builtin().detect(&input).unwrap();
        assert_eq!(product.ingredients.len(), 2);
        assert_eq!(report.additive_codes, vec!["E330"]);
    }
}
