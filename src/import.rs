use crate::client::RecipeApiClient;
use crate::error::RecipeApiError;
use crate::model::Ingredient;
use crate::normalizers::{
    from_value, IngredientNormalizer, Normalizer, RawIngredientCandidate, RawResultPage,
};
use crate::units::{metric_base, MetricBase};
use log::{debug, info, warn};

/// A name the import could not turn into an ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedImport {
    pub name: String,
    pub reason: String,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkImportReport {
    pub imported: Vec<Ingredient>,
    pub skipped: Vec<SkippedImport>,
}

/// Imports ingredients by name: search, take the first candidate, fetch
/// the detail and normalize it. A failing name is skipped, never fatal.
pub struct BulkImporter<'a> {
    client: &'a RecipeApiClient,
    amount: f64,
    unit: String,
}

impl<'a> BulkImporter<'a> {
    /// Importer fetching nutrition on a 100 g basis
    pub fn new(client: &'a RecipeApiClient) -> Self {
        Self {
            client,
            amount: 100.0,
            unit: "g".to_string(),
        }
    }

    /// Request nutrition for `amount` of `unit` instead of 100 g.
    ///
    /// Only a positive mass can be scaled back to per-100 g values, so any
    /// other basis is ignored and the importer keeps 100 g.
    pub fn basis(mut self, amount: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        if metric_base(&unit) == Some(MetricBase::Grams) && amount.is_finite() && amount > 0.0 {
            self.amount = amount;
            self.unit = unit;
        } else {
            warn!("Ignoring import basis {} {}: not a mass", amount, unit);
        }
        self
    }

    fn import_one(&self, name: &str) -> Result<Ingredient, RecipeApiError> {
        let page: RawResultPage = from_value(&self.client.search_ingredients(name, 1)?);
        let candidate = page
            .results
            .first()
            .map(from_value::<RawIngredientCandidate>)
            .filter(|candidate| candidate.id != 0)
            .ok_or_else(|| RecipeApiError::NoResults {
                query: name.to_string(),
            })?;

        debug!("'{}' matched '{}' ({})", name, candidate.name, candidate.id);

        let detail = self
            .client
            .get_ingredient_information(candidate.id, &self.unit, self.amount)?;
        Ok(IngredientNormalizer.normalize(&detail))
    }

    pub fn import<S: AsRef<str>>(&self, names: &[S]) -> BulkImportReport {
        let mut report = BulkImportReport::default();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.import_one(name) {
                Ok(ingredient) => {
                    info!("Imported '{}' as '{}'", name, ingredient.name_clean);
                    report.imported.push(ingredient);
                }
                Err(e) => {
                    warn!("Skipping '{}': {}", name, e);
                    report.skipped.push(SkippedImport {
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Bulk import finished: {} imported, {} skipped",
            report.imported.len(),
            report.skipped.len()
        );
        report
    }
}

/// Import `names`, returning only the ingredients that succeeded
pub fn bulk_import<S: AsRef<str>>(client: &RecipeApiClient, names: &[S]) -> Vec<Ingredient> {
    BulkImporter::new(client).import(names).imported
}
