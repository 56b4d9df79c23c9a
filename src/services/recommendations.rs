use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinError;

use crate::{
    db::{LookupStore, LookupTable},
    error::RecommendError,
    models::{
        confidence, EnrichedRecommendation, ModelVariant, RecommendationItem,
        RecommendationRequest, RecommendationResponse,
    },
    services::providers::RecommendationModel,
};

/// Scores a profile with the hosted model and names the results
#[derive(Clone)]
pub struct Recommender {
    model: Arc<dyn RecommendationModel>,
    lookups: Arc<dyn LookupStore>,
}

impl Recommender {
    pub fn new(model: Arc<dyn RecommendationModel>, lookups: Arc<dyn LookupStore>) -> Self {
        Self { model, lookups }
    }

    /// Produces the enriched, ranked recommendation list for one profile.
    ///
    /// Brand and category names are resolved by two independent tasks. Either
    /// one failing only costs its names: affected items get fallback labels.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError> {
        let start = Instant::now();
        let input = request.normalize()?;
        let variant = ModelVariant::from_flag(input.use_gen_model);

        tracing::info!(
            gender = %input.gender,
            age = %input.age,
            shopping = %input.shopping,
            occupation = %input.occupation,
            hour = input.hour,
            day = input.day,
            model = variant.label(),
            provider = self.model.name(),
            "Calling recommendation model"
        );

        let output = self.model.predict(&input).await?;
        let items = output.top_10_recommendations;

        let brand_ids = distinct(items.iter().map(|item| item.brand));
        let category_ids = distinct(items.iter().map(|item| item.cate_id));

        let brand_task = tokio::spawn(resolve_names(
            self.lookups.clone(),
            LookupTable::Brand,
            brand_ids,
        ));
        let category_task = tokio::spawn(resolve_names(
            self.lookups.clone(),
            LookupTable::Category,
            category_ids,
        ));
        let (brands, categories) = tokio::join!(brand_task, category_task);
        let brands = joined(LookupTable::Brand, brands);
        let categories = joined(LookupTable::Category, categories);

        let recommendations = enrich(&items, &brands, &categories);

        tracing::info!(
            items = recommendations.len(),
            total_scored = output.total_products_scored,
            brands_resolved = brands.len(),
            categories_resolved = categories.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations enriched"
        );

        Ok(RecommendationResponse {
            success: true,
            model_type: variant.label().to_string(),
            total_products_scored: output.total_products_scored,
            recommendations,
        })
    }
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    ids.collect::<HashSet<_>>().into_iter().collect()
}

/// Looks up display names, degrading to an empty mapping on any failure
async fn resolve_names(
    lookups: Arc<dyn LookupStore>,
    table: LookupTable,
    ids: Vec<i64>,
) -> HashMap<i64, String> {
    if ids.is_empty() {
        return HashMap::new();
    }

    match lookups.names(table, &ids).await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "Name lookup failed, using fallback labels");
            HashMap::new()
        }
    }
}

fn joined(
    table: LookupTable,
    result: Result<HashMap<i64, String>, JoinError>,
) -> HashMap<i64, String> {
    result.unwrap_or_else(|e| {
        tracing::warn!(table = %table, error = %e, "Name lookup task failed");
        HashMap::new()
    })
}

/// Attaches names and confidence to each item, keeping the model's order
pub fn enrich(
    items: &[RecommendationItem],
    brands: &HashMap<i64, String>,
    categories: &HashMap<i64, String>,
) -> Vec<EnrichedRecommendation> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| EnrichedRecommendation {
            rank: index + 1,
            brand_id: item.brand,
            brand_name: brands
                .get(&item.brand)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| LookupTable::Brand.fallback_label(item.brand)),
            category_id: item.cate_id,
            category_name: categories
                .get(&item.cate_id)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| LookupTable::Category.fallback_label(item.cate_id)),
            price: item.price,
            probability: item.probability,
            confidence: confidence(item.probability),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::lookups::MockLookupStore;
    use crate::models::ModelOutput;
    use crate::services::providers::MockRecommendationModel;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn item(brand: i64, cate_id: i64, probability: f64) -> RecommendationItem {
        RecommendationItem {
            brand,
            cate_id,
            price: 19.99,
            probability,
        }
    }

    fn request() -> RecommendationRequest {
        serde_json::from_value(json!({
            "gender": 1,
            "ageGroup": 3,
            "shoppingLevel": 2,
            "isStudent": 0,
            "hourOfClick": 14,
            "dayOfClick": 5,
            "useGenModel": "true"
        }))
        .unwrap()
    }

    fn model_returning(items: Vec<RecommendationItem>) -> MockRecommendationModel {
        let mut model = MockRecommendationModel::new();
        model.expect_name().return_const("mock");
        model.expect_predict().times(1).returning(move |_| {
            Ok(ModelOutput {
                top_10_recommendations: items.clone(),
                total_products_scored: 1200,
            })
        });
        model
    }

    #[test]
    fn test_enrich_uses_fallback_and_keeps_order() {
        let items = vec![item(5, 1, 0.9), item(7, 1, 0.8), item(5, 2, 0.7), item(9, 2, 0.6)];
        let brands = HashMap::from([(5, "Acme".to_string()), (9, "Globex".to_string())]);
        let categories = HashMap::from([(1, "Shoes".to_string())]);

        let enriched = enrich(&items, &brands, &categories);

        let names: Vec<_> = enriched.iter().map(|r| r.brand_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Unknown Brand (7)", "Acme", "Globex"]);
        let ranks: Vec<_> = enriched.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(enriched[2].category_name, "Unknown Category (2)");
        assert_eq!(enriched[0].confidence, 90);
    }

    #[test]
    fn test_enrich_treats_blank_names_as_missing() {
        let items = vec![item(5, 1, 0.9)];
        let brands = HashMap::from([(5, String::new())]);
        let categories = HashMap::from([(1, String::new())]);

        let enriched = enrich(&items, &brands, &categories);
        assert_eq!(enriched[0].brand_name, "Unknown Brand (5)");
        assert_eq!(enriched[0].category_name, "Unknown Category (1)");
    }

    /// Each lookup blocks until the other one has started
    struct RendezvousLookups {
        barrier: Barrier,
    }

    #[async_trait::async_trait]
    impl LookupStore for RendezvousLookups {
        async fn names(
            &self,
            table: LookupTable,
            ids: &[i64],
        ) -> Result<HashMap<i64, String>, sqlx::Error> {
            self.barrier.wait().await;
            Ok(ids.iter().map(|id| (*id, format!("{} {}", table, id))).collect())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_brand_and_category_lookups_run_concurrently() {
        let model = model_returning(vec![item(5, 1, 0.5), item(6, 2, 0.4)]);
        let lookups = RendezvousLookups {
            barrier: Barrier::new(2),
        };

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let response = tokio::time::timeout(Duration::from_secs(5), recommender.recommend(&request()))
            .await
            .expect("lookups ran one after the other")
            .unwrap();

        assert_eq!(response.recommendations[0].brand_name, "Brand 5");
        assert_eq!(response.recommendations[1].category_name, "Category 2");
    }

    #[tokio::test]
    async fn test_recommend_deduplicates_ids_before_lookup() {
        let model = model_returning(vec![item(5, 1, 0.5), item(7, 1, 0.4), item(5, 1, 0.3), item(9, 1, 0.2)]);

        let mut lookups = MockLookupStore::new();
        lookups
            .expect_names()
            .withf(|table, ids| {
                let mut sorted = ids.to_vec();
                sorted.sort_unstable();
                match table {
                    LookupTable::Brand => sorted == vec![5, 7, 9],
                    LookupTable::Category => sorted == vec![1],
                }
            })
            .times(2)
            .returning(|table, _| match table {
                LookupTable::Brand => Ok(HashMap::from([
                    (5, "Acme".to_string()),
                    (9, "Globex".to_string()),
                ])),
                LookupTable::Category => Ok(HashMap::from([(1, "Shoes".to_string())])),
            });

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let response = recommender.recommend(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.model_type, "DeepFM (gen)");
        assert_eq!(response.total_products_scored, 1200);
        assert_eq!(response.recommendations.len(), 4);
        assert_eq!(response.recommendations[1].brand_name, "Unknown Brand (7)");
        assert_eq!(response.recommendations[3].brand_name, "Globex");
        assert_eq!(response.recommendations[3].category_name, "Shoes");
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_fallback_labels() {
        let items: Vec<_> = (0..10).map(|i| item(100 + i, 200 + i, 0.1)).collect();
        let model = model_returning(items);

        let mut lookups = MockLookupStore::new();
        lookups
            .expect_names()
            .returning(|table, _| match table {
                LookupTable::Brand => Err(sqlx::Error::PoolTimedOut),
                LookupTable::Category => Ok(HashMap::from([(200, "Bags".to_string())])),
            });

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let response = recommender.recommend(&request()).await.unwrap();

        assert_eq!(response.recommendations.len(), 10);
        assert_eq!(response.recommendations[0].brand_name, "Unknown Brand (100)");
        // The category lookup is unaffected by the brand failure
        assert_eq!(response.recommendations[0].category_name, "Bags");
    }

    #[tokio::test]
    async fn test_empty_result_skips_lookups() {
        let model = model_returning(Vec::new());
        let mut lookups = MockLookupStore::new();
        lookups.expect_names().never();

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let response = recommender.recommend(&request()).await.unwrap();

        assert!(response.success);
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let mut model = MockRecommendationModel::new();
        model.expect_name().return_const("mock");
        model.expect_predict().returning(|_| {
            Err(RecommendError::Upstream {
                status: 503,
                body: "unavailable".to_string(),
            })
        });
        let mut lookups = MockLookupStore::new();
        lookups.expect_names().never();

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let err = recommender.recommend(&request()).await.unwrap_err();
        assert!(matches!(err, RecommendError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_model() {
        let mut model = MockRecommendationModel::new();
        model.expect_predict().never();
        let lookups = MockLookupStore::new();

        let recommender = Recommender::new(Arc::new(model), Arc::new(lookups));
        let err = recommender
            .recommend(&RecommendationRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput(_)));
    }
}
