//! Shared fixtures for pipeline integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use ragcache::{
    CacheTier, FixedScorer, IngestConfig, MockVectorIndex, Page, Reranker, RetrievalTier,
    SearchConfig, SearchPipeline, ingest,
};

pub const POLICY_NAME: &str = "Principal-Sample-Life-Insurance-Policy";
pub const CACHE_THRESHOLD: f32 = 0.2;

/// Five policy pages, two of them about filing a death benefit claim.
pub fn policy_pages() -> Vec<Page> {
    [
        ("1", "The death benefit is paid to the named beneficiary when the insured dies while this policy is in force."),
        ("2", "To file a death benefit claim, send a completed claim form and a certified death certificate to the insurer."),
        ("3", "Premiums are due on the first day of each month and may be paid by check or electronic transfer."),
        ("4", "A grace period of thirty one days is allowed for payment of each premium after the first."),
        ("5", "Death benefit claims are reviewed within thirty days after the insurer receives proof of death."),
    ]
    .into_iter()
    .map(|(label, text)| Page::new(label, text))
    .collect()
}

pub struct Harness {
    pub main: Arc<MockVectorIndex>,
    pub cache: Arc<MockVectorIndex>,
    pub scorer: Arc<FixedScorer>,
    pub pipeline: Arc<SearchPipeline<Arc<MockVectorIndex>, Arc<MockVectorIndex>, Arc<FixedScorer>>>,
}

impl Harness {
    /// Ingested main index, empty cache, `n = 5` and `top_k = 3`.
    pub async fn new(scorer: FixedScorer) -> Self {
        let main = Arc::new(MockVectorIndex::new("Principal_Life_Insurance"));
        ingest(&main, policy_pages(), POLICY_NAME, IngestConfig::default())
            .await
            .expect("ingest policy pages");
        Self::with_main(main, scorer)
    }

    pub fn with_main(main: Arc<MockVectorIndex>, scorer: FixedScorer) -> Self {
        let cache = Arc::new(MockVectorIndex::new("Principal_Insurance_Cache"));
        let scorer = Arc::new(scorer);
        let pipeline = SearchPipeline::new(
            RetrievalTier::new(main.clone()),
            CacheTier::new(cache.clone(), CACHE_THRESHOLD).with_default_policy_name(POLICY_NAME),
            Reranker::new(scorer.clone()),
            SearchConfig {
                search_results_limit: 5,
                rerank_top_k: 3,
            },
        );

        Self {
            main,
            cache,
            scorer,
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Scores by page: the claim-filing page first, then the claim review page.
pub fn claim_scorer() -> FixedScorer {
    let pages = policy_pages();
    FixedScorer::new()
        .with_score(pages[1].text.clone(), 8.2)
        .with_score(pages[4].text.clone(), 5.1)
        .with_score(pages[0].text.clone(), 1.3)
        .with_default_score(-6.0)
}
