//! Source citations for a result set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::SearchResult;

/// Pages of one policy document that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub policy_name: String,
    /// Deduplicated, lexicographically sorted.
    pub page_labels: BTreeSet<String>,
}

/// Groups results by policy name, in order of first appearance.
pub fn extract_citations(results: &[SearchResult]) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();

    for result in results {
        let policy_name = &result.metadata.policy_name;
        let page_label = result.metadata.page_label.clone();

        match citations.iter_mut().find(|c| &c.policy_name == policy_name) {
            Some(citation) => {
                citation.page_labels.insert(page_label);
            }
            None => citations.push(Citation {
                policy_name: policy_name.clone(),
                page_labels: BTreeSet::from([page_label]),
            }),
        }
    }

    citations
}
