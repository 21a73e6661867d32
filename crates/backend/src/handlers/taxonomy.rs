use axum::extract::{Query, State};
use axum::Json;
use contracts::shared::taxonomy::{self, TaxonomyTree};
use serde::Deserialize;

use crate::shared::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TaxonomyQuery {
    #[serde(default)]
    pub locale: Option<String>,
}

/// GET /api/taxonomy?locale=ru
pub async fn tree(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Json<TaxonomyTree> {
    let locale = query
        .locale
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| state.config.display.locale.clone());
    Json(taxonomy::tree(&locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locale_defaults_to_config() {
        let (_dir, state) = AppState::for_tests().await;
        let Json(tree) = tree(State(state.clone()), Query(TaxonomyQuery::default())).await;
        assert_eq!(tree.locale, "ru");
        assert!(!tree.categories.is_empty());

        let query = TaxonomyQuery {
            locale: Some("tr".into()),
        };
        let Json(tree) = super::tree(State(state), Query(query)).await;
        assert_eq!(tree.locale, "tr");
    }
}
