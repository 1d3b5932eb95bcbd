//! Tab catalog endpoint

use axum::Json;

use crate::tabs::TabKind;
use crate::types::{
    AnswerStyle, StyleInfo, TabInfo, TabListResponse, DETAIL_DEFAULT, DETAIL_MAX, DETAIL_MIN,
};

/// GET /api/tabs - List tabs, answer styles and the detail range
pub async fn list_tabs() -> Json<TabListResponse> {
    let tabs = TabKind::all()
        .iter()
        .map(|tab| TabInfo {
            name: tab.name().to_string(),
            title: tab.title().to_string(),
            description: tab.description().to_string(),
        })
        .collect();

    let styles = AnswerStyle::all()
        .iter()
        .map(|style| StyleInfo {
            name: style.name().to_string(),
            label: style.display_name().to_string(),
        })
        .collect();

    Json(TabListResponse {
        tabs,
        styles,
        detail_min: DETAIL_MIN,
        detail_max: DETAIL_MAX,
        detail_default: DETAIL_DEFAULT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_lists_every_tab_and_style() {
        let catalog = list_tabs().await.0;

        assert_eq!(catalog.tabs.len(), TabKind::all().len());
        assert_eq!(catalog.styles.len(), AnswerStyle::all().len());
        assert_eq!(catalog.tabs[0].name, "recipe");
        assert!(catalog.tabs.iter().any(|tab| tab.name == "job_match"));
        assert!(catalog.styles.iter().any(|style| style.name == "qa_pairs"));
        assert_eq!(catalog.detail_min, 1);
        assert_eq!(catalog.detail_max, 5);
        assert_eq!(catalog.detail_default, 3);
    }
}
