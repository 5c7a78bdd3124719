//! Askama templates for the web frontend.

use askama::Template;

use crate::controller::{Field, LegRow, MAP_CONTAINER, MapReady, SearchForm, ValidationError};
use crate::map::SceneCommand;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Search page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub from: String,
    pub to: String,
    /// Validation message from a rejected submit
    pub error: Option<String>,
    /// Set when the place directory couldn't be loaded
    pub notice: Option<String>,
}

impl IndexTemplate {
    pub fn blank(notice: Option<String>) -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            error: None,
            notice,
        }
    }

    /// Re-render a rejected submit with what the rider typed.
    pub fn rejected(form: &SearchForm, error: &ValidationError) -> Self {
        Self {
            from: form.field(Field::Origin).text().to_string(),
            to: form.field(Field::Destination).text().to_string(),
            error: Some(error.to_string()),
            notice: None,
        }
    }
}

/// Map page with a drawn route.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub container: &'static str,
    pub from: String,
    pub to: String,
    pub total: String,
    pub summary: String,
    pub legs: Vec<LegRow>,
    /// Scene commands as JSON, safe to embed in a `<script>` element
    pub scene_json: String,
}

impl MapTemplate {
    pub fn new(ready: &MapReady) -> Result<Self, serde_json::Error> {
        Ok(Self {
            container: MAP_CONTAINER,
            from: ready.from.clone(),
            to: ready.to.clone(),
            total: ready.view.total.clone(),
            summary: ready.view.summary.clone(),
            legs: ready.view.legs.clone(),
            scene_json: scene_json(&ready.scene)?,
        })
    }
}

/// Map page that couldn't draw a route.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (no base.html)
// ============================================================================

/// Suggestion list for one input.
#[derive(Template)]
#[template(path = "suggestions.html")]
pub struct SuggestionsTemplate {
    /// "from" or "to"
    pub field: String,
    pub places: Vec<String>,
}

/// JSON for an inline `<script type="application/json">`.
///
/// `<` is escaped so a station name can never close the script element.
pub fn scene_json(scene: &[SceneCommand]) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(scene)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MarkerId;

    #[test]
    fn scene_json_cannot_close_script() {
        let json = scene_json(&[SceneCommand::RemoveMarker { id: MarkerId(1) }]).unwrap();
        assert_eq!(json, r#"[{"op":"remove_marker","id":1}]"#);

        let scene = vec![SceneCommand::CreateMap {
            container: "</script><b>".into(),
            center: crate::domain::LatLng::from_const(9.0, 38.7),
            zoom: 13,
        }];
        let json = scene_json(&scene).unwrap();
        assert!(!json.contains('<'));

        // Still the same JSON once parsed.
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["container"], "</script><b>");
    }

    #[test]
    fn index_renders_notice_and_error() {
        let html = IndexTemplate {
            from: "Mexico".into(),
            to: "Piassa".into(),
            error: Some("Please select valid locations from the suggestions".into()),
            notice: Some("Place list unavailable".into()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Please select valid locations from the suggestions"));
        assert!(html.contains("Place list unavailable"));
        assert!(html.contains(r#"value="Mexico""#));
    }

    #[test]
    fn suggestions_fragment_lists_places() {
        let html = SuggestionsTemplate {
            field: "from".into(),
            places: vec!["Mexico Square".into(), "Megenagna".into()],
        }
        .render()
        .unwrap();

        assert!(html.contains("Mexico Square"));
        assert!(html.contains("Megenagna"));
        assert!(!html.contains("<html"));
    }

    #[test]
    fn map_page_hides_empty_fare_breakdown() {
        let html = MapTemplate {
            container: MAP_CONTAINER,
            from: "Piassa".into(),
            to: "Piassa".into(),
            total: "0 Birr".into(),
            summary: "Piassa".into(),
            legs: vec![],
            scene_json: "[]".into(),
        }
        .render()
        .unwrap();

        assert!(html.contains("0 Birr"));
        assert!(html.contains(r#"id="map-container""#));
        assert!(!html.contains("fare-breakdown"));
    }
}
