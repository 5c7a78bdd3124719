//! Origin/destination selection with autocomplete.

use std::fmt;

use tracing::debug;

use crate::places::PlaceIndex;

/// Shown when either field doesn't name a known place.
pub const INVALID_SELECTION: &str = "Please select valid locations from the suggestions";

/// Which of the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Origin,
    Destination,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Origin => f.write_str("from"),
            Field::Destination => f.write_str("to"),
        }
    }
}

/// One text input and its suggestion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionField {
    text: String,
    suggestions: Vec<String>,
}

impl SuggestionField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    fn input(&mut self, text: &str, index: &PlaceIndex) {
        self.text = text.to_string();
        self.suggestions = index.search(text);
    }

    fn pick(&mut self, name: &str) {
        self.text = name.to_string();
        self.suggestions.clear();
    }
}

/// Where to go after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
}

/// One or both fields don't name a known place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{INVALID_SELECTION}")]
pub struct ValidationError {
    /// The fields that failed, origin first.
    pub fields: Vec<Field>,
}

/// The search page's form state.
///
/// The two fields are independent: typing in one never touches the other's
/// suggestions.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    origin: SuggestionField,
    destination: SuggestionField,
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form with both fields pre-filled, as submitted from a plain GET.
    pub fn filled(from: &str, to: &str) -> Self {
        let mut form = Self::new();
        form.pick(Field::Origin, from);
        form.pick(Field::Destination, to);
        form
    }

    pub fn field(&self, field: Field) -> &SuggestionField {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut SuggestionField {
        match field {
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
        }
    }

    /// Update `field`'s text and recompute its suggestions.
    pub fn input(&mut self, field: Field, text: &str, index: &PlaceIndex) {
        self.field_mut(field).input(text, index);
    }

    /// Take a suggestion: set the text and close the list.
    pub fn pick(&mut self, field: Field, name: &str) {
        self.field_mut(field).pick(name);
    }

    /// Validate both fields and build the map view URL.
    ///
    /// Matching is case-insensitive; the URL carries the text as typed.
    pub fn submit(&self, index: &PlaceIndex) -> Result<Navigation, ValidationError> {
        let fields: Vec<Field> = [Field::Origin, Field::Destination]
            .into_iter()
            .filter(|f| index.resolve(self.field(*f).text()).is_none())
            .collect();

        if !fields.is_empty() {
            debug!(?fields, "search rejected");
            return Err(ValidationError { fields });
        }

        Ok(Navigation {
            url: map_url(self.origin.text(), self.destination.text()),
        })
    }
}

/// `/map?from=..&to=..`, encoded the way browsers' `encodeURIComponent` does.
pub fn map_url(from: &str, to: &str) -> String {
    format!(
        "/map?from={}&to={}",
        urlencoding::encode(from),
        urlencoding::encode(to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LngLat, Place};

    fn place(name: &str) -> Place {
        Place {
            name: name.to_string(),
            location: LngLat::new(38.75, 9.02).unwrap(),
            stations: vec![format!("{name} Station")],
            connected_to: None,
        }
    }

    fn index() -> PlaceIndex {
        PlaceIndex::new(["Mexico Square", "Piassa", "Arat Kilo", "Megenagna"].map(place))
    }

    #[test]
    fn typing_fills_only_that_fields_suggestions() {
        let index = index();
        let mut form = SearchForm::new();

        form.input(Field::Origin, "me", &index);

        assert_eq!(
            form.field(Field::Origin).suggestions(),
            &["Megenagna".to_string(), "Mexico Square".to_string()]
        );
        assert!(form.field(Field::Destination).suggestions().is_empty());
    }

    #[test]
    fn suggestions_list_every_match() {
        let index = PlaceIndex::new((0..12).map(|i| place(&format!("Addis {i:02}"))));
        let mut form = SearchForm::new();

        form.input(Field::Origin, "addis", &index);

        let shown = form.field(Field::Origin).suggestions();
        assert_eq!(shown.len(), 12);
        assert_eq!(shown[11], "Addis 11");
    }

    #[test]
    fn clearing_text_clears_suggestions() {
        let index = index();
        let mut form = SearchForm::new();
        form.input(Field::Destination, "pi", &index);
        assert_eq!(form.field(Field::Destination).suggestions().len(), 1);

        form.input(Field::Destination, "", &index);
        assert!(form.field(Field::Destination).suggestions().is_empty());
    }

    #[test]
    fn pick_sets_text_and_closes_list() {
        let index = index();
        let mut form = SearchForm::new();
        form.input(Field::Origin, "kil", &index);

        form.pick(Field::Origin, "Arat Kilo");

        assert_eq!(form.field(Field::Origin).text(), "Arat Kilo");
        assert!(form.field(Field::Origin).suggestions().is_empty());
    }

    #[test]
    fn submit_navigates_with_text_as_typed() {
        let index = index();
        let mut form = SearchForm::new();
        form.input(Field::Origin, "mexico square", &index);
        form.input(Field::Destination, "Piassa", &index);

        let nav = form.submit(&index).unwrap();
        assert_eq!(nav.url, "/map?from=mexico%20square&to=Piassa");
    }

    #[test]
    fn submit_rejects_unknown_names() {
        let index = index();
        let form = SearchForm::filled("Mexico", "Piassa");

        let err = form.submit(&index).unwrap_err();
        assert_eq!(err.fields, vec![Field::Origin]);
        assert_eq!(err.to_string(), INVALID_SELECTION);

        let err = SearchForm::filled("", "Bole").submit(&index).unwrap_err();
        assert_eq!(err.fields, vec![Field::Origin, Field::Destination]);
    }

    #[test]
    fn map_url_encodes_like_a_browser() {
        assert_eq!(
            map_url("Arat Kilo", "Sidist Kilo & Co"),
            "/map?from=Arat%20Kilo&to=Sidist%20Kilo%20%26%20Co"
        );
    }
}
