//! Page controllers.
//!
//! The search page (pick two places, get sent to the map) and the map view
//! (fetch the route, draw it, price it). Both work against a
//! [`PlaceIndex`](crate::places::PlaceIndex) snapshot so they can be tested
//! without the live directory.

mod map_view;
mod search;

pub use map_view::{
    LegRow, MAP_CONTAINER, MISSING_PARAMS, MapPage, MapQuery, MapReady, RouteView, load_map_view,
};
pub use search::{
    Field, INVALID_SELECTION, Navigation, SearchForm, SuggestionField, ValidationError, map_url,
};
