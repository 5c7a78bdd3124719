//! Map appearance and behaviour settings.

use serde::Serialize;

use crate::domain::LatLng;

/// Addis Ababa city centre.
const DEFAULT_CENTER: LatLng = LatLng::from_const(9.0222, 38.7468);

const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// The marker drawn for each station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerIcon {
    /// Inline HTML for a div icon.
    pub html: String,
    pub class_name: String,
    /// Width and height in pixels.
    pub size: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            html: "🚖".to_string(),
            class_name: "taxi-marker".to_string(),
            size: [25, 25],
        }
    }
}

/// How the turn-by-turn path overlay is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStyle {
    pub line_color: String,
    pub line_weight: u32,
    /// Lets the rider drag waypoints to explore alternatives. The fare panel
    /// never follows the dragged path.
    pub draggable_waypoints: bool,
    pub route_while_dragging: bool,
    /// Whether the routing plugin shows its own itinerary panel.
    pub show_itinerary: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_color: "#6FA1EC".to_string(),
            line_weight: 4,
            draggable_waypoints: true,
            route_while_dragging: true,
            show_itinerary: false,
        }
    }
}

/// Configuration for the map view.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Where a fresh map is centred before any route is drawn.
    pub center: LatLng,

    /// Initial zoom.
    pub zoom: u8,

    /// Base tile layer URL template.
    pub tile_url: String,

    pub attribution: String,

    /// Pixel padding around the stations when fitting the viewport.
    pub fit_padding: [u32; 2],

    /// Zoom ceiling for the fit, so stations a street apart aren't shown
    /// at building level.
    pub max_fit_zoom: u8,

    pub marker_icon: MarkerIcon,

    pub overlay: OverlayStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: 13,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            fit_padding: [50, 50],
            max_fit_zoom: 15,
            marker_icon: MarkerIcon::default(),
            overlay: OverlayStyle::default(),
        }
    }
}
