//! Charting seam.
//!
//! The dashboard core hands plain per-province values to a
//! [`FigureRenderer`] and passes whatever it returns through to the page
//! untouched. [`PlotlyJsonRenderer`] is the default implementation and
//! emits Plotly figure JSON for the client to draw.

use adequacy_map_dashboard_models::RankingEntry;
use geo::Geometry;
use geojson::{FeatureCollection, JsonObject};
use serde_json::json;

use crate::DashboardError;

/// One province on the choropleth map.
#[derive(Debug, Clone, Copy)]
pub struct MapProvince<'a> {
    pub display_name: &'a str,
    pub adequacy_index: f64,
    pub geometry: &'a Geometry<f64>,
}

/// Produces the two visual fragments of the dashboard.
///
/// Implementations must be `Send + Sync` so one renderer can serve
/// concurrent requests.
pub trait FigureRenderer: Send + Sync {
    /// Renders the adequacy choropleth over every province.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the figure cannot be produced.
    fn choropleth(&self, provinces: &[MapProvince<'_>]) -> Result<String, DashboardError>;

    /// Renders the ranking bar chart.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the figure cannot be produced.
    fn ranking(&self, top: &[RankingEntry]) -> Result<String, DashboardError>;
}

/// Map styling for [`PlotlyJsonRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub color_scale: String,
    pub mapbox_style: String,
    pub zoom: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub opacity: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            color_scale: "YlOrRd".to_string(),
            mapbox_style: "carto-positron".to_string(),
            zoom: 4.5,
            center_lat: 13.5,
            center_lon: 100.6,
            opacity: 0.8,
        }
    }
}

/// Emits Plotly-compatible figure JSON.
#[derive(Debug, Clone, Default)]
pub struct PlotlyJsonRenderer {
    pub style: MapStyle,
}

/// Feature property the choropleth locations are matched against.
pub const FEATURE_ID_PROPERTY: &str = "province_name_th";

impl FigureRenderer for PlotlyJsonRenderer {
    fn choropleth(&self, provinces: &[MapProvince<'_>]) -> Result<String, DashboardError> {
        let features = provinces
            .iter()
            .map(|p| {
                let mut properties = JsonObject::new();
                properties.insert(FEATURE_ID_PROPERTY.to_string(), p.display_name.into());
                properties.insert("A_i".to_string(), p.adequacy_index.into());
                adequacy_map_spatial::to_feature(p.geometry, properties)
            })
            .collect();
        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };

        let names: Vec<&str> = provinces.iter().map(|p| p.display_name).collect();
        let values: Vec<f64> = provinces.iter().map(|p| p.adequacy_index).collect();
        let style = &self.style;

        let figure = json!({
            "data": [
                {
                    "type": "choroplethmapbox",
                    "geojson": collection,
                    "featureidkey": format!("properties.{FEATURE_ID_PROPERTY}"),
                    "locations": names,
                    "z": values,
                    "hovertext": names,
                    "colorscale": style.color_scale,
                    "marker": { "opacity": style.opacity },
                    "colorbar": { "title": { "text": "A_i" } },
                },
                {
                    "type": "scattermapbox",
                    "name": "highlight",
                    "mode": "lines",
                    "lat": [],
                    "lon": [],
                    "line": { "color": "cyan", "width": 4 },
                },
            ],
            "layout": {
                "mapbox": {
                    "style": style.mapbox_style,
                    "zoom": style.zoom,
                    "center": { "lat": style.center_lat, "lon": style.center_lon },
                },
                "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            },
        });

        Ok(serde_json::to_string(&figure)?)
    }

    fn ranking(&self, top: &[RankingEntry]) -> Result<String, DashboardError> {
        let names: Vec<&str> = top.iter().map(|e| e.province_name_th.as_str()).collect();
        let values: Vec<f64> = top.iter().map(|e| e.adequacy_index).collect();

        let figure = json!({
            "data": [
                {
                    "type": "bar",
                    "orientation": "h",
                    "x": values,
                    "y": names,
                    "marker": { "color": values, "colorscale": self.style.color_scale },
                },
            ],
            "layout": {
                "xaxis": { "title": { "text": "A_i" } },
                "yaxis": { "autorange": "reversed" },
                "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            },
        });

        Ok(serde_json::to_string(&figure)?)
    }
}
