//! Answer-circle map document
//!
//! Renders a standalone Leaflet page with a circle around the sampled point,
//! a viewport fitted to the framed bounds, and a self-closing timer.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::CircleConfig;
use crate::geodesy;
use crate::models::{BoundingBox, GeoPoint, Radius};

const LEAFLET_VERSION: &str = "1.9.4";

/// Everything needed to draw one answer circle
#[derive(Debug, Clone, Serialize)]
pub struct CircleMap {
    pub center: GeoPoint,
    pub radius: Radius,
    pub bounds: BoundingBox,
    pub fit_padding_px: u32,
    pub fallback_zoom: u8,
    pub auto_close_ms: u64,
}

impl CircleMap {
    /// Circle of `radius` around an already sampled `center`, framed for display
    #[must_use]
    pub fn new(center: GeoPoint, radius: Radius, config: &CircleConfig) -> Self {
        Self {
            center,
            radius,
            bounds: geodesy::frame(center, radius.km()),
            fit_padding_px: config.fit_padding_px,
            fallback_zoom: config.fallback_zoom,
            auto_close_ms: config.auto_close_ms,
        }
    }

    /// Bounds as Leaflet expects them. Across the antimeridian the edge on the
    /// far side of the circle's center is unwrapped, so `west < east` and the
    /// center stays inside the box.
    fn leaflet_bounds(&self) -> (f64, f64, f64, f64) {
        let BoundingBox {
            south,
            mut west,
            north,
            mut east,
        } = self.bounds;
        if self.bounds.crosses_antimeridian() {
            if self.center.longitude < 0.0 {
                west -= 360.0;
            } else {
                east += 360.0;
            }
        }
        (south, west, north, east)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let lat = self.center.latitude;
        let lng = self.center.longitude;
        let radius_m = self.radius.to_meters();
        let (south, west, north, east) = self.leaflet_bounds();
        let padding = self.fit_padding_px;
        let zoom = self.fallback_zoom;
        let auto_close = if self.auto_close_ms > 0 {
            format!(
                "    setTimeout(() => window.close(), {});\n",
                self.auto_close_ms
            )
        } else {
            String::new()
        };

        format!(
            r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Answer Circle</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
  <style>html, body, #map {{ height: 100%; margin: 0; padding: 0; }}</style>
</head>
<body>
  <div id="map"></div>
  <script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
  <script>
    const map = L.map('map', {{worldCopyJump: true}});
    L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      subdomains: 'abc', maxZoom: 19, attribution: '&copy; OpenStreetMap contributors'
    }}).addTo(map);
    L.circle([{lat}, {lng}], {{
      color: 'red', fillColor: '#f03', fillOpacity: 0.25, radius: {radius_m}
    }}).addTo(map);
    const bounds = L.latLngBounds([{south}, {west}], [{north}, {east}]);
    function fitMap() {{
      try {{ map.invalidateSize(); map.fitBounds(bounds, {{padding: [{padding}, {padding}]}}); }}
      catch (e) {{ map.setView([{lat}, {lng}], {zoom}); }}
    }}
    map.whenReady(fitMap);
    setTimeout(fitMap, 200);
{auto_close}  </script>
</body>
</html>
"#
        )
    }

    /// Render and write the document to `path`
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, self.render())?;
        info!(
            "Answer circle ({} km) written to {}",
            self.radius.km(),
            path.display()
        );
        Ok(())
    }
}
