//! Map state for drawing a route: the pure route geometry and the single owned map view
use crate::gps::{Bounds, Location};
use crate::reading::Reading;

/// Center used before any data is shown (Mexico City)
pub const FALLBACK_CENTER: (f64, f64) = (19.432608, -99.133209);
/// Where the dashboard map starts before a route is drawn
pub const INITIAL_CENTER: (f64, f64) = (19.4326, -99.1332);
pub const INITIAL_ZOOM: f64 = 12.0;
/// Zoom used when centering on a single route's first point
pub const ROUTE_ZOOM: f64 = 16.0;
pub const MAX_ZOOM: f64 = 18.0;
/// Nominal size in pixels of the surface the map is laid out on
pub const DEFAULT_MAP_SIZE: (u32, u32) = (960, 520);

const TILE_SIZE: f64 = 256.0;

/// A labelled point of interest placed on the map
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    location: Location,
    label: String,
}

impl Marker {
    pub fn new(location: Location, label: String) -> Self {
        Marker { location, label }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// What should be drawn for a sequence of readings
#[derive(Clone, Debug, PartialEq)]
pub struct RouteGeometry {
    pub center: Location,
    /// every point in order, empty unless there are at least two points
    pub line: Vec<Location>,
    pub start: Option<Marker>,
    pub end: Option<Marker>,
}

impl RouteGeometry {
    pub fn from_points(points: &[Reading]) -> Self {
        let center = points
            .first()
            .map(|p| Location::new(p.lat, p.lon))
            .unwrap_or_else(|| Location::new(FALLBACK_CENTER.0, FALLBACK_CENTER.1));
        let line: Vec<Location> = points.iter().map(|p| Location::new(p.lat, p.lon)).collect();
        if line.len() > 1 {
            let start = Marker::new(line[0], "Start".to_string());
            let end = Marker::new(line[line.len() - 1], "End".to_string());
            RouteGeometry {
                center,
                line,
                start: Some(start),
                end: Some(end),
            }
        } else {
            RouteGeometry {
                center,
                line: Vec::new(),
                start: None,
                end: None,
            }
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.start.iter().chain(self.end.iter())
    }
}

/// Geographic window currently visible on a map surface, based on 256px Web Mercator tiles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    center: Location,
    zoom: f64,
    size: (u32, u32),
}

impl Viewport {
    pub fn centered(center: Location, zoom: f64, size: (u32, u32)) -> Self {
        Viewport {
            center,
            zoom: zoom.min(MAX_ZOOM),
            size,
        }
    }

    /// Largest whole zoom level that shows all of `bounds` with `padding` pixels spare on
    /// every side
    pub fn fit(bounds: &Bounds, size: (u32, u32), padding: u32) -> Self {
        let center = bounds.center();
        let usable_w = (size.0 as f64 - 2.0 * padding as f64).max(1.0);
        let usable_h = (size.1 as f64 - 2.0 * padding as f64).max(1.0);
        let lat_scale = center.latitude().to_radians().cos().max(1e-6);

        // degrees of longitude per pixel needed along each axis
        let needed = (bounds.lon_span() / usable_w).max(bounds.lat_span() / (usable_h * lat_scale));
        let zoom = if needed > 0.0 {
            (360.0 / (TILE_SIZE * needed)).log2().floor().min(MAX_ZOOM)
        } else {
            // single point, nothing to fit so zoom all the way in
            MAX_ZOOM
        };
        Viewport { center, zoom, size }
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Degrees of longitude covered by one pixel
    fn degrees_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE * 2f64.powf(self.zoom))
    }

    /// The geographic box visible on the surface
    pub fn bounds(&self) -> Bounds {
        let dpp = self.degrees_per_pixel();
        let half_lon = self.size.0 as f64 * dpp / 2.0;
        let half_lat =
            self.size.1 as f64 * dpp * self.center.latitude().to_radians().cos().abs() / 2.0;
        Bounds {
            south: (self.center.latitude() - half_lat).max(-90.0),
            west: self.center.longitude() - half_lon,
            north: (self.center.latitude() + half_lat).min(90.0),
            east: self.center.longitude() + half_lon,
        }
    }

    /// Link to the same view on openstreetmap.org
    pub fn osm_link(&self) -> String {
        format!(
            "https://www.openstreetmap.org/#map={}/{:.5}/{:.5}",
            self.zoom.round() as i32,
            self.center.latitude(),
            self.center.longitude()
        )
    }
}

/// The dashboard's map surface. Created once and mutated in place as routes are drawn and
/// cleared.
#[derive(Clone, Debug)]
pub struct MapView {
    viewport: Viewport,
    polyline: Option<Vec<Location>>,
    markers: Vec<Marker>,
}

impl MapView {
    pub fn new(size: (u32, u32)) -> Self {
        MapView {
            viewport: Viewport::centered(
                Location::new(INITIAL_CENTER.0, INITIAL_CENTER.1),
                INITIAL_ZOOM,
                size,
            ),
            polyline: None,
            markers: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn polyline(&self) -> Option<&[Location]> {
        self.polyline.as_deref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn has_route(&self) -> bool {
        self.polyline.is_some() || !self.markers.is_empty()
    }

    /// Remove the route line and its markers, the viewport is left where it is
    pub fn clear_route(&mut self) {
        self.polyline = None;
        self.markers.clear();
    }

    /// Replace the current route with a line through `points` and start/end markers
    pub fn draw_route(&mut self, points: &[Location]) {
        self.clear_route();
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return,
        };
        self.polyline = Some(points.to_vec());
        self.markers.push(Marker::new(first, "Start".to_string()));
        self.markers.push(Marker::new(last, "End".to_string()));
    }

    /// Replace the current route with a precomputed geometry and center on it
    pub fn show_geometry(&mut self, geometry: &RouteGeometry) {
        self.clear_route();
        if !geometry.line.is_empty() {
            self.polyline = Some(geometry.line.clone());
        }
        self.markers.extend(geometry.markers().cloned());
        self.viewport = Viewport::centered(geometry.center, ROUTE_ZOOM, self.viewport.size());
    }

    /// Move the viewport so the whole route is visible, does nothing without a route
    pub fn fit_route(&mut self, padding: u32) {
        let bounds = match self.polyline.as_deref().and_then(Bounds::from_locations) {
            Some(bounds) => bounds,
            None => return,
        };
        self.viewport = Viewport::fit(&bounds, self.viewport.size(), padding);
    }
}

impl Default for MapView {
    fn default() -> Self {
        MapView::new(DEFAULT_MAP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: i64, lat: f64, lon: f64) -> Reading {
        Reading {
            id,
            device_id: String::new(),
            lat,
            lon,
            alt_m: None,
            read_at: None,
            ts: None,
        }
    }

    #[test]
    fn empty_geometry_uses_fallback_center() {
        let geometry = RouteGeometry::from_points(&[]);
        assert_eq!(
            geometry.center,
            Location::new(FALLBACK_CENTER.0, FALLBACK_CENTER.1)
        );
        assert!(geometry.line.is_empty());
        assert_eq!(geometry.markers().count(), 0);
    }

    #[test]
    fn single_point_geometry_has_no_line_or_markers() {
        let geometry = RouteGeometry::from_points(&[reading(1, 20.0, -100.0)]);
        assert_eq!(geometry.center, Location::new(20.0, -100.0));
        assert!(geometry.line.is_empty());
        assert!(geometry.start.is_none());
        assert!(geometry.end.is_none());
    }

    #[test]
    fn multi_point_geometry_marks_both_ends() {
        let points = vec![
            reading(1, 20.0, -100.0),
            reading(2, 20.1, -100.1),
            reading(3, 20.2, -100.2),
        ];
        let geometry = RouteGeometry::from_points(&points);
        assert_eq!(geometry.line.len(), 3);
        assert_eq!(geometry.start.as_ref().unwrap().latitude(), 20.0);
        assert_eq!(geometry.end.as_ref().unwrap().latitude(), 20.2);
        assert_eq!(geometry.end.as_ref().unwrap().label(), "End");
    }

    #[test]
    fn fitted_viewport_contains_the_route() {
        let route = [
            Location::new(19.40, -99.20),
            Location::new(19.45, -99.10),
            Location::new(19.42, -99.15),
        ];
        let bounds = Bounds::from_locations(&route).unwrap();
        let viewport = Viewport::fit(&bounds, DEFAULT_MAP_SIZE, 24);
        let visible = viewport.bounds();
        assert!(route.iter().all(|p| visible.contains(p)));
        assert!(viewport.zoom() <= MAX_ZOOM);

        // one zoom level closer would no longer fit
        let closer = Viewport::centered(viewport.center(), viewport.zoom() + 1.0, DEFAULT_MAP_SIZE);
        assert!(!route.iter().all(|p| closer.bounds().contains(p)));
    }

    #[test]
    fn single_point_fit_zooms_in_fully() {
        let p = Location::new(19.0, -99.0);
        let bounds = Bounds::from_locations(&[p]).unwrap();
        let viewport = Viewport::fit(&bounds, DEFAULT_MAP_SIZE, 24);
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        assert!(viewport.bounds().contains(&p));
    }

    #[test]
    fn drawing_replaces_previous_layers() {
        let mut map = MapView::default();
        map.draw_route(&[Location::new(1.0, 1.0), Location::new(2.0, 2.0)]);
        map.draw_route(&[Location::new(3.0, 3.0)]);
        assert_eq!(map.polyline().unwrap().len(), 1);
        assert_eq!(map.markers().len(), 2);
        map.clear_route();
        assert!(!map.has_route());
    }

    #[test]
    fn fit_route_without_route_keeps_viewport() {
        let mut map = MapView::default();
        let before = *map.viewport();
        map.fit_route(24);
        assert_eq!(*map.viewport(), before);
    }

    #[test]
    fn osm_link_points_at_center() {
        let viewport = Viewport::centered(Location::new(19.4326, -99.1332), 12.0, (960, 520));
        assert_eq!(
            viewport.osm_link(),
            "https://www.openstreetmap.org/#map=12/19.43260/-99.13320"
        );
    }
}
