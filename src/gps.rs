//! Module with GPS specific structures and great-circle math

/// Mean earth radius in meters used by the haversine formula
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
    /// altitude in meters if available
    altitude: Option<f64>,
}

impl Location {
    /// Create a location without altitude data from coordinates in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
            altitude: None,
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Return altitude in meters (if defined)
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn set_altitude(&mut self, altitude: Option<f64>) {
        self.altitude = altitude;
    }
}

/// Great-circle distance in meters between two points using the haversine formula.
///
/// Coordinates are not validated, values outside of -90..90 and -180..180 produce a number but
/// it won't mean much.
pub fn distance(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Total length of the path through the points in order, zero for fewer than two points
pub fn path_distance(points: &[Location]) -> f64 {
    points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
}

/// Axis aligned box around a set of points, in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, `None` if there are no points
    pub fn from_locations(points: &[Location]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south: first.latitude(),
            west: first.longitude(),
            north: first.latitude(),
            east: first.longitude(),
        };
        for location in &points[1..] {
            bounds.south = bounds.south.min(location.latitude());
            bounds.north = bounds.north.max(location.latitude());
            bounds.west = bounds.west.min(location.longitude());
            bounds.east = bounds.east.max(location.longitude());
        }
        Some(bounds)
    }

    pub fn center(&self) -> Location {
        Location::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn contains(&self, location: &Location) -> bool {
        location.latitude() >= self.south
            && location.latitude() <= self.north
            && location.longitude() >= self.west
            && location.longitude() <= self.east
    }
}
