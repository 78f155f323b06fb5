use foundation::math::GeoPoint;

use crate::network::NetworkInfo;

/// Where the user currently is, if anywhere is known.
///
/// Geolocation is ambient device state; the engine consumes it through this
/// seam so it can be driven in tests without a real device.
pub trait LocationSource {
    fn current(&self) -> Option<GeoPoint>;
}

/// Connection quality, same deal as [`LocationSource`].
pub trait NetworkMonitor {
    fn snapshot(&self) -> Option<NetworkInfo>;
}

/// A location that never changes (or is never available).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FixedLocation(pub Option<GeoPoint>);

impl LocationSource for FixedLocation {
    fn current(&self) -> Option<GeoPoint> {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FixedNetwork(pub Option<NetworkInfo>);

impl NetworkMonitor for FixedNetwork {
    fn snapshot(&self) -> Option<NetworkInfo> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedLocation, LocationSource};
    use foundation::math::GeoPoint;

    #[test]
    fn fixed_location_round_trips() {
        assert_eq!(FixedLocation::default().current(), None);
        let here = GeoPoint::new(40.7, -74.0);
        assert_eq!(FixedLocation(Some(here)).current(), Some(here));
    }
}
