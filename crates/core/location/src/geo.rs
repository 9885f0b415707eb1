use crate::Coordinates;

/// Base-32 alphabet shared by geohash implementations
const BASE32: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Mean Earth radius in kilometres
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Encode coordinates into a geohash of the given length.
///
/// Nearby coordinates share string prefixes, which is what the feed
/// relies on for proximity grouping. The encoding is deterministic:
/// identical input always yields the identical string.
pub fn encode_geohash(coords: Coordinates, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);

    let mut hash = String::with_capacity(precision);
    let mut bits: usize = 0;
    let mut bit_count = 0;
    // bits alternate longitude first, then latitude
    let mut even_bit = true;

    while hash.len() < precision {
        if even_bit {
            let mid = (lon_range.0 + lon_range.1) / 2.0;
            if coords.longitude >= mid {
                bits = (bits << 1) | 1;
                lon_range.0 = mid;
            } else {
                bits <<= 1;
                lon_range.1 = mid;
            }
        } else {
            let mid = (lat_range.0 + lat_range.1) / 2.0;
            if coords.latitude >= mid {
                bits = (bits << 1) | 1;
                lat_range.0 = mid;
            } else {
                bits <<= 1;
                lat_range.1 = mid;
            }
        }

        even_bit = !even_bit;
        bit_count += 1;

        if bit_count == 5 {
            hash.push(BASE32[bits] as char);
            bits = 0;
            bit_count = 0;
        }
    }

    hash
}

/// Great-circle distance between two coordinates in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geohash_is_deterministic() {
        let coords = Coordinates {
            latitude: 54.57,
            longitude: -1.23,
        };

        assert_eq!(
            encode_geohash(coords, 10),
            encode_geohash(coords, 10)
        );
    }

    #[test]
    fn geohash_known_value() {
        // Greenwich observatory
        let coords = Coordinates {
            latitude: 51.4779,
            longitude: -0.0015,
        };

        assert!(encode_geohash(coords, 10).starts_with("gcpuz"));
    }

    #[test]
    fn nearby_coordinates_share_a_prefix() {
        let a = Coordinates {
            latitude: 54.5700,
            longitude: -1.2300,
        };
        let b = Coordinates {
            latitude: 54.5701,
            longitude: -1.2301,
        };

        let ha = encode_geohash(a, 10);
        let hb = encode_geohash(b, 10);
        assert_eq!(ha[..5], hb[..5]);
    }

    #[test]
    fn haversine_between_known_cities() {
        // Middlesbrough to London, roughly 330 km
        let middlesbrough = Coordinates {
            latitude: 54.5742,
            longitude: -1.2350,
        };
        let london = Coordinates {
            latitude: 51.5074,
            longitude: -0.1278,
        };

        let distance = haversine_km(middlesbrough, london);
        assert!(distance > 300.0 && distance < 360.0);
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let coords = Coordinates {
            latitude: 12.34,
            longitude: 56.78,
        };

        assert!(haversine_km(coords, coords) < 1e-9);
    }
}
