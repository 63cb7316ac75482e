//! Synthetic hospital catalog used when no provider answers.
//!
//! Four entries are anchored in north Bangalore; four more are placed at
//! fixed angular offsets from the query point so the pipeline stays
//! exercisable anywhere. All ids live under [`SYNTHETIC_ID_PREFIX`].
//!
//! [`SYNTHETIC_ID_PREFIX`]: crate::hospital::SYNTHETIC_ID_PREFIX

use crate::geo::Coordinate;
use crate::hospital::HospitalRecord;

const DEMO_TYPES: [&str; 2] = ["hospital", "health"];

struct Anchored {
    id: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    address: &'static str,
    rating: f64,
    ratings: u32,
}

const ANCHORED: [Anchored; 4] = [
    Anchored {
        id: "demo_ramaiah_memorial",
        name: "M.S. Ramaiah Memorial Hospital",
        lat: 13.0340,
        lng: 77.5520,
        address: "MSR Nagar, MSRIT Post, Mathikere, Bangalore 560054",
        rating: 4.2,
        ratings: 1250,
    },
    Anchored {
        id: "demo_manipal_hebbal",
        name: "Manipal Hospital Hebbal",
        lat: 13.0458,
        lng: 77.5840,
        address: "Kirloskar Business Park, Bellary Road, Hebbal, Bangalore 560024",
        rating: 4.1,
        ratings: 890,
    },
    Anchored {
        id: "demo_apollo_yeshwantpur",
        name: "Apollo Hospital Yeshwantpur",
        lat: 13.0220,
        lng: 77.5380,
        address: "Yeshwantpur, Bangalore 560022",
        rating: 4.3,
        ratings: 2100,
    },
    Anchored {
        id: "demo_fortis_hospital",
        name: "Fortis Hospital Rajajinagar",
        lat: 13.0250,
        lng: 77.5580,
        address: "Rajajinagar, Bangalore 560010",
        rating: 4.0,
        ratings: 1580,
    },
];

struct Offset {
    id: &'static str,
    name: &'static str,
    dlat: f64,
    dlng: f64,
    district: &'static str,
    rating: f64,
    ratings: u32,
}

const OFFSETS: [Offset; 4] = [
    Offset {
        id: "demo_general_hospital_1",
        name: "City General Hospital",
        dlat: 0.012,
        dlng: 0.008,
        district: "Medical District",
        rating: 4.0,
        ratings: 500,
    },
    Offset {
        id: "demo_medical_center_1",
        name: "Regional Medical Center",
        dlat: -0.018,
        dlng: 0.015,
        district: "Healthcare Complex",
        rating: 3.9,
        ratings: 750,
    },
    Offset {
        id: "demo_specialty_hospital",
        name: "Specialty Care Hospital",
        dlat: 0.025,
        dlng: -0.020,
        district: "Specialty Medical Center",
        rating: 4.4,
        ratings: 320,
    },
    Offset {
        id: "demo_community_hospital",
        name: "Community Health Center",
        dlat: -0.008,
        dlng: -0.006,
        district: "Community Health District",
        rating: 3.8,
        ratings: 420,
    },
];

/// Every catalog entry for `origin`, before radius filtering.
pub fn demo_catalog(origin: Coordinate) -> Vec<HospitalRecord> {
    let anchored = ANCHORED.iter().map(|a| {
        HospitalRecord::new(a.id, a.name, Coordinate::new(a.lat, a.lng), a.address)
            .with_rating(a.rating, a.ratings)
            .with_types(DEMO_TYPES)
    });

    let offsets = OFFSETS.iter().map(|o| {
        let location = origin.offset(o.dlat, o.dlng);
        let address = format!("{}, {:.4}, {:.4}", o.district, location.lat, location.lng);
        HospitalRecord::new(o.id, o.name, location, address)
            .with_rating(o.rating, o.ratings)
            .with_types(DEMO_TYPES)
    });

    anchored.chain(offsets).collect()
}
