//! `distance`: great-circle distance between two points.

use skinhealth_lib::{estimate_route, haversine_km, Coordinate};

pub fn handle_distance(from: Coordinate, to: Coordinate, estimate: bool) {
    println!("{:.2} km", haversine_km(&from, &to));
    if estimate {
        let route = estimate_route(&from, &to);
        println!(
            "Estimated drive: {} ({})",
            route.distance_text, route.duration_text
        );
    }
}
