//! Static vehicle type/class catalog. These are fixed desk-side lookup
//! tables, not database rows.

pub fn vehicle_types() -> &'static [&'static str] {
    &["Car", "Truck", "SUV", "Van"]
}

pub fn classes_for(vehicle_type: &str) -> Option<&'static [&'static str]> {
    match vehicle_type {
        "Car" => Some(&[
            "Compact Car",
            "Premium Car",
            "Sporty Car",
            "Hybrid Car",
            "Economy Car",
            "Convertible Car",
            "Intermediate Car",
            "Luxury Car",
            "Full Size Car",
            "Standard Car",
            "Elite Car",
            "Electric Car",
        ]),
        "Truck" => Some(&[
            "Full Size Pickup",
            "Box Truck",
            "Small Pickup",
            "Refrigerated Truck",
        ]),
        "SUV" => Some(&[
            "Standard SUV",
            "Premium & Luxury SUV",
            "Electric SUV",
            "Intermediate SUV",
            "Compact SUV",
            "Jeeps",
            "Full Size SUV",
            "Hybrid SUV",
        ]),
        "Van" => Some(&[
            "Cargo Van",
            "Passenger Van",
            "Refrigerated Van",
            "Minivan",
        ]),
        _ => None,
    }
}

pub fn is_valid_class(vehicle_type: &str, vehicle_class: &str) -> bool {
    classes_for(vehicle_type)
        .map(|classes| classes.contains(&vehicle_class))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_classes() {
        for vehicle_type in vehicle_types() {
            assert!(classes_for(vehicle_type).is_some_and(|c| !c.is_empty()));
        }
    }

    #[test]
    fn class_validation_is_type_scoped() {
        assert!(is_valid_class("Car", "Compact Car"));
        assert!(is_valid_class("Van", "Minivan"));
        assert!(!is_valid_class("Car", "Minivan"));
        assert!(!is_valid_class("Boat", "Compact Car"));
    }
}
