//! Configuration for itinerary building.

/// Options that shape how a path is rendered as an itinerary.
#[derive(Debug, Clone)]
pub struct ItineraryConfig {
    /// Departure location label given to every walk leg.
    pub walk_label: String,

    /// Whether to ask the fare resolver for a price.
    pub compute_fare: bool,

    /// Whether to compare each trip update's stop count with the timetable.
    /// A mismatch is only logged.
    pub check_trip_updates: bool,
}

impl ItineraryConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        walk_label: impl Into<String>,
        compute_fare: bool,
        check_trip_updates: bool,
    ) -> Self {
        Self {
            walk_label: walk_label.into(),
            compute_fare,
            check_trip_updates,
        }
    }

    /// Returns the walk leg label.
    pub fn walk_label(&self) -> &str {
        &self.walk_label
    }
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            walk_label: "Walk".to_string(),
            compute_fare: true,
            check_trip_updates: true,
        }
    }
}
