use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vehicle {
    Bike,
    Scooter,
    Car,
}

impl Vehicle {
    pub const ALL: [Vehicle; 3] = [Vehicle::Bike, Vehicle::Scooter, Vehicle::Car];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vehicle::Bike => "bike",
            Vehicle::Scooter => "scooter",
            Vehicle::Car => "car",
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// uniform over the catalog
impl Distribution<Vehicle> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vehicle {
        Vehicle::ALL[rng.random_range(0..Vehicle::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_bike_scooter_car() {
        let names: Vec<&str> = Vehicle::ALL.iter().map(Vehicle::as_str).collect();
        assert_eq!(names, ["bike", "scooter", "car"]);
        assert_eq!(Vehicle::Scooter.to_string(), "scooter");
    }

    #[test]
    fn sampling_covers_whole_catalog() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<Vehicle> = (0..1_000).map(|_| rng.random::<Vehicle>()).collect();
        assert_eq!(seen.len(), Vehicle::ALL.len());
    }
}
