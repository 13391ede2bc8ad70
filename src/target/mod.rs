use http::Uri;
use rand::Rng;
use std::fmt;
use std::num::NonZeroU32;

use crate::config::Config;
use crate::vehicle::Vehicle;

/// One pending request: which replica to hit and which vehicle to order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub vehicle: Vehicle,
}

impl Target {
    pub fn uri(&self) -> Result<Uri, http::Error> {
        Uri::builder()
            .scheme("http")
            .authority(format!("{}:{}", self.host, self.port))
            .path_and_query(format!("/{}", self.vehicle))
            .build()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}/{}", self.host, self.port, self.vehicle)
    }
}

pub struct TargetPicker<R> {
    host_prefix: String,
    replicas: NonZeroU32,
    port: u16,
    rng: R,
}

impl<R: Rng> TargetPicker<R> {
    pub fn new(config: &Config, rng: R) -> Self {
        Self {
            host_prefix: config.host_prefix.clone(),
            replicas: config.replicas,
            port: config.tuning.port,
            rng,
        }
    }

    pub fn pick_replica(&mut self) -> u32 {
        self.rng.random_range(1..=self.replicas.get())
    }

    pub fn host_for(&self, replica: u32) -> String {
        format!("{}-{}", self.host_prefix, replica)
    }

    pub fn next_target(&mut self) -> Target {
        let replica = self.pick_replica();
        let vehicle: Vehicle = self.rng.random();
        Target {
            host: self.host_for(replica),
            port: self.port,
            vehicle,
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn config(prefix: &str, replicas: &str) -> Config {
        let (prefix, replicas) = (prefix.to_string(), replicas.to_string());
        Config::from_lookup(
            move |key| match key {
                "DEBUG" => Some("0".to_string()),
                "HOST_PREFIX" => Some(prefix.clone()),
                "REPLICAS" => Some(replicas.clone()),
                _ => None,
            },
            Tuning::default(),
        )
        .unwrap()
    }

    #[test]
    fn replica_index_stays_in_inclusive_range() {
        for replicas in ["1", "2", "7", "64"] {
            let config = config("svc", replicas);
            let upper = config.replicas.get();
            let mut picker = TargetPicker::new(&config, StdRng::seed_from_u64(upper as u64));
            for _ in 0..2_000 {
                let replica = picker.pick_replica();
                assert!((1..=upper).contains(&replica), "{replica} outside 1..={upper}");
            }
        }
    }

    #[test]
    fn fleet_of_three_only_produces_fleet_one_to_three() {
        let config = config("fleet", "3");
        let mut picker = TargetPicker::new(&config, StdRng::seed_from_u64(3));

        let hosts: HashSet<String> = (0..3_000).map(|_| picker.next_target().host).collect();
        let expected: HashSet<String> = ["fleet-1", "fleet-2", "fleet-3"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(hosts, expected);
    }

    #[test]
    fn single_replica_always_picks_one() {
        let config = config("solo", "1");
        let mut picker = TargetPicker::new(&config, StdRng::seed_from_u64(9));
        assert!((0..100).all(|_| picker.next_target().host == "solo-1"));
    }

    #[test]
    fn vehicles_come_from_catalog() {
        let config = config("fleet", "3");
        let mut picker = TargetPicker::new(&config, StdRng::seed_from_u64(11));
        for _ in 0..1_000 {
            let target = picker.next_target();
            assert!(Vehicle::ALL.contains(&target.vehicle));
        }
    }

    #[test]
    fn target_renders_plain_get_url() {
        let target = Target {
            host: "rideshare-2".to_string(),
            port: 5000,
            vehicle: Vehicle::Car,
        };
        let uri = target.uri().unwrap();
        assert_eq!(uri.to_string(), "http://rideshare-2:5000/car");
        assert_eq!(uri.query(), None);
        assert_eq!(target.to_string(), uri.to_string());
    }
}
