//! Timetable rides and distance-annotated legs.
//!
//! A `Ride` is one row of the cleaned timetable: a train running from one
//! stop to the next. Once the distance network is complete, every ride is
//! annotated with its length and becomes a `Leg`, the unit the search
//! engine works with.

use super::{DomainError, Minute, ServiceClass, ServiceId, Station};

/// One scheduled ride segment between two consecutive stops of a train.
///
/// # Invariants
///
/// - `arrival > departure`
/// - `origin != destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ride {
    origin: Station,
    destination: Station,
    departure: Minute,
    arrival: Minute,
    class: ServiceClass,
    service: ServiceId,
}

impl Ride {
    /// Construct a ride, validating its invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use km_planner::domain::{Minute, Ride, ServiceClass, ServiceId, Station};
    ///
    /// let ride = Ride::new(
    ///     Station::parse("Ht").unwrap(),
    ///     Station::parse("Vg").unwrap(),
    ///     Minute::new(100),
    ///     Minute::new(106),
    ///     ServiceClass::Local,
    ///     ServiceId::new("6432").unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(ride.duration_mins(), 6);
    ///
    /// // Arriving before departing is rejected
    /// assert!(Ride::new(
    ///     Station::parse("Ht").unwrap(),
    ///     Station::parse("Vg").unwrap(),
    ///     Minute::new(106),
    ///     Minute::new(100),
    ///     ServiceClass::Local,
    ///     ServiceId::new("6432").unwrap(),
    /// )
    /// .is_err());
    /// ```
    pub fn new(
        origin: Station,
        destination: Station,
        departure: Minute,
        arrival: Minute,
        class: ServiceClass,
        service: ServiceId,
    ) -> Result<Self, DomainError> {
        if arrival <= departure {
            return Err(DomainError::InvalidRide {
                from: origin,
                to: destination,
                reason: "arrival must be after departure",
            });
        }

        if origin == destination {
            return Err(DomainError::InvalidRide {
                from: origin,
                to: destination,
                reason: "origin and destination must differ",
            });
        }

        Ok(Ride {
            origin,
            destination,
            departure,
            arrival,
            class,
            service,
        })
    }

    /// Station the ride departs from.
    pub fn origin(&self) -> &Station {
        &self.origin
    }

    /// Station the ride arrives at.
    pub fn destination(&self) -> &Station {
        &self.destination
    }

    /// Departure instant.
    pub fn departure(&self) -> Minute {
        self.departure
    }

    /// Arrival instant.
    pub fn arrival(&self) -> Minute {
        self.arrival
    }

    /// Service class of the train.
    pub fn class(&self) -> ServiceClass {
        self.class
    }

    /// Id of the running train.
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Travel time in minutes (always positive).
    pub fn duration_mins(&self) -> i64 {
        self.arrival - self.departure
    }
}

/// A ride annotated with its distance in kilometres.
///
/// Legs are read-only inputs to the search and are shared between
/// branches behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    ride: Ride,
    distance_km: f64,
}

impl Leg {
    /// Annotate a ride with its distance.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the distance is negative or not finite.
    pub fn new(ride: Ride, distance_km: f64) -> Result<Self, DomainError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(DomainError::InvalidDistance {
                from: ride.origin,
                to: ride.destination,
                distance: distance_km,
            });
        }
        Ok(Leg { ride, distance_km })
    }

    /// Station the leg departs from.
    pub fn origin(&self) -> &Station {
        self.ride.origin()
    }

    /// Station the leg arrives at.
    pub fn destination(&self) -> &Station {
        self.ride.destination()
    }

    /// Departure instant.
    pub fn departure(&self) -> Minute {
        self.ride.departure()
    }

    /// Arrival instant.
    pub fn arrival(&self) -> Minute {
        self.ride.arrival()
    }

    /// Service class of the train.
    pub fn class(&self) -> ServiceClass {
        self.ride.class()
    }

    /// Id of the running train.
    pub fn service(&self) -> &ServiceId {
        self.ride.service()
    }

    /// Travel time in minutes.
    pub fn duration_mins(&self) -> i64 {
        self.ride.duration_mins()
    }

    /// Distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> Station {
        Station::parse(s).unwrap()
    }

    fn ride(dep: i64, arr: i64) -> Result<Ride, DomainError> {
        Ride::new(
            station("Ht"),
            station("Ehv"),
            Minute::new(dep),
            Minute::new(arr),
            ServiceClass::Express,
            ServiceId::new("3500").unwrap(),
        )
    }

    #[test]
    fn ride_construction_valid() {
        let r = ride(720, 740).unwrap();
        assert_eq!(r.origin(), &station("Ht"));
        assert_eq!(r.destination(), &station("Ehv"));
        assert_eq!(r.departure(), Minute::new(720));
        assert_eq!(r.arrival(), Minute::new(740));
        assert_eq!(r.class(), ServiceClass::Express);
        assert_eq!(r.service().as_str(), "3500");
        assert_eq!(r.duration_mins(), 20);
    }

    #[test]
    fn ride_rejects_zero_duration() {
        assert!(matches!(
            ride(720, 720),
            Err(DomainError::InvalidRide { .. })
        ));
    }

    #[test]
    fn ride_rejects_loop() {
        let result = Ride::new(
            station("Ht"),
            station("Ht"),
            Minute::new(0),
            Minute::new(5),
            ServiceClass::Local,
            ServiceId::new("1").unwrap(),
        );
        assert!(matches!(result, Err(DomainError::InvalidRide { .. })));
    }

    #[test]
    fn leg_accessors_delegate_to_ride() {
        let leg = Leg::new(ride(720, 740).unwrap(), 48.1).unwrap();
        assert_eq!(leg.origin(), &station("Ht"));
        assert_eq!(leg.destination(), &station("Ehv"));
        assert_eq!(leg.duration_mins(), 20);
        assert_eq!(leg.distance_km(), 48.1);
    }

    #[test]
    fn leg_rejects_bad_distance() {
        assert!(Leg::new(ride(720, 740).unwrap(), -0.1).is_err());
        assert!(Leg::new(ride(720, 740).unwrap(), f64::NAN).is_err());
        assert!(Leg::new(ride(720, 740).unwrap(), 0.0).is_ok());
    }
}
