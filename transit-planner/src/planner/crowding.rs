//! Crowdedness estimates for bus legs.

use std::collections::HashMap;

use crate::domain::{BusLeg, Crowdedness, Itinerary, StopId};
use crate::network::Network;
use crate::timetable::TimetableId;

/// Source of crowdedness estimates.
pub trait CrowdednessOracle {
    /// Expected crowdedness on board `run` as it leaves `stop`.
    fn crowdedness(&self, run: TimetableId, stop: StopId) -> Crowdedness;
}

/// Per-run, per-stop crowdedness loaded with the timetable.
///
/// Stops without an entry are assumed green.
#[derive(Debug, Clone, Default)]
pub struct CrowdednessTable {
    levels: HashMap<(TimetableId, StopId), Crowdedness>,
}

impl CrowdednessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, run: TimetableId, stop: StopId, level: Crowdedness) {
        self.levels.insert((run, stop), level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl CrowdednessOracle for CrowdednessTable {
    fn crowdedness(&self, run: TimetableId, stop: StopId) -> Crowdedness {
        self.levels
            .get(&(run, stop))
            .copied()
            .unwrap_or(Crowdedness::Green)
    }
}

/// Every run at every stop has the same tier.
#[derive(Debug, Clone, Copy)]
pub struct UniformCrowdedness(pub Crowdedness);

impl CrowdednessOracle for UniformCrowdedness {
    fn crowdedness(&self, _run: TimetableId, _stop: StopId) -> Crowdedness {
        self.0
    }
}

/// Worst tier met on a bus leg: the maximum over every stop the bus leaves
/// with the traveller on board, from boarding up to (not including)
/// alighting.
pub fn leg_crowdedness<O: CrowdednessOracle + ?Sized>(
    oracle: &O,
    network: &Network,
    leg: &BusLeg,
) -> Crowdedness {
    let Some(route) = network.route(leg.route) else {
        return Crowdedness::Green;
    };
    let (Some(board), Some(alight)) = (route.position(leg.board), route.position(leg.alight))
    else {
        return Crowdedness::Green;
    };
    route.stops()[board..alight]
        .iter()
        .map(|stop| oracle.crowdedness(leg.run, *stop))
        .max()
        .unwrap_or(Crowdedness::Green)
}

/// Worst tier over all bus legs of an itinerary. Walk-only itineraries are
/// green.
pub fn itinerary_crowdedness<O: CrowdednessOracle + ?Sized>(
    oracle: &O,
    network: &Network,
    itinerary: &Itinerary,
) -> Crowdedness {
    itinerary
        .bus_legs()
        .map(|leg| leg_crowdedness(oracle, network, leg))
        .max()
        .unwrap_or(Crowdedness::Green)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Leg, PathId, Stop, WalkLeg};
    use chrono::{NaiveDate, NaiveDateTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn network() -> Network {
        let mut network = Network::new();
        for id in 1..=4 {
            network
                .add_stop(Stop::new(StopId(id), format!("N{id}"), GeoPoint::new(45.0, 7.0)))
                .unwrap();
        }
        network
            .add_route(
                "L1",
                vec![StopId(1), StopId(2), StopId(3), StopId(4)],
                vec![5, 5, 5],
                vec![6, 6, 6],
            )
            .unwrap();
        network
    }

    fn ride(board: u32, alight: u32) -> BusLeg {
        BusLeg {
            run: TimetableId(1),
            route: PathId(0),
            route_name: "L1".into(),
            board: StopId(board),
            alight: StopId(alight),
            departs: at(6, 0),
            arrives: at(6, 15),
        }
    }

    #[test]
    fn table_defaults_to_green() {
        let table = CrowdednessTable::new();
        assert!(table.is_empty());
        assert_eq!(table.crowdedness(TimetableId(1), StopId(1)), Crowdedness::Green);
    }

    #[test]
    fn leg_takes_worst_on_board_stop() {
        let network = network();
        let mut table = CrowdednessTable::new();
        table.insert(TimetableId(1), StopId(2), Crowdedness::Orange);
        table.insert(TimetableId(1), StopId(4), Crowdedness::Red);

        assert_eq!(leg_crowdedness(&table, &network, &ride(1, 3)), Crowdedness::Orange);
        assert_eq!(leg_crowdedness(&table, &network, &ride(1, 2)), Crowdedness::Green);
        // Crowding as the bus leaves the alighting stop doesn't matter.
        assert_eq!(leg_crowdedness(&table, &network, &ride(3, 4)), Crowdedness::Green);
    }

    #[test]
    fn other_runs_unaffected() {
        let network = network();
        let mut table = CrowdednessTable::new();
        table.insert(TimetableId(2), StopId(1), Crowdedness::Red);
        assert_eq!(leg_crowdedness(&table, &network, &ride(1, 4)), Crowdedness::Green);
    }

    #[test]
    fn uniform_oracle() {
        let network = network();
        let oracle = UniformCrowdedness(Crowdedness::Orange);
        assert_eq!(leg_crowdedness(&oracle, &network, &ride(2, 4)), Crowdedness::Orange);
    }

    #[test]
    fn walk_only_itinerary_is_green() {
        let network = network();
        let itinerary = Itinerary::new(
            date(),
            vec![Leg::Walk(WalkLeg {
                path: PathId(9),
                from: StopId(1),
                to: StopId(2),
                starts: at(6, 0),
                ends: at(6, 3),
            })],
        )
        .unwrap();
        let oracle = UniformCrowdedness(Crowdedness::Red);
        assert_eq!(
            itinerary_crowdedness(&oracle, &network, &itinerary),
            Crowdedness::Green
        );
    }

    #[test]
    fn itinerary_takes_worst_leg() {
        let network = network();
        let mut table = CrowdednessTable::new();
        table.insert(TimetableId(1), StopId(3), Crowdedness::Red);
        let itinerary = Itinerary::new(date(), vec![Leg::Bus(ride(1, 4))]).unwrap();
        assert_eq!(
            itinerary_crowdedness(&table, &network, &itinerary),
            Crowdedness::Red
        );
    }
}
