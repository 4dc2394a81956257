/*
 * Unit tests for the dispatch engine
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_dispatch_pickup_and_delivery
 * - test_dispatch_capacity_limits_boarding
 * - test_dispatch_auto_without_passengers_stays_idle
 * - test_dispatch_ignores_invalid_requests
 * - test_dispatch_drops_request_while_en_route
 * - test_dispatch_alights_before_boarding
 * - test_dispatch_empty_cabin_follows_majority
 * - test_dispatch_majority_tie_goes_up
 * - test_dispatch_occupants_keep_direction
 * - test_dispatch_mixed_occupants_board_upward
 * - test_dispatch_next_target_prefers_occupants
 * - test_dispatch_next_target_nearest_waiting_floor
 * - test_dispatch_timed_phases
 * - test_dispatch_auto_waits_dispatch_delay
 * - test_dispatch_disable_auto_while_moving
 * - test_dispatch_auto_service_loop_invariants
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod dispatch_tests {
    use crate::config::{BuildingConfig, DispatchConfig};
    use crate::elevator::dispatch::EngineState;
    use crate::elevator::DispatchEngine;
    use crate::passenger::{Passenger, PopulationGenerator};
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{Motion, PassengerId};
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    const MOVE: Duration = Duration::from_millis(1000);

    fn building(floors: u8, capacity: usize) -> BuildingConfig {
        BuildingConfig {
            floors,
            capacity,
            move_duration_ms: MOVE.as_millis() as u64,
        }
    }

    fn instant_service() -> DispatchConfig {
        DispatchConfig {
            auto_dispatch: false,
            dispatch_delay_ms: 0,
            alight_duration_ms: 0,
            board_duration_ms: 0,
        }
    }

    fn setup_engine(floors: u8, capacity: usize) -> (DispatchEngine, Instant) {
        let t0 = Instant::now();
        (DispatchEngine::new(&building(floors, capacity), &instant_service(), t0), t0)
    }

    fn passenger(id: u64, origin: u8, destination: u8) -> Passenger {
        Passenger::new(PassengerId(id), origin, destination).unwrap()
    }

    /// Requests `floor` at `now` and steps until the cabin has arrived and settled.
    fn travel(engine: &mut DispatchEngine, floor: u8, now: Instant) -> Instant {
        assert!(engine.request_floor(floor, now));
        let arrival = now + MOVE;
        engine.step(arrival).unwrap();
        arrival
    }

    #[test]
    fn test_dispatch_pickup_and_delivery() {
        // Purpose: A passenger is picked up at its origin and delivered at its destination

        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 3, 7)], t0);

        // Act
        let t1 = travel(&mut engine, 3, t0);

        // Assert
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.cabin().rounded_floor(), 3);
        assert_eq!(engine.cabin().occupancy(), 1);
        assert!(engine.cabin().occupants()[0].view().boarded);
        assert_eq!(engine.last_arrival().unwrap().direction, Some(Up));
        assert!(engine.waiting().is_empty());

        // Act
        travel(&mut engine, 7, t1);

        // Assert
        assert_eq!(engine.cabin().rounded_floor(), 7);
        assert_eq!(engine.cabin().occupancy(), 0);
        assert_eq!(engine.delivered(), 1);
        assert!(engine.passenger_views().is_empty());
        assert_eq!(engine.last_arrival().unwrap().alighted, vec![PassengerId(0)]);
    }

    #[test]
    fn test_dispatch_capacity_limits_boarding() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 1);
        engine.add_passengers(vec![passenger(0, 5, 8), passenger(1, 5, 9)], t0);

        // Act
        travel(&mut engine, 5, t0);

        // Assert
        assert_eq!(engine.cabin().occupancy(), 1);
        assert_eq!(engine.cabin().occupants()[0].id(), PassengerId(0));
        let waiting: Vec<PassengerId> = engine.waiting().at_floor(5).map(|p| p.id()).collect();
        assert_eq!(waiting, vec![PassengerId(1)]);
    }

    #[test]
    fn test_dispatch_auto_without_passengers_stays_idle() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);

        // Act
        engine.set_auto_dispatch(true, t0);
        for i in 1..=50 {
            engine.step(t0 + Duration::from_millis(100 * i)).unwrap();
        }

        // Assert
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.cabin().is_moving());
        assert_eq!(engine.cabin().status_snapshot().current_floor, 1.0);
    }

    #[test]
    fn test_dispatch_ignores_invalid_requests() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 1, 4)], t0);

        // Act
        let current = engine.request_floor(1, t0);
        let below = engine.request_floor(0, t0);
        let above = engine.request_floor(11, t0);

        // Assert
        assert!(!current && !below && !above);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.cabin().is_moving());
        assert_eq!(engine.cabin().occupancy(), 0);
        assert_eq!(engine.waiting().len(), 1);
    }

    #[test]
    fn test_dispatch_drops_request_while_en_route() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        assert!(engine.request_floor(6, t0));

        // Act
        let second = engine.request_floor(2, t0 + Duration::from_millis(200));
        engine.step(t0 + MOVE).unwrap();

        // Assert
        assert!(!second);
        assert_eq!(engine.cabin().rounded_floor(), 6);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_dispatch_alights_before_boarding() {
        // Purpose: A full cabin frees its slot at the destination before anyone boards

        // Arrange
        let (mut engine, t0) = setup_engine(10, 1);
        engine.add_passengers(vec![passenger(0, 2, 5), passenger(1, 5, 8)], t0);
        let t1 = travel(&mut engine, 2, t0);
        assert_eq!(engine.cabin().occupancy(), 1);

        // Act
        travel(&mut engine, 5, t1);

        // Assert
        let report = engine.last_arrival().unwrap();
        assert_eq!(report.alighted, vec![PassengerId(0)]);
        assert_eq!(report.boarded, vec![PassengerId(1)]);
        let alighted: HashSet<_> = report.alighted.iter().collect();
        assert!(report.boarded.iter().all(|id| !alighted.contains(id)));
        assert_eq!(engine.cabin().occupants()[0].id(), PassengerId(1));
    }

    #[test]
    fn test_dispatch_empty_cabin_follows_majority() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(
            vec![passenger(0, 5, 9), passenger(1, 5, 2), passenger(2, 5, 1)],
            t0,
        );

        // Act
        travel(&mut engine, 5, t0);

        // Assert
        assert_eq!(engine.last_arrival().unwrap().direction, Some(Down));
        let boarded: Vec<PassengerId> = engine.cabin().occupants().iter().map(|p| p.id()).collect();
        assert_eq!(boarded, vec![PassengerId(1), PassengerId(2)]);
        assert_eq!(engine.waiting().len(), 1);
    }

    #[test]
    fn test_dispatch_majority_tie_goes_up() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 4, 2), passenger(1, 4, 6)], t0);

        // Act
        travel(&mut engine, 4, t0);

        // Assert
        assert_eq!(engine.last_arrival().unwrap().direction, Some(Up));
        assert_eq!(engine.cabin().occupants()[0].id(), PassengerId(1));
        assert_eq!(engine.cabin().occupancy(), 1);
    }

    #[test]
    fn test_dispatch_occupants_keep_direction() {
        // Purpose: Occupants heading up mean only upward passengers board, even if outnumbered

        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 2, 9)], t0);
        let t1 = travel(&mut engine, 2, t0);
        engine.add_passengers(
            vec![passenger(1, 5, 1), passenger(2, 5, 3), passenger(3, 5, 7)],
            t1,
        );

        // Act
        travel(&mut engine, 5, t1);

        // Assert
        assert_eq!(engine.pickup_direction(5), Some(Up));
        assert_eq!(engine.last_arrival().unwrap().direction, Some(Up));
        let boarded: Vec<PassengerId> = engine.cabin().occupants().iter().map(|p| p.id()).collect();
        assert_eq!(boarded, vec![PassengerId(0), PassengerId(3)]);
        assert_eq!(engine.waiting().len(), 2);
    }

    #[test]
    fn test_dispatch_mixed_occupants_board_upward() {
        // Purpose: With occupants bound both above and below the floor, only upward riders board

        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 2, 9), passenger(1, 10, 1)], t0);
        let t1 = travel(&mut engine, 2, t0);
        let t2 = travel(&mut engine, 10, t1);
        assert_eq!(engine.cabin().occupancy(), 2);
        engine.add_passengers(vec![passenger(2, 5, 8), passenger(3, 5, 3)], t2);

        // Act
        travel(&mut engine, 5, t2);

        // Assert
        assert_eq!(engine.pickup_direction(5), Some(Up));
        assert_eq!(engine.last_arrival().unwrap().direction, Some(Up));
        assert_eq!(engine.last_arrival().unwrap().boarded, vec![PassengerId(2)]);
        let boarded: Vec<PassengerId> = engine.cabin().occupants().iter().map(|p| p.id()).collect();
        assert_eq!(boarded, vec![PassengerId(0), PassengerId(1), PassengerId(2)]);
        let waiting: Vec<PassengerId> = engine.waiting().at_floor(5).map(|p| p.id()).collect();
        assert_eq!(waiting, vec![PassengerId(3)]);
    }

    #[test]
    fn test_dispatch_next_target_prefers_occupants() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(
            vec![passenger(0, 5, 8), passenger(1, 5, 2), passenger(2, 5, 9), passenger(3, 6, 1)],
            t0,
        );
        let t1 = travel(&mut engine, 5, t0);

        // Act
        let target = engine.next_target();

        // Assert
        // Up wins 2-1, occupants go to 8 and 9 while someone waits at 6
        assert_eq!(engine.cabin().occupancy(), 2);
        assert_eq!(target, Some(8));

        travel(&mut engine, 8, t1);
        assert_eq!(engine.next_target(), Some(9));
    }

    #[test]
    fn test_dispatch_next_target_nearest_waiting_floor() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 9, 1)], t0);
        let t1 = travel(&mut engine, 5, t0);
        engine.add_passengers(
            vec![passenger(1, 7, 1), passenger(2, 3, 1), passenger(3, 5, 1)],
            t1,
        );

        // Act
        let target = engine.next_target();

        // Assert
        // 7 and 3 are both two floors away, 7 was seen first; floor 5 is skipped
        assert_eq!(target, Some(7));
    }

    #[test]
    fn test_dispatch_timed_phases() {
        // Purpose: Movement interpolates and boarding walks take their configured time

        // Arrange
        let t0 = Instant::now();
        let dispatch = DispatchConfig {
            auto_dispatch: false,
            dispatch_delay_ms: 500,
            alight_duration_ms: 500,
            board_duration_ms: 300,
        };
        let mut engine = DispatchEngine::new(&building(10, 4), &dispatch, t0);
        engine.add_passengers(vec![passenger(0, 3, 6), passenger(1, 3, 7)], t0);
        assert!(engine.request_floor(3, t0));

        // Act & Assert
        engine.step(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(engine.state(), EngineState::EnRoute(3));
        assert!((engine.cabin().status_snapshot().current_floor - 2.0).abs() < 1e-9);
        assert_eq!(engine.cabin().status_snapshot().motion, Motion::Up);

        engine.step(t0 + Duration::from_millis(1000)).unwrap();
        assert_eq!(engine.state(), EngineState::Servicing(3));
        assert_eq!(engine.cabin().status_snapshot().current_floor, 3.0);
        assert_eq!(engine.cabin().occupancy(), 0);

        engine.step(t0 + Duration::from_millis(1300)).unwrap();
        assert_eq!(engine.state(), EngineState::Servicing(3));
        assert_eq!(engine.cabin().occupancy(), 1);

        let blocked = engine.request_floor(9, t0 + Duration::from_millis(1400));
        assert!(!blocked);

        engine.step(t0 + Duration::from_millis(1600)).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.cabin().occupancy(), 2);

        let t1 = t0 + Duration::from_millis(1600);
        assert!(engine.request_floor(6, t1));
        engine.step(t1 + MOVE).unwrap();
        assert_eq!(engine.state(), EngineState::Servicing(6));
        assert_eq!(engine.cabin().occupancy(), 2);

        engine.step(t1 + MOVE + Duration::from_millis(500)).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.cabin().occupancy(), 1);
        assert_eq!(engine.delivered(), 1);
    }

    #[test]
    fn test_dispatch_auto_waits_dispatch_delay() {
        // Arrange
        let t0 = Instant::now();
        let dispatch = DispatchConfig {
            dispatch_delay_ms: 500,
            ..instant_service()
        };
        let mut engine = DispatchEngine::new(&building(10, 4), &dispatch, t0);
        engine.add_passengers(vec![passenger(0, 4, 8)], t0);

        // Act
        engine.set_auto_dispatch(true, t0);
        let arrival = t0 + MOVE;
        engine.step(arrival).unwrap();

        // Assert
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.cabin().occupancy(), 1);
        assert_eq!(engine.next_deadline(), Some(arrival + Duration::from_millis(500)));

        engine.step(arrival + Duration::from_millis(499)).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);

        engine.step(arrival + Duration::from_millis(500)).unwrap();
        assert_eq!(engine.state(), EngineState::EnRoute(8));
    }

    #[test]
    fn test_dispatch_disable_auto_while_moving() {
        // Arrange
        let (mut engine, t0) = setup_engine(10, 4);
        engine.add_passengers(vec![passenger(0, 4, 8)], t0);
        engine.set_auto_dispatch(true, t0);
        assert_eq!(engine.state(), EngineState::EnRoute(4));

        // Act
        engine.set_auto_dispatch(false, t0 + Duration::from_millis(100));
        for i in 1..=30 {
            engine.step(t0 + Duration::from_millis(100 * i)).unwrap();
        }

        // Assert
        assert_eq!(engine.cabin().rounded_floor(), 4);
        assert_eq!(engine.cabin().occupancy(), 1);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_dispatch_auto_service_loop_invariants() {
        // Purpose: Continuous mode keeps capacity and exclusivity invariants until it runs dry

        // Arrange
        let (mut engine, t0) = setup_engine(10, 3);
        let mut generator = PopulationGenerator::new(Some(2024));
        let passengers = generator.generate(20, 10).unwrap();
        engine.add_passengers(passengers, t0);
        engine.set_auto_dispatch(true, t0);

        // Act & Assert
        for i in 1..=3000 {
            engine.step(t0 + Duration::from_millis(100 * i)).unwrap();

            let cabin = engine.cabin();
            assert!(cabin.occupancy() <= 3);

            let views = engine.passenger_views();
            let ids: HashSet<PassengerId> = views.iter().map(|v| v.id).collect();
            assert_eq!(ids.len(), views.len());
            assert_eq!(views.iter().filter(|v| v.boarded).count(), cabin.occupancy());
            assert_eq!(views.len() as u64 + engine.delivered(), 20);
        }

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.next_target(), None);
        assert!(engine.delivered() > 0);
    }
}
