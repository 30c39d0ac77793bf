//! Unit tests for wf-travel.
//!
//! Fixtures build small worlds directly from the geography structs; no JSON
//! parsing is involved. The scheduling tests drive time by hand through
//! explicit `TimeMs` values.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use wf_agent::{AgentRecord, AgentStore};
    use wf_core::{AgentId, Coord};
    use wf_geo::{GeoNode, GeographyData, PlaceType, RouteDef, Terrain};
    use wf_graph::{compose_route, NavGraph, RouteResult};

    use crate::scheduler::{TravelKind, TravelOrder};

    pub fn node(x: f64, y: f64, place: PlaceType, name: &str) -> GeoNode {
        GeoNode {
            x,
            y,
            continent:   "Eldaron".to_string(),
            place_type:  place,
            name:        name.to_string(),
            description: String::new(),
        }
    }

    pub fn route(id: &str, start: &str, end: &str, terrain: Terrain, name: Option<&str>) -> RouteDef {
        RouteDef {
            id:              id.to_string(),
            start:           start.to_string(),
            end:             end.to_string(),
            terrain,
            name:            name.map(str::to_string),
            distance_km:     None,
            cost_multiplier: None,
        }
    }

    /// World shared by most travel tests (map units; 1 unit = 10 km):
    ///
    ///   arbor (0,0 city) ──100 km road── imlay (10,0 inn) ──100 km road── quarry (20,0 ruin)
    ///   moss (40,40 camp)                 isolated, same continent
    ///   zinc (90,90 port)                 continent Thule, no link over
    pub fn world() -> GeographyData {
        let mut nodes = BTreeMap::new();
        nodes.insert("arbor".to_string(), node(0.0, 0.0, PlaceType::City, "Arbor"));
        nodes.insert("imlay".to_string(), node(10.0, 0.0, PlaceType::Inn, "Imlay Inn"));
        nodes.insert("quarry".to_string(), node(20.0, 0.0, PlaceType::Ruin, "Old Quarry"));
        nodes.insert("moss".to_string(), node(40.0, 40.0, PlaceType::Camp, "Moss Hollow"));
        let mut zinc = node(90.0, 90.0, PlaceType::Port, "Zinc Harbour");
        zinc.continent = "Thule".to_string();
        nodes.insert("zinc".to_string(), zinc);

        GeographyData {
            nodes,
            routes: vec![
                route("r_ai", "arbor", "imlay", Terrain::Road, Some("Low Road")),
                route("r_iq", "imlay", "quarry", Terrain::Road, None),
            ],
            ..Default::default()
        }
    }

    pub fn graph() -> NavGraph {
        NavGraph::build(&world())
    }

    /// Two stops joined by a single route of the given terrain, plus the
    /// composed route across it.
    pub fn hop(terrain: Terrain, to_x: f64, to_y: f64) -> (NavGraph, RouteResult) {
        let mut nodes = BTreeMap::new();
        nodes.insert("gate".to_string(), node(0.0, 0.0, PlaceType::Village, "Gate"));
        nodes.insert("keep".to_string(), node(to_x, to_y, PlaceType::Fortress, "Keep"));
        let data = GeographyData {
            nodes,
            routes: vec![route("r_gk", "gate", "keep", terrain, None)],
            ..Default::default()
        };
        let graph = NavGraph::build(&data);
        let result = compose_route(
            &graph,
            Coord::new(0.0, 0.0),
            Coord::new(to_x, to_y),
            "Eldaron",
            "Eldaron",
        );
        (graph, result)
    }

    /// `world()` with the middle stop's place type swapped.
    pub fn mid_stop(place: PlaceType) -> NavGraph {
        let mut data = world();
        if let Some(n) = data.nodes.get_mut("imlay") {
            n.place_type = place;
        }
        NavGraph::build(&data)
    }

    pub fn mira(agents: &mut AgentStore) -> AgentId {
        agents.register(AgentRecord::new("Mira", "arbor", Coord::new(0.0, 0.0), "Eldaron"))
    }

    pub fn order(passage: &str, x: f64, y: f64, kind: TravelKind) -> TravelOrder {
        TravelOrder {
            passage:   passage.to_string(),
            coords:    Coord::new(x, y),
            continent: "Eldaron".to_string(),
            kind,
        }
    }
}

// ── Step durations ────────────────────────────────────────────────────────────

#[cfg(test)]
mod durations {
    use crate::itinerary::{travel_time_ms, MIN_STEP_MS};

    #[test]
    fn walking_rate_is_200_ms_per_km() {
        assert_eq!(travel_time_ms(100.0, 1.0), 20_000);
        assert_eq!(travel_time_ms(50.0, 1.0), 10_000);
    }

    #[test]
    fn multiplier_divides_duration() {
        // 300 km of open sea at 3.0x takes as long as 100 km of road.
        assert_eq!(travel_time_ms(300.0, 3.0), 20_000);
        // Slow terrain stretches it; fractional results floor.
        assert_eq!(travel_time_ms(100.0, 0.7), 28_571);
    }

    #[test]
    fn short_hops_hit_the_floor() {
        assert_eq!(travel_time_ms(1.0, 1.0), MIN_STEP_MS);
        assert_eq!(travel_time_ms(0.0, 1.0), MIN_STEP_MS);
        // Just above the floor it scales normally again.
        assert_eq!(travel_time_ms(10.0, 1.0), MIN_STEP_MS);
        assert_eq!(travel_time_ms(10.1, 1.0), 2_020);
    }
}

// ── Itinerary generation ──────────────────────────────────────────────────────

#[cfg(test)]
mod itineraries {
    use wf_core::Coord;
    use wf_geo::{PlaceType, Terrain};
    use wf_graph::compose_route;

    use super::helpers;
    use crate::itinerary::{Itinerary, ItineraryStep, REST_DURATION_MS};

    fn chain(graph: &wf_graph::NavGraph) -> Itinerary {
        let result = compose_route(
            graph,
            Coord::new(0.0, 0.0),
            Coord::new(20.0, 0.0),
            "Eldaron",
            "Eldaron",
        );
        Itinerary::generate(graph, &result)
    }

    #[test]
    fn single_road_hop() {
        let g = helpers::graph();
        let result =
            compose_route(&g, Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), "Eldaron", "Eldaron");

        let path = result.path.as_ref().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.total_cost, 100.0);

        let it = Itinerary::generate(&g, &result);
        assert_eq!(it.len(), 1);
        match &it.steps()[0] {
            ItineraryStep::Travel { desc, from, to, km, duration_ms, terrain } => {
                assert_eq!(desc, "Walks east via Low Road");
                assert_eq!(*from, Coord::new(0.0, 0.0));
                assert_eq!(*to, Coord::new(10.0, 0.0));
                assert_eq!(*km, 100.0);
                assert_eq!(*duration_ms, 20_000);
                assert_eq!(*terrain, Some(Terrain::Road));
            }
            other => panic!("expected a travel step, got {other:?}"),
        }
    }

    #[test]
    fn rest_inserted_at_intermediate_inn() {
        let it = chain(&helpers::graph());

        assert_eq!(it.len(), 3);
        assert!(!it.steps()[0].is_rest());
        assert!(it.steps()[1].is_rest());
        assert!(!it.steps()[2].is_rest());

        match &it.steps()[1] {
            ItineraryStep::Rest { desc, at, duration_ms } => {
                assert_eq!(desc, "Rests at Imlay Inn");
                assert_eq!(*at, Coord::new(10.0, 0.0));
                assert_eq!(*duration_ms, REST_DURATION_MS);
            }
            other => panic!("expected a rest step, got {other:?}"),
        }
    }

    #[test]
    fn no_rest_at_the_destination() {
        // The chain ends on the inn itself; rest-capable or not, the final
        // stop never gets a rest step.
        let g = helpers::graph();
        let result =
            compose_route(&g, Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), "Eldaron", "Eldaron");
        let it = Itinerary::generate(&g, &result);
        assert_eq!(it.len(), 1);
        assert!(!it.steps()[0].is_rest());
    }

    #[test]
    fn plain_stops_get_no_rest() {
        let it = chain(&helpers::mid_stop(PlaceType::Camp));
        assert_eq!(it.len(), 2);
        assert!(it.steps().iter().all(|s| !s.is_rest()));
    }

    #[test]
    fn rest_narration_follows_place_type() {
        let cases = [
            (PlaceType::Tavern, "Has a drink at"),
            (PlaceType::City, "Stops over in"),
            (PlaceType::Station, "Changes mounts at"),
            (PlaceType::Bivouac, "Makes camp at"),
            (PlaceType::Sanctuary, "Prays at"),
            (PlaceType::Caravanserai, "Resupplies at"),
            (PlaceType::Inn, "Rests at"),
        ];
        for (place, phrase) in cases {
            let it = chain(&helpers::mid_stop(place));
            let desc = it.steps()[1].desc();
            assert!(
                it.steps()[1].is_rest() && desc.starts_with(phrase),
                "{place}: {desc}"
            );
        }
    }

    #[test]
    fn totals_sum_over_steps() {
        let it = chain(&helpers::graph());
        assert_eq!(it.total_km(), 200.0);
        assert_eq!(it.total_duration_ms(), 70_000);
        // The rest contributes time but no distance.
        assert_eq!(it.steps()[1].km(), 0.0);
    }

    #[test]
    fn travel_verbs_follow_terrain() {
        let cases = [
            (Terrain::Sea, "Sails"),
            (Terrain::Boat, "Sails"),
            (Terrain::Air, "Flies"),
            (Terrain::MountainPath, "Climbs"),
            (Terrain::Tunnel, "Delves"),
            (Terrain::Sled, "Glides"),
            (Terrain::IceRoad, "Glides"),
            (Terrain::SandSkiff, "Skims"),
            (Terrain::Carriage, "Drives"),
            (Terrain::Beetle, "Rides"),
            (Terrain::CableCar, "Walks"),
            (Terrain::Road, "Walks"),
        ];
        for (terrain, verb) in cases {
            let (g, result) = helpers::hop(terrain, 10.0, 0.0);
            let it = Itinerary::generate(&g, &result);
            let desc = it.steps()[0].desc();
            assert!(desc.starts_with(verb), "{terrain}: {desc}");
        }
    }

    #[test]
    fn headings_follow_the_dominant_axis() {
        // y grows southward.
        let cases = [
            (10.0, 0.0, "east"),
            (-10.0, 0.0, "west"),
            (0.0, 10.0, "south"),
            (3.0, -9.0, "north"),
        ];
        for (x, y, heading) in cases {
            let (g, result) = helpers::hop(Terrain::Road, x, y);
            let it = Itinerary::generate(&g, &result);
            assert_eq!(it.steps()[0].desc(), &format!("Walks {heading}"));
        }
    }

    #[test]
    fn missing_anchor_gives_one_walking_step() {
        let g = helpers::graph();
        let result =
            compose_route(&g, Coord::new(0.0, 0.0), Coord::new(3.0, 4.0), "Nowhere", "Nowhere");
        let it = Itinerary::generate(&g, &result);

        assert_eq!(it.len(), 1);
        match &it.steps()[0] {
            ItineraryStep::Travel { desc, km, duration_ms, terrain, .. } => {
                assert_eq!(desc, "Walks south through open country");
                assert_eq!(*km, 50.0);
                assert_eq!(*duration_ms, 10_000);
                assert_eq!(*terrain, None);
            }
            other => panic!("expected a travel step, got {other:?}"),
        }
    }

    #[test]
    fn off_road_step_carries_the_detour_distance() {
        // moss is on the continent but not on the network.
        let g = helpers::graph();
        let result =
            compose_route(&g, Coord::new(40.0, 40.0), Coord::new(0.0, 0.0), "Eldaron", "Eldaron");
        let it = Itinerary::generate(&g, &result);

        assert_eq!(it.len(), 1);
        let expected = (40.0f64 * 40.0 + 40.0 * 40.0).sqrt() * 10.0 * 1.5;
        assert!((it.total_km() - expected).abs() < 1e-9);
        assert_eq!(it.steps()[0].start_coord(), Coord::new(40.0, 40.0));
        assert_eq!(it.steps()[0].end_coord(), Coord::new(0.0, 0.0));
    }

    #[test]
    fn empty_for_trivial_routes() {
        // Departure and destination resolve to the same anchor.
        let g = helpers::graph();
        let result =
            compose_route(&g, Coord::new(20.0, 0.0), Coord::new(20.0, 0.0), "Eldaron", "Eldaron");
        let it = Itinerary::generate(&g, &result);
        assert!(it.is_empty());
        assert_eq!(it.total_duration_ms(), 0);
    }
}

// ── Deadline queue ────────────────────────────────────────────────────────────

#[cfg(test)]
mod timer_queue {
    use wf_core::{AgentId, TimeMs};

    use crate::timers::StepTimers;

    #[test]
    fn tokens_are_unique() {
        let mut q = StepTimers::new();
        let a = q.push(TimeMs(10), AgentId(0));
        let b = q.push(TimeMs(10), AgentId(0));
        assert_ne!(a, b);
    }

    #[test]
    fn nothing_due_before_the_deadline() {
        let mut q = StepTimers::new();
        q.push(TimeMs(50), AgentId(1));
        assert!(q.pop_due(TimeMs(49)).is_none());
        assert!(q.pop_due(TimeMs(50)).is_some());
    }

    #[test]
    fn drains_in_deadline_order() {
        let mut q = StepTimers::new();
        q.push(TimeMs(30), AgentId(3));
        q.push(TimeMs(10), AgentId(1));
        q.push(TimeMs(20), AgentId(2));

        let mut order = Vec::new();
        while let Some((deadline, entries)) = q.pop_due(TimeMs(100)) {
            order.push((deadline, entries[0].agent));
        }
        assert_eq!(
            order,
            vec![
                (TimeMs(10), AgentId(1)),
                (TimeMs(20), AgentId(2)),
                (TimeMs(30), AgentId(3)),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn shared_deadlines_come_out_together() {
        let mut q = StepTimers::new();
        q.push(TimeMs(10), AgentId(1));
        q.push(TimeMs(10), AgentId(2));
        q.push(TimeMs(20), AgentId(3));
        assert_eq!(q.len(), 3);
        assert_eq!(q.deadline_count(), 2);

        let (_, entries) = q.pop_due(TimeMs(10)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn next_deadline_peeks_the_earliest() {
        let mut q = StepTimers::new();
        assert_eq!(q.next_deadline(), None);
        q.push(TimeMs(30), AgentId(1));
        q.push(TimeMs(10), AgentId(2));
        assert_eq!(q.next_deadline(), Some(TimeMs(10)));
    }
}

// ── Position interpolation ────────────────────────────────────────────────────

#[cfg(test)]
mod interpolation {
    use wf_core::{Coord, TimeMs};

    use crate::interp::{step_position, StepWindow};
    use crate::itinerary::ItineraryStep;

    fn leg() -> ItineraryStep {
        ItineraryStep::Travel {
            desc:        "Walks east".to_string(),
            from:        Coord::new(0.0, 0.0),
            to:          Coord::new(10.0, 0.0),
            km:          100.0,
            duration_ms: 10_000,
            terrain:     None,
        }
    }

    #[test]
    fn progress_clamps_to_the_window() {
        let w = StepWindow { start: TimeMs(1_000), end: TimeMs(2_000) };
        assert_eq!(w.progress(TimeMs(500)), 0.0);
        assert_eq!(w.progress(TimeMs(1_000)), 0.0);
        assert_eq!(w.progress(TimeMs(1_500)), 0.5);
        assert_eq!(w.progress(TimeMs(2_000)), 1.0);
        assert_eq!(w.progress(TimeMs(9_000)), 1.0);
    }

    #[test]
    fn zero_length_window_is_complete() {
        let w = StepWindow { start: TimeMs(1_000), end: TimeMs(1_000) };
        assert_eq!(w.progress(TimeMs(1_000)), 1.0);
        assert_eq!(step_position(&leg(), w, TimeMs(1_000)), Coord::new(10.0, 0.0));
    }

    #[test]
    fn travel_steps_interpolate_linearly() {
        let w = StepWindow { start: TimeMs(0), end: TimeMs(10_000) };
        let step = leg();
        assert_eq!(step_position(&step, w, TimeMs(0)), Coord::new(0.0, 0.0));
        assert_eq!(step_position(&step, w, TimeMs(2_500)), Coord::new(2.5, 0.0));
        assert_eq!(step_position(&step, w, TimeMs(10_000)), Coord::new(10.0, 0.0));
        // Out-of-window times clamp to the endpoints.
        assert_eq!(step_position(&step, w, TimeMs(99_000)), Coord::new(10.0, 0.0));
    }

    #[test]
    fn rest_steps_pin_to_the_stop() {
        let rest = ItineraryStep::Rest {
            desc:        "Rests at the inn".to_string(),
            at:          Coord::new(4.0, 2.0),
            duration_ms: 30_000,
        };
        let w = StepWindow { start: TimeMs(0), end: TimeMs(30_000) };
        assert_eq!(step_position(&rest, w, TimeMs(0)), Coord::new(4.0, 2.0));
        assert_eq!(step_position(&rest, w, TimeMs(15_000)), Coord::new(4.0, 2.0));
    }
}

// ── Scheduling ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduling {
    use wf_agent::{AgentRecord, AgentStatus, AgentStore};
    use wf_core::{AgentId, Coord, TimeMs};
    use wf_graph::NavGraph;

    use super::helpers;
    use crate::scheduler::{Arrival, Retarget, TravelKind, TravelScheduler};

    fn setup() -> (AgentStore, AgentId, NavGraph, TravelScheduler) {
        let mut agents = AgentStore::new();
        let mira = helpers::mira(&mut agents);
        (agents, mira, helpers::graph(), TravelScheduler::new())
    }

    #[test]
    fn unknown_agents_are_refused() {
        let (mut agents, _, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        assert!(!sched.start_travel(&mut agents, &graph, AgentId(99), order, TimeMs(0)));
        assert!(sched.timers.is_empty());
        assert!(!sched.cancel(&mut agents, AgentId(99), TimeMs(0)));
    }

    #[test]
    fn start_puts_the_agent_on_the_road() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        assert!(sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000)));

        let record = agents.get(mira).unwrap();
        assert_eq!(record.status, AgentStatus::Traveling);
        assert_eq!(record.coordinates, Coord::new(0.0, 0.0));
        assert!(sched.is_traveling(mira));
        assert_eq!(sched.destination(mira).unwrap().passage, "quarry");
        assert_eq!(sched.next_deadline(), Some(TimeMs(21_000)));

        let p = sched.progress(mira, TimeMs(1_000)).unwrap();
        assert_eq!(p.step_index, 0);
        assert_eq!(p.step_count, 3);
        assert_eq!(p.step_progress, 0.0);
        assert_eq!(p.remaining_ms, 20_000);
        assert_eq!(p.total_km, 200.0);
        assert_eq!(p.total_ms, 70_000);
    }

    #[test]
    fn unreachable_destinations_are_refused() {
        let (mut agents, mira, graph, mut sched) = setup();
        let mut order = helpers::order("zinc", 90.0, 90.0, TravelKind::Relocate);
        order.continent = "Thule".to_string();

        assert!(!sched.start_travel(&mut agents, &graph, mira, order, TimeMs(0)));
        assert!(!sched.is_traveling(mira));
        let record = agents.get(mira).unwrap();
        assert_eq!(record.status, AgentStatus::Fixed);
        assert_eq!(record.passage, "arbor");
        assert!(sched.poll(&mut agents, TimeMs(1_000_000)).is_empty());
    }

    #[test]
    fn polling_early_changes_nothing() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        assert!(sched.poll(&mut agents, TimeMs(20_999)).is_empty());
        assert_eq!(sched.progress(mira, TimeMs(20_999)).unwrap().step_index, 0);
    }

    #[test]
    fn steps_advance_through_gapless_windows() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        // Travel arbor→imlay closes at 21 000; the rest opens right there.
        assert!(sched.poll(&mut agents, TimeMs(21_000)).is_empty());
        let p = sched.progress(mira, TimeMs(21_000)).unwrap();
        assert_eq!(p.step_index, 1);
        assert_eq!(p.step_progress, 0.0);
        assert!(sched.current_step(mira).unwrap().is_rest());
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(10.0, 0.0));

        // Rest closes at 51 000, final travel at 71 000.
        assert!(sched.poll(&mut agents, TimeMs(51_000)).is_empty());
        assert_eq!(sched.progress(mira, TimeMs(51_000)).unwrap().step_index, 2);

        let arrivals = sched.poll(&mut agents, TimeMs(71_000));
        assert_eq!(arrivals, vec![Arrival { agent: mira, passage: "quarry".to_string() }]);

        let record = agents.get(mira).unwrap();
        assert_eq!(record.status, AgentStatus::Fixed);
        assert_eq!(record.coordinates, Coord::new(20.0, 0.0));
        assert_eq!(record.passage, "quarry");
        assert!(!sched.is_traveling(mira));
        assert!(sched.timers.is_empty());
        assert_eq!(sched.next_deadline(), None);
    }

    #[test]
    fn one_late_poll_catches_up_the_whole_chain() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        let arrivals = sched.poll(&mut agents, TimeMs(1_000_000));
        assert_eq!(arrivals.len(), 1);
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(20.0, 0.0));
        assert!(!sched.is_traveling(mira));
    }

    #[test]
    fn late_polls_open_windows_at_the_recorded_end() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        // Polled 4 s after the first deadline; the rest window still spans
        // 21 000..51 000, so we are 4/30 of the way through it.
        sched.poll(&mut agents, TimeMs(25_000));
        let p = sched.progress(mira, TimeMs(25_000)).unwrap();
        assert_eq!(p.step_index, 1);
        assert!((p.step_progress - 4.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn trivial_orders_complete_on_the_next_poll() {
        let (mut agents, _, graph, mut sched) = setup();
        let quinn =
            agents.register(AgentRecord::new("Quinn", "quarry", Coord::new(20.0, 0.0), "Eldaron"));
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);

        assert!(sched.start_travel(&mut agents, &graph, quinn, order, TimeMs(5_000)));
        assert!(sched.is_traveling(quinn));

        let arrivals = sched.poll(&mut agents, TimeMs(5_000));
        assert_eq!(arrivals, vec![Arrival { agent: quinn, passage: "quarry".to_string() }]);
        assert_eq!(agents.get(quinn).unwrap().status, AgentStatus::Fixed);
        assert!(!sched.is_traveling(quinn));
    }

    #[test]
    fn positions_interpolate_within_the_current_step() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("imlay", 10.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(0));

        assert_eq!(sched.position(&agents, mira, TimeMs(0)), Some(Coord::new(0.0, 0.0)));
        assert_eq!(sched.position(&agents, mira, TimeMs(10_000)), Some(Coord::new(5.0, 0.0)));
        // Past the deadline but not yet polled: clamped to the endpoint.
        assert_eq!(sched.position(&agents, mira, TimeMs(25_000)), Some(Coord::new(10.0, 0.0)));
    }

    #[test]
    fn positions_move_monotonically_along_a_step() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("imlay", 10.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(0));

        let mut last_x = -1.0;
        for k in 0..=20 {
            let x = sched.position(&agents, mira, TimeMs(k * 1_000)).unwrap().x;
            assert!(x >= last_x, "position moved backwards at t={k}s");
            last_x = x;
        }
    }

    #[test]
    fn rests_hold_position() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));
        sched.poll(&mut agents, TimeMs(21_000));

        assert_eq!(sched.position(&agents, mira, TimeMs(30_000)), Some(Coord::new(10.0, 0.0)));
        assert_eq!(sched.position(&agents, mira, TimeMs(45_000)), Some(Coord::new(10.0, 0.0)));
    }

    #[test]
    fn cancel_freezes_the_agent_mid_leg() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        assert!(sched.cancel(&mut agents, mira, TimeMs(11_000)));
        let record = agents.get(mira).unwrap();
        assert_eq!(record.status, AgentStatus::Fixed);
        assert_eq!(record.coordinates, Coord::new(5.0, 0.0));
        assert!(!sched.is_traveling(mira));

        // The abandoned timer fires into nothing.
        assert!(sched.poll(&mut agents, TimeMs(1_000_000)).is_empty());
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(5.0, 0.0));

        // Cancelling again is a no-op.
        assert!(!sched.cancel(&mut agents, mira, TimeMs(12_000)));
        assert_eq!(agents.get(mira).unwrap().status, AgentStatus::Fixed);
    }

    #[test]
    fn cancel_pins_idle_followers() {
        let (mut agents, mira, _, mut sched) = setup();
        agents.get_mut(mira).unwrap().status = AgentStatus::Follow;

        assert!(!sched.cancel(&mut agents, mira, TimeMs(0)));
        assert_eq!(agents.get(mira).unwrap().status, AgentStatus::Fixed);
    }

    #[test]
    fn restarting_replaces_the_itinerary_cleanly() {
        let (mut agents, mira, graph, mut sched) = setup();
        let out = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, out, TimeMs(1_000));

        // 60% through the first leg, turn around for home. The new route
        // starts from the interpolated (6,0), whose anchor is the inn.
        let back = helpers::order("arbor", 0.0, 0.0, TravelKind::Relocate);
        assert!(sched.start_travel(&mut agents, &graph, mira, back, TimeMs(13_000)));

        let p = sched.progress(mira, TimeMs(13_000)).unwrap();
        assert_eq!(p.step_count, 1);
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(10.0, 0.0));
        assert_eq!(sched.destination(mira).unwrap().passage, "arbor");

        // The first travel's deadline fires into a stale token.
        assert!(sched.poll(&mut agents, TimeMs(21_000)).is_empty());
        assert_eq!(sched.progress(mira, TimeMs(21_000)).unwrap().step_index, 0);

        let arrivals = sched.poll(&mut agents, TimeMs(33_000));
        assert_eq!(arrivals, vec![Arrival { agent: mira, passage: "arbor".to_string() }]);
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(0.0, 0.0));
    }

    #[test]
    fn retargeting_far_reroutes_from_the_interpolated_position() {
        let (mut agents, mira, graph, mut sched) = setup();
        let order = helpers::order("quarry", 20.0, 0.0, TravelKind::Relocate);
        sched.start_travel(&mut agents, &graph, mira, order, TimeMs(1_000));

        // 60% through arbor→imlay the quarry "moves". From (6,0) the inn is
        // the nearest anchor, so the fresh route is the single inn→quarry
        // leg rather than the full three-step chain.
        let outcome = sched.retarget(
            &mut agents,
            &graph,
            mira,
            "quarry",
            Coord::new(20.0, 0.0),
            "Eldaron",
            TimeMs(13_000),
        );
        assert_eq!(outcome, Retarget::Started);
        let p = sched.progress(mira, TimeMs(13_000)).unwrap();
        assert_eq!(p.step_count, 1);
        assert_eq!(p.total_km, 100.0);
        assert_eq!(agents.get(mira).unwrap().coordinates, Coord::new(10.0, 0.0));

        // Follow orders leave the agent tracking the target on arrival.
        let arrivals = sched.poll(&mut agents, TimeMs(33_000));
        assert_eq!(arrivals.len(), 1);
        assert_eq!(agents.get(mira).unwrap().status, AgentStatus::Follow);
    }

    #[test]
    fn retargeting_near_snaps_without_travel() {
        let (mut agents, _, graph, mut sched) = setup();
        let quinn =
            agents.register(AgentRecord::new("Quinn", "quarry", Coord::new(20.0, 0.0), "Eldaron"));

        // 0.4 km away: inside the proximity threshold.
        let outcome = sched.retarget(
            &mut agents,
            &graph,
            quinn,
            "imlay",
            Coord::new(20.04, 0.0),
            "Eldaron",
            TimeMs(0),
        );
        assert_eq!(outcome, Retarget::Teleported);

        let record = agents.get(quinn).unwrap();
        assert_eq!(record.coordinates, Coord::new(20.04, 0.0));
        assert_eq!(record.passage, "imlay");
        assert_eq!(record.status, AgentStatus::Follow);
        assert!(!sched.is_traveling(quinn));
    }

    #[test]
    fn retargeting_somewhere_unreachable_fails_fixed() {
        let (mut agents, mira, graph, mut sched) = setup();
        let outcome = sched.retarget(
            &mut agents,
            &graph,
            mira,
            "zinc",
            Coord::new(90.0, 90.0),
            "Thule",
            TimeMs(0),
        );
        assert_eq!(outcome, Retarget::Failed);
        assert_eq!(agents.get(mira).unwrap().status, AgentStatus::Fixed);
        assert!(!sched.is_traveling(mira));

        let missing = sched.retarget(
            &mut agents,
            &graph,
            AgentId(99),
            "zinc",
            Coord::new(90.0, 90.0),
            "Thule",
            TimeMs(0),
        );
        assert_eq!(missing, Retarget::Failed);
    }

    #[test]
    fn follower_sweep_picks_the_right_agents() {
        let (mut agents, mira, graph, mut sched) = setup();
        let quinn =
            agents.register(AgentRecord::new("Quinn", "quarry", Coord::new(20.0, 0.0), "Eldaron"));
        let busy =
            agents.register(AgentRecord::new("Busy", "arbor", Coord::new(0.0, 0.0), "Eldaron"));
        let settled =
            agents.register(AgentRecord::new("Settled", "arbor", Coord::new(0.0, 0.0), "Eldaron"));
        let pinned =
            agents.register(AgentRecord::new("Pinned", "imlay", Coord::new(5.0, 0.0), "Eldaron"));
        let ghost =
            agents.register(AgentRecord::new("Ghost", "imlay", Coord::new(10.0, 0.0), "Eldaron"));
        let sleeper =
            agents.register(AgentRecord::new("Sleeper", "imlay", Coord::new(10.0, 0.0), "Eldaron"));

        // Mira idles just off the target; the sweep should snap her to it.
        {
            let r = agents.get_mut(mira).unwrap();
            r.status = AgentStatus::Follow;
            r.passage = "imlay".to_string();
            r.coordinates = Coord::new(0.04, 0.0);
        }
        agents.get_mut(quinn).unwrap().status = AgentStatus::Follow;
        agents.get_mut(settled).unwrap().status = AgentStatus::Follow;
        agents.get_mut(ghost).unwrap().status = AgentStatus::Follow;
        agents.get_mut(ghost).unwrap().is_alive = false;
        agents.get_mut(sleeper).unwrap().status = AgentStatus::Follow;
        agents.get_mut(sleeper).unwrap().is_active = false;

        // Busy is mid-flight under a follow order, 60% along arbor→imlay.
        let chase = helpers::order("quarry", 20.0, 0.0, TravelKind::Follow);
        sched.start_travel(&mut agents, &graph, busy, chase, TimeMs(1_000));

        let results = sched.retarget_followers(
            &mut agents,
            &graph,
            "arbor",
            Coord::new(0.0, 0.0),
            "Eldaron",
            TimeMs(13_000),
        );
        assert_eq!(
            results,
            vec![
                (mira, Retarget::Teleported),
                (quinn, Retarget::Started),
                (busy, Retarget::Started),
            ]
        );

        // Snapped follower sits exactly on the target.
        let r = agents.get(mira).unwrap();
        assert_eq!(r.coordinates, Coord::new(0.0, 0.0));
        assert_eq!(r.passage, "arbor");
        assert_eq!(r.status, AgentStatus::Follow);

        // Busy was rerouted from its interpolated (6,0).
        assert_eq!(sched.destination(busy).unwrap().passage, "arbor");
        assert_eq!(agents.get(busy).unwrap().status, AgentStatus::Traveling);

        // The rest were left alone.
        assert_eq!(agents.get(settled).unwrap().status, AgentStatus::Follow);
        assert_eq!(agents.get(settled).unwrap().coordinates, Coord::new(0.0, 0.0));
        assert_eq!(agents.get(pinned).unwrap().status, AgentStatus::Fixed);
        assert_eq!(agents.get(ghost).unwrap().coordinates, Coord::new(10.0, 0.0));
        assert_eq!(agents.get(sleeper).unwrap().coordinates, Coord::new(10.0, 0.0));
    }

    #[test]
    fn idle_agents_report_record_position_and_no_progress() {
        let (mut agents, mira, _, sched) = setup();
        agents.get_mut(mira).unwrap().coordinates = Coord::new(7.0, 3.0);

        assert_eq!(sched.position(&agents, mira, TimeMs(0)), Some(Coord::new(7.0, 3.0)));
        assert_eq!(sched.position(&agents, AgentId(99), TimeMs(0)), None);
        assert!(sched.progress(mira, TimeMs(0)).is_none());
        assert!(sched.current_step(mira).is_none());
        assert!(sched.destination(mira).is_none());
    }
}
