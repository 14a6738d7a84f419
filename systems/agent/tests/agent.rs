use std::time::Duration;

use maze_chase_core::{Adversary, Board, CellCoord, Direction, Event, InputEvent, Key, Tile};
use maze_chase_system_agent::{Agent, AgentMode, Config};
use maze_chase_world::Level;

// Spawn is (4, 2): pill to the right, power pill two to the right, pit above.
const CORRIDOR: &str = "\
#########
####-####
# .. .o.#
#########
";

#[derive(Debug, Default)]
struct RecordingAdversary {
    notifications: Vec<f64>,
}

impl Adversary for RecordingAdversary {
    fn notify_empowered(&mut self, time_left_ms: f64) {
        self.notifications.push(time_left_ms);
    }
}

fn corridor() -> Level {
    Level::parse(CORRIDOR).expect("corridor layout is valid")
}

fn no_adversaries() -> Vec<RecordingAdversary> {
    Vec::new()
}

fn advance_ms(agent: &mut Agent, level: &mut Level, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    agent.advance(
        Duration::from_millis(millis),
        level,
        &mut no_adversaries(),
        &mut events,
    );
    events
}

#[test]
fn reset_places_agent_on_enterable_spawn() {
    let level = corridor();
    let agent = Agent::new(Config::default(), &level);

    assert_eq!(agent.position(), CellCoord::new(4, 2));
    assert!(level.is_enterable(agent.position()));
    assert_eq!(agent.score(), 0);
    assert_eq!(agent.direction(), None);
    assert_eq!(agent.mode(), AgentMode::Normal);
    assert_eq!(agent.move_timer_ms(), 200.0);
}

#[test]
fn stepping_right_onto_a_pill_scores_and_rearms() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::new(200.0, 15_000.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));

    let events = advance_ms(&mut agent, &mut level, 250);

    assert_eq!(agent.position(), CellCoord::new(5, 2));
    assert_eq!(agent.score(), 1);
    assert_eq!(level.tile(CellCoord::new(5, 2)), Tile::Empty);
    assert_eq!(agent.move_timer_ms(), 200.0);
    assert_eq!(
        events,
        vec![
            Event::AgentMoved {
                from: CellCoord::new(4, 2),
                to: CellCoord::new(5, 2),
            },
            Event::TileConsumed {
                cell: CellCoord::new(5, 2),
                tile: Tile::Pill,
                score: 1,
            },
        ]
    );
}

#[test]
fn zero_elapsed_time_never_moves_or_scores() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::default(), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));

    for _ in 0..1_000 {
        assert!(advance_ms(&mut agent, &mut level, 0).is_empty());
    }

    assert_eq!(agent.position(), CellCoord::new(4, 2));
    assert_eq!(agent.score(), 0);
    assert_eq!(agent.move_timer_ms(), 200.0);
}

#[test]
fn timer_must_drop_below_zero_before_a_move_fires() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::default(), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));

    assert!(advance_ms(&mut agent, &mut level, 200).is_empty());
    assert_eq!(agent.move_timer_ms(), 0.0);

    let events = advance_ms(&mut agent, &mut level, 1);
    assert_eq!(events.len(), 2);
    assert_eq!(agent.position(), CellCoord::new(5, 2));
}

#[test]
fn blocked_step_keeps_position_but_rearms_timer() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::default(), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowUp));

    let events = advance_ms(&mut agent, &mut level, 250);

    assert_eq!(agent.position(), CellCoord::new(4, 2));
    assert_eq!(agent.move_timer_ms(), 200.0);
    assert_eq!(
        events,
        vec![Event::AgentBlocked {
            at: CellCoord::new(4, 2),
            direction: Direction::Up,
        }]
    );
}

#[test]
fn idle_attempt_rearms_timer_without_events() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::default(), &level);

    let events = advance_ms(&mut agent, &mut level, 450);

    assert!(events.is_empty());
    assert_eq!(agent.position(), CellCoord::new(4, 2));
    assert_eq!(agent.move_timer_ms(), 200.0);
}

#[test]
fn consuming_the_same_cell_twice_scores_once() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::default(), &level);

    agent.handle_input(InputEvent::KeyDown(Key::ArrowLeft));
    let _ = advance_ms(&mut agent, &mut level, 250);
    assert_eq!(agent.position(), CellCoord::new(3, 2));
    assert_eq!(agent.score(), 1);

    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));
    let _ = advance_ms(&mut agent, &mut level, 250);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowLeft));
    let events = advance_ms(&mut agent, &mut level, 250);

    assert_eq!(agent.position(), CellCoord::new(3, 2));
    assert_eq!(agent.score(), 1);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::TileConsumed { .. })));
}

#[test]
fn power_pill_scores_ten_and_empowers() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::new(200.0, 5_000.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::D));

    let _ = advance_ms(&mut agent, &mut level, 250);
    let events = advance_ms(&mut agent, &mut level, 250);

    assert_eq!(agent.position(), CellCoord::new(6, 2));
    assert_eq!(agent.score(), 11);
    assert_eq!(level.tile(CellCoord::new(6, 2)), Tile::Empty);
    assert!(agent.is_empowered());
    assert_eq!(agent.empowered_time_left_ms(), 5_000.0);
    assert_eq!(agent.move_timer_ms(), 100.0);
    assert!(events.contains(&Event::EmpowermentStarted {
        duration_ms: 5_000.0
    }));
}

#[test]
fn second_power_pill_restarts_the_full_duration() {
    let mut level = Level::parse("####-####\n#    oo #\n#########\n").expect("valid layout");
    let mut agent = Agent::new(Config::new(200.0, 1_000.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));

    let _ = advance_ms(&mut agent, &mut level, 250);
    assert_eq!(agent.position(), CellCoord::new(5, 1));
    assert_eq!(agent.empowered_time_left_ms(), 1_000.0);

    let events = advance_ms(&mut agent, &mut level, 150);

    assert_eq!(agent.position(), CellCoord::new(6, 1));
    assert_eq!(agent.score(), 20);
    assert_eq!(agent.empowered_time_left_ms(), 1_000.0);
    assert_eq!(agent.move_timer_ms(), 100.0);
    assert_eq!(agent.mode(), AgentMode::Empowered);
    assert!(events.contains(&Event::EmpowermentStarted {
        duration_ms: 1_000.0
    }));
}

#[test]
fn empowerment_expiry_notifies_every_adversary_with_the_overshoot() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::new(200.0, 500.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));
    let _ = advance_ms(&mut agent, &mut level, 250);
    let _ = advance_ms(&mut agent, &mut level, 250);
    assert_eq!(agent.empowered_time_left_ms(), 500.0);
    agent.handle_input(InputEvent::KeyUp(Key::ArrowRight));

    let mut adversaries = vec![
        RecordingAdversary::default(),
        RecordingAdversary::default(),
        RecordingAdversary::default(),
    ];
    let mut events = Vec::new();
    agent.advance(
        Duration::from_millis(600),
        &mut level,
        &mut adversaries,
        &mut events,
    );

    assert_eq!(agent.mode(), AgentMode::Normal);
    assert_eq!(agent.empowered_time_left_ms(), -100.0);
    assert_eq!(agent.move_timer_ms(), 200.0);
    assert_eq!(events, vec![Event::EmpowermentEnded]);
    for adversary in &adversaries {
        assert_eq!(adversary.notifications, vec![-100.0]);
    }
}

#[test]
fn adversaries_hear_the_countdown_on_every_empowered_tick() {
    let mut level = corridor();
    let mut agent = Agent::new(Config::new(200.0, 1_000.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));
    let _ = advance_ms(&mut agent, &mut level, 250);
    let _ = advance_ms(&mut agent, &mut level, 250);
    agent.handle_input(InputEvent::KeyUp(Key::ArrowRight));

    let mut first = RecordingAdversary::default();
    let mut second = RecordingAdversary::default();
    {
        let mut roster: Vec<Box<dyn Adversary + '_>> =
            vec![Box::new(&mut first), Box::new(&mut second)];
        let mut events = Vec::new();
        for _ in 0..6 {
            agent.advance(
                Duration::from_millis(300),
                &mut level,
                &mut roster,
                &mut events,
            );
        }
    }

    assert_eq!(first.notifications, vec![700.0, 400.0, 100.0, -200.0]);
    assert_eq!(first.notifications, second.notifications);
    assert!(!agent.is_empowered());
}

// Spawn is (2, 1) with a power pill seven steps to the right.
const LONG_CORRIDOR: &str = "\
##-##################
#        o          #
#####################
";

#[test]
fn empowerment_halves_the_ticks_between_moves() {
    let mut level = Level::parse(LONG_CORRIDOR).expect("long corridor layout is valid");
    let mut agent = Agent::new(Config::new(200.0, 15_000.0), &level);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));

    let mut move_ticks = Vec::new();
    for tick in 1..=60 {
        let events = advance_ms(&mut agent, &mut level, 50);
        if events
            .iter()
            .any(|event| matches!(event, Event::AgentMoved { .. }))
        {
            move_ticks.push(tick);
        }
    }

    // A move fires once the timer is strictly negative: five quarter-interval
    // ticks in normal mode, three once the cadence is halved.
    assert_eq!(&move_ticks[..7], &[5, 10, 15, 20, 25, 30, 35]);
    assert_eq!(agent.score(), 10);
    let empowered_gaps: Vec<_> = move_ticks[6..]
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    assert!(!empowered_gaps.is_empty());
    assert!(empowered_gaps.iter().all(|gap| *gap == 3));
}

#[test]
fn empowerment_always_terminates() {
    for duration_ms in [1.0, 30.0, 250.0, 1_234.5, 4_000.0] {
        let mut level = corridor();
        let mut agent = Agent::new(Config::new(200.0, duration_ms), &level);
        agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));
        let _ = advance_ms(&mut agent, &mut level, 250);
        let _ = advance_ms(&mut agent, &mut level, 250);
        assert!(agent.is_empowered());

        let mut elapsed_ms = 0.0;
        while elapsed_ms < duration_ms {
            let _ = advance_ms(&mut agent, &mut level, 30);
            elapsed_ms += 30.0;
        }

        assert!(!agent.is_empowered(), "still empowered after {duration_ms}ms");
        assert!(agent.empowered_time_left_ms() <= 0.0);
        assert_eq!(agent.move_timer_ms(), 200.0);
    }
}

#[test]
fn stale_key_release_keeps_the_held_direction() {
    let level = corridor();
    let mut agent = Agent::new(Config::default(), &level);

    agent.handle_input(InputEvent::KeyDown(Key::ArrowRight));
    agent.handle_input(InputEvent::KeyDown(Key::ArrowUp));
    agent.handle_input(InputEvent::KeyUp(Key::ArrowRight));
    assert_eq!(agent.direction(), Some(Direction::Up));

    agent.handle_input(InputEvent::KeyUp(Key::ArrowLeft));
    assert_eq!(agent.direction(), Some(Direction::Up));

    agent.handle_input(InputEvent::KeyUp(Key::W));
    assert_eq!(agent.direction(), None);
}

#[test]
fn edge_of_the_board_blocks_without_wrapping() {
    let mut level = Level::parse("-\n \n").expect("open corner layout is valid");
    let mut agent = Agent::new(Config::default(), &level);
    assert_eq!(agent.position(), CellCoord::new(0, 1));

    agent.handle_input(InputEvent::KeyDown(Key::ArrowLeft));
    let left = advance_ms(&mut agent, &mut level, 250);
    agent.handle_input(InputEvent::KeyDown(Key::ArrowDown));
    let down = advance_ms(&mut agent, &mut level, 250);

    assert_eq!(agent.position(), CellCoord::new(0, 1));
    assert!(matches!(left.as_slice(), [Event::AgentBlocked { .. }]));
    assert!(matches!(down.as_slice(), [Event::AgentBlocked { .. }]));
}
