//! Property-based tests for robot and action mechanics.
//!
//! These tests verify stat formulas, foul penalties, movement limits,
//! collision handling and item exchanges.
//! Run with: cargo test --release prop_engine

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use robo_duel::game::{SpecialItem, Virus, check_invariants, exchange_weapon};
use robo_duel::{
    Action, Arena, ArenaSettings, AutoAnswer, Battlefield, Coord, Event, Player, Robot,
    ScriptedDice, Weapon,
};

fn arena(width: u32, length: u32, height: u32) -> Arena {
    let settings = ArenaSettings {
        min_dimension: 1,
        fill_coefficient: 0.0,
    };
    Arena::new(width, length, height, &settings, &[], &mut ScriptedDice::default()).unwrap()
}

fn field(arena: Arena, first: Robot, second: Robot, a: Coord, b: Coord) -> Battlefield {
    let mut players = [Player::new(1, first).unwrap(), Player::new(2, second).unwrap()];
    players[0].robot_mut().set_position(a);
    players[1].robot_mut().set_position(b);
    Battlefield::new(arena, players)
}

fn split(total: u32) -> (i32, i32, i32) {
    let third = i32::try_from(total / 3).unwrap();
    let rest = i32::try_from(total).unwrap() - 2 * third;
    (third, third, rest)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// The movement allowance follows `floor(9000 / hp + 600 / armor)`.
    #[test]
    fn prop_move_limit_formula(hp in 1u32..100_000, armor in 1u32..10_000) {
        let robot = Robot::new("R", f64::from(hp), f64::from(armor)).unwrap();
        let expected = (9000.0 / f64::from(hp) + 600.0 / f64::from(armor)).floor();
        prop_assert!((f64::from(robot.move_limit()) - expected).abs() < f64::EPSILON);
    }

    /// Health never drops below zero, whatever the damage.
    #[test]
    fn prop_damage_never_negative(hp in 0.1f64..10_000.0, hits in prop::collection::vec(-100.0f64..1e6, 1..20)) {
        let mut robot = Robot::new("R", hp, 1.0).unwrap();
        let mut previous = robot.hp();
        for hit in hits {
            robot.receive_damage(hit);
            prop_assert!(robot.hp() >= 0.0);
            prop_assert!(robot.hp() <= previous);
            previous = robot.hp();
        }
    }

    /// Attacks never heal and never exceed the weapon's reach.
    #[test]
    fn prop_attack_bounded(
        sigma in 0.1f64..1000.0,
        armor in 0.1f64..500.0,
        u1 in 0.0f64..=1.0,
        u2 in 0.0f64..=1.0,
        b in (0i32..20, 0i32..20, 0i32..20),
    ) {
        let mut attacker = Robot::new("A", 100.0, 10.0).unwrap();
        attacker.set_weapon(Weapon::new("Gun", sigma).unwrap());
        attacker.set_position(Coord::new(0, 0, 0));
        let mut target = Robot::new("B", 1e6, armor).unwrap();
        target.set_position(Coord::new(b.0, b.1, b.2));

        let damage = attacker.attack(&mut target, &mut ScriptedDice::new([u1, u2]));
        prop_assert!(damage >= 0.0);
        prop_assert!(damage <= sigma + 1e-9);
        prop_assert!((target.hp() - (1e6 - damage)).abs() < 1e-6);
    }

    /// The n-th foul costs exactly `2^n` health.
    #[test]
    fn prop_foul_costs_power_of_two(count in 1u32..20) {
        let first = Robot::new("A", 1e9, 10.0).unwrap();
        let second = Robot::new("B", 1e9, 10.0).unwrap();
        let mut field = field(arena(5, 5, 5), first, second, Coord::new(0, 0, 0), Coord::new(4, 4, 4));
        let mut dice = ScriptedDice::default();

        for n in 1..=count {
            let before = field.players[0].robot().hp();
            let resolved = Action::new(n, 1)
                .make("move -1 0 0", &mut field, &mut dice, &mut AutoAnswer(true))
                .unwrap();
            let expected = 2f64.powi(i32::try_from(n).unwrap());
            let charged = resolved.events().iter().any(
                |e| matches!(e, Event::Foul { damage, .. } if (damage - expected).abs() < f64::EPSILON),
            );
            prop_assert!(charged);
            prop_assert!((before - field.players[0].robot().hp() - expected).abs() < 1e-6);
            prop_assert_eq!(field.players[0].fouls(), n);
            prop_assert_eq!(field.players[0].robot().position(), Some(Coord::new(0, 0, 0)));
        }
    }

    /// A move of exactly the allowance is legal; one more unit is a foul.
    #[test]
    fn prop_move_limit_boundary(hp in 20u32..10_000, armor in 2u32..1_000) {
        let first = Robot::new("A", f64::from(hp), f64::from(armor)).unwrap();
        let limit = first.move_limit();
        let second = Robot::new("B", 100.0, 10.0).unwrap();
        let mut field = field(arena(1000, 1000, 1000), first, second, Coord::new(0, 0, 0), Coord::new(999, 999, 999));
        let mut dice = ScriptedDice::default();

        let (dx, dy, dz) = split(limit);
        Action::new(1, 1)
            .make(&format!("move {dx} {dy} {dz}"), &mut field, &mut dice, &mut AutoAnswer(true))
            .unwrap();
        prop_assert_eq!(field.players[0].fouls(), 0);
        prop_assert_eq!(field.players[0].robot().position(), Some(Coord::new(dx, dy, dz)));

        let (dx, dy, dz) = split(limit + 1);
        Action::new(2, 1)
            .make(&format!("move -{dx} -{dy} -{dz}"), &mut field, &mut dice, &mut AutoAnswer(true))
            .unwrap();
        prop_assert_eq!(field.players[0].fouls(), 1);
    }

    /// Two robots never end an action on the same cell.
    #[test]
    fn prop_no_shared_cell(
        a in (0i32..4, 0i32..4, 0i32..4),
        b in (0i32..4, 0i32..4, 0i32..4),
        size in 1u32..5,
        seed in any::<u64>(),
    ) {
        let size = size.max(2);
        let bound = i32::try_from(size).unwrap();
        let a = Coord::new(a.0 % bound, a.1 % bound, a.2 % bound);
        let b = Coord::new(b.0 % bound, b.1 % bound, b.2 % bound);
        prop_assume!(a != b);

        let first = Robot::new("A", 100.0, 10.0).unwrap();
        let second = Robot::new("B", 100.0, 10.0).unwrap();
        let mut field = field(arena(size, size, size), first, second, a, b);
        let mut rng = SmallRng::seed_from_u64(seed);

        let command = format!("move {} {} {}", b.x - a.x, b.y - a.y, b.z - a.z);
        Action::new(1, 1).make(&command, &mut field, &mut rng, &mut AutoAnswer(true)).unwrap();

        let moved = field.players[0].robot().position().unwrap();
        prop_assert_ne!(moved, b);
        prop_assert!(field.arena.contains(moved));
        prop_assert!(check_invariants(&field).is_empty());
    }

    /// Exchanging weapons twice restores the robot and the cell.
    #[test]
    fn prop_weapon_exchange_round_trip(
        held in prop::option::of(1.0f64..500.0),
        lying in prop::option::of(1.0f64..500.0),
    ) {
        let cell = Coord::new(1, 1, 1);
        let mut arena = arena(3, 3, 3);
        if let Some(sigma) = lying {
            let mut weapon = Weapon::new("Lying", sigma).unwrap();
            weapon.set_position(Some(cell));
            arena.place_item(cell, SpecialItem::Weapon(weapon)).unwrap();
        }
        let mut robot = Robot::new("R", 100.0, 10.0).unwrap();
        robot.set_position(cell);
        if let Some(sigma) = held {
            robot.set_weapon(Weapon::new("Held", sigma).unwrap());
        }
        let arena_before = arena.clone();
        let weapon_before = robot.weapon().cloned();

        exchange_weapon(&mut arena, cell, &mut robot);
        exchange_weapon(&mut arena, cell, &mut robot);

        prop_assert_eq!(&arena, &arena_before);
        prop_assert_eq!(robot.weapon().cloned(), weapon_before);
    }

    /// Each tick takes one turn of life; a spent virus is cleared.
    #[test]
    fn prop_virus_ticks_down(life in 1u32..10, u in 0.0f64..1.0) {
        let mut robot = Robot::new("R", 1e6, 10.0).unwrap();
        robot.infect(Virus::with_life(life));
        let mut dice = ScriptedDice::new([u]);

        for remaining in (0..life).rev() {
            let before = robot.hp();
            let damage = robot.receive_virus_damage(&mut dice);
            prop_assert!(damage >= 0.0);
            prop_assert!((before - robot.hp() - damage).abs() < 1e-9);
            match robot.virus() {
                Some(virus) => prop_assert_eq!(virus.life(), remaining),
                None => prop_assert_eq!(remaining, 0),
            }
        }
        prop_assert!(!robot.is_infected());
        prop_assert!(robot.receive_virus_damage(&mut dice).abs() < f64::EPSILON);
    }
}
