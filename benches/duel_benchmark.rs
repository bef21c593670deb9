//! Benchmarks for action resolution and complete seeded duels.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robo_duel::{
    Action, Arena, AutoAnswer, Battlefield, Duel, Player, Roster, Script, Settings,
};

const ROBOTS: &str = "Titan 3000 300\nHornet 200 12\nSentinel 900 60\nWasp 150 8\n";
const WEAPONS: &str = "Railgun 400\nBlaster 45\nNeedle 120\n";

fn roster() -> Roster {
    let mut roster = Roster::new();
    roster.add_robots(ROBOTS, "robots.txt").unwrap();
    roster.add_weapons(WEAPONS, "weapons.txt").unwrap();
    roster
}

/// Deploy two random armed robots on a freshly filled arena.
fn battlefield(seed: u64, size: u32) -> (Battlefield, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut roster = roster();
    let catalog = roster.weapon_catalog();
    let mut first = roster.draw_robot(None, &mut rng).unwrap();
    let mut second = roster.draw_robot(None, &mut rng).unwrap();
    first.set_weapon(roster.weapon(None, &mut rng).unwrap());
    second.set_weapon(roster.weapon(None, &mut rng).unwrap());

    let settings = Settings::default().arena();
    let arena = Arena::new(size, size, size, &settings, &catalog, &mut rng).unwrap();
    let players = [Player::new(1, first).unwrap(), Player::new(2, second).unwrap()];
    (Battlefield::deploy(arena, players, &mut rng).unwrap(), rng)
}

fn bench_arena_fill(c: &mut Criterion) {
    let catalog = roster().weapon_catalog();
    let settings = Settings::default().arena();

    c.bench_function("arena_fill_40", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(42);
            let arena = Arena::new(40, 40, 40, &settings, black_box(&catalog), &mut rng).unwrap();
            black_box(arena)
        });
    });
}

fn bench_resolve_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_action");
    for command in ["attack", "move 3 -2 1", "move 900 0 0"] {
        group.bench_function(command, |b| {
            b.iter_batched(
                || battlefield(7, 30),
                |(mut field, mut rng)| {
                    let resolved = Action::new(2, 1)
                        .make(black_box(command), &mut field, &mut rng, &mut AutoAnswer(true))
                        .unwrap();
                    black_box(resolved)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_full_duel(c: &mut Criterion) {
    let commands: Vec<&str> = ["move 2 0 0", "attack", "move -1 1 0", "attack", "move 0 -2 1", "attack"]
        .into_iter()
        .cycle()
        .take(600)
        .collect();

    c.bench_function("full_duel_seeded", |b| {
        b.iter_batched(
            || battlefield(42, 30),
            |(field, mut rng)| {
                let mut script = Script::new(commands.iter().copied());
                let outcome = Duel::new(field).run(&mut script, &mut AutoAnswer(true), &mut rng);
                black_box(outcome)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_arena_fill, bench_resolve_action, bench_full_duel);
criterion_main!(benches);
