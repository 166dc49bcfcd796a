//! One simulation step
//!
//! Order within a step:
//! 1. integrate `pos += vel`
//! 2. reflect off and clamp to the arena walls
//! 3. scan unordered pairs `(i, j)`, `i < j`, ascending
//! 4. convert on contact, in place
//! 5. recount kinds
//! 6. end the run once fewer than two kinds are alive
//!
//! Conversions are applied in place during the scan, so later pairs see kinds
//! changed by earlier pairs. A token is converted at most once per step: after
//! its first conversion it can still convert others, but cannot be converted
//! back until the next step.

use super::collision::{bounce_off_walls, tokens_touch};
use super::rules::Clash;
use super::state::{KindCounts, Simulation, StepReport, Token};

/// Advance the simulation by one tick
pub fn step(sim: &mut Simulation) -> StepReport {
    if sim.ended {
        return sim.report();
    }

    sim.tick += 1;

    for token in &mut sim.tokens {
        token.converted = false;
        token.pos += token.vel;
        bounce_off_walls(&mut token.pos, &mut token.vel, token.size, &sim.arena);
    }

    let conversions = resolve_contacts(sim);

    let counts = KindCounts::tally(&sim.tokens);
    assert_eq!(
        counts.total(),
        sim.population,
        "population changed during step {}",
        sim.tick
    );
    sim.counts = counts;

    let mut alive = counts.alive();
    match (alive.next(), alive.next()) {
        (Some(winner), None) => {
            sim.ended = true;
            sim.winner = Some(winner);
            log::info!("Run ended at tick {}: {} wins", sim.tick, winner);
        }
        (None, _) => {
            // Only reachable with an empty population
            sim.ended = true;
            log::warn!("Run ended at tick {} with no tokens alive", sim.tick);
        }
        _ => {}
    }

    StepReport {
        tick: sim.tick,
        counts,
        conversions,
        ended: sim.ended,
        winner: sim.winner,
    }
}

/// Pairwise contact scan; returns the number of conversions
fn resolve_contacts(sim: &mut Simulation) -> u32 {
    let rules = &sim.rules;
    let bounce = sim.bounce_same_kind;
    let tokens = &mut sim.tokens;
    let mut conversions = 0;

    for i in 0..tokens.len() {
        let (head, tail) = tokens.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !tokens_touch(a.pos, b.pos, a.size) {
                continue;
            }
            match rules.clash(a.kind, b.kind) {
                Clash::FirstWins => conversions += convert(b, a),
                Clash::SecondWins => conversions += convert(a, b),
                Clash::Tie => {
                    if bounce {
                        std::mem::swap(&mut a.vel, &mut b.vel);
                    }
                }
            }
        }
    }
    conversions
}

/// Turn `loser` into the kind of `winner` unless it already converted this step
fn convert(loser: &mut Token, winner: &Token) -> u32 {
    if loser.converted {
        return 0;
    }
    log::trace!("{} ({}) -> {} by {}", loser.id, loser.kind, winner.kind, winner.id);
    loser.kind = winner.kind;
    loser.converted = true;
    1
}
