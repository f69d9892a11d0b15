//! Combat resolver for turn-based fights.
//!
//! The `CombatResolver` handles:
//! - `StartCombat`: engage an enemy directly
//! - `AttackEnemy`: strike, then take the counterattack if the enemy survives
//! - `Defend`: double defense for the next counterattack
//! - `Flee`: leave combat at a price, per [`FleePolicy`]
//! - `EndCombat`: leave combat with no reward and no penalty
//!
//! Only the active combatant may act. Every combat action is a no-op outside
//! combat.
//!
//! # Damage
//!
//! Attacks and counterattacks always deal at least 1 damage so a fight
//! cannot stall. Flee damage may be 0.

use rand::Rng;

use crate::action::{Action, ActionKind};
use crate::config::FleePolicy;
use crate::player::PlayerId;
use crate::state::{Engagement, SessionState};

use super::progression::{advance_if_qualified, award_victory};
use super::{append_line, check_defeat, ResolveContext, Resolver};

/// Message set by `Defend`.
pub const DEFEND_MESSAGE: &str = "You brace yourself and defend! Incoming damage will be reduced.";

/// Damage an attack deals: `max(1, attack - defense)`.
#[must_use]
pub const fn attack_damage(attack: u32, defense: u32) -> u32 {
    let raw = attack.saturating_sub(defense);
    if raw == 0 {
        1
    } else {
        raw
    }
}

/// Damage a counterattack deals. Defending doubles the defender's defense.
#[must_use]
pub const fn counter_damage(attack: u32, defense: u32, defending: bool) -> u32 {
    let effective = if defending {
        defense.saturating_mul(2)
    } else {
        defense
    };
    attack_damage(attack, effective)
}

/// Damage taken while fleeing: `max(0, attack - defense)`.
#[must_use]
pub const fn flee_penalty(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense)
}

/// Resolver for combat actions.
///
/// # Example
///
/// ```
/// use citybrawl_core::action::ActionKind;
/// use citybrawl_core::resolver::{CombatResolver, Resolver};
///
/// let resolver = CombatResolver::new();
/// assert!(resolver.handles().contains(&ActionKind::AttackEnemy));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The engagement `who` is allowed to act in, if any.
    fn engagement_of(current: &SessionState, who: PlayerId) -> Option<&Engagement> {
        current
            .combat
            .as_ref()
            .filter(|engagement| engagement.player == who)
    }

    fn start(current: &SessionState, next: &mut SessionState, action: &Action) {
        let Action::StartCombat { who, enemy } = action else {
            return;
        };
        if current.is_in_combat() || current.player(*who).map_or(true, |p| p.is_defeated()) {
            return;
        }
        let enemy_id = next.arena.allocate_id();
        tracing::debug!(
            target: "citybrawl::reducer",
            player = %who,
            enemy = %enemy.name,
            "combat.started"
        );
        next.combat = Some(Engagement {
            player: *who,
            enemy_id,
            enemy: enemy.clone(),
        });
    }

    fn attack(ctx: &ResolveContext<'_>, current: &SessionState, next: &mut SessionState, who: PlayerId) {
        let (Some(engagement), Some(player)) = (Self::engagement_of(current, who), current.player(who))
        else {
            return;
        };
        let mut enemy = engagement.enemy.clone();
        let damage = attack_damage(player.stats.attack, enemy.stats.defense);
        enemy.stats.take_damage(damage);
        let mut message = format!("You attacked {} for {damage} damage!", enemy.name);

        if enemy.stats.is_defeated() {
            append_line(&mut message, &format!("You defeated {}!", enemy.name));
            next.combat = None;
            let mut level_up = None;
            if let Some(player) = next.player_mut(who) {
                player.is_defending = false;
                level_up = award_victory(player, ctx.config);
            }
            if let Some(level) = level_up {
                append_line(&mut message, &format!("Level up! You are now level {level}."));
            }
            tracing::debug!(
                target: "citybrawl::reducer",
                player = %who,
                enemy = %enemy.name,
                "combat.won"
            );
            next.message = message;
            advance_if_qualified(ctx, next, who);
            return;
        }

        let counter = counter_damage(enemy.stats.attack, player.stats.defense, player.is_defending);
        append_line(
            &mut message,
            &format!("{} counterattacked for {counter} damage!", enemy.name),
        );
        if let Some(player) = next.player_mut(who) {
            player.stats.take_damage(counter);
            player.is_defending = false;
        }
        if let Some(engagement) = next.combat.as_mut() {
            engagement.enemy = enemy;
        }
        next.message = message;
        check_defeat(next, who);
    }

    fn defend(current: &SessionState, next: &mut SessionState, who: PlayerId) {
        if Self::engagement_of(current, who).is_none() {
            return;
        }
        if let Some(player) = next.player_mut(who) {
            player.is_defending = true;
            next.message = DEFEND_MESSAGE.to_string();
        }
    }

    fn flee(ctx: &ResolveContext<'_>, current: &SessionState, next: &mut SessionState, who: PlayerId) {
        let (Some(engagement), Some(player)) = (Self::engagement_of(current, who), current.player(who))
        else {
            return;
        };
        let name = &engagement.enemy.name;

        if let FleePolicy::Chance { success } = ctx.config.flee {
            let success = if success.is_nan() { 0.0 } else { success.clamp(0.0, 1.0) };
            if next.rng.gen_bool(success) {
                Self::end(current, next, who);
                next.message = format!("You got away from {name}!");
                return;
            }
        }

        let penalty = flee_penalty(engagement.enemy.stats.attack, player.stats.defense);
        if let Some(player) = next.player_mut(who) {
            player.stats.take_damage(penalty);
        }

        match ctx.config.flee {
            FleePolicy::Penalty => {
                next.message = format!("You fled from {name}, taking {penalty} damage.");
                if next.player(who).is_some_and(|p| !p.is_defeated()) {
                    Self::end(current, next, who);
                }
            }
            FleePolicy::Chance { .. } => {
                next.message = format!("You failed to escape! {name} hit you for {penalty} damage.");
            }
        }
        check_defeat(next, who);
    }

    fn end(current: &SessionState, next: &mut SessionState, who: PlayerId) {
        if Self::engagement_of(current, who).is_none() {
            return;
        }
        next.combat = None;
        if let Some(player) = next.player_mut(who) {
            player.is_defending = false;
        }
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[ActionKind] {
        &[
            ActionKind::StartCombat,
            ActionKind::AttackEnemy,
            ActionKind::Defend,
            ActionKind::Flee,
            ActionKind::EndCombat,
        ]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    ) {
        match action {
            Action::StartCombat { .. } => Self::start(current, next, action),
            Action::AttackEnemy { who } => Self::attack(ctx, current, next, *who),
            Action::Defend { who } => Self::defend(current, next, *who),
            Action::Flee { who } => Self::flee(ctx, current, next, *who),
            Action::EndCombat { who } => Self::end(current, next, *who),
            _ => {}
        }
    }
}
