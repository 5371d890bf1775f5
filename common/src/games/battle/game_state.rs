use super::types::{
    BASE_MAX_EXP, BASH_ATTACK_MULTIPLIER, BattleEvent, BattleStatus, CHARGE_PER_GEM, COMBO_BONUS,
    CRIT_MULTIPLIER, EXP_PER_GEM, Enemy, GEMS_PER_ATTACK, HEAL_PER_GEM, HEAL_SKILL_AMOUNT,
    LEVEL_UP_ATTACK, LEVEL_UP_MAX_HP, LevelUpChoice, MAX_CHARGE, MAX_EXP_PER_LEVEL, PlayerStats,
    SHIELD_PER_GEM, Skill,
};
use crate::games::SessionRng;
use crate::games::campaign::PlayerProfile;
use crate::games::match3::{GemKind, MatchEvent, MatchHandler};

/// Damage one match event deals to the enemy.
pub fn match_damage(attack: u32, cleared_count: usize, combo: u32, critical: bool) -> u32 {
    let combo_multiplier = 1.0 + COMBO_BONUS * f64::from(combo.saturating_sub(1));
    let crit_multiplier = if critical { CRIT_MULTIPLIER } else { 1.0 };
    let damage = f64::from(attack) * (cleared_count as f64 / GEMS_PER_ATTACK)
        * combo_multiplier
        * crit_multiplier;
    damage.floor() as u32
}

/// Stars for a won battle, from the hp left.
pub fn victory_stars(hp: u32, max_hp: u32) -> u8 {
    if max_hp == 0 {
        return 1;
    }
    let ratio = f64::from(hp) / f64::from(max_hp);
    if ratio > 0.8 {
        3
    } else if ratio > 0.4 {
        2
    } else {
        1
    }
}

/// Player versus one enemy. Match events from the board drive it through
/// [`MatchHandler`].
pub struct BattleState {
    player: PlayerStats,
    enemy: Enemy,
    status: BattleStatus,
    pending_events: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(campaign_level: u32, profile: &PlayerProfile, rng: &mut SessionRng) -> Self {
        Self::with_enemy(profile, Enemy::for_level(campaign_level, rng))
    }

    pub fn with_enemy(profile: &PlayerProfile, enemy: Enemy) -> Self {
        let player = PlayerStats {
            level: profile.level,
            exp: profile.exp,
            max_exp: BASE_MAX_EXP + profile.level.saturating_sub(1) * MAX_EXP_PER_LEVEL,
            hp: profile.hp.min(profile.max_hp),
            max_hp: profile.max_hp,
            attack: profile.attack,
            shield: 0,
            skill_charge: 0,
            heal_charge: 0,
            level_up_pending: false,
        };

        Self {
            player,
            enemy,
            status: BattleStatus::InProgress,
            pending_events: Vec::new(),
        }
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == BattleStatus::InProgress
    }

    pub fn level_up_pending(&self) -> bool {
        self.player.level_up_pending
    }

    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn apply_match(&mut self, event: &MatchEvent) {
        if !self.is_in_progress() || self.player.level_up_pending {
            return;
        }

        let count = u32::try_from(event.cleared_count).unwrap_or(u32::MAX);
        self.gain_exp(EXP_PER_GEM * count);

        let mut critical = false;
        match event.gem_kind {
            GemKind::Purple => {
                let amount = SHIELD_PER_GEM * count;
                self.player.shield += amount;
                self.pending_events.push(BattleEvent::Shielded { amount });
            }
            GemKind::Green => {
                let amount = self.heal(HEAL_PER_GEM * count);
                self.pending_events.push(BattleEvent::Healed { amount });
            }
            GemKind::Red => critical = true,
            GemKind::Blue => {
                self.player.skill_charge =
                    (self.player.skill_charge + CHARGE_PER_GEM * count).min(MAX_CHARGE);
                self.push_charge();
            }
            GemKind::Yellow => {
                self.player.heal_charge =
                    (self.player.heal_charge + CHARGE_PER_GEM * count).min(MAX_CHARGE);
                self.push_charge();
            }
            GemKind::Cyan => {}
        }

        let damage = match_damage(self.player.attack, event.cleared_count, event.combo, critical);
        self.pending_events.push(BattleEvent::PlayerStrike {
            damage,
            combo: event.combo,
            kind: event.gem_kind,
            critical,
        });
        self.damage_enemy(damage);
    }

    /// One enemy hit; the shield soaks up damage first. Returns the hp lost.
    pub fn enemy_attack(&mut self, rng: &mut SessionRng) -> u32 {
        if !self.is_in_progress() {
            return 0;
        }

        let damage = self.enemy.roll_damage(rng);
        let absorbed = damage.min(self.player.shield);
        self.player.shield -= absorbed;
        let taken = damage - absorbed;
        self.player.hp = self.player.hp.saturating_sub(taken);
        self.pending_events
            .push(BattleEvent::EnemyStrike { damage, absorbed });

        if self.player.hp == 0 {
            self.status = BattleStatus::Lost;
            self.pending_events.push(BattleEvent::Defeat);
        }
        taken
    }

    pub fn use_skill(&mut self, skill: Skill) -> Result<(), String> {
        if !self.is_in_progress() {
            return Err("Battle is not in progress".to_string());
        }

        match skill {
            Skill::Heal => {
                if self.player.heal_charge < MAX_CHARGE {
                    return Err(format!(
                        "Heal is not charged ({}/{})",
                        self.player.heal_charge, MAX_CHARGE
                    ));
                }
                self.player.heal_charge = 0;
                let amount = self.heal(HEAL_SKILL_AMOUNT);
                self.pending_events
                    .push(BattleEvent::SkillUsed { skill, amount });
            }
            Skill::Bash => {
                if self.player.skill_charge < MAX_CHARGE {
                    return Err(format!(
                        "Bash is not charged ({}/{})",
                        self.player.skill_charge, MAX_CHARGE
                    ));
                }
                self.player.skill_charge = 0;
                let amount = BASH_ATTACK_MULTIPLIER * self.player.attack;
                self.pending_events
                    .push(BattleEvent::SkillUsed { skill, amount });
                self.damage_enemy(amount);
            }
        }
        Ok(())
    }

    pub fn choose_level_up(&mut self, choice: LevelUpChoice) -> Result<(), String> {
        if !self.player.level_up_pending {
            return Err("No level-up choice is pending".to_string());
        }

        let player = &mut self.player;
        match choice {
            LevelUpChoice::MaxHp => {
                player.max_hp += LEVEL_UP_MAX_HP;
                player.hp = (player.hp + LEVEL_UP_MAX_HP).min(player.max_hp);
            }
            LevelUpChoice::Attack => player.attack += LEVEL_UP_ATTACK,
        }
        player.exp = player.exp.saturating_sub(player.max_exp);
        player.level += 1;
        player.max_exp += MAX_EXP_PER_LEVEL;
        player.level_up_pending = player.exp >= player.max_exp;

        let level = player.level;
        self.pending_events
            .push(BattleEvent::LevelledUp { level, choice });
        if self.player.level_up_pending {
            self.pending_events.push(BattleEvent::LevelUpReady);
        }
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<(), String> {
        if !self.is_in_progress() {
            return Err("Battle is already over".to_string());
        }
        self.status = BattleStatus::Retreated;
        self.pending_events.push(BattleEvent::Retreated);
        Ok(())
    }

    fn gain_exp(&mut self, amount: u32) {
        self.player.exp += amount;
        self.pending_events.push(BattleEvent::ExpGained { amount });
        if self.player.exp >= self.player.max_exp {
            self.player.level_up_pending = true;
            self.pending_events.push(BattleEvent::LevelUpReady);
        }
    }

    /// Returns the hp actually restored.
    fn heal(&mut self, amount: u32) -> u32 {
        let before = self.player.hp;
        self.player.hp = (self.player.hp + amount).min(self.player.max_hp);
        self.player.hp - before
    }

    fn push_charge(&mut self) {
        self.pending_events.push(BattleEvent::Charged {
            skill_charge: self.player.skill_charge,
            heal_charge: self.player.heal_charge,
        });
    }

    fn damage_enemy(&mut self, amount: u32) {
        self.enemy.hp = self.enemy.hp.saturating_sub(amount);
        if self.enemy.is_defeated() && self.is_in_progress() {
            let stars = victory_stars(self.player.hp, self.player.max_hp);
            self.status = BattleStatus::Won { stars };
            self.pending_events.push(BattleEvent::Victory { stars });
        }
    }
}

impl MatchHandler for BattleState {
    fn on_match(&mut self, event: &MatchEvent) {
        self.apply_match(event);
    }
}
