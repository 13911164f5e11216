//! Configuration loading and typed config structures for the Tycoon
//! simulation.
//!
//! The canonical configuration lives in `tycoon-config.yaml` in the working
//! directory. Every field has a default matching the stock game balance, so
//! a missing file, a missing section, or a missing key all fall back to the
//! same numbers.

use std::path::Path;

use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::clock::interval_from_secs;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    Env {
        /// The environment variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration parsed but describes an unplayable game.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `tycoon-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TycoonConfig {
    /// World-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Time-based income and reputation curve.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Internal spy threat parameters.
    #[serde(default)]
    pub threat: ThreatConfig,

    /// Player action costs, gates, and payouts.
    #[serde(default)]
    pub actions: ActionConfig,

    /// Game API listen address.
    #[serde(default)]
    pub server: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TycoonConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TYCOON_HOST` overrides `server.host`
    /// - `TYCOON_PORT` overrides `server.port`
    /// - `TYCOON_SEED` overrides `world.seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML,
    /// [`ConfigError::Env`] for a malformed override, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `TYCOON_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a variable is set but malformed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a variable is set but malformed.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("TYCOON_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TYCOON_PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Env {
                var: "TYCOON_PORT",
                reason: format!("{e}"),
            })?;
        }
        if let Some(seed) = lookup("TYCOON_SEED") {
            self.world.seed = Some(seed.parse().map_err(|e| ConfigError::Env {
                var: "TYCOON_SEED",
                reason: format!("{e}"),
            })?);
        }
        Ok(())
    }

    /// Reject configurations the tick engine cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };
        if self.economy.auto_interval_secs == 0 {
            return invalid("economy.auto_interval_secs must be at least 1");
        }
        if self.economy.settle_interval_secs == 0 {
            return invalid("economy.settle_interval_secs must be at least 1");
        }
        if self.economy.rep_base_need == 0 {
            return invalid("economy.rep_base_need must be at least 1");
        }
        if self.threat.escalate_interval_secs == 0 {
            return invalid("threat.escalate_interval_secs must be at least 1");
        }
        if self.threat.spawn_chance_percent > 100 {
            return invalid("threat.spawn_chance_percent must be at most 100");
        }
        if self.actions.work_min > self.actions.work_max {
            return invalid("actions.work_min must not exceed actions.work_max");
        }
        if self.actions.invest_cap <= 0 {
            return invalid("actions.invest_cap must be positive");
        }
        if self.economy.starting_money < 0 {
            return invalid("economy.starting_money must not be negative");
        }

        let amounts = [
            ("economy.auto_income_per_level", self.economy.auto_income_per_level),
            ("economy.staff_effect", self.economy.staff_effect),
            ("actions.work_min", self.actions.work_min),
            ("actions.upgrade_cost_step", self.actions.upgrade_cost_step),
            ("actions.reputation_cost", self.actions.reputation_cost),
            ("actions.hire_staff_cost", self.actions.hire_staff_cost),
            ("actions.hire_security_cost", self.actions.hire_security_cost),
            ("actions.investigate_spy_cost", self.actions.investigate_spy_cost),
            ("actions.purge_spy_cost", self.actions.purge_spy_cost),
        ];
        if let Some((key, _)) = amounts.iter().find(|(_, amount)| *amount < 0) {
            return invalid(&format!("{key} must not be negative"));
        }

        let rates = [
            ("economy.invest_mult", self.economy.invest_mult),
            ("economy.rep_bonus_per_level", self.economy.rep_bonus_per_level),
            ("threat.base_loss", self.threat.base_loss),
            ("threat.loss_per_level", self.threat.loss_per_level),
            (
                "threat.security_reduction_per_guard",
                self.threat.security_reduction_per_guard,
            ),
            ("threat.security_reduction_cap", self.threat.security_reduction_cap),
            ("threat.accusation_penalty", self.threat.accusation_penalty),
        ];
        if let Some((key, _)) = rates
            .iter()
            .find(|(_, rate)| *rate < Decimal::ZERO || *rate > Decimal::ONE)
        {
            return invalid(&format!("{key} must be between 0 and 1"));
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable company name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducible runs. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
        }
    }
}

/// Time-based income and reputation curve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Cash the company starts with.
    #[serde(default = "default_starting_money")]
    pub starting_money: i64,

    /// Seconds per auto-income tick.
    #[serde(default = "default_auto_interval_secs")]
    pub auto_interval_secs: u64,

    /// Seconds per settlement interval.
    #[serde(default = "default_settle_interval_secs")]
    pub settle_interval_secs: u64,

    /// Income per auto-income tick for each purchased auto level.
    #[serde(default = "default_auto_income_per_level")]
    pub auto_income_per_level: i64,

    /// Income per auto-income tick for each staff member.
    #[serde(default = "default_staff_effect")]
    pub staff_effect: i64,

    /// Fraction of invested capital paid out per auto-income tick.
    #[serde(default = "default_invest_mult")]
    pub invest_mult: Decimal,

    /// Experience needed to leave reputation level 0.
    #[serde(default = "default_rep_base_need")]
    pub rep_base_need: u32,

    /// Additional experience needed per reputation level.
    #[serde(default = "default_rep_need_growth")]
    pub rep_need_growth: u32,

    /// Manual income bonus per reputation level.
    #[serde(default = "default_rep_bonus_per_level")]
    pub rep_bonus_per_level: Decimal,
}

impl EconomyConfig {
    /// Auto-income interval as a duration.
    pub fn auto_interval(&self) -> TimeDelta {
        interval_from_secs(self.auto_interval_secs)
    }

    /// Settlement interval as a duration.
    pub fn settle_interval(&self) -> TimeDelta {
        interval_from_secs(self.settle_interval_secs)
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            auto_interval_secs: default_auto_interval_secs(),
            settle_interval_secs: default_settle_interval_secs(),
            auto_income_per_level: default_auto_income_per_level(),
            staff_effect: default_staff_effect(),
            invest_mult: default_invest_mult(),
            rep_base_need: default_rep_base_need(),
            rep_need_growth: default_rep_need_growth(),
            rep_bonus_per_level: default_rep_bonus_per_level(),
        }
    }
}

/// Internal spy threat parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreatConfig {
    /// Seconds per escalation step.
    #[serde(default = "default_escalate_interval_secs")]
    pub escalate_interval_secs: u64,

    /// Highest threat level a spy can reach.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Reputation at which the company becomes a target.
    #[serde(default = "default_min_reputation")]
    pub min_reputation: u32,

    /// Chance (0--100) that a spy appears on any single call.
    #[serde(default = "default_spawn_chance_percent")]
    pub spawn_chance_percent: u32,

    /// Fraction of cash lost per call at threat level 0.
    #[serde(default = "default_base_loss")]
    pub base_loss: Decimal,

    /// Additional loss fraction per threat level.
    #[serde(default = "default_loss_per_level")]
    pub loss_per_level: Decimal,

    /// Damage mitigation per security guard.
    #[serde(default = "default_security_reduction_per_guard")]
    pub security_reduction_per_guard: Decimal,

    /// Upper bound on damage mitigation.
    #[serde(default = "default_security_reduction_cap")]
    pub security_reduction_cap: Decimal,

    /// Fraction of cash forfeited on a wrong accusation.
    #[serde(default = "default_accusation_penalty")]
    pub accusation_penalty: Decimal,
}

impl ThreatConfig {
    /// Escalation interval as a duration.
    pub fn escalate_interval(&self) -> TimeDelta {
        interval_from_secs(self.escalate_interval_secs)
    }
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            escalate_interval_secs: default_escalate_interval_secs(),
            max_level: default_max_level(),
            min_reputation: default_min_reputation(),
            spawn_chance_percent: default_spawn_chance_percent(),
            base_loss: default_base_loss(),
            loss_per_level: default_loss_per_level(),
            security_reduction_per_guard: default_security_reduction_per_guard(),
            security_reduction_cap: default_security_reduction_cap(),
            accusation_penalty: default_accusation_penalty(),
        }
    }
}

/// Player action costs, gates, and payouts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionConfig {
    /// Lowest manual work payout before the reputation bonus.
    #[serde(default = "default_work_min")]
    pub work_min: i64,

    /// Highest manual work payout before the reputation bonus.
    #[serde(default = "default_work_max")]
    pub work_max: i64,

    /// Reputation experience earned by working.
    #[serde(default = "default_work_rep_gain")]
    pub work_rep_gain: u32,

    /// Upgrade to level `n` costs `n * upgrade_cost_step`.
    #[serde(default = "default_upgrade_cost_step")]
    pub upgrade_cost_step: i64,

    /// Cost of a reputation campaign.
    #[serde(default = "default_reputation_cost")]
    pub reputation_cost: i64,

    /// Reputation experience earned by a campaign.
    #[serde(default = "default_reputation_rep_gain")]
    pub reputation_rep_gain: u32,

    /// Cost of hiring a staff member.
    #[serde(default = "default_hire_staff_cost")]
    pub hire_staff_cost: i64,

    /// Reputation level required before staff will join.
    #[serde(default = "default_hire_staff_min_reputation")]
    pub hire_staff_min_reputation: u32,

    /// Cost of hiring a security guard.
    #[serde(default = "default_hire_security_cost")]
    pub hire_security_cost: i64,

    /// Largest amount moved into investments by one action.
    #[serde(default = "default_invest_cap")]
    pub invest_cap: i64,

    /// Cost of investigating an active spy.
    #[serde(default = "default_investigate_spy_cost")]
    pub investigate_spy_cost: i64,

    /// Cost of purging an active spy.
    #[serde(default = "default_purge_spy_cost")]
    pub purge_spy_cost: i64,

    /// Security guards required before a purge is possible.
    #[serde(default = "default_purge_spy_min_security")]
    pub purge_spy_min_security: u32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            work_max: default_work_max(),
            work_rep_gain: default_work_rep_gain(),
            upgrade_cost_step: default_upgrade_cost_step(),
            reputation_cost: default_reputation_cost(),
            reputation_rep_gain: default_reputation_rep_gain(),
            hire_staff_cost: default_hire_staff_cost(),
            hire_staff_min_reputation: default_hire_staff_min_reputation(),
            hire_security_cost: default_hire_security_cost(),
            invest_cap: default_invest_cap(),
            investigate_spy_cost: default_investigate_spy_cost(),
            purge_spy_cost: default_purge_spy_cost(),
            purge_spy_min_security: default_purge_spy_min_security(),
        }
    }
}

/// Game API listen address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Tycoon".to_owned()
}

const fn default_starting_money() -> i64 {
    100
}

const fn default_auto_interval_secs() -> u64 {
    10
}

const fn default_settle_interval_secs() -> u64 {
    180
}

const fn default_auto_income_per_level() -> i64 {
    10
}

const fn default_staff_effect() -> i64 {
    5
}

const fn default_invest_mult() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_rep_base_need() -> u32 {
    5
}

const fn default_rep_need_growth() -> u32 {
    3
}

const fn default_rep_bonus_per_level() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 2)
}

const fn default_escalate_interval_secs() -> u64 {
    30
}

const fn default_max_level() -> u32 {
    5
}

const fn default_min_reputation() -> u32 {
    5
}

const fn default_spawn_chance_percent() -> u32 {
    15
}

const fn default_base_loss() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 2)
}

const fn default_loss_per_level() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 2)
}

const fn default_security_reduction_per_guard() -> Decimal {
    Decimal::from_parts(2, 0, 0, false, 1)
}

const fn default_security_reduction_cap() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

const fn default_accusation_penalty() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 2)
}

const fn default_work_min() -> i64 {
    20
}

const fn default_work_max() -> i64 {
    40
}

const fn default_work_rep_gain() -> u32 {
    2
}

const fn default_upgrade_cost_step() -> i64 {
    100
}

const fn default_reputation_cost() -> i64 {
    30
}

const fn default_reputation_rep_gain() -> u32 {
    4
}

const fn default_hire_staff_cost() -> i64 {
    150
}

const fn default_hire_staff_min_reputation() -> u32 {
    3
}

const fn default_hire_security_cost() -> i64 {
    200
}

const fn default_invest_cap() -> i64 {
    200
}

const fn default_investigate_spy_cost() -> i64 {
    100
}

const fn default_purge_spy_cost() -> i64 {
    300
}

const fn default_purge_spy_min_security() -> u32 {
    2
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}
