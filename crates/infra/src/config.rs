//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::PrincipalId;
use splitledger_ledger::OverpaymentPolicy;

pub const ENV_SERVICE_PRINCIPAL: &str = "SPLITLEDGER_SERVICE_PRINCIPAL";
pub const ENV_OVERPAYMENT: &str = "SPLITLEDGER_OVERPAYMENT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Runtime settings for [`crate::engine::SplitLedgerEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Identity the engine spends token allowances as. Debtors approve this
    /// principal before settling with tokens.
    pub service_principal: PrincipalId,
    /// How native overpayments are handled.
    pub overpayment: OverpaymentPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_principal: PrincipalId::new(),
            overpayment: OverpaymentPolicy::Refund,
        }
    }
}

impl EngineConfig {
    /// Read from `SPLITLEDGER_*` environment variables, defaulting what is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`EngineConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SERVICE_PRINCIPAL) {
            config.service_principal = raw.parse().map_err(|e: splitledger_core::IdParseError| {
                ConfigError::Invalid {
                    var: ENV_SERVICE_PRINCIPAL,
                    reason: e.to_string(),
                }
            })?;
        } else {
            tracing::warn!("{ENV_SERVICE_PRINCIPAL} not set; using a random service principal");
        }

        if let Some(raw) = lookup(ENV_OVERPAYMENT) {
            config.overpayment =
                raw.parse()
                    .map_err(|e: splitledger_ledger::UnknownPolicy| ConfigError::Invalid {
                        var: ENV_OVERPAYMENT,
                        reason: e.to_string(),
                    })?;
        }

        Ok(config)
    }
}
