//! Engine configuration.

/// Tunables for one engine instance.
///
/// The defaults match the production deployment; tests and the CLI
/// override individual fields with the builder methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Half-width, in months, of the window searched for additional
    /// costs and credit notes around a purchase date.
    pub cost_window_months: u32,
    /// Name of the financial-ledger account COGS postings debit.
    pub cogs_account_name: String,
    /// Agent id stamped on every record this engine creates or updates.
    pub agent_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cost_window_months: 3,
            cogs_account_name: "Cost of goods sold".to_string(),
            agent_id: "lotledger".to_string(),
        }
    }
}

impl Config {
    /// Set the additional-cost search window half-width.
    #[must_use]
    pub const fn with_cost_window_months(mut self, months: u32) -> Self {
        self.cost_window_months = months;
        self
    }

    /// Set the COGS account name.
    #[must_use]
    pub fn with_cogs_account(mut self, name: impl Into<String>) -> Self {
        self.cogs_account_name = name.into();
        self
    }

    /// Set the agent id.
    #[must_use]
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }
}
