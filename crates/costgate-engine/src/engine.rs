//! GovernanceEngine: the per-process facade tying the decorated schema, the
//! license state and the generated validation passes together.

use std::sync::Arc;

use costgate_core::config::{GovernanceLimits, LimitOverrides};
use costgate_core::errors::error_code;
use costgate_core::licensing::current_unix_millis;
use costgate_core::telemetry::NoopCostObserver;
use costgate_core::{ConfigError, CostObserver, GovernanceConfig, GovernanceState, LicenseGate};
use tracing::{debug, info};

use crate::routing::PoolRouter;
use crate::schema::{DecoratedSchema, SchemaModel};
use crate::validation::{
    check_batch_size, generate_rules, select_operation, BatchError, OperationRequest, RuleContext, RuleReport,
    ValidationError, ValidationOutcome, ValidationRule,
};

/// Built once at startup and shared read-only by every request thread.
pub struct GovernanceEngine {
    schema: Arc<DecoratedSchema>,
    limits: GovernanceLimits,
    state: GovernanceState,
    observer: Arc<dyn CostObserver>,
    rules: Vec<Box<dyn ValidationRule>>,
    /// False when the configuration names no read-only connection target.
    replica_enabled: bool,
}

impl GovernanceEngine {
    pub fn new(schema: Arc<DecoratedSchema>, limits: GovernanceLimits, state: GovernanceState) -> Self {
        let observer: Arc<dyn CostObserver> = Arc::new(NoopCostObserver);
        let rules = generate_rules(&limits, Arc::clone(&observer));
        Self {
            schema,
            limits,
            state,
            observer,
            rules,
            replica_enabled: true,
        }
    }

    /// Validate the configuration, decorate the schema and check the license.
    /// Configuration errors abort; license problems only disable protections.
    pub fn from_config(model: &SchemaModel, config: &GovernanceConfig) -> Result<Self, ConfigError> {
        Self::from_config_with(model, config, &LicenseGate::new(), current_unix_millis())
    }

    /// `from_config` with an explicit license gate and clock (epoch milliseconds).
    pub fn from_config_with(
        model: &SchemaModel,
        config: &GovernanceConfig,
        gate: &LicenseGate,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        let limits = config.validate()?;
        let schema = model.decorate(limits.default_pagination_cap)?;
        let state = GovernanceState::establish_with(gate, config.resolve_license_key().as_deref(), now_ms);
        info!(
            protections_active = state.protections_active(),
            pagination_cap = %limits.default_pagination_cap,
            depth_limit = %limits.depth,
            cost_limit = %limits.cost,
            batch_limit = %limits.batch,
            replica = config.replica_configured(),
            "governance engine ready"
        );
        let mut engine = Self::new(schema, limits, state);
        engine.replica_enabled = config.replica_configured();
        Ok(engine)
    }

    /// Report computed costs to `observer` instead of dropping them.
    pub fn with_observer(mut self, observer: Arc<dyn CostObserver>) -> Self {
        self.rules = generate_rules(&self.limits, Arc::clone(&observer));
        self.observer = observer;
        self
    }

    pub fn schema(&self) -> &Arc<DecoratedSchema> {
        &self.schema
    }

    pub fn limits(&self) -> &GovernanceLimits {
        &self.limits
    }

    pub fn state(&self) -> &GovernanceState {
        &self.state
    }

    pub fn observer(&self) -> &Arc<dyn CostObserver> {
        &self.observer
    }

    /// Run every pass against one operation. Passes never stop one another, so
    /// all violations are reported together.
    pub fn validate_operation(&self, request: &OperationRequest<'_>) -> ValidationOutcome {
        self.run_rules(request, &self.rules)
    }

    /// Validate with per-request limits layered over the configured ones.
    /// Passes are rebuilt only when the merged limits differ. Overrides are
    /// ignored while protections are inactive.
    pub fn validate_operation_with(&self, request: &OperationRequest<'_>, overrides: &LimitOverrides) -> ValidationOutcome {
        if overrides.is_empty() || !self.state.protections_active() {
            return self.validate_operation(request);
        }
        let merged = overrides.apply(&self.limits);
        if merged == self.limits {
            return self.validate_operation(request);
        }
        debug!(
            pagination_cap = %merged.default_pagination_cap,
            depth_limit = %merged.depth,
            cost_limit = %merged.cost,
            "validating with request overrides"
        );
        let rules = generate_rules(&merged, Arc::clone(&self.observer));
        self.run_rules(request, &rules)
    }

    fn run_rules(&self, request: &OperationRequest<'_>, rules: &[Box<dyn ValidationRule>]) -> ValidationOutcome {
        if !self.state.protections_active() {
            return ValidationOutcome::default();
        }

        let Some((_, operation)) = select_operation(request.document, request.operation_name) else {
            let message = match request.operation_name {
                Some(name) => format!("unknown operation named `{name}`"),
                None => "operation name is required when the document contains several operations".to_string(),
            };
            return ValidationOutcome {
                errors: vec![ValidationError::new(error_code::OPERATION_NOT_FOUND, message)],
                computed_cost: None,
                protections_active: true,
            };
        };

        let ctx = RuleContext {
            schema: &self.schema,
            document: request.document,
            operation,
            operation_name: request.operation_name,
            variables: request.variables,
        };
        let mut report = RuleReport::default();
        for rule in rules {
            let before = report.errors.len();
            rule.check(&ctx, &mut report);
            if report.errors.len() > before {
                debug!(rule = rule.name(), errors = report.errors.len() - before, "validation pass rejected operation");
            }
        }

        ValidationOutcome {
            errors: report.errors,
            computed_cost: report.computed_cost,
            protections_active: true,
        }
    }

    /// Validate a batched request. The size guard runs first and applies whether
    /// or not protections are active; a failure rejects the whole batch.
    pub fn validate_batch(&self, requests: &[OperationRequest<'_>]) -> Result<Vec<ValidationOutcome>, BatchError> {
        check_batch_size(requests.len(), self.limits.batch)?;
        Ok(requests.iter().map(|request| self.validate_operation(request)).collect())
    }

    /// Pool router for this process. The replica is dropped unless a read-only
    /// connection target is configured and protections are active.
    pub fn router<P>(&self, primary: P, replica: Option<P>) -> PoolRouter<P> {
        let use_replica = self.replica_enabled && self.state.protections_active();
        PoolRouter::new(primary, replica.filter(|_| use_replica))
    }
}

impl std::fmt::Debug for GovernanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceEngine")
            .field("limits", &self.limits)
            .field("state", &self.state)
            .field("replica_enabled", &self.replica_enabled)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}
