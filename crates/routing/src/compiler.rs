//! Route compiler
//!
//! Turns a validated `RoutingConfig` into compiled routes: statement sugar
//! is resolved into its condition, the condition is compiled by the
//! evaluator for the route's context, and pipeline names become
//! `PipelineId`s. Compilation happens once, at startup or reload.

use sigroute_config::{ConfigError, RouteContext, RouteSpec, RoutingConfig, validate_routing};

use crate::error::{Result, RoutingError};
use crate::evaluator::ConditionEvaluator;
use crate::registry::PipelineRegistry;
use crate::statement::statement_condition;
use crate::PipelineId;

/// A route ready for evaluation
#[derive(Debug, Clone)]
pub struct CompiledRoute<P> {
    /// Position in the routing table
    pub index: usize,
    /// Context as configured
    pub context: RouteContext,
    /// Canonical condition text
    pub condition: String,
    /// Compiled predicate
    pub predicate: P,
    /// Destinations, deduplicated, in configured order
    pub pipelines: Vec<PipelineId>,
}

impl<P> CompiledRoute<P> {
    /// Context the predicate is evaluated in
    #[inline]
    pub fn effective_context(&self) -> RouteContext {
        self.context.effective()
    }
}

/// Output of compiling one routing table
#[derive(Debug, Clone)]
pub struct CompiledTable<P> {
    pub routes: Vec<CompiledRoute<P>>,
    pub default_pipelines: Vec<PipelineId>,
    pub registry: PipelineRegistry,
}

/// Compiles routing tables with a condition evaluator
pub struct RouteCompiler<'e, E> {
    evaluator: &'e E,
}

impl<'e, E: ConditionEvaluator> RouteCompiler<'e, E> {
    #[inline]
    pub fn new(evaluator: &'e E) -> Self {
        Self { evaluator }
    }

    /// Validate and compile a routing table
    ///
    /// Routes keep table order. Default pipelines are registered first, then
    /// each route's pipelines in order.
    pub fn compile(&self, config: &RoutingConfig) -> Result<CompiledTable<E::Predicate>> {
        validate_routing(config)?;

        let mut registry = PipelineRegistry::new();
        let default_pipelines = registry.register_all(&config.default_pipelines)?;

        let routes = config
            .table
            .iter()
            .enumerate()
            .map(|(index, spec)| self.compile_route(index, spec, &mut registry))
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledTable {
            routes,
            default_pipelines,
            registry,
        })
    }

    fn compile_route(
        &self,
        index: usize,
        spec: &RouteSpec,
        registry: &mut PipelineRegistry,
    ) -> Result<CompiledRoute<E::Predicate>> {
        let context = spec.parsed_context()?;
        let condition = canonical_condition(index, spec)?;

        let predicate = self
            .evaluator
            .compile(&condition, context.effective())
            .map_err(|e| RoutingError::predicate_compile(index, &condition, e.message()))?;

        let pipelines = registry.register_all(&spec.pipelines)?;

        tracing::debug!(
            route_index = index,
            context = %context.effective(),
            condition = %condition,
            pipelines = ?spec.pipelines,
            "compiled route"
        );

        Ok(CompiledRoute {
            index,
            context,
            condition,
            predicate,
            pipelines,
        })
    }
}

/// The condition a route evaluates, with statement sugar removed
pub fn canonical_condition(index: usize, spec: &RouteSpec) -> Result<String> {
    match (spec.condition(), spec.statement()) {
        (Some(condition), None) => Ok(condition.trim().to_string()),
        (None, Some(statement)) => statement_condition(statement)
            .map(str::to_string)
            .ok_or_else(|| RoutingError::invalid_statement(index, statement)),
        (Some(_), Some(_)) => Err(ConfigError::AmbiguousPredicate.into()),
        (None, None) => Err(ConfigError::NoPredicate.into()),
    }
}
