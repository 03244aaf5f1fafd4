//! Explain command - print compiled routing tables

use std::fmt::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use sigroute_config::{Config, RouteContext, RoutingConfig};
use sigroute_protocol::{Logs, Metrics, SignalKind, Traces};
use sigroute_routing::{AttributeEvaluator, PipelineId, RoutableSignal, SignalRouter};

/// Compile every configured signal and print its table
pub fn run(config: &Config) -> Result<()> {
    print!("{}", explain(config)?);
    Ok(())
}

/// Render the compiled tables of every configured signal
pub fn explain(config: &Config) -> Result<String> {
    let evaluator = Arc::new(AttributeEvaluator::new());
    let mut out = String::new();

    for (signal, routing) in config.signals() {
        let table = match signal {
            SignalKind::Traces => compile::<Traces>(routing, &evaluator),
            SignalKind::Metrics => compile::<Metrics>(routing, &evaluator),
            SignalKind::Logs => compile::<Logs>(routing, &evaluator),
        }
        .with_context(|| format!("[{signal}] routing table does not compile"))?;
        out.push_str(&table);
    }

    Ok(out)
}

fn compile<T: RoutableSignal>(
    routing: &RoutingConfig,
    evaluator: &Arc<AttributeEvaluator>,
) -> Result<String> {
    let router = SignalRouter::<T, _>::build(routing, Arc::clone(evaluator))?;
    Ok(render(&router))
}

fn render<T: RoutableSignal>(router: &SignalRouter<T, AttributeEvaluator>) -> String {
    let registry = router.registry();
    let names = |ids: &[PipelineId]| {
        ids.iter()
            .map(|id| registry.name(*id).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] match_once = {}, error_mode = {}, {} route(s), {} pipeline(s)",
        T::KIND,
        router.match_once(),
        router.error_mode(),
        router.routes().len(),
        registry.len(),
    );

    for route in router.routes() {
        let context = match route.context {
            RouteContext::Unspecified => "request*",
            context => context.as_str(),
        };
        let _ = writeln!(
            out,
            "  #{:<3} {:<10} {}  ->  {}",
            route.index,
            context,
            route.predicate,
            names(&route.pipelines),
        );
    }

    let defaults = router.default_pipelines();
    if defaults.is_empty() {
        let _ = writeln!(out, "  default         unmatched data is dropped");
    } else {
        let _ = writeln!(out, "  default         ->  {}", names(defaults));
    }

    out
}
