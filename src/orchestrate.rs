//! Orchestration (C9, §4.9): alternates learning passes with search passes
//! and emits results through a `ResultSink`. Also home to the `ResultSink`
//! trait and a convenience `StdoutSink` (§6, "Result sink (consumed)").

use std::fmt::Debug;
use std::hash::Hash;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::backprop::backpropagate;
use crate::config::{InferOptions, OutputFormat};
use crate::driver::run_learning;
use crate::error::Result;
use crate::program::{Checkpoint, Frame, ProgramState};
use crate::search::SearchStream;

/// Where `infer_map` sends its results. Decoupled from `V`/`S` via dynamic
/// dispatch on `&dyn Debug` so one sink implementation serves every program
/// (§6: "output formatting ... assumed to exist").
pub trait ResultSink {
    /// Emit one named predict: a site value, or the synthetic `$trace`.
    fn emit_predict(
        &mut self,
        name: &str,
        value: &dyn Debug,
        weight: f64,
        format: OutputFormat,
    ) -> Result<()>;
}

/// Emits a terminal frame through `sink`, honoring `options.results` (§6:
/// `emit_predicts`). Per-site predicts are named after their `SiteId`'s
/// `Display`; the full choice sequence is emitted once under `$trace` with
/// weight `exp(state.log_weight())`.
pub fn emit_predicts<V, S>(
    sink: &mut dyn ResultSink,
    frame: &Frame<V, S>,
    options: &InferOptions,
) -> Result<()>
where
    V: Debug,
    S: ProgramState,
{
    let weight = frame.log_weight().exp();
    if options.results.predicts {
        for entry in frame.trace.iter() {
            sink.emit_predict(&entry.site.to_string(), &entry.value, weight, options.output_format)?;
        }
    }
    if options.results.trace {
        let values: Vec<&V> = frame.trace.iter().map(|entry| &entry.value).collect();
        sink.emit_predict("$trace", &values, weight, options.output_format)?;
    }
    Ok(())
}

/// A `ResultSink` that writes one line per predict to stdout. Provided for
/// the demo binary and for tests; a real deployment is expected to bring
/// its own sink (§6: "assumed to exist").
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn emit_predict(
        &mut self,
        name: &str,
        value: &dyn Debug,
        weight: f64,
        format: OutputFormat,
    ) -> Result<()> {
        match format {
            OutputFormat::Json => {
                println!("{{\"name\":{name:?},\"value\":\"{value:?}\",\"weight\":{weight}}}")
            }
            OutputFormat::Text => println!("{name} = {value:?} ({weight})"),
        }
        Ok(())
    }
}

/// One pass's worth of learning (§4.9 step 2): runs `program` `samples`
/// times starting from `begin`, backpropagating after every run whose
/// terminal log-weight is not `NaN` and otherwise discarding the run and
/// carrying the previous `begin` forward unchanged (§4.5, §7 `InvalidTrace`).
///
/// Factored out of `infer_map` so the discard rule can be exercised and
/// inspected directly in tests, without needing a `ResultSink` or a full
/// pass/search round-trip.
fn run_learning_pass<V, S>(
    program: &impl Fn(Frame<V, S>) -> Checkpoint<V, S>,
    mut begin: Frame<V, S>,
    samples: usize,
    rng: &mut SmallRng,
) -> Frame<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    for run in 0..samples {
        let checkpoint = program(begin.clone());
        let end = run_learning(checkpoint, rng);
        if end.log_weight().is_nan() {
            log::debug!("run {run}: NaN log-weight, discarding");
            continue;
        }
        begin = backpropagate(end);
    }
    begin
}

/// The inference entry point (§6): `program` is called once per learning
/// run and once per search pass, each time with the current `begin_state`
/// as its starting frame. It must be a pure function of that frame — the
/// driver and search engine both rely on being able to call it repeatedly
/// with independent frames.
pub fn infer_map<V, S>(
    program: impl Fn(Frame<V, S>) -> Checkpoint<V, S>,
    options: &InferOptions,
    sink: &mut dyn ResultSink,
) -> Result<()>
where
    V: Clone + Eq + Hash + Debug,
    S: ProgramState,
{
    options.validate()?;
    let mut rng = SmallRng::from_os_rng();

    for pass in 0..options.number_of_passes {
        log::debug!("pass {pass}: learning for {} runs", options.number_of_samples);
        let begin = run_learning_pass(&program, Frame::new(), options.number_of_samples, &mut rng);

        log::debug!(
            "pass {pass}: searching with {} bandits, K = {}",
            begin.bandits.len(),
            options.number_of_h_draws
        );
        let search_rng = rng.clone();
        let start = program(begin.clone());
        let stream = SearchStream::new(start, options.number_of_h_draws, search_rng);

        let mut emitted = 0usize;
        for frame in stream.take(options.number_of_maps) {
            emit_predicts(sink, &frame, options)?;
            emitted += 1;
        }
        if emitted < options.number_of_maps {
            log::debug!(
                "pass {pass}: search exhausted after {emitted}/{} MAP estimates",
                options.number_of_maps
            );
        }
    }

    Ok(())
}
