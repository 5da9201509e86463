//! A tiny CLI exercising [`pmap::infer_map`] over one of two bundled toy
//! programs. The probabilistic-programming front-end (parser, CPS
//! transform, distribution library) is out of scope for this crate — this
//! binary plays that role by hand, just enough to drive the public API.

use clap::Parser;
use clap::ValueEnum;
use rand::Rng;
use rand::rngs::SmallRng;

use pmap::{Checkpoint, Distribution, Frame, InferOptions, OutputFormat, ProgramState, Reward};

#[derive(Parser)]
#[command(name = "pmap-demo", about = "Run MAP inference over a bundled toy program")]
struct Args {
    #[arg(value_enum, default_value = "coin")]
    demo: DemoArg,

    #[arg(long, default_value_t = 1)]
    passes: usize,

    #[arg(long, default_value_t = 200)]
    samples: usize,

    #[arg(long, default_value_t = 1)]
    maps: usize,

    #[arg(long, default_value_t = 1)]
    h_draws: i64,

    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoArg {
    Coin,
    Normal,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Clone, Default)]
struct Weight(Reward);

impl ProgramState for Weight {
    fn log_weight(&self) -> Reward {
        self.0
    }
    fn add_log_weight(&mut self, delta: Reward) {
        self.0 += delta;
    }
}

struct Coin;
impl Distribution<bool> for Coin {
    fn sample(&self, rng: &mut SmallRng) -> bool {
        rng.random_bool(0.5)
    }
    fn log_density(&self, value: &bool) -> Reward {
        if *value { 0.7f64.ln() } else { 0.3f64.ln() }
    }
}

fn coin_program(frame: Frame<bool, Weight>) -> Checkpoint<bool, Weight> {
    Checkpoint::sample(Coin, "flip", frame, |_value, frame| Checkpoint::result(frame))
}

/// A discretized standard normal: a handful of candidate values spanning a
/// plausible range, rather than a continuous draw, so the bandit's arm map
/// stays small enough for a demo run to converge quickly.
struct DiscretizedNormal {
    candidates: Vec<ordered_float::OrderedFloat<f64>>,
}

impl Distribution<ordered_float::OrderedFloat<f64>> for DiscretizedNormal {
    fn sample(&self, rng: &mut SmallRng) -> ordered_float::OrderedFloat<f64> {
        let idx = rng.random_range(0..self.candidates.len());
        self.candidates[idx]
    }
    fn log_density(&self, value: &ordered_float::OrderedFloat<f64>) -> Reward {
        let x = value.into_inner();
        -0.5 * x * x - 0.5 * (2.0 * std::f64::consts::PI).ln()
    }
}

fn normal_program(
    frame: Frame<ordered_float::OrderedFloat<f64>, Weight>,
) -> Checkpoint<ordered_float::OrderedFloat<f64>, Weight> {
    let candidates = (-40..=40)
        .map(|i| ordered_float::OrderedFloat(i as f64 * 0.2))
        .collect();
    Checkpoint::sample(DiscretizedNormal { candidates }, "x", frame, |value, mut frame| {
        let x = value.into_inner();
        let observation = -(x - 3.0) * (x - 3.0);
        frame.add_log_weight(observation);
        Checkpoint::result(frame)
    })
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let options = InferOptions {
        number_of_passes: args.passes,
        number_of_samples: args.samples,
        number_of_maps: args.maps,
        number_of_h_draws: args.h_draws,
        output_format: match args.format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        },
        ..InferOptions::default()
    };

    let mut sink = pmap::StdoutSink;
    let result = match args.demo {
        DemoArg::Coin => pmap::infer_map(coin_program, &options, &mut sink),
        DemoArg::Normal => pmap::infer_map(normal_program, &options, &mut sink),
    };
    if let Err(error) = result {
        eprintln!("pmap-demo: {error}");
        std::process::exit(1);
    }
}
