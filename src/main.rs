use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tsp_opt::config::Parameters;
use tsp_opt::highscore::HighscoreStore;
use tsp_opt::logging::{init_logger, LogLevel};
use tsp_opt::report::Report;
use tsp_opt::topology::{self, Topology};
use tsp_opt::{solve, Result, Termination};

#[derive(Parser)]
#[command(about = "Explore traveling salesman routes with 2-opt, a genetic algorithm or a self-organizing map")]
struct Args {
    /// city layout
    #[arg(long, value_enum, default_value_t = Topology::Circle)]
    topology: Topology,

    /// number of cities
    #[arg(long, default_value_t = 5)]
    nodes: usize,

    /// circle radius (circle topology)
    #[arg(long, default_value_t = 1.0)]
    radius: f64,

    /// topology seed (random topology)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// RNG seed for the solver
    #[arg(long, default_value_t = 0)]
    rng_seed: u64,

    /// 0 = 2-opt, 1 = genetic algorithm, 2 = self-organizing map
    #[arg(long, default_value_t = 0)]
    method: u8,

    /// minimum relative improvement per 2-opt pass
    #[arg(long, default_value_t = 0.001)]
    improvement_threshold: f64,

    /// population size (GA) or number of neurons (SOM)
    #[arg(long)]
    pop_size: Option<usize>,

    /// elite size (GA)
    #[arg(long, default_value_t = 5)]
    elite_size: usize,

    /// per-position swap probability (GA)
    #[arg(long, default_value_t = 0.01)]
    mutation_rate: f64,

    /// number of generations / iterations (GA, SOM)
    #[arg(long, default_value_t = 500)]
    generations: usize,

    /// neuron displacement factor (SOM)
    #[arg(long, default_value_t = 0.8)]
    learning_rate: f64,

    /// per-iteration decay of learning rate and radius (SOM)
    #[arg(long, default_value_t = 0.0003)]
    decay: f64,

    /// JSON parameter file, replaces all solver flags above
    #[arg(long)]
    params: Option<PathBuf>,

    /// JSON file holding the best distance per topology
    #[arg(long)]
    highscores: Option<PathBuf>,

    /// report output path, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

impl Args {
    fn parameters(&self) -> Result<Parameters> {
        if let Some(path) = &self.params {
            return Parameters::from_file(path);
        }
        Ok(Parameters {
            method: self.method,
            improvement_threshold: self.improvement_threshold,
            pop_size: self.pop_size,
            elite_size: self.elite_size,
            mutation_rate: self.mutation_rate,
            generations: self.generations,
            learning_rate: self.learning_rate,
            decay: self.decay,
        })
    }
}

fn run(args: &Args) -> Result<()> {
    let cities = match args.topology {
        Topology::Circle => topology::circle(args.radius, args.nodes)?,
        Topology::Random => topology::random(args.nodes, args.seed)?,
    };
    let config = args.parameters()?.into_config()?;
    let method = config.method();

    let start_time = std::time::Instant::now();
    let mut rng = StdRng::seed_from_u64(args.rng_seed);
    let solution = solve(&cities, &config, &mut rng)?;
    log::info!(
        "{method} finished in {:.2}s",
        start_time.elapsed().as_secs_f32()
    );

    if let Termination::Decayed { iteration, cause } = solution.termination {
        log::warn!("{method} stopped early at iteration {iteration}: {cause}");
    }

    let mut report = Report::new(method, &cities, &solution);
    if let Some(path) = &args.highscores {
        let mut store = HighscoreStore::load(path)?;
        if let Some(best) = store.record_solution(&cities, &solution) {
            store.save(path)?;
            report = report.with_highscore(best);
        }
    }

    report.write(args.output.as_deref())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.log_level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
