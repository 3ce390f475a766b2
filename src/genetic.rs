use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::distance::path_distance;
use crate::error::{Error, Result};
use crate::problem::{CitySet, Route};
use crate::solver::{Method, RouteSolver, Solution, Trace};

/// Lower bound on a tour length when turning it into a fitness value.
const MIN_DISTANCE: f64 = f64::EPSILON;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneticAlgorithm {
    pub population_size: usize,
    /// Best individuals carried into the next generation through selection and breeding.
    pub elite_size: usize,
    /// Per-position probability of a swap mutation.
    pub mutation_rate: f64,
    pub generations: usize,
}

impl Default for GeneticAlgorithm {
    fn default() -> Self {
        Self {
            population_size: 10,
            elite_size: 5,
            mutation_rate: 0.01,
            generations: 500,
        }
    }
}

/// Population index and fitness, best first.
type Ranking = Vec<(usize, f64)>;

impl RouteSolver for GeneticAlgorithm {
    const METHOD: Method = Method::GeneticAlgorithm;

    fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(Error::invalid_parameter("population_size", "must be at least 1"));
        }
        if self.elite_size > self.population_size {
            return Err(Error::invalid_parameter(
                "elite_size",
                format!(
                    "must not exceed population_size ({} > {})",
                    self.elite_size, self.population_size
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::invalid_parameter(
                "mutation_rate",
                format!("must be in [0, 1], got {}", self.mutation_rate),
            ));
        }
        Ok(())
    }

    fn run<R: Rng>(&self, cities: &CitySet, rng: &mut R) -> Result<Solution> {
        self.check(cities)?;
        let identity = cities.identity_route();
        let mut trace = Trace::with_capacity(self.generations + 1);
        trace.push(0, identity.clone(), path_distance(cities, &identity));

        let mut population = self.initialize_population(cities, rng);

        for generation in 1..=self.generations {
            population = self.evolve(cities, &population, rng)?;

            let Some(&(best_idx, _)) = rank_routes(cities, &population).first() else {
                return Err(Error::invalid_parameter("population_size", "population is empty"));
            };
            let best = population[best_idx].clone();
            let distance = path_distance(cities, &best);
            log::debug!("generation {generation}: best distance {distance:.4}");
            trace.push(generation, best, distance);
        }

        Ok(Solution::completed(trace))
    }
}

impl GeneticAlgorithm {
    fn initialize_population<R: Rng>(&self, cities: &CitySet, rng: &mut R) -> Vec<Route> {
        (0..self.population_size)
            .map(|_| cities.random_route(rng))
            .collect()
    }

    /// Rank, select, mate, breed and mutate into a fresh population.
    fn evolve<R: Rng>(
        &self,
        cities: &CitySet,
        population: &[Route],
        rng: &mut R,
    ) -> Result<Vec<Route>> {
        let ranked = rank_routes(cities, population);
        let selection = self.selection(&ranked, rng)?;
        let mating_pool: Vec<Route> = selection
            .into_iter()
            .map(|idx| population[idx].clone())
            .collect();

        let mut children = self.breed_population(&mating_pool, rng);
        for child in children.iter_mut() {
            self.mutate(child, rng);
        }
        Ok(children)
    }

    /// Elites first, then roulette picks over the whole ranking.
    fn selection<R: Rng>(&self, ranked: &Ranking, rng: &mut R) -> Result<Vec<usize>> {
        let mut selected: Vec<usize> = ranked
            .iter()
            .take(self.elite_size)
            .map(|&(idx, _)| idx)
            .collect();

        let remaining = ranked.len().saturating_sub(self.elite_size);
        if remaining > 0 {
            let wheel: WeightedIndex<f64> =
                WeightedIndex::new(ranked.iter().map(|&(_, fitness)| fitness))?;
            selected.extend((0..remaining).map(|_| ranked[wheel.sample(rng)].0));
        }
        Ok(selected)
    }

    fn breed_population<R: Rng>(&self, mating_pool: &[Route], rng: &mut R) -> Vec<Route> {
        let len = mating_pool.len();
        let mut pool = mating_pool.to_vec();
        pool.shuffle(rng);

        let mut children: Vec<Route> = mating_pool.iter().take(self.elite_size).cloned().collect();
        for i in 0..len.saturating_sub(self.elite_size) {
            children.push(self.crossover(&pool[i], &pool[len - i - 1], rng));
        }
        children
    }

    /// Ordered crossover: a random slice of `parent1`, followed by the
    /// remaining cities in `parent2` order.
    fn crossover<R: Rng>(&self, parent1: &[usize], parent2: &[usize], rng: &mut R) -> Route {
        let len = parent1.len();
        let gene_a = rng.gen_range(0..len);
        let gene_b = rng.gen_range(0..len);
        let (start, end) = (gene_a.min(gene_b), gene_a.max(gene_b));

        let mut taken = vec![false; len];
        let mut child = Vec::with_capacity(len);
        for &city in &parent1[start..end] {
            taken[city] = true;
            child.push(city);
        }
        child.extend(parent2.iter().copied().filter(|&city| !taken[city]));
        child
    }

    /// Every position independently gets a chance to swap with a random position.
    fn mutate<R: Rng>(&self, individual: &mut [usize], rng: &mut R) {
        let len = individual.len();
        for swapped in 0..len {
            if rng.gen::<f64>() < self.mutation_rate {
                let swap_with = rng.gen_range(0..len);
                individual.swap(swapped, swap_with);
            }
        }
    }
}

/// Fitness is the inverse tour length; ties keep population order.
fn rank_routes(cities: &CitySet, population: &[Route]) -> Ranking {
    let mut ranked: Ranking = population
        .iter()
        .enumerate()
        .map(|(idx, route)| (idx, 1.0 / path_distance(cities, route).max(MIN_DISTANCE)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
