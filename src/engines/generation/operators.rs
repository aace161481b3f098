use crate::engines::generation::genome::Genotype;
use rand::Rng;

/// Rank-based roulette over a population sorted by ascending fitness
///
/// The individual at position `i` has weight `i + 1`, so the worst is drawn with
/// probability `1 / (n(n+1)/2)` and the best with `n / (n(n+1)/2)`. Returns an index.
pub fn rank_selection<R: Rng + ?Sized>(population_size: usize, rng: &mut R) -> usize {
    if population_size <= 1 {
        return 0;
    }
    let total = (population_size * (population_size + 1) / 2) as f64;
    let draw = rng.gen::<f64>();

    let mut cumulative = 0.0;
    for rank in 1..=population_size {
        cumulative += rank as f64 / total;
        if cumulative > draw {
            return rank - 1;
        }
    }
    // rounding left the sum just under the draw
    population_size - 1
}

/// Single-point crossover over the flattened gene list
pub fn crossover<G: Genotype, R: Rng + ?Sized>(parent1: &G, parent2: &G, rng: &mut R) -> (G, G) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    let len = parent1.gene_count().min(parent2.gene_count());
    if len <= 1 {
        return (child1, child2);
    }

    let point = rng.gen_range(1..len);
    for i in point..len {
        if let (Some(a), Some(b)) = (child1.gene_mut(i), child2.gene_mut(i)) {
            std::mem::swap(a, b);
        }
    }

    (child1, child2)
}

/// Fitness-adaptive per-gene mutation probability
///
/// Individuals at or below the population average mutate at the base rate; fitter
/// ones are scaled down linearly until the best never mutates.
pub fn mutation_probability(base: f64, fitness: f64, average: f64, max: f64) -> f64 {
    if fitness <= average || max <= average {
        base
    } else {
        (base * (max - fitness) / (max - average)).max(0.0)
    }
}

/// Re-randomize each gene with the given probability; returns whether any gene was drawn
pub fn mutate<G: Genotype, R: Rng + ?Sized>(genotype: &mut G, probability: f64, rng: &mut R) -> bool {
    let mut mutated = false;
    for i in 0..genotype.gene_count() {
        if rng.gen::<f64>() < probability {
            if let Some(gene) = genotype.gene_mut(i) {
                gene.randomize(rng);
                mutated = true;
            }
        }
    }
    mutated
}
