use crate::engines::generation::genome::Genotype;

/// Top individuals of the best generation seen so far
///
/// Refreshed only from a generation that raised the best-ever fitness, so its
/// members are always evaluated and never worse than anything seen before.
#[derive(Debug, Clone)]
pub struct HallOfFame<G> {
    elites: Vec<G>,
    max_size: usize,
}

impl<G: Genotype> HallOfFame<G> {
    /// Always keeps at least one individual so the best of run survives
    pub fn new(max_size: usize) -> Self {
        Self {
            elites: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Replace the elites with the top of `sorted`, which is ordered by ascending fitness
    pub fn update(&mut self, sorted: &[G]) {
        self.elites = sorted.iter().rev().take(self.max_size).cloned().collect();
    }

    pub fn best(&self) -> Option<&G> {
        self.elites.first()
    }

    pub fn best_fitness(&self) -> f64 {
        self.best().map(|g| g.fitness()).unwrap_or(f64::NEG_INFINITY)
    }

    /// Best first
    pub fn elites(&self) -> &[G] {
        &self.elites
    }

    pub fn len(&self) -> usize {
        self.elites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elites.is_empty()
    }
}
