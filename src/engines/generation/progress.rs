use super::evolution_engine::{GenerationStats, ProgressCallback};

/// Reports every generation through the `log` facade
#[derive(Debug, Default)]
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, epoch: usize) {
        log::debug!("Generation {} starting...", epoch + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::info!(
            "Generation {} complete. Best fitness: {:.4} (generation {:.4}, average {:.4}), {} evaluated, no improvement for {} epoch(s)",
            stats.epoch + 1,
            stats.best,
            stats.generation_best,
            stats.average,
            stats.evaluated,
            stats.epochs_no_change
        );
    }
}

/// Keeps every generation's statistics in memory
#[derive(Debug, Default)]
pub struct HistoryProgressCallback {
    pub history: Vec<GenerationStats>,
}

impl ProgressCallback for HistoryProgressCallback {
    fn on_generation_start(&mut self, _epoch: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        self.history.push(stats.clone());
    }
}
