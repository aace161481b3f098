use anyhow::{bail, Context, Result};
use sensevolve::config::AppConfig;
use sensevolve::data::{ConllCorpusReader, CorpusReader, Focus};
use sensevolve::engines::metrics::ClassificationReport;
use sensevolve::engines::training::EvolutionaryTrainer;
use sensevolve::functions::SearchSpace;
use sensevolve::ml::models::{AveragedPerceptron, Classifier};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const USAGE: &str = "usage: sensevolve <config.toml> <train.conll> <model.json> [test.conll]";

fn read_corpus(path: &Path) -> Result<Vec<Focus>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let instances = ConllCorpusReader::new()
        .read_instances(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    log::info!("Read {} instances from {}", instances.len(), path.display());
    Ok(instances)
}

fn load_space(config: &AppConfig) -> Result<SearchSpace> {
    match &config.search.space_file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse search space {}", path.display()))
        }
        None => Ok(SearchSpace::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        bail!(USAGE);
    }

    let config = AppConfig::load_from_file(&args[0]).context("Failed to load configuration")?;
    let train = read_corpus(Path::new(&args[1]))?;
    let test = match args.get(3) {
        Some(path) => read_corpus(Path::new(path))?,
        None => Vec::new(),
    };

    let mut trainer = EvolutionaryTrainer::<AveragedPerceptron>::new(&config, load_space(&config)?)?;
    trainer.train(&train, &[]).context("Architecture search failed")?;
    if let (Some(candidate), Some(fitness)) = (trainer.best_candidate(), trainer.best_fitness()) {
        log::info!("Selected pipeline (cross-validated F={:.4}): {}", fitness, candidate);
    }

    let model_path = Path::new(&args[2]);
    let file = File::create(model_path).with_context(|| format!("Failed to create {}", model_path.display()))?;
    trainer
        .save(&mut BufWriter::new(file))
        .with_context(|| format!("Failed to save model to {}", model_path.display()))?;
    log::info!("Saved model to {}", model_path.display());

    if !test.is_empty() {
        let mut pairs = Vec::with_capacity(test.len());
        for instance in &test {
            pairs.push((trainer.classify(instance)?, instance.label().unwrap_or_default()));
        }
        let report = ClassificationReport::from_pairs(&pairs, config.validation.beta);
        for (label, scores) in &report.per_label {
            log::info!(
                "{:<20} P={:.4} R={:.4} F={:.4}",
                label,
                scores.precision,
                scores.recall,
                scores.f_score
            );
        }
        log::info!(
            "Test: {} instances, F={:.4}, macro F={:.4}",
            report.total,
            report.f_score,
            report.macro_f_score
        );
    }

    Ok(())
}
