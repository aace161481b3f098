use super::focus::Focus;
use super::instance::Instance;
use super::sequence::Sequence;
use crate::error::{Result, SensevolveError};
use crate::types::{FeatureKey, FeatureValue};
use std::io::{BufRead, Write};
use std::sync::Arc;

pub trait CorpusReader {
    fn read_instances(&self, input: &mut dyn BufRead) -> Result<Vec<Focus>>;
    fn write_instances(&self, instances: &[Focus], output: &mut dyn Write) -> Result<()>;
}

const EMPTY: &str = "_";
const COLUMNS: usize = 7;

/// Tab-separated token-per-line corpus: `id form lemma pos head deprel label`
///
/// Sentences are separated by blank lines, `_` marks an empty cell, heads are
/// 1-based with `0` for the root. Every token carrying a label becomes one focus
/// instance.
#[derive(Debug, Clone, Default)]
pub struct ConllCorpusReader;

struct Row {
    instance: Instance,
    head: Option<usize>,
    label: Option<String>,
}

impl ConllCorpusReader {
    pub fn new() -> Self {
        Self
    }

    fn parse_row(line: &str, line_no: usize) -> Result<Row> {
        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() < COLUMNS {
            return Err(SensevolveError::Corpus {
                line: line_no,
                message: format!("expected {} columns, found {}", COLUMNS, cells.len()),
            });
        }

        let mut instance = Instance::default();
        for (key, cell) in [
            (FeatureKey::Text, cells[1]),
            (FeatureKey::Lemma, cells[2]),
            (FeatureKey::Pos, cells[3]),
            (FeatureKey::Dep, cells[5]),
        ] {
            if cell != EMPTY {
                instance.insert(key, FeatureValue::Text(cell.to_string()));
            }
        }

        let head = match cells[4] {
            EMPTY => None,
            raw => Some(raw.parse::<usize>().map_err(|e| SensevolveError::Corpus {
                line: line_no,
                message: format!("invalid head '{}': {}", raw, e),
            })?),
        };
        let label = match cells[6] {
            EMPTY => None,
            raw => Some(raw.to_string()),
        };

        Ok(Row { instance, head, label })
    }

    fn flush(
        rows: &mut Vec<Row>,
        sentence_index: usize,
        line_no: usize,
        out: &mut Vec<Focus>,
    ) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut sequence = Sequence::new(sentence_index);
        let mut links = Vec::new();
        let mut labels = Vec::new();
        for row in rows.drain(..) {
            let position = sequence.push(row.instance);
            if let Some(head) = row.head {
                links.push((position, head));
            }
            if let Some(label) = row.label {
                labels.push((position, label));
            }
        }

        let corpus_error = |e: SensevolveError| SensevolveError::Corpus {
            line: line_no,
            message: e.to_string(),
        };
        for &(child, head) in links.iter().filter(|(_, head)| *head > 0) {
            sequence.set_head(child, head - 1).map_err(corpus_error)?;
        }
        if !links.is_empty() {
            sequence.check_tree().map_err(corpus_error)?;
        }

        let sequence = Arc::new(sequence);
        for (position, label) in labels {
            if let Some(focus) = Focus::new(Arc::clone(&sequence), position) {
                out.push(focus.with_label(label));
            }
        }
        Ok(())
    }
}

impl CorpusReader for ConllCorpusReader {
    fn read_instances(&self, input: &mut dyn BufRead) -> Result<Vec<Focus>> {
        let mut instances = Vec::new();
        let mut rows = Vec::new();
        let mut sentence_index = 0;
        let mut line_no = 0;

        for line in input.lines() {
            let line = line?;
            line_no += 1;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                if !rows.is_empty() {
                    Self::flush(&mut rows, sentence_index, line_no, &mut instances)?;
                    sentence_index += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') {
                continue;
            }
            rows.push(Self::parse_row(trimmed, line_no)?);
        }
        Self::flush(&mut rows, sentence_index, line_no, &mut instances)?;

        log::debug!("Read {} focus instances from {} lines", instances.len(), line_no);
        Ok(instances)
    }

    fn write_instances(&self, instances: &[Focus], output: &mut dyn Write) -> Result<()> {
        for focus in instances {
            let sequence = focus.sequence();
            let is_tree = (0..sequence.size()).any(|i| sequence.head(i).is_some());

            for (i, token) in sequence.tokens().enumerate() {
                let cell = |key: FeatureKey| {
                    token
                        .get(&key)
                        .and_then(FeatureValue::as_text)
                        .unwrap_or_else(|| EMPTY.to_string())
                };
                let head = if is_tree {
                    sequence.head(i).map(|h| h + 1).unwrap_or(0).to_string()
                } else {
                    EMPTY.to_string()
                };
                let label = if i == focus.index() {
                    focus.label().unwrap_or_else(|| EMPTY.to_string())
                } else {
                    EMPTY.to_string()
                };

                writeln!(
                    output,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    i + 1,
                    cell(FeatureKey::Text),
                    cell(FeatureKey::Lemma),
                    cell(FeatureKey::Pos),
                    head,
                    cell(FeatureKey::Dep),
                    label
                )?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}
