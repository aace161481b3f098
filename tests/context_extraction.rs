use sensevolve::data::{Focus, Instance, Sequence};
use sensevolve::functions::{
    ChildrenContextFactory, ConcatExtractor, ContextFactory, ContextSpec, ExtractorSpec, FeatureExtractor,
    FeatureFunction, FeatureSpec, LookupExtractor, OffsetContextFactory, PipelineConfig, RootPathContextFactory,
};
use sensevolve::types::FeatureKey;
use std::collections::BTreeSet;
use std::sync::Arc;

fn sentence(words: &[&str]) -> Sequence {
    Sequence::from_instances(
        0,
        words
            .iter()
            .map(|w| Instance::default().with(FeatureKey::Text, *w))
            .collect(),
    )
}

#[test]
fn test_offsets_separate_mode() {
    let seq = sentence(&["a", "b", "c", "d", "e", "f", "g"]);
    let contexts = OffsetContextFactory::new("COL", vec![-1, 1], false).apply(&seq, 3);

    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0].identifier, "COL[-1]");
    assert_eq!(contexts[0].tokens, vec![2]);
    assert_eq!(contexts[1].identifier, "COL[1]");
    assert_eq!(contexts[1].tokens, vec![4]);
}

#[test]
fn test_offsets_concatenated_mode() {
    let seq = sentence(&["a", "b", "c", "d", "e", "f", "g"]);
    let contexts = OffsetContextFactory::new("COL", vec![-1, 1], true).apply(&seq, 3);

    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].identifier, "COL[-1,1]");
    assert_eq!(contexts[0].tokens, vec![2, 4]);
}

#[test]
fn test_children_include_set() {
    // "fox jumped fence" with fox=nsubj and fence=nmod under "jumped"
    let mut seq = Sequence::from_instances(
        0,
        vec![
            Instance::default()
                .with(FeatureKey::Text, "fox")
                .with(FeatureKey::Dep, "nsubj"),
            Instance::default()
                .with(FeatureKey::Text, "jumped")
                .with(FeatureKey::Dep, "root"),
            Instance::default()
                .with(FeatureKey::Text, "fence")
                .with(FeatureKey::Dep, "nmod"),
        ],
    );
    seq.set_head(0, 1).unwrap();
    seq.set_head(2, 1).unwrap();

    let include: BTreeSet<String> = ["nsubj".to_string()].into_iter().collect();
    let contexts = ChildrenContextFactory::new("DEP", include, BTreeSet::new()).apply(&seq, 1);

    assert_eq!(contexts.len(), 1);
    let words: Vec<String> = contexts[0].instances(&seq).map(Instance::text).collect();
    assert_eq!(words, vec!["fox"]);
}

#[test]
fn test_unbounded_root_path() {
    let mut seq = sentence(&["w0", "w1", "w2", "w3"]);
    for i in 0..3 {
        seq.set_head(i, i + 1).unwrap();
    }
    seq.check_tree().unwrap();

    let contexts = RootPathContextFactory::new("PATH", -1).apply(&seq, 0);
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].identifier, "PATH");
    assert_eq!(contexts[0].tokens, vec![0, 1, 2, 3]);
    assert_eq!(contexts[0].tokens.last().copied(), seq.root());
}

#[test]
fn test_concat_extractor_joins_with_pipe() {
    let token = Instance::default()
        .with(FeatureKey::Pos, "NN")
        .with(FeatureKey::Dep, "nsubj");
    let concat = ConcatExtractor::new(vec![
        Box::new(LookupExtractor::new("pos", vec![FeatureKey::Pos])),
        Box::new(LookupExtractor::new("dep", vec![FeatureKey::Dep])),
    ]);
    assert_eq!(concat.id(), "pos.dep");
    assert_eq!(concat.extract(&token).as_deref(), Some("NN|nsubj"));
}

#[test]
fn test_pipeline_features_for_a_focus() {
    let seq = Arc::new(sentence(&["the", "river", "bank", "flooded"]));
    let focus = Focus::new(seq, 2).unwrap();
    let config = PipelineConfig::new(vec![
        FeatureSpec::Bias,
        FeatureSpec::Single {
            context: ContextSpec::Offsets {
                key: "W".to_string(),
                offsets: vec![-1, 1],
                concatenate: false,
            },
            extractors: vec![ExtractorSpec::Identity],
        },
    ]);

    let terms: Vec<String> = config
        .build()
        .unwrap()
        .apply(&focus)
        .iter()
        .map(|f| f.term())
        .collect();
    assert_eq!(
        terms,
        vec!["bias=1", "W[-1]::identity=river", "W[1]::identity=flooded"]
    );
}
