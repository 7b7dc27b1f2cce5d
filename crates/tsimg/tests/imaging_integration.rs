//! Integration tests for the imaging registry.
//!
//! These tests exercise every method end to end through the registry with
//! synthetic data.

use std::sync::Arc;
use std::thread;

use ndarray::Array2;
use serde_json::{json, Value};

use tsimg::prelude::*;

/// Create synthetic time series: a noisy sine per sample, phase-shifted.
fn create_synthetic_data(n_samples: usize, seq_len: usize) -> SequenceBatch {
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let data = Array2::from_shape_fn((n_samples, seq_len), |(i, t)| {
        let phase = i as f64 * 0.3;
        (t as f64 * 0.4 + phase).sin() + rng.gen::<f64>() * 0.1
    });
    SequenceBatch::from_array(data)
}

fn default_options(kind: MethodKind) -> Value {
    match kind {
        MethodKind::Mtf => json!({"n_bins": 4}),
        _ => json!({}),
    }
}

#[test]
fn test_one_image_per_sample() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(5, 24);

    for kind in registry.methods() {
        let images = registry
            .apply(kind.as_str(), &data, &default_options(kind))
            .unwrap();
        assert_eq!(images.len(), data.n_samples(), "method {}", kind);
        assert_eq!(images.image_size(), 24, "method {}", kind);
    }
}

#[test]
fn test_unknown_method_fails_for_any_data() {
    let registry = TransformRegistry::new();
    let batches = [
        create_synthetic_data(3, 10),
        SequenceBatch::from_rows(&[]).unwrap(),
        SequenceBatch::from_rows(&[vec![f64::NAN]]).unwrap(),
    ];

    for data in &batches {
        let err = registry.apply("unknown", data, &json!({})).unwrap_err();
        assert!(matches!(err, ImagingError::UnknownMethod(ref name) if name == "unknown"));
        assert!(err.is_lookup());
    }
}

#[test]
fn test_apply_is_deterministic() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(4, 32);

    for kind in MethodKind::ALL {
        let options = default_options(kind);
        let first = registry.apply(kind.as_str(), &data, &options).unwrap();
        let second = registry.apply(kind.as_str(), &data, &options).unwrap();
        assert_eq!(first, second, "method {}", kind);
    }
}

#[test]
fn test_gasf_and_gadf_differ() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(2, 16);

    let gasf = registry.apply("gasf", &data, &json!({})).unwrap();
    let gadf = registry.apply("gadf", &data, &json!({})).unwrap();
    assert_ne!(gasf, gadf);
}

#[test]
fn test_empty_batch_is_a_validation_error() {
    let registry = TransformRegistry::new();
    let empty = SequenceBatch::from_rows(&[]).unwrap();

    for kind in MethodKind::ALL {
        let err = registry.apply(kind.as_str(), &empty, &Value::Null).unwrap_err();
        assert!(
            matches!(err, ImagingError::InvalidInput(_)),
            "method {} returned {:?}",
            kind,
            err
        );
        assert!(err.is_validation());
    }
}

#[test]
fn test_concrete_scenario() {
    let registry = TransformRegistry::new();
    let data = SequenceBatch::from_rows(&[vec![0.0, 0.5, 1.0, 0.5]]).unwrap();

    let mtf = registry.apply("mtf", &data, &json!({"n_bins": 2})).unwrap();
    assert_eq!(mtf.shape(), (1, 4, 4));

    let rp = registry.apply("rp", &data, &json!({})).unwrap();
    assert_eq!(rp.shape(), (1, 4, 4));

    let gasf = registry.apply("gasf", &data, &json!({})).unwrap();
    let gadf = registry.apply("gadf", &data, &json!({})).unwrap();
    assert_eq!(gasf.shape(), (1, 4, 4));
    assert_eq!(gadf.shape(), (1, 4, 4));

    let (s, d) = (gasf.image(0).unwrap()[[0, 0]], gadf.image(0).unwrap()[[0, 0]]);
    assert!((s - d).abs() > 1e-9, "gasf[0][0] = {}, gadf[0][0] = {}", s, d);
}

#[test]
fn test_unknown_options_are_rejected() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(1, 8);

    for kind in MethodKind::ALL {
        let err = registry
            .apply(kind.as_str(), &data, &json!({"not_an_option": 1}))
            .unwrap_err();
        match err {
            ImagingError::InvalidOptions { method, .. } => assert_eq!(method, kind),
            other => panic!("Expected InvalidOptions for {}, got {:?}", kind, other),
        }
    }
}

#[test]
fn test_typed_configs_match_json_options() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(2, 20);

    let via_json = registry
        .apply("mtf", &data, &json!({"n_bins": 3, "image_size": 10}))
        .unwrap();
    let config = MtfConfig {
        n_bins: 3,
        image_size: tsimg::transforms::Span::Absolute(10),
        ..MtfConfig::default()
    };
    let via_config = MarkovTransitionField::new()
        .transform_with(&data, &config)
        .unwrap();
    assert_eq!(via_json, via_config);
    assert_eq!(via_json.shape(), (2, 10, 10));
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(TransformRegistry::new());
    let data = Arc::new(create_synthetic_data(3, 16));
    let expected = registry.apply("gadf", &data, &Value::Null).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let data = Arc::clone(&data);
            thread::spawn(move || registry.apply("gadf", &data, &Value::Null).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_plot_registry_output() {
    let registry = TransformRegistry::new();
    let data = create_synthetic_data(2, 12);
    let images = registry.apply("rp", &data, &json!({"threshold": "point"})).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rp.png");
    let img = plot(&images, &PlotConfig::default(), Some(&path)).unwrap();

    assert!(path.exists());
    assert_eq!(img.dimensions(), (12, 12));
}
