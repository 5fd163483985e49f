//! Accuracy regression tests for speechwarp-align.
//!
//! Hand-computed cases pin the summarizer and reducer outputs. Seeded random
//! chroma-like series check that coarse-to-fine alignment always returns a
//! valid path whose cost is never below the full-grid optimum.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use speechwarp_align::{
    AlignError, FeatureSeries, FrameDistance, GridCell, Metric, MultiResolution, ResolutionParam,
    ZeroNormPolicy, reduce_features, reduce_scalar, summarize,
};
use speechwarp_dtw::Dtw;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fs(frames: Vec<Vec<f64>>) -> FeatureSeries {
    FeatureSeries::new(frames).expect("valid test series")
}

/// Random 12-bin frames normalized to sum 1, like chroma energy distributions.
fn random_chroma(rng: &mut ChaCha8Rng, len: usize) -> FeatureSeries {
    let frames = (0..len)
        .map(|_| {
            let raw: Vec<f64> = (0..12).map(|_| rng.gen_range(0.0..1.0_f64).powi(3)).collect();
            let total: f64 = raw.iter().sum::<f64>().max(f64::MIN_POSITIVE);
            raw.into_iter().map(|v| v / total).collect()
        })
        .collect();
    fs(frames)
}

fn path_cost(a: &FeatureSeries, b: &FeatureSeries, cells: &[GridCell], metric: Metric) -> f64 {
    cells.iter().map(|c| metric.distance(a.frame(c.i), b.frame(c.j))).sum()
}

// ---------------------------------------------------------------------------
// a) hand-computed references
// ---------------------------------------------------------------------------

#[test]
fn repeated_frames_align_at_zero_cost() {
    let a = fs(vec![vec![1.0, 0.0]; 3]);
    let b = fs(vec![vec![1.0, 0.0]; 2]);
    let result = MultiResolution::new(1).align(a.as_view(), b.as_view()).unwrap();
    assert_eq!(result.cost.value(), 0.0);
    assert_eq!(result.path.first(), Some(GridCell::new(0, 0)));
    assert_eq!(result.path.last(), Some(GridCell::new(2, 1)));
    assert!(result.path.is_monotone());
}

#[test]
fn scalar_block_means() {
    assert_eq!(reduce_scalar(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2).unwrap(), vec![1.5, 3.5, 5.5]);
    assert_eq!(reduce_scalar(&[1.0, 2.0, 3.0], 2).unwrap(), vec![1.5]);
    assert!(reduce_scalar(&[1.0], 3).unwrap().is_empty());
    assert_eq!(reduce_scalar(&[1.0], 0), Err(AlignError::InvalidReduceFactor));
}

#[test]
fn feature_reduction_is_unimplemented() {
    let ts = fs(vec![vec![0.5, 0.5]; 4]);
    assert!(matches!(
        reduce_features(ts.as_view(), 3, 2),
        Err(AlignError::Unimplemented { .. })
    ));
}

#[test]
fn summarized_single_dominant_bin() {
    // Every frame has one bin in bucket 4 and the rest in bucket 0, so every
    // summarized frame is the unit vector on that bin.
    let frames: Vec<Vec<f64>> = (0..12)
        .map(|t| {
            let mut frame = vec![0.01; 3];
            frame[(t / 4) % 3] = 0.9;
            frame
        })
        .collect();
    let out = summarize(fs(frames).as_view(), 1, 4, ZeroNormPolicy::KeepZero).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out.frame(0), &[1.0, 0.0, 0.0]);
    assert_eq!(out.frame(1), &[0.0, 1.0, 0.0]);
    assert_eq!(out.frame(2), &[0.0, 0.0, 1.0]);
}

// ---------------------------------------------------------------------------
// b) multi-resolution vs full grid on random series
// ---------------------------------------------------------------------------

#[test]
fn multi_resolution_never_beats_full_grid() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let cfg = MultiResolution::new(1)
        .with_level(41, 2)
        .with_level(21, 4)
        .with_level(11, 8);
    let full_dtw = Dtw::new(Metric::SquaredEuclidean);

    for trial in 0..8 {
        let n = rng.gen_range(60..200);
        let m = rng.gen_range(60..200);
        let a = random_chroma(&mut rng, n);
        let b = random_chroma(&mut rng, m);

        let multi = cfg.align(a.as_view(), b.as_view()).unwrap();
        let full = full_dtw.align_full(a.as_view(), b.as_view()).unwrap();

        assert_eq!(multi.path.first(), Some(GridCell::new(0, 0)), "trial {trial}");
        assert_eq!(multi.path.last(), Some(GridCell::new(n - 1, m - 1)), "trial {trial}");
        assert!(multi.path.is_monotone(), "trial {trial}");
        assert!(
            multi.cost.value() >= full.cost.value() - 1e-9,
            "trial {trial}: multi {} < full {}",
            multi.cost,
            full.cost
        );

        let recomputed = path_cost(&a, &b, multi.path.cells(), Metric::SquaredEuclidean);
        assert!((multi.cost.value() - recomputed).abs() < 1e-9, "trial {trial}");
    }
}

#[test]
fn wide_radius_recovers_full_grid_optimum() {
    // A radius wider than every summarized series makes each projected window
    // the whole grid, so the result equals plain DTW.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = random_chroma(&mut rng, 48);
    let b = random_chroma(&mut rng, 40);
    let cfg = MultiResolution::new(64).with_level(9, 2).with_level(5, 4);

    let multi = cfg.align(a.as_view(), b.as_view()).unwrap();
    let full = Dtw::new(Metric::SquaredEuclidean)
        .align_full(a.as_view(), b.as_view())
        .unwrap();
    assert_eq!(multi, full);
}

#[test]
fn reject_policy_fails_on_silence() {
    let mut frames = vec![vec![0.01; 4]; 16];
    frames.extend((0..16).map(|t| {
        let mut frame = vec![0.0; 4];
        frame[t % 4] = 1.0;
        frame
    }));
    let a = fs(frames);
    let cfg = MultiResolution::new(1)
        .with_level(3, 2)
        .with_zero_norm_policy(ZeroNormPolicy::Reject);
    assert!(matches!(
        cfg.align(a.as_view(), a.as_view()),
        Err(AlignError::DegenerateFrame { frame: 0 })
    ));

    let keep = cfg.with_zero_norm_policy(ZeroNormPolicy::KeepZero);
    assert!(keep.align(a.as_view(), a.as_view()).is_ok());
}

// ---------------------------------------------------------------------------
// c) configuration loaded from JSON
// ---------------------------------------------------------------------------

#[test]
fn levels_from_json_drive_alignment() {
    let json = r#"[
        {"smoothing_window": 9, "downsample": 2},
        {"smoothing_window": 5, "downsample": 6}
    ]"#;
    let levels: Vec<ResolutionParam> = serde_json::from_str(json).unwrap();
    let cfg = MultiResolution::new(2).with_levels(levels);
    assert_eq!(cfg.levels()[1], ResolutionParam::new(5, 6));

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let a = random_chroma(&mut rng, 90);
    let b = random_chroma(&mut rng, 75);
    let result = cfg.align(a.as_view(), b.as_view()).unwrap();
    assert_eq!(result.path.last(), Some(GridCell::new(89, 74)));
}

#[test]
fn batch_preserves_order_and_errors() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut pairs: Vec<(FeatureSeries, FeatureSeries)> = (0..4)
        .map(|_| (random_chroma(&mut rng, 50), random_chroma(&mut rng, 60)))
        .collect();
    // Too short for the finest level.
    pairs.insert(2, (random_chroma(&mut rng, 1), random_chroma(&mut rng, 30)));

    let cfg = MultiResolution::new(1).with_level(5, 2).with_level(5, 4);
    let results = cfg.align_batch(&pairs);

    assert_eq!(results.len(), 5);
    assert!(matches!(results[2], Err(AlignError::SeriesTooShort { len: 1, downsample: 2 })));
    for (idx, ((a, b), result)) in pairs.iter().zip(&results).enumerate() {
        if idx == 2 {
            continue;
        }
        let result = result.as_ref().unwrap();
        assert_eq!(result.path.last(), Some(GridCell::new(a.len() - 1, b.len() - 1)));
    }
}
