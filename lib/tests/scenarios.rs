use ffp::{Error, Ffp, Kept, Reason, Tolerance};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    x: f64,
    y: f64,
}

fn index_of(kept: Kept<&f64>) -> usize {
    kept.index
}

fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.05)
        .collect()
}

fn samples(xs: &[f64], ys: &[f64]) -> Vec<Sample> {
    xs.iter().zip(ys).map(|(&x, &y)| Sample { x, y }).collect()
}

fn sample_filter(
    max_delta_y: f64,
) -> Ffp<
    Sample,
    impl Fn(&Sample, usize) -> f64,
    impl Fn(&Sample, usize) -> f64,
    impl Fn(Kept<&Sample>) -> usize,
> {
    Ffp::new()
        .with_max_delta_y(max_delta_y)
        .with_x(|s: &Sample, _| s.x)
        .with_y(|s: &Sample, _| s.y)
        .with_result(|kept: Kept<&Sample>| kept.index)
}

#[test]
fn should_filter_out_unnecessary_points_delta_1() {
    let ffp = Ffp::new().with_result(index_of);
    assert_eq!(ffp.filter(&[3.0, 4.0, 5.0, 5.0, 1.0]).unwrap(), vec![0, 3, 4]);
}

#[test]
fn should_filter_out_unnecessary_points_delta_half() {
    let ffp = Ffp::new().with_max_delta_y(0.5).with_result(index_of);
    assert_eq!(
        ffp.filter(&[3.0, 4.0, 5.0, 5.0, 1.0, 0.0]).unwrap(),
        vec![0, 2, 3, 4, 5]
    );
}

#[test]
fn should_work_for_records() {
    let points = samples(
        &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        &[3.0, 4.0, 5.0, 5.0, 1.0, 0.0],
    );
    let kept = sample_filter(0.5).filter(&points).unwrap();
    assert_eq!(kept, vec![0, 2, 3, 4, 5]);
}

#[test]
fn single_point_is_kept() {
    let kept = Ffp::<f64>::new().filter(&[42.0]).unwrap();
    assert_eq!(kept, vec![Kept { index: 0, point: 42.0 }]);
}

#[test]
fn endpoints_and_increasing_indices() {
    for n in [2, 3, 10, 57, 200] {
        let values = wave(n);
        for max_delta_y in [0.0, 0.1, 0.5, 1.0, 3.0, 100.0] {
            let kept = Ffp::new().with_max_delta_y(max_delta_y).keep(&values).unwrap();
            assert_eq!(kept.first(), Some(&0), "n={n} delta={max_delta_y}");
            assert_eq!(kept.last(), Some(&(n - 1)), "n={n} delta={max_delta_y}");
            assert!(
                kept.windows(2).all(|w| w[0] < w[1]),
                "n={n} delta={max_delta_y}: {kept:?}"
            );
        }
    }
}

#[test]
fn dropped_points_stay_within_band() {
    let values = wave(200);
    for max_delta_y in [0.25, 0.5, 1.0, 2.0, 4.0] {
        let kept = Ffp::new().with_max_delta_y(max_delta_y).keep(&values).unwrap();
        for pair in kept.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let slope = (values[b] - values[a]) / (b - a) as f64;
            for i in a + 1..b {
                let line = values[a] + slope * (i - a) as f64;
                assert!(
                    (line - values[i]).abs() <= max_delta_y + 1e-6,
                    "point {i} strays from segment {a}..{b}"
                );
            }
        }
    }
}

#[test]
fn looser_tolerance_keeps_fewer_points() {
    let values = wave(200);
    let counts: Vec<usize> = [0.25, 0.5, 1.0, 2.0, 4.0]
        .iter()
        .map(|&d| Ffp::new().with_max_delta_y(d).keep(&values).unwrap().len())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");

    let values = [3.0, 4.0, 5.0, 5.0, 1.0];
    let counts: Vec<usize> = [0.5, 1.0, 10.0]
        .iter()
        .map(|&d| Ffp::new().with_max_delta_y(d).keep(&values).unwrap().len())
        .collect();
    assert_eq!(counts, vec![4, 3, 2]);
}

#[test]
fn simplified_output_is_a_fixed_point() {
    for (values, max_delta_y) in [
        (vec![3.0, 4.0, 5.0, 5.0, 1.0], 1.0),
        (vec![3.0, 4.0, 5.0, 5.0, 1.0, 0.0], 0.5),
    ] {
        let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        let points = samples(&xs, &values);
        let ffp = sample_filter(max_delta_y);

        let kept = ffp.filter(&points).unwrap();
        let reduced: Vec<Sample> = kept.iter().map(|&i| points[i]).collect();
        let again = ffp.filter(&reduced).unwrap();
        assert_eq!(again, (0..reduced.len()).collect::<Vec<_>>());
    }
}

#[test]
fn nan_accessor_aborts() {
    let points = samples(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]);
    let err = Ffp::new()
        .with_x(|s: &Sample, i| if i == 3 { f64::NAN } else { s.x })
        .with_y(|s: &Sample, _| s.y)
        .filter(&points)
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCoordinate {
            alpha: 0,
            omega: 3,
            reason: Reason::NotANumber,
        }
    );
}

#[test]
fn irregular_abscissa() {
    let data = [(0.0, 0.0), (1.0, 0.2), (2.5, 0.1), (4.0, 3.0), (6.0, 6.1)];
    let kept = ffp::simplify(&data, Tolerance::new(0.5, ffp::DEFAULT_EPSILON)).unwrap();
    assert_eq!(kept, vec![(0.0, 0.0), (2.5, 0.1), (6.0, 6.1)]);
}

#[test]
fn shared_filter_across_threads() {
    let ffp = Ffp::new().with_max_delta_y(0.5).with_result(index_of);
    let inputs = [wave(50), wave(120), vec![3.0, 4.0, 5.0, 5.0, 1.0, 0.0]];
    let expected: Vec<Vec<usize>> = inputs.iter().map(|v| ffp.filter(v).unwrap()).collect();

    let ffp = &ffp;
    let got: Vec<Vec<usize>> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|values| s.spawn(move || ffp.filter(values).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(got, expected);
}
