use std::sync::Arc;
use std::thread;

use rand::seq::SliceRandom;
use term_chart::data_types::AxisSide;
use term_chart::sync::ChartLock;
use term_chart::{Chart, ChartConfig, HeadlessSurface, PlotKind, SeriesOptions, XAxisKind};

fn numeric_chart() -> Chart {
    let config = ChartConfig {
        index_spread: 1,
        bin_window: 10,
        x_zoom_unit: 1,
        grow_factor: 100,
        x_axis: XAxisKind::Numeric,
        ..ChartConfig::default()
    };
    Chart::new(config, Box::new(HeadlessSurface::new(80, 24))).unwrap()
}

#[test]
fn test_concurrent_add_point() {
    let threads = 8;
    let per_thread = 500;
    let mut chart = numeric_chart();
    let series = chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Left)
        .unwrap();

    let mut keys: Vec<i64> = (0..(threads * per_thread) as i64).collect();
    keys.shuffle(&mut rand::rng());

    let handles: Vec<_> = keys
        .chunks(per_thread)
        .map(|chunk| {
            let series = series.clone();
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                for k in chunk {
                    // spread keys far apart so the index grows on both sides
                    let x = (k - 2_000) as f64 * 3.0;
                    series.add_point(x, x).unwrap();
                }
            })
        })
        .collect();

    // render while the writers run
    for _ in 0..20 {
        chart.draw().unwrap();
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(series.len(), threads * per_thread);
    let index = chart.index();
    let index = index.acquire("test");
    assert_eq!(index.min_key(), Some(-6_000.0));
    assert_eq!(index.max_key(), Some(5_997.0));
    assert_eq!(index.columns(), &["a".to_string()]);
    assert!(index.start_key().unwrap() <= -6_000);
    assert!(index.end_key().unwrap() > 5_997);
    assert_eq!(index.get("a", 0.0).map(|p| p.value()), Some(0.0));
}

#[test]
fn test_draw_sees_whole_points() {
    let mut chart = numeric_chart();
    let series = chart
        .add_series(SeriesOptions::new("a", PlotKind::line()), AxisSide::Left)
        .unwrap();

    let writer = {
        let series = series.clone();
        thread::spawn(move || {
            for x in 0..2_000 {
                series.add_point(x as f64, 1.0).unwrap();
            }
        })
    };
    while !writer.is_finished() {
        chart.draw().unwrap();
        let index = chart.index();
        let index = index.acquire("test");
        // every inserted point is in both the index and the series list
        assert_eq!(index_points(&index), series.len());
    }
    writer.join().unwrap();
    assert_eq!(series.len(), 2_000);
}

fn index_points(index: &term_chart::Index) -> usize {
    (0..2_000)
        .filter(|x| index.get("a", *x as f64).is_some())
        .count()
}

#[test]
fn test_lock_counts_under_contention() {
    let lock = Arc::new(ChartLock::new(0u64));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    *lock.acquire("increment") += 1;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(*lock.acquire("read"), 4_000);
    assert!(!lock.is_locked());
}
