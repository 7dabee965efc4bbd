use std::f64::consts::PI;

use term_chart::data_types::Point;
use term_chart::index::{Group, Index};
use term_chart::plot_types::find_extrema;

fn columns(values: &[f64]) -> Vec<Group> {
    let mut index = Index::new(100, 1).unwrap();
    for (x, y) in values.iter().enumerate() {
        index.insert("a", x as f64, Point::scalar(x as f64, *y)).unwrap();
    }
    let end = values.len() as i64 - 1;
    index.get_grouped(1, end, values.len()).unwrap().to_vec()
}

#[test]
fn test_single_hump() {
    let values: Vec<f64> = (0..=20).map(|x| (PI * x as f64 / 20.0).sin()).collect();
    let groups = columns(&values);

    let (peaks, valleys) = find_extrema(&groups, "a", 7);
    assert_eq!(peaks.len(), 1);
    assert!(valleys.is_empty());
    assert_eq!(peaks[0].column, 10);
    assert_eq!(peaks[0].key, Some(10));
    assert!((peaks[0].value - 1.0).abs() < 1e-12);
}

#[test]
fn test_single_dip() {
    let values: Vec<f64> = (0..=20).map(|x| 5.0 - (PI * x as f64 / 20.0).sin()).collect();
    let groups = columns(&values);

    let (peaks, valleys) = find_extrema(&groups, "a", 7);
    assert!(peaks.is_empty());
    assert_eq!(valleys.len(), 1);
    assert_eq!(valleys[0].column, 10);
    assert!((valleys[0].value - 4.0).abs() < 1e-12);
}

#[test]
fn test_raw_maximum_is_reported() {
    // the smoothed curve peaks in the middle, the raw data one column later
    let mut values: Vec<f64> = (0..=20).map(|x| (PI * x as f64 / 20.0).sin()).collect();
    values[11] = 1.001;
    let groups = columns(&values);

    let (peaks, _) = find_extrema(&groups, "a", 7);
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].column, 11);
    assert_eq!(peaks[0].value, 1.001);
}

#[test]
fn test_not_enough_columns() {
    let groups = columns(&[1.0, 2.0]);
    let (peaks, valleys) = find_extrema(&groups, "a", 7);
    assert!(peaks.is_empty() && valleys.is_empty());

    // window of 7 is not larger than the polynomial order
    let groups = columns(&[0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
    let (peaks, valleys) = find_extrema(&groups, "a", 7);
    assert!(peaks.is_empty() && valleys.is_empty());

    // same data with a lower order works
    let (peaks, _) = find_extrema(&groups, "a", 2);
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].value, 3.0);
}

#[test]
fn test_unknown_series() {
    let values: Vec<f64> = (0..=20).map(|x| x as f64).collect();
    let groups = columns(&values);
    let (peaks, valleys) = find_extrema(&groups, "missing", 7);
    assert!(peaks.is_empty() && valleys.is_empty());
}

#[test]
fn test_monotonic_has_no_extrema() {
    let values: Vec<f64> = (0..=20).map(|x| x as f64 * 2.0).collect();
    let groups = columns(&values);
    let (peaks, valleys) = find_extrema(&groups, "a", 7);
    assert!(peaks.is_empty() && valleys.is_empty());
}
