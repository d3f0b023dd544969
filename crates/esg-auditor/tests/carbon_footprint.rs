use esg_auditor::carbon::{
    compute_breakdown, compute_footprint, normalize_quantity, CarbonRecord, EmissionSource, Scope,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn gasoline_only_lands_in_scope_one() {
    let record = CarbonRecord {
        gasoline: "100".to_string(),
        ..CarbonRecord::default()
    };

    let footprint = compute_footprint(&record);
    assert_close(footprint.scope1, 231.0);
    assert_close(footprint.scope2, 0.0);
    assert_close(footprint.scope3, 0.0);
    assert_close(footprint.total, 231.0);
}

#[test]
fn empty_record_is_all_zero() {
    let footprint = compute_footprint(&CarbonRecord::default());
    assert_eq!(footprint.scope1, 0.0);
    assert_eq!(footprint.scope2, 0.0);
    assert_eq!(footprint.scope3, 0.0);
    assert_eq!(footprint.total, 0.0);
}

#[test]
fn every_source_feeds_its_scope() {
    let mut record = CarbonRecord::default();
    for source in EmissionSource::ordered() {
        record.set(source, "10");
    }

    let footprint = compute_footprint(&record);
    assert_close(footprint.scope1, 10.0 * (2.31 + 2.68 + 2.02));
    assert_close(footprint.scope2, 10.0 * 0.45);
    assert_close(footprint.scope3, 10.0 * (0.255 + 0.195 + 0.52));
    assert_close(
        footprint.total,
        footprint.scope1 + footprint.scope2 + footprint.scope3,
    );
    assert_close(footprint.scope(Scope::Scope2), footprint.scope2);

    let breakdown = compute_breakdown(&record);
    assert_eq!(breakdown.len(), EmissionSource::ordered().len());
    let summed: f64 = breakdown.iter().map(|line| line.emissions).sum();
    assert_close(summed, footprint.total);
}

#[test]
fn invalid_quantities_count_as_zero() {
    assert_eq!(normalize_quantity(""), 0.0);
    assert_eq!(normalize_quantity("abc"), 0.0);
    assert_eq!(normalize_quantity("-40"), 0.0);
    assert_eq!(normalize_quantity("12.5 litres"), 12.5);

    let record = CarbonRecord {
        diesel: "not a number".to_string(),
        electricity: "-5".to_string(),
        ..CarbonRecord::default()
    };
    assert_eq!(compute_footprint(&record).total, 0.0);
}
