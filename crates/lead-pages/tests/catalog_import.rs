use lead_pages::workflows::catalog::{CatalogError, CatalogSource, InMemoryCatalog};
use lead_pages::workflows::wizard::CatalogKind;

#[test]
fn sample_catalog_loads_from_disk() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/catalog.sample.csv");
    let catalog = InMemoryCatalog::from_path(path).expect("sample catalog loads");
    assert_eq!(catalog.len(), 7);

    let realtors = catalog
        .list(CatalogKind::Realtor, None)
        .expect("realtors listed");
    let ids: Vec<_> = realtors.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, ["re-401", "re-402"]);
    assert!(realtors[1].profile.phone.is_none());

    let matches = catalog
        .list(CatalogKind::LoanOfficer, Some("WELLS"))
        .expect("search succeeds");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].profile.name, "Jordan Wells");
}

#[test]
fn unknown_kind_reports_its_line() {
    let csv = "kind,id,name,email,phone,license,photo_url,company\n\
realtor,re-1,Casey Hart,,,,,\n\
broker,br-1,Nope,,,,,\n";

    let err = InMemoryCatalog::from_reader(csv.as_bytes()).expect_err("broker is not a kind");
    match err {
        CatalogError::UnknownKind { line, kind } => {
            assert_eq!(line, 3);
            assert_eq!(kind, "broker");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = InMemoryCatalog::from_path("does-not-exist.csv").expect_err("missing file");
    assert!(matches!(err, CatalogError::Io(_)));
}
