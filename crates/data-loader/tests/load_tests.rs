//! Loading catalogs from MovieLens directories on disk.
//!
//! Each test writes a tiny dataset into a temp dir in the exact byte layout
//! of the real files (Latin-1, pipe / tab / `::` separators).

use data_loader::{Catalog, DataLoadError, DatasetLayout, Genre, ReleaseYear, Table};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Encode as Latin-1; every char used here is below U+0100
fn latin1(s: &str) -> Vec<u8> {
    s.chars().map(|c| c as u8).collect()
}

/// The 19 `u.item` genre flag columns with `on` set
fn flags(on: &[Genre]) -> String {
    Genre::ALL
        .iter()
        .map(|g| if on.contains(g) { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join("|")
}

fn write_ml100k(dir: &Path) {
    let items = [
        format!(
            "1|Toy Story (1995)|01-Jan-1995||http://us.imdb.com/M/title-exact?Toy%20Story%20(1995)|{}",
            flags(&[Genre::Animation, Genre::Children, Genre::Comedy])
        ),
        format!(
            "2|Mis\u{e9}rables, Les (1995)|01-Jan-1995||http://us.imdb.com/M/title-exact?Miserables%20(1995)|{}",
            flags(&[Genre::Drama, Genre::Musical])
        ),
        format!("267|unknown||||{}", flags(&[Genre::Unknown])),
        "4|Broken|x".to_string(),
    ]
    .join("\n");
    fs::write(dir.join("u.item"), latin1(&items)).unwrap();

    let ratings = [
        "196\t1\t3\t881250949",
        "186\t2\t5\t891717742",
        "22\t267\t9\t878887116",
        "244\t1\t4\t880606923",
        "166\t99\t1\t886397596",
    ]
    .join("\n");
    fs::write(dir.join("u.data"), ratings).unwrap();
}

fn write_ml1m(dir: &Path) {
    let movies = [
        "1::Toy Story (1995)::Animation|Children's|Comedy",
        "2::Jumanji (1995)::Adventure|Children's|Fantasy",
        "3::Bad Genre (1995)::Cartoons",
    ]
    .join("\n");
    fs::write(dir.join("movies.dat"), latin1(&movies)).unwrap();

    let ratings = [
        "1::1::5::978300760",
        "1::2::3::978302109",
        "2::1::4::978301968",
        "2::3::4::978300275",
        "3::2::0::978300275",
    ]
    .join("\n");
    fs::write(dir.join("ratings.dat"), ratings).unwrap();
}

#[test]
fn test_load_ml100k_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_ml100k(temp_dir.path());

    assert_eq!(DatasetLayout::detect(temp_dir.path()).unwrap(), DatasetLayout::Ml100k);
    let (catalog, report) = Catalog::load_from_dir(temp_dir.path()).unwrap();

    assert_eq!(catalog.len(), 3);
    let titles: Vec<&str> = catalog.entries().iter().map(|e| e.item.title.as_str()).collect();
    assert_eq!(titles, vec!["Toy Story", "Misérables, Les", "unknown"]);

    // Blank release date column and no year in the title
    let unknown = catalog.get_item(267).unwrap();
    assert_eq!(unknown.year, Some(ReleaseYear::Unknown));
    assert_eq!(catalog.get_item(2).unwrap().year, Some(ReleaseYear::Known(1995)));

    // Bad item line, rating of 9, rating for a movie that isn't there
    assert_eq!(report.skipped(), 3);
    assert_eq!(report.skipped_in(Table::Items), 1);
    assert_eq!(report.skipped_in(Table::Ratings), 2);

    let out_of_range = report
        .warnings
        .iter()
        .find(|w| w.reason.contains("out of range"))
        .unwrap();
    assert_eq!(out_of_range.line, Some(3));
    let unknown_movie = report
        .warnings
        .iter()
        .find(|w| w.reason.contains("unknown movieId"))
        .unwrap();
    assert_eq!(unknown_movie.line, Some(5));

    assert_eq!(catalog.total_ratings(), 3);
    assert_eq!(catalog.total_users(), 3);
    let toy_story = catalog.get_aggregate(1).unwrap();
    assert_eq!(toy_story.rating_count, 2);
    assert_eq!(toy_story.mean_rating, Some(3.5));
    assert_eq!(catalog.get_aggregate(267).unwrap().mean_rating, None);
}

#[test]
fn test_load_ml1m_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_ml1m(temp_dir.path());

    assert_eq!(DatasetLayout::detect(temp_dir.path()).unwrap(), DatasetLayout::Ml1m);
    let (catalog, report) = Catalog::load_from_dir(temp_dir.path()).unwrap();

    assert_eq!(catalog.len(), 2);
    let jumanji = catalog.get_item(2).unwrap();
    assert_eq!(jumanji.title, "Jumanji");
    assert_eq!(jumanji.year, Some(ReleaseYear::Known(1995)));
    assert!(jumanji.genres.contains(&Genre::Children));

    // Unknown genre label, rating for movie 3, rating of 0
    assert_eq!(report.skipped_in(Table::Items), 1);
    assert_eq!(report.skipped_in(Table::Ratings), 2);

    assert_eq!(catalog.total_ratings(), 3);
    assert_eq!(catalog.total_users(), 2);
    assert_eq!(catalog.get_aggregate(1).unwrap().mean_rating, Some(4.5));
}

#[test]
fn test_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let err = Catalog::load_from_dir(&missing).unwrap_err();
    assert!(matches!(err, DataLoadError::FileNotFound { .. }));
}

#[test]
fn test_directory_without_dataset() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("README"), "not a dataset").unwrap();

    let err = Catalog::load_from_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::UnknownLayout { .. }));
    assert!(err.to_string().starts_with("No MovieLens dataset found"));
}

#[test]
fn test_missing_ratings_file() {
    let temp_dir = TempDir::new().unwrap();
    write_ml100k(temp_dir.path());
    fs::remove_file(temp_dir.path().join("u.data")).unwrap();

    match Catalog::load_from_dir(temp_dir.path()).unwrap_err() {
        DataLoadError::FileNotFound { path } => assert!(path.ends_with("u.data")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_only_bad_item_lines() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("u.item"), "x|y\n\n1|Too Short").unwrap();
    fs::write(temp_dir.path().join("u.data"), "1\t1\t4\t0").unwrap();

    let err = Catalog::load_from_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::EmptyCatalog { skipped: 2 }));
}
