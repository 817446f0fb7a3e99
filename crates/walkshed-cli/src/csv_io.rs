//! CSV input and output for listing batches.
//!
//! Input columns are carried into the output verbatim and in order; the
//! analysis columns are appended after them. Which analysis columns exist
//! depends on the scoring policy, so header and row construction both take it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use walkshed_analyzer::{AmenityProfile, ListingRecord, ScoringPolicy};
use walkshed_core::Catalog;

/// An input CSV, parsed once: the verbatim header and rows plus the listing
/// extracted from each row.
#[derive(Debug)]
pub struct ListingTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub listings: Vec<ListingRecord>,
}

/// Read a listings CSV from disk.
///
/// `address_column` must exist; `location_column` is optional and listings
/// from files without it get an empty location hint.
///
/// # Errors
///
/// Fails when the file cannot be opened, a row cannot be parsed, or the
/// address column is missing.
pub fn read_listings(
    path: &Path,
    address_column: &str,
    location_column: &str,
) -> anyhow::Result<ListingTable> {
    let file =
        File::open(path).with_context(|| format!("opening listings file {}", path.display()))?;
    parse_listings(file, address_column, location_column)
        .with_context(|| format!("reading listings from {}", path.display()))
}

fn parse_listings<R: Read>(
    reader: R,
    address_column: &str,
    location_column: &str,
) -> anyhow::Result<ListingTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let address_index = headers
        .iter()
        .position(|header| header == address_column)
        .with_context(|| format!("input has no '{address_column}' column"))?;
    let location_index = headers.iter().position(|header| header == location_column);

    let mut rows = Vec::new();
    let mut listings = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("reading CSV record")?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();

        let address = row.get(address_index).cloned().unwrap_or_default();
        let location_hint = location_index
            .and_then(|index| row.get(index).cloned())
            .unwrap_or_default();

        listings.push(ListingRecord {
            address,
            location_hint,
        });
        rows.push(row);
    }

    Ok(ListingTable {
        headers,
        rows,
        listings,
    })
}

/// Derive the output path from the input path: `homes.csv` becomes
/// `homes_with_amenities.csv` in the same directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "listings".to_string(), |s| s.to_string_lossy().into_owned());
    let extension = input
        .extension()
        .map_or_else(|| "csv".to_string(), |e| e.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_with_amenities.{extension}"))
}

/// Build the output header: the input columns, the shared analysis columns,
/// the per-category columns in catalog order, and the policy's terminal
/// column.
pub fn output_header(
    input_headers: &[String],
    catalog: &Catalog,
    policy: ScoringPolicy,
) -> Vec<String> {
    let mut header = input_headers.to_vec();
    header.push("latitude".to_string());
    header.push("longitude".to_string());
    header.push("analysis_date".to_string());
    header.push("analysis_radius".to_string());

    for category in catalog {
        header.push(format!("{}_count", category.key));
        match policy {
            ScoringPolicy::Detailed => {
                header.push(format!("{}_closest_distance", category.key));
            }
            ScoringPolicy::RatedComposite => {
                header.push(format!("{}_avg_rating", category.key));
                header.push(format!("{}_score", category.key));
            }
        }
    }

    match policy {
        ScoringPolicy::Detailed => header.push("total_amenities_count".to_string()),
        ScoringPolicy::RatedComposite => header.push("overall_amenity_score".to_string()),
    }
    header
}

/// Render one output row matching [`output_header`]'s layout.
///
/// Absent values (failed geocode, no points in range) become empty cells,
/// never placeholder text.
pub fn output_row(
    input_row: &[String],
    profile: &AmenityProfile,
    policy: ScoringPolicy,
) -> Vec<String> {
    let mut row = input_row.to_vec();

    if let Some(coordinate) = profile.coordinate {
        row.push(format!("{:.6}", coordinate.latitude));
        row.push(format!("{:.6}", coordinate.longitude));
    } else {
        row.push(String::new());
        row.push(String::new());
    }
    row.push(profile.analyzed_at.format("%Y-%m-%d %H:%M:%S").to_string());
    row.push(profile.analysis_radius_meters.to_string());

    for (_, result) in &profile.categories {
        row.push(result.count.to_string());
        match policy {
            ScoringPolicy::Detailed => {
                row.push(
                    result
                        .nearest_distance_meters
                        .map_or_else(String::new, |distance| format!("{distance:.0}")),
                );
            }
            ScoringPolicy::RatedComposite => {
                row.push(
                    result
                        .average_rating
                        .map_or_else(String::new, |rating| rating.to_string()),
                );
                row.push(
                    result
                        .category_score
                        .map_or_else(String::new, |score| score.to_string()),
                );
            }
        }
    }

    match policy {
        ScoringPolicy::Detailed => row.push(profile.total_count.to_string()),
        ScoringPolicy::RatedComposite => {
            row.push(
                profile
                    .overall_score
                    .map_or_else(String::new, |score| score.to_string()),
            );
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use walkshed_analyzer::CategoryResult;
    use walkshed_core::AmenityCategory;
    use walkshed_geo::Coordinate;

    use super::*;

    const INPUT: &str = "name,address,location_search,price\n\
        Loft,150 River St,\"Hoboken, NJ\",850000\n\
        Walkup,,\"Jersey City, NJ\",620000\n";

    fn two_category_catalog() -> Catalog {
        Catalog::new(vec![
            AmenityCategory {
                key: "school".to_string(),
                tags: vec!["school".to_string()],
                radius_meters: 1000,
            },
            AmenityCategory {
                key: "park".to_string(),
                tags: vec!["park".to_string()],
                radius_meters: 1000,
            },
        ])
        .unwrap()
    }

    fn profile(coordinate: Option<Coordinate>, policy: ScoringPolicy) -> AmenityProfile {
        let school = match policy {
            ScoringPolicy::Detailed => CategoryResult {
                count: 2,
                nearest_distance_meters: Some(299.6),
                ..CategoryResult::default()
            },
            ScoringPolicy::RatedComposite => CategoryResult {
                count: 2,
                average_rating: Some(4.2),
                category_score: Some(3.54),
                ..CategoryResult::default()
            },
        };
        let overall_score = match policy {
            ScoringPolicy::Detailed => None,
            ScoringPolicy::RatedComposite => Some(1.77),
        };
        AmenityProfile {
            coordinate,
            categories: vec![
                ("school".to_string(), school),
                ("park".to_string(), policy.empty_category()),
            ],
            total_count: 2,
            overall_score,
            analyzed_at: Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap(),
            analysis_radius_meters: 1000,
        }
    }

    #[test]
    fn parse_extracts_listings_and_preserves_rows() {
        let table = parse_listings(INPUT.as_bytes(), "address", "location_search").unwrap();

        assert_eq!(table.headers, vec!["name", "address", "location_search", "price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], "Walkup");

        assert_eq!(table.listings[0].address, "150 River St");
        assert_eq!(table.listings[0].location_hint, "Hoboken, NJ");
        assert_eq!(table.listings[1].address, "");
        assert_eq!(table.listings[1].location_hint, "Jersey City, NJ");
    }

    #[test]
    fn parse_requires_address_column() {
        let input = "name,price\nLoft,850000\n";
        let err =
            parse_listings(input.as_bytes(), "address", "location_search").unwrap_err();
        assert!(err.to_string().contains("no 'address' column"));
    }

    #[test]
    fn parse_tolerates_missing_location_column() {
        let input = "address\n150 River St\n";
        let table = parse_listings(input.as_bytes(), "address", "location_search").unwrap();
        assert_eq!(table.listings[0].location_hint, "");
    }

    #[test]
    fn default_output_path_inserts_suffix_before_extension() {
        assert_eq!(
            default_output_path(Path::new("listings.csv")),
            PathBuf::from("listings_with_amenities.csv")
        );
        assert_eq!(
            default_output_path(Path::new("data/homes.csv")),
            PathBuf::from("data/homes_with_amenities.csv")
        );
        assert_eq!(
            default_output_path(Path::new("listings")),
            PathBuf::from("listings_with_amenities.csv")
        );
    }

    #[test]
    fn detailed_header_has_count_and_distance_columns() {
        let headers = vec!["name".to_string(), "address".to_string()];
        let header = output_header(&headers, &two_category_catalog(), ScoringPolicy::Detailed);

        assert_eq!(
            header,
            vec![
                "name",
                "address",
                "latitude",
                "longitude",
                "analysis_date",
                "analysis_radius",
                "school_count",
                "school_closest_distance",
                "park_count",
                "park_closest_distance",
                "total_amenities_count",
            ]
        );
    }

    #[test]
    fn rated_header_has_rating_and_score_columns() {
        let headers = vec!["address".to_string()];
        let header = output_header(
            &headers,
            &two_category_catalog(),
            ScoringPolicy::RatedComposite,
        );

        assert_eq!(
            header,
            vec![
                "address",
                "latitude",
                "longitude",
                "analysis_date",
                "analysis_radius",
                "school_count",
                "school_avg_rating",
                "school_score",
                "park_count",
                "park_avg_rating",
                "park_score",
                "overall_amenity_score",
            ]
        );
    }

    #[test]
    fn detailed_row_formats_coordinates_and_distances() {
        let coordinate = Coordinate {
            latitude: 40.7589,
            longitude: -74.0278,
        };
        let input_row = vec!["Loft".to_string(), "150 River St".to_string()];

        let row = output_row(
            &input_row,
            &profile(Some(coordinate), ScoringPolicy::Detailed),
            ScoringPolicy::Detailed,
        );

        assert_eq!(
            row,
            vec![
                "Loft",
                "150 River St",
                "40.758900",
                "-74.027800",
                "2024-05-01 15:30:00",
                "1000",
                "2",
                "300",
                "0",
                "",
                "2",
            ]
        );
    }

    #[test]
    fn rated_row_formats_scores() {
        let coordinate = Coordinate {
            latitude: 40.7589,
            longitude: -74.0278,
        };
        let input_row = vec!["150 River St".to_string()];

        let row = output_row(
            &input_row,
            &profile(Some(coordinate), ScoringPolicy::RatedComposite),
            ScoringPolicy::RatedComposite,
        );

        assert_eq!(
            row,
            vec![
                "150 River St",
                "40.758900",
                "-74.027800",
                "2024-05-01 15:30:00",
                "1000",
                "2",
                "4.2",
                "3.54",
                "0",
                "0",
                "0",
                "1.77",
            ]
        );
    }

    #[test]
    fn degraded_row_has_empty_coordinates_but_keeps_shape() {
        let mut degraded = profile(None, ScoringPolicy::Detailed);
        degraded.categories = vec![
            ("school".to_string(), CategoryResult::default()),
            ("park".to_string(), CategoryResult::default()),
        ];
        degraded.total_count = 0;
        let input_row = vec!["Walkup".to_string(), String::new()];

        let row = output_row(&input_row, &degraded, ScoringPolicy::Detailed);

        assert_eq!(
            row,
            vec![
                "Walkup",
                "",
                "",
                "",
                "2024-05-01 15:30:00",
                "1000",
                "0",
                "",
                "0",
                "",
                "0",
            ]
        );
    }

    #[test]
    fn row_length_matches_header_length_for_both_policies() {
        let headers = vec!["address".to_string()];
        let input_row = vec!["150 River St".to_string()];
        let coordinate = Coordinate {
            latitude: 40.7589,
            longitude: -74.0278,
        };

        for policy in [ScoringPolicy::Detailed, ScoringPolicy::RatedComposite] {
            let header = output_header(&headers, &two_category_catalog(), policy);
            let row = output_row(&input_row, &profile(Some(coordinate), policy), policy);
            assert_eq!(header.len(), row.len(), "policy {policy:?}");
        }
    }
}
