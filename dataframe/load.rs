use super::*;
use anyhow::{format_err, Context, Result};
use std::{
	collections::{BTreeMap, BTreeSet},
	path::Path,
};

/// A `Record` maps each column name in a csv file to one row's value in that column.
pub type Record = BTreeMap<String, String>;

/// Read every row of the csv file at `path`. Whitespace around values is trimmed.
pub fn read_records_from_path(path: &Path) -> Result<Vec<Record>> {
	let mut reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_path(path)
		.with_context(|| format!("failed to open csv file {}", path.display()))?;
	read_records(&mut reader)
		.with_context(|| format!("failed to read csv file {}", path.display()))
}

/// Read every row of a csv file. All values are read as strings, and empty cells are kept as the empty string. Rows with a different number of fields than the header are rejected.
pub fn read_records<R>(reader: &mut csv::Reader<R>) -> Result<Vec<Record>>
where
	R: std::io::Read,
{
	let column_names: Vec<String> = reader
		.headers()?
		.into_iter()
		.map(|column_name| column_name.to_owned())
		.collect();
	let mut seen = BTreeSet::new();
	for column_name in column_names.iter() {
		if !seen.insert(column_name.as_str()) {
			return Err(format_err!("duplicate column \"{}\"", column_name));
		}
	}
	let mut records = Vec::new();
	let mut record = csv::StringRecord::new();
	while reader.read_record(&mut record)? {
		records.push(
			column_names
				.iter()
				.cloned()
				.zip(record.iter().map(|value| value.to_owned()))
				.collect(),
		);
	}
	Ok(records)
}

impl Dataset {
	/// Load a dataset from the csv file at `path`. The `target` column holds the labels and every other column is a feature.
	pub fn from_path(path: &Path, target: &str) -> Result<Self> {
		let records = read_records_from_path(path)?;
		Self::from_records(records, target)
			.with_context(|| format!("failed to load dataset from {}", path.display()))
	}

	pub fn from_csv<R>(reader: &mut csv::Reader<R>, target: &str) -> Result<Self>
	where
		R: std::io::Read,
	{
		Self::from_records(read_records(reader)?, target)
	}

	/// Split the `target` column off of each record to make a labeled example.
	pub fn from_records(records: Vec<Record>, target: &str) -> Result<Self> {
		let examples = records
			.into_iter()
			.enumerate()
			.map(|(row_index, mut features)| {
				let label = features.remove(target).ok_or_else(|| {
					format_err!("row {} has no value for target column \"{}\"", row_index, target)
				})?;
				Ok(Example { features, label })
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { examples })
	}
}

#[test]
fn test_from_csv() {
	let csv = r#"outlook,play
sunny,no
rainy,yes
"#;
	let dataset =
		Dataset::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv)), "play")
			.unwrap();
	insta::assert_debug_snapshot!(dataset, @r###"
 Dataset {
     examples: [
         Example {
             features: {
                 "outlook": "sunny",
             },
             label: "no",
         },
         Example {
             features: {
                 "outlook": "rainy",
             },
             label: "yes",
         },
     ],
 }
 "###);
}

#[test]
fn test_empty_cells_are_categories() {
	let csv = "outlook,windy,play\n,true,no\n";
	let dataset =
		Dataset::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv)), "play")
			.unwrap();
	assert_eq!(dataset.examples[0].get("outlook"), Some(""));
	assert_eq!(dataset.examples[0].get("windy"), Some("true"));
}

#[test]
fn test_missing_target() {
	let csv = "outlook,windy\nsunny,true\n";
	let error =
		Dataset::from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv)), "play")
			.unwrap_err();
	assert_eq!(
		error.to_string(),
		"row 0 has no value for target column \"play\""
	);
}

#[test]
fn test_ragged_rows() {
	let csv = "outlook,play\nsunny,no,extra\n";
	let result = read_records(&mut csv::Reader::from_reader(std::io::Cursor::new(csv)));
	assert!(result.is_err());
}

#[test]
fn test_duplicate_columns() {
	let csv = "outlook,outlook,play\nsunny,rainy,no\n";
	let error = read_records(&mut csv::Reader::from_reader(std::io::Cursor::new(csv))).unwrap_err();
	assert_eq!(error.to_string(), "duplicate column \"outlook\"");
}
