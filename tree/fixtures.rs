use arbor_dataframe::{Dataset, Example};

pub fn example(features: &[(&str, &str)], label: &str) -> Example {
	Example::new(
		features
			.iter()
			.map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
			.collect(),
		label,
	)
}

/// The classic "play tennis" weather dataset.
pub fn weather() -> Dataset {
	let rows = [
		["sunny", "hot", "high", "false", "no"],
		["sunny", "hot", "high", "true", "no"],
		["overcast", "hot", "high", "false", "yes"],
		["rainy", "mild", "high", "false", "yes"],
		["rainy", "cool", "normal", "false", "yes"],
		["rainy", "cool", "normal", "true", "no"],
		["overcast", "cool", "normal", "true", "yes"],
		["sunny", "mild", "high", "false", "no"],
		["sunny", "cool", "normal", "false", "yes"],
		["rainy", "mild", "normal", "false", "yes"],
		["sunny", "mild", "normal", "true", "yes"],
		["overcast", "mild", "high", "true", "yes"],
		["overcast", "hot", "normal", "false", "yes"],
		["rainy", "mild", "high", "true", "no"],
	];
	let examples = rows
		.iter()
		.map(|[outlook, temperature, humidity, windy, play]| {
			example(
				&[
					("outlook", *outlook),
					("temperature", *temperature),
					("humidity", *humidity),
					("windy", *windy),
				],
				play,
			)
		})
		.collect();
	Dataset::new(examples)
}
