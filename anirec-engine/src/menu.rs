// ---------------------------------------------------------------------------
// Menu — interactive text front end
// ---------------------------------------------------------------------------
//
// Numbered menu over any `BufRead` / `Write` pair. Holds only a shared
// reference to the recommender; EOF on input behaves like choosing exit.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead, Write};

use crate::error::RecommendError;
use crate::recommender::{normalize_limit, Recommender};
use crate::types::{FeatureQuery, Recommendation};

const MENU: &str = "\
=== Anime Recommendation System ===
1. Recommend by title
2. Recommend by genre
3. Recommend by theme
4. Recommend by demographic
5. Recommend by multiple features
6. List titles matching text
7. Exit";

pub struct Menu<'a, R, W> {
	engine: &'a Recommender,
	input: R,
	output: W,
	default_limit: i64,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
	pub fn new(engine: &'a Recommender, input: R, output: W, default_limit: i64) -> Self {
		Self {
			engine,
			input,
			output,
			default_limit,
		}
	}

	pub fn run(&mut self) -> io::Result<()> {
		loop {
			writeln!(self.output, "\n{MENU}")?;
			let Some(choice) = self.prompt("Enter your choice (1-7): ")? else {
				break;
			};
			match choice.as_str() {
				"1" => self.by_title()?,
				"2" => self.by_single_field(Field::Genres)?,
				"3" => self.by_single_field(Field::Themes)?,
				"4" => self.by_single_field(Field::Demographics)?,
				"5" => self.by_multiple_fields()?,
				"6" => self.list_matching()?,
				"7" => break,
				_ => writeln!(self.output, "Invalid choice. Please enter a number from 1 to 7.")?,
			}
		}
		writeln!(self.output, "Goodbye!")?;
		self.output.flush()
	}

	// ── Actions ───────────────────────────────────────────────────────────

	fn by_title(&mut self) -> io::Result<()> {
		let Some(title) = self.prompt("Enter anime title: ")? else {
			return Ok(());
		};
		if title.is_empty() {
			return writeln!(self.output, "No title entered.");
		}
		let k = self.prompt_count()?;
		let result = self.engine.recommend_by_title(&title, k);
		self.render(result)
	}

	fn by_single_field(&mut self, field: Field) -> io::Result<()> {
		let label = field.label();
		let Some(line) = self.prompt(&format!("Enter {label} (comma-separated): "))? else {
			return Ok(());
		};
		let mut query = FeatureQuery::default();
		*field.slot(&mut query) = parse_tags(&line);
		let k = self.prompt_count()?;
		let result = self.engine.recommend_by_features(&query, k);
		self.render(result)
	}

	fn by_multiple_fields(&mut self) -> io::Result<()> {
		let mut query = FeatureQuery::default();
		for field in [Field::Genres, Field::Themes, Field::Demographics] {
			let label = field.label();
			let Some(line) = self.prompt(&format!("Enter {label} (comma-separated, blank to skip): "))?
			else {
				return Ok(());
			};
			*field.slot(&mut query) = parse_tags(&line);
		}
		let k = self.prompt_count()?;
		let result = self.engine.recommend_by_features(&query, k);
		self.render(result)
	}

	fn list_matching(&mut self) -> io::Result<()> {
		let Some(needle) = self.prompt("Enter text to search for: ")? else {
			return Ok(());
		};
		let matches = self.engine.catalog().titles_containing(&needle);
		if matches.is_empty() {
			return writeln!(self.output, "No titles match '{needle}'.");
		}
		writeln!(self.output, "{} matching titles:", matches.len())?;
		for title in matches {
			writeln!(self.output, "  {title}")?;
		}
		Ok(())
	}

	// ── I/O helpers ───────────────────────────────────────────────────────

	/// Print `text`, read one trimmed line. `None` on EOF.
	fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
		write!(self.output, "{text}")?;
		self.output.flush()?;
		let mut line = String::new();
		if self.input.read_line(&mut line)? == 0 {
			return Ok(None);
		}
		Ok(Some(line.trim().to_string()))
	}

	fn prompt_count(&mut self) -> io::Result<usize> {
		let default = self.default_limit;
		let answer = self.prompt(&format!("How many recommendations? [{default}]: "))?;
		let n = match answer.as_deref().map(str::parse::<i64>) {
			Some(Ok(n)) => n,
			Some(Err(_)) if answer.as_deref() != Some("") => {
				writeln!(self.output, "Invalid number, using {default}.")?;
				default
			}
			_ => default,
		};
		Ok(normalize_limit(n))
	}

	fn render(&mut self, result: Result<Vec<Recommendation>, RecommendError>) -> io::Result<()> {
		match result {
			Ok(recs) if recs.is_empty() => writeln!(self.output, "No recommendations."),
			Ok(recs) => {
				writeln!(self.output, "\nRecommendations:")?;
				for (i, rec) in recs.iter().enumerate() {
					writeln!(self.output, "{}. {} (score: {:.4})", i + 1, rec.title, rec.score)?;
					writeln!(self.output, "   Genres: {}", rec.genres)?;
					writeln!(self.output, "   Themes: {}", rec.themes)?;
					writeln!(self.output, "   Demographics: {}", rec.demographics)?;
				}
				Ok(())
			}
			Err(RecommendError::TitleNotFound { title, suggestions }) => {
				writeln!(self.output, "Title '{title}' not found.")?;
				if !suggestions.is_empty() {
					writeln!(self.output, "Did you mean:")?;
					for s in suggestions {
						writeln!(self.output, "  - {s}")?;
					}
				}
				Ok(())
			}
			Err(e) => writeln!(self.output, "Error: {e}"),
		}
	}
}

#[derive(Clone, Copy)]
enum Field {
	Genres,
	Themes,
	Demographics,
}

impl Field {
	fn label(self) -> &'static str {
		match self {
			Self::Genres => "genres",
			Self::Themes => "themes",
			Self::Demographics => "demographics",
		}
	}

	fn slot(self, query: &mut FeatureQuery) -> &mut Vec<String> {
		match self {
			Self::Genres => &mut query.genres,
			Self::Themes => &mut query.themes,
			Self::Demographics => &mut query.demographics,
		}
	}
}

/// Split on commas, trim and lowercase each tag, drop blanks.
pub fn parse_tags(line: &str) -> Vec<String> {
	line.split(',')
		.map(|t| t.trim().to_lowercase())
		.filter(|t| !t.is_empty())
		.collect()
}
