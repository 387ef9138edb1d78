use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::{models::QueryResponse, services::Recommender};

/// Content-based movie recommendations
#[derive(Debug, Parser)]
#[command(name = "cinematch", version, about)]
pub struct Cli {
    /// Serve the HTTP API instead of answering on the terminal
    #[arg(long)]
    pub serve: bool,

    /// Number of recommendations per query (overrides TOP_N)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub top_n: Option<u64>,

    /// Movie title; words are joined with spaces. Omit for interactive mode
    pub title: Vec<String>,
}

impl Cli {
    /// Positional words joined and trimmed, or `None` when no words were given
    pub fn query(&self) -> Option<String> {
        if self.title.is_empty() {
            return None;
        }
        Some(self.title.join(" ").trim().to_string())
    }
}

pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// Answers one query as a single JSON line
pub fn single_shot(recommender: &Recommender, query: &str) -> String {
    to_json_line(&recommender.respond(query, None))
}

/// Reads titles line by line until `exit`, `quit` or end of input, answering each.
///
/// Query errors are written as results and never end the session.
pub fn run_interactive<R: BufRead, W: Write>(
    recommender: &Recommender,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "Recommender ready.")?;

    loop {
        write!(output, "\nEnter a movie name (or 'exit'): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if is_exit_command(query) {
            break;
        }

        writeln!(output, "{}", to_json_line(&recommender.respond(query, None)))?;
    }

    Ok(())
}

fn to_json_line(response: &QueryResponse) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode result: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, ItemMetadata};
    use crate::services::{TitleResolver, VectorSource};
    use std::io::Cursor;

    fn recommender() -> Recommender {
        let item = |id: i64, title: &str, genres: &str| {
            CatalogItem::new(id, title).with_metadata(ItemMetadata {
                genres: Some(genres.to_string()),
                ..Default::default()
            })
        };
        Recommender::build(
            vec![
                item(1, "Alien", "Horror SciFi"),
                item(2, "Aliens", "Action SciFi"),
                item(3, "Heat", "Crime Thriller"),
            ],
            VectorSource::Lexical,
            TitleResolver::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_query_joins_positional_words() {
        let cli = Cli::parse_from(["cinematch", " the", "dark", "knight "]);
        assert_eq!(cli.query().as_deref(), Some("the dark knight"));

        let cli = Cli::parse_from(["cinematch"]);
        assert_eq!(cli.query(), None);
    }

    #[test]
    fn test_top_n_must_be_positive() {
        assert!(Cli::try_parse_from(["cinematch", "--top-n", "0", "heat"]).is_err());
        let cli = Cli::parse_from(["cinematch", "--top-n", "3", "heat"]);
        assert_eq!(cli.top_n, Some(3));
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command(" QUIT "));
        assert!(!is_exit_command("exit wounds"));
    }

    #[test]
    fn test_single_shot_outputs_json() {
        let line = single_shot(&recommender(), "alien");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["recommendations"][0]["id"], 2);
    }

    #[test]
    fn test_interactive_session_survives_errors() {
        let input = Cursor::new("xyzxyz123\n\nheat\nexit\nalien\n");
        let mut output = Vec::new();

        run_interactive(&recommender(), input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let results: Vec<serde_json::Value> = text
            .lines()
            .filter_map(|line| {
                line.find('{')
                    .and_then(|start| serde_json::from_str(&line[start..]).ok())
            })
            .collect();

        assert!(text.starts_with("Recommender ready."));
        assert_eq!(results.len(), 3);
        assert!(results[0]["error"].as_str().unwrap().contains("not found"));
        assert_eq!(results[1]["error"], "Invalid movie title.");
        assert!(results[2]["recommendations"].is_array());
    }

    #[test]
    fn test_interactive_session_ends_at_eof() {
        let mut output = Vec::new();
        run_interactive(&recommender(), Cursor::new(""), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("Recommender ready."));
    }
}
