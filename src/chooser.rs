//! Filterable choice list on the terminal.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::warn;

use crate::search::SearchResult;
use crate::session::{filter_results, Chooser};

/// What the user typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Pick(usize),
    Filter(String),
    Cancel,
}

fn parse_reply(line: &str) -> Reply {
    let line = line.trim();
    if line.is_empty() {
        return Reply::Cancel;
    }
    match line.parse::<usize>() {
        Ok(n) => Reply::Pick(n),
        Err(_) => Reply::Filter(line.to_string()),
    }
}

/// Numbered list on a line-oriented terminal.
///
/// Typing a number picks the entry, typing text narrows the list by label,
/// and an empty line (or end of input) dismisses it.
pub struct ConsoleChooser<R, W> {
    io: Mutex<(R, W)>,
}

impl ConsoleChooser<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> ConsoleChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

impl<R, W> ConsoleChooser<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn run(&self, placeholder: &str, results: &[SearchResult]) -> std::io::Result<Option<usize>> {
        let mut guard = self.io.lock().await;
        let (input, output) = &mut *guard;
        let mut filter = String::new();

        loop {
            let visible = filter_results(results, &filter);
            output.write_all(format!("{}\n", placeholder).as_bytes()).await?;
            for (shown, (_, result)) in visible.iter().enumerate() {
                output
                    .write_all(format!("{:>3}. {}\n", shown + 1, result.label()).as_bytes())
                    .await?;
            }
            if visible.is_empty() {
                output.write_all(b"  (no matches)\n").await?;
            }
            output.write_all(b"> ").await?;
            output.flush().await?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            match parse_reply(&line) {
                Reply::Cancel => return Ok(None),
                Reply::Filter(text) => filter = text,
                Reply::Pick(n) => match n.checked_sub(1).and_then(|i| visible.get(i)) {
                    Some((index, _)) => return Ok(Some(*index)),
                    None => {
                        output
                            .write_all(format!("No entry numbered {}\n", n).as_bytes())
                            .await?;
                    }
                },
            }
        }
    }
}

#[async_trait]
impl<R, W> Chooser for ConsoleChooser<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn choose(&self, placeholder: &str, results: &[SearchResult]) -> Option<usize> {
        match self.run(placeholder, results).await {
            Ok(choice) => choice,
            Err(e) => {
                warn!(error = %e, "Choice list failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("/v/Alpha.md"),
            SearchResult::new("/v/Beta.md"),
            SearchResult::new("/v/Alpha Report.PDF"),
        ]
    }

    async fn choose_with(input: &str) -> (Option<usize>, String) {
        let chooser = ConsoleChooser::new(BufReader::new(input.as_bytes()), Vec::new());
        let choice = chooser.choose("Showing results below for \"a\".", &results()).await;
        let (_, output) = chooser.io.into_inner();
        (choice, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply("2\n"), Reply::Pick(2));
        assert_eq!(parse_reply("  \n"), Reply::Cancel);
        assert_eq!(parse_reply("alp\n"), Reply::Filter("alp".into()));
    }

    #[tokio::test]
    async fn test_lists_labels_and_picks_by_number() {
        let (choice, output) = choose_with("2\n").await;

        assert_eq!(choice, Some(1));
        assert!(output.contains("Showing results below for \"a\"."));
        assert!(output.contains("  1. Alpha\n"));
        assert!(output.contains("  3. Alpha Report.PDF\n"));
    }

    #[tokio::test]
    async fn test_filter_then_pick_maps_to_full_list_index() {
        let (choice, output) = choose_with("report\n1\n").await;

        assert_eq!(choice, Some(2));
        assert!(output.contains("  1. Alpha Report.PDF\n"));
    }

    #[tokio::test]
    async fn test_empty_line_cancels() {
        let (choice, _) = choose_with("\n").await;
        assert_eq!(choice, None);
    }

    #[tokio::test]
    async fn test_end_of_input_cancels() {
        let (choice, _) = choose_with("").await;
        assert_eq!(choice, None);
    }

    #[tokio::test]
    async fn test_out_of_range_number_reprompts() {
        let (choice, output) = choose_with("9\n1\n").await;

        assert_eq!(choice, Some(0));
        assert!(output.contains("No entry numbered 9"));
    }
}
