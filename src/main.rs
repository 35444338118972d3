//! Read statements from stdin and print their syntax trees, one per line.
//!
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).
//!
//! ```ignore
//! echo 'a = 3 + 4 * 8;' | yard
//! ```

use std::io::{BufRead, BufReader, Write};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Line-at-a-time, so trees print as soon as their statement is complete.
    // A failed read (e.g. invalid UTF-8) is passed along and stops the pipeline.
    let input = BufReader::new(std::io::stdin())
        .lines()
        .flat_map(|line| -> Vec<std::io::Result<char>> {
            match line {
                Ok(mut line) => {
                    line.push('\n');
                    line.chars().map(Ok).collect()
                }
                Err(err) => vec![Err(err)],
            }
        });

    let mut pipeline = yard::pipeline::spawn_fallible(input);
    let mut stdout = std::io::stdout().lock();
    while let Some(tree) = pipeline.next().await {
        match tree {
            Ok(tree) => {
                writeln!(stdout, "{tree}")?;
                stdout.flush()?;
            }
            Err(err) => {
                eprintln!("error: {err}");
                // Don't wait on the lexer: it may be blocked reading stdin.
                std::process::exit(1);
            }
        }
    }
    pipeline.join().await?;
    Ok(())
}
