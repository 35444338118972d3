//! Concurrent reading: the lexer and parser each run on their own worker,
//! connected by unbounded queues.
//!
//! ```text
//! characters -> [lexer] -> tokens -> [parser] -> trees -> consumer
//! ```
//!
//! Queue items are `ReadResult`s. A stage that fails sends its error as the last item
//! and then closes its queue, so the consumer sees every tree completed before the failure,
//! then the error, then the end of the stream.
//! If a consumer goes away, the stage feeding it stops.

use std::convert::Infallible;
use std::fmt::Display;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::reader::{Lexer, Position, ReadErr, ReadResult, ShuntingYard, Token};
use crate::syntax::SyntaxTree;

/// Handle on a running pipeline.
pub struct Pipeline {
    trees: UnboundedReceiver<ReadResult<SyntaxTree>>,
    lexer: JoinHandle<()>,
    parser: JoinHandle<()>,
}

/// Start reading `input` on worker threads.
///
/// Must be called from within a Tokio runtime.
/// The input may block; it is only ever pulled from the lexer's worker.
pub fn spawn<I>(input: I) -> Pipeline
where
    I: IntoIterator<Item = char>,
    I::IntoIter: Send + 'static,
{
    spawn_fallible(input.into_iter().map(Ok::<char, Infallible>))
}

/// Start reading from a source whose reads can fail, e.g. stdin.
///
/// The first failed read ends the input and is reported as [`ReadErr::Input`],
/// in place of whatever the lexer made of the truncated input.
/// Any statement still open at that point is not completed.
pub fn spawn_fallible<I, E>(input: I) -> Pipeline
where
    I: IntoIterator<Item = Result<char, E>>,
    I::IntoIter: Send + 'static,
    E: Display,
{
    let input = input.into_iter();
    let (token_tx, token_rx) = unbounded_channel::<ReadResult<Token>>();
    let (tree_tx, tree_rx) = unbounded_channel::<ReadResult<SyntaxTree>>();

    let lexer = tokio::task::spawn_blocking(move || {
        tracing::debug!("lexer worker started");
        lex(input, &token_tx);
    });
    let parser = tokio::task::spawn_blocking(move || {
        tracing::debug!("parser worker started");
        forward("parser", ShuntingYard::new(Queue(token_rx)), &tree_tx);
    });

    Pipeline {
        trees: tree_rx,
        lexer,
        parser,
    }
}

/// Run the lexer over `input`, sending tokens to `tx`.
fn lex<E: Display>(
    mut input: impl Iterator<Item = Result<char, E>>,
    tx: &UnboundedSender<ReadResult<Token>>,
) {
    let mut position = Position::default();
    let mut failure = None;
    let chars = std::iter::from_fn(|| {
        // Nothing more is read after a failure.
        if failure.is_some() {
            return None;
        }
        match input.next()? {
            Ok(ch) => {
                position = position.advance(ch);
                Some(ch)
            }
            Err(err) => {
                failure = Some(err.to_string());
                None
            }
        }
    });

    let mut sent = 0;
    let mut lex_error = None;
    for token in Lexer::new(chars) {
        match token {
            Ok(token) => {
                if tx.send(Ok(token)).is_err() {
                    tracing::debug!("lexer worker: consumer hung up after {sent} item(s)");
                    return;
                }
                sent += 1;
            }
            Err(err) => {
                lex_error = Some(err);
                break;
            }
        }
    }

    let err = match (failure, lex_error) {
        (Some(reason), _) => ReadErr::Input { reason, position },
        (None, Some(err)) => err,
        (None, None) => {
            tracing::debug!("lexer worker finished: {sent} item(s)");
            return;
        }
    };
    tracing::warn!("lexer worker aborted after {sent} item(s): {err}");
    // A send error here only means nobody is listening any more.
    let _ = tx.send(Err(err));
}

/// Send every item from a stage to the next queue.
/// Stops after the first error, or if nobody is listening.
/// The queue closes when `tx` is dropped by the caller.
fn forward<T>(
    stage: &str,
    items: impl Iterator<Item = ReadResult<T>>,
    tx: &UnboundedSender<ReadResult<T>>,
) {
    let mut sent = 0;
    for item in items {
        let failed = item.is_err();
        if tx.send(item).is_err() {
            tracing::debug!("{stage} worker: consumer hung up after {sent} item(s)");
            return;
        }
        if failed {
            tracing::warn!("{stage} worker aborted after {sent} item(s)");
            return;
        }
        sent += 1;
    }
    tracing::debug!("{stage} worker finished: {sent} item(s)");
}

/// Blocking iterator over a queue; ends when the queue is closed and drained.
struct Queue<T>(UnboundedReceiver<T>);

impl<T> Iterator for Queue<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.blocking_recv()
    }
}

impl Pipeline {
    /// The next completed tree, or the error that stopped the pipeline.
    /// None once all output has been consumed.
    pub async fn next(&mut self) -> Option<ReadResult<SyntaxTree>> {
        self.trees.recv().await
    }

    /// Collect all trees, stopping at the first error, then wait for the workers.
    pub async fn collect(mut self) -> ReadResult<Vec<SyntaxTree>> {
        let mut trees = Vec::new();
        while let Some(tree) = self.next().await {
            match tree {
                Ok(tree) => trees.push(tree),
                Err(err) => {
                    self.join().await?;
                    return Err(err);
                }
            }
        }
        self.join().await?;
        Ok(trees)
    }

    /// Wait for both workers to exit.
    ///
    /// Dropping the output first means the workers stop as soon as they next produce.
    pub async fn join(self) -> ReadResult<()> {
        drop(self.trees);
        join("lexer", self.lexer).await?;
        join("parser", self.parser).await
    }
}

async fn join(stage: &'static str, handle: JoinHandle<()>) -> ReadResult<()> {
    handle.await.map_err(|e| ReadErr::Worker {
        stage,
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
