//! Tests for the concurrent pipeline.
use super::*;
use crate::syntax::{Node, Operator};

#[tokio::test]
async fn statements_in_order() {
    let trees = spawn("a = 1;\nb = a + 2 * 3;\n".chars().collect::<Vec<_>>())
        .collect()
        .await
        .unwrap();
    let got: Vec<String> = trees.iter().map(ToString::to_string).collect();
    assert_eq!(
        got,
        ["Assignment(a, 1)", "Assignment(b, Sum(a, Product(2, 3)))"]
    );
}

#[tokio::test]
async fn streams_before_input_ends() {
    // The parser runs on whatever the lexer has produced so far.
    let mut pipeline = spawn("x = 1; y = 2; z = 3;".chars().collect::<Vec<_>>());
    match pipeline.next().await {
        Some(Ok(tree)) => {
            assert_eq!(tree.node(), &Node::Operator(Operator::Assignment));
            assert_eq!(tree.to_string(), "Assignment(x, 1)");
        }
        v => panic!("unexpected pipeline item: {v:?}"),
    }
    pipeline.join().await.unwrap();
}

#[tokio::test]
async fn lexer_error_is_last_item() {
    let mut pipeline = spawn("a = 1;\nb = 2 $ 3;\nc = 4;".chars().collect::<Vec<_>>());
    let mut items = Vec::new();
    while let Some(item) = pipeline.next().await {
        items.push(item);
    }
    assert_eq!(items.len(), 2);
    match &items[0] {
        Ok(tree) => assert_eq!(tree.to_string(), "Assignment(a, 1)"),
        v => panic!("unexpected first item: {v:?}"),
    }
    match &items[1] {
        Err(ReadErr::UnexpectedCharacter { ch, position }) => {
            assert_eq!(*ch, '$');
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 6);
        }
        v => panic!("unexpected last item: {v:?}"),
    }
    pipeline.join().await.unwrap();
}

#[tokio::test]
async fn parse_error_stops_collect() {
    match spawn("a = 1; +3; b = 2;".chars().collect::<Vec<_>>())
        .collect()
        .await
    {
        Err(ReadErr::NotEnoughArguments { tree }) => {
            assert_eq!(tree.node(), &Node::Operator(Operator::Sum))
        }
        v => panic!("unexpected collect result: {v:?}"),
    }
}

#[tokio::test]
async fn empty_input_closes_queue() {
    let mut pipeline = spawn(std::iter::empty::<char>());
    assert!(pipeline.next().await.is_none());
    pipeline.join().await.unwrap();
}

#[tokio::test]
async fn lazy_input() {
    // Characters are pulled one at a time from the lexer's worker.
    let lines = vec!["a = 1;".to_owned(), "b = 2;".to_owned()];
    let input = lines.into_iter().flat_map(|mut line| {
        line.push('\n');
        line.chars().collect::<Vec<_>>()
    });
    let trees = spawn(input).collect().await.unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1].position().line, 1);
}

#[tokio::test]
async fn failed_read_ends_input_with_error() {
    let mut input: Vec<std::io::Result<char>> = "a = 1;\nb = 2 ".chars().map(Ok).collect();
    input.push(Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "stream did not contain valid UTF-8",
    )));
    input.extend("c = 3;\n".chars().map(Ok));

    let mut pipeline = spawn_fallible(input);
    let mut items = Vec::new();
    while let Some(item) = pipeline.next().await {
        items.push(item);
    }
    pipeline.join().await.unwrap();

    // The statement cut short by the failed read is not completed, and nothing after it is read.
    assert_eq!(items.len(), 2);
    match &items[0] {
        Ok(tree) => assert_eq!(tree.to_string(), "Assignment(a, 1)"),
        v => panic!("unexpected first item: {v:?}"),
    }
    match &items[1] {
        Err(ReadErr::Input { reason, position }) => {
            assert!(reason.contains("UTF-8"), "unexpected reason: {reason:?}");
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 6);
        }
        v => panic!("unexpected last item: {v:?}"),
    }
}

#[tokio::test]
async fn failed_read_takes_precedence_over_truncation() {
    // "a." alone would be a missing identifier; the read failure is the real cause.
    let input: Vec<Result<char, String>> =
        vec![Ok('a'), Ok('.'), Err("disconnected".to_owned())];
    match spawn_fallible(input).collect().await {
        Err(ReadErr::Input { reason, .. }) => assert_eq!(reason, "disconnected"),
        v => panic!("unexpected collect result: {v:?}"),
    }
}

#[tokio::test]
async fn panicking_input_is_a_worker_error() {
    let input = std::iter::from_fn(|| -> Option<char> { panic!("input source exploded") });
    let mut pipeline = spawn(input);
    // The panic closes the token queue, so the output ends rather than hanging.
    assert!(pipeline.next().await.is_none());
    match pipeline.join().await {
        Err(ReadErr::Worker { stage, reason }) => {
            assert_eq!(stage, "lexer");
            assert!(reason.contains("panic"), "unexpected reason: {reason:?}");
        }
        v => panic!("unexpected join result: {v:?}"),
    }
}
