//! Integration tests combining the ready-made effects
//!
//! A small expression evaluator runs on reader, error and writer effects,
//! and a tree labeller runs on fresh names and state.

use undertow::effects::error::{self, Error};
use undertow::effects::fresh::{self, Fresh, Unique};
use undertow::effects::output::{self, Output};
use undertow::effects::reader::{self, Reader};
use undertow::effects::state::{self, State};
use undertow::effects::writer::{self, Writer};
use undertow::prelude::*;
use undertow::run::{block_on, lift};
use undertow::testing::OpLog;
use undertow::{assert_returned, assert_thrown};

// ==========================================================================
// Expression evaluator
// ==========================================================================

#[derive(Debug, Clone)]
enum Expr {
    Num(i64),
    Var(&'static str),
    Add(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Let(&'static str, Box<Expr>, Box<Expr>),
}

fn num(n: i64) -> Expr {
    Expr::Num(n)
}

fn var(name: &'static str) -> Expr {
    Expr::Var(name)
}

fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(Box::new(a), Box::new(b))
}

fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(Box::new(a), Box::new(b))
}

fn let_in(name: &'static str, bound: Expr, body: Expr) -> Expr {
    Expr::Let(name, Box::new(bound), Box::new(body))
}

type Bindings = Vec<(&'static str, i64)>;
type Eval = Stack![Reader<Bindings>, Error<String>, Writer<Vec<String>>];

fn eval(expr: Expr) -> BoxedEff<Eval, i64> {
    match expr {
        Expr::Num(n) => pure(n).boxed(),
        Expr::Var(name) => reader::ask::<Bindings, Eval, _>()
            .and_then(move |bindings| {
                let found = bindings
                    .iter()
                    .rev()
                    .find(|(bound, _)| *bound == name)
                    .map(|&(_, value)| value);
                match found {
                    Some(value) => pure(value).boxed(),
                    None => error::throw::<i64, _, Eval, _>(format!("unbound {name}")).boxed(),
                }
            })
            .boxed(),
        Expr::Add(a, b) => eval(*a).zip(eval(*b)).map(|(x, y)| x + y).boxed(),
        Expr::Div(a, b) => eval(*a)
            .zip(eval(*b))
            .and_then(|(x, y)| {
                if y == 0 {
                    error::throw::<i64, _, Eval, _>("division by zero".to_string()).boxed()
                } else {
                    pure(x / y).boxed()
                }
            })
            .boxed(),
        Expr::Let(name, bound, body) => eval(*bound)
            .and_then(move |value| {
                writer::tell::<_, Eval, _>(vec![format!("{name} = {value}")]).then(
                    reader::local::<Bindings, Eval, _, _, _>(
                        move |bindings: &Bindings| {
                            let mut extended = bindings.clone();
                            extended.push((name, value));
                            extended
                        },
                        eval(*body),
                    ),
                )
            })
            .boxed(),
    }
}

fn evaluate(expr: Expr) -> (Result<i64, String>, Vec<String>) {
    let handled = error::run_error(reader::run_reader(Vec::new(), eval(expr)));
    run_pure(writer::run_writer(handled))
}

#[test]
fn test_evaluates_nested_lets() {
    let expr = let_in(
        "x",
        num(6),
        let_in("y", add(var("x"), num(4)), div(var("y"), num(2))),
    );
    let (result, trace) = evaluate(expr);
    assert_returned!(result, 5);
    assert_eq!(trace, vec!["x = 6", "y = 10"]);
}

#[test]
fn test_binding_ends_with_its_let() {
    let expr = add(let_in("x", num(1), var("x")), var("x"));
    let (result, trace) = evaluate(expr);
    assert_thrown!(result, "unbound x".to_string());
    assert_eq!(trace, vec!["x = 1"]);
}

#[test]
fn test_division_by_zero_keeps_trace() {
    let expr = let_in("zero", num(0), div(num(1), var("zero")));
    let (result, trace) = evaluate(expr);
    assert_thrown!(result, "division by zero".to_string());
    assert_eq!(trace, vec!["zero = 0"]);
}

#[test]
fn test_inner_binding_shadows_outer() {
    let expr = let_in("x", num(1), add(let_in("x", num(10), var("x")), var("x")));
    let (result, _) = evaluate(expr);
    assert_returned!(result, 11);
}

#[test]
fn test_recovered_error_restores_bindings() {
    // The failing branch throws from inside a `local`; after recovery the
    // outer binding must be back in place.
    let failing = eval(let_in("x", num(5), div(var("x"), num(0))));
    let recovered = error::catch(failing, |_: String| pure::<i64, Eval>(-1));
    let program = recovered.zip(eval(var("x")));

    let handled = error::run_error(reader::run_reader(vec![("x", 2)], program));
    let (result, trace) = run_pure(writer::run_writer(handled));
    assert_returned!(result, (-1, 2));
    assert_eq!(trace, vec!["x = 5"]);
}

// ==========================================================================
// Fresh names and state
// ==========================================================================

#[derive(Debug, PartialEq)]
enum Tree {
    Leaf(char),
    Node(Box<Tree>, Box<Tree>),
}

#[derive(Debug, PartialEq)]
enum Labelled {
    Leaf(Unique, char),
    Node(Box<Labelled>, Box<Labelled>),
}

type Labeller = Stack![Fresh, State<usize>];

/// Label every leaf with a fresh name and count the leaves in state.
fn label(tree: Tree) -> BoxedEff<Labeller, Labelled> {
    match tree {
        Tree::Leaf(c) => fresh::fresh::<Labeller, _>()
            .zip(state::modify::<usize, Labeller, _, _>(|n| n + 1))
            .map(move |(name, ())| Labelled::Leaf(name, c))
            .boxed(),
        Tree::Node(l, r) => label(*l)
            .zip(label(*r))
            .map(|(l, r)| Labelled::Node(Box::new(l), Box::new(r)))
            .boxed(),
    }
}

fn leaf_names(tree: &Labelled, into: &mut Vec<u64>) {
    match tree {
        Labelled::Leaf(name, _) => into.push(name.get()),
        Labelled::Node(l, r) => {
            leaf_names(l, into);
            leaf_names(r, into);
        }
    }
}

#[test]
fn test_labels_leaves_left_to_right() {
    let tree = Tree::Node(
        Box::new(Tree::Leaf('a')),
        Box::new(Tree::Node(
            Box::new(Tree::Leaf('b')),
            Box::new(Tree::Leaf('c')),
        )),
    );
    let (labelled, leaves) = run_pure(state::run_state(0, fresh::run_fresh(label(tree))));

    let mut names = Vec::new();
    leaf_names(&labelled, &mut names);
    assert_eq!(names, vec![0, 1, 2]);
    assert_eq!(leaves, 3);
}

#[test]
fn test_separate_runs_restart_names() {
    let first = run_pure(state::eval_state(0, fresh::run_fresh(label(Tree::Leaf('x')))));
    let second = run_pure(state::eval_state(0, fresh::run_fresh(label(Tree::Leaf('x')))));
    assert_eq!(first, second);
}

// ==========================================================================
// Output and host actions
// ==========================================================================

#[test]
fn test_output_collected_in_order() {
    type Es = Stack![Output<String>, Fresh];
    let program = for_each(0..3, |_| {
        fresh::fresh::<Es, _>().and_then(|name| output::output::<String, Es, _>(name.to_string()))
    });
    let (_, emitted) = run_pure(fresh::run_fresh(output::output_to_vec(program)));
    assert_eq!(emitted, vec!["#0", "#1", "#2"]);
}

#[test]
fn test_host_actions_observable_through_interpose() {
    type Es = Stack![Io];
    let audit = OpLog::new();
    let recorder = audit.clone();
    let effects = OpLog::new();
    let first = effects.clone();
    let second = effects.clone();

    let program = interpose(
        move |op: Io, site: SendSite<Io, Es>| {
            recorder.push("host action");
            send_op::<Io, Es, Here>(site.retarget(op))
        },
        lift::<_, Es, _, _>(move || first.push(1))
            .then(block_on::<_, Es, _>(async move { second.push(2) })),
    );

    run_io(program);
    assert_eq!(audit.entries(), vec!["host action", "host action"]);
    assert_eq!(effects.entries(), vec![1, 2]);
}
