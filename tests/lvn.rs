//! Local value numbering integration tests.
//!
//! These tests drive the public API end to end:
//! 1. Parse a block with `parse_program`
//! 2. Run `LocalValueNumbering` (or the `Engine` statement by statement)
//! 3. Check the rendered output, the used set and the recorded events

use std::collections::HashSet;

use valnum::{
    ir::{Ident, Op, Statement},
    lvn::{
        eliminate_dead_copies, Engine, EventKind, ExprKey, LocalValueNumbering, LvnConfig,
        Resolution, ValueKey,
    },
    text::{parse_program, read_program, render_program, write_program},
    Error, Result,
};

/// Parse, number and clean up a block, returning the rendered lines.
fn optimize(source: &str) -> Result<Vec<String>> {
    let block = parse_program(source)?;
    let translation = LocalValueNumbering::default().run(block);
    Ok(translation
        .statements()
        .iter()
        .map(ToString::to_string)
        .collect())
}

fn id(name: &str) -> Ident {
    Ident::new(name).expect("valid identifier")
}

#[test]
fn test_key_symmetry() {
    for op in [Op::Add, Op::Mul] {
        assert_eq!(
            ExprKey::new(op, id("a"), id("b")),
            ExprKey::new(op, id("b"), id("a")),
            "{op} should be commutative"
        );
    }
    for op in [Op::Sub, Op::Div] {
        assert_ne!(
            ExprKey::new(op, id("a"), id("b")),
            ExprKey::new(op, id("b"), id("a")),
            "{op} should NOT be commutative"
        );
    }
}

#[test]
fn test_end_to_end_scenario() -> Result<()> {
    let out = optimize(
        "x := a + b
         y := a + b
         a := c + d
         z := a + b",
    )?;

    assert_eq!(
        out,
        [
            "x := a + b",
            "%v1 := x",
            "y := %v1 // Replaced a+b with %v1",
            "a := c + d",
            "z := a + b",
        ]
    );
    Ok(())
}

#[test]
fn test_redundancy_marks_value_used() -> Result<()> {
    let block = parse_program("t1 := a + b\nt2 := a + b\n")?;
    let mut engine = Engine::new();
    let emitted = engine.process_all(block);

    assert_eq!(emitted.len(), 3);
    assert_eq!(emitted[2].operator(), None);
    assert_eq!(emitted[2].operand1(), &Ident::value_number(1));
    assert!(engine.used().contains(&Ident::value_number(1)));
    Ok(())
}

#[test]
fn test_kill_on_reassignment_allocates_fresh_value() -> Result<()> {
    let block = parse_program("t1 := a + b\na := c + d\nt2 := a + b\n")?;
    let mut engine = Engine::new();
    let emitted = engine.process_all(block);

    assert!(engine.used().is_empty());
    assert_eq!(engine.values_allocated(), 3);
    assert_eq!(emitted[4].to_string(), "t2 := a + b");
    assert_eq!(emitted[5].to_string(), "%v3 := t2");
    assert_eq!(
        engine.lookup(&ValueKey::Expr(ExprKey::new(Op::Add, id("a"), id("b")))),
        None
    );
    Ok(())
}

#[test]
fn test_non_commutative_distinctness() -> Result<()> {
    assert_eq!(optimize("p := a - b\nq := b - a\n")?, ["p := a - b", "q := b - a"]);
    assert_eq!(optimize("p := a / b\nq := b / a\n")?, ["p := a / b", "q := b / a"]);
    Ok(())
}

#[test]
fn test_dead_copies_absent_from_output() -> Result<()> {
    let out = optimize("x := a * b\ny := c - d\nz := b * a\n")?;

    assert_eq!(
        out,
        [
            "x := a * b",
            "%v1 := x",
            "y := c - d",
            "z := %v1 // Replaced a*b with %v1",
        ]
    );
    Ok(())
}

#[test]
fn test_order_preserved_for_untouched_statements() -> Result<()> {
    let source = "s1 := a + b\ns2 := c * d\ns3 := e - f\ns4 := g / h\n";
    let out = optimize(source)?;
    assert_eq!(out, ["s1 := a + b", "s2 := c * d", "s3 := e - f", "s4 := g / h"]);
    Ok(())
}

#[test]
fn test_chained_reuse() -> Result<()> {
    // t3 and t5 both compute (a+b)*(a+b) through different names
    let out = optimize(
        "t1 := a + b
         t2 := b + a
         t3 := t1 * t2
         t4 := a + b
         t5 := t4 * t1
         t6 := t5 - t3",
    )?;

    assert_eq!(
        out,
        [
            "t1 := a + b",
            "%v1 := t1",
            "t2 := %v1 // Replaced a+b with %v1",
            "t3 := t1 * t2",
            "%v2 := t3",
            "t4 := %v1 // Replaced a+b with %v1",
            "t5 := %v2 // Replaced %v1*%v1 with %v2",
            "t6 := t5 - t3",
        ]
    );
    Ok(())
}

#[test]
fn test_reassigned_result_is_rebound() -> Result<()> {
    let out = optimize(
        "x := a + b
         x := c + d
         y := x + e
         z := c + d
         w := z + e",
    )?;

    // x now holds c+d, so z reuses x's value and w reuses y's
    assert_eq!(out[5], "z := %v2 // Replaced c+d with %v2");
    assert_eq!(out[6], "w := %v3 // Replaced %v2+e with %v3");
    Ok(())
}

#[test]
fn test_statement_by_statement_matches_driver() -> Result<()> {
    let source = "x := a + b\ny := a + b\na := c + d\nz := a + b\n";

    let mut engine = Engine::new();
    let mut emitted = Vec::new();
    for statement in parse_program(source)? {
        emitted.extend(engine.process(statement));
    }
    let used: HashSet<Ident> = engine.used().clone();
    let manual = eliminate_dead_copies(emitted, &used);

    let driven = LocalValueNumbering::default().run(parse_program(source)?);
    assert_eq!(manual, driven.statements());
    Ok(())
}

#[test]
fn test_copy_input_tracks_source() -> Result<()> {
    let mut engine = Engine::new();
    engine.process(Statement::copy(id("c"), id("a")));
    assert_eq!(engine.resolve(&id("c")), Resolution::Bound(id("a")));

    engine.process(Statement::binary(id("t"), Op::Add, id("c"), id("b")));
    let same = engine.process(Statement::binary(id("u"), Op::Add, id("a"), id("b")));
    assert_eq!(same.statement().operand1(), &Ident::value_number(1));

    engine.process(Statement::binary(id("a"), Op::Mul, id("x"), id("y")));
    assert_eq!(engine.resolve(&id("c")), Resolution::Detached);
    Ok(())
}

#[test]
fn test_declared_inputs() -> Result<()> {
    let pass = LocalValueNumbering::new(LvnConfig::default().declared_inputs([id("a"), id("b")]));
    let translation = pass.run(parse_program("x := a + b\ny := x * k\nz := q - a\n")?);

    assert_eq!(translation.inputs(), [id("a"), id("b"), id("k"), id("q")]);
    assert_eq!(translation.undeclared(), [id("k"), id("q")]);
    assert_eq!(translation.events().count(EventKind::UndeclaredInput), 2);
    Ok(())
}

#[test]
fn test_malformed_input_never_reaches_engine() {
    let err = parse_program("x := a + b\ny := a ? b\n").unwrap_err();
    match err {
        Error::MalformedStatement { line, text, .. } => {
            assert_eq!(line, 2);
            assert_eq!(text, "y := a ? b");
        }
        other => panic!("Expected MalformedStatement, got {other:?}"),
    }
}

#[test]
fn test_file_pipeline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("block.tac");
    let output = dir.path().join("block.tac_vno");
    std::fs::write(&input, "m := p * q\n\nn := q * p\n")?;

    let translation = LocalValueNumbering::default().run(read_program(&input)?);
    write_program(&output, translation.statements())?;

    assert_eq!(
        std::fs::read_to_string(&output)?,
        render_program(translation.statements())
    );
    assert_eq!(
        std::fs::read_to_string(&output)?,
        "m := p * q\n%v1 := m\nn := %v1 // Replaced p*q with %v1\n"
    );
    Ok(())
}

#[test]
fn test_rerun_keeps_every_value_defined() -> Result<()> {
    let pass = LocalValueNumbering::default();
    let source = "x := a + b\ny := a + b\na := c + d\nz := a + b\nw := y * x\nv := x * y\n";

    let once = pass.run(parse_program(source)?).into_statements();
    let twice = pass.run(once.clone()).into_statements();

    let mut defined = HashSet::new();
    for statement in &twice {
        for operand in statement.operands() {
            if operand.is_value_number() {
                assert!(defined.contains(operand), "{operand} read before definition");
            }
        }
        defined.insert(statement.result().clone());
    }
    assert_eq!(render_program(&twice), render_program(&once));
    Ok(())
}
