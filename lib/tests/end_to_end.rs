use graphexpect::list::read_list;
use graphexpect::named_nodes::{sh, NEO};
use graphexpect::{Constraint, Shape, Suite, Value};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, Literal, LiteralRef, NamedNode, SubjectRef, Term, TermRef};
use std::error::Error;

fn as_subject(term: TermRef<'_>) -> Result<SubjectRef<'_>, Box<dyn Error>> {
    match term {
        TermRef::BlankNode(node) => Ok(SubjectRef::BlankNode(node)),
        TermRef::NamedNode(node) => Ok(SubjectRef::NamedNode(node)),
        other => Err(format!("{} cannot be a subject", other).into()),
    }
}

fn shape_nodes(graph: &Graph) -> Vec<SubjectRef<'_>> {
    graph
        .subjects_for_predicate_object(rdf::TYPE, sh::NODE_SHAPE)
        .collect()
}

fn neo(name: &str) -> Term {
    NamedNode::new_unchecked(format!("{}{}", NEO, name)).into()
}

#[test]
fn person_age_and_status() -> Result<(), Box<dyn Error>> {
    let mut person = Shape::for_label("Person")?;
    person
        .expect(Constraint::ValueRange {
            property: "age".into(),
            min_exclusive: None,
            min_inclusive: Some(Value::from(0)),
            max_exclusive: None,
            max_inclusive: Some(Value::from(130)),
        })?
        .expect(Constraint::InSet {
            property: "status".into(),
            values: vec![Value::from("active"), Value::from("inactive")],
        })?;
    let graph = person.graph();

    let shapes = shape_nodes(graph);
    assert_eq!(shapes.len(), 1);
    let shape = shapes[0];
    let targets: Vec<_> = graph
        .objects_for_subject_predicate(shape, sh::TARGET_CLASS)
        .collect();
    assert_eq!(targets, vec![neo("Person").as_ref()]);

    let constraints: Vec<_> = graph
        .objects_for_subject_predicate(shape, sh::PROPERTY)
        .map(as_subject)
        .collect::<Result<_, _>>()?;
    assert_eq!(constraints.len(), 2);

    let (range, membership) = if graph
        .object_for_subject_predicate(constraints[0], sh::IN)
        .is_some()
    {
        (constraints[1], constraints[0])
    } else {
        (constraints[0], constraints[1])
    };

    assert_eq!(
        graph.object_for_subject_predicate(range, sh::PATH),
        Some(neo("age").as_ref())
    );
    assert_eq!(
        graph.object_for_subject_predicate(range, sh::MIN_INCLUSIVE),
        Some(TermRef::from(Literal::from(0i64).as_ref()))
    );
    assert_eq!(
        graph.object_for_subject_predicate(range, sh::MAX_INCLUSIVE),
        Some(TermRef::from(Literal::from(130i64).as_ref()))
    );

    assert_eq!(
        graph.object_for_subject_predicate(membership, sh::PATH),
        Some(neo("status").as_ref())
    );
    let head = graph
        .object_for_subject_predicate(membership, sh::IN)
        .ok_or("membership constraint has no list")?;
    assert_eq!(
        read_list(graph, as_subject(head)?),
        vec![
            Term::from(Literal::new_simple_literal("active")),
            Term::from(Literal::new_simple_literal("inactive")),
        ]
    );
    assert_eq!(graph.triples_for_predicate(rdf::FIRST).count(), 2);
    let nil_rests = graph
        .triples_for_predicate(rdf::REST)
        .filter(|t| t.object == TermRef::from(rdf::NIL))
        .count();
    assert_eq!(nil_rests, 1);
    Ok(())
}

#[test]
fn closed_shape_with_ignored_id() -> Result<(), Box<dyn Error>> {
    let mut person = Shape::for_label("Person")?;
    person.expect(Constraint::Closed {
        ignore: vec!["id".into()],
    })?;
    let graph = person.graph();
    let shape = shape_nodes(graph)[0];

    assert_eq!(
        graph.object_for_subject_predicate(shape, sh::CLOSED),
        Some(TermRef::from(Literal::from(true).as_ref()))
    );
    assert_eq!(graph.triples_for_predicate(sh::CLOSED).count(), 1);
    assert_eq!(graph.triples_for_predicate(sh::PROPERTY).count(), 0);

    let head = graph
        .object_for_subject_predicate(shape, sh::IGNORED_PROPERTIES)
        .ok_or("closed shape has no ignored properties")?;
    assert_eq!(read_list(graph, as_subject(head)?), vec![neo("id")]);
    assert_eq!(graph.triples_for_predicate(rdf::FIRST).count(), 1);
    Ok(())
}

#[test]
fn suite_keeps_shapes_apart() -> Result<(), Box<dyn Error>> {
    let mut person = Shape::for_label("Person")?;
    person.expect(Constraint::IncomingRelationshipCount {
        relationship: "MANAGES".into(),
        min: None,
        max: Some(1),
    })?;
    let mut anything = Shape::for_all()?;
    anything.expect(Constraint::NodeTypesIn {
        types: vec!["Person".into(), "Company".into()],
    })?;
    let expected = person.len() + anything.len();

    let mut suite = Suite::new();
    suite.add_expectations([person, anything]);

    assert_eq!(suite.len(), expected);
    assert_eq!(shape_nodes(suite.graph()).len(), 2);
    assert_eq!(suite.graph().triples_for_predicate(sh::INVERSE_PATH).count(), 1);
    assert_eq!(
        suite
            .graph()
            .triples_for_predicate(sh::TARGET_QUERY)
            .filter(|t| t.object == TermRef::from(LiteralRef::new_simple_literal("true")))
            .count(),
        1
    );
    Ok(())
}
