use tracing::debug;

use crate::ast::Expression;
use crate::quantifier::{QuantifierType, RepetitionKind};

/// Appends `fragment` to the tree built so far.
///
/// Literals merge, alternations are grouped before they are concatenated
/// and nested sequences are spliced.
///
/// Example:
/// - `a` + `b` → Literal("ab")
/// - `cat|dog` + `x` → Seq([Group(Alt), Literal("x")])
pub fn append(current: Expression, fragment: Expression) -> Expression {
    match (current, fragment) {
        (current, Expression::Empty) => current,
        (Expression::Empty, fragment) => fragment,
        (Expression::Seq(mut children), fragment) => {
            push_child(&mut children, fragment);
            Expression::Seq(children)
        }
        (Expression::Literal(mut text), Expression::Literal(more)) => {
            text.push_str(&more);
            Expression::Literal(text)
        }
        (current, fragment) => {
            let mut children = vec![group_alternation(current)];
            push_child(&mut children, fragment);
            Expression::Seq(children)
        }
    }
}

fn group_alternation(node: Expression) -> Expression {
    match node {
        Expression::Alt(_) => {
            debug!("grouping alternation inside a sequence");
            node.grouped()
        }
        node => node,
    }
}

fn push_child(children: &mut Vec<Expression>, fragment: Expression) {
    match fragment {
        Expression::Empty => {}
        Expression::Seq(more) => {
            for child in more {
                push_child(children, child);
            }
        }
        Expression::Literal(more) => match children.last_mut() {
            Some(Expression::Literal(text)) => text.push_str(&more),
            _ => children.push(Expression::Literal(more)),
        },
        fragment => children.push(group_alternation(fragment)),
    }
}

/// Builds a repetition of `content`, grouping it when the postfix would
/// otherwise bind to its last atom only.
///
/// Repeating nothing yields nothing.
pub fn repeat(content: Expression, quantifier: QuantifierType, kind: RepetitionKind) -> Expression {
    let content = match content {
        Expression::Empty => return Expression::Empty,
        content if content.needs_grouping() => content.grouped(),
        content => content,
    };
    Expression::Repetition {
        content: Box::new(content),
        quantifier,
        kind,
    }
}

/// Combines alternatives, flattening nested alternations.
///
/// No alternative gives `Empty`, a single one is returned as is.
pub fn alternate(alternatives: Vec<Expression>) -> Expression {
    let mut children = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        match alternative {
            Expression::Empty => {}
            Expression::Alt(more) => children.extend(more),
            alternative => children.push(alternative),
        }
    }

    match children.len() {
        0 => Expression::Empty,
        1 => children.remove(0),
        _ => Expression::Alt(children),
    }
}
