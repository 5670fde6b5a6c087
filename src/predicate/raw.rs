//! Infix predicate expressions.
//!
//! Names combined with `&` and `|`, grouped by parentheses; `&` binds
//! tighter. Parsing is a modification of Dijkstra's two-stack
//! algorithm: names and operators collect in a frame per parenthesis
//! group, and each closing paren reduces its frame to a single tree in
//! two left-to-right passes, AND before OR.

use std::fmt;

use crate::errors::MspError;
use crate::predicate::{Child, Name, Predicate};

/// A node of the binary expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Raw {
    Leaf(String),
    And(Box<Raw>, Box<Raw>),
    Or(Box<Raw>, Box<Raw>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
}

/// Operands and operators of one parenthesis group, awaiting its
/// closing paren.
#[derive(Default)]
struct Frame {
    operands: Vec<Raw>,
    operators: Vec<Op>,
}

enum Token<'a> {
    Open,
    Close,
    Operator(Op),
    Name(&'a str),
}

/// Parses an infix expression into a tree.
pub(crate) fn parse(input: &str) -> Result<Raw, MspError> {
    // One synthetic frame around the whole input lets the root reduce
    // like any parenthesized group.
    let mut stack = vec![Frame::default()];
    let mut rest = input.trim();

    while !rest.is_empty() {
        let (token, after) = next_token(rest);
        rest = after.trim_start();
        match token {
            Token::Open => stack.push(Frame::default()),
            Token::Close => {
                if stack.len() == 1 {
                    return Err(invalid("unbalanced ')'"));
                }
                let tree = reduce(stack.pop().expect("checked non-empty"))?;
                stack
                    .last_mut()
                    .expect("synthetic frame")
                    .operands
                    .push(tree);
            }
            Token::Operator(op) => {
                stack.last_mut().expect("synthetic frame").operators.push(op);
            }
            Token::Name(name) => {
                stack
                    .last_mut()
                    .expect("synthetic frame")
                    .operands
                    .push(Raw::Leaf(name.to_string()));
            }
        }
    }

    if stack.len() != 1 {
        return Err(invalid("expression never closed its '('"));
    }
    reduce(stack.pop().expect("synthetic frame"))
}

fn next_token(s: &str) -> (Token<'_>, &str) {
    match s.as_bytes()[0] {
        b'(' => (Token::Open, &s[1..]),
        b')' => (Token::Close, &s[1..]),
        b'&' => (Token::Operator(Op::And), &s[1..]),
        b'|' => (Token::Operator(Op::Or), &s[1..]),
        _ => {
            let end = s
                .find(|c| matches!(c, '&' | '|' | '(' | ')'))
                .unwrap_or(s.len());
            (Token::Name(s[..end].trim_end()), &s[end..])
        }
    }
}

/// Collapses a frame to one tree: AND operators first, then OR, each
/// pass left to right so chains associate leftward.
fn reduce(mut frame: Frame) -> Result<Raw, MspError> {
    if frame.operands.is_empty() {
        return Err(invalid("empty expression group"));
    }
    if frame.operands.len() != frame.operators.len() + 1 {
        return Err(invalid("operators and operands do not line up"));
    }

    for kind in [Op::And, Op::Or] {
        let mut i = 0;
        while i < frame.operators.len() {
            if frame.operators[i] != kind {
                i += 1;
                continue;
            }
            frame.operators.remove(i);
            let right = frame.operands.remove(i + 1);
            let left = std::mem::replace(&mut frame.operands[i], Raw::Leaf(String::new()));
            frame.operands[i] = match kind {
                Op::And => Raw::And(Box::new(left), Box::new(right)),
                Op::Or => Raw::Or(Box::new(left), Box::new(right)),
            };
        }
    }

    debug_assert!(frame.operators.is_empty());
    Ok(frame.operands.pop().expect("exactly one operand remains"))
}

fn invalid(reason: impl Into<String>) -> MspError {
    MspError::InvalidPredicate(reason.into())
}

impl Raw {
    /// AND is a 2-of-2 gate, OR a 1-of-2 gate, a bare name a 1-of-1
    /// gate. Occurrence indices are assigned by the caller afterwards.
    pub(crate) fn into_predicate(self) -> Predicate {
        match self {
            Raw::Leaf(name) => Predicate {
                min: 1,
                children: vec![Child::Name(Name { name, index: 0 })],
            },
            Raw::And(left, right) => Predicate {
                min: 2,
                children: vec![left.into_child(), right.into_child()],
            },
            Raw::Or(left, right) => Predicate {
                min: 1,
                children: vec![left.into_child(), right.into_child()],
            },
        }
    }

    fn into_child(self: Box<Self>) -> Child {
        match *self {
            Raw::Leaf(name) => Child::Name(Name { name, index: 0 }),
            other => Child::Gate(other.into_predicate()),
        }
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raw::Leaf(name) => f.write_str(name),
            Raw::And(left, right) => write!(f, "{} & {}", Operand(left), Operand(right)),
            Raw::Or(left, right) => write!(f, "{} | {}", Operand(left), Operand(right)),
        }
    }
}

/// Wraps non-leaf operands in parentheses when printed inside a parent
/// expression.
struct Operand<'a>(&'a Raw);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Raw::Leaf(name) => f.write_str(name),
            other => write!(f, "({})", other),
        }
    }
}
