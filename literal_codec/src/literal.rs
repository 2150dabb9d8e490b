//! Parsed host literals

use crate::encoder::{encode_bool, encode_float, encode_null, encode_string};

/// A literal as written by the host, before it is checked against a kind
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    /// Wider than `i64` so out-of-range host integers are reported, not
    /// wrapped
    Int(i128),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::None => "None",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Set(_) => "set",
            Literal::Dict(_) => "dict",
        }
    }

    /// Renders the literal in canonical host form
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    fn write_source(&self, out: &mut String) {
        match self {
            Literal::None => out.push_str(encode_null()),
            Literal::Bool(v) => out.push_str(encode_bool(*v)),
            Literal::Int(v) => out.push_str(&v.to_string()),
            Literal::Float(v) => out.push_str(&encode_float(*v)),
            Literal::Str(s) => out.push_str(&encode_string(s)),
            Literal::List(items) => write_seq(out, items, '[', ']'),
            Literal::Tuple(items) => {
                write_seq(out, items, '(', ')');
                if items.len() == 1 {
                    out.insert(out.len() - 1, ',');
                }
            }
            Literal::Set(items) if items.is_empty() => out.push_str("set()"),
            Literal::Set(items) => write_seq(out, items, '{', '}'),
            Literal::Dict(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    key.write_source(out);
                    out.push_str(": ");
                    value.write_source(out);
                }
                out.push('}');
            }
        }
    }
}

fn write_seq(out: &mut String, items: &[Literal], open: char, close: char) {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_source(out);
    }
    out.push(close);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_source() {
        let literal = Literal::Dict(vec![(
            Literal::Str("k".to_string()),
            Literal::Tuple(vec![Literal::Int(1)]),
        )]);
        assert_eq!(literal.to_source(), "{\"k\": (1,)}");
        assert_eq!(Literal::Set(vec![]).to_source(), "set()");
        assert_eq!(Literal::Float(f64::INFINITY).to_source(), "float('inf')");
    }
}
