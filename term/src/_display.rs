//! N-Triples / N-Quads rendering of terms and quads.
use crate::ns::xsd;
use crate::{Quad, Term};
use std::fmt;

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal(lit) => {
                f.write_str("\"")?;
                quoted_string(f, lit.value())?;
                f.write_str("\"")?;
                if let Some(tag) = lit.language() {
                    write!(f, "@{tag}")
                } else if lit.datatype() != xsd::string {
                    write!(f, "^^<{}>", lit.datatype())
                } else {
                    Ok(())
                }
            }
            Term::DefaultGraph => Ok(()),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.s(), self.p(), self.o())?;
        if !self.g().is_default_graph() {
            write!(f, " {}", self.g())?;
        }
        f.write_str(" .")
    }
}

fn quoted_string(f: &mut fmt::Formatter<'_>, txt: &str) -> fmt::Result {
    let mut start = 0;
    for (pos, chr) in txt.char_indices() {
        let escaped = match chr {
            '\n' => "\\n",
            '\r' => "\\r",
            '"' => "\\\"",
            '\\' => "\\\\",
            _ => continue,
        };
        f.write_str(&txt[start..pos])?;
        f.write_str(escaped)?;
        start = pos + chr.len_utf8();
    }
    f.write_str(&txt[start..])
}
