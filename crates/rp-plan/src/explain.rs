//! Indented text dump of a plan, one line per node plus its record type

use crate::rel::{
    Aggregate, BiRel, Cross, Fetch, Filter, Join, NamedScan, Project, Rel, RelVisitor, Set,
    SingleInputRel, Sort,
};
use rp_types::Type;
use std::fmt::{self, Write};

/// Render a plan; children are indented two spaces below their parent
pub fn explain(rel: &Rel) -> String {
    let mut printer = ExplainPrinter::default();
    let mut depth = 0;
    match printer.visit(rel, &mut depth) {
        Ok(()) => printer.out,
        Err(fmt::Error) => {
            log::warn!("Failed to render {} plan", rel.name());
            printer.out
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&explain(self))
    }
}

#[derive(Default)]
struct ExplainPrinter {
    out: String,
}

fn join_display<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExplainPrinter {
    fn line(&mut self, depth: usize, name: &str, record_type: &Type, detail: &str) -> fmt::Result {
        let prefix = "  ".repeat(depth);
        if detail.is_empty() {
            writeln!(self.out, "{prefix}{name} -> {record_type}")
        } else {
            writeln!(self.out, "{prefix}{name}: {detail} -> {record_type}")
        }
    }

    fn visit(&mut self, rel: &Rel, depth: &mut usize) -> fmt::Result {
        rel.accept(self, depth)
    }

    fn children(&mut self, inputs: &[&Rel], depth: &mut usize) -> fmt::Result {
        *depth += 1;
        for input in inputs {
            self.visit(input, depth)?;
        }
        *depth -= 1;
        Ok(())
    }
}

impl RelVisitor<usize, (), fmt::Error> for ExplainPrinter {
    fn visit_named_scan(&mut self, rel: &NamedScan, depth: &mut usize) -> fmt::Result {
        let detail = format!(
            "{} [{}]",
            rel.names().join("."),
            rel.schema().column_names().join(", ")
        );
        self.line(*depth, "NamedScan", rel.record_type(), &detail)
    }

    fn visit_filter(&mut self, rel: &Filter, depth: &mut usize) -> fmt::Result {
        self.line(*depth, "Filter", rel.record_type(), &rel.condition().to_string())?;
        self.children(&[rel.input()], depth)
    }

    fn visit_project(&mut self, rel: &Project, depth: &mut usize) -> fmt::Result {
        let detail = format!("[{}]", join_display(rel.expressions()));
        self.line(*depth, "Project", rel.record_type(), &detail)?;
        self.children(&[rel.input()], depth)
    }

    fn visit_sort(&mut self, rel: &Sort, depth: &mut usize) -> fmt::Result {
        let keys = rel
            .sorts()
            .iter()
            .map(|s| format!("{} {}", s.expression, s.direction));
        let detail = format!("[{}]", join_display(keys));
        self.line(*depth, "Sort", rel.record_type(), &detail)?;
        self.children(&[rel.input()], depth)
    }

    fn visit_fetch(&mut self, rel: &Fetch, depth: &mut usize) -> fmt::Result {
        let mut detail = format!("offset={}", rel.offset());
        if let Some(count) = rel.count() {
            detail.push_str(&format!(", count={count}"));
        }
        self.line(*depth, "Fetch", rel.record_type(), &detail)?;
        self.children(&[rel.input()], depth)
    }

    fn visit_cross(&mut self, rel: &Cross, depth: &mut usize) -> fmt::Result {
        self.line(*depth, "Cross", rel.record_type(), "")?;
        self.children(&[rel.left(), rel.right()], depth)
    }

    fn visit_join(&mut self, rel: &Join, depth: &mut usize) -> fmt::Result {
        let mut detail = format!("{} ON {}", rel.join_type(), rel.condition());
        if let Some(filter) = rel.post_join_filter() {
            detail.push_str(&format!(" WHERE {filter}"));
        }
        self.line(*depth, "Join", rel.record_type(), &detail)?;
        self.children(&[rel.left(), rel.right()], depth)
    }

    fn visit_set(&mut self, rel: &Set, depth: &mut usize) -> fmt::Result {
        self.line(*depth, "Set", rel.record_type(), &rel.op().to_string())?;
        let inputs: Vec<&Rel> = rel.inputs().iter().collect();
        self.children(&inputs, depth)
    }

    fn visit_aggregate(&mut self, rel: &Aggregate, depth: &mut usize) -> fmt::Result {
        let groupings = rel
            .groupings()
            .iter()
            .map(|g| format!("({})", join_display(&g.expressions)));
        let measures = rel.measures().iter().map(|m| match &m.pre_measure_filter {
            Some(filter) => format!("{} FILTER {filter}", m.function),
            None => m.function.to_string(),
        });
        let detail = format!(
            "groupings=[{}] measures=[{}]",
            join_display(groupings),
            join_display(measures)
        );
        self.line(*depth, "Aggregate", rel.record_type(), &detail)?;
        self.children(&[rel.input()], depth)
    }
}
