use super::{record, required, Rel, RelVisitor};
use crate::error::{PlanError, PlanResult};
use crate::schema::NamedStruct;
use rp_types::Type;
use serde::Serialize;

/// Leaf scan of a table identified by its (possibly qualified) name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedScan {
    names: Vec<String>,
    schema: NamedStruct,
    record_type: Type,
}

impl NamedScan {
    pub fn builder() -> NamedScanBuilder {
        NamedScanBuilder::default()
    }

    /// Name parts, outermost first (e.g. `["sales", "orders"]`)
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn schema(&self) -> &NamedStruct {
        &self.schema
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_named_scan(self, ctx)
    }
}

#[derive(Debug, Default)]
pub struct NamedScanBuilder {
    names: Vec<String>,
    schema: Option<NamedStruct>,
}

impl NamedScanBuilder {
    pub fn names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn schema(mut self, schema: NamedStruct) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(self) -> PlanResult<NamedScan> {
        let schema = required(self.schema, "NamedScan", "schema")?;
        if self.names.is_empty() || self.names.iter().any(|n| n.trim().is_empty()) {
            return Err(PlanError::MissingField {
                node: "NamedScan",
                field: "names",
            });
        }
        let record_type = record(schema.field_types().iter().cloned());
        Ok(NamedScan {
            names: self.names,
            schema,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::NamedScan)
    }
}
