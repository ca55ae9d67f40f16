use serde::Serialize;

/// ===============================
/// Domain term value
/// ===============================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainValue {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl From<i64> for DomainValue {
    fn from(v: i64) -> Self {
        DomainValue::Int(v)
    }
}

impl From<bool> for DomainValue {
    fn from(v: bool) -> Self {
        DomainValue::Bool(v)
    }
}

impl From<String> for DomainValue {
    fn from(v: String) -> Self {
        DomainValue::Str(v)
    }
}

impl From<&str> for DomainValue {
    fn from(v: &str) -> Self {
        DomainValue::Str(v.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

/// ===============================
/// One `[field, operator, value]` term
/// ===============================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition(String, Operator, DomainValue);

#[cfg(test)]
impl Condition {
    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn operator(&self) -> Operator {
        self.1
    }

    pub fn value(&self) -> &DomainValue {
        &self.2
    }
}

/// ===============================
/// Search domain (implicit AND of its terms)
/// ===============================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Domain(Vec<Condition>);

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: &str, op: Operator, value: impl Into<DomainValue>) -> Self {
        self.0.push(Condition(field.to_string(), op, value.into()));
        self
    }

    #[cfg(test)]
    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }
}
