use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaOp {
    Eq,
    And,
}

impl CriteriaOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::And => "AND",
        }
    }
}

/// Minimal join condition: aliased column references combined by `=` and `AND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    Field { alias: String, field: String },
    Binary {
        op: CriteriaOp,
        left: Box<Criteria>,
        right: Box<Criteria>,
    },
}

impl Criteria {
    pub fn field(alias: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Field {
            alias: alias.into(),
            field: field.into(),
        }
    }

    pub fn equals(self, other: Criteria) -> Self {
        Self::binary(CriteriaOp::Eq, self, other)
    }

    pub fn and(self, other: Criteria) -> Self {
        Self::binary(CriteriaOp::And, self, other)
    }

    fn binary(op: CriteriaOp, left: Criteria, right: Criteria) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Aliases referenced anywhere in the condition, left to right.
    pub fn aliases(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_aliases(&mut out);
        out
    }

    fn collect_aliases<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Field { alias, .. } => {
                if !out.contains(&alias.as_str()) {
                    out.push(alias.as_str());
                }
            }
            Self::Binary { left, right, .. } => {
                left.collect_aliases(out);
                right.collect_aliases(out);
            }
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { alias, field } => write!(f, "{}.{}", alias, field),
            Self::Binary { op: CriteriaOp::Eq, left, right } => {
                write!(f, "{} = {}", left, right)
            }
            Self::Binary { op, left, right } => {
                write!(f, "({}) {} ({})", left, op.as_sql(), right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_rendering() {
        let on = Criteria::field("jCustomer", "CustomerId").equals(Criteria::field("T0", "CustomerId"));
        assert_eq!(on.to_string(), "jCustomer.CustomerId = T0.CustomerId");
        assert_eq!(on.aliases(), vec!["jCustomer", "T0"]);
    }

    #[test]
    fn test_and_rendering() {
        let on = Criteria::field("a", "X")
            .equals(Criteria::field("T0", "X"))
            .and(Criteria::field("a", "Y").equals(Criteria::field("T0", "Y")));
        assert_eq!(on.to_string(), "(a.X = T0.X) AND (a.Y = T0.Y)");
        assert_eq!(on.aliases(), vec!["a", "T0"]);
    }
}
