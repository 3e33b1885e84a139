//! Conjunctive filter predicates.
//!
//! # Invariants
//! - `Predicate::always()` (an empty `And`) is the identity of `and`; it
//!   renders to nothing, so a query filtered by it has no WHERE clause.
//! - `and` flattens nested conjunctions; clause order is preserved.
//! - Only AND composition exists. There is no OR and no explicit grouping.

use crate::query::expr::Column;
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(Column),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: Column,
        op: CompareOp,
        operand: Operand,
    },
    Between {
        column: Column,
        low: Value,
        high: Value,
    },
    IsNull {
        column: Column,
        negated: bool,
    },
    And(Vec<Predicate>),
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl Predicate {
    /// The universal predicate: matches every row.
    pub fn always() -> Self {
        Self::And(Vec::new())
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Self::And(clauses) if clauses.is_empty())
    }

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut clauses = self.into_clauses();
        clauses.extend(other.into_clauses());
        Self::from_clauses(clauses)
    }

    /// Conjunction with an optional clause; `None` leaves `self` unchanged.
    pub fn and_opt(self, other: Option<Predicate>) -> Predicate {
        match other {
            Some(other) => self.and(other),
            None => self,
        }
    }

    /// Top-level clauses of this predicate, in order.
    pub fn clauses(&self) -> &[Predicate] {
        match self {
            Self::And(clauses) => clauses,
            single => std::slice::from_ref(single),
        }
    }

    /// Whether evaluating this predicate needs `teams t` in scope.
    pub fn references_team(&self) -> bool {
        match self {
            Self::Compare {
                column, operand, ..
            } => column.is_team() || matches!(operand, Operand::Column(other) if other.is_team()),
            Self::Between { column, .. } | Self::IsNull { column, .. } => column.is_team(),
            Self::And(clauses) => clauses.iter().any(Self::references_team),
        }
    }

    /// Appends this predicate's SQL to `sql` and its bind values to `binds`.
    ///
    /// Renders nothing for `always()`. Callers decide whether a WHERE/AND
    /// keyword is needed by checking `is_always` first.
    pub fn render(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Compare {
                column,
                op,
                operand,
            } => {
                sql.push_str(column.qualified());
                sql.push(' ');
                sql.push_str(op.sql());
                match operand {
                    Operand::Value(value) => {
                        sql.push_str(" ?");
                        binds.push(value.clone());
                    }
                    Operand::Column(other) => {
                        sql.push(' ');
                        sql.push_str(other.qualified());
                    }
                }
            }
            Self::Between { column, low, high } => {
                sql.push_str(column.qualified());
                sql.push_str(" BETWEEN ? AND ?");
                binds.push(low.clone());
                binds.push(high.clone());
            }
            Self::IsNull { column, negated } => {
                sql.push_str(column.qualified());
                sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::And(clauses) => {
                for (index, clause) in clauses.iter().enumerate() {
                    if index > 0 {
                        sql.push_str(" AND ");
                    }
                    clause.render(sql, binds);
                }
            }
        }
    }

    fn into_clauses(self) -> Vec<Predicate> {
        match self {
            Self::And(clauses) => clauses,
            single => vec![single],
        }
    }

    fn from_clauses(mut clauses: Vec<Predicate>) -> Predicate {
        if clauses.len() == 1 {
            if let Some(single) = clauses.pop() {
                return single;
            }
        }
        Self::And(clauses)
    }
}

/// Imperative accumulator: start empty, append clauses conditionally, build.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    clauses: Vec<Predicate>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(&mut self, predicate: Predicate) -> &mut Self {
        self.clauses.extend(predicate.into_clauses());
        self
    }

    /// Whether any clause has been appended.
    pub fn has_value(&self) -> bool {
        !self.clauses.is_empty()
    }

    pub fn build(self) -> Predicate {
        Predicate::from_clauses(self.clauses)
    }
}

/// Folds optional predicates with AND; absent entries are skipped.
pub fn all_of<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    predicates
        .into_iter()
        .fold(Predicate::always(), Predicate::and_opt)
}
