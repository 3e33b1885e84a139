//! Column references, select expressions and ordering.

use crate::query::predicate::{CompareOp, Operand, Predicate};
use rusqlite::types::Value;

/// Column of the `members m` or `teams t` relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    MemberName,
    MemberAge,
    /// Foreign key on the member row; readable without any join.
    MemberTeamId,
    TeamId,
    TeamName,
}

impl Column {
    /// Alias-qualified SQL reference, e.g. `m.age`.
    pub fn qualified(self) -> &'static str {
        match self {
            Self::MemberId => "m.member_id",
            Self::MemberName => "m.username",
            Self::MemberAge => "m.age",
            Self::MemberTeamId => "m.team_id",
            Self::TeamId => "t.team_id",
            Self::TeamName => "t.name",
        }
    }

    /// Bare column name, used on the left side of `SET`.
    pub fn name(self) -> &'static str {
        match self {
            Self::MemberId => "member_id",
            Self::MemberName => "username",
            Self::MemberAge => "age",
            Self::MemberTeamId | Self::TeamId => "team_id",
            Self::TeamName => "name",
        }
    }

    /// Whether reading this column needs `teams t` in the FROM clause.
    pub fn is_team(self) -> bool {
        matches!(self, Self::TeamId | Self::TeamName)
    }

    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            column: self,
            op,
            operand: Operand::Value(value.into()),
        }
    }

    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    pub fn loe(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Le, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    pub fn goe(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Ge, value)
    }

    /// Inclusive range check.
    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Predicate {
        Predicate::Between {
            column: self,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn is_null(self) -> Predicate {
        Predicate::IsNull {
            column: self,
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNull {
            column: self,
            negated: true,
        }
    }

    /// Column-to-column equality, e.g. `m.username = t.name` for theta joins.
    pub fn eq_column(self, other: Column) -> Predicate {
        Predicate::Compare {
            column: self,
            op: CompareOp::Eq,
            operand: Operand::Column(other),
        }
    }

    pub fn asc(self) -> OrderSpecifier {
        OrderSpecifier::new(self, Direction::Asc)
    }

    pub fn desc(self) -> OrderSpecifier {
        OrderSpecifier::new(self, Direction::Desc)
    }
}

/// Select-list expression for tuple projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr {
    Column(Column),
    /// `COUNT(*)`
    Count,
    Sum(Column),
    Avg(Column),
    Max(Column),
    Min(Column),
}

impl Expr {
    pub fn render(&self) -> String {
        match self {
            Self::Column(column) => column.qualified().to_string(),
            Self::Count => "COUNT(*)".to_string(),
            Self::Sum(column) => format!("SUM({})", column.qualified()),
            Self::Avg(column) => format!("AVG({})", column.qualified()),
            Self::Max(column) => format!("MAX({})", column.qualified()),
            Self::Min(column) => format!("MIN({})", column.qualified()),
        }
    }

    pub fn references_team(&self) -> bool {
        match self {
            Self::Count => false,
            Self::Column(column)
            | Self::Sum(column)
            | Self::Avg(column)
            | Self::Max(column)
            | Self::Min(column) => column.is_team(),
        }
    }
}

impl From<Column> for Expr {
    fn from(value: Column) -> Self {
        Self::Column(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Placement of NULLs; `Default` leaves it to SQLite (NULLs sort lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullOrdering {
    #[default]
    Default,
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpecifier {
    pub column: Column,
    pub direction: Direction,
    pub nulls: NullOrdering,
}

impl OrderSpecifier {
    pub fn new(column: Column, direction: Direction) -> Self {
        Self {
            column,
            direction,
            nulls: NullOrdering::Default,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullOrdering::First;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullOrdering::Last;
        self
    }

    pub fn render(&self) -> String {
        let direction = match self.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        let nulls = match self.nulls {
            NullOrdering::Default => "",
            NullOrdering::First => " NULLS FIRST",
            NullOrdering::Last => " NULLS LAST",
        };
        format!("{} {direction}{nulls}", self.column.qualified())
    }
}
