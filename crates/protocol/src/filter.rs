//! Server-side object filters.
//!
//! A [`Filter`] is either a property predicate or a boolean combination of
//! other filters. Filters are never evaluated locally; they serialize into the
//! `inFilter` element of class and children queries.
//!
//! ```text
//! <and>
//!   <ge class="computeBlade" property="totalMemory" value="2048"/>
//!   <eq class="computeBlade" property="chassisId" value="3"/>
//! </and>
//! ```

use serde::ser::{Error as _, SerializeStruct, SerializeStructVariant};
use serde::{Serialize, Serializer};

/// Comparison applied by a property predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	Equal,
	NotEqual,
	GreaterThan,
	GreaterOrEqual,
	LessThan,
	LessOrEqual,
	/// Regular-expression match on the property value.
	Wildcard,
	AnyBits,
	AllBits,
	/// Inclusive range; the only operator that takes a second value.
	Between,
}

impl Operator {
	/// Wire element name.
	pub fn tag(self) -> &'static str {
		match self {
			Self::Equal => "eq",
			Self::NotEqual => "ne",
			Self::GreaterThan => "gt",
			Self::GreaterOrEqual => "ge",
			Self::LessThan => "lt",
			Self::LessOrEqual => "le",
			Self::Wildcard => "wcard",
			Self::AnyBits => "anybit",
			Self::AllBits => "allbits",
			Self::Between => "bw",
		}
	}

	fn index(self) -> u32 {
		self as u32
	}
}

/// Boolean combinator over child filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
	And,
	Or,
	Not,
}

impl Combinator {
	/// Wire element name.
	pub fn tag(self) -> &'static str {
		match self {
			Self::And => "and",
			Self::Or => "or",
			Self::Not => "not",
		}
	}

	fn index(self) -> u32 {
		10 + self as u32
	}
}

/// A single property test: `class.property <op> value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
	pub operator: Operator,
	pub class: String,
	pub property: String,
	pub value: String,
	/// Upper bound for [`Operator::Between`]; ignored by every other operator.
	pub second_value: Option<String>,
}

impl Serialize for Predicate {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let op = self.operator;
		if op == Operator::Between {
			let second = self
				.second_value
				.as_ref()
				.ok_or_else(|| S::Error::custom(format!("between filter on {}.{} has no second value", self.class, self.property)))?;
			let mut s = serializer.serialize_struct_variant("Filter", op.index(), op.tag(), 4)?;
			s.serialize_field("@class", &self.class)?;
			s.serialize_field("@property", &self.property)?;
			s.serialize_field("@firstValue", &self.value)?;
			s.serialize_field("@secondValue", second)?;
			s.end()
		} else {
			let mut s = serializer.serialize_struct_variant("Filter", op.index(), op.tag(), 3)?;
			s.serialize_field("@class", &self.class)?;
			s.serialize_field("@property", &self.property)?;
			s.serialize_field("@value", &self.value)?;
			s.end()
		}
	}
}

/// A filter expression tree.
///
/// Children of a composite are serialized in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
	Leaf(Predicate),
	Composite { op: Combinator, children: Vec<Filter> },
}

impl Filter {
	/// Builds a predicate with a single comparison value.
	pub fn property(operator: Operator, class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Leaf(Predicate {
			operator,
			class: class.into(),
			property: property.into(),
			value: value.into(),
			second_value: None,
		})
	}

	pub fn eq(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::Equal, class, property, value)
	}

	pub fn ne(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::NotEqual, class, property, value)
	}

	pub fn gt(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::GreaterThan, class, property, value)
	}

	pub fn ge(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::GreaterOrEqual, class, property, value)
	}

	pub fn lt(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::LessThan, class, property, value)
	}

	pub fn le(class: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
		Self::property(Operator::LessOrEqual, class, property, value)
	}

	/// Matches `value` as a regular expression against the property.
	pub fn wildcard(class: impl Into<String>, property: impl Into<String>, pattern: impl Into<String>) -> Self {
		Self::property(Operator::Wildcard, class, property, pattern)
	}

	pub fn any_bits(class: impl Into<String>, property: impl Into<String>, mask: impl Into<String>) -> Self {
		Self::property(Operator::AnyBits, class, property, mask)
	}

	pub fn all_bits(class: impl Into<String>, property: impl Into<String>, mask: impl Into<String>) -> Self {
		Self::property(Operator::AllBits, class, property, mask)
	}

	pub fn between(
		class: impl Into<String>,
		property: impl Into<String>,
		first: impl Into<String>,
		second: impl Into<String>,
	) -> Self {
		Self::Leaf(Predicate {
			operator: Operator::Between,
			class: class.into(),
			property: property.into(),
			value: first.into(),
			second_value: Some(second.into()),
		})
	}

	pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
		Self::composite(Combinator::And, children)
	}

	pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
		Self::composite(Combinator::Or, children)
	}

	/// Negates the conjunction of `children`.
	pub fn not(children: impl IntoIterator<Item = Filter>) -> Self {
		Self::composite(Combinator::Not, children)
	}

	pub fn composite(op: Combinator, children: impl IntoIterator<Item = Filter>) -> Self {
		Self::Composite {
			op,
			children: children.into_iter().collect(),
		}
	}

	/// Wire element name of the outermost node.
	pub fn tag(&self) -> &'static str {
		match self {
			Self::Leaf(predicate) => predicate.operator.tag(),
			Self::Composite { op, .. } => op.tag(),
		}
	}
}

impl Serialize for Filter {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Leaf(predicate) => predicate.serialize(serializer),
			Self::Composite { op, children } => {
				let mut s = serializer.serialize_struct_variant("Filter", op.index(), op.tag(), 1)?;
				s.serialize_field("$value", children)?;
				s.end()
			}
		}
	}
}

/// The `inFilter` element wrapping a request's filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFilter(pub Filter);

impl From<Filter> for InFilter {
	fn from(filter: Filter) -> Self {
		Self(filter)
	}
}

impl Serialize for InFilter {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut s = serializer.serialize_struct("inFilter", 1)?;
		s.serialize_field("$value", &self.0)?;
		s.end()
	}
}
