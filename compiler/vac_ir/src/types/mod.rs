//! Resolved types for value-aggregate properties and constant values.
//!
//! `Idx` is a 32-bit handle into a [`Pool`]. Primitive and built-in
//! reference types have fixed indices; arrays, classes, enums and nullable
//! types are interned on demand, so structurally equal types always share one
//! `Idx` and type equality is index equality.
//!
//! Every entry carries pre-computed [`TypeFlags`], so the questions the
//! synthesizer asks ("is this an array?", "is this nullable?") are O(1).

use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::{Name, StringInterner};

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Pre-interned types (indices 0-11) ===

    pub const BOOLEAN: Self = Self(0);
    pub const BYTE: Self = Self(1);
    pub const SHORT: Self = Self(2);
    pub const CHAR: Self = Self(3);
    pub const INT: Self = Self(4);
    pub const LONG: Self = Self(5);
    pub const FLOAT: Self = Self(6);
    pub const DOUBLE: Self = Self(7);
    /// The built-in string type.
    pub const STRING: Self = Self(8);
    /// The top reference type.
    pub const ANY: Self = Self(9);
    /// The unit type. Never a legal property type.
    pub const UNIT: Self = Self(10);
    /// Placeholder left behind by a failed resolution upstream.
    pub const ERROR: Self = Self(11);

    /// Number of pre-interned types.
    pub const PRIMITIVE_COUNT: u32 = 12;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned types.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BOOLEAN => write!(f, "Idx::BOOLEAN"),
            Self::BYTE => write!(f, "Idx::BYTE"),
            Self::SHORT => write!(f, "Idx::SHORT"),
            Self::CHAR => write!(f, "Idx::CHAR"),
            Self::INT => write!(f, "Idx::INT"),
            Self::LONG => write!(f, "Idx::LONG"),
            Self::FLOAT => write!(f, "Idx::FLOAT"),
            Self::DOUBLE => write!(f, "Idx::DOUBLE"),
            Self::STRING => write!(f, "Idx::STRING"),
            Self::ANY => write!(f, "Idx::ANY"),
            Self::UNIT => write!(f, "Idx::UNIT"),
            Self::ERROR => write!(f, "Idx::ERROR"),
            Self::NONE => write!(f, "Idx::NONE"),
            _ => write!(f, "Idx({})", self.0),
        }
    }
}

/// Primitive value categories with a native comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: &'static [PrimitiveKind] = &[
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// The pre-interned type for this primitive.
    pub const fn idx(self) -> Idx {
        match self {
            PrimitiveKind::Boolean => Idx::BOOLEAN,
            PrimitiveKind::Byte => Idx::BYTE,
            PrimitiveKind::Short => Idx::SHORT,
            PrimitiveKind::Char => Idx::CHAR,
            PrimitiveKind::Int => Idx::INT,
            PrimitiveKind::Long => Idx::LONG,
            PrimitiveKind::Float => Idx::FLOAT,
            PrimitiveKind::Double => Idx::DOUBLE,
        }
    }

    /// Source-level name (`Int`, `Boolean`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }
}

/// Element category of an array type.
///
/// Primitive-element arrays and reference-element arrays need different
/// content-comparison routines on every target, so backend primitives are
/// registered per category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementCategory {
    /// `IntArray`, `ByteArray`, ...
    Primitive(PrimitiveKind),
    /// `Array<T>` for any reference `T`.
    Reference,
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementCategory::Primitive(kind) => write!(f, "{}Array", kind.name()),
            ElementCategory::Reference => write!(f, "Array"),
        }
    }
}

/// Structure of an interned type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Primitive(PrimitiveKind),
    String,
    Any,
    Unit,
    Error,
    /// A named class. Value-aggregate declarations are classes.
    Class(Name),
    /// A named enum; values are enum entries.
    Enum(Name),
    /// `Array<T>` with reference elements.
    Array(Idx),
    /// `IntArray`, `ByteArray`, ...
    PrimitiveArray(PrimitiveKind),
    /// `T?`. Never wraps another nullable type.
    Nullable(Idx),
}

bitflags! {
    /// Pre-computed type properties for O(1) queries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// Primitive scalar (`Int`, `Boolean`, ...).
        const IS_PRIMITIVE = 1 << 0;
        /// Any array type.
        const IS_ARRAY = 1 << 1;
        /// Array with primitive elements.
        const IS_PRIMITIVE_ARRAY = 1 << 2;
        /// Named class or enum.
        const IS_NAMED = 1 << 3;
        /// Enum type.
        const IS_ENUM = 1 << 4;
        /// Admits `null`.
        const IS_NULLABLE = 1 << 5;
        /// Error placeholder.
        const IS_ERROR = 1 << 6;
    }
}

impl TypeFlags {
    fn compute(data: TypeData, inner: Option<TypeFlags>) -> Self {
        match data {
            TypeData::Primitive(_) => TypeFlags::IS_PRIMITIVE,
            TypeData::String | TypeData::Any | TypeData::Unit => TypeFlags::empty(),
            TypeData::Error => TypeFlags::IS_ERROR,
            TypeData::Class(_) => TypeFlags::IS_NAMED,
            TypeData::Enum(_) => TypeFlags::IS_NAMED | TypeFlags::IS_ENUM,
            TypeData::Array(_) => TypeFlags::IS_ARRAY,
            TypeData::PrimitiveArray(_) => TypeFlags::IS_ARRAY | TypeFlags::IS_PRIMITIVE_ARRAY,
            TypeData::Nullable(_) => inner.unwrap_or_else(TypeFlags::empty) | TypeFlags::IS_NULLABLE,
        }
    }
}

#[derive(Clone, Debug)]
struct TypeEntry {
    data: TypeData,
    flags: TypeFlags,
}

/// Interning pool for types.
///
/// Built by the front end before synthesis runs; the synthesis pass only
/// reads it (`&Pool` is shared across worker threads).
#[derive(Clone, Debug)]
pub struct Pool {
    entries: Vec<TypeEntry>,
    dedup: FxHashMap<TypeData, Idx>,
}

impl Pool {
    /// Create a pool with all pre-interned types in place.
    pub fn new() -> Self {
        let mut pool = Self {
            entries: Vec::with_capacity(64),
            dedup: FxHashMap::default(),
        };
        for &kind in PrimitiveKind::ALL {
            pool.intern(TypeData::Primitive(kind));
        }
        pool.intern(TypeData::String);
        pool.intern(TypeData::Any);
        pool.intern(TypeData::Unit);
        pool.intern(TypeData::Error);
        debug_assert_eq!(pool.entries.len(), Idx::PRIMITIVE_COUNT as usize);
        pool
    }

    fn intern(&mut self, data: TypeData) -> Idx {
        if let Some(&idx) = self.dedup.get(&data) {
            return idx;
        }
        let inner = match data {
            TypeData::Nullable(inner) => Some(self.flags(inner)),
            _ => None,
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "type pools never exceed u32::MAX entries"
        )]
        let idx = Idx::from_raw(self.entries.len() as u32);
        self.entries.push(TypeEntry {
            data,
            flags: TypeFlags::compute(data, inner),
        });
        self.dedup.insert(data, idx);
        idx
    }

    /// The pre-interned type for a primitive kind.
    pub fn primitive(&self, kind: PrimitiveKind) -> Idx {
        kind.idx()
    }

    pub fn class(&mut self, name: Name) -> Idx {
        self.intern(TypeData::Class(name))
    }

    pub fn enum_type(&mut self, name: Name) -> Idx {
        self.intern(TypeData::Enum(name))
    }

    /// `Array<element>`. A primitive element still yields a boxed array;
    /// use [`primitive_array`](Self::primitive_array) for `IntArray` and friends.
    pub fn array(&mut self, element: Idx) -> Idx {
        self.intern(TypeData::Array(element))
    }

    pub fn primitive_array(&mut self, kind: PrimitiveKind) -> Idx {
        self.intern(TypeData::PrimitiveArray(kind))
    }

    /// `inner?`. Nullable of a nullable type is the type itself.
    pub fn nullable(&mut self, inner: Idx) -> Idx {
        if self.is_nullable(inner) {
            return inner;
        }
        self.intern(TypeData::Nullable(inner))
    }

    /// Structure of `idx`, or `None` for indices this pool never produced.
    pub fn data(&self, idx: Idx) -> Option<TypeData> {
        self.entries.get(idx.index()).map(|e| e.data)
    }

    /// Flags of `idx`; unknown indices have no flags.
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.entries
            .get(idx.index())
            .map_or(TypeFlags::empty(), |e| e.flags)
    }

    pub fn is_array(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::IS_ARRAY)
    }

    pub fn is_primitive_array(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::IS_PRIMITIVE_ARRAY)
    }

    pub fn is_nullable(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::IS_NULLABLE)
    }

    /// Strip one level of nullability.
    pub fn non_null(&self, idx: Idx) -> Idx {
        match self.data(idx) {
            Some(TypeData::Nullable(inner)) => inner,
            _ => idx,
        }
    }

    /// Element category of an array type (nullability ignored).
    pub fn element_category(&self, idx: Idx) -> Option<ElementCategory> {
        match self.data(self.non_null(idx))? {
            TypeData::PrimitiveArray(kind) => Some(ElementCategory::Primitive(kind)),
            TypeData::Array(_) => Some(ElementCategory::Reference),
            _ => None,
        }
    }

    /// Number of interned types, including the pre-interned ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render a type the way it is spelled in source.
    pub fn display(&self, idx: Idx, interner: &StringInterner) -> String {
        match self.data(idx) {
            None => format!("<unknown type {}>", idx.raw()),
            Some(TypeData::Primitive(kind)) => kind.name().to_owned(),
            Some(TypeData::String) => "String".to_owned(),
            Some(TypeData::Any) => "Any".to_owned(),
            Some(TypeData::Unit) => "Unit".to_owned(),
            Some(TypeData::Error) => "<error>".to_owned(),
            Some(TypeData::Class(name) | TypeData::Enum(name)) => {
                interner.lookup(name).to_owned()
            }
            Some(TypeData::Array(elem)) => format!("Array<{}>", self.display(elem, interner)),
            Some(TypeData::PrimitiveArray(kind)) => format!("{}Array", kind.name()),
            Some(TypeData::Nullable(inner)) => format!("{}?", self.display(inner, interner)),
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
