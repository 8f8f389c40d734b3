//! Backend adapters for value-aggregate contract synthesis.
//!
//! Each target spells array content equality and hashing differently:
//!
//! | Backend | Equals | Hash | Shape |
//! |---|---|---|---|
//! | JS | `a.contentEquals(b)` | `a.contentHashCode()` | extension |
//! | JVM | `java.util.Arrays.equals(a, b)` | `java.util.Arrays.hashCode(a)` | static |
//! | Native | `Kotlin_IntArray_contentEquals(a, b)` | `Kotlin_IntArray_contentHashCode(a)` | static |
//!
//! An adapter registers one primitive per element category and tells the
//! synthesizer how to call it. Each registered symbol names a single
//! overload (`kotlin.collections.IntArray.contentEquals`,
//! `java.util.Arrays.equals([I[I)Z`); rendered bodies show the call
//! spelling. Everything else is shared.

mod js;
mod jvm;
mod native;

use std::fmt;
use std::str::FromStr;
use std::sync::Once;

use tracing::debug;
use vac_derive::{
    ArrayContentStrategy, ArrayPrimitiveRegistry, PassSummary, SynthError, SynthOptions,
    SynthesisPass,
};
use vac_ir::{ElementCategory, Module, Pool, PrimitiveKind, StringInterner};

pub use js::JsBackend;
pub use jvm::JvmBackend;
pub use native::NativeBackend;

/// A code generation target.
pub trait TargetBackend: ArrayContentStrategy {
    /// Register this target's content primitives for every element category.
    fn register_primitives(&self, interner: &StringInterner, registry: &mut ArrayPrimitiveRegistry);
}

/// Every element category a backend must cover.
pub fn element_categories() -> impl Iterator<Item = ElementCategory> {
    PrimitiveKind::ALL
        .iter()
        .map(|&kind| ElementCategory::Primitive(kind))
        .chain(std::iter::once(ElementCategory::Reference))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    Js,
    Jvm,
    Native,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Js, Backend::Jvm, Backend::Native];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Js => "js",
            Backend::Jvm => "jvm",
            Backend::Native => "native",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, UnknownBackend> {
        match name {
            "js" => Ok(Backend::Js),
            "jvm" => Ok(Backend::Jvm),
            "native" => Ok(Backend::Native),
            other => Err(UnknownBackend {
                name: other.to_owned(),
            }),
        }
    }

    /// A registry filled with this backend's primitives.
    pub fn registry(self, interner: &StringInterner) -> ArrayPrimitiveRegistry {
        let mut registry = ArrayPrimitiveRegistry::new();
        match self {
            Backend::Js => JsBackend.register_primitives(interner, &mut registry),
            Backend::Jvm => JvmBackend.register_primitives(interner, &mut registry),
            Backend::Native => NativeBackend.register_primitives(interner, &mut registry),
        }
        registry
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::from_name(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownBackend {
    pub name: String,
}

impl fmt::Display for UnknownBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown backend `{}` (expected one of: js, jvm, native)",
            self.name
        )
    }
}

impl std::error::Error for UnknownBackend {}

/// Synthesize contracts for `module` with `backend`'s primitives.
pub fn synthesize_for_backend(
    module: &mut Module,
    interner: &StringInterner,
    pool: &Pool,
    backend: Backend,
    options: SynthOptions,
) -> Result<PassSummary, SynthError> {
    match backend {
        Backend::Js => synthesize_with(module, interner, pool, &JsBackend, options),
        Backend::Jvm => synthesize_with(module, interner, pool, &JvmBackend, options),
        Backend::Native => synthesize_with(module, interner, pool, &NativeBackend, options),
    }
}

/// Synthesize contracts for `module` with any adapter.
pub fn synthesize_with<B: TargetBackend>(
    module: &mut Module,
    interner: &StringInterner,
    pool: &Pool,
    adapter: &B,
    options: SynthOptions,
) -> Result<PassSummary, SynthError> {
    let mut registry = ArrayPrimitiveRegistry::new();
    adapter.register_primitives(interner, &mut registry);
    debug!(
        backend = adapter.backend_name(),
        primitives = registry.len(),
        "registered array content primitives"
    );
    SynthesisPass::new(interner, pool, &registry, adapter, options).run(module)
}

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber for synthesis diagnostics.
///
/// Reads the filter from `VAC_LOG`, falling back to `RUST_LOG`. Does nothing
/// when neither is set. Safe to call multiple times.
/// Enable with `VAC_LOG=vac_derive=debug` or `VAC_LOG=vac_derive::synth=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("VAC_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::new(directives))
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
