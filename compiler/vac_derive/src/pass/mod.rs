//! Whole-module contract synthesis.
//!
//! Runs over every value-aggregate of a module in dependency order and
//! attaches the synthesized contracts. Attachment happens only after every
//! declaration synthesized successfully: on error the module is untouched.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, error, info};
use vac_ir::{
    DeclTable, Module, Name, Pool, StringInterner, SynthesizedContract, ValueAggregateDecl,
};

use crate::order::DependencyOrder;
use crate::plan::PropertyClassifier;
use crate::{
    ArrayContentStrategy, ArrayPrimitiveRegistry, ContractSynthesizer, SynthContext, SynthError,
    SynthOptions,
};

/// Outcome counts of a successful run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Value-aggregates that received a contract.
    pub synthesized: usize,
    /// Other declarations, left as they were.
    pub skipped: usize,
}

/// The synthesis pass for one backend.
pub struct SynthesisPass<'a> {
    interner: &'a StringInterner,
    pool: &'a Pool,
    registry: &'a ArrayPrimitiveRegistry,
    strategy: &'a dyn ArrayContentStrategy,
    options: SynthOptions,
}

impl<'a> SynthesisPass<'a> {
    pub fn new(
        interner: &'a StringInterner,
        pool: &'a Pool,
        registry: &'a ArrayPrimitiveRegistry,
        strategy: &'a dyn ArrayContentStrategy,
        options: SynthOptions,
    ) -> Self {
        Self {
            interner,
            pool,
            registry,
            strategy,
            options,
        }
    }

    /// Synthesize and attach contracts for every value-aggregate in `module`.
    ///
    /// Re-running replaces earlier contracts with identical ones.
    pub fn run(&self, module: &mut Module) -> Result<PassSummary, SynthError> {
        self.options.validate()?;

        let mut contracts = self.synthesize_all(module).inspect_err(|err| {
            error!(
                backend = self.strategy.backend_name(),
                kind = ?err.kind(),
                "{}",
                err.render(self.interner, self.pool)
            );
        })?;

        let mut summary = PassSummary::default();
        for decl in module.value_aggregates_mut() {
            if let Some(contract) = contracts.remove(&decl.name) {
                decl.attach_contract(contract);
                summary.synthesized += 1;
            }
        }
        summary.skipped = module.declarations.len() - summary.synthesized;

        info!(
            backend = self.strategy.backend_name(),
            synthesized = summary.synthesized,
            skipped = summary.skipped,
            "contract synthesis complete"
        );
        Ok(summary)
    }

    /// Every contract of the module, keyed by declaration, without touching
    /// the module.
    fn synthesize_all(
        &self,
        module: &Module,
    ) -> Result<FxHashMap<Name, SynthesizedContract>, SynthError> {
        let table = DeclTable::new(module)?;
        let order = DependencyOrder::compute(&PropertyClassifier::new(self.pool, &table))?;
        order.log(self.interner);

        let cx = SynthContext {
            interner: self.interner,
            pool: self.pool,
            table: &table,
        };
        let mut contracts = FxHashMap::default();
        contracts.reserve(order.len());

        if self.options.parallel {
            for level in order.levels() {
                let decls = resolve(&table, level);
                let results: Vec<(Name, SynthesizedContract)> = decls
                    .par_iter()
                    .map_init(
                        || self.synthesizer(cx),
                        |synth, decl| synth.synthesize(decl).map(|c| (decl.name, c)),
                    )
                    .collect::<Result<_, _>>()?;
                debug!(declarations = results.len(), "synthesized level in parallel");
                contracts.extend(results);
            }
        } else {
            let synth = self.synthesizer(cx);
            for level in order.levels() {
                for decl in resolve(&table, level) {
                    contracts.insert(decl.name, synth.synthesize(decl)?);
                }
            }
        }
        Ok(contracts)
    }

    fn synthesizer<'s>(&'s self, cx: SynthContext<'s>) -> ContractSynthesizer<'s> {
        ContractSynthesizer::new(cx, self.registry, self.strategy, self.options)
    }
}

fn resolve<'m>(table: &DeclTable<'m>, names: &[Name]) -> Vec<&'m ValueAggregateDecl> {
    names.iter().filter_map(|&name| table.get(name)).collect()
}
