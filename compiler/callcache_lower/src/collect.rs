//! Site collection (phase 1).
//!
//! Walks every function body and every static-field initializer, recording
//! each conversion node together with its enclosing type, enclosing
//! function, quoted-context flag and static-initializer flag.
//!
//! A root is static initialization when it is a field initializer or the
//! body of a static constructor, including local functions declared inside
//! one. Every site under such a root carries the flag, lambdas included.
//!
//! # Ordering
//!
//! Collection may run in parallel across roots, so the raw order is not
//! meaningful. The result is sorted by `(span, expr)` before it is
//! returned; every later phase assigns ordinals in that order.

use callcache_ir::visitor::children;
use callcache_ir::{ConversionOrigin, ExprId, ExprKind, FuncId, Program, Span, TypeDefId, TypeId};
use rayon::prelude::*;

use crate::{ConversionSite, LowerError};

/// A body to walk: a function body or a static-field initializer.
#[derive(Copy, Clone, Debug)]
struct Root {
    expr: ExprId,
    enclosing_type: TypeDefId,
    enclosing_func: Option<FuncId>,
    /// The root runs as part of static initialization.
    static_init: bool,
}

/// Collect every conversion site of `program`, sorted in source order.
pub fn collect_sites(program: &Program, parallel: bool) -> Result<Vec<ConversionSite>, LowerError> {
    let roots = roots(program);

    let per_root: Vec<Result<Vec<ConversionSite>, LowerError>> = if parallel {
        roots
            .par_iter()
            .map(|root| collect_root(program, *root))
            .collect()
    } else {
        roots
            .iter()
            .map(|root| collect_root(program, *root))
            .collect()
    };

    let mut sites = Vec::new();
    for result in per_root {
        sites.extend(result?);
    }
    sites.sort_by_key(|site| (site.span, site.expr));

    tracing::debug!(
        roots = roots.len(),
        sites = sites.len(),
        parallel,
        "collected conversion sites",
    );
    Ok(sites)
}

fn roots(program: &Program) -> Vec<Root> {
    let mut roots = Vec::new();
    for func in program.func_ids() {
        let def = program.func(func);
        if let Some(body) = def.body {
            roots.push(Root {
                expr: body,
                enclosing_type: def.owner,
                enclosing_func: Some(func),
                static_init: program.in_static_constructor(func),
            });
        }
    }
    for ty in program.type_def_ids() {
        for field in &program.type_def(ty).statics {
            if let Some(init) = field.init {
                roots.push(Root {
                    expr: init,
                    enclosing_type: ty,
                    enclosing_func: None,
                    static_init: true,
                });
            }
        }
    }
    roots
}

fn collect_root(program: &Program, root: Root) -> Result<Vec<ConversionSite>, LowerError> {
    let mut collector = SiteCollector {
        program,
        root,
        quote_depth: 0,
        sites: Vec::new(),
    };
    collector.collect_expr(root.expr)?;
    Ok(collector.sites)
}

struct SiteCollector<'a> {
    program: &'a Program,
    root: Root,
    quote_depth: u32,
    sites: Vec<ConversionSite>,
}

impl SiteCollector<'_> {
    fn collect_expr(&mut self, id: ExprId) -> Result<(), LowerError> {
        let program = self.program;
        let arena = &program.arena;
        if !arena.contains(id) {
            return Err(LowerError::UnknownSymbol {
                kind: "expression",
                index: id.raw(),
                span: self.root_span(),
            });
        }

        match arena.kind(id) {
            ExprKind::Quote(inner) => {
                self.quote_depth += 1;
                let result = self.collect_expr(*inner);
                self.quote_depth -= 1;
                return result;
            }
            ExprKind::Convert {
                source,
                target,
                origin,
            } => {
                self.record(id, *source, *target, *origin)?;
            }
            _ => {}
        }

        for child in children(arena, id) {
            self.collect_expr(child)?;
        }
        Ok(())
    }

    fn record(
        &mut self,
        expr: ExprId,
        source: ExprId,
        target: TypeId,
        origin: ConversionOrigin,
    ) -> Result<(), LowerError> {
        let program = self.program;
        let span = program.arena.span(expr);
        let ExprKind::FuncRef(func_ref) = program.arena.kind(source) else {
            return Err(LowerError::MalformedConversion { expr, span });
        };

        if func_ref.func.index() >= program.funcs.len() {
            return Err(LowerError::UnknownSymbol {
                kind: "function",
                index: func_ref.func.raw(),
                span,
            });
        }
        let expected = program.func_env(func_ref.func).len();
        if func_ref.type_args.len() != expected {
            return Err(LowerError::ArityMismatch {
                func: func_ref.func,
                expected,
                found: func_ref.type_args.len(),
                span,
            });
        }

        self.sites.push(ConversionSite {
            expr,
            source,
            span,
            func_ref: func_ref.clone(),
            target,
            origin,
            enclosing_type: self.root.enclosing_type,
            enclosing_func: self.root.enclosing_func,
            quoted: self.quote_depth > 0,
            static_init: self.root.static_init,
        });
        Ok(())
    }

    fn root_span(&self) -> Span {
        match self.root.enclosing_func {
            Some(func) => self.program.func(func).span,
            None => self.program.type_def(self.root.enclosing_type).span,
        }
    }
}

#[cfg(test)]
mod tests;
