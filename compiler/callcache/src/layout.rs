//! Human-readable rendering of synthesized cache containers.

use std::fmt::Write as _;

use callcache_ir::{CacheContainer, Constraint, Name, Program, ScopeAnchor};

/// Render every synthesized container of `program`, one block per
/// container, slots in ordinal order:
///
/// ```text
/// C.<>O
///   0 <0>__Target: Action = Target
/// C.<Test>O__2_0<T>
///   where T: Base<T>
///   0 <0>__Generic: Func<T> = Generic<T>
/// ```
pub fn render_layout(program: &Program) -> String {
    let mut out = String::new();
    for container in &program.containers {
        render_container(program, container, &mut out);
    }
    out
}

fn render_container(program: &Program, container: &CacheContainer, out: &mut String) {
    let owner = program.name(program.type_def(container.owner).name);
    let name = display_name(program, container.name, container.id.raw());
    let _ = write!(out, "{owner}.{name}");
    if !container.type_params.is_empty() {
        let params: Vec<&str> = container
            .type_params
            .iter()
            .map(|&param| program.name(program.type_param(param).name))
            .collect();
        let _ = write!(out, "<{}>", params.join(", "));
    }
    if let ScopeAnchor::Func(func) = container.anchor {
        let _ = write!(out, " (in {})", program.name(program.func(func).name));
    }
    out.push('\n');

    for &param in &container.type_params {
        let def = program.type_param(param);
        if def.constraints.is_empty() {
            continue;
        }
        let constraints: Vec<String> = def
            .constraints
            .iter()
            .map(|constraint| match *constraint {
                Constraint::Type(ty) => program.display_type(ty),
                Constraint::ValueType => "struct".to_owned(),
                Constraint::ReferenceType => "class".to_owned(),
                Constraint::Constructor => "new()".to_owned(),
            })
            .collect();
        let _ = writeln!(
            out,
            "  where {}: {}",
            program.name(def.name),
            constraints.join(", ")
        );
    }

    for slot in &container.slots {
        let func = program.name(program.func(slot.func).name);
        let _ = write!(
            out,
            "  {} {}: {} = {func}",
            slot.ordinal,
            display_name(program, slot.name, slot.ordinal),
            program.display_type(slot.storage),
        );
        if !slot.func_args.is_empty() {
            let args: Vec<String> = slot
                .func_args
                .iter()
                .map(|&ty| program.display_type(ty))
                .collect();
            let _ = write!(out, "<{}>", args.join(", "));
        }
        out.push('\n');
    }
}

/// Synthesized name, or `#index` when names were not synthesized.
fn display_name(program: &Program, name: Name, index: u32) -> String {
    if name == Name::EMPTY {
        format!("#{index}")
    } else {
        program.name(name).to_owned()
    }
}
