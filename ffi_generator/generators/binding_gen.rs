////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use crate::{
    config::DebugPrints,
    registry::{ClassFunction, Registry},
    transforms::{FunctionTransforms, ParamTransform},
};

/// Writes one safe function per distinct entry point, calling through a `Capabilities` value.
#[allow(missing_copy_implementations)]
pub struct BindingGenerator;

impl super::Generator for BindingGenerator {
    fn write<W>(&self, registry: &Registry, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        write_header(dest)?;
        write_type_aliases(registry, dest)?;
        write_constants(registry, dest)?;
        write_fns(registry, dest)?;
        Ok(())
    }
}

/// Creates a `__imports` module which contains all the external symbols that we need for the
///  bindings.
fn write_header<W>(dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        r#"
#![allow(unused_parens, non_snake_case, dead_code, non_upper_case_globals, unused_variables, unused_unsafe)]
mod __imports {{
    pub use std::mem;
    pub use std::os::raw::{{c_char, c_void}};
    pub use std::ptr;
}}"#
    )
}

/// Creates a `types` module which contains all the type aliases.
///
/// See also `generators::gen_types`.
fn write_type_aliases<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        r#"
pub mod types {{
    #![allow(non_camel_case_types, non_snake_case, dead_code, missing_copy_implementations)]
    "#
    )?;

    super::gen_types(registry, dest)?;

    writeln!(
        dest,
        "
}}
    "
    )
}

/// Creates the constants of every class at the root of the bindings.
fn write_constants<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    for class in &registry.classes {
        for constant in &class.constants {
            super::gen_constant_item(constant, "types::", dest)?;
        }
    }

    Ok(())
}

fn join_lines(lines: Vec<String>) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n{}", lines.join("\n"))
    }
}

/// Creates the functions corresponding to the native commands.
///
/// Each function transmutes the address stored at its index in the `Capabilities` it is given.
/// Unresolved entry points panic when called.
fn write_fns<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    for (index, f) in registry.distinct_functions().into_iter().enumerate() {
        let transforms = registry
            .transforms(f)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        debug!("writing {} ({} scratch buffers)", f.native_name(), transforms.strategies().len());
        write_fn(registry, index, f, &transforms, dest)?;
    }

    Ok(())
}

fn write_fn<W>(
    registry: &Registry,
    index: usize,
    f: ClassFunction<'_>,
    transforms: &FunctionTransforms,
    dest: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    let function = f.function;
    let cmd = f.native_name();
    let pairs = || function.params.iter().zip(transforms.params.iter());

    if let Some(doc) = &function.documentation {
        writeln!(dest, "/// {}", doc)?;
    }
    if function.tags.deprecated {
        writeln!(dest, "///\n/// Not available in forward compatible contexts.")?;
    }

    let mut params = vec!["caps: &ffi_runtime::Capabilities".to_owned()];
    params.extend(pairs().flat_map(|(param, transform)| transform.declaration(param)));

    let native_ret = function.ret.ty.rust_type();
    let (ret_type, ret_expr) = match &transforms.ret {
        None => (native_ret.clone(), "__result".to_owned()),
        Some(ret) if ret.replaces_result() || function.ret.ty.is_void() => (ret.rust_type(), ret.expression()),
        Some(ret) => (
            format!("({}, {})", native_ret, ret.rust_type()),
            format!("(__result, {})", ret.expression()),
        ),
    };

    let prelude = join_lines(pairs().filter_map(|(param, transform)| transform.prelude(param)).collect());
    // lengths of pointer arrays are read from the arrays, so they come last
    let is_lengths = |t: &ParamTransform| matches!(t, ParamTransform::PointerArrayLengths { .. });
    let setup = join_lines(
        pairs()
            .filter(|(_, t)| !is_lengths(*t))
            .chain(pairs().filter(|(_, t)| is_lengths(*t)))
            .filter_map(|(param, transform)| transform.setup(param, &cmd))
            .collect(),
    );
    let conversions = join_lines(pairs().filter_map(|(param, transform)| transform.conversion(param)).collect());
    let cleanup = join_lines(pairs().filter_map(|(param, transform)| transform.cleanup(param)).collect());

    let (frame_open, frame_close) = if transforms.needs_frame() {
        ("\nffi_runtime::scratch::with_stack(|__stack| {\nlet __frame = __stack.push();", "\n})")
    } else {
        ("", "")
    };

    let idents = super::gen_parameters(function, true, false);
    let (debug_string_initializer, debug_string_print) = match registry.config.debug_prints {
        DebugPrints::None => (String::new(), String::new()),
        DebugPrints::FunctionCalls => (
            format!(
                "\nlet __debug_string = format!(\"{name}({placeholders})\"{sep}{idents});",
                name = cmd,
                placeholders = vec!["{:?}"; idents.len()].join(", "),
                sep = if idents.is_empty() { "" } else { ", " },
                idents = idents.join(", "),
            ),
            // only print returned values if return type is not unit
            if function.ret.ty.is_void() {
                "\nprintln!(\"{}\", __debug_string);".to_owned()
            } else {
                "\nprintln!(\"{} -> {:?}\", __debug_string, __result);".to_owned()
            },
        ),
    };

    writeln!(
        dest,
        "#[inline]
pub fn {name}({params}){return_suffix} {{
unsafe {{\
{prelude}\
{frame_open}\
{setup}\
{conversions}\
{debug_string_initializer}
let __result = __imports::mem::transmute::<_, extern \"system\" fn({typed_params}){native_return_suffix}>(\
caps.function({index}).loaded(\"{name}\"))({idents});\
{debug_string_print}
let __ret = {ret};\
{cleanup}
__ret\
{frame_close}
}}
}}
",
        name = cmd,
        params = params.join(", "),
        return_suffix = super::gen_return_suffix(&ret_type),
        prelude = prelude,
        frame_open = frame_open,
        setup = setup,
        conversions = conversions,
        debug_string_initializer = debug_string_initializer,
        typed_params = super::gen_parameters(function, false, true).join(", "),
        native_return_suffix = super::gen_return_suffix(&native_ret),
        index = index,
        idents = idents.join(", "),
        debug_string_print = debug_string_print,
        ret = ret_expr,
        cleanup = cleanup,
        frame_close = frame_close,
    )
}
